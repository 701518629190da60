use crate::sources::traits::SessionPersistence;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Session slot that lives as long as the process
#[derive(Debug, Default)]
pub struct MemorySessionPersistence {
    value: Option<String>,
}

impl MemorySessionPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionPersistence for MemorySessionPersistence {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn set(&mut self, value: &str) -> Result<()> {
        self.value = Some(value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.value = None;
        Ok(())
    }
}

/// Session slot backed by a single file, surviving restarts
#[derive(Debug, Clone)]
pub struct FileSessionPersistence {
    path: PathBuf,
}

impl FileSessionPersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionPersistence for FileSessionPersistence {
    fn get(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read session file {}", self.path.display())),
        }
    }

    fn set(&mut self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create session directory {}", parent.display())
                })?;
            }
        }
        fs::write(&self.path, value)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove session file {}", self.path.display())),
        }
    }
}

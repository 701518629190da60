use anyhow::{bail, Context, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_VAR: &str = "PROPERTY_HUB_CONFIG";
pub const ENV_PREFIX: &str = "PROPERTY_HUB";
const DEFAULT_CONFIG_FILE: &str = "property-hub.json";

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// How long a session stays valid after sign-in
    pub session_ttl_minutes: i64,
    /// Artificial delay added by the catalog source
    pub source_latency_ms: u64,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Where the CLI keeps the signed-in session between runs
    pub session_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session_ttl_minutes: 12 * 60,
            source_latency_ms: 0,
            log_level: "info".to_string(),
            session_file: None,
        }
    }
}

impl AppConfig {
    /// Defaults, then the JSON file named by `PROPERTY_HUB_CONFIG` (or an
    /// optional `property-hub.json`), then `PROPERTY_HUB_*` variables.
    pub fn load() -> Result<Self> {
        let file = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        Self::load_from(file.as_deref(), ::config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(file: Option<&Path>, env: ::config::Environment) -> Result<Self> {
        let file_source = match file {
            Some(path) => {
                ::config::File::new(&path.to_string_lossy(), ::config::FileFormat::Json).required(true)
            }
            None => ::config::File::new(DEFAULT_CONFIG_FILE, ::config::FileFormat::Json).required(false),
        };

        let config: AppConfig = ::config::Config::builder()
            .add_source(file_source)
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_ttl_minutes <= 0 {
            bail!("session_ttl_minutes must be positive, got {}", self.session_ttl_minutes);
        }
        if TimeDelta::try_minutes(self.session_ttl_minutes).is_none() {
            bail!("session_ttl_minutes {} is out of range", self.session_ttl_minutes);
        }
        Ok(())
    }

    /// Out-of-range values saturate; `load` rejects them up front.
    pub fn session_ttl(&self) -> TimeDelta {
        TimeDelta::try_minutes(self.session_ttl_minutes.max(1)).unwrap_or(TimeDelta::MAX)
    }

    pub fn source_latency(&self) -> Duration {
        Duration::from_millis(self.source_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> ::config::Environment {
        let map: ::config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ::config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"source_latency_ms": 250}}"#).unwrap();

        let config = AppConfig::load_from(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.source_latency_ms, 250);
        assert_eq!(config.session_ttl_minutes, 720);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"session_ttl_minutes": 90, "log_level": "debug"}}"#).unwrap();

        let config = AppConfig::load_from(
            Some(file.path()),
            env(&[
                ("PROPERTY_HUB_SESSION_TTL_MINUTES", "30"),
                ("PROPERTY_HUB_SESSION_FILE", "/tmp/session.json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.session_ttl(), TimeDelta::minutes(30));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/session.json")));
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = AppConfig::load_from(None, env(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let result = AppConfig::load_from(None, env(&[("PROPERTY_HUB_SOURCE_LATENCY_MS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_huge_ttl_rejected_at_load() {
        let result = AppConfig::load_from(
            None,
            env(&[("PROPERTY_HUB_SESSION_TTL_MINUTES", "1000000000000000")]),
        );
        assert!(result.is_err());

        let result = AppConfig::load_from(None, env(&[("PROPERTY_HUB_SESSION_TTL_MINUTES", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_session_ttl_saturates() {
        let config = AppConfig {
            session_ttl_minutes: i64::MAX,
            ..AppConfig::default()
        };
        assert_eq!(config.session_ttl(), TimeDelta::MAX);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let missing = Path::new("/definitely/not/here.json");
        assert!(AppConfig::load_from(Some(missing), env(&[])).is_err());
    }
}

use crate::models::ListingStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MutationAction {
    SetVerified(bool),
    SetFeatured(bool),
    SetStatus(ListingStatus),
    SetSuspended(bool),
    Deleted,
    UserDeleted,
    VerificationApproved,
    VerificationRejected(String),
}

/// One applied change, kept for the admin audit view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationEntry {
    pub at: DateTime<Utc>,
    pub actor_id: String,
    pub target_id: String,
    pub action: MutationAction,
}

/// Append-only record of successful mutations
#[derive(Debug, Clone, Default)]
pub struct MutationLog {
    entries: Vec<MutationEntry>,
}

impl MutationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, actor_id: &str, target_id: &str, action: MutationAction) {
        self.entries.push(MutationEntry {
            at: Utc::now(),
            actor_id: actor_id.to_string(),
            target_id: target_id.to_string(),
            action,
        });
    }

    pub fn entries(&self) -> &[MutationEntry] {
        &self.entries
    }

    pub fn for_target<'a>(&'a self, target_id: &'a str) -> impl Iterator<Item = &'a MutationEntry> {
        self.entries.iter().filter(move |e| e.target_id == target_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

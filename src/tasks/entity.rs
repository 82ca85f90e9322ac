//! Stored task entity.

use chrono::{DateTime, Utc};

/// A stored task.
///
/// `id` and `created_at` are owned by the repository and never change once
/// assigned. `updated_at` moves only when the content fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub status_id: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Unsaved task carrying only content fields.
    pub fn candidate(name: impl Into<String>, status_id: i64, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            status_id,
            description,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// True when `name`, `status_id` and `description` all match.
    pub fn same_content(&self, other: &Task) -> bool {
        self.name == other.name
            && self.status_id == other.status_id
            && self.description == other.description
    }
}

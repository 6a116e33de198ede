/// Domain models for the task tracker
///
/// This module contains the persisted entities, the client inputs used to
/// create or replace them, and the store-level records the services hand to
/// the persistence boundary.
///
/// # Models
///
/// - `user`: User accounts (unique email, Argon2id credential digest)
/// - `status`: Task statuses (e.g. "draft", "in review")
/// - `label`: Free-form labels attached to tasks (many-to-many)
/// - `task`: Tasks referencing a status, an author, an optional executor and labels
///
/// # Example
///
/// ```
/// use tasktracker_shared::models::{status::StatusInput, EntityKind};
///
/// let input = StatusInput { name: "in progress".to_string() };
/// assert!(input.check().is_ok());
/// assert_eq!(EntityKind::Status.to_string(), "Status");
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod label;
pub mod status;
pub mod task;
pub mod user;

/// Identifier type shared by every entity (`BIGSERIAL` in PostgreSQL)
pub type EntityId = i64;

/// The kinds of entity the services manage
///
/// Carried by not-found and access-denied failures so the boundary can
/// report which resource was involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Status,
    Label,
    Task,
}

impl EntityKind {
    /// Gets the entity name as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Status => "Status",
            EntityKind::Label => "Label",
            EntityKind::Task => "Task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

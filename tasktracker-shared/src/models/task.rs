/// Task model
///
/// A task always has one status and one author; the executor and the label
/// set are optional. The author is stamped from the authenticated identity at
/// creation time and is never taken from client input.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(200) NOT NULL,
///     description TEXT,
///     task_status_id BIGINT NOT NULL REFERENCES statuses(id) ON DELETE RESTRICT,
///     author_id BIGINT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     executor_id BIGINT REFERENCES users(id) ON DELETE RESTRICT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE task_labels (
///     task_id BIGINT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     label_id BIGINT NOT NULL REFERENCES labels(id) ON DELETE RESTRICT,
///     PRIMARY KEY (task_id, label_id)
/// );
/// ```
///
/// # Representations
///
/// - [`Task`]: the composed entity returned to clients, with its status,
///   author, executor and labels embedded
/// - [`TaskRow`]: the flat `tasks` row as stored
/// - [`TaskInput`]: what a client sends on create/replace
/// - [`NewTask`]: the resolved record the service hands to the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{label::Label, status::Status, user::User, EntityId};
use crate::error::ServiceResult;
use crate::validation;

/// Task with its references resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,

    pub name: String,

    pub description: Option<String>,

    /// Current status (required)
    pub task_status: Status,

    /// User who created the task; the owner for authorization purposes
    pub author: User,

    /// User assigned to carry the task out
    pub executor: Option<User>,

    /// Attached labels, ordered by id
    pub labels: Vec<Label>,

    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Ids of the attached labels
    pub fn label_ids(&self) -> Vec<EntityId> {
        self.labels.iter().map(|l| l.id).collect()
    }
}

/// Flat `tasks` row
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TaskRow {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub task_status_id: EntityId,
    pub author_id: EntityId,
    pub executor_id: Option<EntityId>,
    pub created_at: DateTime<Utc>,
}

impl TaskRow {
    /// Combines the row with its resolved references
    pub fn compose(
        self,
        task_status: Status,
        author: User,
        executor: Option<User>,
        mut labels: Vec<Label>,
    ) -> Task {
        labels.sort_by_key(|l| l.id);

        Task {
            id: self.id,
            name: self.name,
            description: self.description,
            task_status,
            author,
            executor,
            labels,
            created_at: self.created_at,
        }
    }
}

/// Client input for creating or replacing a task
///
/// Has no author field; unknown keys such as `authorId`
/// are dropped during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 200,
        message = "Task name needs to be between 1 and 200 characters long"
    ))]
    pub name: String,

    #[validate(length(
        max = 1000,
        message = "Task description needs to be between 0 and 1000 characters long"
    ))]
    pub description: Option<String>,

    #[validate(required(message = "Task status is required"))]
    pub task_status_id: Option<EntityId>,

    #[serde(default)]
    pub label_ids: Vec<EntityId>,

    pub executor_id: Option<EntityId>,
}

impl TaskInput {
    pub fn check(&self) -> ServiceResult<()> {
        let mut violations = validation::collect_violations(self.validate());
        validation::require_not_blank(&mut violations, "name", &self.name, "Task name is required");
        validation::finish(violations)
    }
}

/// Resolved task record handed to the store
///
/// `label_ids` only contains labels that resolved; the store writes the task
/// row and its label links atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub description: Option<String>,
    pub task_status_id: EntityId,
    pub author_id: EntityId,
    pub executor_id: Option<EntityId>,
    pub label_ids: Vec<EntityId>,
}

/// Persistence boundary
///
/// The services talk to storage exclusively through the traits below. Two
/// implementations exist:
///
/// - [`postgres::PgStore`]: sqlx against PostgreSQL, one transaction per write
/// - [`memory::MemoryStore`]: `BTreeMap` tables behind a tokio `RwLock`, used by
///   tests and by the database-less development mode
///
/// Lookups return `Option` and deletes return `bool`; deciding that absence
/// is an error is the service layer's job. Every write is atomic: a task and
/// its label links are stored together or not at all.

use async_trait::async_trait;

use crate::filter::TaskPredicate;
use crate::models::{
    label::Label,
    status::Status,
    task::{NewTask, Task},
    user::{NewUser, User},
    EntityId, EntityKind,
};

pub mod memory;
pub mod postgres;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-level failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint violated
    #[error("{0}")]
    Conflict(String),

    /// Delete blocked because a task still references the row
    #[error("{entity} {id} is still referenced")]
    InUse { entity: EntityKind, id: EntityId },

    /// A write referenced a row that no longer exists
    #[error("missing reference: {0}")]
    MissingReference(String),

    /// Anything else the database reports
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn find_user(&self, id: EntityId) -> StoreResult<Option<User>>;

    /// Looks up by normalized email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with `Conflict` when the email is taken
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    /// Replaces every field but the id and creation time
    async fn update_user(&self, id: EntityId, user: NewUser) -> StoreResult<Option<User>>;

    /// Fails with `InUse` while a task references the user
    async fn delete_user(&self, id: EntityId) -> StoreResult<bool>;
}

#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn list_statuses(&self) -> StoreResult<Vec<Status>>;

    async fn find_status(&self, id: EntityId) -> StoreResult<Option<Status>>;

    async fn insert_status(&self, name: &str) -> StoreResult<Status>;

    async fn update_status(&self, id: EntityId, name: &str) -> StoreResult<Option<Status>>;

    async fn delete_status(&self, id: EntityId) -> StoreResult<bool>;
}

#[async_trait]
pub trait LabelStore: Send + Sync {
    async fn list_labels(&self) -> StoreResult<Vec<Label>>;

    async fn find_label(&self, id: EntityId) -> StoreResult<Option<Label>>;

    /// Returns the labels that exist among `ids`, ordered by id
    async fn find_labels(&self, ids: &[EntityId]) -> StoreResult<Vec<Label>>;

    async fn insert_label(&self, name: &str) -> StoreResult<Label>;

    async fn update_label(&self, id: EntityId, name: &str) -> StoreResult<Option<Label>>;

    async fn delete_label(&self, id: EntityId) -> StoreResult<bool>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks satisfying `predicate`, ordered by id
    async fn list_tasks(&self, predicate: &TaskPredicate) -> StoreResult<Vec<Task>>;

    async fn find_task(&self, id: EntityId) -> StoreResult<Option<Task>>;

    /// Stores the task row and its label links atomically
    async fn insert_task(&self, task: NewTask) -> StoreResult<Task>;

    /// Replaces the row and the whole label set atomically
    async fn update_task(&self, id: EntityId, task: NewTask) -> StoreResult<Option<Task>>;

    /// Removes the task and its label links
    async fn delete_task(&self, id: EntityId) -> StoreResult<bool>;
}

/// Every entity store plus connectivity reporting
#[async_trait]
pub trait Store: UserStore + StatusStore + LabelStore + TaskStore {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// In-memory store
///
/// All tables live behind one tokio `RwLock`, so every write is a single
/// critical section and readers never observe a task without its labels.
/// Referential rules mirror the PostgreSQL schema: a status, user or label a
/// task points at cannot be deleted, and a write naming a missing reference
/// is refused.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

use super::{LabelStore, StatusStore, Store, StoreError, StoreResult, TaskStore, UserStore};
use crate::filter::TaskPredicate;
use crate::models::{
    label::Label,
    status::Status,
    task::{NewTask, Task, TaskRow},
    user::{NewUser, User},
    EntityId, EntityKind,
};

/// Rows keyed by id plus the next id to hand out
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<EntityId, T>,
    next_id: EntityId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug)]
struct TaskRecord {
    row: TaskRow,
    label_ids: BTreeSet<EntityId>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    statuses: Table<Status>,
    labels: Table<Label>,
    tasks: Table<TaskRecord>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<EntityId>) -> bool {
        self.users
            .rows
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn referenced_by_task(&self, matches: impl Fn(&TaskRecord) -> bool) -> bool {
        self.tasks.rows.values().any(matches)
    }

    fn check_references(&self, task: &NewTask) -> StoreResult<()> {
        if !self.statuses.rows.contains_key(&task.task_status_id) {
            return Err(StoreError::MissingReference(format!(
                "status {}",
                task.task_status_id
            )));
        }

        let users = std::iter::once(task.author_id).chain(task.executor_id);
        for user_id in users {
            if !self.users.rows.contains_key(&user_id) {
                return Err(StoreError::MissingReference(format!("user {}", user_id)));
            }
        }

        if let Some(id) = task
            .label_ids
            .iter()
            .find(|id| !self.labels.rows.contains_key(id))
        {
            return Err(StoreError::MissingReference(format!("label {}", id)));
        }

        Ok(())
    }

    fn compose(&self, record: &TaskRecord) -> StoreResult<Task> {
        let row = &record.row;

        let status = self
            .statuses
            .rows
            .get(&row.task_status_id)
            .cloned()
            .ok_or_else(|| StoreError::MissingReference(format!("status {}", row.task_status_id)))?;

        let author = self
            .users
            .rows
            .get(&row.author_id)
            .cloned()
            .ok_or_else(|| StoreError::MissingReference(format!("user {}", row.author_id)))?;

        let executor = match row.executor_id {
            Some(id) => Some(
                self.users
                    .rows
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| StoreError::MissingReference(format!("user {}", id)))?,
            ),
            None => None,
        };

        let labels = record
            .label_ids
            .iter()
            .filter_map(|id| self.labels.rows.get(id).cloned())
            .collect();

        Ok(row.clone().compose(status, author, executor, labels))
    }
}

/// Store backed by in-process maps
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.rows.values().cloned().collect())
    }

    async fn find_user(&self, id: EntityId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.rows.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.rows.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.email_taken(&user.email, None) {
            return Err(StoreError::Conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }

        let id = tables.users.allocate();
        let created = User {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.rows.insert(id, created.clone());

        Ok(created)
    }

    async fn update_user(&self, id: EntityId, user: NewUser) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;

        if !tables.users.rows.contains_key(&id) {
            return Ok(None);
        }
        if tables.email_taken(&user.email, Some(id)) {
            return Err(StoreError::Conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }

        let existing = tables.users.rows.get_mut(&id).map(|existing| {
            existing.first_name = user.first_name;
            existing.last_name = user.last_name;
            existing.email = user.email;
            existing.password_hash = user.password_hash;
            existing.clone()
        });

        Ok(existing)
    }

    async fn delete_user(&self, id: EntityId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        if !tables.users.rows.contains_key(&id) {
            return Ok(false);
        }
        if tables.referenced_by_task(|t| t.row.author_id == id || t.row.executor_id == Some(id)) {
            return Err(StoreError::InUse {
                entity: EntityKind::User,
                id,
            });
        }

        Ok(tables.users.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl StatusStore for MemoryStore {
    async fn list_statuses(&self) -> StoreResult<Vec<Status>> {
        Ok(self.tables.read().await.statuses.rows.values().cloned().collect())
    }

    async fn find_status(&self, id: EntityId) -> StoreResult<Option<Status>> {
        Ok(self.tables.read().await.statuses.rows.get(&id).cloned())
    }

    async fn insert_status(&self, name: &str) -> StoreResult<Status> {
        let mut tables = self.tables.write().await;

        let id = tables.statuses.allocate();
        let status = Status {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.statuses.rows.insert(id, status.clone());

        Ok(status)
    }

    async fn update_status(&self, id: EntityId, name: &str) -> StoreResult<Option<Status>> {
        let mut tables = self.tables.write().await;

        Ok(tables.statuses.rows.get_mut(&id).map(|status| {
            status.name = name.to_string();
            status.clone()
        }))
    }

    async fn delete_status(&self, id: EntityId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        if !tables.statuses.rows.contains_key(&id) {
            return Ok(false);
        }
        if tables.referenced_by_task(|t| t.row.task_status_id == id) {
            return Err(StoreError::InUse {
                entity: EntityKind::Status,
                id,
            });
        }

        Ok(tables.statuses.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl LabelStore for MemoryStore {
    async fn list_labels(&self) -> StoreResult<Vec<Label>> {
        Ok(self.tables.read().await.labels.rows.values().cloned().collect())
    }

    async fn find_label(&self, id: EntityId) -> StoreResult<Option<Label>> {
        Ok(self.tables.read().await.labels.rows.get(&id).cloned())
    }

    async fn find_labels(&self, ids: &[EntityId]) -> StoreResult<Vec<Label>> {
        let tables = self.tables.read().await;
        let wanted: BTreeSet<EntityId> = ids.iter().copied().collect();

        Ok(wanted
            .iter()
            .filter_map(|id| tables.labels.rows.get(id).cloned())
            .collect())
    }

    async fn insert_label(&self, name: &str) -> StoreResult<Label> {
        let mut tables = self.tables.write().await;

        let id = tables.labels.allocate();
        let label = Label {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.labels.rows.insert(id, label.clone());

        Ok(label)
    }

    async fn update_label(&self, id: EntityId, name: &str) -> StoreResult<Option<Label>> {
        let mut tables = self.tables.write().await;

        Ok(tables.labels.rows.get_mut(&id).map(|label| {
            label.name = name.to_string();
            label.clone()
        }))
    }

    async fn delete_label(&self, id: EntityId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        if !tables.labels.rows.contains_key(&id) {
            return Ok(false);
        }
        if tables.referenced_by_task(|t| t.label_ids.contains(&id)) {
            return Err(StoreError::InUse {
                entity: EntityKind::Label,
                id,
            });
        }

        Ok(tables.labels.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, predicate: &TaskPredicate) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;

        let mut tasks = Vec::new();
        for record in tables.tasks.rows.values() {
            let task = tables.compose(record)?;
            if predicate.matches(&task) {
                tasks.push(task);
            }
        }

        Ok(tasks)
    }

    async fn find_task(&self, id: EntityId) -> StoreResult<Option<Task>> {
        let tables = self.tables.read().await;

        tables
            .tasks
            .rows
            .get(&id)
            .map(|record| tables.compose(record))
            .transpose()
    }

    async fn insert_task(&self, task: NewTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;
        tables.check_references(&task)?;

        let id = tables.tasks.allocate();
        let record = TaskRecord {
            row: TaskRow {
                id,
                name: task.name,
                description: task.description,
                task_status_id: task.task_status_id,
                author_id: task.author_id,
                executor_id: task.executor_id,
                created_at: Utc::now(),
            },
            label_ids: task.label_ids.into_iter().collect(),
        };

        let composed = tables.compose(&record)?;
        tables.tasks.rows.insert(id, record);

        Ok(composed)
    }

    async fn update_task(&self, id: EntityId, task: NewTask) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;

        let created_at = match tables.tasks.rows.get(&id) {
            Some(existing) => existing.row.created_at,
            None => return Ok(None),
        };
        tables.check_references(&task)?;

        let record = TaskRecord {
            row: TaskRow {
                id,
                name: task.name,
                description: task.description,
                task_status_id: task.task_status_id,
                author_id: task.author_id,
                executor_id: task.executor_id,
                created_at,
            },
            label_ids: task.label_ids.into_iter().collect(),
        };

        let composed = tables.compose(&record)?;
        tables.tasks.rows.insert(id, record);

        Ok(Some(composed))
    }

    async fn delete_task(&self, id: EntityId) -> StoreResult<bool> {
        Ok(self.tables.write().await.tasks.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Condition;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            email: email.to_string(),
            password_hash: "digest".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_assigned_per_table() {
        let store = MemoryStore::new();

        let user = store.insert_user(new_user("a@b.io")).await.unwrap();
        let status = store.insert_status("new").await.unwrap();
        let second = store.insert_status("done").await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(status.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@b.io")).await.unwrap();
        let other = store.insert_user(new_user("c@d.io")).await.unwrap();

        assert!(matches!(
            store.insert_user(new_user("a@b.io")).await,
            Err(StoreError::Conflict(_))
        ));
        assert!(matches!(
            store.update_user(other.id, new_user("a@b.io")).await,
            Err(StoreError::Conflict(_))
        ));
        // Keeping one's own email is fine
        assert!(store.update_user(other.id, new_user("c@d.io")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_task_roundtrip_and_referential_rules() {
        let store = MemoryStore::new();
        let author = store.insert_user(new_user("a@b.io")).await.unwrap();
        let status = store.insert_status("new").await.unwrap();
        let label = store.insert_label("bug").await.unwrap();

        let task = store
            .insert_task(NewTask {
                name: "t".to_string(),
                description: None,
                task_status_id: status.id,
                author_id: author.id,
                executor_id: None,
                label_ids: vec![label.id],
            })
            .await
            .unwrap();

        assert_eq!(store.find_task(task.id).await.unwrap(), Some(task.clone()));

        assert!(matches!(
            store.delete_status(status.id).await,
            Err(StoreError::InUse { entity: EntityKind::Status, .. })
        ));
        assert!(matches!(
            store.delete_user(author.id).await,
            Err(StoreError::InUse { entity: EntityKind::User, .. })
        ));
        assert!(matches!(
            store.delete_label(label.id).await,
            Err(StoreError::InUse { entity: EntityKind::Label, .. })
        ));

        assert!(store.delete_task(task.id).await.unwrap());
        assert!(store.delete_status(status.id).await.unwrap());
        assert!(!store.delete_status(status.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_task_with_missing_reference_is_refused() {
        let store = MemoryStore::new();
        let author = store.insert_user(new_user("a@b.io")).await.unwrap();

        let result = store
            .insert_task(NewTask {
                name: "t".to_string(),
                description: None,
                task_status_id: 42,
                author_id: author.id,
                executor_id: None,
                label_ids: Vec::new(),
            })
            .await;

        assert!(matches!(result, Err(StoreError::MissingReference(_))));
        assert!(store.list_tasks(&TaskPredicate::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_tasks_applies_predicate() {
        let store = MemoryStore::new();
        let author = store.insert_user(new_user("a@b.io")).await.unwrap();
        let open = store.insert_status("open").await.unwrap();
        let done = store.insert_status("done").await.unwrap();

        for status_id in [open.id, done.id, open.id] {
            store
                .insert_task(NewTask {
                    name: "t".to_string(),
                    description: None,
                    task_status_id: status_id,
                    author_id: author.id,
                    executor_id: None,
                    label_ids: Vec::new(),
                })
                .await
                .unwrap();
        }

        let predicate = TaskPredicate::all().and(Condition::StatusIn(vec![open.id]));
        let ids: Vec<EntityId> = store
            .list_tasks(&predicate)
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_find_labels_skips_unknown_ids() {
        let store = MemoryStore::new();
        let a = store.insert_label("a").await.unwrap();
        let b = store.insert_label("b").await.unwrap();

        let found = store.find_labels(&[b.id, 99, a.id, b.id]).await.unwrap();
        assert_eq!(found, vec![a, b]);
    }
}

use std::sync::Arc;
use tracing::{debug, info};

use super::{LabelResolution, ServicePolicy};
use crate::auth::authorization::require_owner;
use crate::error::{ServiceError, ServiceResult};
use crate::filter::{TaskFilterBinder, TaskPredicate};
use crate::models::task::{NewTask, Task, TaskInput};
use crate::models::user::User;
use crate::models::{EntityId, EntityKind};
use crate::store::Store;

/// Tasks and their references
///
/// Create and update resolve the status, the optional executor and the label
/// set before anything is written. The author is always the acting user on
/// create and is carried over unchanged on update.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
    policy: ServicePolicy,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>, policy: ServicePolicy) -> Self {
        Self { store, policy }
    }

    /// Binder configured with this service's filter mode
    pub fn filter_binder(&self) -> TaskFilterBinder {
        TaskFilterBinder::new(self.policy.filter_mode)
    }

    /// Tasks matching `predicate`; evaluated by the store
    pub async fn find_all(&self, predicate: &TaskPredicate) -> ServiceResult<Vec<Task>> {
        Ok(self.store.list_tasks(predicate).await?)
    }

    pub async fn find_by_id(&self, id: EntityId) -> ServiceResult<Task> {
        self.store
            .find_task(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Task, id))
    }

    /// Creates a task authored by `actor`
    pub async fn create(&self, actor: &User, input: TaskInput) -> ServiceResult<Task> {
        input.check()?;

        let record = self.resolve(input, actor.id).await?;
        let task = self.store.insert_task(record).await?;

        info!(task_id = task.id, author_id = actor.id, "Task created");
        Ok(task)
    }

    /// Replaces a task the actor authored
    pub async fn update_by_id(
        &self,
        actor: &User,
        id: EntityId,
        input: TaskInput,
    ) -> ServiceResult<Task> {
        input.check()?;
        let existing = self.find_by_id(id).await?;
        require_owner(actor, &existing)?;

        let record = self.resolve(input, existing.author.id).await?;
        let task = self
            .store
            .update_task(id, record)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Task, id))?;

        info!(task_id = id, "Task updated");
        Ok(task)
    }

    /// Deletes a task the actor authored
    pub async fn delete_by_id(&self, actor: &User, id: EntityId) -> ServiceResult<()> {
        let existing = self.find_by_id(id).await?;
        require_owner(actor, &existing)?;

        if !self.store.delete_task(id).await? {
            return Err(ServiceError::not_found(EntityKind::Task, id));
        }

        info!(task_id = id, "Task deleted");
        Ok(())
    }

    /// Resolves references into a store record; `input` is already validated
    async fn resolve(&self, input: TaskInput, author_id: EntityId) -> ServiceResult<NewTask> {
        let status_id = input
            .task_status_id
            .ok_or_else(|| ServiceError::invalid("taskStatusId", "Task status is required"))?;
        if self.store.find_status(status_id).await?.is_none() {
            return Err(ServiceError::not_found(EntityKind::Status, status_id));
        }

        if let Some(executor_id) = input.executor_id {
            if self.store.find_user(executor_id).await?.is_none() {
                return Err(ServiceError::not_found(EntityKind::User, executor_id));
            }
        }

        let label_ids = self.resolve_labels(&input.label_ids).await?;

        Ok(NewTask {
            name: input.name.trim().to_string(),
            description: input.description,
            task_status_id: status_id,
            author_id,
            executor_id: input.executor_id,
            label_ids,
        })
    }

    async fn resolve_labels(&self, requested: &[EntityId]) -> ServiceResult<Vec<EntityId>> {
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<EntityId> = self
            .store
            .find_labels(requested)
            .await?
            .into_iter()
            .map(|label| label.id)
            .collect();

        if let Some(missing) = requested.iter().find(|id| !found.contains(id)) {
            match self.policy.label_resolution {
                LabelResolution::Strict => {
                    return Err(ServiceError::not_found(EntityKind::Label, *missing));
                }
                LabelResolution::Lenient => {
                    debug!(
                        requested = requested.len(),
                        resolved = found.len(),
                        "Dropping unknown label ids"
                    );
                }
            }
        }

        Ok(found)
    }
}

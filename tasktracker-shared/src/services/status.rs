use std::sync::Arc;
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use crate::models::status::{Status, StatusInput};
use crate::models::{EntityId, EntityKind};
use crate::store::Store;

/// Task statuses; writable by any authenticated user
#[derive(Clone)]
pub struct StatusService {
    store: Arc<dyn Store>,
}

impl StatusService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Status>> {
        Ok(self.store.list_statuses().await?)
    }

    pub async fn find_by_id(&self, id: EntityId) -> ServiceResult<Status> {
        self.store
            .find_status(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Status, id))
    }

    pub async fn create(&self, input: StatusInput) -> ServiceResult<Status> {
        input.check()?;

        let status = self.store.insert_status(input.name.trim()).await?;
        info!(status_id = status.id, "Status created");
        Ok(status)
    }

    pub async fn update_by_id(&self, id: EntityId, input: StatusInput) -> ServiceResult<Status> {
        input.check()?;

        self.store
            .update_status(id, input.name.trim())
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Status, id))
    }

    /// # Errors
    ///
    /// `Conflict` while a task still has this status.
    pub async fn delete_by_id(&self, id: EntityId) -> ServiceResult<()> {
        if !self.store.delete_status(id).await? {
            return Err(ServiceError::not_found(EntityKind::Status, id));
        }

        info!(status_id = id, "Status deleted");
        Ok(())
    }
}

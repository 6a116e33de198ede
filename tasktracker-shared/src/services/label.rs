use std::sync::Arc;
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use crate::models::label::{Label, LabelInput};
use crate::models::{EntityId, EntityKind};
use crate::store::Store;

/// Labels; writable by any authenticated user
#[derive(Clone)]
pub struct LabelService {
    store: Arc<dyn Store>,
}

impl LabelService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Label>> {
        Ok(self.store.list_labels().await?)
    }

    pub async fn find_by_id(&self, id: EntityId) -> ServiceResult<Label> {
        self.store
            .find_label(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Label, id))
    }

    pub async fn create(&self, input: LabelInput) -> ServiceResult<Label> {
        input.check()?;

        let label = self.store.insert_label(input.name.trim()).await?;
        info!(label_id = label.id, "Label created");
        Ok(label)
    }

    pub async fn update_by_id(&self, id: EntityId, input: LabelInput) -> ServiceResult<Label> {
        input.check()?;

        self.store
            .update_label(id, input.name.trim())
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Label, id))
    }

    /// # Errors
    ///
    /// `Conflict` while the label is attached to a task.
    pub async fn delete_by_id(&self, id: EntityId) -> ServiceResult<()> {
        if !self.store.delete_label(id).await? {
            return Err(ServiceError::not_found(EntityKind::Label, id));
        }

        info!(label_id = id, "Label deleted");
        Ok(())
    }
}

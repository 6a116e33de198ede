/// Label model
///
/// Labels are attached to tasks through the `task_labels` join table. A label
/// does not own the tasks it is attached to.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE labels (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(30) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EntityId;
use crate::error::ServiceResult;
use crate::validation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: EntityId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Client input for creating or renaming a label
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LabelInput {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 30,
        message = "Label name needs to be between 1 and 30 characters long"
    ))]
    pub name: String,
}

impl LabelInput {
    pub fn check(&self) -> ServiceResult<()> {
        let mut violations = validation::collect_violations(self.validate());
        validation::require_not_blank(&mut violations, "name", &self.name, "Label name is required");
        validation::finish(violations)
    }
}

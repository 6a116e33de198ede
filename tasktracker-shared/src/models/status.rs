/// Task status model
///
/// Every task references exactly one status. Names are expected to be
/// distinct by convention but the schema does not enforce it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE statuses (
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
pub struct Status {
    pub id: EntityId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Client input for creating or renaming a status
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StatusInput {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 30,
        message = "Status name needs to be between 1 and 30 characters long"
    ))]
    pub name: String,
}

impl StatusInput {
    pub fn check(&self) -> ServiceResult<()> {
        let mut violations = validation::collect_violations(self.validate());
        validation::require_not_blank(&mut violations, "name", &self.name, "Status name is required");
        validation::finish(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_name_bounds() {
        assert!(StatusInput { name: "new".to_string() }.check().is_ok());
        assert!(StatusInput { name: String::new() }.check().is_err());
        assert!(StatusInput { name: "  ".to_string() }.check().is_err());
        assert!(StatusInput { name: "x".repeat(31) }.check().is_err());
    }
}

/// Error taxonomy shared by the service layer
///
/// Every service operation returns `ServiceResult<T>`. Failures are raised at
/// the point of detection and travel unchanged to the API boundary, which owns
/// the translation into HTTP status codes. Nothing here is retried: all kinds
/// describe client input or state mismatches, not transient faults.
///
/// # Kinds
///
/// - `NotFound`: the primary resource or a referenced entity is absent
/// - `AccessDenied`: the actor is authenticated but does not own the resource
/// - `ValidationFailed`: every violated field rule, collected in one pass
/// - `IdentityNotFound`: the token names an email with no live account
/// - `InvalidCredentials`: login with an unknown email or wrong password
/// - `Conflict`: duplicate email, or deleting an entity a task still references

use serde::{Deserialize, Serialize};

use crate::auth::authorization::AuthzError;
use crate::auth::password::PasswordError;
use crate::models::{EntityId, EntityKind};
use crate::store::StoreError;

/// Result alias used across the service layer
pub type ServiceResult<T> = Result<T, ServiceError>;

/// A single violated field rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Field name as the client spells it (camelCase)
    pub field: String,

    /// Human-readable reason
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Service-level failure
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Entity absent
    #[error("{entity} with id {id} not found")]
    NotFound { entity: EntityKind, id: EntityId },

    /// Actor is not the owner of the resource
    #[error("User {actor_id} is not allowed to modify {resource} {resource_id}")]
    AccessDenied {
        actor_id: EntityId,
        resource: EntityKind,
        resource_id: EntityId,
    },

    /// Malformed input, all violations at once
    #[error("Validation failed: {} violation(s)", .0.len())]
    ValidationFailed(Vec<FieldViolation>),

    /// Token references an account that no longer exists
    #[error("No user registered for {email}")]
    IdentityNotFound { email: String },

    /// Login failed
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// State conflict (duplicate email, entity still referenced)
    #[error("{0}")]
    Conflict(String),

    /// Credential service failure
    #[error("Credential service failed: {0}")]
    Credential(#[from] PasswordError),

    /// Storage failure
    #[error("Storage failure: {0}")]
    Storage(StoreError),
}

impl ServiceError {
    /// Shorthand for a not-found failure
    pub fn not_found(entity: EntityKind, id: EntityId) -> Self {
        ServiceError::NotFound { entity, id }
    }

    /// Shorthand for a single-field validation failure
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ServiceError::ValidationFailed(vec![FieldViolation::new(field, reason)])
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            StoreError::InUse { entity, id } => ServiceError::Conflict(format!(
                "{} {} is still referenced by a task",
                entity, id
            )),
            StoreError::MissingReference(what) => {
                ServiceError::Conflict(format!("Referenced entity disappeared: {}", what))
            }
            other => ServiceError::Storage(other),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::AccessDenied {
                actor_id,
                resource,
                resource_id,
            } => ServiceError::AccessDenied {
                actor_id,
                resource,
                resource_id,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ServiceError::not_found(EntityKind::Task, 42);
        assert_eq!(err.to_string(), "Task with id 42 not found");
    }

    #[test]
    fn test_validation_display_counts_violations() {
        let err = ServiceError::ValidationFailed(vec![
            FieldViolation::new("name", "required"),
            FieldViolation::new("taskStatusId", "required"),
        ]);
        assert_eq!(err.to_string(), "Validation failed: 2 violation(s)");
    }

    #[test]
    fn test_store_in_use_becomes_conflict() {
        let err: ServiceError = StoreError::InUse {
            entity: EntityKind::Status,
            id: 3,
        }
        .into();

        match err {
            ServiceError::Conflict(msg) => assert!(msg.contains("Status 3")),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_authz_error_becomes_access_denied() {
        let err: ServiceError = AuthzError::AccessDenied {
            actor_id: 1,
            resource: EntityKind::User,
            resource_id: 2,
        }
        .into();

        assert!(matches!(
            err,
            ServiceError::AccessDenied {
                actor_id: 1,
                resource: EntityKind::User,
                resource_id: 2
            }
        ));
    }
}

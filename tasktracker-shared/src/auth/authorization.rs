/// Ownership checks
///
/// Only the owner of a resource may modify or delete it. For a user the owner
/// is the account itself; for a task it is the task's author. Statuses and
/// labels have no owner and are writable by any authenticated user.
///
/// The check is two-phase and the caller owns phase one: resolve the
/// resource by id first (absence is a not-found), then hand the loaded
/// resource to [`require_owner`]. The comparison itself is a pure function
/// with no storage access, so a nonexistent id can never surface as denied.
///
/// # Example
///
/// ```
/// use tasktracker_shared::auth::authorization::{authorize, Decision};
///
/// assert_eq!(authorize(7, 7), Decision::Allow);
/// assert_eq!(authorize(7, 8), Decision::Deny);
/// ```

use crate::models::{task::Task, user::User, EntityId, EntityKind};

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Actor does not own the resource
    #[error("User {actor_id} does not own {resource} {resource_id}")]
    AccessDenied {
        actor_id: EntityId,
        resource: EntityKind,
        resource_id: EntityId,
    },
}

/// Outcome of an ownership comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// A resource with a single owning user
pub trait Owned {
    /// Kind reported when access is denied
    const KIND: EntityKind;

    /// Id of the resource itself
    fn resource_id(&self) -> EntityId;

    /// Id of the owning user
    fn owner_id(&self) -> EntityId;
}

impl Owned for User {
    const KIND: EntityKind = EntityKind::User;

    fn resource_id(&self) -> EntityId {
        self.id
    }

    fn owner_id(&self) -> EntityId {
        self.id
    }
}

impl Owned for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn resource_id(&self) -> EntityId {
        self.id
    }

    fn owner_id(&self) -> EntityId {
        self.author.id
    }
}

/// Allows iff the actor is the owner
pub fn authorize(actor_id: EntityId, resource_owner_id: EntityId) -> Decision {
    if actor_id == resource_owner_id {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Checks that `actor` owns an already-loaded resource
///
/// # Errors
///
/// Returns `AuthzError::AccessDenied` when the ids differ.
pub fn require_owner<R: Owned>(actor: &User, resource: &R) -> Result<(), AuthzError> {
    match authorize(actor.id, resource.owner_id()) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            tracing::debug!(
                actor_id = actor.id,
                resource = %R::KIND,
                resource_id = resource.resource_id(),
                "Ownership check denied"
            );
            Err(AuthzError::AccessDenied {
                actor_id: actor.id,
                resource: R::KIND,
                resource_id: resource.resource_id(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status::Status;
    use chrono::Utc;

    fn user(id: EntityId) -> User {
        User {
            id,
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            email: format!("user{}@example.com", id),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    fn task_by(author: User) -> Task {
        Task {
            id: 10,
            name: "t".to_string(),
            description: None,
            task_status: Status {
                id: 1,
                name: "new".to_string(),
                created_at: Utc::now(),
            },
            author,
            executor: Some(user(2)),
            labels: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_authorize() {
        assert!(authorize(1, 1).is_allowed());
        assert!(!authorize(1, 2).is_allowed());
    }

    #[test]
    fn test_user_owns_itself() {
        assert!(require_owner(&user(1), &user(1)).is_ok());
        assert_eq!(
            require_owner(&user(2), &user(1)),
            Err(AuthzError::AccessDenied {
                actor_id: 2,
                resource: EntityKind::User,
                resource_id: 1,
            })
        );
    }

    #[test]
    fn test_task_owned_by_author_not_executor() {
        let task = task_by(user(1));

        assert!(require_owner(&user(1), &task).is_ok());
        // The executor is not the owner
        assert_eq!(
            require_owner(&user(2), &task),
            Err(AuthzError::AccessDenied {
                actor_id: 2,
                resource: EntityKind::Task,
                resource_id: 10,
            })
        );
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::AccessDenied {
            actor_id: 3,
            resource: EntityKind::Task,
            resource_id: 9,
        };
        assert_eq!(err.to_string(), "User 3 does not own Task 9");
    }
}

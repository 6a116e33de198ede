/// Identity resolution
///
/// A verified bearer token only proves that someone once held an account
/// under an email address. [`resolve_identity`] looks that email up and
/// returns the live [`User`], which is then the acting identity for ownership
/// checks and for stamping task authorship.

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{normalize_email, User};
use crate::store::UserStore;

/// Authenticated principal extracted from a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub email: String,
}

impl Principal {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}

/// Maps a principal to its persisted user
///
/// # Errors
///
/// `IdentityNotFound` when no account has the principal's email, e.g. the
/// account was deleted after the token was issued.
pub async fn resolve_identity<S>(store: &S, principal: &Principal) -> ServiceResult<User>
where
    S: UserStore + ?Sized,
{
    let email = normalize_email(&principal.email);

    match store.find_user_by_email(&email).await? {
        Some(user) => Ok(user),
        None => {
            tracing::debug!(email = %email, "Token references unknown account");
            Err(ServiceError::IdentityNotFound { email })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::NewUser;
    use crate::store::memory::MemoryStore;

    async fn store_with_ada() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_user(NewUser {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "digest".to_string(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_resolves_existing_account() {
        let store = store_with_ada().await;

        let user = resolve_identity(&store, &Principal::new("Ada@Example.com"))
            .await
            .expect("account exists");
        assert_eq!(user.first_name, "Ada");
    }

    #[tokio::test]
    async fn test_unknown_email_is_identity_not_found() {
        let store = store_with_ada().await;

        let err = resolve_identity(&store, &Principal::new("ghost@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::IdentityNotFound { ref email } if email == "ghost@example.com"
        ));
    }
}

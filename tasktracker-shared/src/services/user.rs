use std::sync::Arc;
use tracing::info;

use crate::auth::authorization::require_owner;
use crate::auth::password::{CredentialHasher, PasswordError};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{normalize_email, NewUser, User, UserInput};
use crate::models::{EntityId, EntityKind};
use crate::store::Store;

/// Account management and login
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<User>> {
        Ok(self.store.list_users().await?)
    }

    pub async fn find_by_id(&self, id: EntityId) -> ServiceResult<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::User, id))
    }

    /// Registers a new account
    ///
    /// # Errors
    ///
    /// `ValidationFailed` for bad input, `Conflict` if the email is taken.
    pub async fn create(&self, input: UserInput) -> ServiceResult<User> {
        input.check()?;

        let record = self.to_record(input).await?;
        let user = self.store.insert_user(record).await?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Replaces every profile field and the password of the actor's own account
    pub async fn update_by_id(
        &self,
        actor: &User,
        id: EntityId,
        input: UserInput,
    ) -> ServiceResult<User> {
        input.check()?;
        let existing = self.find_by_id(id).await?;
        require_owner(actor, &existing)?;

        let record = self.to_record(input).await?;
        let user = self
            .store
            .update_user(id, record)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::User, id))?;

        info!(user_id = id, "User updated");
        Ok(user)
    }

    /// Deletes the actor's own account
    ///
    /// # Errors
    ///
    /// `Conflict` while a task still references the account as author or
    /// executor.
    pub async fn delete_by_id(&self, actor: &User, id: EntityId) -> ServiceResult<()> {
        let existing = self.find_by_id(id).await?;
        require_owner(actor, &existing)?;

        if !self.store.delete_user(id).await? {
            return Err(ServiceError::not_found(EntityKind::User, id));
        }

        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Checks a login attempt
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let email = normalize_email(email);

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            return Err(ServiceError::InvalidCredentials);
        };

        let password = password.to_string();
        let digest = user.password_hash.clone();
        let matches = self
            .with_hasher(move |hasher| hasher.verify(&password, &digest))
            .await?;

        if matches {
            Ok(user)
        } else {
            Err(ServiceError::InvalidCredentials)
        }
    }

    async fn to_record(&self, input: UserInput) -> ServiceResult<NewUser> {
        let password = input.password;
        let password_hash = self
            .with_hasher(move |hasher| hasher.hash(&password))
            .await?;

        Ok(NewUser {
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: normalize_email(&input.email),
            password_hash,
        })
    }

    /// Runs a hashing call on the blocking pool; Argon2 is CPU-bound
    async fn with_hasher<T, F>(&self, op: F) -> ServiceResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn CredentialHasher) -> Result<T, PasswordError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        let outcome = tokio::task::spawn_blocking(move || op(hasher.as_ref()))
            .await
            .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))?;

        Ok(outcome?)
    }
}

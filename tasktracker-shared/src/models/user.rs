/// User model
///
/// Users are identified externally by their email address, which must be
/// unique among live accounts. The credential digest is stored alongside the
/// profile but is never serialized.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     first_name VARCHAR(30) NOT NULL,
///     last_name VARCHAR(30) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EntityId;
use crate::error::ServiceResult;
use crate::validation;

/// User model representing an account
///
/// Passwords are stored as Argon2id digests, never in plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    pub id: EntityId,

    pub first_name: String,

    pub last_name: String,

    /// Email address (normalized to lowercase)
    ///
    /// Must be unique across all users
    pub email: String,

    /// Argon2id credential digest, never sent to clients
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Client input for creating or replacing a user
///
/// Missing fields deserialize as empty strings so every rule is reported
/// together instead of failing on the first absent key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 30,
        message = "First name needs to be between 1 and 30 characters long"
    ))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 30,
        message = "Last name needs to be between 1 and 30 characters long"
    ))]
    pub last_name: String,

    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    /// Plaintext password, hashed by the service before storage
    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 30,
        message = "Password needs to be between 3 and 30 characters long"
    ))]
    pub password: String,
}

impl UserInput {
    /// Checks every field rule and reports all violations at once
    pub fn check(&self) -> ServiceResult<()> {
        let mut violations = validation::collect_violations(self.validate());
        validation::require_not_blank(
            &mut violations,
            "firstName",
            &self.first_name,
            "First name is required",
        );
        validation::require_not_blank(
            &mut violations,
            "lastName",
            &self.last_name,
            "Last name is required",
        );
        validation::finish(violations)
    }
}

/// Store-level record for inserting or replacing a user
///
/// Produced by the service after validation and hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Normalizes an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

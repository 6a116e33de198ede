/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id credential hashing behind [`password::CredentialHasher`]
/// - [`jwt`]: HS256 access and refresh tokens keyed by email
/// - [`middleware`]: bearer-token middleware producing a [`identity::Principal`]
/// - [`identity`]: principal to live user resolution
/// - [`authorization`]: owner-only checks for users and tasks

pub mod authorization;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;

//! # Task Tracker Shared Library
//!
//! Domain types, persistence, authentication and the service layer used by
//! the task tracker API server.
//!
//! ## Module Organization
//!
//! - `models`: Users, statuses, labels and tasks
//! - `store`: Persistence boundary with PostgreSQL and in-memory backends
//! - `db`: Connection pool and migrations
//! - `auth`: Password hashing, JWTs, identity resolution and ownership checks
//! - `filter`: Task list filtering
//! - `services`: CRUD orchestration per entity
//! - `error`: Service error taxonomy
//! - `validation`: Input validation helpers

pub mod auth;
pub mod db;
pub mod error;
pub mod filter;
pub mod models;
pub mod services;
pub mod store;
pub mod validation;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

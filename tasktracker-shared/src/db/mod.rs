/// PostgreSQL plumbing
///
/// - `pool`: connection pool construction and connectivity checks
/// - `migrations`: embedded schema migrations
///
/// The queries themselves live in [`crate::store::postgres`].

pub mod migrations;
pub mod pool;

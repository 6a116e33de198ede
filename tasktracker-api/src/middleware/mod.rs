/// Request-level authentication helpers
///
/// - `auth`: the `CurrentUser` extractor that turns a bearer token into a live
///   account

pub mod auth;

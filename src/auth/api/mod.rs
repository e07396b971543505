//! HTTP interface

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::{bearer_token, require_auth};
pub use routes::create_auth_routes;

//! Route table

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::{handlers, middleware::require_auth};
use crate::auth::AuthService;

pub fn create_auth_routes(service: Arc<AuthService>) -> Router {
    // everything here sits behind the auth gate
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route("/users", get(handlers::list_users))
        .route_layer(middleware::from_fn_with_state(service.clone(), require_auth));

    Router::new()
        .route("/", get(handlers::welcome))
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .merge(protected)
        .with_state(service)
}

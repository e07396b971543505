//! Request handlers

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{HeaderMap, StatusCode},
    Extension,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::auth::{
    errors::{ApiError, AuthError},
    types::*,
    AuthService,
};
use crate::i18n::{self, Locale};

/// Unwrap a JSON body, turning extractor rejections into a localized 400
fn parse_body<T>(body: Result<Json<T>, JsonRejection>, locale: Locale) -> Result<T, ApiError> {
    body.map(|Json(req)| req)
        .map_err(|rejection| AuthError::MalformedBody(rejection.body_text()).localized(locale))
}

pub async fn welcome(headers: HeaderMap) -> Json<Value> {
    let locale = Locale::from_headers(&headers);
    Json(json!({ "message": i18n::message("welcome", locale) }))
}

pub async fn signup(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let locale = Locale::from_headers(&headers);
    let req = parse_body(body, locale)?;

    info!("API: signup request received");
    let session = service.register(req).await.map_err(|e| e.localized(locale))?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            success: true,
            message: i18n::message("signup-success", locale),
            token: session.token,
        }),
    ))
}

pub async fn login(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let locale = Locale::from_headers(&headers);
    let req = parse_body(body, locale)?;

    info!("API: login request received");
    let session = service.login(req).await.map_err(|e| e.localized(locale))?;

    Ok(Json(LoginResponse {
        success: true,
        message: i18n::message("login-success", locale),
        token: session.token,
    }))
}

/// Identity injected by the auth gate
pub async fn me(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}

/// Accounts with the default role, as public identities only
pub async fn list_users(
    State(service): State<Arc<AuthService>>,
    Extension(identity): Extension<Identity>,
    headers: HeaderMap,
) -> Result<Json<Vec<Identity>>, ApiError> {
    let locale = Locale::from_headers(&headers);

    info!("API: user listing requested by id={}", identity.id);
    let users = service
        .users_with_role(DEFAULT_ROLE)
        .await
        .map_err(|e| e.localized(locale))?;

    Ok(Json(users.iter().map(Identity::from).collect()))
}

use anyhow::{Context, Result};
use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderMap, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::{limit::ConcurrencyLimitLayer, timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::auth::{create_auth_routes, ApiError, AuthError, AuthService};
use crate::config::AppEnvConfig;
use crate::i18n::Locale;
use crate::server_config::*;

pub struct AuthServer {
    pub config: AppEnvConfig,
    pub service: Arc<AuthService>,
}

impl AuthServer {
    pub fn new(config: AppEnvConfig, service: Arc<AuthService>) -> Self {
        Self { config, service }
    }

    pub fn create_router(&self) -> Result<Router> {
        let cors = cors_layer(&self.config.cors_allow_origin)?;

        Ok(create_auth_routes(self.service.clone())
            .layer(
                ServiceBuilder::new()
                    // Convert middleware errors (timeout/overload) into HTTP responses
                    .layer(HandleErrorLayer::new(handle_layer_error))
                    .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENCY))
                    .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
                    .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                    .layer(TraceLayer::new_for_http()),
            )
            .layer(cors))
    }

    pub async fn start(self) -> Result<()> {
        let app = self.create_router()?;
        let addr = self.config.bind_addr();

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("Server listening on {}", addr);

        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// Timeout and overload failures from the tower stack, in the same body
/// shape as every other error.
async fn handle_layer_error(headers: HeaderMap, err: BoxError) -> ApiError {
    let error = if err.is::<tower::timeout::error::Elapsed>() {
        AuthError::RequestTimeout
    } else {
        AuthError::Overloaded
    };
    warn!("Request aborted by service limits: {}", err);

    error.localized(Locale::from_headers(&headers))
}

/// `*` allows any origin without credentials; otherwise an exact list.
pub fn cors_layer(origins: &str) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
        ])
        .max_age(CORS_MAX_AGE);

    if origins.trim() == "*" {
        return Ok(layer.allow_origin(AllowOrigin::any()));
    }

    let list = origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| HeaderValue::from_str(s).with_context(|| format!("Invalid CORS origin: {}", s)))
        .collect::<Result<Vec<HeaderValue>>>()?;

    Ok(layer.allow_origin(AllowOrigin::list(list)).allow_credentials(true))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

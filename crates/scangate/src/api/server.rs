//! API server setup and configuration.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::{GatewayConfig, Result, backend::BackendClient, error::ScangateError};

use super::{
    handlers::{health_handler, ocr_handler, scan_handler},
    types::{ApiSizeLimits, ApiState},
};

/// Parse size limits from environment variables.
///
/// Reads `SCANGATE_MAX_REQUEST_BODY_BYTES` first, then the MB-based
/// `SCANGATE_MAX_UPLOAD_SIZE_MB`, falling back to the 100 MB default when
/// neither is set or a value is invalid.
fn parse_size_limits_from_env() -> ApiSizeLimits {
    if let Ok(value) = std::env::var("SCANGATE_MAX_REQUEST_BODY_BYTES") {
        match value.parse::<usize>() {
            Ok(bytes) if bytes > 0 => {
                tracing::info!("Upload size limit configured from environment: {} bytes", bytes);
                return ApiSizeLimits::new(bytes);
            }
            _ => {
                tracing::warn!(
                    "Failed to parse SCANGATE_MAX_REQUEST_BODY_BYTES='{}', must be a valid usize",
                    value
                );
            }
        }
    }

    if let Ok(value) = std::env::var("SCANGATE_MAX_UPLOAD_SIZE_MB") {
        match value.parse::<usize>() {
            Ok(mb) if mb > 0 => {
                tracing::info!("Upload size limit configured from environment: {} MB", mb);
                return ApiSizeLimits::from_mb(mb);
            }
            _ => {
                tracing::warn!(
                    "Failed to parse SCANGATE_MAX_UPLOAD_SIZE_MB='{}', must be a valid usize",
                    value
                );
            }
        }
    }

    let limits = ApiSizeLimits::default();
    tracing::info!(
        "Upload size limit: 100 MB (default, {} bytes) - Configure with SCANGATE_MAX_REQUEST_BODY_BYTES or SCANGATE_MAX_UPLOAD_SIZE_MB",
        limits.max_request_body_bytes
    );
    limits
}

/// Build the CORS layer from `SCANGATE_CORS_ORIGINS`.
///
/// Defaults to allowing all origins for development convenience; set the
/// variable to a comma-separated origin list for production.
fn cors_layer_from_env() -> CorsLayer {
    if let Ok(origins_str) = std::env::var("SCANGATE_CORS_ORIGINS") {
        let origins: Vec<_> = origins_str
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();

        if !origins.is_empty() {
            tracing::info!("CORS configured with {} explicit allowed origin(s)", origins.len());
            return CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any);
        }
        tracing::warn!("SCANGATE_CORS_ORIGINS set but empty/invalid - falling back to permissive CORS");
    } else {
        tracing::warn!(
            "CORS configured to allow all origins (default). For production, set SCANGATE_CORS_ORIGINS to a \
             comma-separated list of allowed origins"
        );
    }
    CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
}

/// Create the gateway router with all routes configured.
///
/// Public to allow embedding the gateway in a larger application.
pub fn create_router(config: GatewayConfig) -> Router {
    create_router_with_limits(config, parse_size_limits_from_env())
}

/// Create the gateway router with custom size limits.
pub fn create_router_with_limits(config: GatewayConfig, limits: ApiSizeLimits) -> Router {
    let state = ApiState {
        backend: Arc::new(BackendClient::new(config.backend_base())),
    };

    Router::new()
        .route("/scan", post(scan_handler))
        .route("/ocr", post(ocr_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(limits.max_request_body_bytes))
        .layer(RequestBodyLimitLayer::new(limits.max_request_body_bytes))
        .layer(cors_layer_from_env())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway server.
///
/// Size limits come from the environment (see [`ApiSizeLimits`]); bind
/// address and backend URL come from `config`.
pub async fn serve(config: GatewayConfig) -> Result<()> {
    let limits = parse_size_limits_from_env();
    serve_with_limits(config, limits).await
}

/// Start the gateway server with explicit size limits.
pub async fn serve_with_limits(config: GatewayConfig, limits: ApiSizeLimits) -> Result<()> {
    let ip: IpAddr = config
        .host
        .parse()
        .map_err(|e| ScangateError::validation(format!("Invalid host address: {}", e)))?;

    let addr = SocketAddr::new(ip, config.port);
    tracing::info!(
        "Starting Scangate gateway on http://{} (backend: {})",
        addr,
        config.backend_base()
    );

    let app = create_router_with_limits(config, limits);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(ScangateError::Io)?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ScangateError::Other(e.to_string()))?;

    Ok(())
}

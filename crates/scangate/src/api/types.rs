//! API request and response types.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::backend::BackendClient;

/// API server size limit configuration.
///
/// Axum enforces a request body limit either way, so the gateway makes it
/// explicit and configurable rather than inheriting the framework default.
/// Both limits default to 100 MB.
///
/// Overridable via environment variables:
///
/// ```bash
/// # In bytes:
/// export SCANGATE_MAX_REQUEST_BODY_BYTES=104857600     # 100 MB
///
/// # Or in MB:
/// export SCANGATE_MAX_UPLOAD_SIZE_MB=100
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ApiSizeLimits {
    /// Maximum size of the entire request body in bytes.
    pub max_request_body_bytes: usize,
}

impl Default for ApiSizeLimits {
    fn default() -> Self {
        Self {
            max_request_body_bytes: 100 * 1024 * 1024,
        }
    }
}

impl ApiSizeLimits {
    /// Create new size limits with a custom byte value.
    pub fn new(max_request_body_bytes: usize) -> Self {
        Self { max_request_body_bytes }
    }

    /// Create size limits from an MB value (convenience method).
    pub fn from_mb(max_request_body_mb: usize) -> Self {
        Self {
            max_request_body_bytes: max_request_body_mb * 1024 * 1024,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Gateway version
    pub version: String,
}

/// Error response returned for every failed gateway request.
///
/// `details` carries the backend's raw diagnostic text when one exists; for
/// the missing-file client error there is nothing to add and the field is
/// omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error label
    pub error: String,
    /// Raw diagnostic text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API server state.
///
/// The gateway holds no per-request state; the only shared piece is the
/// outbound client for the processing backend.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Client for the processing backend.
    pub backend: Arc<BackendClient>,
}

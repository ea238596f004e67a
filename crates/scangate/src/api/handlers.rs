//! API request handlers.

use axum::{
    Json,
    body::Body,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::Response,
};

use super::{
    error::ApiError,
    types::{ApiState, HealthResponse},
};
use crate::{
    backend::{BackendReply, UploadField},
    error::ScangateError,
    types::Mode,
};

/// Rectify endpoint handler.
///
/// POST /scan
pub async fn scan_handler(State(state): State<ApiState>, multipart: Multipart) -> Result<Response, ApiError> {
    forward(Mode::Rectify, state, multipart).await
}

/// Text extraction endpoint handler.
///
/// POST /ocr
pub async fn ocr_handler(State(state): State<ApiState>, multipart: Multipart) -> Result<Response, ApiError> {
    forward(Mode::ExtractText, state, multipart).await
}

/// Shared forwarding logic for both mode endpoints.
///
/// Accepts multipart form data with a `file` field holding the document
/// image. All received fields are re-packaged and forwarded to the backend
/// unmodified; the request is rejected up front, with no backend call, when
/// the `file` field is absent.
///
/// On backend success the payload is relayed byte-identical with the
/// backend's `Content-Type` (mandatory) and `Content-Disposition` (optional)
/// copied verbatim. On backend failure the backend's status code and raw
/// diagnostic text are relayed inside an [`super::types::ErrorResponse`].
///
/// Request body size is enforced at the router layer via `DefaultBodyLimit`
/// and `RequestBodyLimitLayer`; oversized uploads are rejected with HTTP 413.
async fn forward(mode: Mode, state: ApiState, mut multipart: Multipart) -> Result<Response, ApiError> {
    let mut fields = Vec::new();
    let mut has_file = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadMultipart(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        let file_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadMultipart(e.to_string()))?;

        if name == "file" {
            has_file = true;
        }

        fields.push(UploadField {
            name,
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    if !has_file {
        return Err(ApiError::NoFile);
    }

    let reply = state.backend.submit(mode, fields).await.map_err(|err| match err {
        ScangateError::Transport { message, .. } => {
            tracing::warn!(%mode, %message, "backend unreachable");
            ApiError::Transport {
                label: mode.error_label(),
                message,
            }
        }
        ScangateError::ProtocolViolation(details) => {
            tracing::error!(%mode, %details, "backend violated response contract");
            ApiError::ProtocolViolation(details)
        }
        other => ApiError::Internal(other),
    })?;

    match reply {
        BackendReply::Failure { status, details } => Err(ApiError::BackendFailed {
            label: mode.error_label(),
            status,
            details,
        }),
        BackendReply::Success {
            content_type,
            content_disposition,
            body,
        } => {
            let mut response = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type);
            if let Some(disposition) = content_disposition {
                response = response.header(header::CONTENT_DISPOSITION, disposition);
            }
            response
                .body(Body::from(body))
                .map_err(|e| ApiError::Internal(ScangateError::Other(e.to_string())))
        }
    }
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

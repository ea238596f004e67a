//! API error responses.
//!
//! Maps the gateway's error taxonomy onto HTTP responses:
//!
//! - client error (no file, malformed multipart) -> 400, no backend call
//! - backend failure -> the backend's own status code, its diagnostic text
//!   relayed unmodified
//! - transport failure -> 502, generic failed-request outcome
//! - protocol violation -> 502, the backend broke its success contract

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;
use crate::error::ScangateError;

/// Error type returned by gateway handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The multipart request carried no `file` field.
    NoFile,
    /// The multipart body could not be read.
    BadMultipart(String),
    /// The backend responded with a failure status; relayed verbatim.
    BackendFailed {
        label: &'static str,
        status: u16,
        details: String,
    },
    /// The backend could not be reached at all.
    Transport { label: &'static str, message: String },
    /// The backend answered 2xx but violated its response contract.
    ProtocolViolation(String),
    /// Anything else; not expected on the request path.
    Internal(ScangateError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NoFile => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "No file uploaded".to_string(),
                    details: None,
                },
            ),
            ApiError::BadMultipart(details) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Malformed multipart request".to_string(),
                    details: Some(details),
                },
            ),
            ApiError::BackendFailed { label, status, details } => (
                // The backend's status code is reused verbatim.
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorResponse {
                    error: label.to_string(),
                    details: Some(details),
                },
            ),
            ApiError::Transport { label, message } => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    error: label.to_string(),
                    details: Some(message),
                },
            ),
            ApiError::ProtocolViolation(details) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    error: "backend response violated protocol".to_string(),
                    details: Some(details),
                },
            ),
            ApiError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "internal gateway error".to_string(),
                    details: Some(err.to_string()),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_no_file_is_400() {
        assert_eq!(status_of(ApiError::NoFile), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_backend_failure_reuses_status() {
        let err = ApiError::BackendFailed {
            label: "backend scan failed",
            status: 503,
            details: "overloaded".to_string(),
        };
        assert_eq!(status_of(err), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_invalid_backend_status_falls_back_to_502() {
        let err = ApiError::BackendFailed {
            label: "backend scan failed",
            status: 42,
            details: String::new(),
        };
        assert_eq!(status_of(err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_transport_is_502() {
        let err = ApiError::Transport {
            label: "backend OCR failed",
            message: "connection refused".to_string(),
        };
        assert_eq!(status_of(err), StatusCode::BAD_GATEWAY);
    }
}

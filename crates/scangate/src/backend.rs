//! Outbound forwarding to the processing backend.
//!
//! The gateway is a transparent relay: it re-packages the form fields it
//! received into an equivalent multipart body and issues exactly one POST to
//! the backend's mode endpoint. File bytes are never inspected or modified,
//! and a backend failure status travels back as data so the API layer can
//! replay it verbatim.

use reqwest::multipart::{Form, Part};

use crate::error::{Result, ScangateError};
use crate::types::Mode;

/// One form field captured from the inbound multipart request.
#[derive(Debug, Clone)]
pub struct UploadField {
    /// Form field name (`file` for the part of interest).
    pub name: String,
    /// Client-supplied file name, if the part carried one.
    pub file_name: Option<String>,
    /// Part-level MIME type, if the part carried one.
    pub content_type: Option<String>,
    /// Raw field bytes.
    pub bytes: Vec<u8>,
}

/// The backend's answer to one forwarded upload.
///
/// A non-2xx response is not an error here: the contract is to relay the
/// backend's status code and diagnostic text unmodified, so it is modeled as
/// an ordinary variant. Only connection-level failures and contract
/// violations surface as [`ScangateError`].
#[derive(Debug)]
pub enum BackendReply {
    /// 2xx response: an opaque binary payload plus its content metadata.
    Success {
        /// Mandatory on success; its absence is a protocol violation.
        content_type: String,
        /// Propagated verbatim when the backend supplies one.
        content_disposition: Option<String>,
        body: Vec<u8>,
    },
    /// Non-2xx response: the backend's status code and raw body text.
    Failure { status: u16, details: String },
}

/// HTTP client for the processing backend.
///
/// Stateless across requests; one call to [`BackendClient::submit`] maps to
/// exactly one outbound request with no retry and no timeout override beyond
/// transport defaults.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Backend base URL this client forwards to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forward the captured form fields to the backend endpoint for `mode`.
    pub async fn submit(&self, mode: Mode, fields: Vec<UploadField>) -> Result<BackendReply> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), mode.backend_path());

        let mut form = Form::new();
        for field in fields {
            let mut part = Part::bytes(field.bytes);
            if let Some(file_name) = field.file_name {
                part = part.file_name(file_name);
            }
            if let Some(content_type) = field.content_type {
                part = part.mime_str(&content_type).map_err(|e| {
                    ScangateError::validation_with_source(format!("Invalid part content type in field '{}'", field.name), e)
                })?;
            }
            form = form.part(field.name, part);
        }

        tracing::debug!(%mode, url = %url, "forwarding upload to backend");

        let response = self.http.post(&url).multipart(form).send().await.map_err(|e| {
            ScangateError::transport_with_source(format!("Backend unreachable at {url}"), e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            tracing::debug!(%mode, status = status.as_u16(), "backend reported failure");
            return Ok(BackendReply::Failure {
                status: status.as_u16(),
                details,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or_else(|| {
                ScangateError::ProtocolViolation(format!("Backend {} response is missing Content-Type", mode.backend_path()))
            })?;

        let content_disposition = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = response.bytes().await?.to_vec();

        Ok(BackendReply::Success {
            content_type,
            content_disposition,
            body,
        })
    }
}

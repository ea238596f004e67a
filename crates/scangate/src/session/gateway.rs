//! The session's view of the forwarding gateway.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::error::{Result, ScangateError};
use crate::types::{Mode, SelectedFile};

/// The gateway's answer to one upload, as seen by the session.
///
/// A gateway that *responded* with a failure status is ordinary data; only a
/// connection-level failure to reach the gateway at all travels as `Err`, and
/// the session treats both identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// 200 response: the processing result and its content type.
    Success { content_type: String, body: Vec<u8> },
    /// Failure response: status code and diagnostic detail.
    Failure { status: u16, details: String },
}

/// One upload round trip against the forwarding gateway.
///
/// Abstracted as a trait so session flows can be exercised against a scripted
/// gateway in tests.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn submit(&self, mode: Mode, file: &SelectedFile) -> Result<GatewayOutcome>;
}

/// HTTP implementation over the gateway's `/scan` and `/ocr` endpoints.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn submit(&self, mode: Mode, file: &SelectedFile) -> Result<GatewayOutcome> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), mode.gateway_path());

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(|e| ScangateError::validation_with_source("Invalid file media type", e))?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ScangateError::transport_with_source(format!("Gateway unreachable at {url}"), e))?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Ok(GatewayOutcome::Failure {
                status: status.as_u16(),
                details,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or_else(|| ScangateError::ProtocolViolation("Gateway response is missing Content-Type".to_string()))?;

        let body = response.bytes().await?.to_vec();

        Ok(GatewayOutcome::Success { content_type, body })
    }
}

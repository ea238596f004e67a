//! Scangate - Upload-Forwarding Gateway for Document Scanning
//!
//! Scangate sits between a user-facing client and an opaque document
//! processing backend. It accepts a single-file multipart upload, forwards it
//! unmodified to the backend's scan or OCR endpoint, and relays the backend's
//! response back to the caller: the binary artifact with its content metadata
//! on success, or the backend's diagnostic text with its original status code
//! on failure.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scangate::api::serve;
//! use scangate::GatewayConfig;
//!
//! #[tokio::main]
//! async fn main() -> scangate::Result<()> {
//!     let config = GatewayConfig::default();
//!     serve(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **API Module** (`api`): Axum router exposing the two mode endpoints
//!   (`POST /scan`, `POST /ocr`) plus a health check
//! - **Backend Module** (`backend`): the single outbound forwarding call to
//!   the processing service
//! - **Session Module** (`session`): the client-side state machine that
//!   drives uploads and presents results
//! - **Config Module** (`config`): TOML discovery and environment overrides
//!
//! The gateway owns no state across requests; one inbound request maps to at
//! most one outbound call. The session owns all client-held state and permits
//! at most one request in flight.

#![deny(unsafe_code)]

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use backend::{BackendClient, BackendReply, UploadField};
pub use config::GatewayConfig;
pub use error::{Result, ScangateError};
pub use session::{
    Gateway, GatewayOutcome, HttpGateway, RequestFailure, ResourceRef, ResourceStore, Session, SessionState,
};
pub use types::{Mode, ProcessingResult, SelectedFile, suggested_download_name};

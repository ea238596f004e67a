//! Client-facing HTTP surface of the forwarding gateway.
//!
//! An Axum-based server exposing the two mode endpoints. Both share one
//! parameterized handler; they differ only in the backend path they forward
//! to and the error label attached to backend failures.
//!
//! # Endpoints
//!
//! - `POST /scan` - Forward a multipart upload (field `file`) for rectification
//! - `POST /ocr` - Forward a multipart upload (field `file`) for text extraction
//! - `GET /health` - Health check endpoint
//!
//! # Examples
//!
//! ## Starting the server
//!
//! ```no_run
//! use scangate::{GatewayConfig, api::serve};
//!
//! #[tokio::main]
//! async fn main() -> scangate::Result<()> {
//!     serve(GatewayConfig::default()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Embedding the router in your app
//!
//! ```no_run
//! use axum::Router;
//! use scangate::{GatewayConfig, api::create_router};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = create_router(GatewayConfig::default());
//!     let app = Router::new().nest("/api", gateway);
//!     // ...
//! }
//! ```
//!
//! # cURL Examples
//!
//! ```bash
//! # Rectify a document photo
//! curl -F "file=@photo.png" -o photo_scanned.jpg http://localhost:8000/scan
//!
//! # Extract text
//! curl -F "file=@note.jpg" http://localhost:8000/ocr
//!
//! # Health check
//! curl http://localhost:8000/health
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{create_router, create_router_with_limits, serve, serve_with_limits};
pub use types::{ApiSizeLimits, ApiState, ErrorResponse, HealthResponse};

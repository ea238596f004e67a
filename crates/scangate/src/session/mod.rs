//! Client-side session machinery.
//!
//! A tagged state machine ([`Session`]) that holds the selected file and the
//! outcome of the last processing request, a [`Gateway`] trait for issuing
//! the upload to the forwarding gateway, and a [`ResourceStore`] of
//! explicitly released handles backing the display/download affordances.
//!
//! The state machine enforces the session invariants structurally:
//!
//! - selecting a new file clears any prior result and download name
//! - at most one request is in flight; triggering while busy is a no-op
//! - a result is only visible after a fully successful round trip
//! - superseded resources are released before replacement

mod gateway;
mod resources;
mod state;

pub use gateway::{Gateway, GatewayOutcome, HttpGateway};
pub use resources::{ResourceData, ResourceRef, ResourceStore};
pub use state::{RequestFailure, Session, SessionResult, SessionState};

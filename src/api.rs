mod client;
pub mod ingest;
pub mod vrm;

use http::StatusCode;

pub use self::client::{ensure_success, new_agent, read_body};

/// Failure of a single outbound HTTP call.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error(transparent)]
    Transport(#[from] ureq::Error),
}

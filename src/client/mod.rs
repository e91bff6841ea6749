//! HTTP client for the analysis, Word conversion and simplify services
//!
//! Uses ureq (sync HTTP); no async runtime needed. Endpoints come from
//! [`crate::config::Endpoints`]. Failures are reported as [`ApiError`]; the
//! only call that swallows failure is [`ServiceClient::simplify`], which
//! falls back to the input text.

mod service;

pub use service::{ServiceClient, SimplifyRequest, SimplifyResponse, MAX_DOCUMENT_BYTES};

use thiserror::Error;

/// Errors from calls to the remote services
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Could not reach {url}: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Failed to parse service response: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

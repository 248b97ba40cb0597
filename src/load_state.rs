//! Shared dataset load state and transport errors
//!
//! Used by both WASM and native loaders.

use thiserror::Error;

/// Dataset transport state
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Request failed: {0}")]
    Http(String),
    #[error("Server answered {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Dataset is not valid UTF-8")]
    Encoding,
    #[error("Transport unavailable: {0}")]
    Runtime(String),
}

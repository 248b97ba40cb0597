//! Native dataset loader
//!
//! Fetches the dataset body once in a background thread running a tokio
//! runtime, and hands it over through a channel. Local paths are read with
//! `tokio::fs`, http(s) sources with `reqwest`.

use crate::core::config::is_remote;
use crate::load_state::{LoadError, LoadState};
use parking_lot::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use tracing::{error, info};

/// One-shot loader; the body arrives on `rx` at most once
pub struct DatasetLoader {
    pub rx: Receiver<String>,
    pub state: Arc<Mutex<LoadState>>,
}

impl DatasetLoader {
    /// Start loading `source` in the background.
    pub fn spawn(source: &str) -> Self {
        let (tx, rx): (Sender<String>, Receiver<String>) = mpsc::channel();
        let state = Arc::new(Mutex::new(LoadState::Loading));

        let source = source.to_string();
        let state_clone = state.clone();

        std::thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!(error = %e, "Failed to create tokio runtime");
                    *state_clone.lock() = LoadState::Failed(LoadError::Runtime(e.to_string()).to_string());
                    return;
                }
            };
            rt.block_on(async move {
                Self::run(&source, tx, state_clone).await;
            });
        });

        Self { rx, state }
    }

    async fn run(source: &str, tx: Sender<String>, state: Arc<Mutex<LoadState>>) {
        info!(source, "Loading dataset");
        match fetch(source).await {
            Ok(body) => {
                info!(bytes = body.len(), "Dataset fetched");
                // Ready only once the body is in the channel
                if tx.send(body).is_ok() {
                    *state.lock() = LoadState::Ready;
                }
            }
            Err(e) => {
                error!(error = %e, source, "Dataset load failed");
                *state.lock() = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Non-blocking poll for the body.
    pub fn try_take(&self) -> Option<String> {
        self.rx.try_recv().ok()
    }
}

/// Read a dataset body from a local path or an http(s) URL.
pub async fn fetch(source: &str) -> Result<String, LoadError> {
    if is_remote(source) {
        let response = reqwest::get(source)
            .await
            .map_err(|e| LoadError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
                url: source.to_string(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LoadError::Http(e.to_string()))?;
        String::from_utf8(bytes.to_vec()).map_err(|_| LoadError::Encoding)
    } else {
        let bytes = tokio::fs::read(source).await.map_err(|source_err| LoadError::Io {
            path: source.to_string(),
            source: source_err,
        })?;
        String::from_utf8(bytes).map_err(|_| LoadError::Encoding)
    }
}

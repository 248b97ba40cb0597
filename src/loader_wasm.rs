//! WASM dataset loader using the browser's fetch

use crate::load_state::{LoadError, LoadState};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// Slot the fetch task fills once; the app takes it in update()
pub type BodySlot = Rc<RefCell<Option<String>>>;

/// Start fetching `url`; the body lands in `slot`.
pub fn spawn(url: &str, slot: BodySlot, state: Rc<RefCell<LoadState>>) {
    let url = url.to_string();
    info!(url = %url, "Loading dataset");

    wasm_bindgen_futures::spawn_local(async move {
        match fetch_text(&url).await {
            Ok(body) => {
                info!(bytes = body.len(), "Dataset fetched");
                *slot.borrow_mut() = Some(body);
                *state.borrow_mut() = LoadState::Ready;
            }
            Err(e) => {
                error!(error = %e, url = %url, "Dataset load failed");
                *state.borrow_mut() = LoadState::Failed(e.to_string());
            }
        }
    });
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let window = web_sys::window().ok_or_else(|| LoadError::Runtime("no window".into()))?;

    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| LoadError::Http(format!("{e:?}")))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| LoadError::Http("fetch did not yield a Response".into()))?;
    if !response.ok() {
        return Err(LoadError::Status {
            status: response.status(),
            url: url.to_string(),
        });
    }

    let text = response
        .text()
        .map_err(|e| LoadError::Http(format!("{e:?}")))?;
    JsFuture::from(text)
        .await
        .map_err(|e| LoadError::Http(format!("{e:?}")))?
        .as_string()
        .ok_or(LoadError::Encoding)
}

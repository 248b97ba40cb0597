//! yearsweep - geolocated events replayed against a sweeping virtual year
//!
//! Loads a delimited event dataset, projects it onto a Web Mercator map and
//! animates it: a virtual clock sweeps repeatedly over the year span and
//! each point blooms when its event "occurs", then contracts and fades.
//!
//! - `core`: parser, attribute derivation, clock, shading, picking (no GUI)
//! - `app` / `points`: egui dashboard and its wgpu point pipeline
//! - `loader_native` / `loader_wasm`: one-shot dataset transport

pub mod core;

#[cfg(any(feature = "gui", feature = "cli"))]
pub mod load_state;
#[cfg(any(feature = "gui", feature = "cli"))]
pub mod time;

#[cfg(all(not(target_arch = "wasm32"), any(feature = "native", feature = "cli")))]
pub mod loader_native;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod loader_wasm;

#[cfg(feature = "gui")]
pub mod app;
#[cfg(feature = "gui")]
pub mod points;
#[cfg(feature = "gui")]
pub mod theme;

#[cfg(feature = "gui")]
pub use app::SweepApp;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod web {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::app::SweepApp;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        // Initialize tracing for browser console
        tracing_wasm::set_as_global_default();

        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("canvas"))
            .ok_or_else(|| JsValue::from_str("no canvas element"))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let web_options = eframe::WebOptions::default();

        wasm_bindgen_futures::spawn_local(async move {
            let started = eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(|cc| Ok(Box::new(SweepApp::new(cc)))),
                )
                .await;
            if let Err(e) = started {
                tracing::error!(error = ?e, "Failed to start eframe");
            }
        });

        Ok(())
    }
}

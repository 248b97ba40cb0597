//! Wall-clock source for the virtual clock
//!
//! Seconds since an arbitrary per-process origin. Only differences matter:
//! the clock subtracts its own start timestamp.

#[cfg(target_arch = "wasm32")]
pub fn now_seconds() -> f64 {
    // performance.now() is milliseconds since page load
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64()
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn monotonic() {
        let a = now_seconds();
        let b = now_seconds();
        assert!(b >= a);
        assert!(a >= 0.0);
    }
}

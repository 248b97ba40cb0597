//! Virtual clock that sweeps repeatedly across the dataset's year span
//!
//! Wall-clock seconds go in, a simulated year comes out:
//! `min_year + (rate * (now - start) / time_unit) mod span`.

use serde::Deserialize;
use tracing::info;

/// Clock parameters
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub min_year: f64,
    pub max_year: f64,
    /// Simulated years advanced per `time_unit` of wall clock
    pub rate_per_second: f64,
    /// Wall-clock seconds per rate unit
    pub time_unit: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            min_year: 1850.0,
            max_year: 2015.0,
            rate_per_second: 10.0,
            time_unit: 6.0,
        }
    }
}

impl ClockConfig {
    pub fn span(&self) -> f64 {
        self.max_year - self.min_year
    }
}

#[derive(Clone, Debug)]
pub struct VirtualClock {
    config: ClockConfig,
    /// Wall-clock seconds at which the sweep began
    start: f64,
}

impl VirtualClock {
    pub fn new(config: ClockConfig, start: f64) -> Self {
        Self { config, start }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Restart the sweep from `min_year` at wall-clock time `now`.
    pub fn restart(&mut self, now: f64) {
        info!(now, "Clock restarted");
        self.start = now;
    }

    /// Simulated years elapsed since start, before wrapping
    pub fn elapsed_years(&self, now: f64) -> f64 {
        self.config.rate_per_second * (now - self.start) / self.config.time_unit
    }

    /// Current simulated year, always in `[min_year, max_year)`.
    ///
    /// Degenerate configurations (empty span, non-finite input) pin the
    /// clock at `min_year`.
    pub fn current_year(&self, now: f64) -> f64 {
        let span = self.config.span();
        let elapsed = self.elapsed_years(now);
        if !(span > 0.0) || !elapsed.is_finite() {
            return self.config.min_year;
        }
        let offset = elapsed.rem_euclid(span);
        // rem_euclid can round up to exactly `span` for tiny negative input
        let offset = if offset >= span { 0.0 } else { offset };
        self.config.min_year + offset
    }

    /// Wall-clock seconds for one full sweep, `None` if the clock never moves.
    pub fn period(&self) -> Option<f64> {
        let period = self.config.span() / self.config.rate_per_second * self.config.time_unit;
        (period.is_finite() && period > 0.0).then_some(period)
    }
}

//! Per-event render attribute derivation
//!
//! Runs once per dataset change over the whole event set; the renderer only
//! ever reads the resulting buffer.

use serde::Deserialize;

use super::data::{Event, RenderPoint};

/// Tunable size curve: `base + scale * clamp(magnitude / normalizer, 0, 1)`
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SizeModel {
    /// Diameter of a zero-magnitude point, in screen points
    pub base: f32,
    /// Extra diameter reached at `normalizer` and above
    pub scale: f32,
    /// Magnitude at which growth saturates
    pub normalizer: f64,
}

impl Default for SizeModel {
    fn default() -> Self {
        Self {
            base: 16.0,
            scale: 32.0,
            normalizer: 200_000.0,
        }
    }
}

impl SizeModel {
    /// Footprint diameter for a magnitude.
    pub fn size(&self, magnitude: f64) -> f32 {
        let t = if self.normalizer > 0.0 {
            (magnitude / self.normalizer).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.base + self.scale * t as f32
    }

    /// Derive the render attributes of a single event.
    pub fn derive(&self, event: &Event) -> RenderPoint {
        RenderPoint {
            position: event.position(),
            size: self.size(event.magnitude()),
            year: event.year(),
        }
    }

    /// Rebuild the full render buffer, preserving event order.
    pub fn derive_all(&self, events: &[Event]) -> Vec<RenderPoint> {
        events.iter().map(|e| self.derive(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_magnitude_is_base() {
        let m = SizeModel::default();
        assert_eq!(m.size(0.0), m.base);
    }

    #[test]
    fn saturates_at_normalizer() {
        let m = SizeModel::default();
        assert_eq!(m.size(200_000.0), m.base + m.scale);
        assert_eq!(m.size(9_000_000.0), m.base + m.scale);
    }

    #[test]
    fn monotonic_between() {
        let m = SizeModel::default();
        let mut prev = m.size(0.0);
        for step in 1..=40 {
            let s = m.size(step as f64 * 5_000.0);
            assert!(s >= prev);
            prev = s;
        }
    }

    #[test]
    fn half_normalizer_is_half_scale() {
        let m = SizeModel::default();
        assert!((m.size(100_000.0) - (m.base + m.scale * 0.5)).abs() < 1e-4);
    }

    #[test]
    fn derive_inherits_position_and_year() {
        let m = SizeModel {
            base: 8.0,
            scale: 18.0,
            normalizer: 200_000.0,
        };
        let e = Event::new([10.0, -20.0], 50_000.0, 1933).unwrap();
        let p = m.derive(&e);
        assert_eq!(p.position, [10.0, -20.0]);
        assert_eq!(p.year, 1933);
        assert!((p.size - 12.5).abs() < 1e-4);
    }

    #[test]
    fn derive_is_deterministic_and_ordered() {
        let m = SizeModel::default();
        let events: Vec<Event> = (0..5)
            .filter_map(|i| Event::new([i as f64, 0.0], i as f64 * 1000.0, 1900 + i))
            .collect();
        let a = m.derive_all(&events);
        let b = m.derive_all(&events);
        assert_eq!(a, b);
        assert_eq!(a.iter().map(|p| p.year).collect::<Vec<_>>(), vec![1900, 1901, 1902, 1903, 1904]);
    }
}

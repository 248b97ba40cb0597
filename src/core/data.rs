//! Event records and the render buffer derived from them
//!
//! These structures are platform-agnostic (no GUI or GPU deps) and shared
//! between the dashboard and the CLI.

use std::sync::Arc;

use super::attributes::SizeModel;

/// A parsed input record, immutable once created.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    position: [f64; 2],
    magnitude: f64,
    year: i32,
}

impl Event {
    /// Build an event from an already projected position.
    ///
    /// Returns `None` when either axis is non-finite, so an unprojectable
    /// record never becomes an `Event`. Negative or non-finite magnitudes
    /// fall back to 0.
    pub fn new(position: [f64; 2], magnitude: f64, year: i32) -> Option<Self> {
        if !position[0].is_finite() || !position[1].is_finite() {
            return None;
        }
        let magnitude = if magnitude.is_finite() && magnitude > 0.0 {
            magnitude
        } else {
            0.0
        };
        Some(Self {
            position,
            magnitude,
            year,
        })
    }

    /// Projected position (Web Mercator metres)
    pub fn position(&self) -> [f64; 2] {
        self.position
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

/// Per-event attributes consumed by the renderer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderPoint {
    /// Projected position (inherited from the event)
    pub position: [f64; 2],
    /// Footprint diameter in screen points
    pub size: f32,
    /// Event year (inherited from the event)
    pub year: i32,
}

impl RenderPoint {
    /// Whether the point has occurred by `current_year`.
    #[inline]
    pub fn is_visible_at(&self, current_year: f64) -> bool {
        f64::from(self.year) <= current_year
    }

    /// Simulated years since the event; only meaningful when visible.
    #[inline]
    pub fn age_at(&self, current_year: f64) -> f64 {
        current_year - f64::from(self.year)
    }
}

/// An event set together with its derived render buffer.
///
/// `events[i]` and `points[i]` always describe the same record; buffer order
/// is draw order (later entries are drawn on top).
#[derive(Debug, Default)]
pub struct PointSet {
    events: Vec<Event>,
    points: Vec<RenderPoint>,
}

impl PointSet {
    /// Derive the render buffer for `events` in one batch.
    pub fn build(events: Vec<Event>, sizes: &SizeModel) -> Self {
        let points = sizes.derive_all(&events);
        Self { events, points }
    }

    /// Shared empty set, used before a dataset has loaded
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn points(&self) -> &[RenderPoint] {
        &self.points
    }

    pub fn event(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest event year, if any events exist
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.points.iter().map(|p| p.year).min()?;
        let max = self.points.iter().map(|p| p.year).max()?;
        Some((min, max))
    }

    /// Count events per `bucket`-year bin, keyed by the bin's first year.
    ///
    /// Returns (bin_start, count) pairs in ascending order.
    pub fn year_histogram(&self, bucket: i32) -> Vec<(i32, u32)> {
        let bucket = bucket.max(1);
        let mut bins = std::collections::BTreeMap::<i32, u32>::new();
        for point in &self.points {
            let start = point.year.div_euclid(bucket) * bucket;
            *bins.entry(start).or_insert(0) += 1;
        }
        bins.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_position_is_never_constructed() {
        assert!(Event::new([f64::NAN, 0.0], 1.0, 1900).is_none());
        assert!(Event::new([0.0, f64::INFINITY], 1.0, 1900).is_none());
        assert!(Event::new([0.0, 0.0], 1.0, 1900).is_some());
    }

    #[test]
    fn magnitude_is_non_negative() {
        let e = Event::new([0.0, 0.0], -5.0, 1900).unwrap();
        assert_eq!(e.magnitude(), 0.0);
        let e = Event::new([0.0, 0.0], f64::NAN, 1900).unwrap();
        assert_eq!(e.magnitude(), 0.0);
    }

    #[test]
    fn visibility_boundary() {
        let p = RenderPoint {
            position: [0.0, 0.0],
            size: 16.0,
            year: 1900,
        };
        assert!(!p.is_visible_at(1890.0));
        assert!(!p.is_visible_at(1899.99));
        assert!(p.is_visible_at(1900.0));
        assert!((p.age_at(1905.5) - 5.5).abs() < 1e-9);
    }

    #[test]
    fn histogram_bins_by_decade() {
        let events = [1851, 1859, 1860, 1999, 1990]
            .iter()
            .filter_map(|&y| Event::new([0.0, 0.0], 0.0, y))
            .collect();
        let set = PointSet::build(events, &SizeModel::default());
        assert_eq!(
            set.year_histogram(10),
            vec![(1850, 2), (1860, 1), (1990, 2)]
        );
        assert_eq!(set.year_range(), Some((1851, 1999)));
    }

    #[test]
    fn empty_set_has_no_range() {
        let set = PointSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.year_range(), None);
        assert!(set.year_histogram(10).is_empty());
    }
}

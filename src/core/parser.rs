//! Record parser for delimited event datasets
//!
//! The first line is a header and is skipped. Every data line needs at least
//! five comma-separated fields:
//! `_, magnitude, year, latitude, longitude[, ...]`.
//! Bad numbers degrade to 0; rows that cannot be projected are dropped.
//! Nothing here ever fails.

use tracing::{debug, trace};

use super::data::Event;
use super::projection::from_lon_lat;

const FIELD_MAGNITUDE: usize = 1;
const FIELD_YEAR: usize = 2;
const FIELD_LAT: usize = 3;
const FIELD_LON: usize = 4;
const MIN_FIELDS: usize = 5;

/// Parser output plus drop accounting for diagnostics
#[derive(Debug, Default)]
pub struct ParseResult {
    pub events: Vec<Event>,
    /// Rows with fewer than five fields
    pub short_rows: usize,
    /// Rows whose coordinates did not project to a finite position
    pub unprojectable_rows: usize,
}

impl ParseResult {
    /// Total rows excluded from `events`
    pub fn dropped(&self) -> usize {
        self.short_rows + self.unprojectable_rows
    }
}

/// Parse a whole dataset body into events.
pub fn parse_records(text: &str) -> ParseResult {
    let mut result = ParseResult::default();

    for (line_no, line) in text.lines().enumerate().skip(1) {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < MIN_FIELDS {
            trace!(line_no, fields = fields.len(), "Short row dropped");
            result.short_rows += 1;
            continue;
        }

        let lat = parse_float(fields[FIELD_LAT]).unwrap_or(f64::NAN);
        let lon = parse_float(fields[FIELD_LON]).unwrap_or(f64::NAN);
        let Some(position) = from_lon_lat(lon, lat) else {
            trace!(line_no, lon, lat, "Unprojectable row dropped");
            result.unprojectable_rows += 1;
            continue;
        };

        let magnitude = parse_float(fields[FIELD_MAGNITUDE]).unwrap_or(0.0);
        let year = parse_leading_int(fields[FIELD_YEAR]).unwrap_or(0);

        if let Some(event) = Event::new(position, magnitude, year) {
            result.events.push(event);
        }
    }

    debug!(
        events = result.events.len(),
        short_rows = result.short_rows,
        unprojectable = result.unprojectable_rows,
        "Dataset parsed"
    );

    result
}

/// Strict float parse of a trimmed field; `None` for empty or non-finite.
fn parse_float(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Integer from the leading `[+-]digits` of a field, ignoring the rest
/// (so `1950.0` and `1950-06-01` both read as 1950).
fn parse_leading_int(field: &str) -> Option<i32> {
    let s = field.trim();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,mass,year,reclat,reclong\n";

    #[test]
    fn preserves_row_count_for_well_formed_input() {
        let mut text = HEADER.to_string();
        for i in 0..25 {
            text.push_str(&format!("m{i},{},{},{},{}\n", i * 10, 1850 + i, i as f64 - 10.0, i as f64 * 3.0));
        }
        let result = parse_records(&text);
        assert_eq!(result.events.len(), 25);
        assert_eq!(result.dropped(), 0);
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(parse_records(HEADER).events.is_empty());
        assert!(parse_records("").events.is_empty());
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let text = format!("{HEADER}a,1,1900,0,0\nb,2,1901,1,1");
        assert_eq!(parse_records(&text).events.len(), 2);
    }

    #[test]
    fn bad_magnitude_and_year_default_to_zero() {
        let text = format!("{HEADER}a,heavy,unknown,10,20\n");
        let result = parse_records(&text);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].magnitude(), 0.0);
        assert_eq!(result.events[0].year(), 0);
    }

    #[test]
    fn missing_magnitude_defaults_to_zero() {
        let text = format!("{HEADER}a,,1900,10,20\n");
        let result = parse_records(&text);
        assert_eq!(result.events[0].magnitude(), 0.0);
        assert_eq!(result.events[0].year(), 1900);
    }

    #[test]
    fn year_reads_leading_integer() {
        let text = format!("{HEADER}a,1,1950.0,0,0\nb,1,1951-06-01,0,0\nc,1,-44,0,0\n");
        let years: Vec<i32> = parse_records(&text).events.iter().map(|e| e.year()).collect();
        assert_eq!(years, vec![1950, 1951, -44]);
    }

    #[test]
    fn bad_coordinates_drop_the_row() {
        let text = format!(
            "{HEADER}ok,1,1900,10,20\nnan,1,1900,north,20\nrange,1,1900,95,20\nlon,1,1900,0,181\nempty,1,1900,,\n"
        );
        let result = parse_records(&text);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.unprojectable_rows, 4);
        assert!(result.events.len() < 5);
    }

    #[test]
    fn short_rows_are_dropped() {
        let text = format!("{HEADER}a,1,1900,10\n\nb,1,1900,10,20\n");
        let result = parse_records(&text);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.short_rows, 2);
    }

    #[test]
    fn extra_fields_and_crlf_are_tolerated() {
        let text = "h1,h2,h3,h4,h5\r\na,500,1900,10,20,Fell,L5\r\n";
        let result = parse_records(text);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].magnitude(), 500.0);
    }

    #[test]
    fn leading_int_helper() {
        assert_eq!(parse_leading_int(" 1880 "), Some(1880));
        assert_eq!(parse_leading_int("+12x"), Some(12));
        assert_eq!(parse_leading_int("x12"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(""), None);
    }
}

//! Runtime configuration
//!
//! Every field has a default, so an empty JSON object (or no config file at
//! all) gives the stock sweep. Environment overrides are applied on top.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::attributes::SizeModel;
use super::clock::ClockConfig;
use super::shading::FadeShading;
use super::viewport::ViewConfig;

/// Env var naming a JSON config file
pub const CONFIG_ENV: &str = "YEARSWEEP_CONFIG";
/// Env var overriding the dataset source
pub const DATA_ENV: &str = "YEARSWEEP_DATA";
/// Env var overriding the `{year}` query value
pub const YEAR_ENV: &str = "YEARSWEEP_YEAR";

const YEAR_PLACEHOLDER: &str = "{year}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Year span must be positive (min {min}, max {max})")]
    EmptySpan { min: f64, max: f64 },
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("Year query must be an integer, got {0:?}")]
    BadYear(String),
}

/// Where the raw delimited text comes from
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// File path or http(s) URL, optionally containing `{year}`
    pub source: String,
    /// Value substituted for `{year}` in `source`
    pub year: Option<i32>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: "data/meteorites.csv".to_string(),
            year: None,
        }
    }
}

impl DatasetConfig {
    /// Source with the year query substituted. Without a year the
    /// placeholder is left in place.
    pub fn resolved_source(&self) -> String {
        match self.year {
            Some(year) => self.source.replace(YEAR_PLACEHOLDER, &year.to_string()),
            None => self.source.clone(),
        }
    }
}

/// Whether `source` names an http(s) URL rather than a local path
pub fn is_remote(source: &str) -> bool {
    let source = source.trim_start();
    source.starts_with("http://") || source.starts_with("https://")
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub dataset: DatasetConfig,
    pub clock: ClockConfig,
    pub size: SizeModel,
    pub fade: FadeShading,
    pub view: ViewConfig,
}

impl SweepConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load from `YEARSWEEP_CONFIG` (if set), apply env overrides, validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
                debug!(path = %path.display(), "Loaded config file");
                Self::from_json(&text)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `YEARSWEEP_DATA` / `YEARSWEEP_YEAR` style overrides from `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(source) = lookup(DATA_ENV).filter(|s| !s.trim().is_empty()) {
            debug!(%source, "Dataset source overridden");
            self.dataset.source = source;
        }
        if let Some(year) = lookup(YEAR_ENV) {
            let parsed = year
                .trim()
                .parse::<i32>()
                .map_err(|_| ConfigError::BadYear(year.clone()))?;
            self.dataset.year = Some(parsed);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let clock = &self.clock;
        if !(clock.min_year.is_finite() && clock.max_year.is_finite() && clock.span() > 0.0) {
            return Err(ConfigError::EmptySpan {
                min: clock.min_year,
                max: clock.max_year,
            });
        }
        positive("clock.rate_per_second", clock.rate_per_second)?;
        positive("clock.time_unit", clock.time_unit)?;
        positive("size.normalizer", self.size.normalizer)?;
        positive("fade.growth_base", self.fade.growth_base)?;
        positive("fade.max_decay", self.fade.max_decay)?;
        Ok(())
    }
}

impl SweepConfig {
    /// Validate; on failure keep the dataset section and reset everything
    /// else to defaults, returning the error for the caller to report.
    pub fn validate_or_reset(&mut self) -> Result<(), ConfigError> {
        if let Err(e) = self.validate() {
            *self = Self {
                dataset: std::mem::take(&mut self.dataset),
                ..Self::default()
            };
            return Err(e);
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = SweepConfig::from_json("{}").unwrap();
        assert_eq!(config, SweepConfig::default());
        assert_eq!(config.clock.min_year, 1850.0);
        assert_eq!(config.size.base, 16.0);
        assert_eq!(config.fade.color, [1.0, 0.0, 0.0, 0.5]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config =
            SweepConfig::from_json(r#"{"clock": {"rate_per_second": 5}, "size": {"base": 8}}"#)
                .unwrap();
        assert_eq!(config.clock.rate_per_second, 5.0);
        assert_eq!(config.clock.time_unit, 6.0);
        assert_eq!(config.size.base, 8.0);
        assert_eq!(config.size.scale, 32.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            SweepConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = SweepConfig::default();
        config.clock.max_year = config.clock.min_year;
        assert!(matches!(config.validate(), Err(ConfigError::EmptySpan { .. })));

        let mut config = SweepConfig::default();
        config.clock.time_unit = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "clock.time_unit", .. })
        ));

        let mut config = SweepConfig::default();
        config.size.normalizer = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_config_resets_but_keeps_dataset() {
        let mut config = SweepConfig::default();
        config.dataset.source = "https://example.org/events.csv".to_string();
        config.clock.rate_per_second = f64::NAN;
        config.size.base = 4.0;
        assert!(matches!(
            config.validate_or_reset(),
            Err(ConfigError::NonPositive { field: "clock.rate_per_second", .. })
        ));
        assert_eq!(config.dataset.source, "https://example.org/events.csv");
        assert_eq!(config.clock, ClockConfig::default());
        assert_eq!(config.size.base, 16.0);
        assert!(config.validate().is_ok());

        let mut valid = SweepConfig::default();
        valid.size.base = 4.0;
        assert!(valid.validate_or_reset().is_ok());
        assert_eq!(valid.size.base, 4.0);
    }

    #[test]
    fn overrides_apply() {
        let mut config = SweepConfig::default();
        config
            .apply_overrides(|key| match key {
                DATA_ENV => Some("https://example.org/data-{year}.csv".to_string()),
                YEAR_ENV => Some(" 1990 ".to_string()),
                _ => None,
            })
            .unwrap();
        assert!(is_remote(&config.dataset.resolved_source()));
        assert_eq!(
            config.dataset.resolved_source(),
            "https://example.org/data-1990.csv"
        );
    }

    #[test]
    fn blank_source_override_is_ignored() {
        let mut config = SweepConfig::default();
        config
            .apply_overrides(|key| (key == DATA_ENV).then(|| "  ".to_string()))
            .unwrap();
        assert_eq!(config.dataset.source, "data/meteorites.csv");
    }

    #[test]
    fn bad_year_override_is_an_error() {
        let mut config = SweepConfig::default();
        let err = config
            .apply_overrides(|key| (key == YEAR_ENV).then(|| "nineteen".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::BadYear(_)));
    }

    #[test]
    fn placeholder_left_without_year() {
        let dataset = DatasetConfig {
            source: "data/{year}.csv".to_string(),
            year: None,
        };
        assert_eq!(dataset.resolved_source(), "data/{year}.csv");
        assert!(!is_remote(&dataset.resolved_source()));
    }
}

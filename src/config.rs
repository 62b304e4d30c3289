//! Metric configuration.
//!
//! The configuration is a YAML document loaded once at startup:
//!
//! ```yaml
//! uri: mongodb://localhost:27017
//! refreshInterval: 1s
//! metrics:
//!   - name: inserts
//!     path: opcounters.insert
//!     type: counter
//!     derive: rate_per_sec
//!     color: "2"
//!     compareTo: queries
//! ```
//!
//! Anything wrong with it is a [`ConfigError`] and fatal for the process.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::util::{DurationParseError, parse_duration};

/// Polling interval used when the configuration does not name one.
pub const DEFAULT_REFRESH_INTERVAL: &str = "1s";

/// Errors raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("no metrics configured")]
    NoMetrics,
    #[error("metric #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("metric '{0}' has an empty path")]
    EmptyPath(String),
    #[error("metric name '{0}' is used more than once")]
    DuplicateName(String),
    #[error("metric '{name}' compares to unknown metric '{target}'")]
    UnknownCompareTarget { name: String, target: String },
    #[error("metric '{0}' compares to itself")]
    SelfComparison(String),
    #[error("invalid refresh interval: {0}")]
    Interval(#[from] DurationParseError),
    #[error("refresh interval '{0}' must be greater than zero")]
    NonPositiveInterval(String),
    #[error("no MongoDB uri configured (set `uri` in the config or pass --uri)")]
    MissingUri,
}

/// Whether the sampled field is a monotonic counter or a point-in-time gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Counter,
    #[default]
    Gauge,
}

/// How the displayed value is derived from consecutive raw samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeriveMode {
    #[default]
    None,
    Delta,
    RatePerSec,
}

/// One configured metric.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSpec {
    /// Unique display name.
    pub name: String,
    /// Dot-separated path into the status document.
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: MetricKind,
    #[serde(default)]
    pub derive: DeriveMode,
    /// Display colour hint, interpreted by the renderer only.
    #[serde(default)]
    pub color: Option<String>,
    /// Name of another metric to show a cumulative share against.
    #[serde(default, alias = "compare")]
    pub compare_to: Option<String>,
}

impl MetricSpec {
    /// Creates a gauge metric with no derivation.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: MetricKind::Gauge,
            derive: DeriveMode::None,
            color: None,
            compare_to: None,
        }
    }

    pub fn with_kind(mut self, kind: MetricKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_derive(mut self, derive: DeriveMode) -> Self {
        self.derive = derive;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn compared_to(mut self, other: impl Into<String>) -> Self {
        self.compare_to = Some(other.into());
        self
    }

    /// Returns `true` if the displayed value depends on the previous raw sample.
    pub fn needs_history(&self) -> bool {
        self.kind == MetricKind::Counter || self.derive != DeriveMode::None
    }

    /// Returns `true` for per-second rate metrics.
    pub fn is_rate(&self) -> bool {
        self.derive == DeriveMode::RatePerSec
    }
}

fn default_refresh_interval() -> String {
    DEFAULT_REFRESH_INTERVAL.to_string()
}

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// MongoDB connection string.
    #[serde(default)]
    pub uri: Option<String>,
    /// Polling interval, e.g. `1s` or `500ms`.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: String,
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
}

impl Config {
    /// Reads and parses a config file. Call [`Config::validate`] afterwards.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Parses a config document from YAML text.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Parses the refresh interval.
    pub fn interval(&self) -> Result<Duration, ConfigError> {
        let interval = parse_duration(&self.refresh_interval)?;
        if interval.is_zero() {
            return Err(ConfigError::NonPositiveInterval(
                self.refresh_interval.clone(),
            ));
        }
        Ok(interval)
    }

    /// Checks every startup invariant and returns the parsed interval.
    ///
    /// Metric names must be unique and non-empty, every metric needs a path,
    /// and `compareTo` must name a different, existing metric.
    pub fn validate(&self) -> Result<Duration, ConfigError> {
        if self.metrics.is_empty() {
            return Err(ConfigError::NoMetrics);
        }

        let mut names = HashSet::with_capacity(self.metrics.len());
        for (index, metric) in self.metrics.iter().enumerate() {
            if metric.name.trim().is_empty() {
                return Err(ConfigError::EmptyName { index });
            }
            if metric.path.trim().is_empty() {
                return Err(ConfigError::EmptyPath(metric.name.clone()));
            }
            if !names.insert(metric.name.as_str()) {
                return Err(ConfigError::DuplicateName(metric.name.clone()));
            }
        }

        for metric in &self.metrics {
            let Some(target) = metric.compare_to.as_deref() else {
                continue;
            };
            if target == metric.name {
                return Err(ConfigError::SelfComparison(metric.name.clone()));
            }
            if !names.contains(target) {
                return Err(ConfigError::UnknownCompareTarget {
                    name: metric.name.clone(),
                    target: target.to_string(),
                });
            }
        }

        self.interval()
    }
}

//! Configuration loading from eventline.toml
//!
//! Eventline configuration can be specified in an `eventline.toml` file.
//! The configuration is automatically discovered by walking up from the current directory.

use eventline_core::{BucketAlignment, BucketSpec};
use eventline_stats::{DEFAULT_IQR_MULTIPLIER, OutlierMethod, QuartileIndex};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name searched for by [`EventlineConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "eventline.toml";

/// Eventline configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventlineConfig {
    /// Timeline binning
    #[serde(default)]
    pub binning: BinningConfig,
    /// Outlier filtering
    #[serde(default)]
    pub outliers: OutliersConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Timeline binning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinningConfig {
    /// Bucket width (e.g., "5s", "500ms")
    #[serde(default = "default_width")]
    pub width: String,
    /// Window alignment: "zero" or "legacy"
    #[serde(default)]
    pub alignment: BucketAlignment,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            alignment: BucketAlignment::default(),
        }
    }
}

fn default_width() -> String {
    "5s".to_string()
}

/// Outlier filtering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutliersConfig {
    /// Filter outliers before computing mean/variance/median
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// IQR multiplier
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Out-of-range quartile index: "clamp" or "strict"
    #[serde(default)]
    pub quartiles: QuartileIndex,
}

impl Default for OutliersConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            multiplier: default_multiplier(),
            quartiles: QuartileIndex::default(),
        }
    }
}

fn default_enabled() -> bool {
    true
}
fn default_multiplier() -> f64 {
    DEFAULT_IQR_MULTIPLIER
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl EventlineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(&dir)
    }

    /// Walk up from `start` looking for `eventline.toml`
    pub fn discover_from(start: &Path) -> Option<Self> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), "ignoring config: {}", e);
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Validated bucket spec from the `[binning]` section
    pub fn bucket_spec(&self) -> anyhow::Result<BucketSpec> {
        let width_ms = Self::parse_duration(&self.binning.width)?;
        Ok(BucketSpec::new(width_ms, self.binning.alignment)?)
    }

    /// Outlier method from the `[outliers]` section
    pub fn outlier_method(&self) -> OutlierMethod {
        if self.outliers.enabled {
            OutlierMethod::Iqr {
                multiplier: self.outliers.multiplier,
                quartiles: self.outliers.quartiles,
            }
        } else {
            OutlierMethod::None
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Eventline Configuration

[binning]
# Width of each timeline bucket
width = "5s"
# Window alignment: "zero" starts at [0, width];
# "legacy" starts at [-width, 0] and stops one width short of the maximum
alignment = "zero"

[outliers]
# Drop outliers before computing mean, variance and median
enabled = true
# Keep samples within q1 - multiplier*iqr ..= q3 + multiplier*iqr
multiplier = 1.5
# Upper quartile index past the end: "clamp" or "strict"
quartiles = "clamp"

[output]
# Default output format: human, json, csv
format = "human"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "5s", "500ms", "1m") to milliseconds.
    /// A bare number is taken as seconds.
    pub fn parse_duration(s: &str) -> anyhow::Result<f64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;

        let multiplier = match unit_part.to_lowercase().as_str() {
            "us" | "µs" => 0.001,
            "ms" => 1.0,
            "s" | "" => 1_000.0,
            "m" | "min" => 60_000.0,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(value * multiplier)
    }
}

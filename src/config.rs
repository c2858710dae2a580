//! Configuration module.
//!
//! Handles loading, validating, and merging `squeeze.toml`. Configuration is
//! layered: stock defaults are overridden by the config file, which is in
//! turn overridden by command-line flags.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "converter"   # Files to shrink (processed in place)
//! dest_dir = "convertido"    # Where shrunk files are moved
//!
//! [resize]
//! max_width = 1280           # Bounding box; images are never upscaled
//! max_height = 960
//!
//! [output]
//! rename_to_jpg = false      # Rename moved files to .jpg (content is always JPEG)
//!
//! # Size → quality steps, checked top to bottom, first match wins.
//! [[quality.steps]]
//! min_size_mb = 1.0
//! quality = 30
//! # ...
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [resize]
//! max_width = 1920
//! ```
//!
//! Arrays are replaced, not merged: a `[[quality.steps]]` list in the file
//! replaces the whole stock table. Unknown keys are rejected to catch typos
//! early.

use crate::imaging::{MaxDimensions, QualityStep, QualityTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "squeeze.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `squeeze.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqueezeConfig {
    /// Directory whose files are shrunk in place.
    pub source_dir: PathBuf,
    /// Directory successfully shrunk files are moved into.
    pub dest_dir: PathBuf,
    /// Output bounding box.
    pub resize: ResizeConfig,
    /// File size → JPEG quality table.
    pub quality: QualityConfig,
    /// What happens to files after encoding.
    pub output: OutputConfig,
}

impl Default for SqueezeConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("converter"),
            dest_dir: PathBuf::from("convertido"),
            resize: ResizeConfig::default(),
            quality: QualityConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl SqueezeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resize.max_width == 0 || self.resize.max_height == 0 {
            return Err(ConfigError::Validation(
                "resize.max_width and resize.max_height must be non-zero".into(),
            ));
        }
        if self.quality.steps.is_empty() {
            return Err(ConfigError::Validation(
                "quality.steps must not be empty".into(),
            ));
        }
        for (i, step) in self.quality.steps.iter().enumerate() {
            if !(1..=100).contains(&step.quality) {
                return Err(ConfigError::Validation(format!(
                    "quality.steps[{i}].quality must be 1-100, got {}",
                    step.quality
                )));
            }
            if !step.min_size_mb.is_finite() || step.min_size_mb < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "quality.steps[{i}].min_size_mb must be a non-negative number, got {}",
                    step.min_size_mb
                )));
            }
        }
        if self.source_dir == self.dest_dir {
            return Err(ConfigError::Validation(
                "source_dir and dest_dir must differ".into(),
            ));
        }
        Ok(())
    }

    pub fn max_dimensions(&self) -> MaxDimensions {
        MaxDimensions::new(self.resize.max_width, self.resize.max_height)
    }

    pub fn quality_table(&self) -> QualityTable {
        QualityTable::new(self.quality.steps.clone())
    }

    /// Apply command-line overrides, then re-validate.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(dir) = &overrides.source_dir {
            self.source_dir = dir.clone();
        }
        if let Some(dir) = &overrides.dest_dir {
            self.dest_dir = dir.clone();
        }
        if let Some(w) = overrides.max_width {
            self.resize.max_width = w;
        }
        if let Some(h) = overrides.max_height {
            self.resize.max_height = h;
        }
        if overrides.rename_to_jpg {
            self.output.rename_to_jpg = true;
        }
        self.validate()?;
        Ok(self)
    }
}

/// Values from the command line that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_dir: Option<PathBuf>,
    pub dest_dir: Option<PathBuf>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub rename_to_jpg: bool,
}

/// Bounding box settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        let dims = MaxDimensions::default();
        Self {
            max_width: dims.width,
            max_height: dims.height,
        }
    }
}

/// Ordered size → quality steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    /// Checked in order; the first step whose `min_size_mb` the file reaches wins.
    pub steps: Vec<QualityStep>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            steps: QualityTable::default().steps().to_vec(),
        }
    }
}

/// Post-encode file handling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Give moved files a `.jpg` extension to match their new content.
    pub rename_to_jpg: bool,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SqueezeConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (arrays included) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SqueezeConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SqueezeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults if it is absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<SqueezeConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Like [`load_config`], but a missing file is an error.
///
/// Used when the user names a config file explicitly.
pub fn load_config_file(path: &Path) -> Result<SqueezeConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    load_config(path)
}

/// Returns a fully-commented stock `squeeze.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-squeeze configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Command-line flags (--source, --dest, --max-width, --max-height)
# override the values in this file.

# Every regular file directly inside source_dir is shrunk in place and,
# once written, moved into dest_dir under the same name.
source_dir = "converter"
dest_dir = "convertido"

# ---------------------------------------------------------------------------
# Resize
# ---------------------------------------------------------------------------
# Images are scaled down to fit inside max_width x max_height, keeping their
# aspect ratio. Images that already fit are re-encoded at their own size;
# nothing is ever upscaled.
[resize]
max_width = 1280
max_height = 960

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
# Output is always JPEG. By default the original file name (and extension)
# is kept; set rename_to_jpg to give moved files a .jpg extension.
[output]
rename_to_jpg = false

# ---------------------------------------------------------------------------
# Quality
# ---------------------------------------------------------------------------
# JPEG quality (1-100) is chosen from the original file size. Steps are
# checked top to bottom and the first one whose min_size_mb the file reaches
# wins, so keep the largest threshold first. 1 MB = 1024 * 1024 bytes.
# Listing steps here replaces the whole table.
[[quality.steps]]
min_size_mb = 1.0
quality = 30

[[quality.steps]]
min_size_mb = 0.5
quality = 40

[[quality.steps]]
min_size_mb = 0.3
quality = 60

[[quality.steps]]
min_size_mb = 0.0
quality = 80
"##
}

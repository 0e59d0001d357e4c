//! Comparison configuration.
//!
//! Everything that used to be a magic number in a comparison run (the crop
//! rectangle, JPEG quality, annotation font scaling, margins and colors)
//! lives in [`CompareConfig`]. Values come from three layers, later layers
//! winning:
//!
//! ```text
//! stock defaults  →  --config file.toml  →  CLI overrides (--crop, --quality, --font)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [crop]
//! left = 2500               # Absolute pixel offsets, shared by every input
//! top = 1500
//! right = 3500              # Exclusive
//! bottom = 2000             # Exclusive
//!
//! [output]
//! quality = 90              # JPEG quality (1-100)
//!
//! [annotation]
//! # font = "/path/to/font.ttf"  # Omit to search well-known system fonts
//! font_size_divisor = 22    # Font px = crop height / divisor
//! margin_x = 20             # Left margin of every annotation line
//! margin_y = 10             # Top margin of the first line
//! border_divisor = 20       # Outline px = font px / divisor (min 1)
//! shadow_color = [0, 0, 0]  # Outline color
//! fill_color = [255, 255, 255]
//! on_missing = "fail"       # "fail" or "placeholder"
//! placeholder = "N/A"       # Drawn for missing values when on_missing = "placeholder"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::CropRect;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration for one comparison run.
///
/// All fields have defaults. Config files need only specify the values they
/// want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    /// Region cut from every input image.
    pub crop: CropRect,
    /// Encoding of the composed image.
    pub output: OutputConfig,
    /// Annotation text layout and style.
    pub annotation: AnnotationConfig,
}

impl CompareConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crop.is_empty() {
            return Err(ConfigError::Validation(format!(
                "crop must satisfy right > left and bottom > top, got {}",
                self.crop
            )));
        }
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.annotation.font_size_divisor == 0 {
            return Err(ConfigError::Validation(
                "annotation.font_size_divisor must be non-zero".into(),
            ));
        }
        if self.annotation.border_divisor == 0 {
            return Err(ConfigError::Validation(
                "annotation.border_divisor must be non-zero".into(),
            ));
        }
        let max_margin = i32::MAX as u32;
        if self.annotation.margin_x > max_margin || self.annotation.margin_y > max_margin {
            return Err(ConfigError::Validation(format!(
                "annotation.margin_x and annotation.margin_y must be at most {max_margin}"
            )));
        }
        if self.annotation.on_missing == OnMissing::Placeholder
            && self.annotation.placeholder.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "annotation.placeholder must not be empty when on_missing = \"placeholder\""
                    .into(),
            ));
        }
        Ok(())
    }
}

/// Output encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

/// What to do when a requested field is absent from an image's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnMissing {
    /// Abort the whole run.
    Fail,
    /// Draw `annotation.placeholder` instead.
    Placeholder,
}

/// Resolved missing-value behavior handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingPolicy {
    Fail,
    Placeholder(String),
}

/// Annotation text settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotationConfig {
    /// TrueType/OpenType font file. When absent, well-known system fonts are tried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
    /// Font size in px is the crop height divided by this.
    pub font_size_divisor: u32,
    /// Horizontal offset of every line from the crop's left edge.
    pub margin_x: u32,
    /// Vertical offset of the first line from the crop's top edge.
    pub margin_y: u32,
    /// Outline thickness in px is the font size divided by this (min 1).
    pub border_divisor: u32,
    /// RGB color of the outline.
    pub shadow_color: [u8; 3],
    /// RGB color of the text itself.
    pub fill_color: [u8; 3],
    pub on_missing: OnMissing,
    pub placeholder: String,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            font: None,
            font_size_divisor: 22,
            margin_x: 20,
            margin_y: 10,
            border_divisor: 20,
            shadow_color: [0, 0, 0],
            fill_color: [255, 255, 255],
            on_missing: OnMissing::Fail,
            placeholder: "N/A".to_string(),
        }
    }
}

impl AnnotationConfig {
    pub fn missing_policy(&self) -> MissingPolicy {
        match self.on_missing {
            OnMissing::Fail => MissingPolicy::Fail,
            OnMissing::Placeholder => MissingPolicy::Placeholder(self.placeholder.clone()),
        }
    }
}

/// Values given directly on the command line; each replaces its config key.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub crop: Option<CropRect>,
    pub quality: Option<u32>,
    pub font: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut CompareConfig) {
        if let Some(crop) = self.crop {
            config.crop = crop;
        }
        if let Some(quality) = self.quality {
            config.output.quality = quality;
        }
        if let Some(font) = &self.font {
            config.annotation.font = Some(font.clone());
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CompareConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
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

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value and deserialize the result.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CompareConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Build the effective config: stock defaults, then `file` (if any), then
/// CLI `overrides`. The result is validated.
pub fn load_config(
    file: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<CompareConfig, ConfigError> {
    let overlay = file.map(load_raw_config).transpose()?;
    let mut config = resolve_config(stock_defaults_value(), overlay)?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Printed by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# cropgrid configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
#
# Pass this file with --config. --crop, --quality and --font on the command
# line override the values here.

# ---------------------------------------------------------------------------
# Crop region
# ---------------------------------------------------------------------------
# Absolute pixel offsets into every source image. right/bottom are exclusive,
# so the crop is (right - left) x (bottom - top) pixels. The rectangle must lie
# inside every input image.
[crop]
left = 2500
top = 1500
right = 3500
bottom = 2000

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# JPEG quality (1 = worst, 100 = best).
quality = 90

# ---------------------------------------------------------------------------
# Annotation text
# ---------------------------------------------------------------------------
[annotation]
# Font file (TrueType/OpenType; .ttc collections use their first face).
# Omit to use the first well-known system font found.
# font = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"

# Font size in px = crop height / font_size_divisor.
font_size_divisor = 22

# Offsets of the text block from the crop's top-left corner, in px.
margin_x = 20
margin_y = 10

# Outline thickness in px = font size / border_divisor (at least 1).
border_divisor = 20

# RGB colors of the outline and the text.
shadow_color = [0, 0, 0]
fill_color = [255, 255, 255]

# When a requested field is missing from an image's metadata:
#   "fail"        - abort the run
#   "placeholder" - draw the placeholder text instead
on_missing = "fail"
placeholder = "N/A"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_stock_values() {
        let config = CompareConfig::default();
        assert_eq!(config.crop, CropRect::new(2500, 1500, 3500, 2000));
        assert_eq!(config.output.quality, 90);
        assert_eq!(config.annotation.font, None);
        assert_eq!(config.annotation.font_size_divisor, 22);
        assert_eq!(config.annotation.margin_x, 20);
        assert_eq!(config.annotation.margin_y, 10);
        assert_eq!(config.annotation.border_divisor, 20);
        assert_eq!(config.annotation.shadow_color, [0, 0, 0]);
        assert_eq!(config.annotation.fill_color, [255, 255, 255]);
        assert_eq!(config.annotation.missing_policy(), MissingPolicy::Fail);
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(CompareConfig::default().validate().is_ok());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_without_file_is_default() {
        let config = load_config(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, CompareConfig::default());
    }

    #[test]
    fn load_config_reads_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("compare.toml");
        fs::write(
            &path,
            r#"
[crop]
left = 0
top = 0

[annotation]
on_missing = "placeholder"
placeholder = "?"
"#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path()), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.crop, CropRect::new(0, 0, 3500, 2000));
        assert_eq!(
            config.annotation.missing_policy(),
            MissingPolicy::Placeholder("?".into())
        );
        // Untouched sections keep their defaults
        assert_eq!(config.output.quality, 90);
        assert_eq!(config.annotation.margin_x, 20);
    }

    #[test]
    fn load_config_missing_file_is_io_error() {
        let result = load_config(
            Some(Path::new("/nonexistent/compare.toml")),
            &ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("compare.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(Some(path.as_path()), &ConfigOverrides::default());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn overrides_beat_file_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("compare.toml");
        fs::write(&path, "[output]\nquality = 50\n").unwrap();

        let overrides = ConfigOverrides {
            crop: Some(CropRect::new(10, 10, 110, 60)),
            quality: Some(75),
            font: Some(PathBuf::from("/fonts/a.ttf")),
        };
        let config = load_config(Some(path.as_path()), &overrides).unwrap();
        assert_eq!(config.crop, CropRect::new(10, 10, 110, 60));
        assert_eq!(config.output.quality, 75);
        assert_eq!(config.annotation.font, Some(PathBuf::from("/fonts/a.ttf")));
    }

    #[test]
    fn overrides_are_validated() {
        let overrides = ConfigOverrides {
            crop: Some(CropRect::new(100, 0, 50, 10)),
            ..Default::default()
        };
        let result = load_config(None, &overrides);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_nested_table_keeps_siblings() {
        let base: toml::Value = toml::from_str("[crop]\nleft = 1\nright = 9").unwrap();
        let overlay: toml::Value = toml::from_str("[crop]\nleft = 5").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["crop"]["left"].as_integer(), Some(5));
        assert_eq!(merged["crop"]["right"].as_integer(), Some(9));
    }

    #[test]
    fn merge_toml_arrays_replace_not_concat() {
        let base: toml::Value = toml::from_str("c = [0, 0, 0]").unwrap();
        let overlay: toml::Value = toml::from_str("c = [255, 0, 0]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["c"].as_array().unwrap().len(), 3);
        assert_eq!(merged["c"][0].as_integer(), Some(255));
    }

    // =========================================================================
    // Unknown keys
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let overlay: toml::Value = toml::from_str("[output]\nqualty = 80").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        let overlay: toml::Value = toml::from_str("[thumbnails]\nsize = 1").unwrap();
        assert!(resolve_config(stock_defaults_value(), Some(overlay)).is_err());
    }

    #[test]
    fn unknown_crop_key_rejected() {
        let overlay: toml::Value = toml::from_str("[crop]\nwidth = 100").unwrap();
        assert!(resolve_config(stock_defaults_value(), Some(overlay)).is_err());
    }

    #[test]
    fn invalid_on_missing_value_rejected() {
        let overlay: toml::Value =
            toml::from_str("[annotation]\non_missing = \"skip\"").unwrap();
        assert!(resolve_config(stock_defaults_value(), Some(overlay)).is_err());
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_quality_bounds() {
        let mut config = CompareConfig::default();
        config.output.quality = 100;
        assert!(config.validate().is_ok());
        config.output.quality = 0;
        assert!(config.validate().is_err());
        config.output.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_crop() {
        let mut config = CompareConfig::default();
        config.crop = CropRect::new(10, 10, 10, 50);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("right > left"), "{err}");
    }

    #[test]
    fn validate_margin_bounds() {
        let mut config = CompareConfig::default();
        config.annotation.margin_x = i32::MAX as u32;
        assert!(config.validate().is_ok());
        config.annotation.margin_x = u32::MAX - 10;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.annotation.margin_x = 20;
        config.annotation.margin_y = u32::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_divisors() {
        let mut config = CompareConfig::default();
        config.annotation.font_size_divisor = 0;
        assert!(config.validate().is_err());

        let mut config = CompareConfig::default();
        config.annotation.border_divisor = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_blank_placeholder_only_matters_when_used() {
        let mut config = CompareConfig::default();
        config.annotation.placeholder = " ".into();
        assert!(config.validate().is_ok());
        config.annotation.on_missing = OnMissing::Placeholder;
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(stock_defaults_value(), Some(value)).unwrap();
        assert_eq!(config, CompareConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[crop]", "[output]", "[annotation]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_omits_unset_font() {
        let value = stock_defaults_value();
        assert!(value["annotation"].get("font").is_none());
        assert!(value.get("crop").is_some());
    }
}

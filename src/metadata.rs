//! Annotation fields and their text rendering.
//!
//! Each [`InfoField`] names one line of text drawn on a crop. Every field maps
//! to exactly one pure formatting function (see [`InfoField::formatter`]), so
//! adding a field means adding a variant and one entry in that table.
//!
//! ## Rendering rules
//!
//! | Field | Source | Example |
//! |---|---|---|
//! | `fstop` | EXIF FNumber | `F 16.0` |
//! | `focallength` | EXIF FocalLength, truncated | `35 mm` |
//! | `shutterspeed` | EXIF ExposureTime | `1/125 s`, `0.666667 s`, `30 s` |
//! | `iso` | EXIF PhotographicSensitivity | `ISO 100` |
//! | `camera` | EXIF Make + Model | `SONY ILCE-6000` |
//! | `lens` | EXIF LensModel | `E PZ 16-50mm F3.5-5.6 OSS` |
//! | `datetime` | EXIF DateTime | `2019:05:04 12:30:00` |
//! | `filename` | the input path as given | `shots/DSC0042.jpg` |
//!
//! ## Missing values
//!
//! A requested field whose metadata is absent is resolved by
//! [`MissingPolicy`]: abort the run (default) or draw a placeholder.

use crate::config::MissingPolicy;
use crate::imaging::{CaptureMetadata, Rational};
use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MetadataError {
    #[error("{field} is not recorded in the metadata of {path}")]
    Missing { field: InfoField, path: PathBuf },
}

/// One annotation line that can be drawn on each crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum InfoField {
    #[value(name = "fstop")]
    FStop,
    #[value(name = "focallength")]
    FocalLength,
    #[value(name = "shutterspeed")]
    ShutterSpeed,
    #[value(name = "iso")]
    Iso,
    #[value(name = "lens")]
    Lens,
    #[value(name = "camera")]
    Camera,
    #[value(name = "datetime")]
    DateTime,
    #[value(name = "filename")]
    Filename,
}

/// Everything a formatter may look at for one image.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationSource<'a> {
    pub path: &'a Path,
    pub metadata: &'a CaptureMetadata,
}

/// Pure formatting rule. `None` means the value is missing.
pub type FieldFormatter = fn(&AnnotationSource) -> Option<String>;

impl InfoField {
    /// The name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            InfoField::FStop => "fstop",
            InfoField::FocalLength => "focallength",
            InfoField::ShutterSpeed => "shutterspeed",
            InfoField::Iso => "iso",
            InfoField::Lens => "lens",
            InfoField::Camera => "camera",
            InfoField::DateTime => "datetime",
            InfoField::Filename => "filename",
        }
    }

    pub fn formatter(self) -> FieldFormatter {
        match self {
            InfoField::FStop => format_fstop,
            InfoField::FocalLength => format_focal_length,
            InfoField::ShutterSpeed => format_shutter_speed,
            InfoField::Iso => format_iso,
            InfoField::Lens => format_lens,
            InfoField::Camera => format_camera,
            InfoField::DateTime => format_datetime,
            InfoField::Filename => format_filename,
        }
    }

    /// Whether rendering this field requires reading EXIF.
    pub fn needs_metadata(self) -> bool {
        self != InfoField::Filename
    }
}

impl fmt::Display for InfoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A rational with a zero denominator carries no usable value.
fn ratio(value: Option<Rational>) -> Option<f64> {
    value.filter(|r| r.den != 0).map(Rational::to_f64)
}

fn format_fstop(src: &AnnotationSource) -> Option<String> {
    ratio(src.metadata.f_number).map(|f| format!("F {:.1}", f))
}

fn format_focal_length(src: &AnnotationSource) -> Option<String> {
    ratio(src.metadata.focal_length).map(|mm| format!("{} mm", mm.trunc() as i64))
}

fn format_shutter_speed(src: &AnnotationSource) -> Option<String> {
    let exposure = src.metadata.exposure_time.filter(|r| r.den != 0)?;
    if exposure.num == 1 {
        Some(format!("1/{} s", exposure.den))
    } else {
        Some(format!("{} s", format_compact(exposure.to_f64())))
    }
}

fn format_iso(src: &AnnotationSource) -> Option<String> {
    src.metadata.iso.map(|iso| format!("ISO {}", iso))
}

fn format_lens(src: &AnnotationSource) -> Option<String> {
    src.metadata.lens_model.clone()
}

fn format_camera(src: &AnnotationSource) -> Option<String> {
    let make = src.metadata.make.as_deref()?;
    let model = src.metadata.model.as_deref()?;
    Some(format!("{} {}", make, model))
}

fn format_datetime(src: &AnnotationSource) -> Option<String> {
    src.metadata.date_time.clone()
}

fn format_filename(src: &AnnotationSource) -> Option<String> {
    Some(src.path.display().to_string())
}

/// Compact decimal rendering with six significant digits, matching C's `%g`.
///
/// Trailing zeros (and a trailing point) are dropped; very small or very large
/// magnitudes switch to exponent form (`1e-05`, `2.5e+06`).
pub fn format_compact(value: f64) -> String {
    const PRECISION: i32 = 6;

    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // Round to the target precision first; the exponent can shift (9.999999 → 10).
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= PRECISION {
        let mantissa = strip_trailing_zeros(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Render a single field, reporting a missing value as an error.
pub fn render_field(field: InfoField, source: &AnnotationSource) -> Result<String, MetadataError> {
    (field.formatter())(source).ok_or_else(|| MetadataError::Missing {
        field,
        path: source.path.to_path_buf(),
    })
}

/// Render all requested fields in order, applying the missing-value policy.
pub fn render_lines(
    fields: &[InfoField],
    source: &AnnotationSource,
    policy: &MissingPolicy,
) -> Result<Vec<String>, MetadataError> {
    fields
        .iter()
        .map(|&field| match render_field(field, source) {
            Ok(text) => Ok(text),
            Err(err) => match policy {
                MissingPolicy::Fail => Err(err),
                MissingPolicy::Placeholder(text) => {
                    log::warn!("{}; drawing \"{}\" instead", err, text);
                    Ok(text.clone())
                }
            },
        })
        .collect()
}

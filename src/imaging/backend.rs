//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the comparison
//! pipeline needs: crop a region out of a source file, read its capture
//! metadata, and encode the finished canvas.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Its [`name`](ImageBackend::name)
//! becomes the suffix of the written file, so outputs from different backends
//! never overwrite each other.

use super::params::{CropRect, Quality};
use image::RgbImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Crop {rect} extends outside {path} ({width}x{height})")]
    CropOutOfBounds {
        path: PathBuf,
        rect: CropRect,
        width: u32,
        height: u32,
    },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

/// An unsigned EXIF rational, kept as the raw numerator/denominator pair.
///
/// The pair is not reduced: shutter speed formatting depends on whether the
/// camera wrote `1/x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub num: u32,
    pub den: u32,
}

impl Rational {
    pub fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

/// Capture metadata extracted from EXIF.
///
/// Field mapping:
/// - `f_number`: `FNumber` (0x829D)
/// - `focal_length`: `FocalLength` (0x920A)
/// - `exposure_time`: `ExposureTime` (0x829A)
/// - `iso`: `PhotographicSensitivity` (0x8827), a.k.a. ISOSpeedRatings
/// - `make` / `model`: `Make` (0x010F) / `Model` (0x0110)
/// - `lens_model`: `LensModel` (0xA434)
/// - `date_time`: `DateTime` (0x0132), else `DateTimeOriginal` (0x9003)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureMetadata {
    pub f_number: Option<Rational>,
    pub focal_length: Option<Rational>,
    pub exposure_time: Option<Rational>,
    pub iso: Option<u32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub lens_model: Option<String>,
    pub date_time: Option<String>,
}

/// Trait for image processing backends.
///
/// Implementations must release the decoded source before returning from
/// [`crop`](ImageBackend::crop): the pipeline holds at most one source image
/// in memory at a time.
pub trait ImageBackend {
    /// Short identifier appended to the output filename (`out_<name>.jpg`).
    fn name(&self) -> &'static str;

    /// Decode `path` and return the `rect` region as RGB.
    fn crop(&self, path: &Path, rect: CropRect) -> Result<RgbImage, BackendError>;

    /// Read embedded EXIF capture metadata. Files without EXIF yield defaults.
    fn read_metadata(&self, path: &Path) -> Result<CaptureMetadata, BackendError>;

    /// Encode `image` as JPEG at `quality`.
    fn save_jpeg(&self, image: &RgbImage, path: &Path, quality: Quality)
    -> Result<(), BackendError>;
}

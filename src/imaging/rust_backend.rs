//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Crop | `image::DynamicImage::crop_imm` after an explicit bounds check |
//! | EXIF metadata | `kamadak-exif` (`exif::Reader::read_from_container`) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |

use super::backend::{BackendError, CaptureMetadata, ImageBackend, Rational};
use super::params::{CropRect, Quality};
use exif::{Exif, In, Tag, Value};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, RgbImage};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the file content, so a mislabelled extension
/// still decodes.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|source| open_error(path, source))?
        .decode()
        .map_err(|e| BackendError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

fn open_error(path: &Path, source: std::io::Error) -> BackendError {
    BackendError::Open {
        path: path.to_path_buf(),
        source,
    }
}

fn exif_rational(exif: &Exif, tag: Tag) -> Option<Rational> {
    match exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(ref values) => values.first().map(|r| Rational::new(r.num, r.denom)),
        _ => None,
    }
}

fn exif_uint(exif: &Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)?.value.get_uint(0)
}

/// First ASCII component of a string tag, with NUL padding removed.
fn exif_ascii(exif: &Exif, tag: Tag) -> Option<String> {
    match exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(ref parts) => parts
            .first()
            .map(|bytes| {
                String::from_utf8_lossy(bytes)
                    .trim_end_matches('\0')
                    .to_string()
            })
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn capture_metadata(exif: &Exif) -> CaptureMetadata {
    CaptureMetadata {
        f_number: exif_rational(exif, Tag::FNumber),
        focal_length: exif_rational(exif, Tag::FocalLength),
        exposure_time: exif_rational(exif, Tag::ExposureTime),
        iso: exif_uint(exif, Tag::PhotographicSensitivity),
        make: exif_ascii(exif, Tag::Make),
        model: exif_ascii(exif, Tag::Model),
        lens_model: exif_ascii(exif, Tag::LensModel),
        date_time: exif_ascii(exif, Tag::DateTime)
            .or_else(|| exif_ascii(exif, Tag::DateTimeOriginal)),
    }
}

impl ImageBackend for RustBackend {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn crop(&self, path: &Path, rect: CropRect) -> Result<RgbImage, BackendError> {
        let img = load_image(path)?;
        let (width, height) = (img.width(), img.height());
        if !rect.fits_within(width, height) {
            return Err(BackendError::CropOutOfBounds {
                path: path.to_path_buf(),
                rect,
                width,
                height,
            });
        }
        log::debug!(
            "cropping {} ({}x{}) to {}",
            path.display(),
            width,
            height,
            rect
        );
        Ok(img
            .crop_imm(rect.left, rect.top, rect.width(), rect.height())
            .to_rgb8())
    }

    fn read_metadata(&self, path: &Path) -> Result<CaptureMetadata, BackendError> {
        let file = File::open(path).map_err(|source| open_error(path, source))?;
        let mut reader = BufReader::new(file);
        match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => Ok(capture_metadata(&exif)),
            Err(exif::Error::Io(source)) => Err(open_error(path, source)),
            Err(e) => {
                log::debug!("no usable EXIF in {}: {}", path.display(), e);
                Ok(CaptureMetadata::default())
            }
        }
    }

    fn save_jpeg(
        &self,
        image: &RgbImage,
        path: &Path,
        quality: Quality,
    ) -> Result<(), BackendError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let encoder = JpegEncoder::new_with_quality(writer, quality.value() as u8);
        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| BackendError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

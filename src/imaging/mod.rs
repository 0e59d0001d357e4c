//! Image processing, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, TIFF, WebP) |
//! | **Crop** | `DynamicImage::crop_imm` |
//! | **EXIF** | `kamadak-exif` |
//! | **Text** | `ab_glyph` fonts drawn with `imageproc` |
//! | **Encode** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for grid and text geometry (unit testable)
//! - **Parameters**: Crop rectangle and quality
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Text**: [`TextRenderer`] trait + [`GlyphRenderer`]

pub mod backend;
pub mod calculations;
mod params;
pub mod rust_backend;
pub mod text;

pub use backend::{BackendError, CaptureMetadata, ImageBackend, Rational};
pub use params::{CropRect, Quality};
pub use rust_backend::RustBackend;
pub use text::{GlyphRenderer, TextError, TextRenderer};

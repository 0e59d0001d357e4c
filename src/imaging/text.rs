//! Text rendering for crop annotations.
//!
//! The pipeline only needs three things from a font: how tall a line is,
//! how wide a string is, and a way to draw a string at a position. Those are
//! captured by [`TextRenderer`] so annotation layout can be tested with a
//! recording stub instead of a real font file.
//!
//! [`GlyphRenderer`] is the production implementation: an `ab_glyph` font
//! rasterized with `imageproc`'s text drawing.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextError {
    #[error("Failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid font {path}: {message}")]
    InvalidFont { path: PathBuf, message: String },
    #[error("No annotation font found (searched: {}); set annotation.font or pass --font", format_paths(.searched))]
    FontNotFound { searched: Vec<PathBuf> },
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Minimal text capability used by the annotator.
pub trait TextRenderer {
    /// Vertical distance between consecutive annotation lines at `px`.
    fn line_height(&self, px: f32) -> u32;

    /// Rendered width of `text` at `px`.
    fn text_width(&self, text: &str, px: f32) -> u32;

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw_text(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        x: i32,
        y: i32,
        px: f32,
        color: Rgb<u8>,
    );
}

/// Fonts tried in order when no font is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/GillSans.ttc",
    "/System/Library/Fonts/Supplemental/GillSans.ttc",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// `ab_glyph` font drawn through `imageproc`.
#[derive(Debug)]
pub struct GlyphRenderer {
    font: FontVec,
    path: PathBuf,
}

impl GlyphRenderer {
    /// Load a TrueType/OpenType font. Collections (`.ttc`) use their first face.
    pub fn from_file(path: &Path) -> Result<Self, TextError> {
        let bytes = std::fs::read(path).map_err(|source| TextError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font =
            FontVec::try_from_vec_and_index(bytes, 0).map_err(|e| TextError::InvalidFont {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Self {
            font,
            path: path.to_path_buf(),
        })
    }

    /// Use `configured` if given, otherwise the first system font that exists.
    pub fn discover(configured: Option<&Path>) -> Result<Self, TextError> {
        if let Some(path) = configured {
            return Self::from_file(path);
        }
        let candidates: Vec<PathBuf> = SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from).collect();
        if let Some(path) = candidates.iter().find(|p| p.is_file()) {
            log::debug!("using annotation font {}", path.display());
            return Self::from_file(path);
        }
        Err(TextError::FontNotFound {
            searched: candidates,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextRenderer for GlyphRenderer {
    fn line_height(&self, px: f32) -> u32 {
        self.font.as_scaled(PxScale::from(px)).height().ceil() as u32
    }

    fn text_width(&self, text: &str, px: f32) -> u32 {
        text_size(PxScale::from(px), &self.font, text).0
    }

    fn draw_text(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        x: i32,
        y: i32,
        px: f32,
        color: Rgb<u8>,
    ) {
        draw_text_mut(canvas, color, x, y, PxScale::from(px), &self.font, text);
    }
}

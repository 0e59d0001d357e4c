//! Shared test utilities for the cropgrid test suite.
//!
//! - [`fixtures`]: synthetic JPEG/PNG files, optionally carrying EXIF.
//! - [`RecordingRenderer`]: a [`TextRenderer`] that records draw calls instead
//!   of rasterizing glyphs, so annotation tests need no font on disk.
//!
//! ```text
//! let renderer = RecordingRenderer::new(24);
//! annotator.draw_lines(&mut crop, &lines);
//! assert_eq!(renderer.calls().len(), 9 * lines.len());
//! ```

pub mod fixtures;

use crate::imaging::TextRenderer;
use image::{Rgb, RgbImage};
use std::sync::Mutex;

/// One recorded `draw_text` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub px: f32,
    pub color: Rgb<u8>,
}

/// Renderer with a fixed line height. Each character is half the font size wide.
pub struct RecordingRenderer {
    line_height: u32,
    calls: Mutex<Vec<DrawCall>>,
}

impl RecordingRenderer {
    pub fn new(line_height: u32) -> Self {
        Self {
            line_height,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Text of every fill-colored draw, i.e. one entry per annotation line.
    pub fn lines_drawn(&self, fill: Rgb<u8>) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.color == fill)
            .map(|c| c.text)
            .collect()
    }
}

impl TextRenderer for RecordingRenderer {
    fn line_height(&self, _px: f32) -> u32 {
        self.line_height
    }

    fn text_width(&self, text: &str, px: f32) -> u32 {
        (text.chars().count() as f32 * px / 2.0) as u32
    }

    fn draw_text(
        &self,
        _canvas: &mut RgbImage,
        text: &str,
        x: i32,
        y: i32,
        px: f32,
        color: Rgb<u8>,
    ) {
        self.calls.lock().unwrap().push(DrawCall {
            text: text.to_string(),
            x,
            y,
            px,
            color,
        });
    }
}

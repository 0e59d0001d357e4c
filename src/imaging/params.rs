//! Parameter types for image operations.
//!
//! These describe *what* region to cut and *how hard* to compress, independent
//! of the backend that does the pixel work.
//!
//! ## Types
//!
//! - [`CropRect`]: Absolute pixel rectangle `(left, top, right, bottom)`, shared by every input.
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Crop region in absolute source-pixel coordinates.
///
/// `right` and `bottom` are exclusive, so the extracted region is
/// `(right - left) × (bottom - top)` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// A rectangle is usable only if it encloses at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Whether the rectangle lies entirely inside an image of the given size.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right <= width && self.bottom <= height
    }
}

impl Default for CropRect {
    fn default() -> Self {
        // 1000×500 region starting at (2500, 1500)
        Self::new(2500, 1500, 3500, 2000)
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})-({}, {}) [{}x{}]",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}

impl std::str::FromStr for CropRect {
    type Err = String;

    /// Parse `L,T,R,B`, as accepted by `--crop`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<u32> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<u32>()
                    .map_err(|e| format!("invalid crop coordinate '{}': {}", p.trim(), e))
            })
            .collect::<Result<_, _>>()?;
        match parts.as_slice() {
            [left, top, right, bottom] => Ok(Self::new(*left, *top, *right, *bottom)),
            _ => Err(format!(
                "expected 4 comma-separated values (left,top,right,bottom), got {}",
                parts.len()
            )),
        }
    }
}

//! Grid shape for a given number of crops.
//!
//! The shape comes from a fixed preference table rather than a packing
//! algorithm: each count gets the grid that reads best side by side, which
//! favors wide rows over tall columns. Counts outside the table are rejected.

use std::fmt;
use thiserror::Error;

/// Largest number of images a single comparison can hold.
pub const MAX_IMAGES: usize = 16;

/// `(rows, cols)` for 1..=16 images, indexed by `count - 1`.
const ARRANGEMENTS: [(u32, u32); MAX_IMAGES] = [
    (1, 1),
    (1, 2),
    (1, 3),
    (2, 2),
    (2, 3),
    (2, 3),
    (2, 4),
    (2, 8),
    (3, 3),
    (2, 5),
    (3, 4),
    (3, 4),
    (2, 7),
    (2, 7),
    (3, 5),
    (4, 4),
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArrangementError {
    #[error("Cannot arrange {count} images - maximum is {max}")]
    Unsupported { count: usize, max: usize },
}

/// Grid shape for the composed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrangement {
    pub rows: u32,
    pub cols: u32,
}

impl Arrangement {
    /// Number of grid cells, filled or not.
    pub fn cells(&self) -> usize {
        (self.rows * self.cols) as usize
    }
}

impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows x {} cols", self.rows, self.cols)
    }
}

/// Pick the grid for `count` images.
pub fn determine_arrangement(count: usize) -> Result<Arrangement, ArrangementError> {
    count
        .checked_sub(1)
        .and_then(|i| ARRANGEMENTS.get(i))
        .map(|&(rows, cols)| Arrangement { rows, cols })
        .ok_or(ArrangementError::Unsupported {
            count,
            max: MAX_IMAGES,
        })
}

//! The comparison pipeline: crop every input, annotate, tile, save.
//!
//! ```text
//! inputs ──crop──▶ crops ──annotate──▶ crops ──compose──▶ canvas ──save──▶ <stem>_<backend>.jpg
//! ```
//!
//! Images are handled strictly one at a time. The backend decodes a source,
//! cuts the rectangle out and drops the decoded source before the next input
//! is opened, so peak memory is one full-size image plus the small crops.
//!
//! The arrangement is chosen before any image is opened: an unsupported image
//! count fails immediately instead of after decoding sixteen photos.

use crate::annotate::Annotator;
use crate::arrangement::{Arrangement, ArrangementError, determine_arrangement};
use crate::config::{CompareConfig, ConfigError};
use crate::imaging::calculations::{canvas_dimensions, cell_origin};
use crate::imaging::{
    BackendError, CropRect, GlyphRenderer, ImageBackend, Quality, TextError, TextRenderer,
};
use crate::metadata::{AnnotationSource, InfoField, MetadataError, render_lines};
use crate::naming::derive_output_path;
use image::{Rgb, RgbImage, imageops};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Arrangement(#[from] ArrangementError),
    #[error(transparent)]
    Imaging(#[from] BackendError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Text(#[from] TextError),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Crop {index} is {}x{} but crop 0 is {}x{}", actual.0, actual.1, expected.0, expected.1)]
    MismatchedCrop {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("{count} crops do not fit a grid of {arrangement}")]
    TooManyCrops {
        count: usize,
        arrangement: Arrangement,
    },
    #[error("Nothing to compose")]
    NoCrops,
    #[error("Annotation fields were requested but no font is loaded")]
    NoRenderer,
}

/// Broad failure category, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Input,
    Metadata,
    Output,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration error",
            ErrorKind::Input => "input error",
            ErrorKind::Metadata => "metadata error",
            ErrorKind::Output => "output error",
        };
        f.write_str(name)
    }
}

impl CompareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompareError::Config(_)
            | CompareError::Arrangement(_)
            | CompareError::Text(_)
            | CompareError::NoRenderer => ErrorKind::Configuration,
            CompareError::Metadata(_) => ErrorKind::Metadata,
            CompareError::Write { .. } | CompareError::Imaging(BackendError::Encode { .. }) => {
                ErrorKind::Output
            }
            CompareError::Imaging(_)
            | CompareError::MismatchedCrop { .. }
            | CompareError::TooManyCrops { .. }
            | CompareError::NoCrops => ErrorKind::Input,
        }
    }
}

/// What to compare and where to put it.
#[derive(Debug, Clone)]
pub struct ComparisonRequest {
    pub inputs: Vec<PathBuf>,
    /// Base output path; the written file is derived from it.
    pub output: PathBuf,
    pub fields: Vec<InfoField>,
}

/// Load the annotation font for `request`, or `None` when no fields are drawn.
///
/// The image count is checked first, so an unsupported count is reported
/// even on a machine without a usable font.
pub fn load_renderer(
    request: &ComparisonRequest,
    font: Option<&Path>,
) -> Result<Option<GlyphRenderer>, CompareError> {
    determine_arrangement(request.inputs.len())?;
    if request.fields.is_empty() {
        return Ok(None);
    }
    let renderer = GlyphRenderer::discover(font)?;
    log::info!("annotation font: {}", renderer.path().display());
    Ok(Some(renderer))
}

/// Cut `rect` out of one image and, with an annotator, draw its fields on it.
///
/// EXIF is only read when a requested field needs it.
pub fn crop_and_annotate<B: ImageBackend>(
    backend: &B,
    path: &Path,
    rect: CropRect,
    annotator: Option<&Annotator>,
) -> Result<RgbImage, CompareError> {
    let mut crop = backend.crop(path, rect)?;

    let Some(annotator) = annotator.filter(|a| !a.fields().is_empty()) else {
        return Ok(crop);
    };

    let metadata = if annotator.needs_metadata() {
        backend.read_metadata(path)?
    } else {
        Default::default()
    };
    let source = AnnotationSource {
        path,
        metadata: &metadata,
    };
    let lines = render_lines(annotator.fields(), &source, annotator.policy())?;
    log::debug!("{}: {}", path.display(), lines.join(" | "));
    annotator.draw_lines(&mut crop, &lines);
    Ok(crop)
}

/// Tile equally sized crops row-major onto a black canvas.
///
/// Cells past the last crop stay black.
pub fn compose(crops: &[RgbImage], arrangement: Arrangement) -> Result<RgbImage, CompareError> {
    let first = crops.first().ok_or(CompareError::NoCrops)?;
    if crops.len() > arrangement.cells() {
        return Err(CompareError::TooManyCrops {
            count: crops.len(),
            arrangement,
        });
    }

    let cell = first.dimensions();
    if let Some((index, crop)) = crops
        .iter()
        .enumerate()
        .find(|(_, c)| c.dimensions() != cell)
    {
        return Err(CompareError::MismatchedCrop {
            index,
            expected: cell,
            actual: crop.dimensions(),
        });
    }

    let (width, height) = canvas_dimensions(arrangement.rows, arrangement.cols, cell);
    let mut canvas = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
    for (i, crop) in crops.iter().enumerate() {
        let (x, y) = cell_origin(i, arrangement.cols, cell);
        log::debug!("pasting crop {} at ({}, {})", i, x, y);
        imageops::replace(&mut canvas, crop, x as i64, y as i64);
    }
    Ok(canvas)
}

/// Run a whole comparison and return the path written.
///
/// `renderer` is only consulted when `request.fields` is non-empty.
pub fn run<B: ImageBackend>(
    request: &ComparisonRequest,
    config: &CompareConfig,
    backend: &B,
    renderer: Option<&dyn TextRenderer>,
) -> Result<PathBuf, CompareError> {
    let arrangement = determine_arrangement(request.inputs.len())?;
    let output = derive_output_path(&request.output, backend.name())?;

    let annotator = if request.fields.is_empty() {
        None
    } else {
        let renderer = renderer.ok_or(CompareError::NoRenderer)?;
        Some(Annotator::new(
            renderer,
            &config.annotation,
            request.fields.clone(),
        ))
    };

    let crops = request
        .inputs
        .iter()
        .map(|path| crop_and_annotate(backend, path, config.crop, annotator.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let canvas = compose(&crops, arrangement)?;
    log::info!(
        "{} crops as {} → {}x{} canvas",
        crops.len(),
        arrangement,
        canvas.width(),
        canvas.height()
    );

    backend
        .save_jpeg(&canvas, &output, Quality::new(config.output.quality))
        .map_err(|source| CompareError::Write {
            path: output.clone(),
            source,
        })?;
    Ok(output)
}

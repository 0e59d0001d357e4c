//! # cropgrid
//!
//! Cut the same rectangle out of several photos, label each crop with values
//! from its EXIF data, and tile the crops into one JPEG. Useful for comparing
//! lenses, apertures or cameras on an identical region of a scene.
//!
//! # Pipeline
//!
//! ```text
//! 1. Resolve    CLI + config.toml   →  CompareConfig, ComparisonRequest
//! 2. Extract    each input          →  crop (+ annotation lines)
//! 3. Layout     crops               →  canvas (fixed rows × cols table)
//! 4. Output     canvas              →  <stem>_<backend>.jpg
//! ```
//!
//! One image is decoded at a time; nothing runs in parallel.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compare`] | The pipeline: crop, annotate, compose, save |
//! | [`annotate`] | Outlined text layout on a crop |
//! | [`arrangement`] | Image count → grid shape table |
//! | [`metadata`] | `--info` fields and their formatting rules |
//! | [`config`] | Layered TOML configuration and validation |
//! | [`naming`] | Output file name derivation |
//! | [`imaging`] | Backend trait, pure-Rust backend, text rendering, geometry |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fixed Arrangement Table
//!
//! Grid shapes come from a lookup table for 1 to 16 images rather than a
//! packing algorithm. The table favors wide rows, which suits side-by-side
//! reading, and makes the output shape predictable from the input count.
//!
//! ## Backend-Suffixed Output
//!
//! The written file carries the backend name (`cmp.jpg` → `cmp_rust.jpg`).
//! The [`imaging::ImageBackend`] trait keeps decoding and encoding swappable,
//! and the suffix keeps outputs from different backends apart.
//!
//! ## Text Behind a Trait
//!
//! Annotation layout (line stacking and the eight-way outline) lives in
//! [`annotate`], above the [`imaging::TextRenderer`] trait. Glyph
//! rasterization is the only part that needs a font file, so the layout is
//! tested without one.

pub mod annotate;
pub mod arrangement;
pub mod compare;
pub mod config;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;

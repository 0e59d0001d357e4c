//! Output filename derivation.
//!
//! The written file is never exactly the `--output` path: the backend name is
//! appended to the stem and the extension is forced to `.jpg`, so runs with
//! different backends can sit side by side:
//!
//! - `out.jpg` → `out_rust.jpg`
//! - `shots/cmp.png` → `shots/cmp_rust.jpg`
//! - `cmp` → `cmp_rust.jpg`

use crate::config::ConfigError;
use std::path::{Path, PathBuf};

/// Derive the path actually written for `base` and a backend named `backend`.
pub fn derive_output_path(base: &Path, backend: &str) -> Result<PathBuf, ConfigError> {
    let stem = base
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ConfigError::Validation(format!(
                "output path '{}' has no file name",
                base.display()
            ))
        })?;
    let mut name = stem.to_os_string();
    name.push(format!("_{backend}.jpg"));
    Ok(base.with_file_name(name))
}

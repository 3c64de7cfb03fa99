//! Comparison results and diff packaging.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::image::{self, Raster};

/// Metrics and diff artifact returned for one comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Pixels in either input (they always share dimensions).
    pub total_pixels: u64,

    /// Pixels flagged as different.
    pub different_pixels: u64,

    /// `different_pixels / total_pixels * 100`, unrounded.
    pub difference_percentage: f64,

    /// Where the diff image went.
    #[serde(flatten)]
    pub diff_image: DiffImage,
}

/// The diff artifact: written to disk or carried inline, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DiffImage {
    /// Diff written to this path.
    #[serde(rename = "diffImagePath")]
    Path(PathBuf),

    /// PNG-encoded diff as base64.
    #[serde(rename = "diffImageEncodedBytes")]
    Encoded(String),
}

impl ComparisonResult {
    /// Path of the written diff image, if one was written.
    #[must_use]
    pub fn diff_image_path(&self) -> Option<&Path> {
        match &self.diff_image {
            DiffImage::Path(path) => Some(path),
            DiffImage::Encoded(_) => None,
        }
    }

    /// Base64 PNG of the diff image, if it was returned inline.
    #[must_use]
    pub fn diff_image_encoded(&self) -> Option<&str> {
        match &self.diff_image {
            DiffImage::Path(_) => None,
            DiffImage::Encoded(data) => Some(data),
        }
    }
}

/// Share of differing pixels as a percentage, with `0 / 0` defined as 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn difference_percentage(total_pixels: u64, different_pixels: u64) -> f64 {
    if total_pixels == 0 {
        return 0.0;
    }
    different_pixels as f64 / total_pixels as f64 * 100.0
}

/// Turn comparison counts and a diff raster into a [`ComparisonResult`].
///
/// With `output_path` the diff is written there and only the path is
/// returned. Without it the diff is PNG-encoded inline and the filesystem
/// is not touched. Concurrent calls sharing an output path race; the last
/// write wins.
///
/// # Errors
///
/// Returns an error if the diff cannot be encoded or written, or if the
/// inline encoding exceeds `max_inline_bytes`; no partial result is
/// returned in that case.
pub fn package(
    total_pixels: u64,
    different_pixels: u64,
    diff: &Raster,
    output_path: Option<&Path>,
    quality: u8,
    max_inline_bytes: usize,
) -> Result<ComparisonResult> {
    let diff_image = match output_path {
        Some(path) => {
            tracing::info!("Writing diff image to: {}", path.display());
            image::save_image(diff, path, quality)?;
            DiffImage::Path(path.to_path_buf())
        }
        None => {
            let encoded = image::encode_base64_png(diff)?;
            if encoded.len() > max_inline_bytes {
                return Err(Error::invalid(
                    "output_diff_path",
                    format!(
                        "inline diff is {} bytes, over the {max_inline_bytes} byte limit; \
                         pass an output path to write it to disk",
                        encoded.len()
                    ),
                ));
            }
            DiffImage::Encoded(encoded)
        }
    };

    Ok(ComparisonResult {
        total_pixels,
        different_pixels,
        difference_percentage: difference_percentage(total_pixels, different_pixels),
        diff_image,
    })
}

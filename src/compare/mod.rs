//! Pixel-level comparison of two rasters.

mod antialias;
mod color;

pub use color::{MAX_YIQ_DELTA, color_delta};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::image::{RGBA_CHANNELS, Raster};

use antialias::is_antialiased_either;
use color::faded_gray;

/// Images with at least this many pixels are compared row-parallel.
pub const PARALLEL_THRESHOLD: usize = 64 * 1024;

/// Default matching threshold (0.0-1.0, smaller is stricter).
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Options controlling how differences are detected and drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOptions {
    /// Matching threshold (0.0-1.0). Smaller values flag subtler changes.
    pub threshold: f64,

    /// Count anti-aliased pixels as differences instead of filtering them out.
    pub include_aa: bool,

    /// Opacity of the faded design image drawn behind the markers (0.0-1.0).
    pub alpha: f64,

    /// Marker color for differing pixels.
    pub diff_color: [u8; 3],

    /// Marker color for pixels filtered out as anti-aliasing.
    pub aa_color: [u8; 3],

    /// Leave matching pixels transparent instead of drawing the faded design.
    pub diff_mask: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            include_aa: false,
            alpha: 0.1,
            diff_color: [255, 0, 0],
            aa_color: [255, 255, 0],
            diff_mask: false,
        }
    }
}

impl DiffOptions {
    /// Validate the options.
    ///
    /// Out-of-range values are rejected rather than clamped.
    ///
    /// # Errors
    ///
    /// Returns an error if `threshold` or `alpha` is outside 0.0-1.0 or NaN.
    pub fn validate(&self) -> Result<()> {
        validate_unit("threshold", self.threshold)?;
        validate_unit("alpha", self.alpha)
    }
}

/// Check that `value` lies in the closed range 0.0-1.0.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] naming `name` otherwise, including for NaN.
pub fn validate_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid(
            name,
            format!("must be between 0.0 and 1.0, got {value}"),
        ))
    }
}

/// Outcome of comparing two rasters.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Number of pixels drawn with the difference marker.
    pub different_pixels: u64,

    /// Visual diff, same dimensions as the inputs.
    pub diff: Raster,
}

/// Compare a design raster against an implementation raster.
///
/// A pixel differs when its YIQ distance exceeds `MAX_YIQ_DELTA * threshold²`.
/// The count is the same whichever image is passed first; only the faded
/// background of the diff is taken from `design`.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the rasters differ in size and
/// [`Error::InvalidParameter`] if the options are out of range.
pub fn compare(design: &Raster, implementation: &Raster, options: &DiffOptions) -> Result<Comparison> {
    options.validate()?;

    if design.dimensions() != implementation.dimensions() {
        return Err(Error::DimensionMismatch {
            design: design.dimensions(),
            implementation: implementation.dimensions(),
        });
    }

    let (width, height) = design.dimensions();
    let mut diff = Raster::new(width, height);

    if design.as_raw() == implementation.as_raw() {
        if !options.diff_mask {
            for (out, src) in diff.pixels_mut().zip(design.pixels()) {
                let gray = faded_gray(src.0, options.alpha);
                out.0 = [gray, gray, gray, 255];
            }
        }
        return Ok(Comparison {
            different_pixels: 0,
            diff,
        });
    }

    let max_delta = MAX_YIQ_DELTA * options.threshold * options.threshold;
    let row_len = width as usize * RGBA_CHANNELS;
    let pixel_count = width as usize * height as usize;

    let compare_row = |(y, row): (usize, &mut [u8])| -> u64 {
        // Safe: y < height, which is a u32
        #[allow(clippy::cast_possible_truncation)]
        let y = y as u32;
        let mut count = 0;

        for (x, out) in (0..width).zip(row.chunks_exact_mut(RGBA_CHANNELS)) {
            let a = design.get_pixel(x, y).0;
            let b = implementation.get_pixel(x, y).0;

            let marker = if color_delta(a, b).abs() > max_delta {
                if !options.include_aa && is_antialiased_either(design, implementation, x, y) {
                    Some(options.aa_color)
                } else {
                    count += 1;
                    Some(options.diff_color)
                }
            } else {
                None
            };

            match marker {
                Some([r, g, b]) => out.copy_from_slice(&[r, g, b, 255]),
                None if !options.diff_mask => {
                    let gray = faded_gray(a, options.alpha);
                    out.copy_from_slice(&[gray, gray, gray, 255]);
                }
                None => {}
            }
        }

        count
    };

    let buffer: &mut [u8] = &mut diff;
    let different_pixels = if pixel_count >= PARALLEL_THRESHOLD {
        buffer.par_chunks_mut(row_len).enumerate().map(compare_row).sum::<u64>()
    } else {
        buffer.chunks_mut(row_len).enumerate().map(compare_row).sum::<u64>()
    };

    tracing::debug!("Compared {pixel_count} pixels, {different_pixels} differ");

    Ok(Comparison {
        different_pixels,
        diff,
    })
}

//! Anti-aliasing detection.
//!
//! A pixel is treated as anti-aliased when, in one image, it sits on a
//! brightness gradient between a darker and a brighter neighbour, and at
//! least one of those neighbours lies inside a flat region in both images.
//! Such pixels are rendering noise along edges rather than real changes.

use crate::image::Raster;

use super::color::brightness_delta;

/// Check whether the pixel at `(x, y)` is anti-aliased in either image.
///
/// Evaluating both orderings keeps the result independent of which image
/// is the design and which the implementation.
#[must_use]
pub fn is_antialiased_either(a: &Raster, b: &Raster, x: u32, y: u32) -> bool {
    is_antialiased(a, b, x, y) || is_antialiased(b, a, x, y)
}

fn is_antialiased(img: &Raster, other: &Raster, x: u32, y: u32) -> bool {
    let (width, height) = img.dimensions();
    let center = img.get_pixel(x, y).0;

    let mut zeroes = u32::from(on_border(x, y, width, height));
    let mut min = 0.0_f64;
    let mut max = 0.0_f64;
    let mut brighter = None;
    let mut darker = None;

    for (nx, ny) in neighbours(x, y, width, height) {
        let delta = brightness_delta(center, img.get_pixel(nx, ny).0);

        if delta == 0.0 {
            zeroes += 1;
            if zeroes > 2 {
                return false;
            }
        } else if delta < min {
            min = delta;
            brighter = Some((nx, ny));
        } else if delta > max {
            max = delta;
            darker = Some((nx, ny));
        }
    }

    let (Some(brighter), Some(darker)) = (brighter, darker) else {
        return false;
    };

    let flat_in_both =
        |(px, py): (u32, u32)| has_many_siblings(img, px, py) && has_many_siblings(other, px, py);

    flat_in_both(brighter) || flat_in_both(darker)
}

/// At least three neighbours share the exact color of `(x, y)`.
fn has_many_siblings(img: &Raster, x: u32, y: u32) -> bool {
    let (width, height) = img.dimensions();
    let center = img.get_pixel(x, y);

    let mut zeroes = u32::from(on_border(x, y, width, height));

    for (nx, ny) in neighbours(x, y, width, height) {
        if img.get_pixel(nx, ny) == center {
            zeroes += 1;
        }
        if zeroes > 2 {
            return true;
        }
    }

    false
}

const fn on_border(x: u32, y: u32, width: u32, height: u32) -> bool {
    x == 0 || y == 0 || x + 1 >= width || y + 1 >= height
}

/// The up to eight in-bounds neighbours of `(x, y)`.
fn neighbours(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let x0 = x.saturating_sub(1);
    let y0 = y.saturating_sub(1);
    let x1 = (x + 1).min(width - 1);
    let y1 = (y + 1).min(height - 1);

    (x0..=x1)
        .flat_map(move |nx| (y0..=y1).map(move |ny| (nx, ny)))
        .filter(move |&(nx, ny)| nx != x || ny != y)
}

//! Perceptual color distance in the YIQ color space.

/// Upper bound of the absolute value of [`color_delta`] over all opaque colors.
pub const MAX_YIQ_DELTA: f64 = 35215.0;

/// Squared YIQ distance between two RGBA pixels.
///
/// Semi-transparent pixels are blended over white first. The sign is
/// negative when `a` is brighter than `b`; callers comparing against a
/// threshold use the absolute value, which is symmetric in `a` and `b`.
#[must_use]
pub fn color_delta(a: [u8; 4], b: [u8; 4]) -> f64 {
    if a == b {
        return 0.0;
    }

    let (r1, g1, b1) = blend_over_white(a);
    let (r2, g2, b2) = blend_over_white(b);

    let y1 = rgb_to_y(r1, g1, b1);
    let y2 = rgb_to_y(r2, g2, b2);
    let y = y1 - y2;
    let i = rgb_to_i(r1, g1, b1) - rgb_to_i(r2, g2, b2);
    let q = rgb_to_q(r1, g1, b1) - rgb_to_q(r2, g2, b2);

    let delta = 0.5053_f64.mul_add(y * y, 0.299_f64.mul_add(i * i, 0.1957 * q * q));

    if y1 > y2 { -delta } else { delta }
}

/// Signed brightness difference only, used by the anti-aliasing detector.
#[must_use]
pub fn brightness_delta(a: [u8; 4], b: [u8; 4]) -> f64 {
    if a == b {
        return 0.0;
    }

    let (r1, g1, b1) = blend_over_white(a);
    let (r2, g2, b2) = blend_over_white(b);

    rgb_to_y(r1, g1, b1) - rgb_to_y(r2, g2, b2)
}

/// Luminance of a pixel faded toward white by `alpha` (0.0-1.0).
#[must_use]
pub fn faded_gray(pixel: [u8; 4], alpha: f64) -> u8 {
    let (r, g, b) = blend_over_white(pixel);
    let y = rgb_to_y(r, g, b);
    let weight = alpha * f64::from(pixel[3]) / 255.0;

    // Safe: blend of two values in [0, 255] stays in range
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let gray = blend(y, weight).round().clamp(0.0, 255.0) as u8;
    gray
}

#[inline]
fn blend_over_white(pixel: [u8; 4]) -> (f64, f64, f64) {
    let [r, g, b, a] = pixel.map(f64::from);
    if pixel[3] == 255 {
        return (r, g, b);
    }
    let alpha = a / 255.0;
    (blend(r, alpha), blend(g, alpha), blend(b, alpha))
}

#[inline]
fn blend(channel: f64, alpha: f64) -> f64 {
    (channel - 255.0).mul_add(alpha, 255.0)
}

#[inline]
fn rgb_to_y(r: f64, g: f64, b: f64) -> f64 {
    0.298_895_31_f64.mul_add(r, 0.586_622_47_f64.mul_add(g, 0.114_482_23 * b))
}

#[inline]
fn rgb_to_i(r: f64, g: f64, b: f64) -> f64 {
    0.595_977_99_f64.mul_add(r, (-0.274_176_10_f64).mul_add(g, -0.321_801_89 * b))
}

#[inline]
fn rgb_to_q(r: f64, g: f64, b: f64) -> f64 {
    0.211_470_17_f64.mul_add(r, (-0.522_617_11_f64).mul_add(g, 0.311_146_94 * b))
}

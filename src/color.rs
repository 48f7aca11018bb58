// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Hue conversions.  Both follow the classic `colorsys` formulas, so
//! hues outside `[0, 1)` wrap around rather than clamp.

use num::clamp;

/// A color with channels in `[0, 1]`.
pub type Rgb = [f64; 3];

/// An 8-bit-per-channel color.
pub type Rgb8 = [u8; 3];

/// Pure black.
pub const BLACK: Rgb8 = [0, 0, 0];

const ONE_THIRD: f64 = 1.0 / 3.0;
const ONE_SIXTH: f64 = 1.0 / 6.0;
const TWO_THIRD: f64 = 2.0 / 3.0;

/// Hue, saturation, value to red, green, blue.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    if s == 0.0 {
        return [v, v, v];
    }
    let sector = (h * 6.0).trunc();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i64).rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

fn hls_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < ONE_SIXTH {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < TWO_THIRD {
        m1 + (m2 - m1) * (TWO_THIRD - hue) * 6.0
    } else {
        m1
    }
}

/// Hue, lightness, saturation to red, green, blue.
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> Rgb {
    if s == 0.0 {
        return [l, l, l];
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - (l * s) };
    let m1 = 2.0 * l - m2;
    [
        hls_channel(m1, m2, h + ONE_THIRD),
        hls_channel(m1, m2, h),
        hls_channel(m1, m2, h - ONE_THIRD),
    ]
}

/// Scale a unit color to bytes, rounding to nearest.  Out-of-range and
/// NaN channels are clamped to the ends.
pub fn to_rgb8(color: Rgb) -> Rgb8 {
    let channel = |c: f64| -> u8 {
        if c.is_nan() {
            0
        } else {
            clamp((c * 255.0).round(), 0.0, 255.0) as u8
        }
    };
    [channel(color[0]), channel(color[1]), channel(color[2])]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-12)
    }

    #[test]
    fn primary_hues() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [1.0, 0.0, 0.0]);
        assert!(close(hsv_to_rgb(ONE_THIRD, 1.0, 1.0), [0.0, 1.0, 0.0]));
        assert!(close(hsv_to_rgb(TWO_THIRD, 1.0, 1.0), [0.0, 0.0, 1.0]));
    }

    #[test]
    fn zero_saturation_is_gray() {
        assert_eq!(hsv_to_rgb(0.42, 0.0, 0.5), [0.5, 0.5, 0.5]);
        assert_eq!(hls_to_rgb(0.42, 0.3, 0.0), [0.3, 0.3, 0.3]);
    }

    #[test]
    fn hsv_hue_wraps() {
        assert!(close(hsv_to_rgb(1.25, 0.8, 1.0), hsv_to_rgb(0.25, 0.8, 1.0)));
        assert!(close(hsv_to_rgb(2.5, 0.8, 1.0), hsv_to_rgb(0.5, 0.8, 1.0)));
    }

    #[test]
    fn hsv_matches_reference_values() {
        // colorsys.hsv_to_rgb(0.1, 0.8, 1) == (1.0, 0.68, 0.2)
        assert!(close(hsv_to_rgb(0.1, 0.8, 1.0), [1.0, 0.68, 0.2]));
    }

    #[test]
    fn hls_primaries_and_wrap() {
        assert!(close(hls_to_rgb(0.0, 0.5, 1.0), [1.0, 0.0, 0.0]));
        assert!(close(hls_to_rgb(ONE_THIRD, 0.5, 1.0), [0.0, 1.0, 0.0]));
        assert!(close(hls_to_rgb(-0.5, 0.5, 1.0), hls_to_rgb(0.5, 0.5, 1.0)));
        assert!(close(hls_to_rgb(0.0, 1.0, 1.0), [1.0, 1.0, 1.0]));
    }

    #[test]
    fn bytes_round_and_clamp() {
        assert_eq!(to_rgb8([1.0, 0.5, 0.0]), [255, 128, 0]);
        assert_eq!(to_rgb8([1.2, -0.1, ::std::f64::NAN]), [255, 0, 0]);
    }
}

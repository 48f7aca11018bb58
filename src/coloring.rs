// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Coloring strategies: the functions that decide what color a point
//! should be based on the iterations it took to go over the escape
//! radius.
//!
//! A strategy sees every input it could want in a `ColorInput`,
//! including the sealed histogram of the whole frame.  Points inside
//! the set never reach a strategy; the pipeline paints them black.

use std::fmt;
use std::str::FromStr;

use color::{hsv_to_rgb, Rgb};
use histogram::Histogram;

/// Everything a strategy may consult for one point.
#[derive(Copy, Clone, Debug)]
pub struct ColorInput<'a> {
    /// Integer escape count.
    pub iterations: usize,
    /// Smoothed escape count.
    pub smoothed: f64,
    /// The iteration cap of the pass.
    pub max_iterations: usize,
    /// Total histogram weight of the frame.
    pub total_iterations: f64,
    /// The frame's completed histogram.
    pub histogram: &'a Histogram,
    /// Configured saturation, `[0, 1]`.
    pub saturation: f64,
}

/// A pure mapping from a point's escape data to a unit RGB color.
pub trait ColorStrategy: Send + Sync + fmt::Debug {
    /// Map one escaping point.
    fn color(&self, input: &ColorInput) -> Rgb;
}

/// The built-in strategies.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Coloring {
    /// Hue is the fraction of the iteration cap used.
    Iterative,
    /// Hue is the fraction of the frame's histogram weight below the
    /// point's count.  Spreads colors evenly however the counts cluster.
    Histogram,
    /// Hue is the smoothed count over `max_iterations ^ exponent`.
    Smooth {
        /// Exponent applied to the iteration cap.
        exponent: f64,
    },
    /// Hue is the fourth root of the smoothed count.
    FourthRoot,
    /// Gray level is the square root of the fraction of the cap used.
    Grayscale,
}

/// Exponent used by `Coloring::Smooth` unless told otherwise.
pub const DEFAULT_SMOOTH_EXPONENT: f64 = 1.1;

impl Coloring {
    /// The names accepted by `from_str`.
    pub const NAMES: &'static [&'static str] =
        &["iterative", "histogram", "smooth", "fourth-root", "grayscale"];

    /// `Smooth` with the default exponent.
    pub fn smooth() -> Coloring {
        Coloring::Smooth {
            exponent: DEFAULT_SMOOTH_EXPONENT,
        }
    }
}

impl Default for Coloring {
    fn default() -> Coloring {
        Coloring::FourthRoot
    }
}

impl ColorStrategy for Coloring {
    fn color(&self, input: &ColorInput) -> Rgb {
        match *self {
            Coloring::Iterative => {
                let hue = input.iterations as f64 / input.max_iterations as f64;
                hsv_to_rgb(hue, input.saturation, 1.0)
            }
            Coloring::Histogram => {
                if input.total_iterations == 0.0 {
                    return [0.0, 0.0, 0.0];
                }
                let hue = input.histogram.cumulative(input.iterations) / input.total_iterations;
                hsv_to_rgb(hue, input.saturation, 1.0)
            }
            Coloring::Smooth { exponent } => {
                let hue = input.smoothed / (input.max_iterations as f64).powf(exponent);
                hsv_to_rgb(hue, input.saturation, 1.0)
            }
            Coloring::FourthRoot => hsv_to_rgb(input.smoothed.powf(0.25), input.saturation, 1.0),
            Coloring::Grayscale => {
                let level = (input.iterations as f64 / input.max_iterations as f64).sqrt();
                [level, level, level]
            }
        }
    }
}

impl fmt::Display for Coloring {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Coloring::Iterative => write!(f, "iterative"),
            Coloring::Histogram => write!(f, "histogram"),
            Coloring::Smooth { exponent } => write!(f, "smooth:{}", exponent),
            Coloring::FourthRoot => write!(f, "fourth-root"),
            Coloring::Grayscale => write!(f, "grayscale"),
        }
    }
}

/// Parses `iterative`, `histogram`, `smooth`, `smooth:<exponent>`,
/// `fourth-root` and `grayscale`.
impl FromStr for Coloring {
    type Err = String;

    fn from_str(s: &str) -> Result<Coloring, String> {
        let mut parts = s.splitn(2, ':');
        let name = parts.next().unwrap_or("").trim().to_lowercase();
        let argument = parts.next();
        match (name.as_str(), argument) {
            ("iterative", None) => Ok(Coloring::Iterative),
            ("histogram", None) => Ok(Coloring::Histogram),
            ("smooth", None) => Ok(Coloring::smooth()),
            ("smooth", Some(exp)) => match f64::from_str(exp.trim()) {
                Ok(exponent) if exponent.is_finite() && exponent > 0.0 => {
                    Ok(Coloring::Smooth { exponent })
                }
                _ => Err(format!("Could not parse smoothing exponent '{}'", exp)),
            },
            ("fourth-root", None) | ("fourthroot", None) => Ok(Coloring::FourthRoot),
            ("grayscale", None) | ("greyscale", None) => Ok(Coloring::Grayscale),
            _ => Err(format!(
                "Unknown coloring '{}', expected one of: {}",
                s,
                Coloring::NAMES.join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape::EscapeTime;
    use histogram::IterationHistogram;

    fn input<'a>(iterations: usize, smoothed: f64, histogram: &'a Histogram) -> ColorInput<'a> {
        ColorInput {
            iterations,
            smoothed,
            max_iterations: 64,
            total_iterations: histogram.total(),
            histogram,
            saturation: 0.8,
        }
    }

    #[test]
    fn iterative_uses_cap_fraction() {
        let h = Histogram::empty(64);
        let c = Coloring::Iterative.color(&input(16, 16.2, &h));
        assert_eq!(c, hsv_to_rgb(0.25, 0.8, 1.0));
    }

    #[test]
    fn histogram_uses_weight_below_count() {
        let mut acc = IterationHistogram::new(64);
        acc.record(&EscapeTime { count: 1, smoothed: 1.0 });
        acc.record(&EscapeTime { count: 2, smoothed: 3.0 });
        acc.record(&EscapeTime { count: 5, smoothed: 4.0 });
        let h = acc.seal();
        let c = Coloring::Histogram.color(&input(2, 2.0, &h));
        assert_eq!(c, hsv_to_rgb(4.0 / 8.0, 0.8, 1.0));
        let c = Coloring::Histogram.color(&input(5, 5.0, &h));
        assert_eq!(c, hsv_to_rgb(8.0 / 8.0, 0.8, 1.0));
    }

    #[test]
    fn histogram_of_empty_frame_is_black() {
        let h = Histogram::empty(64);
        assert_eq!(Coloring::Histogram.color(&input(3, 3.0, &h)), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn smooth_tolerates_overshoot() {
        let h = Histogram::empty(64);
        let c = Coloring::smooth().color(&input(63, 64.3, &h));
        assert!(c.iter().all(|v| *v >= 0.0 && *v <= 1.0));
    }

    #[test]
    fn fourth_root_and_grayscale() {
        let h = Histogram::empty(64);
        let c = Coloring::FourthRoot.color(&input(16, 16.0, &h));
        assert_eq!(c, hsv_to_rgb(16f64.powf(0.25), 0.8, 1.0));
        let g = Coloring::Grayscale.color(&input(16, 16.0, &h));
        assert_eq!(g, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn names_round_trip_through_display() {
        for name in Coloring::NAMES {
            let c: Coloring = name.parse().unwrap();
            let again: Coloring = format!("{}", c).parse().unwrap();
            assert_eq!(c, again);
        }
        assert_eq!(
            "smooth:1.5".parse::<Coloring>(),
            Ok(Coloring::Smooth { exponent: 1.5 })
        );
        assert!("plaid".parse::<Coloring>().is_err());
        assert!("smooth:-1".parse::<Coloring>().is_err());
    }
}

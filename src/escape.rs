// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time iteration.  A point `c` is fed through
//! `z -> z * z + c` starting at zero, and the number of steps it takes
//! `z` to leave a circle of `escape_radius` is its escape time.  Points
//! that never leave within `max_iterations` are taken to be in the set.
//!
//! Before iterating, a point is checked against the closed-form
//! description of the main cardioid (and optionally the period-2 bulb);
//! points inside those never escape, so running the loop for them is
//! wasted effort.

use num::Complex;

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// The result of iterating a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeTime {
    /// Iterations taken to escape.  Zero for points short-circuited as
    /// members, `max_iterations` for points that never escaped.
    pub count: usize,
    /// The continuous refinement of `count`.  Can overshoot
    /// `max_iterations` slightly.
    pub smoothed: f64,
}

impl EscapeTime {
    /// The value reported for points proven to be members analytically.
    pub const MEMBER: EscapeTime = EscapeTime {
        count: 0,
        smoothed: 0.0,
    };

    /// Both short-circuited and non-escaping points are inside the set.
    #[inline]
    pub fn is_interior(&self, max_iterations: usize) -> bool {
        self.count == 0 || self.count >= max_iterations
    }
}

/// True if `c` lies strictly inside the main cardioid.
#[inline]
pub fn in_main_cardioid(c: Complex<f64>) -> bool {
    let y2 = c.im * c.im;
    let q = (c.re - D4) * (c.re - D4) + y2;
    q * (q + (c.re - D4)) < D4 * y2
}

/// True if `c` lies strictly inside the period-2 bulb, the disk of
/// radius 1/4 centered on -1.
#[inline]
pub fn in_period2_bulb(c: Complex<f64>) -> bool {
    (c.re + 1.0) * (c.re + 1.0) + c.im * c.im < D16
}

/// `n + 1 - log2(|ln|z||)`.  A zero `z`, or any result that is not a
/// finite non-negative number, counts as zero.
#[inline]
fn smooth(n: usize, z: Complex<f64>) -> f64 {
    if z.re == 0.0 && z.im == 0.0 {
        return 0.0;
    }
    let s = (n as f64) + 1.0 - z.norm().ln().abs().log2();
    if s.is_finite() && s > 0.0 {
        s
    } else {
        0.0
    }
}

/// This is our classic iterator function.  The escape test runs before
/// each step, so a point takes at least one step, and the final `z` is
/// used for the smoothed count whether or not it escaped.
/// `escape_radius` should be at least 2 for the smoothing to be
/// meaningful.
pub fn iterate_sample(c: Complex<f64>, max_iterations: usize, escape_radius: f64) -> EscapeTime {
    let limit = escape_radius * escape_radius;
    let mut z: Complex<f64> = Complex::new(0.0, 0.0);
    for n in 0..max_iterations {
        if z.norm_sqr() >= limit {
            return EscapeTime {
                count: n,
                smoothed: smooth(n, z),
            };
        }
        z = z * z + c;
    }
    EscapeTime {
        count: max_iterations,
        smoothed: smooth(max_iterations, z),
    }
}

/// Knobs for evaluating a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeParams {
    /// Iteration cap.
    pub max_iterations: usize,
    /// Radius of the escape circle.
    pub escape_radius: f64,
    /// Also short-circuit the period-2 bulb.
    pub bulb_check: bool,
}

impl EscapeParams {
    /// Evaluate one point, short-circuiting analytic members.
    #[inline]
    pub fn evaluate(&self, c: Complex<f64>) -> EscapeTime {
        if in_main_cardioid(c) || (self.bulb_check && in_period2_bulb(c)) {
            return EscapeTime::MEMBER;
        }
        iterate_sample(c, self.max_iterations, self.escape_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(max_iterations: usize) -> EscapeParams {
        EscapeParams {
            max_iterations,
            escape_radius: 4.0,
            bulb_check: false,
        }
    }

    #[test]
    fn origin_is_in_the_cardioid() {
        assert!(in_main_cardioid(Complex::new(0.0, 0.0)));
        assert_eq!(params(64).evaluate(Complex::new(0.0, 0.0)), EscapeTime::MEMBER);
    }

    #[test]
    fn cardioid_excludes_outside_points() {
        assert!(!in_main_cardioid(Complex::new(0.5, 0.0)));
        assert!(!in_main_cardioid(Complex::new(-1.0, 0.0)));
        assert!(!in_main_cardioid(Complex::new(10.0, 10.0)));
        assert!(in_main_cardioid(Complex::new(-0.5, 0.3)));
    }

    #[test]
    fn bulb_check_is_opt_in() {
        let c = Complex::new(-1.0, 0.0);
        assert!(in_period2_bulb(c));
        assert_eq!(params(64).evaluate(c).count, 64);
        let with_bulb = EscapeParams {
            bulb_check: true,
            ..params(64)
        };
        assert_eq!(with_bulb.evaluate(c), EscapeTime::MEMBER);
    }

    #[test]
    fn far_points_escape_at_once() {
        let e = iterate_sample(Complex::new(10.0, 10.0), 64, 4.0);
        assert_eq!(e.count, 1);
        assert!(e.smoothed > 0.0);
    }

    #[test]
    fn escape_count_matches_hand_iteration() {
        // z1 = 1.3+2i (|z|^2 = 5.69), z2 = -1.01+7.2i escapes
        let e = iterate_sample(Complex::new(1.3, 2.0), 64, 4.0);
        assert_eq!(e.count, 2);
        let z2: Complex<f64> = Complex::new(-1.01, 7.2);
        let expected = 3.0 - z2.norm().ln().abs().log2();
        assert!((e.smoothed - expected).abs() < 1e-9);
    }

    #[test]
    fn non_escaping_points_hit_the_cap() {
        let e = iterate_sample(Complex::new(-1.0, 0.0), 100, 4.0);
        assert_eq!(e.count, 100);
        assert!(e.is_interior(100));
    }

    #[test]
    fn smoothed_is_zero_for_zero_orbit() {
        // c = 0 never leaves zero
        let e = iterate_sample(Complex::new(0.0, 0.0), 16, 4.0);
        assert_eq!(e, EscapeTime { count: 16, smoothed: 0.0 });
    }

    #[test]
    fn smoothed_stays_near_count_for_escapees() {
        let e = iterate_sample(Complex::new(0.5, 0.5), 256, 4.0);
        assert!(e.count < 256);
        assert!(e.smoothed >= 0.0);
        assert!((e.smoothed - e.count as f64).abs() < 2.0);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Grid struct, which describes a relationship between a
//! square of sample positions on the integral plane, with an origin at
//! 0,0, and a rectangle on the complex plane defined by its
//! left-lower and right-upper corners.  Unlike a pixel mapper that
//! divides the region into cells, the grid samples *both* edges of the
//! region: the first and last samples on each axis land exactly on the
//! corners.
use itertools::iproduct;
use num::Complex;

use errors::{invalid, Result};

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// Describes the column, row of a sample in the grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Evenly spaced values from `start` to `stop`, inclusive of both.  The
/// i-th value is always `start + i * step`, and the final value is
/// pinned to `stop` so it can't drift.
pub fn linspace(start: f64, stop: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / ((samples - 1) as f64);
            let mut values: Vec<f64> = (0..samples).map(|i| start + (i as f64) * step).collect();
            values[samples - 1] = stop;
            values
        }
    }
}

/// A `samples x samples` lattice of complex numbers.  Rows follow the
/// imaginary axis upward from the lower edge, columns follow the real
/// axis rightward from the left edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    /// The two coordinates defining the sampled region, left-lower and
    /// right-upper.
    pub complex_plane: ComplexPlane,
    samples: usize,
    re: Vec<f64>,
    im: Vec<f64>,
}

impl Grid {
    /// Build the grid spanning `[x_min, x_max] x [y_min, y_max]` with
    /// `samples` points on each axis.
    pub fn build(x_min: f64, x_max: f64, y_min: f64, y_max: f64, samples: usize) -> Result<Grid> {
        Grid::new(
            samples,
            Complex::new(x_min, y_min),
            Complex::new(x_max, y_max),
        )
    }

    /// Constructor.  Takes the resolution and the two corners of the
    /// complex region.
    pub fn new(samples: usize, leftlower: Complex<f64>, rightupper: Complex<f64>) -> Result<Grid> {
        if samples < 1 {
            return invalid("a grid needs at least one sample per axis");
        }
        let corners = [leftlower.re, leftlower.im, rightupper.re, rightupper.im];
        if corners.iter().any(|v| !v.is_finite()) {
            return invalid("grid bounds must be finite");
        }
        if leftlower.re >= rightupper.re {
            return invalid("the left lower corner is not to the left of the right upper corner");
        }
        if leftlower.im >= rightupper.im {
            return invalid("the left lower corner is not lower than the right upper corner");
        }

        Ok(Grid {
            complex_plane: ComplexPlane(leftlower, rightupper),
            samples,
            re: linspace(leftlower.re, rightupper.re, samples),
            im: linspace(leftlower.im, rightupper.im, samples),
        })
    }

    /// Samples per axis.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// The total number of points in the grid.
    pub fn len(&self) -> usize {
        self.samples * self.samples
    }

    /// A grid always holds at least one point.
    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// The sampled real-axis values, left to right.
    pub fn real_axis(&self) -> &[f64] {
        &self.re
    }

    /// The sampled imaginary-axis values, bottom to top.
    pub fn imaginary_axis(&self) -> &[f64] {
        &self.im
    }

    /// Given a sample position on the integral plane, return the
    /// complex number it stands for.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(self.re[pixel.0], self.im[pixel.1])
    }

    /// Given a complex number, find the nearest sample position, or
    /// None if the number lies outside the sampled region.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let ComplexPlane(ll, ru) = self.complex_plane;
        if point.re < ll.re || point.re > ru.re || point.im < ll.im || point.im > ru.im {
            return None;
        }
        let nearest = |value: f64, low: f64, high: f64| -> usize {
            if self.samples == 1 {
                return 0;
            }
            let step = (high - low) / ((self.samples - 1) as f64);
            (((value - low) / step).round() as usize).min(self.samples - 1)
        };
        Some(Pixel(
            nearest(point.re, ll.re, ru.re),
            nearest(point.im, ll.im, ru.im),
        ))
    }

    /// The linear offset of a sample position in row-major order.
    pub fn offset(&self, pixel: &Pixel) -> usize {
        pixel.1 * self.samples + pixel.0
    }

    /// All points of one row, left to right.
    pub fn row<'a>(&'a self, row: usize) -> impl Iterator<Item = Complex<f64>> + 'a {
        let im = self.im[row];
        self.re.iter().map(move |&re| Complex::new(re, im))
    }

    /// All points in row-major order.
    pub fn points<'a>(&'a self) -> impl Iterator<Item = Complex<f64>> + 'a {
        iproduct!(self.im.iter(), self.re.iter()).map(|(&im, &re)| Complex::new(re, im))
    }
}

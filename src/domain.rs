// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Domain coloring: paint every point `z` of a grid by the value of
//! some `f(z)`.  The argument of `f(z)` picks the hue and its magnitude
//! the lightness, so zeros show up black, poles white, and the colors
//! wind around each of them.
//!
//! See <https://en.wikipedia.org/wiki/Domain_coloring>.

use std::f64::consts::PI;

use num::Complex;

use color::{hls_to_rgb, to_rgb8, Rgb};
use errors::{invalid, Result};
use pixels::PixelBuffer;
use planes::Grid;

/// Hue from the argument, lightness `1 - base^|w|`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DomainColoring {
    base: f64,
}

impl Default for DomainColoring {
    fn default() -> DomainColoring {
        DomainColoring { base: 0.9 }
    }
}

impl DomainColoring {
    /// `base` controls how fast lightness rises with magnitude and must
    /// lie strictly between 0 and 1.
    pub fn new(base: f64) -> Result<DomainColoring> {
        if base > 0.0 && base < 1.0 {
            Ok(DomainColoring { base })
        } else {
            invalid(format!("domain coloring base must be in (0, 1), got {}", base))
        }
    }

    /// The whole-number window the plain domain plot uses: -10 to 10 on
    /// both axes at 500 samples.
    pub fn default_grid() -> Result<Grid> {
        Grid::build(-10.0, 10.0, -10.0, 10.0, 500)
    }

    /// The color of a single value.
    pub fn color(&self, w: Complex<f64>) -> Rgb {
        let hue = w.arg() / (2.0 * PI);
        let lightness = 1.0 - self.base.powf(w.norm());
        hls_to_rgb(hue, lightness, 1.0)
    }

    /// Color every grid point by `f` applied to it.
    pub fn render<F>(&self, grid: &Grid, f: F) -> PixelBuffer
    where
        F: Fn(Complex<f64>) -> Complex<f64>,
    {
        let mut buffer = PixelBuffer::new(grid.samples(), grid.samples());
        for (pixel, z) in buffer.pixels_mut().iter_mut().zip(grid.points()) {
            *pixel = to_rgb8(self.color(f(z)));
        }
        buffer
    }
}

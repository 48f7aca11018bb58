// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The finished raster.  A `PixelBuffer` is laid out like the grid it
//! was rendered from: row 0 is the bottom edge of the complex region.
//! `to_rgb_bytes` flips it into the top-down order image writers
//! expect, so the imaginary axis points up in the saved file.

use rand::Rng;

use color::{Rgb8, BLACK};

/// An RGB8 raster in grid order.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb8>,
}

impl PixelBuffer {
    /// An all-black buffer.
    pub fn new(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer {
            width,
            height,
            pixels: vec![BLACK; width * height],
        }
    }

    /// Wrap existing pixels, which must number `width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb8>) -> Option<PixelBuffer> {
        if pixels.len() == width * height {
            Some(PixelBuffer {
                width,
                height,
                pixels,
            })
        } else {
            None
        }
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major in grid order.
    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Rgb8] {
        &mut self.pixels
    }

    /// The pixel at a grid column and row.
    pub fn get(&self, column: usize, row: usize) -> Option<Rgb8> {
        if column < self.width && row < self.height {
            Some(self.pixels[row * self.width + column])
        } else {
            None
        }
    }

    /// Flat RGB bytes, top row first.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        if self.width == 0 {
            return bytes;
        }
        for row in self.pixels.chunks(self.width).rev() {
            for pixel in row {
                bytes.extend_from_slice(pixel);
            }
        }
        bytes
    }

    /// Exact fraction of pure black pixels.
    pub fn black_fraction(&self) -> f64 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let black = self.pixels.iter().filter(|p| **p == BLACK).count();
        black as f64 / self.pixels.len() as f64
    }

    /// Estimate the black fraction from `samples` randomly chosen
    /// pixels.
    pub fn estimate_blackness<R: Rng>(&self, rng: &mut R, samples: usize) -> f64 {
        if self.pixels.is_empty() || samples == 0 {
            return 0.0;
        }
        let black = (0..samples)
            .filter(|_| self.pixels[rng.gen_range(0, self.pixels.len())] == BLACK)
            .count();
        black as f64 / samples as f64
    }

    /// True if the sampled black fraction exceeds `limit`.
    pub fn is_mostly_black<R: Rng>(&self, rng: &mut R, samples: usize, limit: f64) -> bool {
        self.estimate_blackness(rng, samples) > limit
    }
}

#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring `z` and adding `c`, starting from
//! zero, never runs off to infinity.  Points outside the set do run
//! off, and how many squarings that takes (the "escape time") is the
//! number used to color them.  Points inside are painted black.
//!
//! A render goes through a fixed pipeline:
//!
//! - A `RenderConfig` is validated into an immutable `RenderPlan`.
//! - If asked, `calibrate` searches for an iteration cap that leaves
//!   the image no blacker than a limit, by rendering a coarse copy of
//!   the view at increasing caps.
//! - `render::evaluate` computes the escape time of every point on the
//!   plan's `Grid`, across threads, and tallies the iteration histogram.
//! - `render::colorize` turns each escape time into a color through a
//!   `ColorStrategy`, once the whole frame is known.
//!
//! The crate also does plain domain coloring of any complex function
//! (see `domain`), which uses the same grids and pixel buffers.

extern crate crossbeam;
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate rand;

pub mod calibrate;
pub mod cancel;
pub mod color;
pub mod coloring;
pub mod config;
pub mod domain;
pub mod errors;
pub mod escape;
pub mod histogram;
pub mod observer;
pub mod pixels;
pub mod planes;
pub mod render;
pub mod session;

pub use calibrate::{find_max_iterations, Calibration};
pub use cancel::CancelToken;
pub use coloring::{ColorInput, ColorStrategy, Coloring};
pub use config::{CalibrationSettings, RenderConfig, RenderPlan, Viewport};
pub use domain::DomainColoring;
pub use errors::{MandelbrotError, Result};
pub use escape::EscapeTime;
pub use observer::{LogObserver, NullObserver, RenderObserver};
pub use pixels::PixelBuffer;
pub use planes::Grid;
pub use render::{render, Frame, Render, RenderContext};
pub use session::Session;

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render pipeline.  Rendering is two passes over the grid:
//!
//! 1. `evaluate` iterates every point and fills the histogram.  Rows
//!    are grouped into bands which worker threads pull from a shared
//!    queue; each band keeps its own partial histogram, and the bands
//!    are merged in band order once every worker has joined.  The
//!    merge order never depends on scheduling, so the histogram (and
//!    therefore every pixel) is the same however many threads ran.
//!
//! 2. `colorize` maps each point to a color.  It takes a finished
//!    `Frame`, which only exists after the first pass joins, so a
//!    histogram strategy always sees the whole frame.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crossbeam::thread::ScopedJoinHandle;

use calibrate::{self, Calibration};
use cancel::CancelToken;
use color::{to_rgb8, Rgb8, BLACK};
use coloring::{ColorInput, ColorStrategy};
use config::RenderPlan;
use errors::{MandelbrotError, Result};
use escape::{EscapeParams, EscapeTime};
use histogram::{Histogram, IterationHistogram};
use observer::{LogObserver, PassStats, RenderObserver};
use pixels::PixelBuffer;
use planes::Grid;

/// Rows per unit of parallel work.
pub const BAND_ROWS: usize = 8;

static LOG_OBSERVER: LogObserver = LogObserver;

/// The per-invocation surroundings of a render: who hears about
/// progress, and how to stop it.
#[derive(Clone)]
pub struct RenderContext<'a> {
    /// Receives progress and warnings.
    pub observer: &'a dyn RenderObserver,
    /// Polled between bands and between calibration passes.
    pub cancel: CancelToken,
}

impl<'a> RenderContext<'a> {
    /// A context reporting to `observer`, never cancelled.
    pub fn new(observer: &'a dyn RenderObserver) -> RenderContext<'a> {
        RenderContext {
            observer,
            cancel: CancelToken::new(),
        }
    }

    /// Replace the cancel token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> RenderContext<'a> {
        self.cancel = cancel;
        self
    }
}

impl Default for RenderContext<'static> {
    fn default() -> RenderContext<'static> {
        RenderContext::new(&LOG_OBSERVER)
    }
}

/// The outcome of an evaluation pass: one escape result per grid point
/// in row-major order, and the frame's sealed histogram.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Samples per axis.
    pub samples: usize,
    /// The iteration cap the frame was evaluated with.
    pub max_iterations: usize,
    /// Escape results, row-major.
    pub results: Vec<EscapeTime>,
    /// The completed histogram.
    pub histogram: Histogram,
}

impl Frame {
    /// The result at a grid column and row.
    pub fn result(&self, column: usize, row: usize) -> Option<&EscapeTime> {
        if column < self.samples && row < self.samples {
            self.results.get(row * self.samples + column)
        } else {
            None
        }
    }

    /// Number of points inside the set.
    pub fn black_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.is_interior(self.max_iterations))
            .count()
    }

    /// Fraction of points inside the set.
    pub fn black_fraction(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.black_count() as f64 / self.results.len() as f64
    }
}

struct Band {
    index: usize,
    results: Vec<EscapeTime>,
    histogram: IterationHistogram,
}

fn evaluate_band(grid: &Grid, params: &EscapeParams, index: usize) -> Band {
    let first = index * BAND_ROWS;
    let last = (first + BAND_ROWS).min(grid.samples());
    let mut histogram = IterationHistogram::new(params.max_iterations);
    let mut results = Vec::with_capacity((last - first) * grid.samples());
    for row in first..last {
        for point in grid.row(row) {
            let result = params.evaluate(point);
            histogram.record(&result);
            results.push(result);
        }
    }
    Band {
        index,
        results,
        histogram,
    }
}

/// First pass: evaluate every grid point of `plan` and build the
/// frame's histogram.
pub fn evaluate(plan: &RenderPlan, ctx: &RenderContext) -> Result<Frame> {
    let started = Instant::now();
    let grid = plan.grid()?;
    let params = plan.escape_params();
    let band_count = (grid.samples() + BAND_ROWS - 1) / BAND_ROWS;
    let threads = plan.threads().min(band_count).max(1);
    let queue = Arc::new(Mutex::new(0..band_count));

    let per_thread = {
        let grid = &grid;
        let cancel = &ctx.cancel;
        crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<Vec<Band>>> = (0..threads)
                .map(|_| {
                    let queue = queue.clone();
                    spawner.spawn(move |_| {
                        let mut bands: Vec<Band> = vec![];
                        while !cancel.is_cancelled() {
                            let next = match queue.lock() {
                                Ok(mut queue) => queue.next(),
                                Err(_) => None,
                            };
                            match next {
                                Some(index) => bands.push(evaluate_band(grid, &params, index)),
                                None => break,
                            }
                        }
                        bands
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<::std::thread::Result<Vec<Vec<Band>>>>()
        })
    };

    let mut bands: Vec<Band> = match per_thread {
        Ok(Ok(per_thread)) => per_thread.into_iter().flatten().collect(),
        _ => return Err(MandelbrotError::WorkerPanicked),
    };
    if bands.len() < band_count {
        return Err(MandelbrotError::Cancelled);
    }

    bands.sort_by_key(|band| band.index);
    let mut histogram = IterationHistogram::new(params.max_iterations);
    let mut results = Vec::with_capacity(grid.len());
    for band in bands {
        histogram.merge(&band.histogram);
        results.extend(band.results);
    }

    let frame = Frame {
        samples: grid.samples(),
        max_iterations: params.max_iterations,
        results,
        histogram: histogram.seal(),
    };
    ctx.observer.pass_finished(&PassStats {
        samples: frame.samples,
        max_iterations: frame.max_iterations,
        black_fraction: frame.black_fraction(),
        total_iterations: frame.histogram.total(),
        elapsed: started.elapsed(),
    });
    Ok(frame)
}

struct Palette<'a> {
    strategy: &'a dyn ColorStrategy,
    histogram: &'a Histogram,
    total_iterations: f64,
    max_iterations: usize,
    saturation: f64,
}

impl<'a> Palette<'a> {
    #[inline]
    fn color(&self, result: &EscapeTime) -> Rgb8 {
        if result.is_interior(self.max_iterations) {
            return BLACK;
        }
        to_rgb8(self.strategy.color(&ColorInput {
            iterations: result.count,
            smoothed: result.smoothed,
            max_iterations: self.max_iterations,
            total_iterations: self.total_iterations,
            histogram: self.histogram,
            saturation: self.saturation,
        }))
    }
}

/// Second pass: color a completed frame with the plan's strategy.
/// Interior points are black without consulting the strategy.
pub fn colorize(plan: &RenderPlan, frame: &Frame, ctx: &RenderContext) -> Result<PixelBuffer> {
    let palette = Palette {
        strategy: plan.strategy(),
        histogram: &frame.histogram,
        total_iterations: frame.histogram.total(),
        max_iterations: frame.max_iterations,
        saturation: plan.saturation(),
    };
    let mut buffer = PixelBuffer::new(frame.samples, frame.samples);
    let chunk = (BAND_ROWS * frame.samples).max(1);

    {
        let regions: Vec<(usize, &mut [Rgb8])> =
            buffer.pixels_mut().chunks_mut(chunk).enumerate().collect();
        let threads = plan.threads().min(regions.len()).max(1);
        let regions = Arc::new(Mutex::new(regions.into_iter()));
        let palette = &palette;
        let cancel = &ctx.cancel;
        crossbeam::scope(|spawner| {
            for _ in 0..threads {
                let regions = regions.clone();
                spawner.spawn(move |_| {
                    while !cancel.is_cancelled() {
                        let next = match regions.lock() {
                            Ok(mut regions) => regions.next(),
                            Err(_) => None,
                        };
                        match next {
                            Some((index, region)) => {
                                let results = &frame.results[index * chunk..];
                                for (pixel, result) in region.iter_mut().zip(results.iter()) {
                                    *pixel = palette.color(result);
                                }
                            }
                            None => break,
                        }
                    }
                });
            }
        })
        .map_err(|_| MandelbrotError::WorkerPanicked)?;
    }

    ctx.cancel.check()?;
    Ok(buffer)
}

/// A finished render.
#[derive(Clone, Debug)]
pub struct Render {
    /// The plan actually rendered; its cap is the discovered one when
    /// the adaptive search ran.
    pub plan: RenderPlan,
    /// The evaluated frame.
    pub frame: Frame,
    /// The colored pixels.
    pub pixels: PixelBuffer,
    /// The adaptive search result, when it ran.
    pub calibration: Option<Calibration>,
}

/// Run the whole pipeline: calibrate if asked, evaluate, colorize.
pub fn render(plan: &RenderPlan, ctx: &RenderContext) -> Result<Render> {
    let (plan, calibration) = if plan.auto_max_iter() {
        let calibration = calibrate::find_max_iterations(plan, ctx)?;
        (
            plan.with_max_iterations(calibration.max_iterations)?,
            Some(calibration),
        )
    } else {
        (plan.clone(), None)
    };
    let frame = evaluate(&plan, ctx)?;
    let pixels = colorize(&plan, &frame, ctx)?;
    Ok(Render {
        plan,
        frame,
        pixels,
        calibration,
    })
}

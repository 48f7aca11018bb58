// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Observability hooks.  A render reports its progress to whatever
//! `RenderObserver` the caller hands it for that one invocation;
//! nothing is configured process-wide.  `LogObserver` forwards to the
//! `log` facade, so the host decides where messages go.

use std::time::Duration;

use calibrate::Calibration;

/// What an evaluation pass looked like.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PassStats {
    /// Samples per axis.
    pub samples: usize,
    /// Iteration cap of the pass.
    pub max_iterations: usize,
    /// Fraction of points inside the set.
    pub black_fraction: f64,
    /// Total smoothed weight of the histogram.
    pub total_iterations: f64,
    /// Wall-clock time spent evaluating.
    pub elapsed: Duration,
}

/// Receives progress signals from a render.  Every method has an empty
/// default, so observers implement only what they care about.
pub trait RenderObserver {
    /// An evaluation pass completed.
    fn pass_finished(&self, _stats: &PassStats) {}

    /// A calibration pass was too black, and the cap is being raised.
    fn calibration_step(&self, _black_fraction: f64, _next_max_iterations: usize) {}

    /// The adaptive search settled on a cap.
    fn calibration_finished(&self, _calibration: &Calibration) {}

    /// The adaptive search gave up at its ceiling while the image was
    /// still too black.  The render carries on with the ceiling.
    fn calibration_not_converged(&self, _calibration: &Calibration) {}
}

/// Discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullObserver;

impl RenderObserver for NullObserver {}

/// Writes everything to the `log` facade.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogObserver;

impl RenderObserver for LogObserver {
    fn pass_finished(&self, stats: &PassStats) {
        debug!(
            "Evaluated {}x{} at {} iterations in {:?}: {:.2}% black, total weight {:.1}",
            stats.samples,
            stats.samples,
            stats.max_iterations,
            stats.elapsed,
            100.0 * stats.black_fraction,
            stats.total_iterations
        );
    }

    fn calibration_step(&self, black_fraction: f64, next_max_iterations: usize) {
        info!(
            "Image is {:.2}% black, increasing max iterations to {}",
            100.0 * black_fraction,
            next_max_iterations
        );
    }

    fn calibration_finished(&self, calibration: &Calibration) {
        info!(
            "Found optimal max iterations: {} after {} passes, black pixels: {:.2}%",
            calibration.max_iterations,
            calibration.passes,
            100.0 * calibration.black_fraction
        );
    }

    fn calibration_not_converged(&self, calibration: &Calibration) {
        warn!(
            "Max iterations reached its ceiling of {} with {:.2}% black pixels remaining",
            calibration.max_iterations,
            100.0 * calibration.black_fraction
        );
    }
}

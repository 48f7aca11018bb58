// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render configuration.  A `RenderConfig` collects settings; calling
//! `configure()` validates all of them once and produces a `RenderPlan`.
//! A plan is immutable: changing a setting means configuring a new
//! plan, and anything rendered from the old one belongs to the old one.

use std::sync::Arc;

use num::Complex;

use coloring::{ColorStrategy, Coloring};
use errors::{invalid, Result};
use escape::EscapeParams;
use planes::Grid;

/// The square region of the complex plane being drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Center of the region.
    pub center: Complex<f64>,
    /// Half the width of the region.
    pub draw_radius: f64,
    /// Samples per axis.
    pub samples: usize,
}

impl Viewport {
    /// The grid of points this viewport samples.
    pub fn grid(&self) -> Result<Grid> {
        Grid::build(
            self.center.re - self.draw_radius,
            self.center.re + self.draw_radius,
            self.center.im - self.draw_radius,
            self.center.im + self.draw_radius,
            self.samples,
        )
    }
}

/// Settings for the adaptive iteration search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CalibrationSettings {
    /// First iteration cap tried.
    pub min_iterations: usize,
    /// Amount the cap grows after each too-black pass.
    pub step: usize,
    /// The cap is never raised past this.
    pub ceiling: usize,
    /// Samples per axis of the coarse calibration grid.
    pub samples: usize,
}

impl Default for CalibrationSettings {
    fn default() -> CalibrationSettings {
        CalibrationSettings {
            min_iterations: 64,
            step: 32,
            ceiling: 1024,
            samples: 50,
        }
    }
}

/// A builder for render plans.  Every setter takes and returns the
/// builder, so settings chain.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    center: Complex<f64>,
    draw_radius: f64,
    samples: usize,
    max_iterations: usize,
    escape_radius: f64,
    auto_max_iter: bool,
    blackness_limit: f64,
    saturation: f64,
    strategy: Arc<dyn ColorStrategy>,
    threads: usize,
    bulb_check: bool,
    calibration: CalibrationSettings,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            center: Complex::new(0.0, 0.0),
            draw_radius: 2.0,
            samples: 250,
            max_iterations: 64,
            escape_radius: 4.0,
            auto_max_iter: false,
            blackness_limit: 1.0,
            saturation: 0.8,
            strategy: Arc::new(Coloring::default()),
            threads: ::num_cpus::get(),
            bulb_check: false,
            calibration: CalibrationSettings::default(),
        }
    }
}

impl RenderConfig {
    /// A builder holding the defaults: the whole set at 250x250, 64
    /// iterations, escape radius 4, fourth-root coloring at saturation
    /// 0.8, one thread per CPU.
    pub fn new() -> RenderConfig {
        RenderConfig::default()
    }

    /// Center of the drawn region.
    pub fn center(mut self, x: f64, y: f64) -> Self {
        self.center = Complex::new(x, y);
        self
    }

    /// Half the width of the drawn region.
    pub fn draw_radius(mut self, radius: f64) -> Self {
        self.draw_radius = radius;
        self
    }

    /// Samples per axis of the final image.
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// The iteration cap.  When the adaptive search is on, this is
    /// replaced by whatever the search finds.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Radius of the escape circle.  Should be at least 2.
    pub fn escape_radius(mut self, escape_radius: f64) -> Self {
        self.escape_radius = escape_radius;
        self
    }

    /// Turn the adaptive iteration search on or off.
    pub fn auto_max_iter(mut self, auto: bool) -> Self {
        self.auto_max_iter = auto;
        self
    }

    /// Largest acceptable fraction of black pixels for the adaptive
    /// search, in `(0, 1]`.
    pub fn blackness_limit(mut self, limit: f64) -> Self {
        self.blackness_limit = limit;
        self
    }

    /// Saturation handed to hue-based strategies, in `[0, 1]`.
    pub fn saturation(mut self, saturation: f64) -> Self {
        self.saturation = saturation;
        self
    }

    /// One of the built-in strategies.
    pub fn coloring(self, coloring: Coloring) -> Self {
        self.color_strategy(coloring)
    }

    /// Any strategy.
    pub fn color_strategy<S: ColorStrategy + 'static>(mut self, strategy: S) -> Self {
        self.strategy = Arc::new(strategy);
        self
    }

    /// Worker threads used per pass.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Also short-circuit points in the period-2 bulb.
    pub fn bulb_check(mut self, bulb_check: bool) -> Self {
        self.bulb_check = bulb_check;
        self
    }

    /// Settings for the adaptive search.
    pub fn calibration(mut self, calibration: CalibrationSettings) -> Self {
        self.calibration = calibration;
        self
    }

    /// Validate everything and produce a plan.
    pub fn configure(&self) -> Result<RenderPlan> {
        if !self.center.re.is_finite() || !self.center.im.is_finite() {
            return invalid("center must be finite");
        }
        if !(self.draw_radius.is_finite() && self.draw_radius > 0.0) {
            return invalid(format!("draw radius must be positive, got {}", self.draw_radius));
        }
        if self.samples < 1 {
            return invalid("samples must be at least 1");
        }
        if self.max_iterations < 1 {
            return invalid("max iterations must be at least 1");
        }
        if !(self.escape_radius.is_finite() && self.escape_radius > 0.0) {
            return invalid(format!("escape radius must be positive, got {}", self.escape_radius));
        }
        if !(self.blackness_limit > 0.0 && self.blackness_limit <= 1.0) {
            return invalid(format!(
                "blackness limit must be in (0, 1], got {}",
                self.blackness_limit
            ));
        }
        if !(self.saturation >= 0.0 && self.saturation <= 1.0) {
            return invalid(format!("saturation must be in [0, 1], got {}", self.saturation));
        }
        if self.threads < 1 {
            return invalid("at least one thread is required");
        }
        let cal = &self.calibration;
        if cal.min_iterations < 1 {
            return invalid("calibration minimum iterations must be at least 1");
        }
        if cal.step < 1 {
            return invalid("calibration step must be at least 1");
        }
        if cal.ceiling < cal.min_iterations {
            return invalid(format!(
                "calibration ceiling {} is below its minimum {}",
                cal.ceiling, cal.min_iterations
            ));
        }
        if cal.samples < 1 {
            return invalid("calibration samples must be at least 1");
        }

        let viewport = Viewport {
            center: self.center,
            draw_radius: self.draw_radius,
            samples: self.samples,
        };
        // Catches radii too small to separate the edges in f64.
        viewport.grid()?;

        Ok(RenderPlan {
            viewport,
            max_iterations: self.max_iterations,
            escape_radius: self.escape_radius,
            auto_max_iter: self.auto_max_iter,
            blackness_limit: self.blackness_limit,
            saturation: self.saturation,
            strategy: self.strategy.clone(),
            threads: self.threads,
            bulb_check: self.bulb_check,
            calibration: self.calibration,
        })
    }
}

/// A validated, immutable description of one render.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    viewport: Viewport,
    max_iterations: usize,
    escape_radius: f64,
    auto_max_iter: bool,
    blackness_limit: f64,
    saturation: f64,
    strategy: Arc<dyn ColorStrategy>,
    threads: usize,
    bulb_check: bool,
    calibration: CalibrationSettings,
}

impl RenderPlan {
    /// The drawn region.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// A freshly built grid for this plan.
    pub fn grid(&self) -> Result<Grid> {
        self.viewport.grid()
    }

    /// The iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Radius of the escape circle.
    pub fn escape_radius(&self) -> f64 {
        self.escape_radius
    }

    /// Whether the adaptive search runs before the final pass.
    pub fn auto_max_iter(&self) -> bool {
        self.auto_max_iter
    }

    /// Target for the adaptive search.
    pub fn blackness_limit(&self) -> f64 {
        self.blackness_limit
    }

    /// Saturation handed to the strategy.
    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    /// The coloring strategy.
    pub fn strategy(&self) -> &dyn ColorStrategy {
        &*self.strategy
    }

    /// Worker threads per pass.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Whether the period-2 bulb is short-circuited.
    pub fn bulb_check(&self) -> bool {
        self.bulb_check
    }

    /// Settings for the adaptive search.
    pub fn calibration(&self) -> &CalibrationSettings {
        &self.calibration
    }

    /// Per-point evaluation settings.
    pub fn escape_params(&self) -> EscapeParams {
        EscapeParams {
            max_iterations: self.max_iterations,
            escape_radius: self.escape_radius,
            bulb_check: self.bulb_check,
        }
    }

    /// The same plan with another iteration cap.
    pub fn with_max_iterations(&self, max_iterations: usize) -> Result<RenderPlan> {
        if max_iterations < 1 {
            return invalid("max iterations must be at least 1");
        }
        Ok(RenderPlan {
            max_iterations,
            ..self.clone()
        })
    }

    /// The coarse plan used by one calibration pass at `max_iterations`.
    pub fn calibration_plan(&self, max_iterations: usize) -> Result<RenderPlan> {
        let mut plan = self.with_max_iterations(max_iterations)?;
        plan.viewport.samples = self.calibration.samples;
        plan.auto_max_iter = false;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::MandelbrotError;

    fn rejects(config: RenderConfig) {
        match config.configure() {
            Err(MandelbrotError::InvalidConfig(_)) => (),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn defaults_configure() {
        let plan = RenderConfig::new().configure().unwrap();
        assert_eq!(plan.max_iterations(), 64);
        assert_eq!(plan.viewport().samples, 250);
        assert_eq!(plan.escape_radius(), 4.0);
        assert!(!plan.auto_max_iter());
        assert_eq!(plan.calibration(), &CalibrationSettings::default());
    }

    #[test]
    fn bad_values_are_rejected_not_clamped() {
        rejects(RenderConfig::new().samples(0));
        rejects(RenderConfig::new().draw_radius(0.0));
        rejects(RenderConfig::new().draw_radius(-1.0));
        rejects(RenderConfig::new().max_iterations(0));
        rejects(RenderConfig::new().blackness_limit(0.0));
        rejects(RenderConfig::new().blackness_limit(1.5));
        rejects(RenderConfig::new().saturation(1.1));
        rejects(RenderConfig::new().escape_radius(0.0));
        rejects(RenderConfig::new().threads(0));
        rejects(RenderConfig::new().center(::std::f64::NAN, 0.0));
        rejects(RenderConfig::new().calibration(CalibrationSettings {
            ceiling: 10,
            ..CalibrationSettings::default()
        }));
        rejects(RenderConfig::new().calibration(CalibrationSettings {
            step: 0,
            ..CalibrationSettings::default()
        }));
    }

    #[test]
    fn blackness_limit_of_one_is_allowed() {
        assert!(RenderConfig::new().blackness_limit(1.0).configure().is_ok());
    }

    #[test]
    fn viewport_grid_spans_radius() {
        let plan = RenderConfig::new()
            .center(-0.7, 0.0)
            .draw_radius(2.0)
            .samples(10)
            .configure()
            .unwrap();
        let grid = plan.grid().unwrap();
        assert_eq!(grid.real_axis()[0], -0.7 - 2.0);
        assert_eq!(grid.real_axis()[9], -0.7 + 2.0);
        assert_eq!(grid.imaginary_axis()[0], -2.0);
        assert_eq!(grid.len(), 100);
    }

    #[test]
    fn calibration_plan_leaves_its_source_alone() {
        let plan = RenderConfig::new().max_iterations(500).configure().unwrap();
        let coarse = plan.calibration_plan(96).unwrap();
        assert_eq!(coarse.max_iterations(), 96);
        assert_eq!(coarse.viewport().samples, 50);
        assert_eq!(plan.max_iterations(), 500);
        assert_eq!(plan.viewport().samples, 250);
    }
}

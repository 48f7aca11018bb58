// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Adaptive iteration search.  Too low a cap leaves the boundary of
//! the set undetailed and the image mostly black; too high a cap wastes
//! time on every interior point.  The search evaluates a coarse copy of
//! the viewport, starting at the minimum cap and raising it a step at a
//! time, until the black fraction drops to the plan's blackness limit
//! or the cap reaches its ceiling.

use config::RenderPlan;
use errors::Result;
use render::{evaluate, RenderContext};

/// What the adaptive search settled on.
#[derive(Clone, Debug, PartialEq)]
pub struct Calibration {
    /// The chosen iteration cap.
    pub max_iterations: usize,
    /// Black fraction of the final calibration pass.
    pub black_fraction: f64,
    /// Number of calibration passes evaluated.
    pub passes: usize,
    /// False when the ceiling was reached with the image still too
    /// black.
    pub converged: bool,
    /// Every cap tried, with its black fraction, in order.
    pub history: Vec<(usize, f64)>,
}

/// Search for the smallest cap, from the calibration minimum upward in
/// calibration steps, whose coarse render is no blacker than the plan's
/// blackness limit.  The cap never passes the ceiling; if the ceiling
/// is still too black, the ceiling is returned with `converged` false
/// and the observer is warned.  `plan` itself is left untouched.
pub fn find_max_iterations(plan: &RenderPlan, ctx: &RenderContext) -> Result<Calibration> {
    let settings = plan.calibration();
    let limit = plan.blackness_limit();
    let mut max_iterations = settings.min_iterations;
    let mut history = Vec::new();

    loop {
        ctx.cancel.check()?;
        let coarse = plan.calibration_plan(max_iterations)?;
        let black_fraction = evaluate(&coarse, ctx)?.black_fraction();
        history.push((max_iterations, black_fraction));

        if black_fraction > limit && max_iterations < settings.ceiling {
            max_iterations = (max_iterations + settings.step).min(settings.ceiling);
            ctx.observer.calibration_step(black_fraction, max_iterations);
            continue;
        }

        let calibration = Calibration {
            max_iterations,
            black_fraction,
            passes: history.len(),
            converged: black_fraction <= limit,
            history,
        };
        ctx.observer.calibration_finished(&calibration);
        if !calibration.converged {
            ctx.observer.calibration_not_converged(&calibration);
        }
        return Ok(calibration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{CalibrationSettings, RenderConfig};
    use observer::RenderObserver;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        steps: RefCell<Vec<usize>>,
        warnings: RefCell<usize>,
    }

    impl RenderObserver for Recorder {
        fn calibration_step(&self, _black_fraction: f64, next: usize) {
            self.steps.borrow_mut().push(next);
        }

        fn calibration_not_converged(&self, _calibration: &Calibration) {
            *self.warnings.borrow_mut() += 1;
        }
    }

    fn plan(limit: f64, calibration: CalibrationSettings) -> RenderPlan {
        RenderConfig::new()
            .blackness_limit(limit)
            .calibration(calibration)
            .threads(2)
            .configure()
            .unwrap()
    }

    #[test]
    fn lenient_limit_keeps_the_minimum() {
        let recorder = Recorder::default();
        let ctx = RenderContext::new(&recorder);
        let c = find_max_iterations(&plan(1.0, CalibrationSettings::default()), &ctx).unwrap();
        assert_eq!(c.max_iterations, 64);
        assert_eq!(c.passes, 1);
        assert!(c.converged);
        assert!(recorder.steps.borrow().is_empty());
    }

    #[test]
    fn unreachable_limit_stops_at_ceiling_with_a_warning() {
        let settings = CalibrationSettings {
            min_iterations: 16,
            step: 48,
            ceiling: 200,
            samples: 20,
        };
        let recorder = Recorder::default();
        let ctx = RenderContext::new(&recorder);
        // The set itself covers far more than 0.1% of the default view.
        let c = find_max_iterations(&plan(0.001, settings), &ctx).unwrap();
        assert_eq!(c.max_iterations, 200);
        assert!(!c.converged);
        assert_eq!(*recorder.warnings.borrow(), 1);
        // 16, 64, 112, 160, then clamped to 200
        assert_eq!(*recorder.steps.borrow(), vec![64, 112, 160, 200]);
        assert_eq!(c.passes, 5);
    }

    #[test]
    fn caps_only_increase() {
        let settings = CalibrationSettings {
            min_iterations: 8,
            step: 8,
            ceiling: 256,
            samples: 30,
        };
        let ctx = RenderContext::new(&::observer::NullObserver);
        let c = find_max_iterations(&plan(0.2, settings), &ctx).unwrap();
        let caps: Vec<usize> = c.history.iter().map(|h| h.0).collect();
        assert!(caps.windows(2).all(|w| w[0] < w[1]));
        assert!(c.passes <= (256 - 8) / 8 + 1);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A plan together with its most recent render.  The render is made on
//! first request and kept; installing a different plan throws it away.

use config::{RenderConfig, RenderPlan};
use errors::Result;
use render::{render, Render, RenderContext};

/// Lazily renders a plan and caches the result.
#[derive(Debug)]
pub struct Session {
    plan: RenderPlan,
    cached: Option<Render>,
}

impl Session {
    /// A session with nothing rendered yet.
    pub fn new(plan: RenderPlan) -> Session {
        Session { plan, cached: None }
    }

    /// The current plan.
    pub fn plan(&self) -> &RenderPlan {
        &self.plan
    }

    /// Install a new plan, discarding any cached render.
    pub fn set_plan(&mut self, plan: RenderPlan) {
        self.plan = plan;
        self.cached = None;
    }

    /// Validate `config` and install it.  On error the session keeps
    /// its current plan and cache.
    pub fn reconfigure(&mut self, config: &RenderConfig) -> Result<()> {
        let plan = config.configure()?;
        self.set_plan(plan);
        Ok(())
    }

    /// Whether a render is cached.
    pub fn is_rendered(&self) -> bool {
        self.cached.is_some()
    }

    /// The cached render, rendering first if necessary.
    pub fn render(&mut self, ctx: &RenderContext) -> Result<&Render> {
        let rendered = match self.cached.take() {
            Some(rendered) => rendered,
            None => render(&self.plan, ctx)?,
        };
        Ok(self.cached.get_or_insert(rendered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use observer::NullObserver;

    fn config() -> RenderConfig {
        RenderConfig::new().samples(12).threads(2)
    }

    #[test]
    fn renders_once_and_caches() {
        let ctx = RenderContext::new(&NullObserver);
        let mut session = Session::new(config().configure().unwrap());
        assert!(!session.is_rendered());
        let first = session.render(&ctx).unwrap().pixels.clone();
        assert!(session.is_rendered());
        let second = session.render(&ctx).unwrap().pixels.clone();
        assert_eq!(first, second);
    }

    #[test]
    fn new_plan_discards_the_cache() {
        let ctx = RenderContext::new(&NullObserver);
        let mut session = Session::new(config().configure().unwrap());
        session.render(&ctx).unwrap();
        session.reconfigure(&config().samples(16)).unwrap();
        assert!(!session.is_rendered());
        assert_eq!(session.render(&ctx).unwrap().pixels.width(), 16);
    }

    #[test]
    fn bad_config_keeps_the_cache() {
        let ctx = RenderContext::new(&NullObserver);
        let mut session = Session::new(config().configure().unwrap());
        session.render(&ctx).unwrap();
        assert!(session.reconfigure(&config().samples(0)).is_err());
        assert!(session.is_rendered());
        assert_eq!(session.plan().viewport().samples, 12);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Iteration histograms.  Every point of a pass that was actually
//! iterated contributes its smoothed count to the bucket for its
//! integer count, including points that ran to the cap; histogram
//! coloring then picks a hue from how much of the frame's total weight
//! lies below a point's own count.
//!
//! Accumulation and reading are separate types.  An
//! `IterationHistogram` can only be written; `seal()` turns it into a
//! read-only `Histogram` once the pass is complete, so nothing can
//! color a pixel against a half-filled histogram.

use escape::EscapeTime;

/// A histogram still being filled during an evaluation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationHistogram {
    buckets: Vec<f64>,
}

impl IterationHistogram {
    /// One bucket per possible escape count, `0..max_iterations`.
    pub fn new(max_iterations: usize) -> Self {
        IterationHistogram {
            buckets: vec![0.0; max_iterations],
        }
    }

    /// Record a point.  Bucket `count - 1` receives the smoothed count,
    /// so capped points land in the last bucket.  Points short-circuited
    /// as members (count 0) are skipped.
    #[inline]
    pub fn record(&mut self, result: &EscapeTime) {
        if result.count > 0 && result.count <= self.buckets.len() {
            self.buckets[result.count - 1] += result.smoothed;
        }
    }

    /// Fold a partial histogram from another work unit into this one.
    pub fn merge(&mut self, other: &IterationHistogram) {
        debug_assert_eq!(self.buckets.len(), other.buckets.len());
        for (mine, theirs) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            *mine += *theirs;
        }
    }

    /// The bucket weights so far.
    pub fn buckets(&self) -> &[f64] {
        &self.buckets
    }

    /// The sum of all bucket weights so far.
    pub fn total(&self) -> f64 {
        self.buckets.iter().sum()
    }

    /// Finish the pass.
    pub fn seal(self) -> Histogram {
        let mut prefix = Vec::with_capacity(self.buckets.len() + 1);
        let mut running = 0.0;
        prefix.push(running);
        for weight in &self.buckets {
            running += *weight;
            prefix.push(running);
        }
        Histogram {
            buckets: self.buckets,
            prefix,
        }
    }
}

/// A completed, read-only histogram for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    buckets: Vec<f64>,
    // prefix[k] is the sum of buckets[0..k], added in index order
    prefix: Vec<f64>,
}

impl Histogram {
    /// An empty histogram; every point of such a frame was
    /// short-circuited.
    pub fn empty(max_iterations: usize) -> Histogram {
        IterationHistogram::new(max_iterations).seal()
    }

    /// The bucket weights.
    pub fn buckets(&self) -> &[f64] {
        &self.buckets
    }

    /// The total weight of the frame.  Identical to summing the buckets
    /// in index order.
    pub fn total(&self) -> f64 {
        self.prefix[self.buckets.len()]
    }

    /// Sum of the buckets strictly below `iterations`, that is
    /// `buckets[0..iterations]`.  Counts past the end saturate at the
    /// total.
    pub fn cumulative(&self, iterations: usize) -> f64 {
        self.prefix[iterations.min(self.buckets.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape::EscapeParams;
    use num::Complex;

    fn escaped(count: usize, smoothed: f64) -> EscapeTime {
        EscapeTime { count, smoothed }
    }

    #[test]
    fn short_circuited_points_are_not_recorded() {
        let mut h = IterationHistogram::new(8);
        h.record(&EscapeTime::MEMBER);
        assert_eq!(h.total(), 0.0);
    }

    #[test]
    fn capped_points_land_in_the_last_bucket() {
        let mut h = IterationHistogram::new(8);
        h.record(&escaped(8, 8.5));
        h.record(&escaped(2, 2.25));
        assert_eq!(h.buckets()[7], 8.5);
        assert_eq!(h.total(), 10.75);
    }

    #[test]
    fn points_that_never_escape_are_weighted() {
        // -1.2 sits in the period-2 bulb and settles on a nonzero cycle
        let params = EscapeParams {
            max_iterations: 64,
            escape_radius: 4.0,
            bulb_check: false,
        };
        let result = params.evaluate(Complex::new(-1.2, 0.0));
        assert_eq!(result.count, 64);
        assert!(result.smoothed > 0.0);
        let mut h = IterationHistogram::new(64);
        h.record(&result);
        assert_eq!(h.buckets()[63], result.smoothed);
        assert_eq!(h.seal().total(), result.smoothed);
    }

    #[test]
    fn escaping_points_land_one_bucket_down() {
        let mut h = IterationHistogram::new(8);
        h.record(&escaped(1, 1.25));
        h.record(&escaped(3, 3.5));
        h.record(&escaped(3, 2.75));
        assert_eq!(h.buckets(), &[1.25, 0.0, 6.25, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn sealed_histogram_sums_match() {
        let mut h = IterationHistogram::new(6);
        for (count, smoothed) in &[(1, 0.75), (2, 2.25), (5, 5.5), (2, 1.5), (4, 4.25)] {
            h.record(&escaped(*count, *smoothed));
        }
        let total = h.total();
        let sealed = h.seal();
        assert_eq!(sealed.total(), total);
        assert_eq!(sealed.buckets().iter().sum::<f64>(), sealed.total());
        assert_eq!(sealed.cumulative(0), 0.0);
        assert_eq!(sealed.cumulative(2), 0.75 + 3.75);
        assert_eq!(sealed.cumulative(100), sealed.total());
    }

    #[test]
    fn merge_adds_bucketwise() {
        let mut a = IterationHistogram::new(4);
        let mut b = IterationHistogram::new(4);
        a.record(&escaped(1, 1.0));
        b.record(&escaped(1, 2.0));
        b.record(&escaped(2, 3.0));
        a.merge(&b);
        assert_eq!(a.buckets(), &[3.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_histogram_has_zero_total() {
        let h = Histogram::empty(16);
        assert_eq!(h.total(), 0.0);
        assert_eq!(h.cumulative(5), 0.0);
    }
}

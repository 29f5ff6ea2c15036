//! Opt-in timing hooks for curve generation.
//!
//! Timing is only collected when the `curve_metrics` feature is enabled and the
//! target is not `wasm32` (where `std::time::Instant` is unavailable). In every
//! other build the calls compile down to plain closure invocations.
//!
//! ```ignore
//! use cinpact_engine::geom::{CurveMetrics, TimingBucket};
//!
//! let mut metrics = CurveMetrics::default();
//! metrics.begin();
//! let samples = metrics.time(TimingBucket::Evaluation, || evaluate(&points));
//! if let Some(report) = metrics.end() {
//!     println!("evaluation: {} ns", report.evaluation_ns);
//! }
//! ```

/// Phases of one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Per-sample kernel evaluation (the parallel part).
    Evaluation,
    /// Sequential removal of invalid samples.
    Compaction,
}

/// Cumulative nanoseconds per bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CurveTimingReport {
    pub evaluation_ns: u64,
    pub compaction_ns: u64,
}

impl CurveTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.evaluation_ns.saturating_add(self.compaction_ns)
    }

    /// Total time in milliseconds, for display.
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing curve generation phases.
///
/// When metrics are disabled all methods are no-ops and [`end`](Self::end)
/// returns `None`.
#[derive(Debug, Default)]
pub struct CurveMetrics {
    #[cfg(all(feature = "curve_metrics", not(target_arch = "wasm32")))]
    report: CurveTimingReport,
}

impl CurveMetrics {
    /// Resets all counters.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "curve_metrics", not(target_arch = "wasm32")))]
        {
            self.report = CurveTimingReport::default();
        }
    }

    #[must_use]
    pub fn end(&self) -> Option<CurveTimingReport> {
        #[cfg(all(feature = "curve_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "curve_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Runs `f` and adds its wall time to `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "curve_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            match bucket {
                TimingBucket::Evaluation => {
                    self.report.evaluation_ns = self.report.evaluation_ns.saturating_add(nanos);
                }
                TimingBucket::Compaction => {
                    self.report.compaction_ns = self.report.compaction_ns.saturating_add(nanos);
                }
            }
            result
        }

        #[cfg(not(all(feature = "curve_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }
}

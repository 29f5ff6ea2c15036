//! Diagnostics for curve generation.
//!
//! Every generation call can report how many parameter samples were evaluated,
//! how many survived compaction and what range the raw weight sums covered.
//! Dropped samples are expected for sparse control-point configurations and are
//! never reported as errors; this struct is where they become visible.
//!
//! ```ignore
//! let (curve, diagnostics) = generate_with_diagnostics(&points, options)?;
//! if diagnostics.dropped_count > 0 {
//!     log::debug!("{}", diagnostics.summary());
//! }
//! ```

use std::fmt;

/// Statistics collected by one curve generation call.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CinpactDiagnostics {
    /// Number of parameter samples in the domain.
    pub sample_count: usize,

    /// Samples whose weight sum was strictly positive.
    pub valid_count: usize,

    /// Samples discarded by compaction (weight sum `<= 0`).
    pub dropped_count: usize,

    /// Valid samples whose weight sum was positive but subnormal.
    ///
    /// These are normalized like any other sample. A non-zero count marks a
    /// configuration worth checking for precision loss.
    pub subnormal_weight_count: usize,

    /// Smallest weight sum among valid samples, if any.
    pub min_weight_sum: Option<f64>,

    /// Largest weight sum among valid samples, if any.
    pub max_weight_sum: Option<f64>,

    /// Whether the sinc interpolation factor was applied.
    pub interpolated: bool,

    /// Optional timing breakdown; only populated with the `curve_metrics`
    /// feature on native targets.
    pub timing: Option<super::metrics::CurveTimingReport>,
}

impl CinpactDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when every sample in the domain was kept.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.dropped_count == 0
    }

    /// Returns `true` when there was nothing to sample.
    #[must_use]
    pub fn is_empty_domain(&self) -> bool {
        self.sample_count == 0
    }

    /// Folds one valid sample's raw weight sum into the statistics.
    pub(crate) fn record_weight_sum(&mut self, weight_sum: f64) {
        self.valid_count += 1;
        if weight_sum.is_subnormal() {
            self.subnormal_weight_count += 1;
        }
        self.min_weight_sum = Some(self.min_weight_sum.map_or(weight_sum, |m| m.min(weight_sum)));
        self.max_weight_sum = Some(self.max_weight_sum.map_or(weight_sum, |m| m.max(weight_sum)));
    }

    /// Short single-line summary for logging.
    ///
    /// Format: `"S:{samples} kept:{valid} [issues...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("S:{} kept:{}", self.sample_count, self.valid_count)];

        if self.dropped_count > 0 {
            parts.push(format!("dropped:{}", self.dropped_count));
        }
        if self.subnormal_weight_count > 0 {
            parts.push(format!("subnormal:{}", self.subnormal_weight_count));
        }
        if self.interpolated {
            parts.push("interpolated".to_string());
        }

        parts.join(" ")
    }
}

impl fmt::Display for CinpactDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Curve Diagnostics:")?;
        writeln!(f, "  Samples: {}", self.sample_count)?;
        writeln!(f, "  Kept: {}", self.valid_count)?;
        if self.dropped_count > 0 {
            writeln!(f, "  Dropped (no support): {}", self.dropped_count)?;
        }
        if let (Some(min), Some(max)) = (self.min_weight_sum, self.max_weight_sum) {
            writeln!(f, "  Weight sum range: [{min:e}, {max:e}]")?;
        }
        if self.subnormal_weight_count > 0 {
            writeln!(f, "  Subnormal weight sums: {}", self.subnormal_weight_count)?;
        }
        if let Some(ref timing) = self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }
        Ok(())
    }
}

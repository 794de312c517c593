//! Running per-channel metric summaries.

/// Running summary of one channel's metric values across events.
///
/// Keeps the raw count, sum and sum of squares; derived statistics are
/// computed on read. Plain sums lose precision for very large counts or
/// large-magnitude values, which is acceptable at per-run call volumes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricSummary {
    /// Number of accumulated values.
    pub count: u64,
    /// Sum of accumulated values.
    pub sum: f64,
    /// Sum of squared accumulated values.
    pub sum_sq: f64,
}

impl MetricSummary {
    /// Empty summary.
    pub const fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    /// Accumulate one value.
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    /// Mean of accumulated values, 0 when empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Mean of squared values, 0 when empty.
    pub fn mean_sq(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum_sq / self.count as f64
        }
    }

    /// Population variance, clamped at zero against rounding.
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        (self.mean_sq() - mean * mean).max(0.0)
    }

    /// Standard error of the mean, `sqrt(variance / count)`, 0 when empty.
    pub fn std_error(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.variance() / self.count as f64).sqrt()
        }
    }
}

//! Per-call result objects.

use std::collections::BTreeMap;

use crate::MetricPlot;

/// Result of one tool invocation: the produced plots keyed by resolved
/// name, scalar and string outputs, and error counters.
///
/// Per-channel evaluation failures and output write failures are counted
/// here rather than aborting the call.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventReport {
    /// Plots keyed by resolved name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub plots: BTreeMap<String, MetricPlot>,
    /// Scalar outputs, e.g. the metric value of a single-channel call.
    #[cfg_attr(feature = "serde", serde(default))]
    pub scalars: BTreeMap<String, f64>,
    /// String outputs, e.g. metric units.
    #[cfg_attr(feature = "serde", serde(default))]
    pub strings: BTreeMap<String, String>,
    /// Channels skipped because the metric could not be evaluated.
    #[cfg_attr(feature = "serde", serde(default))]
    pub evaluation_errors: u32,
    /// Plot-file or store writes that failed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub io_errors: u32,
}

impl EventReport {
    /// Empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no evaluation or write errors were recorded.
    pub fn is_ok(&self) -> bool {
        self.evaluation_errors == 0 && self.io_errors == 0
    }

    /// Look up a produced plot by resolved name.
    pub fn plot(&self, name: &str) -> Option<&MetricPlot> {
        self.plots.get(name)
    }

    /// Insert a plot under its resolved name.
    pub fn insert_plot(&mut self, plot: MetricPlot) {
        self.plots.insert(plot.name.clone(), plot);
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: EventReport) {
        self.plots.extend(other.plots);
        self.scalars.extend(other.scalars);
        self.strings.extend(other.strings);
        self.evaluation_errors += other.evaluation_errors;
        self.io_errors += other.io_errors;
    }
}

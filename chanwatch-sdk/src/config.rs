//! Tool configuration.

use serde::{Deserialize, Serialize};

/// Plot pixel size used when the configured size is zero.
pub const DEFAULT_PLOT_SIZE: (u32, u32) = (1400, 500);

/// Configuration of one metric tool instance.
///
/// Every field has a default so partial configuration tables deserialize;
/// `metric` is the only field without a usable default and is validated at
/// tool construction.
///
/// The templated fields (`hist_name`, `hist_title`, `metric_label`,
/// `plot_file_name`, `store_file_name`) accept the placeholders described
/// in [`crate::template`]. `hist_name` may additionally carry `%STATUS%`
/// to request one output per health class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricConfig {
    /// Verbosity: 0 silent, 1 configuration, 2 per event, 3 and up per channel.
    pub log_level: u32,
    /// Metric name, built in or a metadata field.
    pub metric: String,
    /// Channel range names; empty, `""` or `"all"` selects everything.
    pub channel_ranges: Vec<String>,
    /// Lower metric axis bound; equal bounds leave the axis unconstrained.
    pub metric_min: f64,
    /// Upper metric axis bound; equal bounds leave the axis unconstrained.
    pub metric_max: f64,
    /// Repeat spacing for boundary lines; 0 disables repetition.
    pub channel_line_modulus: u32,
    /// Offsets, or literal positions when the modulus is 0, for boundary lines.
    pub channel_line_pattern: Vec<u32>,
    /// Plot name template; must yield unique names within a store.
    pub hist_name: String,
    /// Plot title template.
    pub hist_title: String,
    /// Metric axis label; the evaluator's unit label is used when blank.
    pub metric_label: String,
    /// Plot width in pixels; 0 selects the default size.
    pub plot_size_x: u32,
    /// Plot height in pixels; 0 selects the default size.
    pub plot_size_y: u32,
    /// Plot image path template (`.svg` for vector output); blank disables.
    pub plot_file_name: String,
    /// Plot store path template; blank disables.
    pub store_file_name: String,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            log_level: 0,
            metric: String::new(),
            channel_ranges: Vec::new(),
            metric_min: 0.0,
            metric_max: 0.0,
            channel_line_modulus: 0,
            channel_line_pattern: Vec::new(),
            hist_name: "chanmet_%CRNAME%_run%RUN%_evt%EVENT%".to_string(),
            hist_title: "%CRLABEL% run %RUN% event %EVENT%".to_string(),
            metric_label: String::new(),
            plot_size_x: 0,
            plot_size_y: 0,
            plot_file_name: String::new(),
            store_file_name: String::new(),
        }
    }
}

impl MetricConfig {
    /// Fixed metric axis bounds, when configured.
    ///
    /// Bounds apply only when both are finite and `metric_min` is strictly
    /// below `metric_max`; the default equal bounds leave the axis to
    /// autoscale from the data.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        (self.metric_min.is_finite()
            && self.metric_max.is_finite()
            && self.metric_min < self.metric_max)
            .then_some((self.metric_min, self.metric_max))
    }

    /// Pixel size of rendered plot files.
    pub fn plot_size(&self) -> (u32, u32) {
        if self.plot_size_x == 0 || self.plot_size_y == 0 {
            DEFAULT_PLOT_SIZE
        } else {
            (self.plot_size_x, self.plot_size_y)
        }
    }
}

//! Metric evaluation strategies.
//!
//! A [`MetricEvaluator`] turns one channel's readout into a scalar value
//! with a unit label. [`StandardMetrics`] implements the built-in set;
//! custom strategies wrap it and fall back for names they do not handle:
//!
//! ```rust
//! use chanwatch_sdk::{MetricError, MetricEvaluator, MetricValue, StandardMetrics};
//! use chanwatch_types::ChannelReadout;
//!
//! struct SaturationFraction {
//!     fallback: StandardMetrics,
//! }
//!
//! impl MetricEvaluator for SaturationFraction {
//!     fn evaluate(&self, readout: &ChannelReadout) -> Result<MetricValue, MetricError> {
//!         if self.fallback.metric() == "saturationFraction" {
//!             let count = readout.samples.iter().filter(|&&s| s >= 4095).count();
//!             let total = readout.samples.len().max(1);
//!             return Ok(MetricValue::new(count as f64 / total as f64, ""));
//!         }
//!         self.fallback.evaluate(readout)
//!     }
//! }
//! ```

use chanwatch_types::ChannelReadout;

use crate::error::MetricError;

/// Unit label for ADC-denominated metrics.
const ADC_COUNTS: &str = "ADC counts";

/// A metric value with its unit label.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    /// The scalar value.
    pub value: f64,
    /// Unit label, empty for dimensionless metrics.
    pub units: String,
}

impl MetricValue {
    /// Create a metric value.
    pub fn new(value: f64, units: impl Into<String>) -> Self {
        Self {
            value,
            units: units.into(),
        }
    }
}

/// Front-end board geometry for the index-derived metrics.
///
/// Both fields must be nonzero. The defaults describe 128-channel boards
/// with 20 boards per detector sub-unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    /// Channels read by one front-end board.
    pub channels_per_board: u32,
    /// Boards per detector sub-unit.
    pub boards_per_unit: u32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            channels_per_board: 128,
            boards_per_unit: 20,
        }
    }
}

/// Strategy for evaluating one named metric per channel.
///
/// Implementations handling additional metrics should hold a
/// [`StandardMetrics`] and delegate to it for names they do not recognize.
pub trait MetricEvaluator: Send + Sync {
    /// Evaluate the metric for one channel.
    fn evaluate(&self, readout: &ChannelReadout) -> Result<MetricValue, MetricError>;
}

/// The built-in metric set.
///
/// | Name | Value | Units |
/// |---|---|---|
/// | `pedestal` | baseline level | ADC counts |
/// | `pedestalRms` | baseline noise estimate | ADC counts |
/// | `fembID` | `channel / channels_per_board` | |
/// | `apaFembID` | `fembID % boards_per_unit` | |
/// | `fembChannel` | `channel % channels_per_board` | |
/// | `rawRms` | RMS of `sample - pedestal` over the waveform | ADC counts |
/// | `rawTailFraction` | fraction of samples beyond three sigma | |
///
/// Any other name is looked up as a metadata field of the readout.
#[derive(Debug, Clone)]
pub struct StandardMetrics {
    metric: String,
    geometry: BoardGeometry,
}

impl StandardMetrics {
    /// Evaluator for the named metric with default geometry.
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            geometry: BoardGeometry::default(),
        }
    }

    /// Evaluator with explicit board geometry.
    pub fn with_geometry(metric: impl Into<String>, geometry: BoardGeometry) -> Self {
        Self {
            metric: metric.into(),
            geometry,
        }
    }

    /// The configured metric name.
    pub fn metric(&self) -> &str {
        &self.metric
    }
}

impl MetricEvaluator for StandardMetrics {
    fn evaluate(&self, readout: &ChannelReadout) -> Result<MetricValue, MetricError> {
        let geom = self.geometry;
        let value = match self.metric.as_str() {
            "pedestal" => MetricValue::new(f64::from(readout.pedestal), ADC_COUNTS),
            "pedestalRms" => MetricValue::new(f64::from(readout.pedestal_rms), ADC_COUNTS),
            "fembID" => {
                MetricValue::new(f64::from(readout.channel / geom.channels_per_board), "")
            }
            "apaFembID" => MetricValue::new(
                f64::from(readout.channel / geom.channels_per_board % geom.boards_per_unit),
                "",
            ),
            "fembChannel" => {
                MetricValue::new(f64::from(readout.channel % geom.channels_per_board), "")
            }
            "rawRms" => MetricValue::new(raw_rms(readout), ADC_COUNTS),
            "rawTailFraction" => MetricValue::new(tail_fraction(readout), ""),
            name => {
                let value = readout
                    .metadata_field(name)
                    .ok_or_else(|| MetricError::UnknownMetric(name.to_string()))?;
                MetricValue::new(value, "")
            }
        };
        Ok(value)
    }
}

/// RMS of `sample - pedestal` over the waveform, 0 for an empty waveform.
fn raw_rms(readout: &ChannelReadout) -> f64 {
    if readout.samples.is_empty() {
        return 0.0;
    }
    let pedestal = f64::from(readout.pedestal);
    let sum_sq: f64 = readout
        .samples
        .iter()
        .map(|&s| {
            let dev = f64::from(s) - pedestal;
            dev * dev
        })
        .sum();
    (sum_sq / readout.samples.len() as f64).sqrt()
}

/// Fraction of samples with `|sample - pedestal| > 3 * pedestal_rms`.
///
/// With a zero noise estimate every deviating sample counts as tail.
fn tail_fraction(readout: &ChannelReadout) -> f64 {
    if readout.samples.is_empty() {
        return 0.0;
    }
    let pedestal = f64::from(readout.pedestal);
    let cut = 3.0 * f64::from(readout.pedestal_rms);
    let tail = readout
        .samples
        .iter()
        .filter(|&&s| (f64::from(s) - pedestal).abs() > cut)
        .count();
    tail as f64 / readout.samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanwatch_types::ChannelReadout;

    fn readout() -> ChannelReadout {
        ChannelReadout::builder(300)
            .pedestal(10.0)
            .pedestal_rms(2.0)
            .samples(vec![10, 13, 7, 10])
            .metadata("gain", 14.25)
            .build()
    }

    fn eval(metric: &str, readout: &ChannelReadout) -> f64 {
        StandardMetrics::new(metric).evaluate(readout).unwrap().value
    }

    #[test]
    fn pedestal_reads_back_with_units() {
        let value = StandardMetrics::new("pedestal").evaluate(&readout()).unwrap();
        assert_eq!(value.value, 10.0);
        assert_eq!(value.units, "ADC counts");
    }

    #[test]
    fn pedestal_rms_reads_back() {
        assert_eq!(eval("pedestalRms", &readout()), 2.0);
    }

    #[test]
    fn index_metrics_follow_default_geometry() {
        // Channel 300 sits on board 2 at board-local channel 44.
        let r = readout();
        assert_eq!(eval("fembID", &r), 2.0);
        assert_eq!(eval("fembChannel", &r), 44.0);
        assert_eq!(eval("apaFembID", &r), 2.0);
    }

    #[test]
    fn apa_femb_id_wraps_per_unit() {
        // Channel 2560: global board 20, unit-local board 0.
        let r = ChannelReadout::new(2560);
        assert_eq!(eval("apaFembID", &r), 0.0);
        assert_eq!(eval("fembID", &r), 20.0);
    }

    #[test]
    fn custom_geometry_changes_board_indexing() {
        let geometry = BoardGeometry {
            channels_per_board: 64,
            boards_per_unit: 10,
        };
        let value = StandardMetrics::with_geometry("fembID", geometry)
            .evaluate(&ChannelReadout::new(300))
            .unwrap();
        assert_eq!(value.value, 4.0);
    }

    #[test]
    fn raw_rms_matches_definition() {
        // Deviations 0, 3, -3, 0: rms = sqrt(18 / 4).
        let expected = (18.0f64 / 4.0).sqrt();
        assert!((eval("rawRms", &readout()) - expected).abs() < 1e-12);
    }

    #[test]
    fn raw_rms_is_zero_without_deviation() {
        let flat = ChannelReadout::builder(0)
            .pedestal(10.0)
            .samples(vec![10, 10, 10])
            .build();
        assert_eq!(eval("rawRms", &flat), 0.0);
    }

    #[test]
    fn raw_rms_of_empty_waveform_is_zero() {
        assert_eq!(eval("rawRms", &ChannelReadout::new(0)), 0.0);
    }

    #[test]
    fn tail_fraction_counts_three_sigma_outliers() {
        // Cut is 6 here, no deviation exceeds it.
        assert_eq!(eval("rawTailFraction", &readout()), 0.0);

        // Cut 3: deviations 0, 4, -4, 0 put two of four samples in the tail.
        let r = ChannelReadout::builder(0)
            .pedestal(10.0)
            .pedestal_rms(1.0)
            .samples(vec![10, 14, 6, 10])
            .build();
        assert_eq!(eval("rawTailFraction", &r), 0.5);
    }

    #[test]
    fn zero_rms_makes_every_deviation_tail() {
        let r = ChannelReadout::builder(0)
            .pedestal(0.0)
            .pedestal_rms(0.0)
            .samples(vec![1, 2, 3])
            .build();
        assert_eq!(eval("rawTailFraction", &r), 1.0);
    }

    #[test]
    fn unknown_metric_falls_back_to_metadata() {
        let value = StandardMetrics::new("gain").evaluate(&readout()).unwrap();
        assert_eq!(value.value, 14.25);
        assert_eq!(value.units, "");
    }

    #[test]
    fn missing_metadata_is_unknown_metric() {
        let err = StandardMetrics::new("wibble").evaluate(&readout()).unwrap_err();
        assert_eq!(err, MetricError::UnknownMetric("wibble".into()));
    }
}

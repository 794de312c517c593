//! Plug a custom metric strategy into a tool.
//!
//! The strategy computes the fraction of saturated samples and delegates
//! every other metric name to the built-in set.
//!
//! Run with: cargo run --example custom_metric

use std::sync::Arc;

use chanwatch_sdk::{
    AllGood, MetricConfig, MetricError, MetricEvaluator, MetricTool, MetricValue, RangeTable,
    StandardMetrics,
};
use chanwatch_types::{channel_map, ChannelReadout, EventId};

struct SaturationFraction {
    fallback: StandardMetrics,
}

impl SaturationFraction {
    fn new(metric: &str) -> Self {
        Self {
            fallback: StandardMetrics::new(metric),
        }
    }
}

impl MetricEvaluator for SaturationFraction {
    fn evaluate(&self, readout: &ChannelReadout) -> Result<MetricValue, MetricError> {
        if self.fallback.metric() == "saturationFraction" {
            let saturated = readout.samples.iter().filter(|&&s| s >= 4095).count();
            let total = readout.samples.len().max(1);
            return Ok(MetricValue::new(saturated as f64 / total as f64, ""));
        }
        self.fallback.evaluate(readout)
    }
}

fn main() {
    let ranges = RangeTable::new(8);
    let config = MetricConfig {
        metric: "saturationFraction".into(),
        metric_label: "Saturation fraction".into(),
        ..MetricConfig::default()
    };
    let tool = MetricTool::new(config, &ranges, Arc::new(AllGood))
        .expect("valid configuration")
        .with_evaluator(Box::new(SaturationFraction::new("saturationFraction")));

    let channels = channel_map((0..8).map(|channel| {
        let samples = if channel == 3 {
            vec![4095, 4095, 100, 120]
        } else {
            vec![100, 110, 120, 130]
        };
        ChannelReadout::builder(channel).pedestal(110.0).samples(samples).build()
    }));

    let report = tool.view_map(&EventId::new(1, 0, 1), &channels);
    for plot in report.plots.values() {
        println!("{}:", plot.name);
        for point in &plot.points {
            println!("  channel {:>2}: {:.2}", point.channel, point.value);
        }
    }
}

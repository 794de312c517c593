//! Feed synthetic pedestal events through a metric tool and write SVG
//! plots into the current directory.
//!
//! Run with: cargo run --example pedestal_demo

use std::sync::Arc;

use chanwatch_sdk::{AllGood, MetricConfig, MetricTool, RangeTable};
use chanwatch_types::{channel_map, ChannelReadout, EventId};

fn main() {
    let ranges = RangeTable::new(256).with_range("board0", "Board 0", 0, 127);
    let config = MetricConfig {
        metric: "pedestal".into(),
        channel_ranges: vec!["board0".into()],
        channel_line_modulus: 32,
        channel_line_pattern: vec![0],
        hist_name: "ped_%CRNAME%_run%RUN%_evt%EVENT%".into(),
        hist_title: "Pedestal for %CRLABEL% run %RUN% event %EVENT%".into(),
        metric_label: "Pedestal [ADC counts]".into(),
        plot_file_name: "ped_%CRNAME%_evt%EVENT%.svg".into(),
        log_level: 2,
        ..MetricConfig::default()
    };
    let tool = MetricTool::new(config, &ranges, Arc::new(AllGood)).expect("valid configuration");

    for event in 1..=3u32 {
        let channels = channel_map((0..128).map(|channel| {
            // Deterministic pseudo-pedestal around 730 with per-channel spread.
            let wobble = ((channel * 37 + event * 11) % 17) as f32 / 17.0;
            ChannelReadout::builder(channel).pedestal(730.0 + 3.0 * wobble).build()
        }));
        let report = tool.view_map(&EventId::new(5, 0, event), &channels);
        println!(
            "event {event}: {} plot(s), {} error(s)",
            report.plots.len(),
            report.evaluation_errors
        );
    }

    let summary = tool.summarize();
    let counters = tool.counters();
    println!(
        "summary over {} event(s): {} plot(s)",
        counters.event_count,
        summary.plots.len()
    );
}

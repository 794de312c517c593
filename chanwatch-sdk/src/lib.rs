//! # chanwatch-sdk
//!
//! Metric tools for readout-channel quality monitoring. A tool evaluates
//! one scalar metric per channel per acquisition event, accumulates
//! per-channel statistics across events grouped by named channel ranges,
//! and renders metric-vs-channel plots, optionally split by channel
//! health.
//!
//! ## Quick Start
//!
//! ```rust
//! use chanwatch_sdk::{AllGood, MetricConfig, MetricTool, RangeTable};
//! use chanwatch_types::{channel_map, ChannelReadout, EventId};
//! use std::sync::Arc;
//!
//! // Two channels, one range covering both.
//! let ranges = RangeTable::new(2);
//! let config = MetricConfig {
//!     metric: "pedestal".into(),
//!     ..MetricConfig::default()
//! };
//! let tool = MetricTool::new(config, &ranges, Arc::new(AllGood)).unwrap();
//!
//! let channels = channel_map([
//!     ChannelReadout::builder(0).pedestal(10.0).build(),
//!     ChannelReadout::builder(1).pedestal(12.0).build(),
//! ]);
//! let report = tool.view_map(&EventId::new(1, 0, 1), &channels);
//! assert!(report.is_ok());
//! assert_eq!(report.plots.len(), 1);
//! ```
//!
//! ## Pieces
//!
//! - [`MetricTool`]: per-event orchestration and end-of-run summaries.
//! - [`MetricEvaluator`] / [`StandardMetrics`]: metric strategies.
//! - [`RangeProvider`] / [`RangeTable`]: named channel-range resolution.
//! - [`StatusProvider`]: channel-health lookup for status-split plots.
//! - [`StateCell`]: the cross-event aggregate and its exclusive lease.
//! - [`PlotStore`]: versioned JSON persistence for produced plots.
//! - [`template`]: placeholder substitution for names, titles and paths.

mod config;
mod error;
mod evaluator;
mod lines;
mod ranges;
mod render;
mod state;
mod status;
mod store;
pub mod template;
mod tool;

pub use config::{MetricConfig, DEFAULT_PLOT_SIZE};
pub use error::{ConfigError, MetricError, StoreError};
pub use evaluator::{BoardGeometry, MetricEvaluator, MetricValue, StandardMetrics};
pub use lines::boundary_lines;
pub use ranges::{resolve_ranges, RangeProvider, RangeTable};
pub use render::render_plot_file;
pub use state::{StateCell, StateCounters, StateLease, ToolState};
pub use status::{AllGood, StatusProvider, StatusTable};
pub use store::PlotStore;
pub use tool::MetricTool;

// Re-export the data model so hosts can depend on this crate alone.
pub use chanwatch_types::{
    channel_map, ChannelMap, ChannelRange, ChannelReadout, ChannelStatus, EventId, EventReport,
    MetricPlot, MetricSummary, PlotPoint,
};

//! # chanwatch-types
//!
//! Core data model for readout-channel quality monitoring: per-channel
//! readout data, named channel ranges, health status, running metric
//! summaries, and the plot and report objects produced by metric tools.
//!
//! ## Design Goals
//!
//! - **No required dependencies**: the types compile without any
//!   serialization framework.
//! - **Optional serialization**: enable the `serde` feature for JSON event
//!   replay and the persistent plot store.
//! - **Instrument agnostic**: nothing here assumes a particular detector;
//!   geometry lives with the evaluator configuration.
//! - **Versioned store schema**: persisted plots carry version info so a
//!   reader can reject stores written by an incompatible layout.
//!
//! ## Example
//!
//! ```rust
//! use chanwatch_types::{ChannelReadout, MetricSummary};
//!
//! let readout = ChannelReadout::builder(42)
//!     .pedestal(731.5)
//!     .pedestal_rms(2.4)
//!     .samples(vec![730, 733, 729, 735])
//!     .build();
//! assert_eq!(readout.sample_count(), 4);
//!
//! let mut summary = MetricSummary::new();
//! summary.add(10.0);
//! summary.add(12.0);
//! assert_eq!(summary.mean(), 11.0);
//! ```

mod channel;
mod plot;
mod range;
mod report;
mod status;
mod summary;
mod version;

pub use channel::{channel_map, ChannelMap, ChannelReadout, ChannelReadoutBuilder, EventId};
pub use plot::{MetricPlot, MetricPlotBuilder, PlotPoint};
pub use range::ChannelRange;
pub use report::EventReport;
pub use status::ChannelStatus;
pub use summary::MetricSummary;
pub use version::StoreVersion;

/// Current schema version of the persistent plot store.
///
/// Increment on breaking changes to the stored plot layout.
pub const STORE_SCHEMA_VERSION: u32 = 1;

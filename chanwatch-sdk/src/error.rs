//! Error types for tool construction and processing.
//!
//! The split reflects how failures are handled: configuration errors are
//! fatal at construction, metric errors are recovered per channel, and
//! store errors are counted per output write.

use thiserror::Error;

/// Errors that make tool construction fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A configured channel range name is not known to the range provider.
    #[error("unknown channel range: {0}")]
    UnknownRange(String),

    /// The configured metric name is blank.
    #[error("metric name is empty")]
    EmptyMetric,

    /// A range provider returned an inverted interval.
    #[error("invalid channel interval [{first}, {last}] for range {name}")]
    BadRange {
        /// Name of the offending range.
        name: String,
        /// First channel of the interval.
        first: u32,
        /// Last channel of the interval.
        last: u32,
    },
}

/// Per-channel evaluation failures, recovered by skipping the channel.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricError {
    /// The metric is neither built in nor a metadata field of the readout.
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
}

/// Failures writing plot files or the plot store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Store (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store on disk was written by an incompatible schema.
    #[error("incompatible store schema version in {path}")]
    Version {
        /// Path of the offending store file.
        path: String,
    },

    /// Graphics backend failure.
    #[error("drawing error: {0}")]
    Draw(String),
}

//! # chanwatch-cli
//!
//! Host application for channel-metric tools. Loads a layered
//! configuration, builds tools through the factory registry, replays
//! acquisition events from a JSON file and reports per-event and
//! end-of-run results.

pub mod events;
pub mod registry;
pub mod settings;

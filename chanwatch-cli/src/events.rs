//! Acquisition-event replay from JSON files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use chanwatch_types::{channel_map, ChannelMap, ChannelReadout, EventId};

/// One recorded acquisition event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Run number.
    pub run: u32,
    /// Subrun number within the run.
    #[serde(default)]
    pub subrun: u32,
    /// Event number within the run.
    pub event: u32,
    /// Channel readouts of the event.
    #[serde(default)]
    pub channels: Vec<ChannelReadout>,
}

impl EventRecord {
    /// The event identity.
    pub fn id(&self) -> EventId {
        EventId::new(self.run, self.subrun, self.event)
    }

    /// The channels keyed by channel number.
    pub fn channel_map(&self) -> ChannelMap {
        channel_map(self.channels.iter().cloned())
    }
}

/// Load an event sequence from a JSON file holding an array of records.
pub fn load_events(path: &Path) -> Result<Vec<EventRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read events from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("malformed events in {}", path.display()))
}

//! Per-channel readout data and event identity.

use std::collections::BTreeMap;
use std::fmt;

/// Identity of one acquisition event as assigned by the DAQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventId {
    /// Run number.
    pub run: u32,
    /// Subrun number within the run.
    pub subrun: u32,
    /// Event number within the run.
    pub event: u32,
}

impl EventId {
    /// Create an event identity.
    pub const fn new(run: u32, subrun: u32, event: u32) -> Self {
        Self { run, subrun, event }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run {} subrun {} event {}", self.run, self.subrun, self.event)
    }
}

/// One channel's readout for one event.
///
/// This is the interface to the data-preparation stage: the calibrated
/// baseline, its noise estimate, the raw waveform, and any named scalar
/// metadata attached upstream.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelReadout {
    /// Global channel number.
    pub channel: u32,
    /// Baseline (zero-signal) level in ADC counts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pedestal: f32,
    /// Baseline noise estimate in ADC counts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pedestal_rms: f32,
    /// Raw waveform samples in ADC counts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub samples: Vec<i16>,
    /// Named scalar metadata attached by upstream processing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub metadata: BTreeMap<String, f64>,
}

impl ChannelReadout {
    /// Readout for a channel with no waveform or metadata.
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            ..Default::default()
        }
    }

    /// Create a builder for a channel readout.
    pub fn builder(channel: u32) -> ChannelReadoutBuilder {
        ChannelReadoutBuilder::new(channel)
    }

    /// Number of raw samples in the waveform.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Look up a named metadata field.
    pub fn metadata_field(&self, name: &str) -> Option<f64> {
        self.metadata.get(name).copied()
    }
}

/// Builder for [`ChannelReadout`].
#[derive(Debug, Default)]
pub struct ChannelReadoutBuilder {
    readout: ChannelReadout,
}

impl ChannelReadoutBuilder {
    /// Create a builder for the given channel.
    pub fn new(channel: u32) -> Self {
        Self {
            readout: ChannelReadout::new(channel),
        }
    }

    /// Set the pedestal.
    pub fn pedestal(mut self, pedestal: f32) -> Self {
        self.readout.pedestal = pedestal;
        self
    }

    /// Set the pedestal noise estimate.
    pub fn pedestal_rms(mut self, rms: f32) -> Self {
        self.readout.pedestal_rms = rms;
        self
    }

    /// Set the raw waveform.
    pub fn samples(mut self, samples: Vec<i16>) -> Self {
        self.readout.samples = samples;
        self
    }

    /// Attach one metadata field.
    pub fn metadata(mut self, name: impl Into<String>, value: f64) -> Self {
        self.readout.metadata.insert(name.into(), value);
        self
    }

    /// Build the readout.
    pub fn build(self) -> ChannelReadout {
        self.readout
    }
}

/// Channels of one event, keyed by channel number.
pub type ChannelMap = BTreeMap<u32, ChannelReadout>;

/// Collect readouts into a [`ChannelMap`] keyed by channel number.
pub fn channel_map<I>(readouts: I) -> ChannelMap
where
    I: IntoIterator<Item = ChannelReadout>,
{
    readouts.into_iter().map(|r| (r.channel, r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_all_fields() {
        let readout = ChannelReadout::builder(7)
            .pedestal(512.0)
            .pedestal_rms(1.5)
            .samples(vec![510, 514, 512])
            .metadata("gain", 14.0)
            .build();

        assert_eq!(readout.channel, 7);
        assert_eq!(readout.pedestal, 512.0);
        assert_eq!(readout.pedestal_rms, 1.5);
        assert_eq!(readout.sample_count(), 3);
        assert_eq!(readout.metadata_field("gain"), Some(14.0));
    }

    #[test]
    fn missing_metadata_field_is_none() {
        let readout = ChannelReadout::new(3);
        assert_eq!(readout.metadata_field("gain"), None);
    }

    #[test]
    fn event_id_display() {
        let id = EventId::new(12, 3, 456);
        assert_eq!(id.to_string(), "run 12 subrun 3 event 456");
    }

    #[test]
    fn event_ids_order_by_run_then_event() {
        let a = EventId::new(1, 0, 9);
        let b = EventId::new(2, 0, 1);
        assert!(a < b);
    }

    #[test]
    fn channel_map_keys_by_channel() {
        let map = channel_map([ChannelReadout::new(5), ChannelReadout::new(2)]);
        let channels: Vec<u32> = map.keys().copied().collect();
        assert_eq!(channels, vec![2, 5]);
        assert_eq!(map[&5].channel, 5);
    }
}

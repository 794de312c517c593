//! Channel-health providers.

use std::collections::BTreeMap;

use chanwatch_types::ChannelStatus;

/// Source of per-channel health classification.
pub trait StatusProvider: Send + Sync {
    /// Health of a channel.
    fn status(&self, channel: u32) -> ChannelStatus;
}

/// Provider reporting every channel good.
///
/// The default when no channel-status database is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllGood;

impl StatusProvider for AllGood {
    fn status(&self, _channel: u32) -> ChannelStatus {
        ChannelStatus::Good
    }
}

/// Table-backed provider; unlisted channels are good.
#[derive(Debug, Clone, Default)]
pub struct StatusTable {
    statuses: BTreeMap<u32, ChannelStatus>,
}

impl StatusTable {
    /// Empty table, every channel good.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one channel.
    pub fn with_status(mut self, channel: u32, status: ChannelStatus) -> Self {
        self.statuses.insert(channel, status);
        self
    }

    /// Mark a set of channels bad.
    pub fn with_bad(mut self, channels: &[u32]) -> Self {
        for &channel in channels {
            self.statuses.insert(channel, ChannelStatus::Bad);
        }
        self
    }

    /// Mark a set of channels noisy.
    pub fn with_noisy(mut self, channels: &[u32]) -> Self {
        for &channel in channels {
            self.statuses.insert(channel, ChannelStatus::Noisy);
        }
        self
    }
}

impl StatusProvider for StatusTable {
    fn status(&self, channel: u32) -> ChannelStatus {
        self.statuses.get(&channel).copied().unwrap_or(ChannelStatus::Good)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_good_reports_good_everywhere() {
        assert_eq!(AllGood.status(0), ChannelStatus::Good);
        assert_eq!(AllGood.status(u32::MAX), ChannelStatus::Good);
    }

    #[test]
    fn table_reports_marked_channels() {
        let table = StatusTable::new().with_bad(&[3, 7]).with_noisy(&[5]);
        assert_eq!(table.status(3), ChannelStatus::Bad);
        assert_eq!(table.status(5), ChannelStatus::Noisy);
        assert_eq!(table.status(4), ChannelStatus::Good);
    }

    #[test]
    fn later_marks_override_earlier_ones() {
        let table = StatusTable::new()
            .with_bad(&[9])
            .with_status(9, ChannelStatus::Noisy);
        assert_eq!(table.status(9), ChannelStatus::Noisy);
    }
}

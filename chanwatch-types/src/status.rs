//! Channel health classification.

use std::fmt;

/// Health classification of a readout channel.
///
/// Obtained per channel from the status provider and used to partition
/// plots when the configured output name carries a status placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChannelStatus {
    /// Functioning normally, neither bad nor noisy.
    #[default]
    Good,
    /// Malfunctioning.
    Bad,
    /// Excessively noisy.
    Noisy,
}

impl ChannelStatus {
    /// All variants in partition order.
    pub const ALL: [ChannelStatus; 3] =
        [ChannelStatus::Good, ChannelStatus::Bad, ChannelStatus::Noisy];

    /// Lowercase label used in templated names.
    pub fn label(self) -> &'static str {
        match self {
            ChannelStatus::Good => "good",
            ChannelStatus::Bad => "bad",
            ChannelStatus::Noisy => "noisy",
        }
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

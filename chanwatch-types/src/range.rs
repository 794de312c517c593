//! Named contiguous channel intervals.

use std::fmt;

/// A named, inclusive interval of channel numbers.
///
/// Ranges are resolved once, at tool construction, from the range provider.
/// A resolved range always satisfies `first <= last`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelRange {
    /// Range identifier used in lookups and templated names.
    pub name: String,
    /// Display label used in plot titles.
    pub label: String,
    /// First channel of the interval.
    pub first: u32,
    /// Last channel of the interval (inclusive).
    pub last: u32,
}

impl ChannelRange {
    /// Create a range. Callers must pass `first <= last`.
    pub fn new(name: impl Into<String>, label: impl Into<String>, first: u32, last: u32) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            first,
            last,
        }
    }

    /// Checked constructor, `None` when the interval is inverted.
    pub fn checked(
        name: impl Into<String>,
        label: impl Into<String>,
        first: u32,
        last: u32,
    ) -> Option<Self> {
        (first <= last).then(|| Self::new(name, label, first, last))
    }

    /// Number of channels in the interval.
    pub fn size(&self) -> usize {
        (self.last - self.first) as usize + 1
    }

    /// Whether the interval contains `channel`.
    pub fn contains(&self, channel: u32) -> bool {
        channel >= self.first && channel <= self.last
    }

    /// Zero-based offset of `channel` within the interval.
    pub fn offset_of(&self, channel: u32) -> Option<usize> {
        self.contains(channel).then(|| (channel - self.first) as usize)
    }

    /// Iterate the channel numbers of the interval.
    pub fn channels(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }
}

impl fmt::Display for ChannelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {}]", self.name, self.first, self.last)
    }
}

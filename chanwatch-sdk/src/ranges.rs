//! Channel-range resolution.
//!
//! Range names configured on a tool are resolved once, at construction,
//! through a [`RangeProvider`]. The provider abstracts the channel-map
//! service of the experiment; [`RangeTable`] is the in-memory
//! implementation used by hosts and tests.

use std::collections::BTreeMap;

use chanwatch_types::ChannelRange;

use crate::error::ConfigError;

/// Source of named channel ranges.
pub trait RangeProvider: Send + Sync {
    /// Look up a named range.
    fn lookup(&self, name: &str) -> Option<ChannelRange>;

    /// The range spanning every channel known to the provider.
    fn full_span(&self) -> ChannelRange;
}

/// Resolve configured range names through a provider.
///
/// An empty list selects the provider's full span. Within the list, the
/// empty string and the literal `all` also resolve to the full span; any
/// other name must be known to the provider and must yield a well-formed
/// interval. The full span is renamed `all` and labeled `All`.
pub fn resolve_ranges(
    provider: &dyn RangeProvider,
    names: &[String],
) -> Result<Vec<ChannelRange>, ConfigError> {
    let mut ranges = Vec::new();
    if names.is_empty() {
        ranges.push(full_span(provider));
        return Ok(ranges);
    }
    for name in names {
        if name.is_empty() || name == "all" {
            ranges.push(full_span(provider));
            continue;
        }
        let range = provider
            .lookup(name)
            .ok_or_else(|| ConfigError::UnknownRange(name.clone()))?;
        if range.first > range.last {
            return Err(ConfigError::BadRange {
                name: range.name,
                first: range.first,
                last: range.last,
            });
        }
        ranges.push(range);
    }
    Ok(ranges)
}

fn full_span(provider: &dyn RangeProvider) -> ChannelRange {
    let span = provider.full_span();
    ChannelRange::new("all", "All", span.first, span.last)
}

/// In-memory range provider backed by a name-to-range table.
#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    channel_count: u32,
    ranges: BTreeMap<String, ChannelRange>,
}

impl RangeTable {
    /// Table for an instrument with the given channel count.
    pub fn new(channel_count: u32) -> Self {
        Self {
            channel_count,
            ranges: BTreeMap::new(),
        }
    }

    /// Add a named range.
    pub fn with_range(
        mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        first: u32,
        last: u32,
    ) -> Self {
        let range = ChannelRange::new(name, label, first, last);
        self.ranges.insert(range.name.clone(), range);
        self
    }

    /// Number of channels of the instrument.
    pub fn channel_count(&self) -> u32 {
        self.channel_count
    }
}

impl RangeProvider for RangeTable {
    fn lookup(&self, name: &str) -> Option<ChannelRange> {
        self.ranges.get(name).cloned()
    }

    fn full_span(&self) -> ChannelRange {
        ChannelRange::new("all", "All", 0, self.channel_count.saturating_sub(1))
    }
}

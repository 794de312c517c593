//! Cross-event aggregation state and its exclusive lease.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

use chanwatch_types::{ChannelRange, EventId, MetricSummary};
use parking_lot::{Mutex, MutexGuard};

/// Mutable aggregate spanning the lifetime of one tool instance.
///
/// Holds run/event bookkeeping plus one running [`MetricSummary`] per
/// channel offset per range. Summary vectors are created lazily, on the
/// first value recorded for their range, and only ever grow in count.
#[derive(Debug, Clone, Default)]
pub struct ToolState {
    /// Number of processing calls.
    pub call_count: u64,
    /// First run seen.
    pub first_run: u32,
    /// Most recent run seen.
    pub last_run: u32,
    /// First subrun seen.
    pub first_subrun: u32,
    /// Most recent subrun seen.
    pub last_subrun: u32,
    /// First event seen.
    pub first_event: u32,
    /// Most recent event seen.
    pub last_event: u32,
    /// Distinct (run, event) pairs seen.
    pub event_count: u64,
    /// Distinct runs seen.
    pub run_count: u64,
    summaries: BTreeMap<String, Vec<MetricSummary>>,
}

impl ToolState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance run/event bookkeeping for one call.
    ///
    /// A new event is a (run, event) pair differing from the last one
    /// recorded; repeated calls for the same event advance only the call
    /// count.
    pub fn update_event(&mut self, event: &EventId) {
        self.call_count += 1;
        if self.call_count == 1 {
            self.first_run = event.run;
            self.last_run = event.run;
            self.first_subrun = event.subrun;
            self.last_subrun = event.subrun;
            self.first_event = event.event;
            self.last_event = event.event;
            self.run_count = 1;
            self.event_count = 1;
            return;
        }
        let new_run = event.run != self.last_run;
        if new_run {
            self.run_count += 1;
            self.last_run = event.run;
        }
        if new_run || event.event != self.last_event {
            self.event_count += 1;
            self.last_event = event.event;
            self.last_subrun = event.subrun;
        }
    }

    /// Record one metric value at a channel offset within a range.
    ///
    /// The summary vector for the range is sized to the range on first use.
    pub fn record(&mut self, range: &ChannelRange, offset: usize, value: f64) {
        let sums = self.summaries.entry(range.name.clone()).or_default();
        if sums.len() < range.size() {
            sums.resize(range.size(), MetricSummary::new());
        }
        if let Some(summary) = sums.get_mut(offset) {
            summary.add(value);
        }
    }

    /// Per-offset summaries for a range, empty if nothing was recorded.
    pub fn summaries(&self, range_name: &str) -> &[MetricSummary] {
        self.summaries.get(range_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First and last run numbers seen.
    pub fn run_span(&self) -> (u32, u32) {
        (self.first_run, self.last_run)
    }

    /// First and last subrun numbers seen.
    pub fn subrun_span(&self) -> (u32, u32) {
        (self.first_subrun, self.last_subrun)
    }

    /// First and last event numbers seen.
    pub fn event_span(&self) -> (u32, u32) {
        (self.first_event, self.last_event)
    }

    /// Copy of the bookkeeping counters.
    pub fn counters(&self) -> StateCounters {
        StateCounters {
            call_count: self.call_count,
            event_count: self.event_count,
            run_count: self.run_count,
            first_run: self.first_run,
            last_run: self.last_run,
            first_event: self.first_event,
            last_event: self.last_event,
        }
    }
}

/// Snapshot of the state's bookkeeping counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateCounters {
    /// Number of processing calls.
    pub call_count: u64,
    /// Distinct (run, event) pairs seen.
    pub event_count: u64,
    /// Distinct runs seen.
    pub run_count: u64,
    /// First run seen.
    pub first_run: u32,
    /// Most recent run seen.
    pub last_run: u32,
    /// First event seen.
    pub first_event: u32,
    /// Most recent event seen.
    pub last_event: u32,
}

/// Holder of a tool's aggregate state, enforcing single-lease access.
///
/// Per-event processing borrows the state through [`StateCell::lease`] and
/// releases it when the returned guard drops. Overlapping leases are a
/// host error: the tool does not synchronize concurrent calls, so the
/// second lease fails fast instead of blocking.
#[derive(Debug, Default)]
pub struct StateCell {
    inner: Mutex<ToolState>,
}

impl StateCell {
    /// Cell holding an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the state exclusively.
    ///
    /// # Panics
    ///
    /// Panics if a lease is already outstanding.
    pub fn lease(&self) -> StateLease<'_> {
        match self.inner.try_lock() {
            Some(guard) => StateLease { guard },
            None => {
                panic!("tool state lease already outstanding; per-event calls must not overlap")
            }
        }
    }
}

/// Exclusive lease on a tool's aggregate state, released on drop.
pub struct StateLease<'a> {
    guard: MutexGuard<'a, ToolState>,
}

impl Deref for StateLease<'_> {
    type Target = ToolState;

    fn deref(&self) -> &ToolState {
        &self.guard
    }
}

impl DerefMut for StateLease<'_> {
    fn deref_mut(&mut self) -> &mut ToolState {
        &mut self.guard
    }
}

impl fmt::Debug for StateLease<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateLease")
            .field("call_count", &self.call_count)
            .finish()
    }
}

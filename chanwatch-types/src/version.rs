//! Store schema versioning.

use crate::STORE_SCHEMA_VERSION;

/// Version stamp embedded in the persistent plot store.
///
/// A reader checks the stamp before interpreting the payload, so stores
/// written by an incompatible layout fail cleanly instead of
/// half-deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreVersion {
    /// Breaking-change counter.
    pub major: u32,
    /// Backwards-compatible addition counter.
    pub minor: u32,
}

impl StoreVersion {
    /// Create a version stamp.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// The version written by this library.
    pub const fn current() -> Self {
        Self {
            major: STORE_SCHEMA_VERSION,
            minor: 0,
        }
    }

    /// Whether a store with this stamp can be read by this library.
    pub fn is_compatible(&self) -> bool {
        self.major == STORE_SCHEMA_VERSION
    }
}

impl Default for StoreVersion {
    fn default() -> Self {
        Self::current()
    }
}

//! Factory registry mapping configured tool kinds to constructors.
//!
//! Discovery is explicit: kinds are registered at process startup and
//! resolved by name from the settings file.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use chanwatch_sdk::{ConfigError, MetricConfig, MetricTool, RangeProvider, StatusProvider};

/// Constructor signature for a registered tool kind.
pub type ToolCtor = fn(
    MetricConfig,
    &dyn RangeProvider,
    Arc<dyn StatusProvider>,
) -> Result<MetricTool, ConfigError>;

/// Registry of tool constructors keyed by kind.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    ctors: BTreeMap<String, ToolCtor>,
}

impl ToolRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in kinds registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("channel_metric", MetricTool::new);
        registry
    }

    /// Register a constructor for a kind, replacing any previous one.
    pub fn register(&mut self, kind: impl Into<String>, ctor: ToolCtor) {
        self.ctors.insert(kind.into(), ctor);
    }

    /// Registered kind names in order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.ctors.keys().map(String::as_str)
    }

    /// Build a tool of the given kind.
    pub fn build(
        &self,
        kind: &str,
        config: MetricConfig,
        ranges: &dyn RangeProvider,
        status: Arc<dyn StatusProvider>,
    ) -> Result<MetricTool> {
        let ctor = self
            .ctors
            .get(kind)
            .ok_or_else(|| anyhow!("unknown tool kind: {kind}"))?;
        Ok(ctor(config, ranges, status)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanwatch_sdk::{AllGood, RangeTable};

    #[test]
    fn builtin_kind_builds_a_tool() {
        let registry = ToolRegistry::with_builtins();
        let config = MetricConfig {
            metric: "pedestal".into(),
            ..MetricConfig::default()
        };
        let tool = registry
            .build("channel_metric", config, &RangeTable::new(8), Arc::new(AllGood))
            .unwrap();
        assert_eq!(tool.ranges().len(), 1);
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let registry = ToolRegistry::with_builtins();
        let err = registry
            .build(
                "wibble",
                MetricConfig::default(),
                &RangeTable::new(8),
                Arc::new(AllGood),
            )
            .unwrap_err();
        assert!(err.to_string().contains("unknown tool kind"));
    }

    #[test]
    fn construction_errors_propagate() {
        let registry = ToolRegistry::with_builtins();
        // Empty metric fails inside the constructor, not the registry.
        let err = registry
            .build(
                "channel_metric",
                MetricConfig::default(),
                &RangeTable::new(8),
                Arc::new(AllGood),
            )
            .unwrap_err();
        assert!(err.to_string().contains("metric name is empty"));
    }

    #[test]
    fn kinds_lists_registrations() {
        let registry = ToolRegistry::with_builtins();
        let kinds: Vec<&str> = registry.kinds().collect();
        assert_eq!(kinds, vec!["channel_metric"]);
    }
}

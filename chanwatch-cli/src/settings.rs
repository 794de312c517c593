//! Layered host configuration.
//!
//! Settings come from a TOML or JSON file with `CHANWATCH_*` environment
//! overrides layered on top (double underscore separates nesting levels,
//! e.g. `CHANWATCH_DETECTOR__CHANNELS=512`).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use chanwatch_sdk::{MetricConfig, RangeTable, StatusTable};

/// Host settings: detector description, channel health and tool instances.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Detector geometry and named channel ranges.
    pub detector: DetectorSettings,
    /// Channel health lists.
    #[serde(default)]
    pub status: StatusSettings,
    /// Tool instances to build.
    #[serde(default)]
    pub tools: Vec<ToolSettings>,
}

/// Channel count and named ranges of the instrument.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorSettings {
    /// Total number of readout channels.
    pub channels: u32,
    /// Named ranges keyed by range name.
    #[serde(default)]
    pub ranges: BTreeMap<String, RangeSettings>,
}

/// One named range entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RangeSettings {
    /// Display label; the range name is used when blank.
    #[serde(default)]
    pub label: String,
    /// First channel of the interval.
    pub first: u32,
    /// Last channel of the interval (inclusive).
    pub last: u32,
}

/// Channel health lists; unlisted channels are good.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusSettings {
    /// Malfunctioning channels.
    #[serde(default)]
    pub bad: Vec<u32>,
    /// Excessively noisy channels.
    #[serde(default)]
    pub noisy: Vec<u32>,
}

/// One tool instance: registry kind plus its configuration table.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolSettings {
    /// Instance name used in output.
    pub name: String,
    /// Registered tool kind.
    #[serde(default = "default_kind")]
    pub kind: String,
    /// The tool configuration.
    #[serde(default)]
    pub config: MetricConfig,
}

fn default_kind() -> String {
    "channel_metric".to_string()
}

impl Settings {
    /// Load settings from a file with environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("CHANWATCH").separator("__"))
            .build()
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("malformed settings in {}", path.display()))
    }

    /// Build the range provider described by the detector section.
    pub fn range_table(&self) -> RangeTable {
        let mut table = RangeTable::new(self.detector.channels);
        for (name, range) in &self.detector.ranges {
            let label = if range.label.is_empty() {
                name.clone()
            } else {
                range.label.clone()
            };
            table = table.with_range(name.clone(), label, range.first, range.last);
        }
        table
    }

    /// Build the status provider described by the status section.
    pub fn status_table(&self) -> StatusTable {
        StatusTable::new()
            .with_bad(&self.status.bad)
            .with_noisy(&self.status.noisy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanwatch_sdk::{ChannelStatus, RangeProvider, StatusProvider};
    use std::io::Write;

    fn write_settings(text: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chanwatch.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_toml_settings() {
        let (_dir, path) = write_settings(
            r#"
[detector]
channels = 64

[detector.ranges.left]
label = "Left half"
first = 0
last = 31

[status]
bad = [3]
noisy = [7]

[[tools]]
name = "ped"

[tools.config]
metric = "pedestal"
channel_ranges = ["left"]
"#,
        );
        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.detector.channels, 64);
        assert_eq!(settings.tools.len(), 1);
        assert_eq!(settings.tools[0].name, "ped");
        assert_eq!(settings.tools[0].kind, "channel_metric");
        assert_eq!(settings.tools[0].config.metric, "pedestal");

        let ranges = settings.range_table();
        let left = ranges.lookup("left").unwrap();
        assert_eq!(left.label, "Left half");
        assert_eq!(left.last, 31);

        let status = settings.status_table();
        assert_eq!(status.status(3), ChannelStatus::Bad);
        assert_eq!(status.status(7), ChannelStatus::Noisy);
        assert_eq!(status.status(4), ChannelStatus::Good);
    }

    #[test]
    fn range_name_doubles_as_label_when_blank() {
        let (_dir, path) = write_settings(
            r#"
[detector]
channels = 8

[detector.ranges.top]
first = 4
last = 7
"#,
        );
        let settings = Settings::load(&path).unwrap();
        let top = settings.range_table().lookup("top").unwrap();
        assert_eq!(top.label, "top");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(&dir.path().join("absent.toml")).is_err());
    }
}

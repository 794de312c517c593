//! The channel-metric tool: per-event orchestration of evaluation,
//! aggregation and rendering.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, trace, warn};

use chanwatch_types::{
    ChannelMap, ChannelRange, ChannelReadout, ChannelStatus, EventId, EventReport, MetricPlot,
    MetricSummary,
};

use crate::config::MetricConfig;
use crate::error::ConfigError;
use crate::evaluator::{MetricEvaluator, StandardMetrics};
use crate::lines;
use crate::ranges::{resolve_ranges, RangeProvider};
use crate::render;
use crate::state::{StateCell, StateCounters, ToolState};
use crate::status::StatusProvider;
use crate::store::PlotStore;
use crate::template;

/// Evaluates one metric per channel per event, accumulates per-channel
/// statistics grouped by channel range, and produces metric-vs-channel
/// plots.
///
/// Construction resolves the configured ranges once and is the only place
/// configuration errors surface. Per-event processing recovers from
/// per-channel failures by skipping and counting them.
///
/// # Example
///
/// ```rust
/// use chanwatch_sdk::{AllGood, MetricConfig, MetricTool, RangeTable};
/// use chanwatch_types::{channel_map, ChannelReadout, EventId};
/// use std::sync::Arc;
///
/// let ranges = RangeTable::new(4);
/// let config = MetricConfig {
///     metric: "pedestal".into(),
///     ..MetricConfig::default()
/// };
/// let tool = MetricTool::new(config, &ranges, Arc::new(AllGood)).unwrap();
///
/// let channels = channel_map([ChannelReadout::builder(0).pedestal(731.0).build()]);
/// let report = tool.view_map(&EventId::new(7, 0, 1), &channels);
/// assert_eq!(report.plots.len(), 1);
/// ```
pub struct MetricTool {
    config: MetricConfig,
    ranges: Vec<ChannelRange>,
    status_split: bool,
    evaluator: Box<dyn MetricEvaluator>,
    status_provider: Arc<dyn StatusProvider>,
    state: StateCell,
}

impl MetricTool {
    /// Build a tool from its configuration.
    ///
    /// Resolves every configured channel range through `ranges` (empty,
    /// `""` or `"all"` selects the provider's full span) and derives the
    /// status-split flag from the `hist_name` template, so neither is
    /// re-derived per event.
    pub fn new(
        config: MetricConfig,
        ranges: &dyn RangeProvider,
        status_provider: Arc<dyn StatusProvider>,
    ) -> Result<Self, ConfigError> {
        if config.metric.is_empty() {
            return Err(ConfigError::EmptyMetric);
        }
        let resolved = resolve_ranges(ranges, &config.channel_ranges)?;
        let status_split = template::has_status_placeholder(&config.hist_name);
        if config.log_level >= 1 {
            info!(
                metric = %config.metric,
                ranges = resolved.len(),
                status_split,
                "configured channel-metric tool"
            );
        }
        let evaluator = Box::new(StandardMetrics::new(&config.metric));
        Ok(Self {
            config,
            ranges: resolved,
            status_split,
            evaluator,
            status_provider,
            state: StateCell::new(),
        })
    }

    /// Replace the metric evaluation strategy.
    pub fn with_evaluator(mut self, evaluator: Box<dyn MetricEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// The resolved channel ranges.
    pub fn ranges(&self) -> &[ChannelRange] {
        &self.ranges
    }

    /// The tool configuration.
    pub fn config(&self) -> &MetricConfig {
        &self.config
    }

    /// Bookkeeping counters of the aggregate state.
    pub fn counters(&self) -> StateCounters {
        self.state.lease().counters()
    }

    /// Copy of the per-offset summaries accumulated for a range.
    pub fn summaries(&self, range_name: &str) -> Vec<MetricSummary> {
        self.state.lease().summaries(range_name).to_vec()
    }

    /// Process one channel.
    ///
    /// Evaluates the metric, records the clipped value into every
    /// configured range containing the channel, and returns the raw value
    /// and units as report outputs (`metricValue`, `metricUnits`).
    /// Produces no plots.
    pub fn view(&self, event: &EventId, readout: &ChannelReadout) -> EventReport {
        let mut report = EventReport::new();
        let mut state = self.state.lease();
        state.update_event(event);
        match self.evaluator.evaluate(readout) {
            Ok(metric) => {
                let clipped = self.clip(metric.value);
                for range in &self.ranges {
                    if let Some(offset) = range.offset_of(readout.channel) {
                        state.record(range, offset, clipped);
                    }
                }
                report.scalars.insert("metricValue".to_string(), metric.value);
                report.strings.insert("metricUnits".to_string(), metric.units);
            }
            Err(err) => {
                report.evaluation_errors += 1;
                if self.config.log_level >= 2 {
                    warn!(channel = readout.channel, %err, "metric evaluation failed");
                }
            }
        }
        report
    }

    /// Process one event's channel map.
    ///
    /// Advances the run/event bookkeeping once, then handles every
    /// configured range: channels present in the map are evaluated, clipped
    /// into the configured bounds, recorded into the aggregate, and plotted
    /// against channel number. With `%STATUS%` in the name template each
    /// range yields one plot per health class instead of one.
    pub fn view_map(&self, event: &EventId, channels: &ChannelMap) -> EventReport {
        let mut report = EventReport::new();
        let mut state = self.state.lease();
        state.update_event(event);
        if self.config.log_level >= 2 {
            debug!(%event, channels = channels.len(), "processing event");
        }
        for range in &self.ranges {
            let partial = self.render_range(&mut state, event, range, channels);
            report.merge(partial);
        }
        report
    }

    /// Build end-of-run summary plots from the accumulated state.
    ///
    /// One plot per range carrying each channel's mean with its standard
    /// error over every event seen. Names use the same templates with
    /// `%RUN%`, `%SUBRUN%` and `%EVENT%` expanded to first-last spans and
    /// `%STATUS%` replaced by `all`. Ranges with no recorded data are
    /// skipped, as are channels never seen. The bookkeeping counters are
    /// returned as report scalars.
    pub fn summarize(&self) -> EventReport {
        let state = self.state.lease();
        let mut report = EventReport::new();
        if self.config.log_level >= 1 {
            info!(
                calls = state.call_count,
                events = state.event_count,
                runs = state.run_count,
                "summarizing accumulated state"
            );
        }
        for range in &self.ranges {
            let sums = state.summaries(&range.name);
            if sums.is_empty() {
                continue;
            }
            let name = self.summary_name(&self.config.hist_name, &state, range);
            let title = self.summary_name(&self.config.hist_title, &state, range);
            let label = self.summary_name(&self.config.metric_label, &state, range);
            let mut builder = MetricPlot::builder(name)
                .title(title)
                .metric_label(label)
                .channels(range.first, range.last)
                .lines(lines::boundary_lines(
                    range,
                    self.config.channel_line_modulus,
                    &self.config.channel_line_pattern,
                ));
            if let Some((lo, hi)) = self.config.bounds() {
                builder = builder.bounds(lo, hi);
            }
            for (offset, summary) in sums.iter().enumerate() {
                if summary.count == 0 {
                    continue;
                }
                let channel = range.first + offset as u32;
                builder = builder.point_with_error(channel, summary.mean(), summary.std_error());
            }
            let plot = builder.build();
            let plot_file = (!self.config.plot_file_name.is_empty())
                .then(|| self.summary_name(&self.config.plot_file_name, &state, range));
            let store_file = (!self.config.store_file_name.is_empty())
                .then(|| self.summary_name(&self.config.store_file_name, &state, range));
            self.emit(plot, plot_file, store_file, &mut report);
        }
        report.scalars.insert("callCount".to_string(), state.call_count as f64);
        report.scalars.insert("eventCount".to_string(), state.event_count as f64);
        report.scalars.insert("runCount".to_string(), state.run_count as f64);
        report
    }

    /// Produce the plot(s) for one range: a single plot, or one per health
    /// class when status splitting is configured.
    fn render_range(
        &self,
        state: &mut ToolState,
        event: &EventId,
        range: &ChannelRange,
        channels: &ChannelMap,
    ) -> EventReport {
        let mut report = EventReport::new();
        if self.status_split {
            for status in ChannelStatus::ALL {
                let plot =
                    self.build_event_plot(state, event, range, channels, Some(status), &mut report);
                let (plot_file, store_file) = self.output_paths(event, range, Some(status));
                self.emit(plot, plot_file, store_file, &mut report);
            }
        } else {
            let plot = self.build_event_plot(state, event, range, channels, None, &mut report);
            let (plot_file, store_file) = self.output_paths(event, range, None);
            self.emit(plot, plot_file, store_file, &mut report);
        }
        report
    }

    /// Evaluate, clip, record and collect the points of one plot, then
    /// resolve its name, title and boundary lines.
    fn build_event_plot(
        &self,
        state: &mut ToolState,
        event: &EventId,
        range: &ChannelRange,
        channels: &ChannelMap,
        status: Option<ChannelStatus>,
        report: &mut EventReport,
    ) -> MetricPlot {
        let mut points: Vec<(u32, f64)> = Vec::new();
        let mut units = String::new();
        for (&channel, readout) in channels.range(range.first..=range.last) {
            if let Some(wanted) = status {
                if self.status_provider.status(channel) != wanted {
                    continue;
                }
            }
            match self.evaluator.evaluate(readout) {
                Ok(metric) => {
                    let value = self.clip(metric.value);
                    if let Some(offset) = range.offset_of(channel) {
                        state.record(range, offset, value);
                    }
                    if self.config.log_level >= 3 {
                        trace!(channel, value, "metric evaluated");
                    }
                    units = metric.units;
                    points.push((channel, value));
                }
                Err(err) => {
                    report.evaluation_errors += 1;
                    if self.config.log_level >= 3 {
                        warn!(channel, %err, "metric evaluation failed, channel skipped");
                    }
                }
            }
        }

        let name = self.event_name(&self.config.hist_name, event, range, status);
        let title = self.event_name(&self.config.hist_title, event, range, status);
        let label = self.event_name(&self.config.metric_label, event, range, status);
        let mut builder = MetricPlot::builder(name)
            .title(title)
            .metric_label(label)
            .units(units)
            .channels(range.first, range.last)
            .lines(lines::boundary_lines(
                range,
                self.config.channel_line_modulus,
                &self.config.channel_line_pattern,
            ));
        if let Some((lo, hi)) = self.config.bounds() {
            builder = builder.bounds(lo, hi);
        }
        for (channel, value) in points {
            builder = builder.point(channel, value);
        }
        builder.build()
    }

    /// Write the configured outputs and insert the plot into the report.
    ///
    /// Write failures are counted on the report and logged, never fatal.
    fn emit(
        &self,
        plot: MetricPlot,
        plot_file: Option<String>,
        store_file: Option<String>,
        report: &mut EventReport,
    ) {
        if let Some(path) = plot_file {
            if let Err(err) = render::render_plot_file(&plot, &path, self.config.plot_size()) {
                report.io_errors += 1;
                error!(path, %err, "failed to write plot file");
            }
        }
        if let Some(path) = store_file {
            if let Err(err) = PlotStore::update_file(Path::new(&path), std::slice::from_ref(&plot))
            {
                report.io_errors += 1;
                error!(path, %err, "failed to update plot store");
            }
        }
        report.insert_plot(plot);
    }

    /// Resolved plot-file and store paths for one per-event output.
    fn output_paths(
        &self,
        event: &EventId,
        range: &ChannelRange,
        status: Option<ChannelStatus>,
    ) -> (Option<String>, Option<String>) {
        let plot_file = (!self.config.plot_file_name.is_empty())
            .then(|| self.event_name(&self.config.plot_file_name, event, range, status));
        let store_file = (!self.config.store_file_name.is_empty())
            .then(|| self.event_name(&self.config.store_file_name, event, range, status));
        (plot_file, store_file)
    }

    fn event_name(
        &self,
        template: &str,
        event: &EventId,
        range: &ChannelRange,
        status: Option<ChannelStatus>,
    ) -> String {
        let text = template::substitute(template, event, range);
        match status {
            Some(status) => template::substitute_status(&text, status),
            None => text,
        }
    }

    fn summary_name(&self, template: &str, state: &ToolState, range: &ChannelRange) -> String {
        let text = template::substitute_span(
            template,
            state.run_span(),
            state.subrun_span(),
            state.event_span(),
            range,
        );
        text.replace(template::STATUS_PLACEHOLDER, "all")
    }

    /// Clip a value into the configured bounds.
    fn clip(&self, value: f64) -> f64 {
        match self.config.bounds() {
            Some((lo, hi)) => value.clamp(lo, hi),
            None => value,
        }
    }
}

impl std::fmt::Debug for MetricTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricTool")
            .field("metric", &self.config.metric)
            .field("ranges", &self.ranges.len())
            .field("status_split", &self.status_split)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::RangeTable;
    use crate::status::{AllGood, StatusTable};
    use chanwatch_types::channel_map;

    fn pair_table() -> RangeTable {
        RangeTable::new(16).with_range("pair", "Pair", 0, 1)
    }

    fn pedestal_config() -> MetricConfig {
        MetricConfig {
            metric: "pedestal".to_string(),
            channel_ranges: vec!["pair".to_string()],
            ..MetricConfig::default()
        }
    }

    fn event(run: u32, event: u32) -> EventId {
        EventId::new(run, 0, event)
    }

    fn readout(channel: u32, pedestal: f32) -> ChannelReadout {
        ChannelReadout::builder(channel).pedestal(pedestal).build()
    }

    fn tool(config: MetricConfig) -> MetricTool {
        MetricTool::new(config, &pair_table(), Arc::new(AllGood)).unwrap()
    }

    #[test]
    fn empty_metric_is_fatal() {
        let err = MetricTool::new(MetricConfig::default(), &pair_table(), Arc::new(AllGood))
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyMetric);
    }

    #[test]
    fn unknown_range_is_fatal() {
        let config = MetricConfig {
            metric: "pedestal".to_string(),
            channel_ranges: vec!["nope".to_string()],
            ..MetricConfig::default()
        };
        let err = MetricTool::new(config, &pair_table(), Arc::new(AllGood)).unwrap_err();
        assert_eq!(err, ConfigError::UnknownRange("nope".into()));
    }

    #[test]
    fn aggregates_across_events() {
        let tool = tool(pedestal_config());

        let report =
            tool.view_map(&event(1, 1), &channel_map([readout(0, 10.0), readout(1, 12.0)]));
        assert!(report.is_ok());
        let sums = tool.summaries("pair");
        assert_eq!(sums[0].count, 1);
        assert_eq!(sums[0].mean(), 10.0);
        assert_eq!(sums[1].mean(), 12.0);

        tool.view_map(&event(1, 2), &channel_map([readout(0, 20.0), readout(1, 22.0)]));
        let sums = tool.summaries("pair");
        assert_eq!(sums[0].count, 2);
        assert_eq!(sums[0].mean(), 15.0);
        assert_eq!(sums[1].mean(), 17.0);

        let counters = tool.counters();
        assert_eq!(counters.call_count, 2);
        assert_eq!(counters.event_count, 2);
        assert_eq!(counters.run_count, 1);
    }

    #[test]
    fn unknown_metric_skips_every_channel() {
        let config = MetricConfig {
            metric: "noSuchMetric".to_string(),
            channel_ranges: vec!["pair".to_string()],
            ..MetricConfig::default()
        };
        let tool = tool(config);

        let report = tool.view_map(&event(1, 1), &channel_map([readout(0, 1.0), readout(1, 2.0)]));
        assert_eq!(report.evaluation_errors, 2);
        assert!(tool.summaries("pair").is_empty());

        let plot = report.plots.values().next().unwrap();
        assert_eq!(plot.point_count(), 0);
    }

    #[test]
    fn plot_names_resolve_templates() {
        let config = MetricConfig {
            hist_name: "ped_%CRNAME%_run%RUN%_evt%EVENT%".to_string(),
            ..pedestal_config()
        };
        let tool = tool(config);

        let report = tool.view_map(&event(12, 3), &channel_map([readout(0, 5.0)]));
        assert!(report.plot("ped_pair_run12_evt3").is_some());
    }

    #[test]
    fn channels_outside_the_range_are_ignored() {
        let tool = tool(pedestal_config());
        let report = tool.view_map(&event(1, 1), &channel_map([readout(0, 5.0), readout(9, 7.0)]));
        let plot = report.plots.values().next().unwrap();
        assert_eq!(plot.point_count(), 1);
        assert_eq!(plot.value_at(9), None);
    }

    #[test]
    fn values_clip_into_configured_bounds() {
        let config = MetricConfig {
            metric_min: 0.0,
            metric_max: 10.0,
            ..pedestal_config()
        };
        let tool = tool(config);

        let report = tool.view_map(&event(1, 1), &channel_map([readout(0, 25.0)]));
        let plot = report.plots.values().next().unwrap();
        assert_eq!(plot.value_at(0), Some(10.0));
        assert_eq!(tool.summaries("pair")[0].mean(), 10.0);
        assert_eq!(plot.min, Some(0.0));
        assert_eq!(plot.max, Some(10.0));
    }

    #[test]
    fn boundary_lines_attach_to_plots() {
        let config = MetricConfig {
            metric: "pedestal".to_string(),
            channel_ranges: vec![],
            channel_line_modulus: 4,
            channel_line_pattern: vec![0],
            ..MetricConfig::default()
        };
        let tool = tool(config);
        let report = tool.view_map(&event(1, 1), &channel_map([readout(0, 5.0)]));
        let plot = report.plots.values().next().unwrap();
        // Full span of the 16-channel table.
        assert_eq!(plot.lines, vec![0, 4, 8, 12]);
    }

    #[test]
    fn status_split_partitions_channels() {
        let config = MetricConfig {
            metric: "pedestal".to_string(),
            channel_ranges: vec!["tri".to_string()],
            hist_name: "ped_%CRNAME%_%STATUS%".to_string(),
            ..MetricConfig::default()
        };
        let ranges = RangeTable::new(16).with_range("tri", "Tri", 0, 2);
        let status = StatusTable::new().with_bad(&[1]).with_noisy(&[2]);
        let tool = MetricTool::new(config, &ranges, Arc::new(status)).unwrap();

        let channels = channel_map([readout(0, 1.0), readout(1, 2.0), readout(2, 3.0)]);
        let report = tool.view_map(&event(1, 1), &channels);

        assert_eq!(report.plots.len(), 3);
        assert_eq!(report.plot("ped_tri_good").unwrap().value_at(0), Some(1.0));
        assert_eq!(report.plot("ped_tri_good").unwrap().point_count(), 1);
        assert_eq!(report.plot("ped_tri_bad").unwrap().value_at(1), Some(2.0));
        assert_eq!(report.plot("ped_tri_noisy").unwrap().value_at(2), Some(3.0));

        // Each channel is aggregated exactly once across the three passes.
        let sums = tool.summaries("tri");
        assert_eq!(sums[0].count, 1);
        assert_eq!(sums[1].count, 1);
        assert_eq!(sums[2].count, 1);
    }

    #[test]
    fn view_reports_scalar_value_and_units() {
        let tool = tool(pedestal_config());
        let report = tool.view(&event(1, 1), &readout(0, 7.5));
        assert_eq!(report.scalars["metricValue"], 7.5);
        assert_eq!(report.strings["metricUnits"], "ADC counts");
        assert_eq!(tool.summaries("pair")[0].count, 1);
        assert!(report.plots.is_empty());
    }

    #[test]
    fn view_counts_evaluation_failures() {
        let config = MetricConfig {
            metric: "noSuchMetric".to_string(),
            channel_ranges: vec!["pair".to_string()],
            ..MetricConfig::default()
        };
        let tool = tool(config);
        let report = tool.view(&event(1, 1), &readout(0, 7.5));
        assert_eq!(report.evaluation_errors, 1);
        assert!(report.scalars.is_empty());
    }

    #[test]
    fn summary_plots_carry_means_and_errors() {
        let config = MetricConfig {
            hist_name: "ped_%CRNAME%_run%RUN%_evt%EVENT%".to_string(),
            ..pedestal_config()
        };
        let tool = tool(config);
        tool.view_map(&event(1, 1), &channel_map([readout(0, 10.0)]));
        tool.view_map(&event(1, 2), &channel_map([readout(0, 20.0)]));

        let report = tool.summarize();
        assert_eq!(report.plots.len(), 1);
        let plot = report.plot("ped_pair_run1_evt1-2").unwrap();
        assert_eq!(plot.value_at(0), Some(15.0));
        // Variance 25 over 2 events.
        let error = plot.points[0].error.unwrap();
        assert!((error - 12.5f64.sqrt()).abs() < 1e-12);

        // Channel 1 was never seen and is absent.
        assert_eq!(plot.value_at(1), None);

        assert_eq!(report.scalars["callCount"], 2.0);
        assert_eq!(report.scalars["eventCount"], 2.0);
        assert_eq!(report.scalars["runCount"], 1.0);
    }

    #[test]
    fn summary_without_data_has_no_plots() {
        let tool = tool(pedestal_config());
        let report = tool.summarize();
        assert!(report.plots.is_empty());
        assert_eq!(report.scalars["callCount"], 0.0);
    }

    #[test]
    fn custom_evaluator_replaces_builtins() {
        use crate::{MetricError, MetricValue};

        struct FixedValue;
        impl MetricEvaluator for FixedValue {
            fn evaluate(&self, _readout: &ChannelReadout) -> Result<MetricValue, MetricError> {
                Ok(MetricValue::new(42.0, "widgets"))
            }
        }

        let tool = tool(pedestal_config()).with_evaluator(Box::new(FixedValue));
        let report = tool.view(&event(1, 1), &readout(0, 7.5));
        assert_eq!(report.scalars["metricValue"], 42.0);
        assert_eq!(report.strings["metricUnits"], "widgets");
    }

    #[test]
    fn plot_and_store_files_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let plot_path = dir.path().join("ped_%CRNAME%.svg");
        let store_path = dir.path().join("plots.json");
        let config = MetricConfig {
            hist_name: "ped_%CRNAME%".to_string(),
            plot_file_name: plot_path.to_str().unwrap().to_string(),
            store_file_name: store_path.to_str().unwrap().to_string(),
            ..pedestal_config()
        };
        let tool = tool(config);

        let report = tool.view_map(&event(1, 1), &channel_map([readout(0, 5.0), readout(1, 6.0)]));
        assert!(report.is_ok());
        assert!(dir.path().join("ped_pair.svg").exists());

        let store = PlotStore::load(&store_path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.plots["ped_pair"].value_at(1), Some(6.0));

        // A second event replaces the entry instead of adding one.
        tool.view_map(&event(1, 2), &channel_map([readout(0, 7.0)]));
        let store = PlotStore::load(&store_path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.plots["ped_pair"].value_at(0), Some(7.0));
    }

    #[test]
    fn write_failures_count_but_do_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let bad_path = dir.path().join("absent").join("ped.svg");
        let config = MetricConfig {
            plot_file_name: bad_path.to_str().unwrap().to_string(),
            ..pedestal_config()
        };
        let tool = tool(config);

        let report = tool.view_map(&event(1, 1), &channel_map([readout(0, 5.0)]));
        assert_eq!(report.io_errors, 1);
        assert_eq!(report.plots.len(), 1);
        assert_eq!(tool.summaries("pair")[0].count, 1);
    }
}

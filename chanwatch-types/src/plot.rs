//! Plot objects produced by metric tools.

/// One point of a metric-vs-channel plot.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlotPoint {
    /// Channel number (abscissa).
    pub channel: u32,
    /// Metric value (ordinate).
    pub value: f64,
    /// Symmetric error on the value, present on summary plots.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub error: Option<f64>,
}

impl PlotPoint {
    /// Point without an error bar.
    pub fn new(channel: u32, value: f64) -> Self {
        Self {
            channel,
            value,
            error: None,
        }
    }

    /// Point with a symmetric error bar.
    pub fn with_error(channel: u32, value: f64, error: f64) -> Self {
        Self {
            channel,
            value,
            error: Some(error),
        }
    }
}

/// A metric-vs-channel plot for one channel range.
///
/// Carries everything a graphics backend needs: resolved name and title,
/// axis labels, the channel interval, optional fixed metric bounds, the
/// positions of vertical boundary lines, and the data points themselves.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricPlot {
    /// Resolved name, unique within a store.
    pub name: String,
    /// Resolved title.
    pub title: String,
    /// Metric axis label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub metric_label: String,
    /// Unit label reported by the evaluator.
    #[cfg_attr(feature = "serde", serde(default))]
    pub units: String,
    /// First channel of the plotted interval.
    pub first: u32,
    /// Last channel of the plotted interval (inclusive).
    pub last: u32,
    /// Lower metric axis bound, when configured.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub min: Option<f64>,
    /// Upper metric axis bound, when configured.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub max: Option<f64>,
    /// Channel positions of vertical boundary lines.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lines: Vec<u32>,
    /// Data points in channel order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub points: Vec<PlotPoint>,
}

impl MetricPlot {
    /// Create a builder for a plot with the given resolved name.
    pub fn builder(name: impl Into<String>) -> MetricPlotBuilder {
        MetricPlotBuilder::new(name)
    }

    /// Number of data points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Value for a channel, if the channel was plotted.
    pub fn value_at(&self, channel: u32) -> Option<f64> {
        self.points.iter().find(|p| p.channel == channel).map(|p| p.value)
    }

    /// Smallest and largest plotted value, `None` for an empty plot.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.points.iter().map(|p| p.value);
        let head = values.next()?;
        Some(values.fold((head, head), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Builder for [`MetricPlot`].
#[derive(Debug, Default)]
pub struct MetricPlotBuilder {
    plot: MetricPlot,
}

impl MetricPlotBuilder {
    /// Create a builder for the given resolved name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            plot: MetricPlot {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.plot.title = title.into();
        self
    }

    /// Set the metric axis label.
    pub fn metric_label(mut self, label: impl Into<String>) -> Self {
        self.plot.metric_label = label.into();
        self
    }

    /// Set the unit label.
    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.plot.units = units.into();
        self
    }

    /// Set the plotted channel interval.
    pub fn channels(mut self, first: u32, last: u32) -> Self {
        self.plot.first = first;
        self.plot.last = last;
        self
    }

    /// Fix the metric axis bounds.
    pub fn bounds(mut self, min: f64, max: f64) -> Self {
        self.plot.min = Some(min);
        self.plot.max = Some(max);
        self
    }

    /// Set the vertical boundary-line positions.
    pub fn lines(mut self, lines: Vec<u32>) -> Self {
        self.plot.lines = lines;
        self
    }

    /// Append a data point.
    pub fn point(mut self, channel: u32, value: f64) -> Self {
        self.plot.points.push(PlotPoint::new(channel, value));
        self
    }

    /// Append a data point with a symmetric error.
    pub fn point_with_error(mut self, channel: u32, value: f64, error: f64) -> Self {
        self.plot.points.push(PlotPoint::with_error(channel, value, error));
        self
    }

    /// Build the plot.
    pub fn build(self) -> MetricPlot {
        self.plot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assembles_plot() {
        let plot = MetricPlot::builder("ped_apa1_run12")
            .title("Pedestal APA 1 run 12")
            .metric_label("Pedestal [ADC counts]")
            .units("ADC counts")
            .channels(0, 3)
            .bounds(600.0, 1200.0)
            .lines(vec![0, 2])
            .point(0, 731.0)
            .point(1, 744.5)
            .build();

        assert_eq!(plot.name, "ped_apa1_run12");
        assert_eq!(plot.point_count(), 2);
        assert_eq!(plot.min, Some(600.0));
        assert_eq!(plot.max, Some(1200.0));
        assert_eq!(plot.lines, vec![0, 2]);
    }

    #[test]
    fn value_at_finds_plotted_channels() {
        let plot = MetricPlot::builder("p").point(4, 1.5).point(9, 2.5).build();
        assert_eq!(plot.value_at(9), Some(2.5));
        assert_eq!(plot.value_at(5), None);
    }

    #[test]
    fn value_range_spans_data() {
        let plot = MetricPlot::builder("p")
            .point(0, 3.0)
            .point(1, -1.0)
            .point(2, 7.0)
            .build();
        assert_eq!(plot.value_range(), Some((-1.0, 7.0)));
    }

    #[test]
    fn empty_plot_has_no_value_range() {
        assert_eq!(MetricPlot::builder("p").build().value_range(), None);
    }

    #[test]
    fn error_points_keep_their_error() {
        let plot = MetricPlot::builder("p").point_with_error(3, 10.0, 0.5).build();
        assert_eq!(plot.points[0].error, Some(0.5));
    }
}

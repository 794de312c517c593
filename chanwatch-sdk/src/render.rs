//! Chart rendering through the plotters backend.
//!
//! A [`MetricPlot`] is pure data; this module turns it into an image file.
//! The backend is chosen by extension: `.svg` produces vector output,
//! anything else a bitmap. Points sit at bin centers (channel + 0.5) on an
//! axis spanning `[first, last + 1)`, so a boundary line drawn at channel
//! `c` falls on the edge between channels `c - 1` and `c`.

use std::fs;
use std::io;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use chanwatch_types::MetricPlot;

use crate::error::StoreError;

/// Fraction of the data span added above and below when the axis
/// autoscales.
const AUTOSCALE_MARGIN: f64 = 0.05;

/// Render a plot to an image file, replacing any existing file.
pub fn render_plot_file(plot: &MetricPlot, path: &str, size: (u32, u32)) -> Result<(), StoreError> {
    if path.ends_with(".svg") {
        // Draw into a buffer so file errors surface here as io errors.
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            draw_chart(plot, &root)?;
            root.present().map_err(draw_err)?;
        }
        fs::write(path, svg)?;
    } else {
        ensure_parent_exists(path)?;
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_chart(plot, &root)?;
        root.present().map_err(draw_err)?;
    }
    Ok(())
}

fn ensure_parent_exists(path: &str) -> Result<(), StoreError> {
    let parent = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        if !parent.exists() {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", parent.display()),
            )));
        }
    }
    Ok(())
}

/// Metric axis interval: the configured bounds when present, else the data
/// span with a small margin.
fn metric_axis(plot: &MetricPlot) -> (f64, f64) {
    match (plot.min, plot.max) {
        (Some(lo), Some(hi)) if lo < hi => (lo, hi),
        _ => match plot.value_range() {
            Some((lo, hi)) if lo < hi => {
                let margin = (hi - lo) * AUTOSCALE_MARGIN;
                (lo - margin, hi + margin)
            }
            Some((v, _)) => (v - 1.0, v + 1.0),
            None => (0.0, 1.0),
        },
    }
}

fn draw_chart<DB: DrawingBackend>(
    plot: &MetricPlot,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), StoreError> {
    root.fill(&WHITE).map_err(draw_err)?;

    let (y_lo, y_hi) = metric_axis(plot);
    let x_lo = f64::from(plot.first);
    let x_hi = f64::from(plot.last) + 1.0;

    let mut chart = ChartBuilder::on(root)
        .caption(&plot.title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(draw_err)?;

    let y_desc = if plot.metric_label.is_empty() {
        plot.units.clone()
    } else {
        plot.metric_label.clone()
    };
    chart
        .configure_mesh()
        .x_desc("Channel")
        .y_desc(y_desc)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .draw()
        .map_err(draw_err)?;

    // Boundary lines go in first so the data draws on top of them.
    for &line in &plot.lines {
        let x = f64::from(line);
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x, y_lo), (x, y_hi)],
                BLACK.mix(0.35),
            )))
            .map_err(draw_err)?;
    }

    let centers: Vec<(f64, f64)> = plot
        .points
        .iter()
        .map(|p| (f64::from(p.channel) + 0.5, p.value))
        .collect();
    chart
        .draw_series(LineSeries::new(centers.iter().copied(), &BLUE))
        .map_err(draw_err)?;
    chart
        .draw_series(
            centers
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, BLUE.filled())),
        )
        .map_err(draw_err)?;

    let bars: Vec<_> = plot
        .points
        .iter()
        .filter_map(|p| {
            p.error.map(|e| {
                let x = f64::from(p.channel) + 0.5;
                ErrorBar::new_vertical(x, p.value - e, p.value, p.value + e, BLUE.filled(), 6)
            })
        })
        .collect();
    if !bars.is_empty() {
        chart.draw_series(bars).map_err(draw_err)?;
    }

    Ok(())
}

fn draw_err<E: std::error::Error>(err: E) -> StoreError {
    StoreError::Draw(err.to_string())
}

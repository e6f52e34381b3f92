//! Six-panel SVG dashboard of the engagement summary.

use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::AnalysisError;
use crate::summary::EngagementSummary;

/// Number of equal-width bins in the pricing sentiment histogram.
pub const HISTOGRAM_BINS: usize = 20;

const CANVAS: (u32, u32) = (1500, 1200);
const SENTIMENT_RANGE: Range<f64> = -1.0..1.0;

/// One cell of the 2×3 grid, in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    ProductSentiment,
    DealSentiment,
    RequestFrequency,
    WeeklySentiment,
    PricingHistogram,
    ClusterSentiment,
}

impl Panel {
    pub const ALL: [Panel; 6] = [
        Panel::ProductSentiment,
        Panel::DealSentiment,
        Panel::RequestFrequency,
        Panel::WeeklySentiment,
        Panel::PricingHistogram,
        Panel::ClusterSentiment,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Panel::ProductSentiment => "Average Sentiment by Product",
            Panel::DealSentiment => "Average Sentiment by Deal",
            Panel::RequestFrequency => "Frequency of Customer Requests",
            Panel::WeeklySentiment => "Average Sentiment by Week",
            Panel::PricingHistogram => "Sentiment of Pricing Discussions",
            Panel::ClusterSentiment => "Average Sentiment by Product Cluster",
        }
    }
}

/// Panels that have data to draw. The rest are left blank.
#[must_use]
pub fn active_panels(summary: &EngagementSummary, pricing_sentiments: &[f64]) -> Vec<Panel> {
    Panel::ALL
        .into_iter()
        .filter(|panel| match panel {
            Panel::ProductSentiment => !summary.product_sentiment.is_empty(),
            Panel::DealSentiment => !summary.deal_sentiment.is_empty(),
            Panel::RequestFrequency => !summary.request_counts.is_empty(),
            Panel::WeeklySentiment => !summary.weekly_sentiment.is_empty(),
            Panel::PricingHistogram => !pricing_sentiments.is_empty(),
            Panel::ClusterSentiment => !summary.cluster_sentiment.is_empty(),
        })
        .collect()
}

/// Count values into [`HISTOGRAM_BINS`] equal bins over `[-1, 1]`.
///
/// Out-of-range values are clamped into the edge bins.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn histogram_bins(values: &[f64]) -> [usize; HISTOGRAM_BINS] {
    let mut bins = [0; HISTOGRAM_BINS];
    for value in values.iter().filter(|v| v.is_finite()) {
        let scaled = (value.clamp(-1.0, 1.0) + 1.0) / 2.0 * HISTOGRAM_BINS as f64;
        let idx = (scaled.floor() as usize).min(HISTOGRAM_BINS - 1);
        bins[idx] += 1;
    }
    bins
}

fn chart_err<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::Chart(e.to_string())
}

/// Render the dashboard to an SVG file at `path`.
///
/// # Errors
///
/// Returns [`AnalysisError::Chart`] if drawing or writing the file fails.
pub fn render_dashboard(
    path: &Path,
    summary: &EngagementSummary,
    pricing_sentiments: &[f64],
) -> Result<(), AnalysisError> {
    let root = SVGBackend::new(path, CANVAS).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let active = active_panels(summary, pricing_sentiments);
    let cells = root.split_evenly((2, 3));

    for (panel, cell) in Panel::ALL.into_iter().zip(&cells) {
        if !active.contains(&panel) {
            tracing::debug!(panel = panel.title(), "no data; skipping panel");
            continue;
        }
        match panel {
            Panel::ProductSentiment => {
                let bars = named_bars(&summary.product_sentiment);
                draw_bars(cell, panel.title(), "Sentiment Score", &bars, SENTIMENT_RANGE)?;
            }
            Panel::DealSentiment => {
                let bars = named_bars(&summary.deal_sentiment);
                draw_bars(cell, panel.title(), "Sentiment Score", &bars, SENTIMENT_RANGE)?;
            }
            Panel::RequestFrequency => {
                #[allow(clippy::cast_precision_loss)]
                let bars: Vec<(String, f64)> = summary
                    .request_counts
                    .iter()
                    .map(|(kind, count)| (kind.to_string(), *count as f64))
                    .collect();
                let top = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
                draw_bars(cell, panel.title(), "Count", &bars, 0.0..top + 1.0)?;
            }
            Panel::WeeklySentiment => draw_weekly(cell, summary)?,
            Panel::PricingHistogram => draw_histogram(cell, pricing_sentiments)?,
            Panel::ClusterSentiment => {
                let bars = named_bars(&summary.cluster_sentiment);
                draw_bars(cell, panel.title(), "Sentiment Score", &bars, SENTIMENT_RANGE)?;
            }
        }
    }

    root.present().map_err(chart_err)?;
    Ok(())
}

fn named_bars<'a, I>(values: I) -> Vec<(String, f64)>
where
    I: IntoIterator<Item = (&'a String, &'a f64)>,
{
    values.into_iter().map(|(k, v)| (k.clone(), *v)).collect()
}

fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    y_desc: &str,
    bars: &[(String, f64)],
    y_range: Range<f64>,
) -> Result<(), AnalysisError> {
    let n = u32::try_from(bars.len()).map_err(chart_err)?;
    let label_for = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| bars.get(i))
            .map(|(name, _)| name.clone())
            .unwrap_or_default(),
        _ => String::new(),
    };

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..n).into_segmented(), y_range)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&label_for)
        .y_desc(y_desc)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(bars.iter().zip(0u32..).map(|((_, value), i)| {
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), *value),
                ],
                BLUE.mix(0.6).filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))
        .map_err(chart_err)?;
    Ok(())
}

fn draw_weekly<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    summary: &EngagementSummary,
) -> Result<(), AnalysisError> {
    let points: Vec<(u32, f64)> = summary
        .weekly_sentiment
        .iter()
        .map(|w| (w.week, w.sentiment))
        .collect();
    let first = points.first().map_or(0, |p| p.0);
    let last = points.last().map_or(0, |p| p.0);

    let mut chart = ChartBuilder::on(area)
        .caption(Panel::WeeklySentiment.title(), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(first..last + 1, SENTIMENT_RANGE)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Week")
        .y_desc("Sentiment Score")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &GREEN))
        .map_err(chart_err)?;
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 4, GREEN.filled())))
        .map_err(chart_err)?;
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    values: &[f64],
) -> Result<(), AnalysisError> {
    let bins = histogram_bins(values);
    let top = bins.iter().copied().max().unwrap_or(0) as f64;
    let width = 2.0 / HISTOGRAM_BINS as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(Panel::PricingHistogram.title(), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(SENTIMENT_RANGE, 0.0..top + 1.0)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Sentiment Score")
        .y_desc("Count")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(bins.iter().enumerate().map(|(i, &count)| {
            let lo = -1.0 + i as f64 * width;
            Rectangle::new([(lo, 0.0), (lo + width, count as f64)], RED.mix(0.5).filled())
        }))
        .map_err(chart_err)?;
    Ok(())
}

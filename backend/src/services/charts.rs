//! Chart rendering and PNG export.
//!
//! Drawing goes through the [`ChartRenderer`] trait so the export code does
//! not care which library produced the pixels. [`LineChartRenderer`] draws
//! the occupied/available lines with plotters into an RGB buffer.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use log::info;
use plotters::prelude::*;

use crate::models::Area;
use crate::routes::analytics::{AnalyticsData, ChartSeries};
use crate::routes::export::{chart_filename, PNG_CONTENT_TYPE};
use crate::services::export::{ExportError, ExportFile, ExportResult};

const BACKGROUND: RGBColor = RGBColor(255, 255, 255);
const AXIS_COLOR: RGBColor = RGBColor(90, 90, 90);
const OCCUPIED_COLOR: RGBColor = RGBColor(220, 53, 69);
const AVAILABLE_COLOR: RGBColor = RGBColor(40, 167, 69);
const CHART_MARGIN_PX: u32 = 12;
const SERIES_LINE_WIDTH_PX: u32 = 2;

/// Raw RGB8 pixels of a rendered chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Draws the chart for one area.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, area: Area, series: &ChartSeries) -> ExportResult<RenderedChart>;
}

/// Two-line chart (Occupied, Available) over time.
#[derive(Debug, Clone, Copy)]
pub struct LineChartRenderer {
    width: u32,
    height: u32,
}

impl LineChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for LineChartRenderer {
    fn default() -> Self {
        Self::new(800, 400)
    }
}

fn render_error<E: std::fmt::Debug>(err: E) -> ExportError {
    ExportError::Render(format!("{:?}", err))
}

/// Horizontal extent of the series, widened so the range is never empty.
fn x_bounds(timestamps: &[i64]) -> (f64, f64) {
    match (timestamps.iter().min(), timestamps.iter().max()) {
        (Some(&lo), Some(&hi)) if lo < hi => (lo as f64, hi as f64),
        (Some(&only), _) => (only as f64 - 1.0, only as f64 + 1.0),
        _ => (0.0, 1.0),
    }
}

fn y_max(series: &ChartSeries) -> f64 {
    let peak = series
        .occupied_series
        .iter()
        .chain(series.available_series.iter())
        .copied()
        .max()
        .unwrap_or(0)
        .max(1);
    peak as f64 * 1.1
}

fn points(timestamps: &[i64], values: &[u64]) -> Vec<(f64, f64)> {
    timestamps
        .iter()
        .zip(values)
        .map(|(ts, v)| (*ts as f64, *v as f64))
        .collect()
}

impl ChartRenderer for LineChartRenderer {
    fn render(&self, area: Area, series: &ChartSeries) -> ExportResult<RenderedChart> {
        if self.width == 0 || self.height == 0 {
            return Err(ExportError::Render(format!(
                "chart for area {} has zero size {}x{}",
                area, self.width, self.height
            )));
        }

        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            root.fill(&BACKGROUND).map_err(render_error)?;

            let (x_lo, x_hi) = x_bounds(&series.timestamps);
            let y_hi = y_max(series);
            let mut chart = ChartBuilder::on(&root)
                .margin(CHART_MARGIN_PX)
                .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)
                .map_err(render_error)?;

            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x_lo, y_hi), (x_lo, 0.0), (x_hi, 0.0)],
                    AXIS_COLOR.stroke_width(1),
                )))
                .map_err(render_error)?;

            chart
                .draw_series(LineSeries::new(
                    points(&series.timestamps, &series.occupied_series),
                    OCCUPIED_COLOR.stroke_width(SERIES_LINE_WIDTH_PX),
                ))
                .map_err(render_error)?;

            chart
                .draw_series(LineSeries::new(
                    points(&series.timestamps, &series.available_series),
                    AVAILABLE_COLOR.stroke_width(SERIES_LINE_WIDTH_PX),
                ))
                .map_err(render_error)?;

            root.present().map_err(render_error)?;
        }

        Ok(RenderedChart {
            width: self.width,
            height: self.height,
            rgb: buffer,
        })
    }
}

/// Encode a rendered chart as PNG.
pub fn encode_png(chart: &RenderedChart) -> ExportResult<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        &chart.rgb,
        chart.width,
        chart.height,
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes)
}

/// Render and encode the chart of one area as `chart-area-<x>.png`.
pub fn chart_export(
    renderer: &dyn ChartRenderer,
    area: Area,
    series: &ChartSeries,
) -> ExportResult<ExportFile> {
    let chart = renderer.render(area, series)?;
    let png = encode_png(&chart)?;
    Ok(ExportFile::new(chart_filename(area), PNG_CONTENT_TYPE, png))
}

/// One PNG per area of `data`.
pub fn chart_exports(
    renderer: &dyn ChartRenderer,
    data: &AnalyticsData,
) -> ExportResult<Vec<ExportFile>> {
    let files = data
        .areas
        .iter()
        .map(|chart| chart_export(renderer, chart.area, &chart.series))
        .collect::<ExportResult<Vec<_>>>()?;
    info!("Rendered {} chart images for range {}", files.len(), data.range);
    Ok(files)
}

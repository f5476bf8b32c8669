//! Distribution and heatmap rendering with plotters.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{info, warn};

use crate::analysis::StatisticalAnalyzer;
use crate::dataset::{Column, Dataset};
use crate::error::VisualizationError;
use crate::quality::sample_std_dev;

/// Default cap on the number of distribution charts per run.
pub const DEFAULT_DISTRIBUTION_CHART_CAP: usize = 5;

/// Filename of the correlation heatmap artifact.
pub const HEATMAP_FILENAME: &str = "correlation_heatmap.png";

const DISTRIBUTION_SIZE: (u32, u32) = (1000, 600);
const HEATMAP_SIZE: (u32, u32) = (1200, 800);
const HISTOGRAM_BINS: usize = 20;

/// Number of evaluation points for the smoothed density overlay.
const DENSITY_POINTS: usize = 200;

/// Deterministic filename for a column's distribution chart.
pub fn distribution_filename(column: &str) -> String {
    format!("{}_distribution.png", column)
}

/// The set of image artifacts produced by one visualization run.
#[derive(Debug, Clone)]
pub struct VisualizationSet {
    /// Distribution chart paths, in column order.
    pub distributions: Vec<PathBuf>,
    /// Heatmap path; absent when the dataset has no numeric columns.
    pub heatmap: Option<PathBuf>,
}

impl VisualizationSet {
    /// Total number of images produced.
    pub fn len(&self) -> usize {
        self.distributions.len() + usize::from(self.heatmap.is_some())
    }

    /// True when no images were produced.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Renders distribution charts and the correlation heatmap.
#[derive(Debug, Clone)]
pub struct VisualizationGenerator {
    /// Maximum number of distribution charts per run.
    max_distribution_charts: usize,
}

impl VisualizationGenerator {
    /// Creates a generator with the given distribution-chart cap.
    pub fn new(max_distribution_charts: usize) -> Self {
        Self { max_distribution_charts }
    }

    /// Columns that will receive a distribution chart: the first
    /// `max_distribution_charts` numeric columns, in column order.
    pub fn distribution_targets<'a>(&self, dataset: &'a Dataset) -> Vec<&'a Column> {
        dataset
            .numeric_columns()
            .into_iter()
            .take(self.max_distribution_charts)
            .collect()
    }

    /// Renders all charts into `dir`, creating it if needed.
    ///
    /// A dataset without numeric columns yields an empty set: zero
    /// distribution charts and no heatmap, without failing. Any single
    /// chart failure aborts with [`VisualizationError::ChartRender`]
    /// naming the offending column.
    pub fn render(
        &self,
        dataset: &Dataset,
        dir: &Path,
    ) -> Result<VisualizationSet, VisualizationError> {
        std::fs::create_dir_all(dir).map_err(|e| VisualizationError::DirectoryCreate {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let targets = self.distribution_targets(dataset);
        if dataset.numeric_columns().is_empty() {
            warn!("No numeric columns; skipping all visualizations");
            return Ok(VisualizationSet { distributions: Vec::new(), heatmap: None });
        }

        let mut distributions = Vec::with_capacity(targets.len());
        for column in targets {
            let path = dir.join(distribution_filename(&column.name));
            draw_distribution(column, &path).map_err(|e| VisualizationError::ChartRender {
                column: column.name.clone(),
                reason: e.to_string(),
            })?;
            info!(path = %path.display(), "Rendered distribution chart");
            distributions.push(path);
        }

        let heatmap_path = dir.join(HEATMAP_FILENAME);
        draw_heatmap(dataset, &heatmap_path).map_err(|e| VisualizationError::ChartRender {
            column: "correlation_heatmap".to_string(),
            reason: e.to_string(),
        })?;
        info!(path = %heatmap_path.display(), "Rendered correlation heatmap");

        Ok(VisualizationSet {
            distributions,
            heatmap: Some(heatmap_path),
        })
    }
}

impl Default for VisualizationGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_DISTRIBUTION_CHART_CAP)
    }
}

/// Histogram with a Gaussian-kernel density overlay.
fn draw_distribution(column: &Column, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let values = column.numbers();
    let (mut lo, mut hi) = bounds(&values);
    if lo == hi {
        // Zero-variance column: widen the window so bins have width.
        lo -= 0.5;
        hi += 0.5;
    }
    let bin_width = (hi - lo) / HISTOGRAM_BINS as f64;

    let mut bins = vec![0usize; HISTOGRAM_BINS];
    for v in &values {
        let index = (((v - lo) / bin_width) as usize).min(HISTOGRAM_BINS - 1);
        bins[index] += 1;
    }
    let max_count = bins.iter().copied().max().unwrap_or(1).max(1);

    let root = BitMapBackend::new(path, DISTRIBUTION_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Distribution of {}", column.name), ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..(max_count as f64 * 1.1))?;
    chart
        .configure_mesh()
        .x_desc(column.name.clone())
        .y_desc("count")
        .draw()?;

    chart.draw_series(bins.iter().enumerate().map(|(i, &count)| {
        let x0 = lo + i as f64 * bin_width;
        let x1 = x0 + bin_width;
        Rectangle::new([(x0, 0.0), (x1, count as f64)], BLUE.mix(0.4).filled())
    }))?;

    // Smoothed density, rescaled to the count axis.
    let overlay = density_overlay(&values, lo, hi, bin_width);
    chart.draw_series(LineSeries::new(overlay, RED.stroke_width(2)))?;

    root.present()?;
    Ok(())
}

/// Gaussian kernel density estimate evaluated across the chart window,
/// scaled so it overlays the histogram counts.
fn density_overlay(values: &[f64], lo: f64, hi: f64, bin_width: f64) -> Vec<(f64, f64)> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let std_dev = sample_std_dev(values);
    // Silverman's rule of thumb; fall back to the bin width for
    // zero-variance data.
    let bandwidth = if std_dev > 0.0 {
        1.06 * std_dev * (n as f64).powf(-0.2)
    } else {
        bin_width
    };

    let norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * bandwidth * n as f64);
    (0..=DENSITY_POINTS)
        .map(|i| {
            let x = lo + (hi - lo) * i as f64 / DENSITY_POINTS as f64;
            let density: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            (x, density * n as f64 * bin_width)
        })
        .collect()
}

/// Correlation heatmap annotated with numeric values.
fn draw_heatmap(dataset: &Dataset, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let section = StatisticalAnalyzer::analyze(dataset)?;
    let names = &section.correlation_columns;
    let n = names.len();

    let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Heatmap", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(120)
        .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)?;

    let x_names = names.clone();
    // Rows are drawn top-down, so the y axis reads in reverse.
    let y_names: Vec<String> = names.iter().rev().cloned().collect();
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&move |v| label_for(&x_names, *v))
        .y_label_formatter(&move |v| label_for(&y_names, *v))
        .draw()?;

    for row in 0..n {
        for col in 0..n {
            let value = section.correlation[(row, col)];
            let cell = Rectangle::new(
                [
                    (col as f64, (n - 1 - row) as f64),
                    (col as f64 + 1.0, (n - row) as f64),
                ],
                correlation_color(value).filled(),
            );
            chart.draw_series(std::iter::once(cell))?;

            let annotation = Text::new(
                format!("{:.2}", value),
                (col as f64 + 0.5, (n - 1 - row) as f64 + 0.5),
                ("sans-serif", 18).into_font().color(&BLACK),
            );
            chart.draw_series(std::iter::once(annotation))?;
        }
    }

    root.present()?;
    Ok(())
}

/// Column label for an axis position.
fn label_for(names: &[String], position: f64) -> String {
    names.get(position.floor() as usize).cloned().unwrap_or_default()
}

/// Blue (negative) through white (zero) to red (positive).
fn correlation_color(value: f64) -> RGBColor {
    let v = value.clamp(-1.0, 1.0);
    if v >= 0.0 {
        let t = v;
        RGBColor(255, (255.0 * (1.0 - t)) as u8, (255.0 * (1.0 - t)) as u8)
    } else {
        let t = -v;
        RGBColor((255.0 * (1.0 - t)) as u8, (255.0 * (1.0 - t)) as u8, 255)
    }
}

/// Min and max of a slice, with a degenerate default for empty input.
fn bounds(values: &[f64]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(*v);
        hi = hi.max(*v);
    }
    if values.is_empty() {
        (0.0, 1.0)
    } else {
        (lo, hi)
    }
}

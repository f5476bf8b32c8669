//! Descriptive statistics and correlation analysis over numeric columns.

use std::fmt::Write as _;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::error::AnalysisError;
use crate::quality::{mean, sample_std_dev};

use super::insights::InsightsArtifact;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Column name.
    pub name: String,
    /// Number of present (non-missing) values.
    pub count: usize,
    /// Arithmetic mean of present values.
    pub mean: f64,
    /// Sample standard deviation of present values.
    pub std_dev: f64,
    /// Minimum.
    pub min: f64,
    /// 25% quartile (linear interpolation).
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// 75% quartile (linear interpolation).
    pub q3: f64,
    /// Maximum.
    pub max: f64,
}

/// The output of statistical analysis: per-column descriptive statistics
/// and the pairwise Pearson correlation matrix.
#[derive(Debug, Clone)]
pub struct StatsSection {
    /// Per-column statistics, in column order.
    pub columns: Vec<ColumnStats>,
    /// Names of the correlated columns, in matrix order.
    pub correlation_columns: Vec<String>,
    /// Pairwise Pearson correlations; square, symmetric, unit diagonal.
    pub correlation: Array2<f64>,
}

impl StatsSection {
    /// An empty, well-formed section for datasets without numeric columns.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            correlation_columns: Vec::new(),
            correlation: Array2::zeros((0, 0)),
        }
    }

    /// True when the dataset had no numeric columns to analyze.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Renders the section appended to the insights artifact.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "Statistical Analysis");
        let _ = writeln!(out, "====================");
        let _ = writeln!(out);

        if self.is_empty() {
            let _ = writeln!(out, "No numeric columns found.");
            return out;
        }

        let _ = writeln!(out, "Descriptive statistics:");
        let _ = writeln!(
            out,
            "{:<20} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        );
        for stats in &self.columns {
            let _ = writeln!(
                out,
                "{:<20} {:>7} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                stats.name,
                stats.count,
                stats.mean,
                stats.std_dev,
                stats.min,
                stats.q1,
                stats.median,
                stats.q3,
                stats.max
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Correlation matrix:");
        let _ = write!(out, "{:<20}", "");
        for name in &self.correlation_columns {
            let _ = write!(out, " {:>12}", truncate(name, 12));
        }
        let _ = writeln!(out);
        for (row, name) in self.correlation_columns.iter().enumerate() {
            let _ = write!(out, "{:<20}", truncate(name, 20));
            for column in 0..self.correlation_columns.len() {
                let _ = write!(out, " {:>12.4}", self.correlation[(row, column)]);
            }
            let _ = writeln!(out);
        }
        out
    }
}

/// Computes descriptive statistics and correlations for numeric columns.
pub struct StatisticalAnalyzer;

impl StatisticalAnalyzer {
    /// Analyzes all numeric columns of the dataset.
    ///
    /// The result is deterministic: re-running on an unchanged dataset
    /// yields identical statistics and correlation values.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NoNumericColumns`] when the dataset has no
    /// numeric columns.
    pub fn analyze(dataset: &Dataset) -> Result<StatsSection, AnalysisError> {
        let numeric = dataset.numeric_columns();
        if numeric.is_empty() {
            return Err(AnalysisError::NoNumericColumns);
        }

        let columns: Vec<ColumnStats> = numeric
            .iter()
            .map(|column| {
                let mut values = column.numbers();
                values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                ColumnStats {
                    name: column.name.clone(),
                    count: values.len(),
                    mean: mean(&values),
                    std_dev: sample_std_dev(&values),
                    min: values.first().copied().unwrap_or(f64::NAN),
                    q1: quantile(&values, 0.25),
                    median: quantile(&values, 0.5),
                    q3: quantile(&values, 0.75),
                    max: values.last().copied().unwrap_or(f64::NAN),
                }
            })
            .collect();

        let names: Vec<String> = numeric.iter().map(|c| c.name.clone()).collect();
        let series: Vec<Vec<f64>> = numeric.iter().map(|c| paired_series(c)).collect();
        let n = numeric.len();
        let mut correlation = Array2::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                correlation[(i, j)] = if i == j {
                    1.0
                } else {
                    pearson(&series[i], &series[j])
                };
            }
        }

        info!(columns = n, "Statistical analysis complete");
        Ok(StatsSection {
            columns,
            correlation_columns: names,
            correlation,
        })
    }

    /// Analyzes the dataset and appends the rendered section to the shared
    /// insights artifact. A dataset without numeric columns degrades to an
    /// empty, well-formed section instead of failing the pipeline.
    pub async fn analyze_and_record(
        dataset: &Dataset,
        artifact: &InsightsArtifact,
    ) -> Result<StatsSection, AnalysisError> {
        let section = match Self::analyze(dataset) {
            Ok(section) => section,
            Err(AnalysisError::NoNumericColumns) => {
                warn!("No numeric columns; recording empty statistical section");
                StatsSection::empty()
            }
            Err(e) => return Err(e),
        };
        artifact.append(&section.render_text()).await?;
        Ok(section)
    }
}

/// Values aligned by row for correlation: missing cells become the column
/// mean so every column contributes a same-length series.
fn paired_series(column: &crate::dataset::Column) -> Vec<f64> {
    let present = column.numbers();
    let fill = mean(&present);
    column
        .values
        .iter()
        .map(|v| v.as_number().unwrap_or(fill))
        .collect()
}

/// Linear-interpolation quantile over an already-sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Pearson correlation; zero-variance pairs are defined as 0.0 so the
/// matrix stays printable and deterministic.
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let mean_a = mean(&a[..n]);
    let mean_b = mean(&b[..n]);
    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for i in 0..n {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        covariance += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    let denominator = (var_a * var_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    covariance / denominator
}

/// First `max` characters of a name, cut on a char boundary so multibyte
/// column names never split mid-character.
fn truncate(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(i, _)| &s[..i])
}

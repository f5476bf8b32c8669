//! Weighted quality scoring over a tabular dataset.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::Dataset;
use crate::error::QualityError;

use super::metrics::column_sigma_in_range_ratio;

/// Maximum points per sub-score.
pub const SUB_SCORE_MAX: f64 = 25.0;

/// Maximum composite score (unweighted sum of the four sub-scores).
pub const COMPOSITE_MAX: f64 = 100.0;

/// Filename of the quality artifact.
pub const QUALITY_ARTIFACT_NAME: &str = "quality_assessment.txt";

// Completeness term weights (sum to SUB_SCORE_MAX).
const NON_MISSING_WEIGHT: f64 = 10.0;
const COMPLETE_ROWS_WEIGHT: f64 = 5.0;
const KEY_FIELDS_WEIGHT: f64 = 5.0;
const REQUIRED_FIELDS_WEIGHT: f64 = 5.0;

/// Number of leading columns treated as identifier-like "key fields".
const KEY_FIELD_COUNT: usize = 2;

// Consistency and accuracy term weights.
const NUMERIC_RATIO_WEIGHT: f64 = 7.0;
const SIGMA_RATIO_WEIGHT: f64 = 6.0;
const VALID_VALUES_WEIGHT: f64 = 7.0;

// Uniqueness term weights.
const DUPLICATE_WEIGHT: f64 = 7.0;
const DISTINCT_WEIGHT: f64 = 6.0;
const ID_INTEGRITY_POINTS: f64 = 6.0;

// Fixed baselines standing in for checks the scoring model does not
// implement (cross-field/temporal consistency, distribution/business
// rules, referential integrity). Placeholders, not real checks.
const CROSS_FIELD_BASELINE: f64 = 12.0;
const DISTRIBUTION_BASELINE: f64 = 12.0;
const REFERENTIAL_BASELINE: f64 = 6.0;

/// Conventional name of the identifier column, when present.
const ID_COLUMN: &str = "Id";

/// Per-column metadata captured alongside the scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,
    /// Inferred type label ("numeric" or "text").
    pub dtype: String,
    /// Number of missing cells.
    pub missing_count: usize,
    /// Number of distinct non-missing values.
    pub distinct_count: usize,
}

/// Dataset-level metadata captured alongside the scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityMetadata {
    /// Total row count.
    pub total_rows: usize,
    /// Number of exact duplicate rows.
    pub duplicate_rows: usize,
    /// Per-column metadata, in column order.
    pub columns: Vec<ColumnMetadata>,
}

/// The result of quality assessment: four bounded sub-scores, the
/// composite, and a metadata block. Created once per run, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Completeness sub-score, in [0, 25].
    pub completeness: f64,
    /// Consistency sub-score, in [0, 25].
    pub consistency: f64,
    /// Accuracy sub-score, in [0, 25].
    pub accuracy: f64,
    /// Uniqueness sub-score, in [0, 25].
    pub uniqueness: f64,
    /// Composite score: unweighted sum of the sub-scores, in [0, 100].
    pub composite: f64,
    /// Dataset metadata.
    pub metadata: QualityMetadata,
}

impl QualityReport {
    /// Renders the human-readable text form written to the quality artifact.
    ///
    /// The format is for humans, not for machine re-parsing.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Data Quality Assessment");
        let _ = writeln!(out, "=======================");
        let _ = writeln!(out);
        let _ = writeln!(out, "Quality Scores:");
        let _ = writeln!(out, "Completeness: {:.2}/{:.0}", self.completeness, SUB_SCORE_MAX);
        let _ = writeln!(out, "Consistency: {:.2}/{:.0}", self.consistency, SUB_SCORE_MAX);
        let _ = writeln!(out, "Accuracy: {:.2}/{:.0}", self.accuracy, SUB_SCORE_MAX);
        let _ = writeln!(out, "Uniqueness: {:.2}/{:.0}", self.uniqueness, SUB_SCORE_MAX);
        let _ = writeln!(out);
        let _ = writeln!(out, "Total Score: {:.2}/{:.0}", self.composite, COMPOSITE_MAX);
        let _ = writeln!(out);
        let _ = writeln!(out, "Detailed Metrics:");
        let _ = writeln!(out, "total_rows: {}", self.metadata.total_rows);
        let _ = writeln!(out, "duplicate_rows: {}", self.metadata.duplicate_rows);
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<24} {:<8} {:>8} {:>9}", "column", "dtype", "missing", "distinct");
        for column in &self.metadata.columns {
            let _ = writeln!(
                out,
                "{:<24} {:<8} {:>8} {:>9}",
                column.name, column.dtype, column.missing_count, column.distinct_count
            );
        }
        out
    }
}

/// Computes the four weighted sub-scores and the composite.
///
/// The scorer is pure over the dataset; writing the text artifact is a
/// separate step so the orchestrator controls where artifacts land.
#[derive(Debug, Clone)]
pub struct QualityScorer {
    /// Ratio for the "required fields present" completeness term.
    ///
    /// The scoring model has no required-field schema yet, so this ratio is
    /// 1.0 unless callers supply one; the weight stays in the formula so the
    /// term is configurable rather than hard-wired.
    required_fields_ratio: f64,
}

impl QualityScorer {
    /// Creates a scorer with the default required-fields ratio of 1.0.
    pub fn new() -> Self {
        Self { required_fields_ratio: 1.0 }
    }

    /// Overrides the required-fields ratio (clamped to [0, 1]).
    pub fn with_required_fields_ratio(mut self, ratio: f64) -> Self {
        self.required_fields_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Assesses dataset quality, producing the four sub-scores, the
    /// composite, and the metadata block.
    pub fn assess(&self, dataset: &Dataset) -> QualityReport {
        let completeness = self.completeness_score(dataset);
        let consistency = self.consistency_score(dataset);
        let accuracy = self.accuracy_score(dataset);
        let uniqueness = self.uniqueness_score(dataset);
        let composite = completeness + consistency + accuracy + uniqueness;

        let metadata = QualityMetadata {
            total_rows: dataset.row_count(),
            duplicate_rows: dataset.duplicate_row_count(),
            columns: dataset
                .columns()
                .iter()
                .map(|c| ColumnMetadata {
                    name: c.name.clone(),
                    dtype: c.dtype.label().to_string(),
                    missing_count: c.missing_count(),
                    distinct_count: c.distinct_count(),
                })
                .collect(),
        };

        info!(
            completeness = format!("{:.2}", completeness),
            consistency = format!("{:.2}", consistency),
            accuracy = format!("{:.2}", accuracy),
            uniqueness = format!("{:.2}", uniqueness),
            composite = format!("{:.2}", composite),
            "Quality assessment complete"
        );

        QualityReport {
            completeness,
            consistency,
            accuracy,
            uniqueness,
            composite,
            metadata,
        }
    }

    /// Writes the text rendering of a report into `dir`, creating the
    /// directory if needed. Returns the artifact path.
    pub fn write_artifact(report: &QualityReport, dir: &Path) -> Result<PathBuf, QualityError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(QUALITY_ARTIFACT_NAME);
        std::fs::write(&path, report.render_text()).map_err(|e| QualityError::ArtifactWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;
        info!(path = %path.display(), "Wrote quality artifact");
        Ok(path)
    }

    /// Completeness: non-missing cells, fully-populated rows, key-field
    /// coverage and required-field presence.
    fn completeness_score(&self, dataset: &Dataset) -> f64 {
        let total_cells = dataset.cell_count() as f64;
        let missing_cells: usize = dataset.columns().iter().map(|c| c.missing_count()).sum();
        let non_missing_ratio = 1.0 - missing_cells as f64 / total_cells;

        let complete_rows = (0..dataset.row_count())
            .filter(|&row| dataset.row_is_complete(row))
            .count();
        let complete_rows_ratio = complete_rows as f64 / dataset.row_count() as f64;

        let key_fields: Vec<_> = dataset.columns().iter().take(KEY_FIELD_COUNT).collect();
        let key_cells = (key_fields.len() * dataset.row_count()) as f64;
        let key_missing: usize = key_fields.iter().map(|c| c.missing_count()).sum();
        let key_ratio = 1.0 - key_missing as f64 / key_cells;

        let score = non_missing_ratio * NON_MISSING_WEIGHT
            + complete_rows_ratio * COMPLETE_ROWS_WEIGHT
            + key_ratio * KEY_FIELDS_WEIGHT
            + self.required_fields_ratio * REQUIRED_FIELDS_WEIGHT;
        score.clamp(0.0, SUB_SCORE_MAX)
    }

    /// Consistency: numeric-column ratio, sigma in-range ratio and the
    /// cross-field/temporal baseline.
    fn consistency_score(&self, dataset: &Dataset) -> f64 {
        let numeric = dataset.numeric_columns();
        let numeric_ratio = numeric.len() as f64 / dataset.column_count() as f64;

        let sigma_ratio = mean_sigma_ratio(&numeric);

        let score = numeric_ratio * NUMERIC_RATIO_WEIGHT
            + sigma_ratio * SIGMA_RATIO_WEIGHT
            + CROSS_FIELD_BASELINE;
        score.clamp(0.0, SUB_SCORE_MAX)
    }

    /// Accuracy: per-numeric-column valid-value ratio, sigma in-range ratio
    /// and the distribution/business-rule baseline.
    fn accuracy_score(&self, dataset: &Dataset) -> f64 {
        let numeric = dataset.numeric_columns();

        let valid_ratio = if numeric.is_empty() {
            0.0
        } else {
            numeric
                .iter()
                .map(|c| c.present_count() as f64 / c.values.len() as f64)
                .sum::<f64>()
                / numeric.len() as f64
        };

        let sigma_ratio = mean_sigma_ratio(&numeric);

        let score = valid_ratio * VALID_VALUES_WEIGHT
            + sigma_ratio * SIGMA_RATIO_WEIGHT
            + DISTRIBUTION_BASELINE;
        score.clamp(0.0, SUB_SCORE_MAX)
    }

    /// Uniqueness: duplicate-row ratio, distinct-value ratios, identifier
    /// integrity and the referential-integrity baseline.
    fn uniqueness_score(&self, dataset: &Dataset) -> f64 {
        let rows = dataset.row_count() as f64;
        let duplicate_ratio = dataset.duplicate_row_count() as f64 / rows;

        let distinct_ratio = dataset
            .columns()
            .iter()
            .map(|c| c.distinct_count() as f64 / rows)
            .sum::<f64>()
            / dataset.column_count() as f64;

        let id_points = match dataset.column(ID_COLUMN) {
            Some(id) if id.distinct_count() == dataset.row_count() => ID_INTEGRITY_POINTS,
            Some(_) => 0.0,
            None => 0.0,
        };

        let score = (1.0 - duplicate_ratio) * DUPLICATE_WEIGHT
            + distinct_ratio * DISTINCT_WEIGHT
            + id_points
            + REFERENTIAL_BASELINE;
        score.clamp(0.0, SUB_SCORE_MAX)
    }
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean in-range ratio across numeric columns, or 0.0 when none exist.
fn mean_sigma_ratio(numeric: &[&crate::dataset::Column]) -> f64 {
    if numeric.is_empty() {
        return 0.0;
    }
    numeric
        .iter()
        .map(|c| column_sigma_in_range_ratio(c))
        .sum::<f64>()
        / numeric.len() as f64
}

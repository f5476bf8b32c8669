//! Data quality scoring.
//!
//! Computes four weighted sub-scores (completeness, consistency, accuracy,
//! uniqueness) over a tabular dataset, each capped at 25 points, and a
//! composite total in [0, 100]. The composite is the gating signal the
//! pipeline uses to decide whether downstream analysis proceeds.

mod metrics;
mod scorer;

pub use metrics::{column_sigma_in_range_ratio, mean, sample_std_dev};
pub use scorer::{
    ColumnMetadata, QualityMetadata, QualityReport, QualityScorer, COMPOSITE_MAX,
    QUALITY_ARTIFACT_NAME, SUB_SCORE_MAX,
};

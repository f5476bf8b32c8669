//! Statistical and structural dataset analysis.
//!
//! Both analyzers append their findings to a shared, append-only insights
//! artifact. They have no data dependency on each other and the pipeline
//! runs them concurrently; appends are serialized behind the artifact's
//! lock, so section order between the two is not deterministic.

mod descriptive;
mod insights;
mod structure;

pub use descriptive::{ColumnStats, StatisticalAnalyzer, StatsSection};
pub use insights::{InsightsArtifact, INSIGHTS_ARTIFACT_NAME};
pub use structure::{ColumnFrequencies, FrequencyEntry, StructuralAnalyzer, StructureSection};

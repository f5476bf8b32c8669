//! datasight: Dataset quality assessment and analysis pipeline.
//!
//! This library scores tabular datasets on quality, runs statistical and
//! structural analysis, renders charts, and assembles a PDF report.

// Core modules
pub mod acquire;
pub mod analysis;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod visualization;

// Re-export commonly used error types
pub use error::{
    AcquireError, AnalysisError, DataError, QualityError, ReportError, VisualizationError,
};

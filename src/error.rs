//! Error types for datasight operations.
//!
//! Defines error types for all major subsystems:
//! - Dataset loading and parsing
//! - Quality scoring
//! - Statistical and structural analysis
//! - Visualization rendering
//! - Report assembly
//! - Dataset acquisition and file discovery

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to load dataset from '{path}': {message}")]
    Load { path: PathBuf, message: String },

    #[error("Dataset at '{path}' is empty: {rows} rows, {columns} columns")]
    EmptyDataset {
        path: PathBuf,
        rows: usize,
        columns: usize,
    },

    #[error("Row {row} has {actual} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during quality assessment.
#[derive(Debug, Error)]
pub enum QualityError {
    #[error("Quality assessment failed: {0}")]
    Data(#[from] DataError),

    #[error("Failed to write quality artifact '{path}': {message}")]
    ArtifactWrite { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during statistical or structural analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Dataset has no numeric columns")]
    NoNumericColumns,

    #[error("Failed to append to insights artifact '{path}': {message}")]
    ArtifactAppend { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while rendering visualizations.
#[derive(Debug, Error)]
pub enum VisualizationError {
    #[error("Failed to render chart for column '{column}': {reason}")]
    ChartRender { column: String, reason: String },

    #[error("Failed to create visualizations directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during report assembly.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No usable font family found for PDF rendering: {0}")]
    FontLoad(String),

    #[error("Failed to embed image '{path}': {reason}")]
    ImageEmbed { path: PathBuf, reason: String },

    #[error("Failed to render report to '{path}': {reason}")]
    Render { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while acquiring a dataset or discovering files.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("git clone of '{url}' failed: {stderr}")]
    CloneFailed { url: String, stderr: String },

    #[error("Dataset path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

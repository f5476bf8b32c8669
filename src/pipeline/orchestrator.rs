//! Pipeline orchestrator for coordinating dataset analysis.
//!
//! This module provides the main `PipelineOrchestrator` that drives the
//! stages in order:
//! - Dataset acquisition checks
//! - Quality assessment and the quality gate
//! - Statistical and structural analysis
//! - Chart rendering
//! - Report assembly

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::analysis::{InsightsArtifact, StatisticalAnalyzer, StructuralAnalyzer};
use crate::dataset::Dataset;
use crate::error::{
    AcquireError, AnalysisError, DataError, QualityError, ReportError, VisualizationError,
};
use crate::quality::QualityScorer;
use crate::report::ReportAssembler;
use crate::visualization::VisualizationGenerator;

use super::config::PipelineConfig;
use super::layout::ArtifactLayout;

/// Errors that can occur during pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    /// Dataset acquisition error.
    #[error("Acquisition error: {0}")]
    Acquire(#[from] AcquireError),

    /// Dataset loading error.
    #[error("Dataset error: {0}")]
    Data(#[from] DataError),

    /// Quality assessment error.
    #[error("Quality error: {0}")]
    Quality(#[from] QualityError),

    /// Analysis error.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Visualization error.
    #[error("Visualization error: {0}")]
    Visualization(#[from] VisualizationError),

    /// Report assembly error.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// The stages the pipeline moves through, in order.
///
/// `Done` is reached either by completing all stages or by the quality
/// gate stopping the run after assessment. `Failed` is terminal for any
/// stage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Verifying the dataset is present on disk.
    Acquire,
    /// Scoring quality and applying the gate.
    AssessQuality,
    /// Running the statistical and structural analyzers.
    Analyze,
    /// Rendering distribution charts and the correlation heatmap.
    Visualize,
    /// Assembling the PDF report.
    Report,
    /// Terminal success state.
    Done,
    /// Terminal failure state.
    Failed,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Acquire => write!(f, "acquire"),
            PipelineStage::AssessQuality => write!(f, "assess_quality"),
            PipelineStage::Analyze => write!(f, "analyze"),
            PipelineStage::Visualize => write!(f, "visualize"),
            PipelineStage::Report => write!(f, "report"),
            PipelineStage::Done => write!(f, "done"),
            PipelineStage::Failed => write!(f, "failed"),
        }
    }
}

/// Timing record for a completed stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    /// The stage that completed.
    pub stage: PipelineStage,
    /// Wall-clock duration of the stage in milliseconds.
    pub duration_ms: u64,
}

impl StageRecord {
    fn new(stage: PipelineStage, elapsed: Duration) -> Self {
        Self {
            stage,
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Summary of a full pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Path of the analyzed dataset.
    pub dataset_path: PathBuf,
    /// Terminal stage of the run.
    pub final_stage: PipelineStage,
    /// Composite quality score, in [0, 100].
    pub quality_score: f64,
    /// Whether the composite score cleared the configured gate.
    pub quality_passed: bool,
    /// Number of chart images rendered.
    pub chart_count: usize,
    /// Path of the assembled PDF report, when one was produced.
    pub report_path: Option<PathBuf>,
    /// Per-stage timing records, in execution order.
    pub stages: Vec<StageRecord>,
}

/// Drives a dataset through every pipeline stage.
pub struct PipelineOrchestrator {
    config: PipelineConfig,
}

impl PipelineOrchestrator {
    /// Creates a new orchestrator with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Config` if the configuration is invalid.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Gets the current configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the full pipeline against the dataset at `dataset_path`.
    ///
    /// All artifacts are written into subdirectories of the dataset's
    /// containing directory. A dataset that fails the quality gate still
    /// yields `Ok`: the summary records `quality_passed = false` and the
    /// downstream stages are skipped.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError` naming the failing stage's subsystem.
    pub async fn run(&self, dataset_path: &Path) -> Result<RunSummary, PipelineError> {
        match self.run_stages(dataset_path).await {
            Ok(summary) => {
                info!(
                    stage = %summary.final_stage,
                    quality_score = summary.quality_score,
                    charts = summary.chart_count,
                    "Pipeline finished"
                );
                Ok(summary)
            }
            Err(e) => {
                error!(stage = %PipelineStage::Failed, error = %e, "Pipeline failed");
                Err(e)
            }
        }
    }

    async fn run_stages(&self, dataset_path: &Path) -> Result<RunSummary, PipelineError> {
        let layout = ArtifactLayout::for_dataset(dataset_path);
        let mut stages = Vec::new();

        // Acquire: the dataset must already be on disk.
        let started = Instant::now();
        info!(stage = %PipelineStage::Acquire, path = %dataset_path.display(), "Entering stage");
        if !dataset_path.exists() {
            return Err(AcquireError::PathNotFound(dataset_path.to_path_buf()).into());
        }
        stages.push(StageRecord::new(PipelineStage::Acquire, started.elapsed()));

        // Assess quality and apply the gate.
        let started = Instant::now();
        info!(stage = %PipelineStage::AssessQuality, "Entering stage");
        let dataset = Dataset::from_csv_path(dataset_path)?;
        let scorer =
            QualityScorer::new().with_required_fields_ratio(self.config.required_fields_ratio);
        let report = scorer.assess(&dataset);
        QualityScorer::write_artifact(&report, &layout.quality_dir())?;
        stages.push(StageRecord::new(
            PipelineStage::AssessQuality,
            started.elapsed(),
        ));

        if report.composite < self.config.min_quality_score {
            warn!(
                score = report.composite,
                threshold = self.config.min_quality_score,
                "Quality gate rejected dataset; skipping analysis"
            );
            return Ok(RunSummary {
                dataset_path: dataset_path.to_path_buf(),
                final_stage: PipelineStage::Done,
                quality_score: report.composite,
                quality_passed: false,
                chart_count: 0,
                report_path: None,
                stages,
            });
        }

        // Analyze: both analyzers share one insights artifact.
        let started = Instant::now();
        info!(stage = %PipelineStage::Analyze, "Entering stage");
        let insights = InsightsArtifact::new(&layout.insights_dir());
        if self.config.concurrent_analyzers {
            let (stats, structure) = tokio::join!(
                StatisticalAnalyzer::analyze_and_record(&dataset, &insights),
                StructuralAnalyzer::analyze_and_record(&dataset, &insights),
            );
            stats?;
            structure?;
        } else {
            StatisticalAnalyzer::analyze_and_record(&dataset, &insights).await?;
            StructuralAnalyzer::analyze_and_record(&dataset, &insights).await?;
        }
        stages.push(StageRecord::new(PipelineStage::Analyze, started.elapsed()));

        // Visualize.
        let started = Instant::now();
        info!(stage = %PipelineStage::Visualize, "Entering stage");
        let charts = VisualizationGenerator::new(self.config.max_distribution_charts)
            .render(&dataset, &layout.visualizations_dir())?;
        stages.push(StageRecord::new(
            PipelineStage::Visualize,
            started.elapsed(),
        ));

        // Report.
        let started = Instant::now();
        info!(stage = %PipelineStage::Report, "Entering stage");
        let report_path = ReportAssembler::new().build(
            &layout.quality_artifact_path(),
            insights.path(),
            &layout.visualizations_dir(),
            &layout.output_dir(),
        )?;
        stages.push(StageRecord::new(PipelineStage::Report, started.elapsed()));

        Ok(RunSummary {
            dataset_path: dataset_path.to_path_buf(),
            final_stage: PipelineStage::Done,
            quality_score: report.composite,
            quality_passed: true,
            chart_count: charts.len(),
            report_path: Some(report_path),
            stages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_iris_like_csv(dir: &Path) -> PathBuf {
        let path = dir.join("flowers.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Id,petal_length,petal_width,species").unwrap();
        for i in 0..60 {
            writeln!(
                file,
                "{},{:.1},{:.1},{}",
                i + 1,
                1.0 + (i % 7) as f64 * 0.3,
                0.2 + (i % 5) as f64 * 0.2,
                if i % 2 == 0 { "setosa" } else { "virginica" }
            )
            .unwrap();
        }
        path
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(format!("{}", PipelineStage::Acquire), "acquire");
        assert_eq!(format!("{}", PipelineStage::AssessQuality), "assess_quality");
        assert_eq!(format!("{}", PipelineStage::Analyze), "analyze");
        assert_eq!(format!("{}", PipelineStage::Visualize), "visualize");
        assert_eq!(format!("{}", PipelineStage::Report), "report");
        assert_eq!(format!("{}", PipelineStage::Done), "done");
        assert_eq!(format!("{}", PipelineStage::Failed), "failed");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = PipelineConfig::default().with_min_quality_score(500.0);
        let result = PipelineOrchestrator::new(config);
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[tokio::test]
    async fn test_run_missing_dataset_is_acquire_error() {
        let orchestrator = PipelineOrchestrator::new(PipelineConfig::default()).unwrap();
        let result = orchestrator.run(Path::new("/nonexistent/dataset.csv")).await;
        assert!(matches!(result, Err(PipelineError::Acquire(_))));
    }

    #[tokio::test]
    async fn test_quality_gate_stops_run() {
        let dir = tempfile::TempDir::new().unwrap();
        let dataset_path = write_iris_like_csv(dir.path());

        // An unreachable threshold forces the gate to reject.
        let config = PipelineConfig::default().with_min_quality_score(100.0);
        let orchestrator = PipelineOrchestrator::new(config).unwrap();
        let summary = orchestrator.run(&dataset_path).await.unwrap();

        assert_eq!(summary.final_stage, PipelineStage::Done);
        assert!(!summary.quality_passed);
        assert_eq!(summary.chart_count, 0);
        assert!(summary.report_path.is_none());

        // The quality artifact is still written before the gate.
        assert!(dir
            .path()
            .join("quality_assessment/quality_assessment.txt")
            .exists());
        assert!(!dir.path().join("insights").exists());
    }

    #[tokio::test]
    async fn test_gate_rejection_records_two_stages() {
        let dir = tempfile::TempDir::new().unwrap();
        let dataset_path = write_iris_like_csv(dir.path());

        let config = PipelineConfig::default().with_min_quality_score(100.0);
        let orchestrator = PipelineOrchestrator::new(config).unwrap();
        let summary = orchestrator.run(&dataset_path).await.unwrap();

        let recorded: Vec<_> = summary.stages.iter().map(|r| r.stage).collect();
        assert_eq!(
            recorded,
            vec![PipelineStage::Acquire, PipelineStage::AssessQuality]
        );
    }

    #[tokio::test]
    async fn test_run_summary_serializes() {
        let summary = RunSummary {
            dataset_path: PathBuf::from("/data/iris.csv"),
            final_stage: PipelineStage::Done,
            quality_score: 92.5,
            quality_passed: true,
            chart_count: 6,
            report_path: None,
            stages: vec![StageRecord::new(
                PipelineStage::Acquire,
                Duration::from_millis(3),
            )],
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["final_stage"], "done");
        assert_eq!(json["stages"][0]["stage"], "acquire");
        assert_eq!(json["quality_passed"], true);
    }
}

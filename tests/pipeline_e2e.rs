//! End-to-end tests for the analysis pipeline.
//!
//! The full-pipeline test renders charts and a PDF, which needs a system
//! TTF font family. Run with: cargo test --test pipeline_e2e -- --ignored

use std::io::Write as _;
use std::path::{Path, PathBuf};

use datasight::dataset::Dataset;
use datasight::error::DataError;
use datasight::pipeline::{PipelineConfig, PipelineOrchestrator, PipelineStage};
use datasight::quality::QualityScorer;

/// Writes a 150-row, 5-column dataset shaped like the iris benchmark:
/// an integer Id, three numeric measurements and a text label. Every
/// cell is populated and every Id is unique.
fn write_iris_csv(dir: &Path) -> PathBuf {
    let path = dir.join("iris.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "Id,sepal_length,sepal_width,petal_length,species"
    )
    .unwrap();
    let species = ["setosa", "versicolor", "virginica"];
    for i in 0..150 {
        writeln!(
            file,
            "{},{:.1},{:.1},{:.1},{}",
            i + 1,
            4.3 + (i % 30) as f64 * 0.12,
            2.0 + (i % 22) as f64 * 0.1,
            1.0 + (i % 50) as f64 * 0.11,
            species[i / 50]
        )
        .unwrap();
    }
    path
}

#[test]
fn test_iris_like_dataset_scores_full_completeness() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_iris_csv(dir.path());

    let dataset = Dataset::from_csv_path(&path).unwrap();
    assert_eq!(dataset.row_count(), 150);
    assert_eq!(dataset.column_count(), 5);

    let report = QualityScorer::new().assess(&dataset);
    assert!((report.completeness - 25.0).abs() < 1e-9);
    assert!(report.composite > 60.0);
    assert!(report.composite <= 100.0);
}

#[tokio::test]
async fn test_quality_gate_rejection_writes_only_quality_artifact() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_iris_csv(dir.path());

    let config = PipelineConfig::default().with_min_quality_score(100.0);
    let orchestrator = PipelineOrchestrator::new(config).unwrap();
    let summary = orchestrator.run(&path).await.unwrap();

    assert_eq!(summary.final_stage, PipelineStage::Done);
    assert!(!summary.quality_passed);
    assert!(summary.report_path.is_none());

    let quality_artifact = dir.path().join("quality_assessment/quality_assessment.txt");
    assert!(quality_artifact.exists());
    assert!(!dir.path().join("insights").exists());
    assert!(!dir.path().join("visualizations").exists());
    assert!(!dir.path().join("output").exists());

    let text = std::fs::read_to_string(&quality_artifact).unwrap();
    assert!(text.contains("Data Quality Assessment"));
    assert!(text.contains("Completeness: 25.00/25"));
    assert!(text.contains("Total Score:"));
}

#[test]
fn test_empty_dataset_is_a_load_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "a,b,c\n").unwrap();

    let result = Dataset::from_csv_path(&path);
    assert!(matches!(result, Err(DataError::EmptyDataset { .. })));
}

#[tokio::test]
#[ignore = "requires system fonts"]
async fn test_full_pipeline_produces_all_artifacts() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_iris_csv(dir.path());

    let orchestrator = PipelineOrchestrator::new(PipelineConfig::default()).unwrap();
    let summary = orchestrator.run(&path).await.unwrap();

    assert_eq!(summary.final_stage, PipelineStage::Done);
    assert!(summary.quality_passed);
    // Four numeric columns within the cap, plus the heatmap.
    assert_eq!(summary.chart_count, 5);

    let viz_dir = dir.path().join("visualizations");
    let pngs: Vec<_> = std::fs::read_dir(&viz_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|x| x == "png").unwrap_or(false))
        .collect();
    assert_eq!(pngs.len(), 5);
    assert!(viz_dir.join("correlation_heatmap.png").exists());
    assert!(viz_dir.join("sepal_length_distribution.png").exists());

    let insights = std::fs::read_to_string(dir.path().join("insights/insights.txt")).unwrap();
    assert!(insights.contains("Statistical Analysis"));
    assert!(insights.contains("Structural Analysis"));

    let report = summary.report_path.unwrap();
    assert!(report.ends_with("output/analysis_report.pdf"));
    assert!(std::fs::metadata(&report).unwrap().len() > 0);
}

#[tokio::test]
async fn test_analyzers_share_one_insights_artifact() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_iris_csv(dir.path());

    let dataset = Dataset::from_csv_path(&path).unwrap();
    let artifact = datasight::analysis::InsightsArtifact::new(&dir.path().join("insights"));
    datasight::analysis::StatisticalAnalyzer::analyze_and_record(&dataset, &artifact)
        .await
        .unwrap();
    datasight::analysis::StructuralAnalyzer::analyze_and_record(&dataset, &artifact)
        .await
        .unwrap();

    let text = std::fs::read_to_string(artifact.path()).unwrap();
    let stats_pos = text.find("Statistical Analysis").unwrap();
    let structure_pos = text.find("Structural Analysis").unwrap();
    assert!(stats_pos < structure_pos);
    assert!(text.contains("species"));
}

//! CLI command definitions for datasight.
//!
//! This module provides the command-line interface for analyzing tabular
//! datasets: quality scoring, statistical and structural analysis, chart
//! rendering, and PDF report assembly.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::acquire;
use crate::dataset::Dataset;
use crate::pipeline::{PipelineConfig, PipelineOrchestrator};
use crate::quality::QualityScorer;

/// Dataset quality assessment and analysis pipeline.
#[derive(Parser)]
#[command(name = "datasight")]
#[command(about = "Analyze tabular datasets: quality scoring, statistics, charts, PDF report")]
#[command(version)]
#[command(
    long_about = "datasight scores a CSV dataset on completeness, consistency, accuracy and uniqueness, and when the dataset clears the quality gate it produces statistical insights, distribution charts, a correlation heatmap and a paginated PDF report next to the dataset.\n\nExample usage:\n  datasight run ./data/iris.csv"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run the full pipeline against a CSV dataset.
    Run(RunArgs),

    /// Score dataset quality without running the rest of the pipeline.
    Assess(AssessArgs),

    /// Clone a dataset repository and list the data files it contains.
    Acquire(AcquireArgs),
}

/// Arguments for `datasight run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path of the CSV dataset to analyze.
    pub dataset: PathBuf,

    /// Minimum composite quality score (out of 100) required to proceed
    /// past assessment.
    #[arg(long, env = "DATASIGHT_MIN_QUALITY_SCORE")]
    pub min_quality_score: Option<f64>,

    /// Maximum number of distribution charts to render.
    #[arg(long, env = "DATASIGHT_MAX_DISTRIBUTION_CHARTS")]
    pub max_charts: Option<usize>,

    /// Fraction of columns treated as required for completeness scoring.
    #[arg(long, env = "DATASIGHT_REQUIRED_FIELDS_RATIO")]
    pub required_fields_ratio: Option<f64>,

    /// Run the statistical and structural analyzers one after the other
    /// instead of concurrently.
    #[arg(long)]
    pub sequential: bool,

    /// Output the run summary as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `datasight assess`.
#[derive(Parser, Debug)]
pub struct AssessArgs {
    /// Path of the CSV dataset to score.
    pub dataset: PathBuf,

    /// Fraction of columns treated as required for completeness scoring.
    #[arg(long, env = "DATASIGHT_REQUIRED_FIELDS_RATIO")]
    pub required_fields_ratio: Option<f64>,

    /// Output the quality report as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `datasight acquire`.
#[derive(Parser, Debug)]
pub struct AcquireArgs {
    /// Git URL of the dataset repository.
    pub url: String,

    /// Destination directory for the clone.
    #[arg(short = 'o', long, default_value = "./dataset")]
    pub dest: PathBuf,
}

/// Parse CLI arguments without executing a command.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
///
/// This is a convenience function that parses CLI args and runs the command.
/// For more control over logging initialization, use `parse_cli()` and `run_with_cli()`.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
///
/// This is the main entry point for the datasight CLI.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => {
            run_pipeline_command(args).await?;
        }
        Commands::Assess(args) => {
            run_assess_command(args)?;
        }
        Commands::Acquire(args) => {
            run_acquire_command(args).await?;
        }
    }
    Ok(())
}

async fn run_pipeline_command(args: RunArgs) -> anyhow::Result<()> {
    let mut config = PipelineConfig::from_env()?;
    if let Some(score) = args.min_quality_score {
        config = config.with_min_quality_score(score);
    }
    if let Some(max) = args.max_charts {
        config = config.with_max_distribution_charts(max);
    }
    if let Some(ratio) = args.required_fields_ratio {
        config = config.with_required_fields_ratio(ratio);
    }
    if args.sequential {
        config = config.with_concurrent_analyzers(false);
    }

    let orchestrator = PipelineOrchestrator::new(config)?;
    let summary = orchestrator.run(&args.dataset).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Dataset: {}", summary.dataset_path.display());
        println!("Quality score: {:.2}/100", summary.quality_score);
        if summary.quality_passed {
            println!("Charts rendered: {}", summary.chart_count);
            if let Some(report) = &summary.report_path {
                println!("Report: {}", report.display());
            }
        } else {
            println!("Quality gate rejected the dataset; analysis skipped.");
        }
    }
    Ok(())
}

fn run_assess_command(args: AssessArgs) -> anyhow::Result<()> {
    let dataset = Dataset::from_csv_path(&args.dataset)?;
    let mut scorer = QualityScorer::new();
    if let Some(ratio) = args.required_fields_ratio {
        scorer = scorer.with_required_fields_ratio(ratio);
    }
    let report = scorer.assess(&dataset);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

async fn run_acquire_command(args: AcquireArgs) -> anyhow::Result<()> {
    let root = acquire::clone_dataset(&args.url, &args.dest).await?;
    let groups = acquire::discover_files(&root)?;

    info!(dest = %root.display(), "Dataset acquired");
    for (extension, paths) in &groups {
        let label = if extension.is_empty() {
            "(no extension)"
        } else {
            extension.as_str()
        };
        println!("{}: {} file(s)", label, paths.len());
        for path in paths {
            println!("  {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args_defaults() {
        let cli = Cli::parse_from(["datasight", "run", "data.csv"]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.dataset, PathBuf::from("data.csv"));
                assert!(args.min_quality_score.is_none());
                assert!(!args.sequential);
                assert!(!args.json);
            }
            _ => panic!("expected run command"),
        }
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_run_args_overrides() {
        let cli = Cli::parse_from([
            "datasight",
            "run",
            "data.csv",
            "--min-quality-score",
            "80",
            "--max-charts",
            "3",
            "--sequential",
            "--json",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.min_quality_score, Some(80.0));
                assert_eq!(args.max_charts, Some(3));
                assert!(args.sequential);
                assert!(args.json);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_acquire_args() {
        let cli = Cli::parse_from([
            "datasight",
            "acquire",
            "https://example.com/iris.git",
            "-o",
            "/tmp/iris",
        ]);
        match cli.command {
            Commands::Acquire(args) => {
                assert_eq!(args.url, "https://example.com/iris.git");
                assert_eq!(args.dest, PathBuf::from("/tmp/iris"));
            }
            _ => panic!("expected acquire command"),
        }
    }
}

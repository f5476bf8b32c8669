//! Pipeline configuration and orchestration.
//!
//! The conversational coordinator of the original system is replaced here
//! by an explicit finite-state pipeline: Acquire, AssessQuality, Analyze,
//! Visualize, Report, Done, with Failed on any stage error. Transitions are
//! ordinary control flow gated by stage success and the quality composite
//! threshold.

mod config;
mod layout;
mod orchestrator;

pub use config::{ConfigError, PipelineConfig};
pub use layout::ArtifactLayout;
pub use orchestrator::{PipelineError, PipelineOrchestrator, PipelineStage, RunSummary, StageRecord};

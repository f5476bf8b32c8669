//! Chart rendering for numeric columns.
//!
//! Produces one distribution chart (histogram with a smoothed density
//! overlay) per numeric column up to a configured cap, plus one annotated
//! correlation heatmap covering all numeric columns.

mod charts;

pub use charts::{
    distribution_filename, VisualizationGenerator, VisualizationSet,
    DEFAULT_DISTRIBUTION_CHART_CAP, HEATMAP_FILENAME,
};

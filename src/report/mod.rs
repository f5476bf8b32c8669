//! PDF report assembly.
//!
//! Merges the quality and insights text artifacts with the visualization
//! images into a single paginated document.

mod assembler;

pub use assembler::{page_title_from_filename, ReportAssembler, REPORT_FILENAME, REPORT_TITLE};

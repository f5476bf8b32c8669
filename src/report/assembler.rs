//! Assembles the final paginated PDF document.

use std::path::{Path, PathBuf};

use chrono::Local;
use genpdf::elements::{Break, Image, PageBreak, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Style, StyledString};
use genpdf::{Alignment, Document, Scale, SimplePageDecorator};
use tracing::{info, warn};

use crate::error::ReportError;

/// Filename of the final report artifact.
pub const REPORT_FILENAME: &str = "analysis_report.pdf";

/// Fixed report title shown on the first page.
pub const REPORT_TITLE: &str = "Data Analysis Report";

/// Uniform scale applied to each embedded chart so it fits the page width.
const IMAGE_SCALE: f64 = 0.18;

const PAGE_MARGIN_MM: i32 = 30;
const TITLE_FONT_SIZE: u8 = 24;
const HEADING_FONT_SIZE: u8 = 16;
const IMAGE_TITLE_FONT_SIZE: u8 = 12;

/// Candidate (directory, family) pairs for locating a TTF font family.
const FONT_CANDIDATES: &[(&str, &str)] = &[
    ("/usr/share/fonts/truetype/liberation", "LiberationSans"),
    ("/usr/share/fonts/liberation", "LiberationSans"),
    ("/usr/share/fonts/truetype/dejavu", "DejaVuSans"),
    ("/usr/share/fonts/dejavu", "DejaVuSans"),
    ("/System/Library/Fonts", "Helvetica"),
    ("/Library/Fonts", "Arial"),
];

/// Derives a page title from an image filename: extension stripped,
/// underscores become spaces, words are title-cased.
pub fn page_title_from_filename(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    stem.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the final PDF from the stage artifacts.
pub struct ReportAssembler {
    title: String,
}

impl ReportAssembler {
    /// Creates an assembler with the fixed report title.
    pub fn new() -> Self {
        Self { title: REPORT_TITLE.to_string() }
    }

    /// Assembles the report into `output_dir/analysis_report.pdf`.
    ///
    /// Section order is fixed: title page, quality text, insights text,
    /// then one page per PNG in `visualizations_dir` in lexicographic
    /// filename order. Missing text artifacts are skipped with a warning.
    pub fn build(
        &self,
        quality_path: &Path,
        insights_path: &Path,
        visualizations_dir: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(output_dir)?;
        let output_path = output_dir.join(REPORT_FILENAME);

        let mut doc = Document::new(load_font_family()?);
        doc.set_title(self.title.as_str());
        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(PAGE_MARGIN_MM);
        doc.set_page_decorator(decorator);

        // Title page.
        let title_style = Style::new().bold().with_font_size(TITLE_FONT_SIZE);
        doc.push(
            Paragraph::new(StyledString::new(self.title.clone(), title_style))
                .aligned(Alignment::Center),
        );
        doc.push(Break::new(1));
        doc.push(
            Paragraph::new(format!(
                "Generated on: {}",
                Local::now().format("%Y-%m-%d %H:%M")
            ))
            .aligned(Alignment::Center),
        );

        self.push_text_section(&mut doc, "Quality Assessment", quality_path);
        self.push_text_section(&mut doc, "Analysis Insights", insights_path);

        for image_path in list_images_sorted(visualizations_dir)? {
            doc.push(PageBreak::new());
            let heading = Style::new().bold().with_font_size(IMAGE_TITLE_FONT_SIZE);
            doc.push(Paragraph::new(StyledString::new(
                page_title_from_filename(&image_path),
                heading,
            )));
            doc.push(Break::new(1));
            let image = Image::from_path(&image_path).map_err(|e| ReportError::ImageEmbed {
                path: image_path.clone(),
                reason: e.to_string(),
            })?;
            doc.push(
                image
                    .with_alignment(Alignment::Center)
                    .with_scale(Scale::new(IMAGE_SCALE, IMAGE_SCALE)),
            );
        }

        doc.render_to_file(&output_path)
            .map_err(|e| ReportError::Render {
                path: output_path.clone(),
                reason: e.to_string(),
            })?;

        info!(path = %output_path.display(), "Assembled analysis report");
        Ok(output_path)
    }

    /// Appends a heading plus the verbatim text of `path` on a new page;
    /// a missing artifact is skipped, not fatal.
    fn push_text_section(&self, doc: &mut Document, heading: &str, path: &Path) {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping missing report section");
                return;
            }
        };

        doc.push(PageBreak::new());
        let heading_style = Style::new().bold().with_font_size(HEADING_FONT_SIZE);
        doc.push(Paragraph::new(StyledString::new(
            heading.to_string(),
            heading_style,
        )));
        doc.push(Break::new(1));

        for line in content.lines() {
            if line.trim().is_empty() {
                doc.push(Break::new(1));
            } else {
                doc.push(Paragraph::new(line));
            }
        }
    }
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// PNG files in the visualizations directory, sorted lexicographically by
/// filename so page order is deterministic across platforms.
fn list_images_sorted(dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        })
        .collect();
    images.sort_by_key(|path| path.file_name().map(|n| n.to_os_string()));
    Ok(images)
}

/// Tries the font candidates in order; the first family that loads wins.
fn load_font_family() -> Result<FontFamily<FontData>, ReportError> {
    let mut failures = Vec::new();
    for (dir, family) in FONT_CANDIDATES {
        match genpdf::fonts::from_files(dir, family, None) {
            Ok(fonts) => return Ok(fonts),
            Err(e) => failures.push(format!("{}/{}: {}", dir, family, e)),
        }
    }
    Err(ReportError::FontLoad(failures.join("; ")))
}

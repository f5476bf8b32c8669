//! Structural analysis: categorical frequencies, missing patterns and the
//! column type inventory.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::{Dataset, Value};
use crate::error::AnalysisError;

use super::insights::InsightsArtifact;

/// One value/count pair in a frequency table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyEntry {
    /// The categorical value.
    pub value: String,
    /// Occurrence count.
    pub count: usize,
}

/// Frequency table for one text column, sorted by descending count with
/// ties broken by first-encountered order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnFrequencies {
    /// Column name.
    pub column: String,
    /// Frequency entries, most frequent first.
    pub entries: Vec<FrequencyEntry>,
}

/// The output of structural analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureSection {
    /// Frequency tables for text columns, in column order.
    pub frequencies: Vec<ColumnFrequencies>,
    /// Per-column missing counts, in column order.
    pub missing_counts: Vec<(String, usize)>,
    /// Column name to dtype label inventory, in column order.
    pub dtypes: Vec<(String, String)>,
}

impl StructureSection {
    /// Renders the section appended to the insights artifact.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "Structural Analysis");
        let _ = writeln!(out, "===================");
        let _ = writeln!(out);

        let _ = writeln!(out, "Categorical summaries:");
        if self.frequencies.is_empty() {
            let _ = writeln!(out, "(no text columns)");
        }
        for table in &self.frequencies {
            let _ = writeln!(out, "{}:", table.column);
            for entry in &table.entries {
                let _ = writeln!(out, "  {:<24} {}", entry.value, entry.count);
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Missing values per column:");
        for (name, count) in &self.missing_counts {
            let _ = writeln!(out, "  {:<24} {}", name, count);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Column types:");
        for (name, dtype) in &self.dtypes {
            let _ = writeln!(out, "  {:<24} {}", name, dtype);
        }
        out
    }
}

/// Computes frequency tables, missing-value patterns and the type
/// inventory.
pub struct StructuralAnalyzer;

impl StructuralAnalyzer {
    /// Analyzes the dataset's structure. Always succeeds for a loaded
    /// dataset; datasets without text columns simply get empty frequency
    /// tables.
    pub fn analyze(dataset: &Dataset) -> StructureSection {
        let frequencies = dataset
            .text_columns()
            .into_iter()
            .map(|column| {
                let mut order: Vec<String> = Vec::new();
                let mut counts: HashMap<String, usize> = HashMap::new();
                for value in &column.values {
                    if let Value::Text(s) = value {
                        if !counts.contains_key(s) {
                            order.push(s.clone());
                        }
                        *counts.entry(s.clone()).or_insert(0) += 1;
                    }
                }
                // Stable sort: ties keep first-encountered order.
                let mut entries: Vec<FrequencyEntry> = order
                    .into_iter()
                    .map(|value| {
                        let count = counts[&value];
                        FrequencyEntry { value, count }
                    })
                    .collect();
                entries.sort_by(|a, b| b.count.cmp(&a.count));
                ColumnFrequencies {
                    column: column.name.clone(),
                    entries,
                }
            })
            .collect();

        let missing_counts = dataset
            .columns()
            .iter()
            .map(|c| (c.name.clone(), c.missing_count()))
            .collect();

        let dtypes = dataset
            .columns()
            .iter()
            .map(|c| (c.name.clone(), c.dtype.label().to_string()))
            .collect();

        info!(
            text_columns = dataset.text_columns().len(),
            "Structural analysis complete"
        );
        StructureSection {
            frequencies,
            missing_counts,
            dtypes,
        }
    }

    /// Analyzes the dataset and appends the rendered section to the shared
    /// insights artifact.
    pub async fn analyze_and_record(
        dataset: &Dataset,
        artifact: &InsightsArtifact,
    ) -> Result<StructureSection, AnalysisError> {
        let section = Self::analyze(dataset);
        artifact.append(&section.render_text()).await?;
        Ok(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, Dtype};

    fn dataset() -> Dataset {
        let species = Column {
            name: "species".to_string(),
            dtype: Dtype::Text,
            values: ["b", "a", "b", "c", "a", "b"]
                .iter()
                .map(|s| Value::Text(s.to_string()))
                .collect(),
        };
        let mut size_values: Vec<Value> =
            vec![1.0, 2.0, 3.0, 4.0, 5.0].into_iter().map(Value::Number).collect();
        size_values.push(Value::Missing);
        let size = Column {
            name: "size".to_string(),
            dtype: Dtype::Numeric,
            values: size_values,
        };
        Dataset::new(vec![species, size], 6)
    }

    #[test]
    fn test_frequency_table_order() {
        let section = StructuralAnalyzer::analyze(&dataset());
        let entries = &section.frequencies[0].entries;
        assert_eq!(entries[0].value, "b");
        assert_eq!(entries[0].count, 3);
        assert_eq!(entries[1].value, "a");
        assert_eq!(entries[1].count, 2);
        assert_eq!(entries[2].value, "c");
        assert_eq!(entries[2].count, 1);
    }

    #[test]
    fn test_tie_break_is_first_encountered() {
        let column = Column {
            name: "c".to_string(),
            dtype: Dtype::Text,
            values: ["z", "y", "z", "y"]
                .iter()
                .map(|s| Value::Text(s.to_string()))
                .collect(),
        };
        let section = StructuralAnalyzer::analyze(&Dataset::new(vec![column], 4));
        let entries = &section.frequencies[0].entries;
        // Both counts are 2; "z" was seen first.
        assert_eq!(entries[0].value, "z");
        assert_eq!(entries[1].value, "y");
    }

    #[test]
    fn test_missing_counts_and_dtypes() {
        let section = StructuralAnalyzer::analyze(&dataset());
        assert_eq!(section.missing_counts, vec![
            ("species".to_string(), 0),
            ("size".to_string(), 1),
        ]);
        assert_eq!(section.dtypes, vec![
            ("species".to_string(), "text".to_string()),
            ("size".to_string(), "numeric".to_string()),
        ]);
    }

    #[tokio::test]
    async fn test_record_appends_section() {
        let dir = tempfile::TempDir::new().unwrap();
        let artifact = InsightsArtifact::new(dir.path());
        StructuralAnalyzer::analyze_and_record(&dataset(), &artifact)
            .await
            .unwrap();
        let contents = std::fs::read_to_string(artifact.path()).unwrap();
        assert!(contents.contains("Structural Analysis"));
        assert!(contents.contains("species"));
        assert!(contents.contains("Column types:"));
    }
}

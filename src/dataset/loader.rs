//! CSV loading and column type inference.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::DataError;

use super::frame::{Column, Dataset, Dtype, Value};

/// Cell contents treated as missing markers, compared case-insensitively.
const MISSING_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null"];

impl Dataset {
    /// Loads a dataset from a delimited text file with a header row.
    ///
    /// Column types are inferred after loading: a column is numeric when
    /// every non-missing cell parses as a number and at least one
    /// non-missing cell exists; everything else (including all-missing
    /// columns) is text.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Load`] when the file is missing or unparseable,
    /// [`DataError::RaggedRow`] when a row's field count disagrees with the
    /// header, and [`DataError::EmptyDataset`] when the table has zero rows
    /// or zero columns.
    pub fn from_csv_path(path: &Path) -> Result<Self, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::Load {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| DataError::Load {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        let mut row_count = 0usize;

        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| DataError::Load {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            if record.len() != headers.len() {
                return Err(DataError::RaggedRow {
                    row: index + 1,
                    expected: headers.len(),
                    actual: record.len(),
                });
            }
            for (column, field) in record.iter().enumerate() {
                cells[column].push(field.trim().to_string());
            }
            row_count += 1;
        }

        if row_count == 0 || headers.is_empty() {
            return Err(DataError::EmptyDataset {
                path: path.to_path_buf(),
                rows: row_count,
                columns: headers.len(),
            });
        }

        let columns: Vec<Column> = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| infer_column(name, raw))
            .collect();

        let numeric = columns.iter().filter(|c| c.dtype == Dtype::Numeric).count();
        info!(
            path = %path.display(),
            rows = row_count,
            columns = columns.len(),
            numeric_columns = numeric,
            "Loaded dataset"
        );

        Ok(Dataset::new(columns, row_count))
    }
}

/// Infers a column's type and converts its raw cells.
fn infer_column(name: String, raw: Vec<String>) -> Column {
    let mut present = 0usize;
    let mut all_numeric = true;
    for cell in &raw {
        if is_missing(cell) {
            continue;
        }
        present += 1;
        if cell.parse::<f64>().is_err() {
            all_numeric = false;
        }
    }

    let dtype = if all_numeric && present > 0 {
        Dtype::Numeric
    } else {
        Dtype::Text
    };
    debug!(column = %name, dtype = %dtype, present, "Inferred column type");

    let values = raw
        .into_iter()
        .map(|cell| {
            if is_missing(&cell) {
                Value::Missing
            } else if dtype == Dtype::Numeric {
                // parse cannot fail here: inference saw every cell
                cell.parse::<f64>().map(Value::Number).unwrap_or(Value::Missing)
            } else {
                Value::Text(cell)
            }
        })
        .collect();

    Column { name, dtype, values }
}

/// Returns true if the raw cell content is a missing marker.
fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_infers_types() {
        let (_dir, path) = write_csv("a,b,c\n1,x,\n2.5,y,3\n");
        let dataset = Dataset::from_csv_path(&path).unwrap();

        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column_count(), 3);
        assert_eq!(dataset.column("a").unwrap().dtype, Dtype::Numeric);
        assert_eq!(dataset.column("b").unwrap().dtype, Dtype::Text);
        // "c" has one missing cell and one numeric cell: still numeric.
        assert_eq!(dataset.column("c").unwrap().dtype, Dtype::Numeric);
        assert_eq!(dataset.column("c").unwrap().missing_count(), 1);
    }

    #[test]
    fn test_load_missing_markers() {
        let (_dir, path) = write_csv("a\nNA\nnull\n1\nNaN\n");
        let dataset = Dataset::from_csv_path(&path).unwrap();

        let column = dataset.column("a").unwrap();
        assert_eq!(column.dtype, Dtype::Numeric);
        assert_eq!(column.missing_count(), 3);
        assert_eq!(column.numbers(), vec![1.0]);
    }

    #[test]
    fn test_load_all_missing_column_is_text() {
        let (_dir, path) = write_csv("a,b\n1,\n2,\n");
        let dataset = Dataset::from_csv_path(&path).unwrap();

        assert_eq!(dataset.column("b").unwrap().dtype, Dtype::Text);
        assert_eq!(dataset.column("b").unwrap().missing_count(), 2);
    }

    #[test]
    fn test_load_empty_dataset() {
        let (_dir, path) = write_csv("a,b\n");
        let result = Dataset::from_csv_path(&path);
        assert!(matches!(result, Err(DataError::EmptyDataset { rows: 0, .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = Dataset::from_csv_path(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(DataError::Load { .. })));
    }

    #[test]
    fn test_load_ragged_row() {
        let (_dir, path) = write_csv("a,b\n1,2\n3\n");
        let result = Dataset::from_csv_path(&path);
        assert!(matches!(
            result,
            Err(DataError::RaggedRow { row: 2, expected: 2, actual: 1 })
        ));
    }
}

//! Column-oriented table representation.

use std::collections::HashSet;
use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A numeric value.
    Number(f64),
    /// A categorical/text value.
    Text(String),
    /// A missing value marker.
    Missing,
}

impl Value {
    /// Returns true if this cell is missing.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Returns the numeric value, if this cell holds one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Missing => write!(f, ""),
        }
    }
}

/// The inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    /// Every non-missing cell parses as a number, and at least one exists.
    Numeric,
    /// Anything else, including all-missing columns.
    Text,
}

impl Dtype {
    /// Human-readable label used in metadata and artifacts.
    pub fn label(&self) -> &'static str {
        match self {
            Dtype::Numeric => "numeric",
            Dtype::Text => "text",
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A named column with its inferred type and cell values.
#[derive(Debug, Clone)]
pub struct Column {
    /// Column name from the header row.
    pub name: String,
    /// Inferred column type.
    pub dtype: Dtype,
    /// Cell values in row order; length equals the dataset row count.
    pub values: Vec<Value>,
}

impl Column {
    /// Number of non-missing cells.
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_missing()).count()
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.values.len() - self.present_count()
    }

    /// Non-missing numeric values in row order.
    pub fn numbers(&self) -> Vec<f64> {
        self.values.iter().filter_map(|v| v.as_number()).collect()
    }

    /// Number of distinct non-missing values.
    ///
    /// Numbers are compared through their bit representation so that the
    /// count is exact and deterministic.
    pub fn distinct_count(&self) -> usize {
        let mut seen: HashSet<String> = HashSet::new();
        for value in &self.values {
            match value {
                Value::Number(n) => {
                    seen.insert(format!("n:{}", n.to_bits()));
                }
                Value::Text(s) => {
                    seen.insert(format!("t:{}", s));
                }
                Value::Missing => {}
            }
        }
        seen.len()
    }
}

/// An immutable, column-oriented table.
///
/// Created by [`Dataset::from_csv_path`](Dataset::from_csv_path); never
/// mutated afterwards within a pipeline run.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Builds a dataset from already-typed columns.
    ///
    /// All columns must have the same number of values.
    pub(crate) fn new(columns: Vec<Column>, row_count: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == row_count));
        Self { columns, row_count }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.row_count * self.columns.len()
    }

    /// All columns, in load order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric columns, in load order.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.dtype == Dtype::Numeric)
            .collect()
    }

    /// Text columns, in load order.
    pub fn text_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.dtype == Dtype::Text)
            .collect()
    }

    /// Returns the cells of row `index` in column order.
    pub fn row(&self, index: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.values[index]).collect()
    }

    /// Returns true if row `index` has no missing cells.
    pub fn row_is_complete(&self, index: usize) -> bool {
        self.columns.iter().all(|c| !c.values[index].is_missing())
    }

    /// Number of rows that are exact duplicates of an earlier row.
    pub fn duplicate_row_count(&self) -> usize {
        let mut seen: HashSet<String> = HashSet::new();
        let mut duplicates = 0;
        for row in 0..self.row_count {
            let key = self
                .columns
                .iter()
                .map(|c| match &c.values[row] {
                    Value::Number(n) => format!("n:{}", n.to_bits()),
                    Value::Text(s) => format!("t:{}", s),
                    Value::Missing => "m:".to_string(),
                })
                .collect::<Vec<_>>()
                .join("\u{1f}");
            if !seen.insert(key) {
                duplicates += 1;
            }
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_column(name: &str, values: Vec<f64>) -> Column {
        Column {
            name: name.to_string(),
            dtype: Dtype::Numeric,
            values: values.into_iter().map(Value::Number).collect(),
        }
    }

    fn text_column(name: &str, values: Vec<&str>) -> Column {
        Column {
            name: name.to_string(),
            dtype: Dtype::Text,
            values: values.into_iter().map(|s| Value::Text(s.to_string())).collect(),
        }
    }

    #[test]
    fn test_column_counts() {
        let mut column = numeric_column("a", vec![1.0, 2.0, 2.0]);
        column.values.push(Value::Missing);

        assert_eq!(column.present_count(), 3);
        assert_eq!(column.missing_count(), 1);
        assert_eq!(column.distinct_count(), 2);
        assert_eq!(column.numbers(), vec![1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_duplicate_row_count() {
        let dataset = Dataset::new(
            vec![
                numeric_column("a", vec![1.0, 2.0, 1.0, 1.0]),
                text_column("b", vec!["x", "y", "x", "z"]),
            ],
            4,
        );

        // Rows 0 and 2 are identical; row 3 differs in "b".
        assert_eq!(dataset.duplicate_row_count(), 1);
    }

    #[test]
    fn test_row_is_complete() {
        let mut column = numeric_column("a", vec![1.0]);
        column.values.push(Value::Missing);
        let other = text_column("b", vec!["x", "y"]);
        let dataset = Dataset::new(vec![column, other], 2);

        assert!(dataset.row_is_complete(0));
        assert!(!dataset.row_is_complete(1));
    }

    #[test]
    fn test_numeric_and_text_partition() {
        let dataset = Dataset::new(
            vec![
                numeric_column("a", vec![1.0]),
                text_column("b", vec!["x"]),
                numeric_column("c", vec![2.0]),
            ],
            1,
        );

        let numeric: Vec<_> = dataset.numeric_columns().iter().map(|c| c.name.as_str()).collect();
        let text: Vec<_> = dataset.text_columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(numeric, vec!["a", "c"]);
        assert_eq!(text, vec!["b"]);
    }
}

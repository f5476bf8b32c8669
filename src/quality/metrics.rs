//! Shared numeric helpers for quality scoring and analysis.

use crate::dataset::Column;

/// Number of standard deviations within which a value counts as in range.
pub const SIGMA_RANGE: f64 = 3.0;

/// Arithmetic mean of a slice, or 0.0 when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator), or 0.0 when fewer than
/// two values exist.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Ratio of a numeric column's present values whose deviation from the
/// column mean is under [`SIGMA_RANGE`] standard deviations.
///
/// A zero-variance column counts as fully in range, so this never divides
/// by zero or yields NaN. Columns with no present values also score 1.0.
pub fn column_sigma_in_range_ratio(column: &Column) -> f64 {
    let values = column.numbers();
    if values.is_empty() {
        return 1.0;
    }
    let std_dev = sample_std_dev(&values);
    if std_dev == 0.0 {
        return 1.0;
    }
    let m = mean(&values);
    let in_range = values
        .iter()
        .filter(|v| ((*v - m) / std_dev).abs() < SIGMA_RANGE)
        .count();
    in_range as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dtype, Value};

    fn column_of(values: Vec<f64>) -> Column {
        Column {
            name: "x".to_string(),
            dtype: Dtype::Numeric,
            values: values.into_iter().map(Value::Number).collect(),
        }
    }

    #[test]
    fn test_mean_and_std() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[1.0, 2.0, 3.0]) - 2.0).abs() < f64::EPSILON);
        assert_eq!(sample_std_dev(&[5.0]), 0.0);
        // Sample std of [2, 4, 4, 4, 5, 5, 7, 9] is ~2.138.
        let std = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((std - 2.1380899).abs() < 1e-6);
    }

    #[test]
    fn test_sigma_ratio_zero_variance() {
        let column = column_of(vec![4.0; 20]);
        assert_eq!(column_sigma_in_range_ratio(&column), 1.0);
    }

    #[test]
    fn test_sigma_ratio_with_outlier() {
        // 30 tight values and one far outlier.
        let mut values = vec![10.0; 15];
        values.extend(vec![11.0; 15]);
        values.push(1000.0);
        let column = column_of(values);

        let ratio = column_sigma_in_range_ratio(&column);
        assert!(ratio < 1.0);
        assert!((ratio - 30.0 / 31.0).abs() < 1e-9);
    }

    #[test]
    fn test_sigma_ratio_empty_column() {
        let column = Column {
            name: "x".to_string(),
            dtype: Dtype::Numeric,
            values: vec![Value::Missing, Value::Missing],
        };
        assert_eq!(column_sigma_in_range_ratio(&column), 1.0);
    }
}

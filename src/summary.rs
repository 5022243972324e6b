//! Per-column statistics of a generated dataset.

use datagen_core::{Column, ColumnData, ColumnSet, DataType, ScalarValue};
use serde::Serialize;
use std::collections::HashSet;

/// Statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    pub rows: usize,
    pub nulls: usize,
    /// Distinct non-null values; for arrays, distinct elements
    pub distinct: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_length: Option<f64>,
}

/// Summarize every column of `set` in declaration order.
pub fn summarize(set: &ColumnSet) -> Vec<ColumnSummary> {
    set.columns.iter().map(summarize_column).collect()
}

/// Summarize one column, skipping null rows.
pub fn summarize_column(column: &Column) -> ColumnSummary {
    let mut distinct: HashSet<ScalarValue> = HashSet::new();
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;
    let mut total_length = 0usize;
    let mut valid_rows = 0usize;

    let mut observe = |value: ScalarValue| {
        let numeric = match &value {
            ScalarValue::Int(i) => Some(*i as f64),
            ScalarValue::Float(f) => Some(*f),
            _ => None,
        };
        if let Some(n) = numeric {
            min = Some(min.map_or(n, |m| m.min(n)));
            max = Some(max.map_or(n, |m| m.max(n)));
        }
        distinct.insert(value);
    };

    for row in 0..column.len() {
        if !column.is_valid(row) {
            continue;
        }
        valid_rows += 1;
        match &column.data {
            ColumnData::Array { rows, .. } => {
                if let Some(elements) = rows.get(row) {
                    total_length += elements.len();
                    (0..elements.len())
                        .filter_map(|i| elements.scalar_at(i))
                        .for_each(&mut observe);
                }
            }
            ColumnData::VarChar(values) | ColumnData::Json(values) => {
                total_length += values[row].len();
                observe(ScalarValue::Text(values[row].clone()));
            }
            data => {
                if let Some(value) = data.scalar_at(row) {
                    observe(value);
                }
            }
        }
    }

    let mean_length = match column.data.data_type() {
        DataType::Array | DataType::VarChar | DataType::Json if valid_rows > 0 => {
            Some(total_length as f64 / valid_rows as f64)
        }
        _ => None,
    };

    ColumnSummary {
        name: column.name.clone(),
        data_type: column.data.data_type(),
        rows: column.len(),
        nulls: column.null_count(),
        distinct: distinct.len(),
        min,
        max,
        mean_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_summary_skips_nulls() {
        let column = Column::new("n", ColumnData::Int64(vec![5, 0, -3, 5]))
            .with_validity(Some(vec![true, false, true, true]));
        let summary = summarize_column(&column);

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.nulls, 1);
        assert_eq!(summary.distinct, 2);
        assert_eq!(summary.min, Some(-3.0));
        assert_eq!(summary.max, Some(5.0));
        assert_eq!(summary.mean_length, None);
    }

    #[test]
    fn test_array_summary() {
        let column = Column::new(
            "tags",
            ColumnData::Array {
                element_type: DataType::VarChar,
                rows: vec![
                    ColumnData::VarChar(vec!["a".to_string(), "b".to_string()]),
                    ColumnData::VarChar(vec!["a".to_string()]),
                    ColumnData::VarChar(vec![]),
                ],
            },
        );
        let summary = summarize_column(&column);

        assert_eq!(summary.distinct, 2);
        assert_eq!(summary.mean_length, Some(1.0));
        assert!(summary.min.is_none());
    }

    #[test]
    fn test_summary_serializes_type_name() {
        let column = Column::new("flag", ColumnData::Bool(vec![true, false]));
        let json = serde_json::to_value(summarize_column(&column)).unwrap();
        assert_eq!(json["type"], "bool");
        assert_eq!(json["distinct"], 2);
        assert!(json.get("min").is_none());
    }
}

//! Best-effort numeric reinterpretation of table columns.
//!
//! A column becomes numeric only when every data cell in it parses; a single
//! miss leaves the whole column textual. This is a charting/export
//! convenience, not schema inference.

use crate::model::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedTable {
    pub header: Vec<String>,
    pub column_types: Vec<ColumnType>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Parse a cell as a finite number after trimming.
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Decide the type of every column, using data rows only.
pub fn infer_column_types(table: &Table) -> Vec<ColumnType> {
    let data = table.data_rows();
    (0..table.column_count())
        .map(|col| {
            let numeric = !data.is_empty()
                && data.iter().all(|row| {
                    row.get(col)
                        .map(|cell| parse_number(cell).is_some())
                        .unwrap_or(false)
                });
            if numeric {
                ColumnType::Numeric
            } else {
                ColumnType::Text
            }
        })
        .collect()
}

pub fn coerce_table(table: &Table) -> TypedTable {
    let column_types = infer_column_types(table);
    let rows = table
        .data_rows()
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| match column_types.get(col) {
                    Some(ColumnType::Numeric) => match parse_number(cell) {
                        Some(n) => CellValue::Number(n),
                        None => CellValue::Text(cell.clone()),
                    },
                    _ => CellValue::Text(cell.clone()),
                })
                .collect()
        })
        .collect();

    TypedTable {
        header: table.header().map(<[String]>::to_vec).unwrap_or_default(),
        column_types,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn column(values: &[&str]) -> Table {
        let mut rows = vec![vec!["value".to_string()]];
        rows.extend(values.iter().map(|v| vec![v.to_string()]));
        Table::new(rows)
    }

    #[test]
    fn all_numeric_column_becomes_numeric() {
        let typed = coerce_table(&column(&["10", "20", "30"]));
        assert_eq!(typed.column_types, vec![ColumnType::Numeric]);
        assert_eq!(typed.rows[1], vec![CellValue::Number(20.0)]);
    }

    #[test]
    fn one_bad_cell_keeps_column_textual() {
        let typed = coerce_table(&column(&["10", "N/A", "30"]));
        assert_eq!(typed.column_types, vec![ColumnType::Text]);
        assert_eq!(typed.rows[0], vec![CellValue::Text("10".into())]);
    }

    #[test]
    fn header_is_not_part_of_inference() {
        let table = Table::new(vec![
            vec!["name".into(), "score".into()],
            vec!["a".into(), " 1.5 ".into()],
            vec!["b".into(), "-2".into()],
        ]);
        assert_eq!(
            infer_column_types(&table),
            vec![ColumnType::Text, ColumnType::Numeric]
        );
    }

    #[test]
    fn missing_cells_and_non_finite_values_stay_text() {
        let table = Table::new(vec![
            vec!["a".into(), "b".into()],
            vec!["1".into(), "inf".into()],
            vec!["2".into()],
        ]);
        assert_eq!(
            infer_column_types(&table),
            vec![ColumnType::Numeric, ColumnType::Text]
        );
    }

    #[test]
    fn header_only_table_has_text_columns() {
        let table = Table::new(vec![vec!["a".into(), "b".into()]]);
        assert_eq!(
            infer_column_types(&table),
            vec![ColumnType::Text, ColumnType::Text]
        );
        assert!(coerce_table(&table).rows.is_empty());
    }
}

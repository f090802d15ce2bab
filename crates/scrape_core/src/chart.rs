use crate::coerce::parse_number;
use crate::model::{ChartKind, Table};

/// What to plot: column 0 against column 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(String, f64)>,
}

/// Build a chart spec when the table has at least two columns.
///
/// Rows whose second cell is not a number are skipped.
pub fn chart_spec(table: &Table, kind: ChartKind) -> Option<ChartSpec> {
    if table.column_count() < 2 {
        return None;
    }
    let header = table.header().unwrap_or(&[]);
    let label = |idx: usize| {
        header
            .get(idx)
            .filter(|h| !h.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("column {}", idx + 1))
    };

    let points = table
        .data_rows()
        .iter()
        .filter_map(|row| {
            let x = row.first()?;
            let y = parse_number(row.get(1)?)?;
            Some((x.clone(), y))
        })
        .collect();

    Some(ChartSpec {
        kind,
        x_label: label(0),
        y_label: label(1),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_column_tables_get_no_chart() {
        let table = Table::new(vec![vec!["only".into()], vec!["1".into()]]);
        assert!(chart_spec(&table, ChartKind::Bar).is_none());
    }

    #[test]
    fn uses_first_two_columns_and_skips_non_numeric() {
        let table = Table::new(vec![
            vec!["city".into(), "".into(), "extra".into()],
            vec!["Oslo".into(), "12".into(), "x".into()],
            vec!["Rome".into(), "n/a".into()],
            vec!["Lima".into(), "7.5".into()],
        ]);
        let spec = chart_spec(&table, ChartKind::Line).unwrap();
        assert_eq!(spec.kind, ChartKind::Line);
        assert_eq!(spec.x_label, "city");
        assert_eq!(spec.y_label, "column 2");
        assert_eq!(
            spec.points,
            vec![("Oslo".to_string(), 12.0), ("Lima".to_string(), 7.5)]
        );
    }
}

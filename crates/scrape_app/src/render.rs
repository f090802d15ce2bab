use std::fmt::Write as _;

use scrape_core::{AppViewModel, ChartKind, ChartSpec, ColumnType, Notice, PreviewView};

const BAR_WIDTH: usize = 40;
const LINE_HEIGHT: usize = 8;

/// Plain-text rendering of the view model for stdout.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    match &view.preview {
        Some(PreviewView::Table {
            header,
            column_types,
            rows,
            total_rows,
        }) => {
            render_table(&mut out, header, column_types, rows);
            push_footer(&mut out, rows.len(), *total_rows, "rows");
        }
        Some(PreviewView::Text { items, total }) => {
            for (idx, item) in items.iter().enumerate() {
                let _ = writeln!(out, "{:>4}. {}", idx + 1, item);
            }
            push_footer(&mut out, items.len(), *total, "records");
        }
        Some(PreviewView::Images { urls, total }) => {
            for url in urls {
                let _ = writeln!(out, "{url}");
            }
            push_footer(&mut out, urls.len(), *total, "images");
        }
        None => {}
    }
    if let Some(chart) = &view.chart {
        out.push('\n');
        render_chart(&mut out, chart);
    }
    out
}

pub fn notice_line(notice: &Notice) -> String {
    match notice {
        Notice::Info(text) => text.clone(),
        Notice::Warning(text) => format!("warning: {text}"),
        Notice::Error(text) => format!("error: {text}"),
    }
}

fn push_footer(out: &mut String, shown: usize, total: usize, noun: &str) {
    if shown < total {
        let _ = writeln!(out, "(showing {shown} of {total} {noun})");
    } else {
        let _ = writeln!(out, "({total} {noun})");
    }
}

fn render_table(
    out: &mut String,
    header: &[String],
    column_types: &[ColumnType],
    rows: &[Vec<String>],
) {
    let columns = column_types
        .len()
        .max(header.len())
        .max(rows.iter().map(Vec::len).max().unwrap_or(0));
    if columns == 0 {
        return;
    }

    let mut widths = vec![0usize; columns];
    for row in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let numeric = |idx: usize| column_types.get(idx) == Some(&ColumnType::Numeric);
    let format_row = |cells: &[String]| {
        (0..columns)
            .map(|idx| {
                let cell = cells.get(idx).map(String::as_str).unwrap_or("");
                pad(cell, widths[idx], numeric(idx))
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    if !header.is_empty() {
        let _ = writeln!(out, "{}", format_row(header).trim_end());
        let rule = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-");
        let _ = writeln!(out, "{rule}");
    }
    for row in rows {
        let _ = writeln!(out, "{}", format_row(row).trim_end());
    }
}

fn pad(cell: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{cell:>width$}")
    } else {
        format!("{cell:<width$}")
    }
}

fn render_chart(out: &mut String, chart: &ChartSpec) {
    let _ = writeln!(out, "{} by {}", chart.y_label, chart.x_label);
    if chart.points.is_empty() {
        let _ = writeln!(out, "(no numeric values to plot)");
        return;
    }
    match chart.kind {
        ChartKind::Bar => render_bars(out, &chart.points),
        ChartKind::Line => render_line(out, &chart.points),
    }
}

fn render_bars(out: &mut String, points: &[(String, f64)]) {
    let label_width = points
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let peak = points
        .iter()
        .map(|(_, value)| value.abs())
        .fold(0.0_f64, f64::max);

    for (label, value) in points {
        let len = if peak > 0.0 {
            ((value.abs() / peak) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let glyph = if *value < 0.0 { "-" } else { "#" };
        let _ = writeln!(
            out,
            "{label:<label_width$} | {} {value}",
            glyph.repeat(len)
        );
    }
}

fn render_line(out: &mut String, points: &[(String, f64)]) {
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;
    let level = |value: f64| {
        if span > 0.0 {
            (((value - min) / span) * (LINE_HEIGHT - 1) as f64).round() as usize
        } else {
            0
        }
    };
    let levels: Vec<usize> = points.iter().map(|(_, v)| level(*v)).collect();

    for row in (0..LINE_HEIGHT).rev() {
        let axis = if row == LINE_HEIGHT - 1 {
            format!("{max:>10}")
        } else if row == 0 {
            format!("{min:>10}")
        } else {
            " ".repeat(10)
        };
        let marks: String = levels
            .iter()
            .map(|lvl| if *lvl == row { " *" } else { "  " })
            .collect();
        let _ = writeln!(out, "{axis} |{}", marks.trim_end());
    }
    let _ = writeln!(out, "{} +{}", " ".repeat(10), "--".repeat(points.len()));
    for (idx, (label, _)) in points.iter().enumerate() {
        let _ = writeln!(out, "{:>12} {label}", idx + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scrape_core::{DataKind, Phase};

    fn table_view(rows: Vec<Vec<String>>, total_rows: usize) -> AppViewModel {
        AppViewModel {
            phase: Phase::Done,
            kind: DataKind::Table,
            preview: Some(PreviewView::Table {
                header: vec!["City".into(), "Temp".into()],
                column_types: vec![ColumnType::Text, ColumnType::Numeric],
                rows,
                total_rows,
            }),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn numeric_columns_are_right_aligned() {
        let view = table_view(
            vec![
                vec!["Oslo".into(), "7".into()],
                vec!["Lima".into(), "19.5".into()],
            ],
            2,
        );
        assert_eq!(
            render(&view),
            "City | Temp\n-----+-----\nOslo |    7\nLima | 19.5\n(2 rows)\n"
        );
    }

    #[test]
    fn truncated_previews_say_how_much_is_hidden() {
        let view = AppViewModel {
            preview: Some(PreviewView::Text {
                items: vec!["first".into()],
                total: 3,
            }),
            ..AppViewModel::default()
        };
        assert_eq!(render(&view), "   1. first\n(showing 1 of 3 records)\n");
    }

    #[test]
    fn bar_chart_scales_to_the_largest_value() {
        let mut out = String::new();
        render_chart(
            &mut out,
            &ChartSpec {
                kind: ChartKind::Bar,
                x_label: "City".into(),
                y_label: "Temp".into(),
                points: vec![("A".into(), 10.0), ("B".into(), 5.0)],
            },
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Temp by City");
        assert_eq!(lines[1], format!("A | {} 10", "#".repeat(BAR_WIDTH)));
        assert_eq!(lines[2], format!("B | {} 5", "#".repeat(BAR_WIDTH / 2)));
    }

    #[test]
    fn line_chart_marks_extremes_on_top_and_bottom_rows() {
        let mut out = String::new();
        render_line(&mut out, &[("a".into(), 1.0), ("b".into(), 3.0)]);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].ends_with("|   *"));
        assert!(lines[LINE_HEIGHT - 1].ends_with("| *"));
        assert_eq!(lines.len(), LINE_HEIGHT + 1 + 2);
    }

    #[test]
    fn notices_carry_their_severity() {
        assert_eq!(
            notice_line(&Notice::Warning("Please enter a URL".into())),
            "warning: Please enter a URL"
        );
    }
}

use crate::chart::{chart_spec, ChartSpec};
use crate::coerce::{coerce_table, CellValue, ColumnType};
use crate::model::{DataKind, ExtractionResult};
use crate::state::{AppState, Notice, Phase};

pub const PREVIEW_ROWS: usize = 50;
pub const PREVIEW_IMAGES: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewView {
    Table {
        header: Vec<String>,
        column_types: Vec<ColumnType>,
        rows: Vec<Vec<String>>,
        total_rows: usize,
    },
    Text {
        items: Vec<String>,
        total: usize,
    },
    Images {
        urls: Vec<String>,
        total: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub kind: DataKind,
    pub notice: Option<Notice>,
    pub preview: Option<PreviewView>,
    pub chart: Option<ChartSpec>,
}

pub(crate) fn build(state: &AppState) -> AppViewModel {
    let options = state.options();
    let (preview, chart) = match state.result() {
        Some(ExtractionResult::Table(table)) => {
            let (column_types, rows) = if options.coerce_numeric {
                let typed = coerce_table(table);
                let rows = typed
                    .rows
                    .iter()
                    .take(PREVIEW_ROWS)
                    .map(|row| row.iter().map(CellValue::to_string).collect())
                    .collect();
                (typed.column_types, rows)
            } else {
                (
                    vec![ColumnType::Text; table.column_count()],
                    table.data_rows().iter().take(PREVIEW_ROWS).cloned().collect(),
                )
            };
            let preview = PreviewView::Table {
                header: table.header().map(<[String]>::to_vec).unwrap_or_default(),
                column_types,
                rows,
                total_rows: table.data_rows().len(),
            };
            (Some(preview), chart_spec(table, options.chart))
        }
        Some(ExtractionResult::Text(records)) => (
            Some(PreviewView::Text {
                items: records
                    .iter()
                    .take(PREVIEW_ROWS)
                    .map(|r| r.text.clone())
                    .collect(),
                total: records.len(),
            }),
            None,
        ),
        Some(ExtractionResult::Images(urls)) => (
            Some(PreviewView::Images {
                urls: urls.iter().take(PREVIEW_IMAGES).cloned().collect(),
                total: urls.len(),
            }),
            None,
        ),
        None => (None, None),
    };

    AppViewModel {
        phase: state.phase(),
        kind: state.kind(),
        notice: state.notice().cloned(),
        preview,
        chart,
    }
}

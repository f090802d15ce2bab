//! Scrape core: data model, best-effort transforms and the pure
//! interaction state machine.
mod chart;
mod coerce;
mod effect;
mod filter;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use chart::{chart_spec, ChartSpec};
pub use coerce::{coerce_table, infer_column_types, parse_number, CellValue, ColumnType, TypedTable};
pub use effect::Effect;
pub use filter::{date_needle, filter_by_date, filter_table};
pub use model::{
    ChartKind, DataKind, ExtractionOptions, ExtractionRequest, ExtractionResult, FailureKind,
    ImageFilter, ScrapeFailure, Table, TextMeta, TextRecord, IMAGES_HEADER, TEXT_HEADER,
    TEXT_META_HEADER,
};
pub use msg::Msg;
pub use state::{AppState, Notice, Phase};
pub use update::{update, MISSING_URL_NOTICE};
pub use view_model::{AppViewModel, PreviewView, PREVIEW_IMAGES, PREVIEW_ROWS};

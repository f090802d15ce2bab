//! Scrape engine: fetch, decode, extract and export.
mod decode;
mod document;
mod engine;
mod export;
mod extract;
mod fetch;
mod persist;
mod types;

pub use decode::{decode_html, DecodedHtml};
pub use document::{visible_text, Document};
pub use engine::{ScrapeEngine, ScrapeError};
pub use export::{
    export_csv, export_workbook, parse_csv, sheet_name, to_csv_string, write_rows, ExportError,
    Sheet, WorkbookSummary, MAX_SHEET_NAME, WORKBOOK_DIR, WORKBOOK_MANIFEST,
};
pub use extract::{extract_html, Clock, ExtractError, Extractor, SelectorExtractor};
pub use fetch::{
    FetchSettings, NullSink, PageSource, ProgressSink, ReqwestFetcher, BROWSER_USER_AGENT,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    FetchError, FetchFailureKind, FetchMetadata, FetchOutput, ProgressEvent, ScrapeOutcome, Stage,
};

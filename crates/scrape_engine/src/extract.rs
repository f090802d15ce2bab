use std::sync::Arc;

use chrono::{DateTime, Utc};
use scrape_core::{
    DataKind, ExtractionRequest, ExtractionResult, ImageFilter, Table, TextMeta, TextRecord,
};
use scrape_logging::{scrape_debug, scrape_trace};
use scraper::ElementRef;

use crate::document::{parse_selector, visible_text, Document};

const DEFAULT_TABLE_SELECTOR: &str = "table";
const DEFAULT_TEXT_SELECTOR: &str = "p";
const DEFAULT_IMAGE_SELECTOR: &str = "img";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no {kind} data matched {selector:?}")]
    EmptyResult { kind: DataKind, selector: String },
    #[error("{}", missing_table_message(.selector))]
    MissingTable { selector: Option<String> },
}

fn missing_table_message(selector: &Option<String>) -> String {
    match selector {
        Some(sel) => format!("no table-like element matches {sel:?}"),
        None => "no <table> element in document".to_string(),
    }
}

pub trait Extractor: Send + Sync {
    fn extract(
        &self,
        document: &Document,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResult, ExtractError>;
}

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Selector-driven extractor covering the table, text and image kinds.
///
/// Without a selector each kind falls back to its default: the first
/// `<table>`, every `<p>`, every `<img>`.
#[derive(Clone)]
pub struct SelectorExtractor {
    clock: Clock,
}

impl Default for SelectorExtractor {
    fn default() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }
}

impl SelectorExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock used to stamp text records when metadata is requested.
    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }

    fn extract_table(
        &self,
        document: &Document,
        selector: Option<&str>,
    ) -> Result<ExtractionResult, ExtractError> {
        let missing = || ExtractError::MissingTable {
            selector: selector.map(str::to_string),
        };
        let table_el = document
            .select_first(selector.unwrap_or(DEFAULT_TABLE_SELECTOR))
            .ok_or_else(missing)?;

        let row_sel = parse_selector("tr").ok_or_else(missing)?;
        let row_elements: Vec<ElementRef<'_>> = table_el.select(&row_sel).collect();
        if row_elements.is_empty() {
            return Err(missing());
        }

        let rows: Vec<Vec<String>> = row_elements
            .into_iter()
            .map(table_cells)
            .filter(|cells| !cells.iter().all(String::is_empty))
            .collect();
        scrape_debug!("table: {} rows with text", rows.len());

        if rows.is_empty() {
            return Err(ExtractError::EmptyResult {
                kind: DataKind::Table,
                selector: selector.unwrap_or(DEFAULT_TABLE_SELECTOR).to_string(),
            });
        }
        Ok(ExtractionResult::Table(Table::new(rows)))
    }

    fn extract_text(
        &self,
        document: &Document,
        selector: &str,
        with_meta: bool,
    ) -> Vec<TextRecord> {
        let texts = document
            .select_all(selector)
            .into_iter()
            .map(visible_text)
            .filter(|text| !text.is_empty());

        if !with_meta {
            return texts.map(TextRecord::plain).collect();
        }

        let extracted_at = (self.clock)();
        texts
            .enumerate()
            .map(|(idx, text)| TextRecord {
                meta: Some(TextMeta {
                    id: idx + 1,
                    length: text.chars().count(),
                    extracted_at,
                }),
                text,
            })
            .collect()
    }

    fn extract_images(&self, document: &Document, selector: &str, filter: ImageFilter) -> Vec<String> {
        document
            .select_all(selector)
            .into_iter()
            .filter_map(|el| el.value().attr("src"))
            .filter_map(|src| {
                let kept = filter.apply(src);
                if kept.is_none() {
                    scrape_trace!("dropping image src {:?}", src);
                }
                kept
            })
            .collect()
    }
}

impl Extractor for SelectorExtractor {
    fn extract(
        &self,
        document: &Document,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResult, ExtractError> {
        let selector = request.selector();
        let kind = request.requested_kind;

        let result = match kind {
            DataKind::Table => return self.extract_table(document, selector),
            DataKind::Text => ExtractionResult::Text(self.extract_text(
                document,
                selector.unwrap_or(DEFAULT_TEXT_SELECTOR),
                request.options.text_metadata,
            )),
            DataKind::Images => ExtractionResult::Images(self.extract_images(
                document,
                selector.unwrap_or(DEFAULT_IMAGE_SELECTOR),
                request.options.image_filter,
            )),
        };

        if result.is_empty() {
            let default = match kind {
                DataKind::Text => DEFAULT_TEXT_SELECTOR,
                _ => DEFAULT_IMAGE_SELECTOR,
            };
            return Err(ExtractError::EmptyResult {
                kind,
                selector: selector.unwrap_or(default).to_string(),
            });
        }
        Ok(result)
    }
}

/// Header and data cells that are direct children of the row.
fn table_cells(row: ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .map(visible_text)
        .collect()
}

/// Parse `html` and run the default extractor in one step.
pub fn extract_html(html: &str, request: &ExtractionRequest) -> Result<ExtractionResult, ExtractError> {
    SelectorExtractor::new().extract(&Document::parse(html), request)
}

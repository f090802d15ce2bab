use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// What the user asked to pull out of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    #[default]
    Table,
    Text,
    Images,
}

impl DataKind {
    /// Filename used when the result is exported without an explicit name.
    pub fn default_csv_name(self) -> &'static str {
        match self {
            DataKind::Table => "data.csv",
            DataKind::Text => "text.csv",
            DataKind::Images => "images.csv",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::Table => write!(f, "table"),
            DataKind::Text => write!(f, "text"),
            DataKind::Images => write!(f, "images"),
        }
    }
}

/// Which `src` values survive image extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFilter {
    /// Any non-empty `src`.
    #[default]
    Lenient,
    /// Only `http://` and `https://` URLs.
    Strict,
}

impl ImageFilter {
    pub fn accepts(self, src: &str) -> bool {
        match self {
            ImageFilter::Lenient => !src.trim().is_empty(),
            ImageFilter::Strict => has_http_scheme(src.trim()),
        }
    }

    /// The trimmed `src` if it is kept. Strict mode lowercases the scheme so
    /// every kept URL starts with `http`.
    pub fn apply(self, src: &str) -> Option<String> {
        let src = src.trim();
        if !self.accepts(src) {
            return None;
        }
        match self {
            ImageFilter::Lenient => Some(src.to_string()),
            ImageFilter::Strict => {
                let (scheme, rest) = src.split_once(':')?;
                Some(format!("{}:{rest}", scheme.to_ascii_lowercase()))
            }
        }
    }
}

fn has_http_scheme(url: &str) -> bool {
    let lower = url
        .get(..8)
        .unwrap_or(url)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
}

/// Knobs shared by every extraction kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    /// Keep only records whose text contains this date as `YYYY-MM-DD`.
    pub date_filter: Option<NaiveDate>,
    /// Best-effort numeric reinterpretation of table columns.
    pub coerce_numeric: bool,
    pub image_filter: ImageFilter,
    /// Attach id, length and timestamp to each text record.
    pub text_metadata: bool,
    pub chart: ChartKind,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            date_filter: None,
            coerce_numeric: true,
            image_filter: ImageFilter::Lenient,
            text_metadata: false,
            chart: ChartKind::Bar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub url: String,
    pub target_selector: Option<String>,
    pub requested_kind: DataKind,
    pub options: ExtractionOptions,
}

impl ExtractionRequest {
    pub fn new(url: impl Into<String>, requested_kind: DataKind) -> Self {
        Self {
            url: url.into(),
            target_selector: None,
            requested_kind,
            options: ExtractionOptions::default(),
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.target_selector = Some(selector.into());
        self
    }

    pub fn with_options(mut self, options: ExtractionOptions) -> Self {
        self.options = options;
        self
    }

    /// The selector, if one was given and is not just whitespace.
    pub fn selector(&self) -> Option<&str> {
        self.target_selector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Rows of string cells. Row 0 is treated as the header purely by position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Widest row, so ragged tables still get every column.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMeta {
    /// 1-based position among the kept records.
    pub id: usize,
    /// Length in characters.
    pub length: usize,
    pub extracted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub text: String,
    pub meta: Option<TextMeta>,
}

impl TextRecord {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meta: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Table(Table),
    Text(Vec<TextRecord>),
    Images(Vec<String>),
}

pub const TEXT_HEADER: &str = "Text";
pub const TEXT_META_HEADER: [&str; 4] = ["ID", "Text", "Length", "Extracted At"];
pub const IMAGES_HEADER: &str = "Image URL";

impl ExtractionResult {
    pub fn kind(&self) -> DataKind {
        match self {
            ExtractionResult::Table(_) => DataKind::Table,
            ExtractionResult::Text(_) => DataKind::Text,
            ExtractionResult::Images(_) => DataKind::Images,
        }
    }

    /// Number of records; for tables this counts data rows only.
    pub fn len(&self) -> usize {
        match self {
            ExtractionResult::Table(table) => table.data_rows().len(),
            ExtractionResult::Text(records) => records.len(),
            ExtractionResult::Images(urls) => urls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ExtractionResult::Table(table) => table.rows.is_empty(),
            _ => self.len() == 0,
        }
    }

    /// Header-first rows in the shape every export target consumes.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        match self {
            ExtractionResult::Table(table) => table.rows.clone(),
            ExtractionResult::Text(records) => {
                let with_meta = records.iter().any(|r| r.meta.is_some());
                let mut rows = Vec::with_capacity(records.len() + 1);
                if with_meta {
                    rows.push(TEXT_META_HEADER.iter().map(|h| h.to_string()).collect());
                    for record in records {
                        rows.push(match &record.meta {
                            Some(meta) => vec![
                                meta.id.to_string(),
                                record.text.clone(),
                                meta.length.to_string(),
                                meta.extracted_at.to_rfc3339(),
                            ],
                            None => vec![
                                String::new(),
                                record.text.clone(),
                                record.text.chars().count().to_string(),
                                String::new(),
                            ],
                        });
                    }
                } else {
                    rows.push(vec![TEXT_HEADER.to_string()]);
                    rows.extend(records.iter().map(|r| vec![r.text.clone()]));
                }
                rows
            }
            ExtractionResult::Images(urls) => {
                let mut rows = Vec::with_capacity(urls.len() + 1);
                rows.push(vec![IMAGES_HEADER.to_string()]);
                rows.extend(urls.iter().map(|u| vec![u.clone()]));
                rows
            }
        }
    }
}

/// The three ways an interaction can end without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Fetch,
    EmptyResult,
    MissingTable,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Fetch => write!(f, "fetch failed"),
            FailureKind::EmptyResult => write!(f, "no matching data"),
            FailureKind::MissingTable => write!(f, "no table found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ScrapeFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScrapeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_filter_requires_http_scheme() {
        assert!(ImageFilter::Strict.accepts("https://cdn.example.com/a.png"));
        assert!(ImageFilter::Strict.accepts("HTTP://example.com/b.gif"));
        assert!(!ImageFilter::Strict.accepts("/static/a.png"));
        assert!(!ImageFilter::Strict.accepts("data:image/png;base64,AAAA"));
        assert!(!ImageFilter::Strict.accepts("httpfoo"));
    }

    #[test]
    fn strict_filter_normalizes_scheme_case() {
        assert_eq!(
            ImageFilter::Strict.apply(" HTTPS://Example.com/A.png ").as_deref(),
            Some("https://Example.com/A.png")
        );
        assert_eq!(ImageFilter::Strict.apply("/a.png"), None);
        assert_eq!(
            ImageFilter::Lenient.apply(" /a.png ").as_deref(),
            Some("/a.png")
        );
    }

    #[test]
    fn lenient_filter_keeps_any_non_blank_src() {
        assert!(ImageFilter::Lenient.accepts("/static/a.png"));
        assert!(ImageFilter::Lenient.accepts("data:image/png;base64,AAAA"));
        assert!(!ImageFilter::Lenient.accepts("   "));
    }

    #[test]
    fn blank_selector_counts_as_absent() {
        let req = ExtractionRequest::new("https://example.com", DataKind::Text).with_selector("  ");
        assert_eq!(req.selector(), None);
        let req = req.with_selector(" div.price ");
        assert_eq!(req.selector(), Some("div.price"));
    }

    #[test]
    fn table_splits_header_from_data() {
        let table = Table::new(vec![
            vec!["a".into(), "b".into()],
            vec!["1".into(), "2".into()],
            vec!["3".into()],
        ]);
        assert_eq!(table.header(), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(table.data_rows().len(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(Table::default().data_rows().len(), 0);
    }

    #[test]
    fn text_rows_include_header() {
        let result = ExtractionResult::Text(vec![TextRecord::plain("one"), TextRecord::plain("two")]);
        assert_eq!(
            result.to_rows(),
            vec![vec!["Text".to_string()], vec!["one".into()], vec!["two".into()]]
        );
        assert_eq!(result.len(), 2);
    }
}

use std::sync::Arc;

use scrape_core::{filter_by_date, ExtractionRequest, ExtractionResult, FailureKind, ScrapeFailure};
use scrape_logging::{scrape_info, scrape_warn};

use crate::decode::decode_html;
use crate::document::Document;
use crate::extract::{ExtractError, Extractor, SelectorExtractor};
use crate::fetch::{FetchSettings, PageSource, ProgressSink, ReqwestFetcher};
use crate::{FetchError, ProgressEvent, ScrapeOutcome, Stage};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScrapeError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("{message}")]
    EmptyResult { message: String },
    #[error("{message}")]
    MissingTable { message: String },
}

impl From<ExtractError> for ScrapeError {
    fn from(err: ExtractError) -> Self {
        let message = err.to_string();
        match err {
            ExtractError::EmptyResult { .. } => ScrapeError::EmptyResult { message },
            ExtractError::MissingTable { .. } => ScrapeError::MissingTable { message },
        }
    }
}

impl ScrapeError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ScrapeError::Fetch(_) => FailureKind::Fetch,
            ScrapeError::EmptyResult { .. } => FailureKind::EmptyResult,
            ScrapeError::MissingTable { .. } => FailureKind::MissingTable,
        }
    }

    /// Display form handed to the interaction state.
    pub fn to_failure(&self) -> ScrapeFailure {
        let message = match self {
            ScrapeError::Fetch(err) => err.to_string(),
            ScrapeError::EmptyResult { message } | ScrapeError::MissingTable { message } => {
                message.clone()
            }
        };
        ScrapeFailure::new(self.failure_kind(), message)
    }
}

/// Fetch, decode, parse, extract and filter, one request at a time.
///
/// When the lightweight source fails and a fallback source is configured,
/// the whole sequence is repeated once through the fallback.
#[derive(Clone)]
pub struct ScrapeEngine {
    primary: Arc<dyn PageSource>,
    fallback: Option<Arc<dyn PageSource>>,
    extractor: Arc<dyn Extractor>,
}

impl ScrapeEngine {
    pub fn new(settings: FetchSettings) -> Self {
        Self::with_source(Arc::new(ReqwestFetcher::new(settings)))
    }

    pub fn with_source(primary: Arc<dyn PageSource>) -> Self {
        Self {
            primary,
            fallback: None,
            extractor: Arc::new(SelectorExtractor::new()),
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn PageSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub async fn run(
        &self,
        request: &ExtractionRequest,
        sink: &dyn ProgressSink,
    ) -> Result<ScrapeOutcome, ScrapeError> {
        scrape_info!(
            "scrape url={} kind={} selector={:?}",
            request.url,
            request.requested_kind,
            request.selector()
        );

        let first = self.run_with(self.primary.as_ref(), request, sink).await;
        let outcome = match (first, &self.fallback) {
            (Ok(outcome), _) => outcome,
            (Err(err), None) => return Err(err),
            (Err(err), Some(fallback)) => {
                scrape_warn!(
                    "{} source failed ({}); retrying through {}",
                    self.primary.name(),
                    err,
                    fallback.name()
                );
                let mut outcome = self.run_with(fallback.as_ref(), request, sink).await?;
                outcome.used_fallback = true;
                outcome
            }
        };

        sink.emit(ProgressEvent {
            stage: Stage::Done,
            bytes: None,
            source: if outcome.used_fallback {
                self.fallback.as_ref().map_or("fallback", |f| f.name())
            } else {
                self.primary.name()
            },
        });
        scrape_info!(
            "scrape done: {} {} records from {}",
            outcome.result.len(),
            outcome.result.kind(),
            outcome.final_url
        );
        Ok(outcome)
    }

    async fn run_with(
        &self,
        source: &dyn PageSource,
        request: &ExtractionRequest,
        sink: &dyn ProgressSink,
    ) -> Result<ScrapeOutcome, ScrapeError> {
        let fetched = source.fetch(&request.url, sink).await?;
        let emit = |stage: Stage| {
            sink.emit(ProgressEvent {
                stage,
                bytes: None,
                source: source.name(),
            })
        };

        emit(Stage::Decoding);
        let decoded = decode_html(&fetched.bytes, fetched.metadata.content_type.as_deref());

        let result = self.extract_decoded(&decoded.html, request, &emit)?;

        Ok(ScrapeOutcome {
            result,
            final_url: fetched.metadata.final_url,
            bytes_fetched: fetched.metadata.byte_len,
            encoding: decoded.encoding_label,
            used_fallback: false,
        })
    }

    /// Synchronous tail of the pipeline; the parsed document never crosses an await.
    fn extract_decoded(
        &self,
        html: &str,
        request: &ExtractionRequest,
        emit: &dyn Fn(Stage),
    ) -> Result<ExtractionResult, ScrapeError> {
        emit(Stage::Parsing);
        let document = Document::parse(html);

        emit(Stage::Extracting);
        let result = self.extractor.extract(&document, request)?;

        match request.options.date_filter {
            Some(date) => {
                emit(Stage::Filtering);
                Ok(filter_by_date(result, date))
            }
            None => Ok(result),
        }
    }
}

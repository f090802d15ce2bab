use crate::model::ExtractionRequest;

/// Work the host must perform on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the page and run the extractor, then report back with
    /// [`crate::Msg::ScrapeFinished`].
    Scrape(ExtractionRequest),
}

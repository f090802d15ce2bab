use chrono::NaiveDate;

use crate::model::{DataKind, ExtractionOptions, ExtractionResult, ScrapeFailure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL field.
    UrlChanged(String),
    /// User edited the optional selector field.
    SelectorChanged(String),
    /// User picked table, text or images.
    KindSelected(DataKind),
    /// User set or cleared the date filter.
    DateFilterChanged(Option<NaiveDate>),
    /// Replace every extraction option at once.
    OptionsChanged(ExtractionOptions),
    /// User pressed Run.
    RunClicked,
    /// Host finished the scrape effect.
    ScrapeFinished(Result<ExtractionResult, ScrapeFailure>),
    /// Message that changes nothing.
    NoOp,
}

use url::Url;

use crate::state::{Notice, Phase};
use crate::{AppState, Effect, Msg};

pub const MISSING_URL_NOTICE: &str = "Please enter a URL";

/// Apply one message and return the effects the host must run.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(url) => {
            state.set_url(url);
            Vec::new()
        }
        Msg::SelectorChanged(selector) => {
            state.set_selector(selector);
            Vec::new()
        }
        Msg::KindSelected(kind) => {
            state.set_kind(kind);
            Vec::new()
        }
        Msg::DateFilterChanged(date) => {
            state.options_mut().date_filter = date;
            Vec::new()
        }
        Msg::OptionsChanged(options) => {
            *state.options_mut() = options;
            Vec::new()
        }
        Msg::RunClicked => {
            // Runs never overlap; a second click while fetching is dropped.
            if state.phase() == Phase::Running {
                return (state, Vec::new());
            }
            match validate_url(state.url()) {
                Err(notice) => {
                    state.set_notice(notice);
                    Vec::new()
                }
                Ok(()) => vec![Effect::Scrape(state.begin_run())],
            }
        }
        Msg::ScrapeFinished(outcome) => {
            if state.phase() != Phase::Running {
                return (state, Vec::new());
            }
            match outcome {
                Ok(result) => state.finish_ok(result),
                Err(failure) => state.finish_err(failure.to_string()),
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn validate_url(raw: &str) -> Result<(), Notice> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Notice::Warning(MISSING_URL_NOTICE.to_string()));
    }
    let parsed = Url::parse(raw).map_err(|err| Notice::Error(format!("invalid url: {err}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Notice::Error(format!("unsupported url scheme: {other}"))),
    }
}

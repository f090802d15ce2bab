use crate::model::{DataKind, ExtractionOptions, ExtractionRequest, ExtractionResult};
use crate::view_model::{self, AppViewModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Done,
    Failed,
}

/// User-visible message attached to the last interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

/// Form fields plus the outcome of the last run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    url: String,
    selector: String,
    kind: DataKind,
    options: ExtractionOptions,
    phase: Phase,
    result: Option<ExtractionResult>,
    notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    pub fn result(&self) -> Option<&ExtractionResult> {
        self.result.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_url(&mut self, url: String) {
        self.url = url;
        self.mark_dirty();
    }

    pub(crate) fn set_selector(&mut self, selector: String) {
        self.selector = selector;
        self.mark_dirty();
    }

    pub(crate) fn set_kind(&mut self, kind: DataKind) {
        self.kind = kind;
        self.mark_dirty();
    }

    pub(crate) fn options_mut(&mut self) -> &mut ExtractionOptions {
        self.mark_dirty();
        &mut self.options
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    /// Snapshot the form into a request and enter `Running`.
    pub(crate) fn begin_run(&mut self) -> ExtractionRequest {
        self.phase = Phase::Running;
        self.result = None;
        self.notice = None;
        self.mark_dirty();

        let selector = self.selector.trim();
        ExtractionRequest {
            url: self.url.trim().to_string(),
            target_selector: (!selector.is_empty()).then(|| selector.to_string()),
            requested_kind: self.kind,
            options: self.options.clone(),
        }
    }

    pub(crate) fn finish_ok(&mut self, result: ExtractionResult) {
        self.phase = Phase::Done;
        self.result = Some(result);
        self.mark_dirty();
    }

    pub(crate) fn finish_err(&mut self, message: String) {
        self.phase = Phase::Failed;
        self.result = None;
        self.notice = Some(Notice::Error(message));
        self.mark_dirty();
    }
}

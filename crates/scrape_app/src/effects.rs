use scrape_core::{Effect, ExtractionRequest, Msg};
use scrape_engine::{ProgressEvent, ProgressSink, ScrapeEngine, ScrapeError, ScrapeOutcome};
use scrape_logging::{scrape_debug, scrape_info, scrape_warn};
use tokio::runtime::{Builder, Runtime};

/// Executes effects produced by `update` and turns their outcome back into messages.
pub struct EffectRunner {
    engine: ScrapeEngine,
    runtime: Runtime,
}

impl EffectRunner {
    pub fn new(engine: ScrapeEngine) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { engine, runtime })
    }

    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        effects
            .into_iter()
            .map(|effect| match effect {
                Effect::Scrape(request) => {
                    scrape_info!(
                        "Scrape url_len={} kind={} url={}",
                        request.url.len(),
                        request.requested_kind,
                        request.url
                    );
                    let finished = self.scrape(&request).map(|outcome| outcome.result);
                    Msg::ScrapeFinished(finished.map_err(|err| {
                        scrape_warn!("Scrape of {} failed: {}", request.url, err);
                        err.to_failure()
                    }))
                }
            })
            .collect()
    }

    /// Run one request to completion outside the state machine.
    pub fn scrape(&self, request: &ExtractionRequest) -> Result<ScrapeOutcome, ScrapeError> {
        self.runtime.block_on(self.engine.run(request, &LogSink))
    }
}

struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, event: ProgressEvent) {
        match event.bytes {
            Some(bytes) => scrape_debug!("[{}] {:?} {} bytes", event.source, event.stage, bytes),
            None => scrape_debug!("[{}] {:?}", event.source, event.stage),
        }
    }
}

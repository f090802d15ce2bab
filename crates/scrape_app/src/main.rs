mod cli;
mod effects;
mod logging;
mod render;
mod settings;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use scrape_core::{update, AppState, ExtractionRequest, ExtractionResult, Msg, Notice, Phase};
use scrape_engine::{ensure_output_dir, export_csv, export_workbook, ScrapeEngine, Sheet};
use scrape_logging::{level_from_verbosity, scrape_info, scrape_warn};

use crate::cli::{Cli, SheetSpec};
use crate::effects::EffectRunner;
use crate::logging::LogDestination;
use crate::settings::Settings;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let destination = if cli.log_file {
        LogDestination::TerminalAndFile
    } else {
        LogDestination::Terminal
    };
    logging::initialize(destination, level_from_verbosity(cli.verbose));

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    cli.apply_to(&mut settings);

    let runner = EffectRunner::new(ScrapeEngine::new(settings.fetch_settings()))
        .context("failed to start async runtime")?;

    let mut state = AppState::new();
    let mut inbox = vec![
        Msg::UrlChanged(cli.url.clone()),
        Msg::SelectorChanged(cli.selector.clone().unwrap_or_default()),
        Msg::KindSelected(cli.kind.into()),
        Msg::OptionsChanged(settings.extraction.clone()),
        Msg::RunClicked,
    ];
    while !inbox.is_empty() {
        for msg in std::mem::take(&mut inbox) {
            let (next, effects) = update(state, msg);
            state = next;
            inbox.extend(runner.run(effects));
        }
    }

    let view = state.view();
    if let Some(notice) = &view.notice {
        eprintln!("{}", render::notice_line(notice));
    }
    if state.phase() != Phase::Done || matches!(view.notice, Some(Notice::Warning(_))) {
        return Ok(ExitCode::FAILURE);
    }
    if state.consume_dirty() {
        print!("{}", render::render(&view));
    }

    let Some(result) = state.result() else {
        return Ok(ExitCode::FAILURE);
    };
    if !cli.no_export {
        export(cli, &settings, &runner, state.url(), result)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn export(
    cli: &Cli,
    settings: &Settings,
    runner: &EffectRunner,
    url: &str,
    result: &ExtractionResult,
) -> anyhow::Result<()> {
    let dir = settings.output_dir.as_path();
    ensure_output_dir(dir)?;

    let path = export_csv(dir, cli.csv.as_deref(), result)?;
    eprintln!("wrote {}", path.display());

    if cli.workbook {
        let extras = scrape_extra_sheets(runner, url, settings, &cli.sheets);
        let primary_name = result.kind().to_string();
        let mut sheets = vec![Sheet {
            name: &primary_name,
            result,
        }];
        sheets.extend(extras.iter().map(|(spec, result)| Sheet {
            name: &spec.name,
            result,
        }));
        let summary = export_workbook(dir, &sheets)?;
        eprintln!(
            "wrote workbook {} ({} sheets)",
            summary.manifest_path.display(),
            summary.sheet_names.len()
        );
    }
    Ok(())
}

/// Sheets whose scrape fails are logged and left out of the workbook.
fn scrape_extra_sheets<'a>(
    runner: &EffectRunner,
    url: &str,
    settings: &Settings,
    specs: &'a [SheetSpec],
) -> Vec<(&'a SheetSpec, ExtractionResult)> {
    specs
        .iter()
        .filter_map(|spec| {
            let mut request =
                ExtractionRequest::new(url, spec.kind).with_options(settings.extraction.clone());
            if let Some(selector) = &spec.selector {
                request = request.with_selector(selector.as_str());
            }
            match runner.scrape(&request) {
                Ok(outcome) => {
                    scrape_info!("sheet {:?}: {} records", spec.name, outcome.result.len());
                    Some((spec, outcome.result))
                }
                Err(err) => {
                    scrape_warn!("sheet {:?} skipped: {}", spec.name, err);
                    eprintln!("warning: sheet {:?} skipped: {err}", spec.name);
                    None
                }
            }
        })
        .collect()
}

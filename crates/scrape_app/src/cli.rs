use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, ValueEnum};
use scrape_core::{ChartKind, DataKind, ExtractionOptions, ImageFilter};

use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "scrape",
    version,
    about = "Fetch a page and pull out a table, text or images as CSV"
)]
pub struct Cli {
    /// Page to fetch.
    pub url: String,

    /// CSS selector; defaults to the first table, every <p> or every <img>.
    #[arg(short, long)]
    pub selector: Option<String>,

    /// What to extract.
    #[arg(short, long, value_enum, default_value_t = KindArg::Table)]
    pub kind: KindArg,

    /// Keep only records containing this date (YYYY-MM-DD) as text.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Chart drawn under a table with two or more columns.
    #[arg(long, value_enum)]
    pub chart: Option<ChartArg>,

    /// Only keep image URLs with an http(s) scheme.
    #[arg(long)]
    pub strict_images: bool,

    /// Attach id, length and timestamp to each text record.
    #[arg(long)]
    pub text_metadata: bool,

    /// Leave every table column as text.
    #[arg(long)]
    pub no_coerce: bool,

    /// Directory for exported files.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// CSV filename; defaults to data.csv, text.csv or images.csv.
    #[arg(long)]
    pub csv: Option<String>,

    /// Print the result without writing any file.
    #[arg(long, conflicts_with_all = ["csv", "workbook"])]
    pub no_export: bool,

    /// Also write a multi-sheet workbook holding this result and every --sheet.
    #[arg(long)]
    pub workbook: bool,

    /// Extra workbook sheet as NAME=KIND or NAME=KIND:SELECTOR (repeatable).
    #[arg(long = "sheet", requires = "workbook")]
    pub sheets: Vec<SheetSpec>,

    /// RON settings file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Increase log verbosity (pass twice for TRACE).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to ./scrape.log.
    #[arg(long)]
    pub log_file: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Table,
    Text,
    Images,
}

impl From<KindArg> for DataKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Table => DataKind::Table,
            KindArg::Text => DataKind::Text,
            KindArg::Images => DataKind::Images,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ChartArg {
    Bar,
    Line,
}

impl From<ChartArg> for ChartKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Bar => ChartKind::Bar,
            ChartArg::Line => ChartKind::Line,
        }
    }
}

/// A named extra extraction for the workbook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetSpec {
    pub name: String,
    pub kind: DataKind,
    pub selector: Option<String>,
}

impl FromStr for SheetSpec {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (name, rest) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=KIND[:SELECTOR], got {raw:?}"))?;
        let (kind, selector) = match rest.split_once(':') {
            Some((kind, selector)) => (kind, Some(selector.trim().to_string())),
            None => (rest, None),
        };
        let kind = KindArg::from_str(kind.trim(), true)?;
        Ok(Self {
            name: name.trim().to_string(),
            kind: kind.into(),
            selector: selector.filter(|s| !s.is_empty()),
        })
    }
}

impl Cli {
    /// Layer command-line flags over the loaded settings.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(dir) = &self.output {
            settings.output_dir = dir.clone();
        }
        if let Some(secs) = self.timeout {
            settings.timeout_secs = secs;
        }
        let options: &mut ExtractionOptions = &mut settings.extraction;
        if self.date.is_some() {
            options.date_filter = self.date;
        }
        if let Some(chart) = self.chart {
            options.chart = chart.into();
        }
        if self.strict_images {
            options.image_filter = ImageFilter::Strict;
        }
        if self.text_metadata {
            options.text_metadata = true;
        }
        if self.no_coerce {
            options.coerce_numeric = false;
        }
    }
}

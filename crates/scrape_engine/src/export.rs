use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use scrape_core::ExtractionResult;
use scrape_logging::scrape_info;
use serde_json::json;

use crate::persist::{AtomicFileWriter, PersistError};

/// Longest sheet name spreadsheet applications accept.
pub const MAX_SHEET_NAME: usize = 31;
pub const WORKBOOK_MANIFEST: &str = "workbook.json";
/// Subdirectory of the output directory holding the workbook, so sheet files
/// never collide with a single-result CSV written next to it.
pub const WORKBOOK_DIR: &str = "workbook";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("workbook has no sheets")]
    NoSheets,
}

/// One named result destined for a workbook.
#[derive(Debug, Clone, Copy)]
pub struct Sheet<'a> {
    pub name: &'a str,
    pub result: &'a ExtractionResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookSummary {
    pub sheet_names: Vec<String>,
    pub sheet_paths: Vec<PathBuf>,
    pub manifest_path: PathBuf,
}

/// Write header-first rows as CSV. Rows may differ in length.
pub fn write_rows<W: io::Write>(writer: W, rows: &[Vec<String>]) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(result: &ExtractionResult) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_rows(&mut buffer, &result.to_rows())?;
    Ok(String::from_utf8(buffer)?)
}

/// Read CSV text back into rows, header included.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>, ExportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for record in rdr.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

pub fn export_csv(
    dir: &Path,
    filename: Option<&str>,
    result: &ExtractionResult,
) -> Result<PathBuf, ExportError> {
    let filename = filename.unwrap_or_else(|| result.kind().default_csv_name());
    let content = to_csv_string(result)?;
    let path = AtomicFileWriter::new(dir).write(filename, content)?;
    scrape_info!("exported {} {} records to {:?}", result.len(), result.kind(), path);
    Ok(path)
}

/// Write several named results side by side under `dir/workbook/`: one CSV
/// per sheet plus a `workbook.json` manifest describing them.
pub fn export_workbook(dir: &Path, sheets: &[Sheet<'_>]) -> Result<WorkbookSummary, ExportError> {
    if sheets.is_empty() {
        return Err(ExportError::NoSheets);
    }

    let dir = dir.join(WORKBOOK_DIR);
    let writer = AtomicFileWriter::new(&dir);
    let mut taken = HashSet::new();
    let mut sheet_names = Vec::with_capacity(sheets.len());
    let mut sheet_paths = Vec::with_capacity(sheets.len());
    let mut entries = Vec::with_capacity(sheets.len());

    for (idx, sheet) in sheets.iter().enumerate() {
        let name = unique_sheet_name(sheet.name, idx + 1, &mut taken);
        let file = format!("{name}.csv");
        let path = writer.write(&file, to_csv_string(sheet.result)?)?;
        entries.push(json!({
            "name": name,
            "file": file,
            "kind": sheet.result.kind().to_string(),
            "records": sheet.result.len(),
        }));
        sheet_names.push(name);
        sheet_paths.push(path);
    }

    let manifest = json!({
        "sheet_count": entries.len(),
        "sheets": entries,
    });
    let manifest_path = writer.write(WORKBOOK_MANIFEST, manifest.to_string())?;
    scrape_info!("exported workbook with {} sheets to {:?}", sheet_names.len(), dir);

    Ok(WorkbookSummary {
        sheet_names,
        sheet_paths,
        manifest_path,
    })
}

/// Sanitize and truncate a sheet name to [`MAX_SHEET_NAME`] characters.
pub fn sheet_name(raw: &str, position: usize) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.', '\''][..]);
    let name = if cleaned.is_empty() {
        format!("Sheet{position}")
    } else {
        cleaned.to_string()
    };
    truncate_chars(&name, MAX_SHEET_NAME)
}

fn unique_sheet_name(raw: &str, position: usize, taken: &mut HashSet<String>) -> String {
    let base = sheet_name(raw, position);
    let mut candidate = base.clone();
    let mut n = 2;
    while !taken.insert(candidate.to_lowercase()) {
        let suffix = format!("_{n}");
        let room = MAX_SHEET_NAME - suffix.chars().count();
        candidate = format!("{}{suffix}", truncate_chars(&base, room));
        n += 1;
    }
    candidate
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Characters rejected either as sheet names or as file names.
fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '[' | ']' | '\0'..='\u{1F}'
    )
}

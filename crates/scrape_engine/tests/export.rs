use std::fs;

use pretty_assertions::assert_eq;
use scrape_core::{DataKind, ExtractionRequest, ExtractionResult, Table, TextRecord};
use scrape_engine::{
    export_csv, export_workbook, extract_html, parse_csv, to_csv_string, ExportError, Sheet,
    WORKBOOK_DIR, WORKBOOK_MANIFEST,
};
use tempfile::TempDir;

fn report_table() -> ExtractionResult {
    ExtractionResult::Table(Table::new(vec![
        vec!["Name".into(), "Note".into()],
        vec!["Report".into(), "2024-01-15 Q1".into()],
        vec!["Quote, \"inner\"".into(), "multi\nline".into()],
        vec!["short row".into()],
    ]))
}

#[test]
fn table_round_trips_through_csv() {
    let result = report_table();
    let csv = to_csv_string(&result).unwrap();
    let rows = parse_csv(&csv).unwrap();

    assert_eq!(rows, result.to_rows());
    assert_eq!(rows.len() - 1, result.len());
}

#[test]
fn extracted_table_round_trips_through_csv() {
    let html = "<table><tr><th>Item</th><th>Price</th></tr>\
                <tr><td>Tea</td><td>1.50</td></tr><tr><td>Cake, large</td><td>4</td></tr></table>";
    let result = extract_html(html, &ExtractionRequest::new("https://x", DataKind::Table)).unwrap();

    let rows = parse_csv(&to_csv_string(&result).unwrap()).unwrap();

    assert_eq!(
        rows,
        vec![
            vec!["Item".to_string(), "Price".to_string()],
            vec!["Tea".to_string(), "1.50".to_string()],
            vec!["Cake, large".to_string(), "4".to_string()],
        ]
    );
}

#[test]
fn text_and_images_get_single_column_headers() {
    let text = ExtractionResult::Text(vec![TextRecord::plain("a"), TextRecord::plain("b")]);
    assert_eq!(to_csv_string(&text).unwrap(), "Text\na\nb\n");

    let images = ExtractionResult::Images(vec!["https://x/1.png".into()]);
    assert_eq!(to_csv_string(&images).unwrap(), "Image URL\nhttps://x/1.png\n");
}

#[test]
fn export_csv_uses_kind_default_filename() {
    let temp = TempDir::new().unwrap();
    let images = ExtractionResult::Images(vec!["https://x/1.png".into()]);

    let path = export_csv(temp.path(), None, &images).unwrap();
    assert_eq!(path.file_name().unwrap(), "images.csv");

    let path = export_csv(temp.path(), Some("custom.csv"), &report_table()).unwrap();
    assert_eq!(path.file_name().unwrap(), "custom.csv");
    let rows = parse_csv(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(rows.len(), 4);
}

#[test]
fn workbook_writes_one_csv_per_sheet_and_manifest() {
    let temp = TempDir::new().unwrap();
    let table = report_table();
    let text = ExtractionResult::Text(vec![TextRecord::plain("hello")]);
    let long_name = "A very long sheet name that will not fit";

    let summary = export_workbook(
        temp.path(),
        &[
            Sheet {
                name: long_name,
                result: &table,
            },
            Sheet {
                name: "Notes/2024",
                result: &text,
            },
        ],
    )
    .unwrap();

    assert_eq!(
        summary.sheet_names,
        vec![
            "A very long sheet name that wil".to_string(),
            "Notes_2024".to_string()
        ]
    );
    assert!(summary.sheet_paths.iter().all(|p| p.exists()));
    assert_eq!(
        summary.manifest_path,
        temp.path().join(WORKBOOK_DIR).join(WORKBOOK_MANIFEST)
    );

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary.manifest_path).unwrap()).unwrap();
    assert_eq!(manifest["sheet_count"], 2);
    assert_eq!(manifest["sheets"][0]["kind"], "table");
    assert_eq!(manifest["sheets"][0]["records"], 3);
    assert_eq!(manifest["sheets"][1]["file"], "Notes_2024.csv");
}

#[test]
fn empty_workbook_is_rejected() {
    let temp = TempDir::new().unwrap();
    assert!(matches!(
        export_workbook(temp.path(), &[]),
        Err(ExportError::NoSheets)
    ));
}

#[test]
fn workbook_sheet_named_like_primary_csv_leaves_it_intact() {
    let temp = TempDir::new().unwrap();
    let table = report_table();
    let text = ExtractionResult::Text(vec![TextRecord::plain("hello")]);

    let primary = export_csv(temp.path(), None, &table).unwrap();
    let summary = export_workbook(
        temp.path(),
        &[
            Sheet {
                name: "table",
                result: &table,
            },
            Sheet {
                name: "data",
                result: &text,
            },
        ],
    )
    .unwrap();

    assert_eq!(primary, temp.path().join("data.csv"));
    assert_eq!(parse_csv(&fs::read_to_string(&primary).unwrap()).unwrap(), table.to_rows());
    assert_eq!(summary.sheet_paths[1], temp.path().join(WORKBOOK_DIR).join("data.csv"));
    assert_eq!(fs::read_to_string(&summary.sheet_paths[1]).unwrap(), "Text\nhello\n");
}

//! Naive date filter.
//!
//! A record passes when its flattened text contains the date written as
//! `YYYY-MM-DD`. No date parsing happens on the record side, so any cell
//! holding that digit pattern matches, whatever the cell means.

use chrono::NaiveDate;

use crate::model::{ExtractionResult, Table};

pub fn date_needle(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn row_matches(row: &[String], needle: &str) -> bool {
    row.join(" ").contains(needle)
}

/// Keep the header plus every data row mentioning `date`.
pub fn filter_table(table: &Table, date: NaiveDate) -> Table {
    let needle = date_needle(date);
    let mut rows = Vec::with_capacity(table.rows.len());
    if let Some(header) = table.rows.first() {
        rows.push(header.clone());
    }
    rows.extend(
        table
            .data_rows()
            .iter()
            .filter(|row| row_matches(row, &needle))
            .cloned(),
    );
    Table::new(rows)
}

pub fn filter_by_date(result: ExtractionResult, date: NaiveDate) -> ExtractionResult {
    let needle = date_needle(date);
    match result {
        ExtractionResult::Table(table) => ExtractionResult::Table(filter_table(&table, date)),
        ExtractionResult::Text(records) => ExtractionResult::Text(
            records
                .into_iter()
                // Record text only; metadata is never searched.
                .filter(|r| r.text.contains(&needle))
                .collect(),
        ),
        ExtractionResult::Images(urls) => {
            ExtractionResult::Images(urls.into_iter().filter(|u| u.contains(&needle)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TextMeta, TextRecord};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn jan_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn keeps_only_rows_containing_the_date() {
        let table = Table::new(vec![
            vec!["Title".into(), "When".into()],
            vec!["Report".into(), "2024-01-15 Q1".into()],
            vec!["Report".into(), "2024-02-01 Q1".into()],
        ]);
        let filtered = filter_table(&table, jan_15());
        assert_eq!(
            filtered.data_rows(),
            &[vec!["Report".to_string(), "2024-01-15 Q1".to_string()]]
        );
        assert_eq!(filtered.header(), table.header());
    }

    #[test]
    fn substring_match_ignores_field_meaning() {
        let result = ExtractionResult::Text(vec![
            TextRecord::plain("order #2024-01-15-778"),
            TextRecord::plain("published 15/01/2024"),
        ]);
        let ExtractionResult::Text(kept) = filter_by_date(result, jan_15()) else {
            panic!("kind changed");
        };
        assert_eq!(kept, vec![TextRecord::plain("order #2024-01-15-778")]);
    }

    #[test]
    fn metadata_timestamp_is_not_searched() {
        let stamped = |text: &str| TextRecord {
            text: text.into(),
            meta: Some(TextMeta {
                id: 1,
                length: text.chars().count(),
                extracted_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            }),
        };
        let result = ExtractionResult::Text(vec![stamped("due 2024-01-15"), stamped("no date")]);
        assert_eq!(filter_by_date(result, jan_15()).len(), 1);
    }

    #[test]
    fn image_urls_are_filtered_too() {
        let result = ExtractionResult::Images(vec![
            "https://cdn.example.com/2024-01-15/a.png".into(),
            "https://cdn.example.com/b.png".into(),
        ]);
        assert_eq!(filter_by_date(result, jan_15()).len(), 1);
    }

    #[test]
    fn needle_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2023, 3, 7).unwrap();
        assert_eq!(date_needle(date), "2023-03-07");
    }
}

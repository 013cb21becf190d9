//! Tabular serialization of harvested records
//!
//! Produces a CSV document with a fixed identity-column prefix followed by
//! the union of contact keys discovered across all records, sorted for a
//! deterministic column order. Every field is quoted; embedded quotes are
//! doubled and embedded line breaks collapse to a single space so one
//! record always occupies one output row.

use csv::{QuoteStyle, WriterBuilder};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::records::ProfileRecord;

/// Fixed leading columns, always present in this order.
const FIXED_HEADERS: [&str; 12] = [
    "urn",
    "profileUrl",
    "profileImageUrl",
    "firstName",
    "lastName",
    "fullName",
    "connectionDegree",
    "jobTitle",
    "location",
    "contactInfoError",
    "contactInfoRaw",
    "errorReason",
];

#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing harvested yet; callers surface this instead of writing an
    /// empty file.
    #[error("no records to export")]
    EmptyInput,
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output was not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Suggested output filename, dated with the current day.
#[must_use]
pub fn export_filename() -> String {
    format!("profiles_{}.csv", chrono::Utc::now().format("%Y-%m-%d"))
}

fn flatten(value: &str) -> String {
    value
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

/// Serialize records to a CSV document.
///
/// Column order and cell contents depend only on the input, so exporting
/// the same records twice yields byte-identical output.
///
/// # Errors
///
/// Returns `ExportError::EmptyInput` for an empty record list.
pub fn export(records: &[ProfileRecord]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::EmptyInput);
    }

    // Union of contact keys across all records. Keys are stored already
    // normalized; the set both sorts and dedupes. A key shadowing a fixed
    // column is dropped rather than emitted twice.
    let contact_keys: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.contact_info.keys().map(String::as_str))
        .filter(|k| !FIXED_HEADERS.contains(k))
        .collect();

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    let header: Vec<&str> = FIXED_HEADERS
        .iter()
        .copied()
        .chain(contact_keys.iter().copied())
        .collect();
    writer.write_record(&header)?;

    for record in records {
        let mut row: Vec<String> = vec![
            flatten(&record.urn),
            flatten(&record.profile_url),
            flatten(&record.profile_image_url),
            flatten(&record.first_name),
            flatten(&record.last_name),
            flatten(&record.full_name),
            flatten(&record.connection_degree),
            flatten(&record.job_title),
            flatten(&record.location),
            if record.contact_info_error { "true" } else { "false" }.to_string(),
            flatten(&record.contact_info_raw),
            flatten(&record.error_reason),
        ];
        for key in &contact_keys {
            let value = record.contact_info.get(*key).map(String::as_str).unwrap_or("");
            row.push(flatten(value));
        }
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(full_name: &str) -> ProfileRecord {
        ProfileRecord {
            full_name: full_name.to_string(),
            ..ProfileRecord::default()
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(export(&[]), Err(ExportError::EmptyInput)));
    }

    #[test]
    fn export_is_deterministic() {
        let mut a = record("Ada Lovelace");
        a.contact_info
            .insert("phone".to_string(), "+44 123".to_string());
        let mut b = record("Charles Babbage");
        b.contact_info
            .insert("email".to_string(), "cb@example.com".to_string());

        let records = vec![a, b];
        let first = export(&records).unwrap();
        let second = export(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn header_is_fixed_columns_then_sorted_contact_keys() {
        let mut a = record("A");
        a.contact_info.insert("phone".to_string(), "1234".to_string());
        let mut b = record("B");
        b.contact_info
            .insert("email".to_string(), "b@example.com".to_string());
        // Duplicate key across records must appear once.
        b.contact_info.insert("phone".to_string(), "5678".to_string());

        let csv = export(&[a, b]).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "\"urn\",\"profileUrl\",\"profileImageUrl\",\"firstName\",\"lastName\",\
             \"fullName\",\"connectionDegree\",\"jobTitle\",\"location\",\
             \"contactInfoError\",\"contactInfoRaw\",\"errorReason\",\"email\",\"phone\""
        );
    }

    #[test]
    fn quotes_are_doubled_and_newlines_flattened() {
        let mut a = record("Ada \"The Countess\" Lovelace");
        a.contact_info_raw = "line one\nline two\r\nline three".to_string();

        let csv = export(&[a]).unwrap();
        assert!(csv.contains("\"Ada \"\"The Countess\"\" Lovelace\""));
        assert!(csv.contains("\"line one line two line three\""));
    }

    #[test]
    fn round_trips_through_a_csv_reader() {
        let mut a = record("Ada, Countess of Lovelace");
        a.contact_info
            .insert("email".to_string(), "ada@example.com".to_string());
        a.contact_info_error = true;
        a.error_reason = "Contact section not found after click".to_string();

        let csv = export(&[a]).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(&row[5], "Ada, Countess of Lovelace");
        assert_eq!(&row[9], "true");
        assert_eq!(&row[11], "Contact section not found after click");
        assert_eq!(&row[12], "ada@example.com");
    }

    #[test]
    fn contact_key_shadowing_a_fixed_column_is_dropped() {
        let mut a = record("A");
        a.contact_info
            .insert("urn".to_string(), "urn:li:member:1".to_string());
        a.contact_info
            .insert("email".to_string(), "a@example.com".to_string());

        let csv = export(&[a]).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(header.matches("\"urn\"").count(), 1);
        assert!(header.ends_with("\"email\""));
    }
}

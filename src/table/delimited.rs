//! Plain delimited-text reader (CSV/TSV).
//!
//! The first non-comment line is the header row; no unit metadata exists in
//! this format, so every column's unit is `None` and coordinate columns are
//! assumed to be in degrees. The delimiter is sniffed from the header line
//! (comma, then tab, then semicolon). Cells are typed by parse attempt.
use super::{cell_from_token, Cell, ColumnInfo, Table};
use crate::starlist_errors::StarlistError;

fn sniff_delimiter(header: &str) -> u8 {
    if header.contains(',') {
        b','
    } else if header.contains('\t') {
        b'\t'
    } else if header.contains(';') {
        b';'
    } else {
        b','
    }
}

pub(super) fn read_delimited(text: &str) -> Result<Table, StarlistError> {
    let header_line = text
        .lines()
        .find(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .ok_or_else(|| StarlistError::ResourceFormat("resource holds no data".into()))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(sniff_delimiter(header_line))
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns: Vec<ColumnInfo> = reader
        .headers()?
        .iter()
        .map(|name| ColumnInfo {
            name: name.to_string(),
            unit: None,
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<Cell> = record.iter().map(cell_from_token).collect();
        rows.push(row);
    }

    Table::from_parts(columns, rows)
}

//! ECSV reader.
//!
//! ECSV embeds column metadata in a commented YAML header ahead of a plain
//! CSV block. Only the inline-flow column entries emitted by the usual
//! writers are supported, i.e. lines of the form
//! `# - {name: RA, unit: deg, datatype: float64}`; the CSV block that
//! follows is decoded with the same machinery as plain delimited text.
use std::collections::HashMap;

use regex::Regex;

use super::{cell_from_token, Cell, ColumnInfo, Table};
use crate::starlist_errors::StarlistError;

#[derive(Debug)]
struct EcsvColumn {
    unit: Option<String>,
    numeric: bool,
}

fn strip_quotes(value: &str) -> &str {
    value
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
}

/// Parse the `# - {name: ..., unit: ..., datatype: ...}` column entries of
/// the header into a by-name metadata map.
fn parse_header(text: &str) -> HashMap<String, EcsvColumn> {
    // inline-flow mapping entry inside the commented YAML header
    let entry_re = Regex::new(r"^#\s*-\s*\{(.+)\}\s*$").expect("valid ECSV entry pattern");
    let attr_re = Regex::new(r#"(\w+)\s*:\s*([^,}]+)"#).expect("valid ECSV attribute pattern");

    let mut columns = HashMap::new();

    for line in text.lines() {
        if !line.starts_with('#') {
            break;
        }
        let Some(caps) = entry_re.captures(line) else {
            continue;
        };

        let mut name = None;
        let mut unit = None;
        let mut datatype = None;
        for attr in attr_re.captures_iter(&caps[1]) {
            let value = strip_quotes(&attr[2]).to_string();
            match &attr[1] {
                "name" => name = Some(value),
                "unit" => unit = Some(value),
                "datatype" => datatype = Some(value),
                _ => {}
            }
        }

        if let Some(name) = name {
            let numeric = datatype
                .as_deref()
                .is_some_and(|dt| dt.starts_with("float") || dt.starts_with("int") || dt.starts_with("uint"));
            columns.insert(name, EcsvColumn { unit, numeric });
        }
    }

    columns
}

pub(super) fn read_ecsv(text: &str) -> Result<Table, StarlistError> {
    let metadata = parse_header(text);
    if metadata.is_empty() {
        return Err(StarlistError::ResourceFormat(
            "ECSV header declares no columns".into(),
        ));
    }

    // everything past the commented header is a plain CSV block
    let data_block: String = text
        .lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data_block.as_bytes());

    let header = reader.headers()?.clone();
    let columns: Vec<ColumnInfo> = header
        .iter()
        .map(|name| ColumnInfo {
            name: name.to_string(),
            unit: metadata.get(name).and_then(|c| c.unit.clone()),
        })
        .collect();
    let numeric: Vec<bool> = header
        .iter()
        .map(|name| metadata.get(name).is_some_and(|c| c.numeric))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<Cell> = record
            .iter()
            .zip(&numeric)
            .map(|(token, &is_numeric)| {
                if is_numeric {
                    decode_numeric(token)
                } else if token.trim().is_empty() {
                    Ok(Cell::Missing)
                } else {
                    Ok(Cell::Text(token.trim().to_string()))
                }
            })
            .collect::<Result<_, _>>()?;
        rows.push(row);
    }

    Table::from_parts(columns, rows)
}

fn decode_numeric(token: &str) -> Result<Cell, StarlistError> {
    match cell_from_token(token) {
        cell @ (Cell::Number(_) | Cell::Missing) => Ok(cell),
        Cell::Text(value) => Err(StarlistError::ResourceFormat(format!(
            "ECSV numeric column holds non-numeric value '{value}'"
        ))),
    }
}

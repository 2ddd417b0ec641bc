//! VOTable reader.
//!
//! Decodes the XML container with a serde document model and keeps only what
//! the pipeline needs: the `FIELD` declarations (name, unit, datatype) of the
//! first `TABLE` in the document, and its `TABLEDATA` rows. Binary-encoded
//! VOTable payloads (`BINARY`/`FITS` streams) are not supported.
use quick_xml::de::from_str;
use serde::Deserialize;

use super::{Cell, ColumnInfo, Table};
use crate::starlist_errors::StarlistError;

#[derive(Debug, Deserialize)]
struct VoTable {
    #[serde(rename = "RESOURCE", default)]
    resources: Vec<VoResource>,
}

#[derive(Debug, Deserialize)]
struct VoResource {
    #[serde(rename = "TABLE", default)]
    tables: Vec<VoTableElement>,
    #[serde(rename = "RESOURCE", default)]
    resources: Vec<VoResource>,
}

#[derive(Debug, Deserialize)]
struct VoTableElement {
    #[serde(rename = "FIELD", default)]
    fields: Vec<VoField>,
    #[serde(rename = "DATA")]
    data: Option<VoData>,
}

#[derive(Debug, Deserialize)]
struct VoField {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@unit")]
    unit: Option<String>,
    #[serde(rename = "@datatype")]
    datatype: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VoData {
    #[serde(rename = "TABLEDATA")]
    tabledata: Option<VoTableData>,
}

#[derive(Debug, Deserialize)]
struct VoTableData {
    #[serde(rename = "TR", default)]
    rows: Vec<VoTr>,
}

#[derive(Debug, Deserialize)]
struct VoTr {
    #[serde(rename = "TD", default)]
    cells: Vec<String>,
}

impl VoField {
    fn is_numeric(&self) -> bool {
        matches!(
            self.datatype.as_deref(),
            Some("float" | "double" | "short" | "int" | "long" | "unsignedByte")
        )
    }
}

/// First TABLE element in document order, searching nested resources
/// depth-first.
fn first_table(resources: &[VoResource]) -> Option<&VoTableElement> {
    for resource in resources {
        if let Some(table) = resource.tables.first() {
            return Some(table);
        }
        if let Some(table) = first_table(&resource.resources) {
            return Some(table);
        }
    }
    None
}

fn decode_cell(raw: &str, field: &VoField) -> Result<Cell, StarlistError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Cell::Missing);
    }
    if field.is_numeric() {
        let value: f64 = trimmed.parse().map_err(|_| {
            StarlistError::ResourceFormat(format!(
                "column '{}' declares a numeric datatype but holds '{trimmed}'",
                field.name
            ))
        })?;
        Ok(Cell::Number(value))
    } else {
        Ok(Cell::Text(trimmed.to_string()))
    }
}

pub(super) fn read_votable(text: &str) -> Result<Table, StarlistError> {
    let document: VoTable = from_str(text)?;

    let table = first_table(&document.resources).ok_or_else(|| {
        StarlistError::ResourceFormat("VOTable document contains no TABLE element".into())
    })?;

    if table.fields.is_empty() {
        return Err(StarlistError::ResourceFormat(
            "VOTable TABLE declares no FIELD elements".into(),
        ));
    }

    let columns: Vec<ColumnInfo> = table
        .fields
        .iter()
        .map(|field| ColumnInfo {
            name: field.name.clone(),
            unit: field.unit.clone(),
        })
        .collect();

    // row count is not declared up front; the TABLEDATA block is scanned in full
    let mut rows = Vec::new();
    if let Some(tabledata) = table.data.as_ref().and_then(|d| d.tabledata.as_ref()) {
        for tr in &tabledata.rows {
            if tr.cells.len() != table.fields.len() {
                return Err(StarlistError::ResourceFormat(format!(
                    "VOTable row has {} TD cells but the table declares {} FIELDs",
                    tr.cells.len(),
                    table.fields.len()
                )));
            }
            let row: Vec<Cell> = tr
                .cells
                .iter()
                .zip(&table.fields)
                .map(|(raw, field)| decode_cell(raw, field))
                .collect::<Result<_, _>>()?;
            rows.push(row);
        }
    }

    Table::from_parts(columns, rows)
}

//! # Table abstraction
//!
//! Uniform, column-oriented view over an externally supplied tabular
//! resource. Loading decodes the whole resource up front, so row count is
//! always known afterwards even for formats that do not declare it (the
//! readers fall back to a full sequential scan of the data block).
//!
//! ## Supported formats
//! -----------------
//! * **VOTable** — XML with column names/units in `FIELD` markup
//!   ([`votable`]).
//! * **ECSV** — CSV with column metadata in a structured `# %ECSV` header
//!   ([`ecsv`]).
//! * **Delimited text** — plain CSV/TSV with a header row and no unit
//!   metadata ([`delimited`]).
//!
//! The format is sniffed from the leading bytes; an unrecognized or
//! undecodable resource fails with
//! [`StarlistError::ResourceFormat`](crate::starlist_errors::StarlistError::ResourceFormat).
//!
//! ## Cell typing
//! -----------------
//! Cells are typed at load time (string or double). Reading a cell with the
//! wrong accessor is a programming error and panics; user-facing problems
//! are always surfaced as [`StarlistError`] values during loading or
//! validation, never through the accessors. Not-a-number numeric encodings
//! are semantically **missing**, not zero.
mod delimited;
mod ecsv;
mod votable;

use camino::Utf8Path;

use crate::starlist_errors::StarlistError;

/// Per-column metadata: declared name and optional unit string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub unit: Option<String>,
}

/// One typed cell of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// Explicit missing marker (empty value in the source).
    Missing,
}

impl Cell {
    /// Missing marker or a not-a-number numeric encoding.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Number(v) => v.is_nan(),
            Cell::Text(_) => false,
        }
    }
}

/// A decoded tabular resource: ordered named columns plus rows of typed
/// cells, randomly addressable by `(row, column)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<ColumnInfo>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Assemble a table, enforcing that every row has exactly one cell per
    /// column.
    pub fn from_parts(
        columns: Vec<ColumnInfo>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Table, StarlistError> {
        let n_cols = columns.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(StarlistError::ResourceFormat(format!(
                    "row {} has {} cells but the table declares {} columns",
                    i + 1,
                    row.len(),
                    n_cols
                )));
            }
        }
        Ok(Table { columns, rows })
    }

    /// Load a table from a file, sniffing the format from its content.
    pub fn from_path(path: &Utf8Path) -> Result<Table, StarlistError> {
        let bytes = std::fs::read(path)?;
        Table::from_bytes(&bytes)
    }

    /// Load a table from raw bytes, sniffing the format from the leading
    /// content: XML markup selects the VOTable reader, a `# %ECSV` signature
    /// selects the ECSV reader, anything else is treated as delimited text.
    pub fn from_bytes(bytes: &[u8]) -> Result<Table, StarlistError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| StarlistError::ResourceFormat("resource is not valid UTF-8".into()))?;
        let head = text.trim_start();

        if head.starts_with('<') {
            votable::read_votable(text)
        } else if head.starts_with("# %ECSV") || head.starts_with("#%ECSV") {
            ecsv::read_ecsv(text)
        } else {
            delimited::read_delimited(text)
        }
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column(&self, col: usize) -> &ColumnInfo {
        &self.columns[col]
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.rows[row][col]
    }

    /// Text content of a string-typed cell.
    ///
    /// Panics if the cell is not text; requesting the wrong scalar type is a
    /// programming error, not a user-facing condition.
    pub fn cell_str(&self, row: usize, col: usize) -> &str {
        match self.cell(row, col) {
            Cell::Text(s) => s,
            other => panic!("cell ({row}, {col}) accessed as text but holds {other:?}"),
        }
    }

    /// Numeric content of a double-typed cell.
    ///
    /// Panics if the cell is not numeric; requesting the wrong scalar type
    /// is a programming error, not a user-facing condition.
    pub fn cell_f64(&self, row: usize, col: usize) -> f64 {
        match self.cell(row, col) {
            Cell::Number(v) => *v,
            other => panic!("cell ({row}, {col}) accessed as number but holds {other:?}"),
        }
    }

    /// Whether the cell is absent or encoded as not-a-number.
    pub fn cell_is_missing(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_missing()
    }

    /// Render any cell as a display string, regardless of its scalar type.
    ///
    /// Identifier columns in header-less delimited sources may be typed
    /// numeric when every value parses as a number; names must still be
    /// usable from such columns.
    pub fn cell_display(&self, row: usize, col: usize) -> String {
        match self.cell(row, col) {
            Cell::Text(s) => s.clone(),
            Cell::Number(v) => format!("{v}"),
            Cell::Missing => String::new(),
        }
    }
}

/// Type a raw token the way the delimited readers do: empty is missing,
/// anything fully numeric (including NaN spellings) is a number, the rest is
/// text.
pub(crate) fn cell_from_token(token: &str) -> Cell {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        Cell::Missing
    } else if let Ok(v) = trimmed.parse::<f64>() {
        Cell::Number(v)
    } else {
        Cell::Text(trimmed.to_string())
    }
}

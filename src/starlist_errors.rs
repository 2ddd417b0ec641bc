//! Crate-wide error type for the target-list ingestion pipeline.
//!
//! Every failure mode of the pipeline is a variant of [`StarlistError`].
//! Row-level problems (duplicate names) are aggregated across the whole
//! table before being reported, so the `Display` output of those variants
//! lists every offending row in one message. Resource-level problems
//! (format, shape, units) fail immediately since row-level aggregation is
//! meaningless once the table itself is unusable.
use itertools::Itertools;
use thiserror::Error;

use crate::roles::ColumnRole;

#[derive(Error, Debug)]
pub enum StarlistError {
    #[error("unsupported or unparseable table resource: {0}")]
    ResourceFormat(String),

    #[error("table is required to have at least 3 columns, found {0}")]
    TooFewColumns(usize),

    #[error("table has zero rows (no data)")]
    EmptyTable,

    #[error(
        "number of targets limited to {limit} per proposal; you currently have \
         {existing} targets, and are attempting to add {attempted} targets"
    )]
    CapacityExceeded {
        limit: usize,
        existing: usize,
        attempted: usize,
    },

    #[error("{}", missing_columns_message(.0))]
    MissingColumns(Vec<ColumnRole>),

    #[error("coordinates must be given in units of degrees, column '{column}' declares '{unit}'")]
    InvalidUnit { column: String, unit: String },

    #[error("{}", duplicate_names_message(.0))]
    DuplicateNames(Vec<(usize, String)>),

    #[error("malformed target list line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("unable to locate a name column ('TYPED_ID' or 'MAIN_ID') in the lookup result")]
    NameColumnNotFound,

    #[error("unable to perform file operation: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML decoding error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("CSV decoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),
}

fn missing_columns_message(roles: &[ColumnRole]) -> String {
    roles
        .iter()
        .map(|role| format!("-- unable to find '{role}' column"))
        .join(" ")
}

fn duplicate_names_message(rows: &[(usize, String)]) -> String {
    let listing = rows
        .iter()
        .map(|(row, name)| format!("{row}: {name}"))
        .join("\n");
    format!(
        "unable to store target list as there are non-unique names at the following rows:\n{listing}"
    )
}

#[cfg(test)]
mod test_error_messages {
    use super::*;

    #[test]
    fn missing_columns_lists_every_role() {
        let err = StarlistError::MissingColumns(vec![
            ColumnRole::Identifier,
            ColumnRole::RightAscension,
            ColumnRole::Declination,
        ]);
        let msg = err.to_string();
        assert!(msg.contains("'ID/NAME' column"));
        assert!(msg.contains("'RA' column"));
        assert!(msg.contains("'DEC' column"));
    }

    #[test]
    fn duplicate_names_lists_every_row() {
        let err = StarlistError::DuplicateNames(vec![
            (2, "vega".to_string()),
            (5, "vega".to_string()),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("2: vega"));
        assert!(msg.contains("5: vega"));
    }
}

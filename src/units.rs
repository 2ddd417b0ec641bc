//! # Units and quantities
//!
//! Unit handling for the ingestion pipeline. A [`Quantity`] pairs a numeric
//! value with the unit string it was expressed in; no conversion is ever
//! performed here, only validation and defaulting.
//!
//! ## Conventions
//! -----------------
//! - Right ascension and declination **must** arrive in degrees. A source
//!   column declaring any unit outside [`DEGREE_UNITS`] is rejected outright;
//!   a column declaring no unit at all is assumed to be in degrees.
//! - Whatever degree spelling the source used (`d`, `deg`, ...), the output
//!   quantity always carries the canonical string [`DEGREES`].
//! - Optional kinematic quantities keep the unit string the source declared;
//!   when the source declares none, the per-role default from
//!   [`default_unit`] applies.
//!
//! The default radial-velocity unit differs between the table path
//! ([`KM_PER_YEAR`]) and the fixed-order list path ([`KM_PER_SECOND`]); see
//! the notes in `DESIGN.md` before changing either.
use serde::Serialize;

use crate::roles::ColumnRole;
use crate::starlist_errors::StarlistError;
use crate::table::Table;

/// Accepted degree spellings for RA/Dec source columns.
pub const DEGREE_UNITS: [&str; 4] = ["d", "deg", "degs", "degrees"];

/// Canonical unit string attached to output coordinates.
pub const DEGREES: &str = "degrees";

/// Default unit for proper-motion components.
pub const MAS_PER_YEAR: &str = "mas/yr";

/// Default unit for parallax.
pub const MAS: &str = "mas";

/// Default unit for radial velocity in the generic table path.
pub const KM_PER_YEAR: &str = "km/yr";

/// Radial-velocity unit in the fixed-order list path.
pub const KM_PER_SECOND: &str = "km/s";

/// A numeric value paired with the unit string it is expressed in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

impl Quantity {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Quantity {
            value,
            unit: unit.into(),
        }
    }
}

/// Whether `unit` is an accepted degree spelling.
pub fn is_degree_unit(unit: &str) -> bool {
    DEGREE_UNITS.contains(&unit)
}

/// Default unit applied to an optional role when the source column declares none.
///
/// Only the optional kinematic roles have a default; the mandatory roles never
/// reach this function (identifiers are unitless, coordinates are validated
/// against [`DEGREE_UNITS`] instead).
pub fn default_unit(role: ColumnRole) -> &'static str {
    match role {
        ColumnRole::ProperMotionRa | ColumnRole::ProperMotionDec => MAS_PER_YEAR,
        ColumnRole::Parallax => MAS,
        ColumnRole::RadialVelocity => KM_PER_YEAR,
        ColumnRole::Identifier | ColumnRole::RightAscension | ColumnRole::Declination => {
            unreachable!("mandatory roles carry no default unit")
        }
    }
}

/// Check that the column holding a coordinate role is expressed in degrees.
///
/// A column with no declared unit passes (degrees assumed); a declared
/// non-degree unit fails the whole ingest with
/// [`StarlistError::InvalidUnit`], regardless of row data.
pub(crate) fn validate_degree_unit(table: &Table, col: usize) -> Result<(), StarlistError> {
    let info = table.column(col);
    match info.unit.as_deref() {
        Some(unit) if !is_degree_unit(unit) => Err(StarlistError::InvalidUnit {
            column: info.name.clone(),
            unit: unit.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Read the optional quantity for `role` from one cell.
///
/// A missing cell (absent value or a not-a-number encoding) yields `None`,
/// never zero and never an error. Otherwise the numeric value is paired with
/// the column's declared unit, or the role's default unit if the column
/// declares none.
pub(crate) fn optional_quantity(
    table: &Table,
    row: usize,
    col: usize,
    role: ColumnRole,
) -> Option<Quantity> {
    if table.cell_is_missing(row, col) {
        return None;
    }
    let unit = table
        .column(col)
        .unit
        .clone()
        .unwrap_or_else(|| default_unit(role).to_string());
    Some(Quantity::new(table.cell_f64(row, col), unit))
}

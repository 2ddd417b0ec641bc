//! # Table ingestion pipeline
//!
//! Turns a decoded [`Table`] into validated [`Target`] records. The pipeline
//! is a pure transform: it never persists anything and its only stateful
//! input is the caller-supplied list of names already in use for the
//! proposal being added to.
//!
//! ## Validation order
//! -----------------
//! Checks run once per ingest, in this order, each terminal for the call:
//!
//! 1. column count ≥ 3,
//! 2. row count > 0,
//! 3. row count fits the remaining capacity
//!    (`max_targets - existing_names.len()`),
//! 4. identifier/RA/Dec columns all resolved (missing roles aggregated into
//!    **one** error),
//! 5. RA/Dec columns expressed in degrees,
//! 6. name uniqueness against both the existing names and earlier rows of
//!    the same table (every colliding row aggregated into **one** error).
//!
//! Row-level problems are collected across the whole table before reporting
//! so a user fixes every conflict in a single round-trip; resource-level
//! problems fail immediately. Only after all checks pass are targets
//! materialized, one per row, preserving source row order.
use std::collections::HashSet;

use camino::Utf8Path;

use crate::roles::{ColumnRole, RoleMap};
use crate::starlist_errors::StarlistError;
use crate::table::Table;
use crate::target::{SpaceSys, Target};
use crate::units::{optional_quantity, validate_degree_unit, Quantity, DEGREES};

/// Load the resource at `path` and run the full ingestion pipeline.
pub fn ingest_path(
    path: &Utf8Path,
    space_sys: &SpaceSys,
    existing_names: &[String],
    max_targets: usize,
) -> Result<Vec<Target>, StarlistError> {
    let table = Table::from_path(path)?;
    convert_to_targets(&table, space_sys, existing_names, max_targets)
}

/// Decode `bytes` as a tabular resource and run the full ingestion pipeline.
pub fn ingest_bytes(
    bytes: &[u8],
    space_sys: &SpaceSys,
    existing_names: &[String],
    max_targets: usize,
) -> Result<Vec<Target>, StarlistError> {
    let table = Table::from_bytes(bytes)?;
    convert_to_targets(&table, space_sys, existing_names, max_targets)
}

/// Validate `table` and materialize one [`Target`] per row.
///
/// Arguments
/// -----------------
/// * `table` – The decoded tabular resource.
/// * `space_sys` – Coordinate-reference-system handle attached to every
///   output position (opaque pass-through).
/// * `existing_names` – Names already in use for the proposal; read-only,
///   used for uniqueness and capacity accounting.
/// * `max_targets` – Maximum total target count per proposal.
///
/// Return
/// ----------
/// * The targets in source row order, or the first terminal
///   [`StarlistError`] in the documented validation order.
pub fn convert_to_targets(
    table: &Table,
    space_sys: &SpaceSys,
    existing_names: &[String],
    max_targets: usize,
) -> Result<Vec<Target>, StarlistError> {
    if table.n_cols() < 3 {
        return Err(StarlistError::TooFewColumns(table.n_cols()));
    }

    if table.n_rows() == 0 {
        return Err(StarlistError::EmptyTable);
    }

    let remaining = max_targets.saturating_sub(existing_names.len());
    if table.n_rows() > remaining {
        return Err(StarlistError::CapacityExceeded {
            limit: max_targets,
            existing: existing_names.len(),
            attempted: table.n_rows(),
        });
    }

    let roles = RoleMap::resolve(table);
    let missing = roles.missing_mandatory();
    if !missing.is_empty() {
        return Err(StarlistError::MissingColumns(missing));
    }

    // mandatory roles are resolved past this point
    let id_col = roles.get(ColumnRole::Identifier).expect("checked above");
    let ra_col = roles.get(ColumnRole::RightAscension).expect("checked above");
    let dec_col = roles.get(ColumnRole::Declination).expect("checked above");

    validate_degree_unit(table, ra_col)?;
    validate_degree_unit(table, dec_col)?;

    // delimited sources type cells by parse attempt, so row data is checked
    // here once; past this point the typed accessors cannot fail
    check_row_cells(table, &roles, ra_col, dec_col)?;

    // aggregate every colliding (row, name) pair before failing
    let existing: HashSet<&str> = existing_names.iter().map(String::as_str).collect();
    let mut seen_in_table: HashSet<String> = HashSet::new();
    let mut duplicates: Vec<(usize, String)> = Vec::new();

    for row in 0..table.n_rows() {
        let name = table.cell_display(row, id_col);
        if name.is_empty() {
            return Err(StarlistError::ResourceFormat(format!(
                "row {} has an empty identifier",
                row + 1
            )));
        }
        if existing.contains(name.as_str()) || seen_in_table.contains(&name) {
            duplicates.push((row + 1, name.clone()));
        }
        seen_in_table.insert(name);
    }

    if !duplicates.is_empty() {
        return Err(StarlistError::DuplicateNames(duplicates));
    }

    Ok((0..table.n_rows())
        .map(|row| materialize_row(table, &roles, row, space_sys))
        .collect())
}

/// Verify that every row holds usable scalar values for the resolved roles:
/// coordinates must be present and numeric, optional cells numeric or
/// missing.
fn check_row_cells(
    table: &Table,
    roles: &RoleMap,
    ra_col: usize,
    dec_col: usize,
) -> Result<(), StarlistError> {
    use crate::table::Cell;

    let optional_cols: Vec<usize> = [
        ColumnRole::ProperMotionRa,
        ColumnRole::ProperMotionDec,
        ColumnRole::Parallax,
        ColumnRole::RadialVelocity,
    ]
    .into_iter()
    .filter_map(|role| roles.get(role))
    .collect();

    for row in 0..table.n_rows() {
        for col in [ra_col, dec_col] {
            match table.cell(row, col) {
                Cell::Number(v) if !v.is_nan() => {}
                _ => {
                    return Err(StarlistError::ResourceFormat(format!(
                        "row {}: column '{}' does not hold a numeric coordinate value",
                        row + 1,
                        table.column(col).name
                    )))
                }
            }
        }
        for &col in &optional_cols {
            if let Cell::Text(value) = table.cell(row, col) {
                return Err(StarlistError::ResourceFormat(format!(
                    "row {}: column '{}' holds non-numeric value '{value}'",
                    row + 1,
                    table.column(col).name
                )));
            }
        }
    }

    Ok(())
}

/// Build the target for one known-valid row. No validation happens here; by
/// construction every row reaching this stage has passed the pipeline
/// checks.
fn materialize_row(table: &Table, roles: &RoleMap, row: usize, space_sys: &SpaceSys) -> Target {
    let id_col = roles.get(ColumnRole::Identifier).expect("validated");
    let ra_col = roles.get(ColumnRole::RightAscension).expect("validated");
    let dec_col = roles.get(ColumnRole::Declination).expect("validated");

    let mut target = Target::new(
        table.cell_display(row, id_col),
        Quantity::new(table.cell_f64(row, ra_col), DEGREES),
        Quantity::new(table.cell_f64(row, dec_col), DEGREES),
        space_sys,
    );

    target.pm_ra = roles
        .get(ColumnRole::ProperMotionRa)
        .and_then(|col| optional_quantity(table, row, col, ColumnRole::ProperMotionRa));
    target.pm_dec = roles
        .get(ColumnRole::ProperMotionDec)
        .and_then(|col| optional_quantity(table, row, col, ColumnRole::ProperMotionDec));
    target.parallax = roles
        .get(ColumnRole::Parallax)
        .and_then(|col| optional_quantity(table, row, col, ColumnRole::Parallax));
    target.source_velocity = roles
        .get(ColumnRole::RadialVelocity)
        .and_then(|col| optional_quantity(table, row, col, ColumnRole::RadialVelocity));

    target
}

#[cfg(test)]
mod test_table_ingest {
    use super::*;
    use crate::units::{KM_PER_YEAR, MAS, MAS_PER_YEAR};

    fn icrs() -> SpaceSys {
        SpaceSys::icrs()
    }

    fn csv_table(text: &str) -> Table {
        Table::from_bytes(text.as_bytes()).unwrap()
    }

    #[test]
    fn two_row_happy_path() {
        let table = csv_table("ID,RA,DEC\nalpha,10.0,20.0\nbeta,30.0,40.0\n");
        let targets = convert_to_targets(&table, &icrs(), &[], 10).unwrap();

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].source_name, "alpha");
        assert_eq!(targets[1].source_name, "beta");
        assert_eq!(targets[0].source_coordinates.ra, Quantity::new(10.0, DEGREES));
        assert_eq!(targets[1].source_coordinates.dec, Quantity::new(40.0, DEGREES));
        assert_eq!(targets[0].position_epoch, "J2000.0");
        assert!(targets[0].pm_ra.is_none());
        assert!(targets[0].pm_dec.is_none());
        assert!(targets[0].parallax.is_none());
        assert!(targets[0].source_velocity.is_none());
    }

    #[test]
    fn too_few_columns() {
        let table = csv_table("ID,RA\nalpha,10.0\n");
        assert!(matches!(
            convert_to_targets(&table, &icrs(), &[], 10),
            Err(StarlistError::TooFewColumns(2))
        ));
    }

    #[test]
    fn zero_rows() {
        let table = csv_table("ID,RA,DEC\n");
        assert!(matches!(
            convert_to_targets(&table, &icrs(), &[], 10),
            Err(StarlistError::EmptyTable)
        ));
    }

    #[test]
    fn capacity_accounts_for_existing_names() {
        let table = csv_table("ID,RA,DEC\nalpha,10.0,20.0\nbeta,30.0,40.0\n");
        let existing: Vec<String> = (0..9).map(|i| format!("t{i}")).collect();
        let err = convert_to_targets(&table, &icrs(), &existing, 10).unwrap_err();
        match err {
            StarlistError::CapacityExceeded {
                limit,
                existing,
                attempted,
            } => {
                assert_eq!(limit, 10);
                assert_eq!(existing, 9);
                assert_eq!(attempted, 2);
            }
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn missing_mandatory_columns_aggregated() {
        let table = csv_table("PMRA,PMDEC,PLX\n1.0,2.0,3.0\n");
        let err = convert_to_targets(&table, &icrs(), &[], 10).unwrap_err();
        match err {
            StarlistError::MissingColumns(roles) => {
                assert_eq!(
                    roles,
                    vec![
                        ColumnRole::Identifier,
                        ColumnRole::RightAscension,
                        ColumnRole::Declination
                    ]
                );
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn duplicates_aggregated_across_table_and_existing() {
        let table = csv_table(
            "ID,RA,DEC\nalpha,10.0,20.0\nbeta,30.0,40.0\nalpha,50.0,60.0\nvega,1.0,2.0\n",
        );
        let existing = vec!["vega".to_string()];
        let err = convert_to_targets(&table, &icrs(), &existing, 10).unwrap_err();
        match err {
            StarlistError::DuplicateNames(rows) => {
                // 1-based rows: the repeated 'alpha' and the pre-existing 'vega'
                assert_eq!(
                    rows,
                    vec![(3, "alpha".to_string()), (4, "vega".to_string())]
                );
            }
            other => panic!("expected DuplicateNames, got {other:?}"),
        }
    }

    #[test]
    fn optional_columns_with_nan_cells() {
        let table = csv_table(
            "ID,RA,DEC,PMRA,PMDEC,PLX,RV\nalpha,10.0,20.0,1.5,-2.5,NaN,12.0\n",
        );
        let targets = convert_to_targets(&table, &icrs(), &[], 10).unwrap();
        let t = &targets[0];
        assert_eq!(t.pm_ra, Some(Quantity::new(1.5, MAS_PER_YEAR)));
        assert_eq!(t.pm_dec, Some(Quantity::new(-2.5, MAS_PER_YEAR)));
        // NaN is absent, never zero and never an error
        assert_eq!(t.parallax, None);
        assert_eq!(t.source_velocity, Some(Quantity::new(12.0, KM_PER_YEAR)));
    }

    #[test]
    fn declared_units_override_defaults() {
        let votable = r#"<VOTABLE><RESOURCE><TABLE>
            <FIELD name="ID" datatype="char"/>
            <FIELD name="RA" datatype="double" unit="deg"/>
            <FIELD name="DEC" datatype="double" unit="deg"/>
            <FIELD name="PLX" datatype="double" unit="arcsec"/>
            <DATA><TABLEDATA>
              <TR><TD>a</TD><TD>1.0</TD><TD>2.0</TD><TD>0.5</TD></TR>
            </TABLEDATA></DATA>
            </TABLE></RESOURCE></VOTABLE>"#;
        let table = Table::from_bytes(votable.as_bytes()).unwrap();
        let targets = convert_to_targets(&table, &icrs(), &[], 10).unwrap();
        assert_eq!(targets[0].parallax, Some(Quantity::new(0.5, "arcsec")));
        // coordinates are normalized to the canonical spelling
        assert_eq!(targets[0].source_coordinates.ra.unit, DEGREES);
    }

    #[test]
    fn non_degree_coordinate_unit_is_terminal() {
        let votable = r#"<VOTABLE><RESOURCE><TABLE>
            <FIELD name="ID" datatype="char"/>
            <FIELD name="RA" datatype="double" unit="rad"/>
            <FIELD name="DEC" datatype="double" unit="deg"/>
            <DATA><TABLEDATA>
              <TR><TD>a</TD><TD>1.0</TD><TD>2.0</TD></TR>
            </TABLEDATA></DATA>
            </TABLE></RESOURCE></VOTABLE>"#;
        let table = Table::from_bytes(votable.as_bytes()).unwrap();
        let err = convert_to_targets(&table, &icrs(), &[], 10).unwrap_err();
        match err {
            StarlistError::InvalidUnit { column, unit } => {
                assert_eq!(column, "RA");
                assert_eq!(unit, "rad");
            }
            other => panic!("expected InvalidUnit, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_coordinate_cell_is_rejected() {
        let table = csv_table("ID,RA,DEC\nalpha,north,20.0\n");
        let err = convert_to_targets(&table, &icrs(), &[], 10).unwrap_err();
        assert!(matches!(err, StarlistError::ResourceFormat(_)));
    }

    #[test]
    fn ingestion_is_deterministic() {
        let text = "ID,RA,DEC,PLX\nalpha,10.0,20.0,1.0\nbeta,30.0,40.0,\n";
        let table = csv_table(text);
        let first = convert_to_targets(&table, &icrs(), &[], 10).unwrap();
        let second = convert_to_targets(&table, &icrs(), &[], 10).unwrap();
        assert_eq!(first, second);
    }
}

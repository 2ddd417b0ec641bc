//! # SIMBAD remote lookup adapter
//!
//! Resolves a single object name against the SIMBAD online catalog and
//! extracts a flat [`SimbadResult`] from the one-row VOTable reply. The
//! tabular machinery is shared with the generic ingestion path; only the
//! column resolution differs:
//!
//! * the name column is found by a two-step exact-name fallback —
//!   `TYPED_ID` (the query echo) first, then `MAIN_ID` (the canonical
//!   identifier) — failing both is
//!   [`StarlistError::NameColumnNotFound`];
//! * the coordinate columns are the first RA/Dec-prefixed columns holding
//!   numeric (degree) data, skipping SIMBAD's sexagesimal text renditions.
//!
//! Exactly one row is expected. A multi-row reply is not an error: only the
//! first row is used and the surplus is reported in
//! [`SimbadResult::extra_rows`] for the caller to log.
use regex::Regex;

use crate::env_state::StarlistEnv;
use crate::roles::ColumnRole;
use crate::starlist_errors::StarlistError;
use crate::table::{Cell, Table};
use crate::target::{SpaceSys, Target};
use crate::units::{Quantity, DEGREES};

/// Base URL of the SIMBAD mirror queried by [`find_target`].
pub const SIMBAD_BASE_URL: &str = "https://simbad.cds.unistra.fr/simbad/";

/// Identifier-query URL for `target_name`, VOTable output.
pub fn simbad_query_url(target_name: &str) -> String {
    format!(
        "{SIMBAD_BASE_URL}sim-id?output.format=votable&Ident={}",
        urlencoding::encode(target_name)
    )
}

/// Flat result of a name-resolution lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SimbadResult {
    /// Canonicalized object name: whitespace stripped, lowercased.
    pub name: String,
    /// Coordinate-system label of the reply (e.g. `ICRS`).
    pub coord_system: String,
    /// Epoch label of the reply (e.g. `J2000`).
    pub epoch: String,
    pub ra_deg: f64,
    pub dec_deg: f64,
    /// Rows beyond the first in the reply; non-zero is log-worthy, not fatal.
    pub extra_rows: usize,
}

impl SimbadResult {
    /// Materialize the lookup result as a [`Target`] in the caller's
    /// reference system.
    pub fn to_target(&self, space_sys: &SpaceSys) -> Target {
        Target::new(
            self.name.clone(),
            Quantity::new(self.ra_deg, DEGREES),
            Quantity::new(self.dec_deg, DEGREES),
            space_sys,
        )
    }
}

/// Query SIMBAD for `target_name` and extract the lookup result.
pub fn find_target(
    env: &StarlistEnv,
    target_name: &str,
) -> Result<SimbadResult, StarlistError> {
    let body = env.get_from_url(&simbad_query_url(target_name))?;
    parse_simbad_votable(&body)
}

/// Whitespace stripped, lowercased: `"M 31"` becomes `"m31"`.
fn canonicalize_name(name: &str) -> String {
    name.split_whitespace().collect::<String>().to_lowercase()
}

/// Exact-name column lookup (no pattern matching on this path).
fn exact_column(table: &Table, name: &str) -> Option<usize> {
    (0..table.n_cols()).find(|&col| table.column(col).name == name)
}

/// First column matching `pattern` whose first-row cell is numeric; skips
/// text columns such as SIMBAD's sexagesimal RA/Dec renditions.
fn numeric_column(table: &Table, pattern: &str) -> Option<usize> {
    let re = regex::RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    (0..table.n_cols()).find(|&col| {
        re.is_match(&table.column(col).name) && matches!(table.cell(0, col), Cell::Number(_))
    })
}

/// Coordinate-system and epoch labels from the reply's `COOSYS` element,
/// with ICRS/J2000 assumed when the element or attribute is absent.
fn coosys_labels(xml: &str) -> (String, String) {
    let coosys_re = Regex::new(r"<COOSYS[^>]*>").expect("valid COOSYS pattern");
    let attr = |element: &str, name: &str| -> Option<String> {
        Regex::new(&format!(r#"{name}\s*=\s*['"]([^'"]+)['"]"#))
            .ok()?
            .captures(element)
            .map(|caps| caps[1].to_string())
    };

    match coosys_re.find(xml) {
        Some(m) => {
            let element = m.as_str();
            (
                attr(element, "system").unwrap_or_else(|| "ICRS".to_string()),
                attr(element, "epoch").unwrap_or_else(|| "J2000".to_string()),
            )
        }
        None => ("ICRS".to_string(), "J2000".to_string()),
    }
}

/// Extract the lookup result from a SIMBAD VOTable reply.
pub fn parse_simbad_votable(xml: &str) -> Result<SimbadResult, StarlistError> {
    let table = Table::from_bytes(xml.as_bytes())?;

    if table.n_rows() == 0 {
        return Err(StarlistError::EmptyTable);
    }

    // query echo first, canonical identifier second
    let name_col = exact_column(&table, "TYPED_ID")
        .or_else(|| exact_column(&table, "MAIN_ID"))
        .ok_or(StarlistError::NameColumnNotFound)?;

    let ra_col = numeric_column(&table, "^RA").ok_or_else(|| {
        StarlistError::MissingColumns(vec![ColumnRole::RightAscension])
    })?;
    let dec_col = numeric_column(&table, "^DEC").ok_or_else(|| {
        StarlistError::MissingColumns(vec![ColumnRole::Declination])
    })?;

    let (coord_system, epoch) = coosys_labels(xml);

    Ok(SimbadResult {
        name: canonicalize_name(&table.cell_display(0, name_col)),
        coord_system,
        epoch,
        ra_deg: table.cell_f64(0, ra_col),
        dec_deg: table.cell_f64(0, dec_col),
        extra_rows: table.n_rows() - 1,
    })
}

#[cfg(test)]
mod test_simbad {
    use super::*;

    const REPLY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<VOTABLE version="1.2">
  <DEFINITIONS>
    <COOSYS ID="COOSYS" equinox="2000" epoch="J2000" system="ICRS"/>
  </DEFINITIONS>
  <RESOURCE>
    <TABLE>
      <FIELD name="MAIN_ID" datatype="char" arraysize="*"/>
      <FIELD name="TYPED_ID" datatype="char" arraysize="*"/>
      <FIELD name="RA" datatype="char" arraysize="13" unit="&quot;h:m:s&quot;"/>
      <FIELD name="DEC" datatype="char" arraysize="13" unit="&quot;d:m:s&quot;"/>
      <FIELD name="RA_d" datatype="double" unit="deg"/>
      <FIELD name="DEC_d" datatype="double" unit="deg"/>
      <DATA>
        <TABLEDATA>
          <TR><TD>M  31</TD><TD>M 31</TD><TD>00 42 44.3</TD><TD>+41 16 08</TD><TD>10.68</TD><TD>41.27</TD></TR>
        </TABLEDATA>
      </DATA>
    </TABLE>
  </RESOURCE>
</VOTABLE>"#;

    #[test]
    fn query_url_encodes_identifier() {
        let url = simbad_query_url("M 31");
        assert!(url.starts_with(SIMBAD_BASE_URL));
        assert!(url.contains("sim-id"));
        assert!(url.contains("output.format=votable"));
        assert!(url.contains("Ident=M%2031"));
    }

    #[test]
    fn one_row_reply_is_extracted() {
        let result = parse_simbad_votable(REPLY).unwrap();
        // TYPED_ID (the query echo) wins over MAIN_ID
        assert_eq!(result.name, "m31");
        assert_eq!(result.coord_system, "ICRS");
        assert_eq!(result.epoch, "J2000");
        assert_eq!(result.ra_deg, 10.68);
        assert_eq!(result.dec_deg, 41.27);
        assert_eq!(result.extra_rows, 0);
    }

    #[test]
    fn sexagesimal_text_columns_are_skipped() {
        // RA/DEC text columns precede RA_d/DEC_d; the numeric pair must win
        let result = parse_simbad_votable(REPLY).unwrap();
        assert_eq!(result.ra_deg, 10.68);
    }

    #[test]
    fn main_id_fallback_when_query_echo_is_absent() {
        let reply = REPLY.replace("TYPED_ID", "OTHER_ID");
        let result = parse_simbad_votable(&reply).unwrap();
        // falls back to MAIN_ID, canonicalized
        assert_eq!(result.name, "m31");
    }

    #[test]
    fn no_name_column_is_an_error() {
        let reply = REPLY
            .replace("TYPED_ID", "QUERY")
            .replace("MAIN_ID", "OBJECT");
        let err = parse_simbad_votable(&reply).unwrap_err();
        assert!(matches!(err, StarlistError::NameColumnNotFound));
    }

    #[test]
    fn multi_row_reply_uses_first_row() {
        let reply = REPLY.replace(
            "</TABLEDATA>",
            "<TR><TD>M  32</TD><TD>M 32</TD><TD>x</TD><TD>y</TD><TD>10.67</TD><TD>40.87</TD></TR></TABLEDATA>",
        );
        let result = parse_simbad_votable(&reply).unwrap();
        assert_eq!(result.name, "m31");
        assert_eq!(result.extra_rows, 1);
    }

    #[test]
    fn to_target_keeps_degree_coordinates() {
        let result = parse_simbad_votable(REPLY).unwrap();
        let target = result.to_target(&SpaceSys::icrs());
        assert_eq!(target.source_name, "m31");
        assert_eq!(target.source_coordinates.ra, Quantity::new(10.68, DEGREES));
        assert_eq!(target.position_epoch, "J2000.0");
    }
}

//! # Fixed-order target list reader
//!
//! Independent, simpler ingestion path for a line-oriented plain-text
//! format. Each non-empty, non-comment line is split on commas into tokens
//! in the strict order
//!
//! ```text
//! name, RA, Dec, [pmRA, pmDec, [parallax, [radialVelocity]]]
//! ```
//!
//! There is no column-name resolution here; units are fixed by position
//! (degrees for RA/Dec, mas/yr for proper motion, mas for parallax, km/s for
//! radial velocity).
//!
//! ## Arity rules
//! -----------------
//! * fewer than 3 tokens — malformed;
//! * exactly 4 tokens — malformed: proper motion must be supplied as a
//!   complete RA/Dec pair or not at all, so an even split leaving one of the
//!   pair absent is corrupt data, not "proper motion omitted";
//! * more than 7 tokens — malformed;
//! * 3, 5, 6 or 7 tokens — valid, with empty optional tokens treated as
//!   absent.
//!
//! A line-final delimiter contributes no field: `"gamma,1.0,2.0,,"` splits
//! into 4 fields (the trailing comma is dropped) and is rejected under the
//! exactly-4 rule.
//!
//! Cross-row uniqueness and capacity checks are **not** performed on this
//! path; that responsibility belongs to the caller.
use camino::Utf8Path;

use crate::starlist_errors::StarlistError;
use crate::target::{SpaceSys, Target};
use crate::units::{Quantity, DEGREES, KM_PER_SECOND, MAS, MAS_PER_YEAR};

/// Read and parse the fixed-order target list at `path`.
pub fn read_target_list(
    path: &Utf8Path,
    space_sys: &SpaceSys,
) -> Result<Vec<Target>, StarlistError> {
    let text = std::fs::read_to_string(path)?;
    parse_target_list(&text, space_sys)
}

/// Parse fixed-order target list text, one target per non-empty line.
pub fn parse_target_list(text: &str, space_sys: &SpaceSys) -> Result<Vec<Target>, StarlistError> {
    let mut targets = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        targets.push(parse_line(line, idx + 1, space_sys)?);
    }

    Ok(targets)
}

fn parse_line(line: &str, line_no: usize, space_sys: &SpaceSys) -> Result<Target, StarlistError> {
    let malformed = |reason: String| StarlistError::MalformedLine {
        line: line_no,
        reason,
    };

    let mut tokens: Vec<&str> = line.split(',').map(str::trim).collect();

    // a line-final delimiter contributes no field of its own
    if tokens.len() > 1 && tokens.last() == Some(&"") {
        tokens.pop();
    }

    match tokens.len() {
        0..=2 => {
            return Err(malformed(format!(
                "expected at least 'name, RA, Dec' but found {} field(s)",
                tokens.len()
            )))
        }
        // an incomplete proper-motion pair is corrupt data, not an omission
        4 => {
            return Err(malformed(
                "proper motion must be given as a complete pmRA, pmDec pair".into(),
            ))
        }
        5..=7 | 3 => {}
        n => {
            return Err(malformed(format!(
                "expected at most 7 fields (name, RA, Dec, pmRA, pmDec, parallax, radial velocity) but found {n}"
            )))
        }
    }

    let name = tokens[0];
    if name.is_empty() {
        return Err(malformed("target name is empty".into()));
    }

    let number = |token: &str, field: &str| -> Result<f64, StarlistError> {
        token
            .parse::<f64>()
            .map_err(|_| malformed(format!("invalid {field} value '{token}'")))
    };

    let optional = |token: Option<&&str>, field: &str| -> Result<Option<f64>, StarlistError> {
        match token {
            None => Ok(None),
            Some(t) if t.is_empty() => Ok(None),
            Some(t) => number(t, field).map(Some),
        }
    };

    let mut target = Target::new(
        name,
        Quantity::new(number(tokens[1], "RA")?, DEGREES),
        Quantity::new(number(tokens[2], "Dec")?, DEGREES),
        space_sys,
    );

    target.pm_ra = optional(tokens.get(3), "pmRA")?.map(|v| Quantity::new(v, MAS_PER_YEAR));
    target.pm_dec = optional(tokens.get(4), "pmDec")?.map(|v| Quantity::new(v, MAS_PER_YEAR));
    target.parallax = optional(tokens.get(5), "parallax")?.map(|v| Quantity::new(v, MAS));
    target.source_velocity =
        optional(tokens.get(6), "radial velocity")?.map(|v| Quantity::new(v, KM_PER_SECOND));

    Ok(target)
}

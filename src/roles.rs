//! # Column roles and heuristic column resolution
//!
//! External catalogs name their columns inconsistently (`RA`, `RA_d`,
//! `ra_deg`, ...). This module maps the semantic roles the pipeline needs
//! onto concrete column indices using a static, ordered table of
//! case-insensitive patterns anchored at a role-specific prefix.
//!
//! ## Matching rules
//! -----------------
//! * Columns are scanned in declaration order; the **first** match wins.
//! * The identifier role tries its patterns in strict priority order
//!   (`^ID`, then `^NAME`, then `^MAIN_ID`) and takes the first pattern
//!   that yields any match, not the union of all three.
//! * An unresolved optional role is simply absent from the [`RoleMap`];
//!   unresolved mandatory roles are aggregated by the caller into a single
//!   [`MissingColumns`](crate::starlist_errors::StarlistError::MissingColumns)
//!   error.
use std::fmt;

use regex::RegexBuilder;

use crate::table::Table;

/// Semantic role a source column can play in the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Identifier,
    RightAscension,
    Declination,
    ProperMotionRa,
    ProperMotionDec,
    Parallax,
    RadialVelocity,
}

/// Identifier patterns in strict priority order.
pub const IDENTIFIER_PATTERNS: [&str; 3] = ["^ID", "^NAME", "^MAIN_ID"];

/// Single anchored pattern per non-identifier role.
const ROLE_PATTERNS: [(ColumnRole, &str); 6] = [
    (ColumnRole::RightAscension, "^RA"),
    (ColumnRole::Declination, "^DEC"),
    (ColumnRole::ProperMotionRa, "^PMRA"),
    (ColumnRole::ProperMotionDec, "^PMDEC"),
    (ColumnRole::Parallax, "^PLX"),
    (ColumnRole::RadialVelocity, "^RV"),
];

const MANDATORY_ROLES: [ColumnRole; 3] = [
    ColumnRole::Identifier,
    ColumnRole::RightAscension,
    ColumnRole::Declination,
];

impl ColumnRole {
    /// Label used in user-facing diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnRole::Identifier => "ID/NAME",
            ColumnRole::RightAscension => "RA",
            ColumnRole::Declination => "DEC",
            ColumnRole::ProperMotionRa => "PMRA",
            ColumnRole::ProperMotionDec => "PMDEC",
            ColumnRole::Parallax => "PLX",
            ColumnRole::RadialVelocity => "RV",
        }
    }

    fn index(&self) -> usize {
        match self {
            ColumnRole::Identifier => 0,
            ColumnRole::RightAscension => 1,
            ColumnRole::Declination => 2,
            ColumnRole::ProperMotionRa => 3,
            ColumnRole::ProperMotionDec => 4,
            ColumnRole::Parallax => 5,
            ColumnRole::RadialVelocity => 6,
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Return the first column whose name matches `pattern` (case-insensitive),
/// scanning columns in declaration order. An invalid pattern resolves to no
/// match.
pub fn find_column(table: &Table, pattern: &str) -> Option<usize> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    (0..table.n_cols()).find(|&col| re.is_match(&table.column(col).name))
}

/// Association of roles to column indices, at most one column per role.
#[derive(Debug, Clone, Default)]
pub struct RoleMap {
    slots: [Option<usize>; 7],
}

impl RoleMap {
    /// Resolve every role against `table`.
    ///
    /// Optional roles that match nothing are left unset; mandatory roles are
    /// not checked here (see
    /// [`convert_to_targets`](crate::table_ingest::convert_to_targets) for
    /// the aggregated check).
    pub fn resolve(table: &Table) -> RoleMap {
        let mut map = RoleMap::default();

        // first identifier pattern with any match wins the whole chain
        for pattern in IDENTIFIER_PATTERNS {
            if let Some(col) = find_column(table, pattern) {
                map.slots[ColumnRole::Identifier.index()] = Some(col);
                break;
            }
        }

        for (role, pattern) in ROLE_PATTERNS {
            map.slots[role.index()] = find_column(table, pattern);
        }

        map
    }

    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        self.slots[role.index()]
    }

    /// Mandatory roles left unresolved, in declaration order.
    pub fn missing_mandatory(&self) -> Vec<ColumnRole> {
        MANDATORY_ROLES
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }
}

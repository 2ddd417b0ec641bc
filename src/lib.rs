//! # Starlist
//!
//! Celestial target-list ingestion: turns externally supplied tabular
//! astronomical data into validated, unit-normalized [`Target`] records
//! ready for persistence.
//!
//! ## Ingestion paths
//! -----------------
//! * **Generic tables** — VOTable, ECSV, or delimited text with
//!   heuristically resolved columns:
//!   [`table_ingest::convert_to_targets`] and the [`table_ingest::ingest_path`] /
//!   [`table_ingest::ingest_bytes`] conveniences.
//! * **Fixed-order lists** — one target per line in a strict
//!   `name, RA, Dec, [pmRA, pmDec, [parallax, [radialVelocity]]]` order:
//!   [`list_reader::parse_target_list`].
//! * **Remote lookup** — single-name resolution against SIMBAD:
//!   [`simbad::find_target`].
//!
//! All paths are synchronous pure transforms; nothing is cached or
//! persisted, and every validation failure is aggregated into one
//! structured [`StarlistError`] so a caller can present a single actionable
//! diagnostic.
//!
//! ## Quick-Start
//! -----------------
//! ```rust
//! use starlist::{convert_to_targets, SpaceSys, Table};
//!
//! # fn run() -> Result<(), starlist::StarlistError> {
//! let table = Table::from_bytes(b"ID,RA,DEC\nalpha,10.0,20.0\nbeta,30.0,40.0\n")?;
//! let targets = convert_to_targets(&table, &SpaceSys::icrs(), &[], 10)?;
//! assert_eq!(targets.len(), 2);
//! # Ok(()) }
//! # run().unwrap();
//! ```
pub mod env_state;
pub mod list_reader;
pub mod roles;
pub mod simbad;
pub mod starlist_errors;
pub mod table;
pub mod table_ingest;
pub mod target;
pub mod units;

pub use env_state::StarlistEnv;
pub use roles::{find_column, ColumnRole, RoleMap};
pub use simbad::SimbadResult;
pub use starlist_errors::StarlistError;
pub use table::{Cell, ColumnInfo, Table};
pub use table_ingest::{convert_to_targets, ingest_bytes, ingest_path};
pub use target::{EquatorialPoint, SpaceSys, Target, J2000_EPOCH};
pub use units::Quantity;

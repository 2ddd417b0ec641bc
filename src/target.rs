//! # Target model
//!
//! Output records of the ingestion pipeline. A [`Target`] is a celestial
//! source: a name, an equatorial position with its reference system, a fixed
//! position epoch, and optional kinematic attributes. Values are immutable
//! once built; ownership passes to the caller (typically a persistence
//! layer) as soon as ingestion returns.
use serde::Serialize;

use crate::units::Quantity;

/// Position epoch stamped on every materialized target.
pub const J2000_EPOCH: &str = "J2000.0";

/// Opaque handle to the coordinate reference system the caller works in.
///
/// The pipeline never interprets the frame label; it is attached verbatim to
/// every coordinate pair needing spatial context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpaceSys {
    frame: String,
}

impl SpaceSys {
    pub fn new(frame: impl Into<String>) -> Self {
        SpaceSys {
            frame: frame.into(),
        }
    }

    /// The International Celestial Reference System, the usual caller choice.
    pub fn icrs() -> Self {
        SpaceSys::new("ICRS")
    }

    pub fn frame(&self) -> &str {
        &self.frame
    }
}

/// An equatorial (RA, Dec) position within a reference system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquatorialPoint {
    pub ra: Quantity,
    pub dec: Quantity,
    pub space_sys: SpaceSys,
}

/// A celestial target ready for persistence.
///
/// `pm_ra`/`pm_dec`/`parallax`/`source_velocity` are `None` when the source
/// table omitted the column or encoded the cell as not-a-number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub source_name: String,
    pub source_coordinates: EquatorialPoint,
    pub position_epoch: String,
    pub pm_ra: Option<Quantity>,
    pub pm_dec: Option<Quantity>,
    pub parallax: Option<Quantity>,
    pub source_velocity: Option<Quantity>,
}

impl Target {
    /// Build a target with only the mandatory fields set; optional kinematic
    /// attributes start absent.
    pub fn new(source_name: impl Into<String>, ra: Quantity, dec: Quantity, space_sys: &SpaceSys) -> Self {
        Target {
            source_name: source_name.into(),
            source_coordinates: EquatorialPoint {
                ra,
                dec,
                space_sys: space_sys.clone(),
            },
            position_epoch: J2000_EPOCH.to_string(),
            pm_ra: None,
            pm_dec: None,
            parallax: None,
            source_velocity: None,
        }
    }
}

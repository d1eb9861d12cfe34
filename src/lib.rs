#![doc = include_str!("../DESIGN.md")]

/// The bread-and-butter, shrink-wrapped and ready to use
pub mod prelude {
    pub use crate::Direction;
    pub use crate::Error;
    pub use crate::atlas::{Atlas, AtlasPage};
    pub use crate::datum::{Datum, DatumId};
    pub use crate::distance::{DistanceMethod, meters_between, polygon_area, polygon_perimeter};
    pub use crate::ellipsoid::Ellipsoid;
    pub use crate::geopoint::{convert, GeoPoint, UtmZoneStyle, decimal_degrees_to_dms, parse_lat_lon};
    pub use crate::registry::Registry;
    pub use crate::spatial_ref::{CoordSys, CoordSysType, SpatialReference};
    pub use crate::units::MapUnit;
}

/// Extended prelude for authoring projections, grid codecs and datum shifts
pub mod authoring {
    pub use crate::prelude::*;

    pub use crate::datum_shift::{DatumShift, ShiftBounds, ShiftMethod};
    pub use crate::grid::GridCodec;
    pub use crate::math::horner;
    pub use crate::projection::Projection;

    pub use log::{debug, trace, warn};
}

use thiserror::Error as ThisError;

/// The crate-wide error enumeration (spec. §7). Every fallible routine in
/// this crate fails with one of these tagged variants rather than a bare
/// `String`, following the single-enum convention of the teacher crate's
/// own `Error`.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("unknown reference '{0}'")]
    UnknownReference(String),

    #[error("unknown datum '{0}'")]
    UnknownDatum(String),

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("cannot convert between incompatible unit kinds ('{0}' -> '{1}')")]
    UnitMismatch(String, String),

    #[error("latitude/longitude ({lat}, {lon}) is out of domain for this operation")]
    OutOfDomain { lat: f64, lon: f64 },

    #[error("could not parse {what} from '{input}'")]
    ParseError { what: &'static str, input: String },

    #[error("no datum shift registered from '{from}' to '{to}'")]
    NoDatumShift { from: String, to: String },

    #[error("point lies outside the bounds declared for shift method {method:?}: {bounds}")]
    ShiftOutOfBounds {
        method: ShiftMethodTag,
        bounds: String,
    },

    #[error("reverse datum shift with method {0:?} failed to converge within 50 iterations")]
    NonConvergent(ShiftMethodTag),

    #[error("atlas '{0}' has not been registered yet")]
    NotReady(String),
}

/// A lightweight tag identifying a datum shift method, used in error
/// messages and for the method-rank ordering in spec. §3 without requiring
/// the full parameter payload of [`ShiftMethod`](crate::ShiftMethod).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShiftMethodTag {
    Synonym,
    Mre,
    Helmert,
    Molodensky,
    Grid,
}

/// `Fwd`: run a two-way operation in the forward direction.
/// `Inv`: run a two-way operation in the inverse direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Fwd,
    Inv,
}

mod atlas;
mod datum;
mod datum_shift;
mod distance;
mod ellipsoid;
mod geopoint;
mod grid;
mod math;
mod projection;
mod registry;
mod spatial_ref;
mod units;

pub use atlas::{Atlas, AtlasPage};
pub use datum::{Datum, DatumId};
pub use datum_shift::{DatumShift, ShiftBounds, ShiftMethod};
pub use distance::{DistanceMethod, meters_between, polygon_area, polygon_perimeter};
pub use ellipsoid::Ellipsoid;
pub use geopoint::{convert, GeoPoint, UtmZoneStyle, decimal_degrees_to_dms, parse_lat_lon};
pub use grid::{is_valid_usng, parse_usng, parse_utm};
pub use registry::Registry;
pub use spatial_ref::{CoordSys, CoordSysType, SpatialReference};
pub use units::MapUnit;

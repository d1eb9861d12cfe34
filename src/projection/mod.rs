//! The projection kernel (spec. §4.3): pure forward/inverse transforms
//! between geographic coordinates and Cartesian, for the six supported
//! projections.
//!
//! Each projection is a free-standing `fwd`/`inv` pair operating only on
//! its own parameters, mirroring the teacher crate's one-file-per-
//! projection layout under `inner_op/` — but expressed as plain functions
//! of `(SpatialReference, lon, lat)` rather than as `Op`s threaded through
//! a string-parsed pipeline, per spec. §9's re-architecture guidance
//! (explicit stages over a dynamic pipeline).

mod albers;
mod lcc;
mod merc;
mod stereo;
mod tmerc;

use crate::{CoordSysType, Error, SpatialReference};

/// A pure forward/inverse map projection. `fwd` maps geographic
/// `(lon, lat)` radians to Cartesian `(x, y)` in the reference's units;
/// `inv` is its partner.
pub trait Projection {
    fn fwd(&self, sref: &SpatialReference, lon: f64, lat: f64) -> Result<(f64, f64), Error>;
    fn inv(&self, sref: &SpatialReference, x: f64, y: f64) -> Result<(f64, f64), Error>;
}

/// Dispatch to the projection implementation named by `sref.coord_sys().kind()`.
pub fn projection_for(sref: &SpatialReference) -> Result<Box<dyn Projection>, Error> {
    match sref.coord_sys().kind() {
        CoordSysType::Lambert => Ok(Box::new(lcc::LambertConformalConic)),
        CoordSysType::TransverseMercator => Ok(Box::new(tmerc::TransverseMercator)),
        CoordSysType::Albers => Ok(Box::new(albers::AlbersEqualArea)),
        CoordSysType::Mercator => Ok(Box::new(merc::Mercator)),
        CoordSysType::Stereographic => Ok(Box::new(stereo::Stereographic)),
        other => Err(Error::UnknownReference(format!("{other:?}"))),
    }
}

/// Shared domain check for forward projection (spec. §4.3: `OutOfDomain`
/// when `|lat|>90` or `|lon|>180` on forward call).
pub(crate) fn check_domain(lon_deg: f64, lat_deg: f64) -> Result<(), Error> {
    if lat_deg.abs() > 90.0 || lon_deg.abs() > 180.0 {
        return Err(Error::OutOfDomain {
            lat: lat_deg,
            lon: lon_deg,
        });
    }
    Ok(())
}

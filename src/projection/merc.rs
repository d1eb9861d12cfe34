//! Mercator (spec. §4.3), the simplest of the conformal family: a direct
//! application of the `ts`/`pj_phi2` pair already used by Lambert/TM.

use super::{check_domain, Projection};
use crate::math::{pj_phi2, ts};
use crate::{Error, SpatialReference};

pub struct Mercator;

impl Projection for Mercator {
    fn fwd(&self, sref: &SpatialReference, lon: f64, lat: f64) -> Result<(f64, f64), Error> {
        check_domain(lon.to_degrees(), lat.to_degrees())?;
        let (a, e2) = sref.ellipsoid_params()?;
        let e = e2.sqrt();
        let (_, origin_lon) = sref.origin().unwrap_or((0.0, 0.0));
        let k0 = sref.scale_factor();
        let (fe, fn_) = sref.false_origin();

        let t = ts(lat.sin_cos(), e);
        let x = a * k0 * (lon - origin_lon.to_radians()) + fe;
        let y = -a * k0 * t.ln() + fn_;
        Ok((x, y))
    }

    fn inv(&self, sref: &SpatialReference, x: f64, y: f64) -> Result<(f64, f64), Error> {
        let (a, e2) = sref.ellipsoid_params()?;
        let e = e2.sqrt();
        let (_, origin_lon) = sref.origin().unwrap_or((0.0, 0.0));
        let k0 = sref.scale_factor();
        let (fe, fn_) = sref.false_origin();

        let t = (-(y - fn_) / (a * k0)).exp();
        let lat = pj_phi2(t, e);
        let lon = (x - fe) / (a * k0) + origin_lon.to_radians();
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoordSys, CoordSysType};

    fn web_mercator() -> SpatialReference {
        let cs = CoordSys::new("WORLD-MERC", CoordSysType::Mercator);
        SpatialReference::new(cs, "WGS84", "m")
            .unwrap()
            .with_origin(0.0, 0.0)
            .with_scale_factor(1.0)
            .with_ellipsoid(6_378_137.0, 0.006_694_379_990_14)
    }

    #[test]
    fn forward_then_inverse_recovers_the_point() {
        let sref = web_mercator();
        let lon = 10.0f64.to_radians();
        let lat = 52.0f64.to_radians();
        let proj = Mercator;
        let (x, y) = proj.fwd(&sref, lon, lat).unwrap();
        let (lon2, lat2) = proj.inv(&sref, x, y).unwrap();
        assert!((lon - lon2).to_degrees().abs() < 1e-9);
        assert!((lat - lat2).to_degrees().abs() < 1e-9);
    }

    #[test]
    fn equator_maps_to_zero_northing() {
        let sref = web_mercator();
        let (_, y) = Mercator.fwd(&sref, 0.0, 0.0).unwrap();
        assert!(y.abs() < 1e-6);
    }
}

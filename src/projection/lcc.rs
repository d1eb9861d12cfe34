//! Lambert Conformal Conic, 2-standard-parallel form (spec. §4.3), grounded
//! in the teacher crate's `inner_op/lcc.rs` but rebuilt to take its
//! parameters from a [`SpatialReference`] rather than an `Op` pipeline
//! parameter table.

use super::{check_domain, Projection};
use crate::math::{pj_msfn, pj_phi2, ts};
use crate::{Error, SpatialReference};

pub struct LambertConformalConic;

impl Projection for LambertConformalConic {
    fn fwd(&self, sref: &SpatialReference, lon: f64, lat: f64) -> Result<(f64, f64), Error> {
        check_domain(lon.to_degrees(), lat.to_degrees())?;
        let (_, e2) = sref.ellipsoid_params()?;
        let e = e2.sqrt();
        let (parallel1, parallel2) = sref.parallels().ok_or_else(|| {
            Error::UnknownReference(format!(
                "{} is missing its standard parallels",
                sref.coord_sys().code()
            ))
        })?;
        let (origin_lat, origin_lon) = sref.origin().unwrap_or((0.0, 0.0));
        let (fe, fn_) = sref.false_origin();
        let rho0 = radius(sref, e, origin_lat.to_radians(), parallel1.to_radians(), parallel2.to_radians())?;

        let n = cone_constant(e, parallel1.to_radians(), parallel2.to_radians());
        let f = scale_factor(e, parallel1.to_radians(), n);
        let a = sref.ellipsoid_params()?.0;

        let t = ts(lat.sin_cos(), e);
        let rho = a * f * t.powf(n);
        let theta = n * (lon - origin_lon.to_radians());

        let x = rho * theta.sin() + fe;
        let y = rho0 - rho * theta.cos() + fn_;
        Ok((x, y))
    }

    fn inv(&self, sref: &SpatialReference, x: f64, y: f64) -> Result<(f64, f64), Error> {
        let (a, e2) = sref.ellipsoid_params()?;
        let e = e2.sqrt();
        let (parallel1, parallel2) = sref.parallels().ok_or_else(|| {
            Error::UnknownReference(format!(
                "{} is missing its standard parallels",
                sref.coord_sys().code()
            ))
        })?;
        let (origin_lat, origin_lon) = sref.origin().unwrap_or((0.0, 0.0));
        let (fe, fn_) = sref.false_origin();

        let n = cone_constant(e, parallel1.to_radians(), parallel2.to_radians());
        let f = scale_factor(e, parallel1.to_radians(), n);
        let rho0 = radius(sref, e, origin_lat.to_radians(), parallel1.to_radians(), parallel2.to_radians())?;

        let xp = x - fe;
        let yp = rho0 - (y - fn_);
        let rho = xp.hypot(yp) * n.signum();
        let theta = (xp / n.signum()).atan2(yp / n.signum());

        let t = (rho / (a * f)).powf(1.0 / n);
        let lat = pj_phi2(t, e);
        let lon = theta / n + origin_lon.to_radians();
        Ok((lon, lat))
    }
}

fn cone_constant(e: f64, phi1: f64, phi2: f64) -> f64 {
    let m1 = pj_msfn(phi1.sin_cos(), e * e);
    let m2 = pj_msfn(phi2.sin_cos(), e * e);
    let t1 = ts(phi1.sin_cos(), e);
    let t2 = ts(phi2.sin_cos(), e);
    if (phi1 - phi2).abs() < 1e-12 {
        phi1.sin()
    } else {
        (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
    }
}

fn scale_factor(e: f64, phi1: f64, n: f64) -> f64 {
    let m1 = pj_msfn(phi1.sin_cos(), e * e);
    let t1 = ts(phi1.sin_cos(), e);
    m1 / (n * t1.powf(n))
}

fn radius(sref: &SpatialReference, e: f64, origin_lat: f64, phi1: f64, phi2: f64) -> Result<f64, Error> {
    let (a, _) = sref.ellipsoid_params()?;
    let n = cone_constant(e, phi1, phi2);
    let f = scale_factor(e, phi1, n);
    let t0 = ts(origin_lat.sin_cos(), e);
    Ok(a * f * t0.powf(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoordSys, CoordSysType};

    fn nc_state_plane() -> SpatialReference {
        let cs = CoordSys::new("NC-SPCS", CoordSysType::Lambert);
        SpatialReference::new(cs, "NAD83", "m")
            .unwrap()
            .with_origin(33.75, -79.0)
            .with_parallels(34.333_333, 36.166_667)
            .with_false_origin(609_601.22, 0.0)
            .with_scale_factor(1.0)
            .with_ellipsoid(6_378_137.0, 0.006_694_38)
    }

    #[test]
    fn forward_then_inverse_recovers_the_point() {
        let sref = nc_state_plane();
        let lon = (-78.5f64).to_radians();
        let lat = 35.5f64.to_radians();
        let proj = LambertConformalConic;
        let (x, y) = proj.fwd(&sref, lon, lat).unwrap();
        let (lon2, lat2) = proj.inv(&sref, x, y).unwrap();
        assert!((lon - lon2).to_degrees().abs() < 1e-7);
        assert!((lat - lat2).to_degrees().abs() < 1e-7);
    }

    #[test]
    fn missing_parallels_is_an_error() {
        let cs = CoordSys::new("LCC-BARE", CoordSysType::Lambert);
        let sref = SpatialReference::new(cs, "NAD83", "m")
            .unwrap()
            .with_ellipsoid(6_378_137.0, 0.006_694_38);
        assert!(LambertConformalConic.fwd(&sref, 0.0, 0.5).is_err());
    }
}

//! Albers Equal-Area Conic, 2-standard-parallel form (spec. §4.3), using
//! the authalic-latitude function `qs` the same way the teacher crate's
//! `inner_op` authalic helpers do, generalized to the spec's parameter set.

use super::{check_domain, Projection};
use crate::math::qs;
use crate::{Error, SpatialReference};

pub struct AlbersEqualArea;

impl Projection for AlbersEqualArea {
    fn fwd(&self, sref: &SpatialReference, lon: f64, lat: f64) -> Result<(f64, f64), Error> {
        check_domain(lon.to_degrees(), lat.to_degrees())?;
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

        let phi1 = parallel1.to_radians();
        let phi2 = parallel2.to_radians();
        let phi0 = origin_lat.to_radians();
        let lon0 = origin_lon.to_radians();

        let m1 = phi1.cos() / (1.0 - e2 * phi1.sin().powi(2)).sqrt();
        let m2 = phi2.cos() / (1.0 - e2 * phi2.sin().powi(2)).sqrt();
        let q1 = qs(phi1.sin(), e);
        let q2 = qs(phi2.sin(), e);
        let q0 = qs(phi0.sin(), e);
        let q = qs(lat.sin(), e);

        let n = if (phi1 - phi2).abs() < 1e-12 {
            phi1.sin()
        } else {
            (m1 * m1 - m2 * m2) / (q2 - q1)
        };
        let c = m1 * m1 + n * q1;
        let rho0 = a * (c - n * q0).sqrt() / n;
        let rho = a * (c - n * q).sqrt() / n;
        let theta = n * (lon - lon0);

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

        let phi1 = parallel1.to_radians();
        let phi2 = parallel2.to_radians();
        let phi0 = origin_lat.to_radians();
        let lon0 = origin_lon.to_radians();

        let m1 = phi1.cos() / (1.0 - e2 * phi1.sin().powi(2)).sqrt();
        let m2 = phi2.cos() / (1.0 - e2 * phi2.sin().powi(2)).sqrt();
        let q1 = qs(phi1.sin(), e);
        let q2 = qs(phi2.sin(), e);
        let q0 = qs(phi0.sin(), e);

        let n = if (phi1 - phi2).abs() < 1e-12 {
            phi1.sin()
        } else {
            (m1 * m1 - m2 * m2) / (q2 - q1)
        };
        let c = m1 * m1 + n * q1;
        let rho0 = a * (c - n * q0).sqrt() / n;

        let xp = x - fe;
        let yp = rho0 - (y - fn_);
        let rho = xp.hypot(yp) * n.signum();
        let theta = (xp / n.signum()).atan2(yp / n.signum());

        let q = (c - (rho * n / a).powi(2)) / n;
        let lat = authalic_to_geographic(q, e);
        let lon = theta / n + lon0;
        Ok((lon, lat))
    }
}

/// Invert `q(φ)` by Newton iteration, following Snyder (1987) eq. 3-16.
fn authalic_to_geographic(q: f64, e: f64) -> f64 {
    if e < 1e-7 {
        return (q / 2.0).asin();
    }
    let one_es = 1.0 - e * e;
    let mut phi = (q / 2.0).asin();
    for _ in 0..15 {
        let sinphi = phi.sin();
        let con = e * sinphi;
        let com = 1.0 - con * con;
        let dphi = com * com / (2.0 * phi.cos())
            * (q / one_es - sinphi / com + (1.0 / (2.0 * e)) * ((1.0 - con) / (1.0 + con)).ln());
        phi += dphi;
        if dphi.abs() < 1e-12 {
            break;
        }
    }
    phi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoordSys, CoordSysType};

    fn conus_albers() -> SpatialReference {
        let cs = CoordSys::new("CONUS-ALBERS", CoordSysType::Albers);
        SpatialReference::new(cs, "NAD83", "m")
            .unwrap()
            .with_origin(23.0, -96.0)
            .with_parallels(29.5, 45.5)
            .with_false_origin(0.0, 0.0)
            .with_ellipsoid(6_378_137.0, 0.006_694_38)
    }

    #[test]
    fn forward_then_inverse_recovers_the_point() {
        let sref = conus_albers();
        let lon = (-100.0f64).to_radians();
        let lat = 40.0f64.to_radians();
        let proj = AlbersEqualArea;
        let (x, y) = proj.fwd(&sref, lon, lat).unwrap();
        let (lon2, lat2) = proj.inv(&sref, x, y).unwrap();
        assert!((lon - lon2).to_degrees().abs() < 1e-6);
        assert!((lat - lat2).to_degrees().abs() < 1e-6);
    }
}

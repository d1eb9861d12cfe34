//! Oblique and polar Stereographic (spec. §4.3), including the polar/UPS
//! special case where the oblique formula's `cos χ₀` denominator vanishes.

use super::{check_domain, Projection};
use crate::math::{pj_msfn, pj_phi2, ts};
use crate::{Error, SpatialReference};

pub struct Stereographic;

const POLAR_THRESHOLD_DEG: f64 = 89.999;

impl Projection for Stereographic {
    fn fwd(&self, sref: &SpatialReference, lon: f64, lat: f64) -> Result<(f64, f64), Error> {
        check_domain(lon.to_degrees(), lat.to_degrees())?;
        let (a, e2) = sref.ellipsoid_params()?;
        let e = e2.sqrt();
        let (origin_lat, origin_lon) = sref.origin().unwrap_or((0.0, 0.0));
        let k0 = sref.scale_factor();
        let (fe, fn_) = sref.false_origin();
        let lon0 = origin_lon.to_radians();
        let dlon = lon - lon0;

        if origin_lat.abs() >= POLAR_THRESHOLD_DEG {
            let north = origin_lat > 0.0;
            let t = ts(lat.sin_cos(), e);
            let rho = 2.0 * a * k0 * t
                / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt();
            let x = rho * dlon.sin() + fe;
            let y = if north { -rho * dlon.cos() } else { rho * dlon.cos() } + fn_;
            return Ok((x, y));
        }

        let phi0 = origin_lat.to_radians();
        let chi = conformal_latitude(lat, e);
        let chi0 = conformal_latitude(phi0, e);
        let (sinchi, coschi) = chi.sin_cos();
        let (sinchi0, coschi0) = chi0.sin_cos();
        let m0 = pj_msfn(phi0.sin_cos(), e2);

        let big_a = 2.0 * a * k0 * m0
            / (coschi0 * (1.0 + sinchi0 * sinchi + coschi0 * coschi * dlon.cos()));

        let x = big_a * coschi * dlon.sin() + fe;
        let y = big_a * (coschi0 * sinchi - sinchi0 * coschi * dlon.cos()) + fn_;
        Ok((x, y))
    }

    fn inv(&self, sref: &SpatialReference, x: f64, y: f64) -> Result<(f64, f64), Error> {
        let (a, e2) = sref.ellipsoid_params()?;
        let e = e2.sqrt();
        let (origin_lat, origin_lon) = sref.origin().unwrap_or((0.0, 0.0));
        let k0 = sref.scale_factor();
        let (fe, fn_) = sref.false_origin();
        let lon0 = origin_lon.to_radians();

        let xp = x - fe;
        let yp = y - fn_;

        if origin_lat.abs() >= POLAR_THRESHOLD_DEG {
            let north = origin_lat > 0.0;
            let rho = xp.hypot(yp);
            let t = rho * ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt() / (2.0 * a * k0);
            let lat = if north { pj_phi2(t, e) } else { -pj_phi2(t, e) };
            let lon = if rho < 1e-12 {
                lon0
            } else if north {
                lon0 + xp.atan2(-yp)
            } else {
                lon0 + xp.atan2(yp)
            };
            return Ok((lon, lat));
        }

        let phi0 = origin_lat.to_radians();
        let chi0 = conformal_latitude(phi0, e);
        let (sinchi0, coschi0) = chi0.sin_cos();
        let m0 = pj_msfn(phi0.sin_cos(), e2);

        let rho = xp.hypot(yp);
        if rho < 1e-12 {
            return Ok((lon0, phi0));
        }
        let c = 2.0 * (rho * coschi0 / (2.0 * a * k0 * m0)).atan();
        let (sinc, cosc) = c.sin_cos();

        let chi = (cosc * sinchi0 + yp * sinc * coschi0 / rho).asin();
        let lon = lon0 + (xp * sinc).atan2(rho * coschi0 * cosc - yp * sinchi0 * sinc);
        let lat = inverse_conformal_latitude(chi, e);
        Ok((lon, lat))
    }
}

/// The conformal latitude `χ`, Snyder (1987) eq. 3-1.
fn conformal_latitude(phi: f64, e: f64) -> f64 {
    let sinphi = phi.sin();
    2.0 * (((1.0 + sinphi) / (1.0 - sinphi)).sqrt()
        * ((1.0 - e * sinphi) / (1.0 + e * sinphi)).powf(e / 2.0))
        .atan()
        - std::f64::consts::FRAC_PI_2
}

/// Invert [`conformal_latitude`] via the `pj_phi2` machinery, matching
/// the relationship `ts(χ) == ts(φ)` used by the conformal projections.
fn inverse_conformal_latitude(chi: f64, e: f64) -> f64 {
    let t = (std::f64::consts::FRAC_PI_4 - chi / 2.0).tan();
    pj_phi2(t, e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoordSys, CoordSysType};

    fn polar_ups_north() -> SpatialReference {
        let cs = CoordSys::new("UPS-N", CoordSysType::Stereographic);
        SpatialReference::new(cs, "WGS84", "m")
            .unwrap()
            .with_origin(90.0, 0.0)
            .with_scale_factor(0.994)
            .with_false_origin(2_000_000.0, 2_000_000.0)
            .with_ellipsoid(6_378_137.0, 0.006_694_379_990_14)
    }

    fn oblique_stereo() -> SpatialReference {
        let cs = CoordSys::new("RD-NEW", CoordSysType::Stereographic);
        SpatialReference::new(cs, "WGS84", "m")
            .unwrap()
            .with_origin(52.0, 5.0)
            .with_scale_factor(0.9999)
            .with_false_origin(155_000.0, 463_000.0)
            .with_ellipsoid(6_378_137.0, 0.006_694_379_990_14)
    }

    #[test]
    fn polar_forward_then_inverse_recovers_the_point() {
        let sref = polar_ups_north();
        let lon = 30.0f64.to_radians();
        let lat = 85.0f64.to_radians();
        let proj = Stereographic;
        let (x, y) = proj.fwd(&sref, lon, lat).unwrap();
        let (lon2, lat2) = proj.inv(&sref, x, y).unwrap();
        assert!((lon - lon2).to_degrees().abs() < 1e-6);
        assert!((lat - lat2).to_degrees().abs() < 1e-6);
    }

    #[test]
    fn oblique_forward_then_inverse_recovers_the_point() {
        let sref = oblique_stereo();
        let lon = 5.5f64.to_radians();
        let lat = 52.3f64.to_radians();
        let proj = Stereographic;
        let (x, y) = proj.fwd(&sref, lon, lat).unwrap();
        let (lon2, lat2) = proj.inv(&sref, x, y).unwrap();
        assert!((lon - lon2).to_degrees().abs() < 1e-6);
        assert!((lat - lat2).to_degrees().abs() < 1e-6);
    }
}

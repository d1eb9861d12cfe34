//! Transverse Mercator, Snyder eqs. 8-1..8-9 (forward) / 8-19..8-25
//! (inverse), per spec. §4.3.

use super::{check_domain, Projection};
use crate::ellipsoid::{footprint_latitude, meridian_arc};
use crate::{Ellipsoid, Error, SpatialReference};

pub struct TransverseMercator;

impl Projection for TransverseMercator {
    fn fwd(&self, sref: &SpatialReference, lon: f64, lat: f64) -> Result<(f64, f64), Error> {
        check_domain(lon.to_degrees(), lat.to_degrees())?;
        let (a, e2) = sref.ellipsoid_params()?;
        let ellps = Ellipsoid::from_ae2(a, e2);

        let (origin_lat, origin_lon) = sref.origin().unwrap_or((0.0, 0.0));
        let origin_lat = origin_lat.to_radians();
        let origin_lon = origin_lon.to_radians();
        let k0 = sref.scale_factor();
        let (fe, fn_) = sref.false_origin();

        let ep2 = e2 / (1.0 - e2);
        let (sinphi, cosphi) = lat.sin_cos();
        let n = a / (1.0 - e2 * sinphi * sinphi).sqrt();
        let t = lat.tan().powi(2);
        let c = ep2 * cosphi.powi(2);
        let aa = (lon - origin_lon) * cosphi;

        let m = meridian_arc(&ellps, lat);
        let m0 = meridian_arc(&ellps, origin_lat);

        let aa3 = aa.powi(3);
        let aa4 = aa.powi(4);
        let aa5 = aa.powi(5);
        let aa6 = aa.powi(6);

        let x = k0 * n
            * (aa + (1.0 - t + c) * aa3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * aa5 / 120.0)
            + fe;

        let y = k0
            * (m - m0
                + n * lat.tan()
                    * (aa.powi(2) / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * aa4 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * aa6 / 720.0))
            + fn_;

        Ok((x, y))
    }

    fn inv(&self, sref: &SpatialReference, x: f64, y: f64) -> Result<(f64, f64), Error> {
        let (a, e2) = sref.ellipsoid_params()?;
        let ellps = Ellipsoid::from_ae2(a, e2);
        let (origin_lat, origin_lon) = sref.origin().unwrap_or((0.0, 0.0));
        let origin_lat = origin_lat.to_radians();
        let origin_lon = origin_lon.to_radians();
        let k0 = sref.scale_factor();
        let (fe, fn_) = sref.false_origin();

        let ep2 = e2 / (1.0 - e2);
        let m0 = meridian_arc(&ellps, origin_lat);
        let m = m0 + (y - fn_) / k0;

        let phi1 = footprint_latitude(&ellps, m);
        let (sinphi1, cosphi1) = phi1.sin_cos();
        let t1 = phi1.tan().powi(2);
        let c1 = ep2 * cosphi1.powi(2);
        let n1 = a / (1.0 - e2 * sinphi1 * sinphi1).sqrt();
        let r1 = a * (1.0 - e2) / (1.0 - e2 * sinphi1 * sinphi1).powf(1.5);
        let d = (x - fe) / (n1 * k0);

        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;
        let d5 = d4 * d;
        let d6 = d5 * d;

        let lat = phi1
            - (n1 * phi1.tan() / r1)
                * (d2 / 2.0 - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lon = origin_lon
            + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d5
                    / 120.0)
                / cosphi1;

        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoordSys, CoordSysType};

    fn utm_zone_18() -> SpatialReference {
        let cs = CoordSys::new("UTM18N", CoordSysType::TransverseMercator);
        SpatialReference::new(cs, "WGS84", "m")
            .unwrap()
            .with_origin(0.0, -75.0)
            .with_false_origin(500_000.0, 0.0)
            .with_scale_factor(0.9996)
            .with_ellipsoid(6_378_137.0, 0.006_694_379_990_14)
    }

    #[test]
    fn forward_then_inverse_recovers_the_point() {
        let sref = utm_zone_18();
        let lon = (-77.035242f64).to_radians();
        let lat = 38.889471f64.to_radians();
        let proj = TransverseMercator;
        let (x, y) = proj.fwd(&sref, lon, lat).unwrap();
        let (lon2, lat2) = proj.inv(&sref, x, y).unwrap();
        assert!((lon - lon2).to_degrees().abs() < 1e-7);
        assert!((lat - lat2).to_degrees().abs() < 1e-7);
    }

    #[test]
    fn matches_known_utm_18_easting_northing() {
        // spec. §8 seed scenario (approximate; WGS84 UTM 18N).
        let sref = utm_zone_18();
        let lon = (-77.035242f64).to_radians();
        let lat = 38.889471f64.to_radians();
        let (x, y) = TransverseMercator.fwd(&sref, lon, lat).unwrap();
        assert!((x - 323_483.0).abs() < 1.0);
        assert!((y - 4_306_479.0).abs() < 1.0);
    }

    #[test]
    fn out_of_domain_latitude_is_rejected() {
        let sref = utm_zone_18();
        let err = TransverseMercator
            .fwd(&sref, 0.0, 91f64.to_radians())
            .unwrap_err();
        assert!(matches!(err, Error::OutOfDomain { .. }));
    }
}

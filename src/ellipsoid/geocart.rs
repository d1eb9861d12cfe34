//! Geographic <-> geocentric (ECEF) conversion, used by the Helmert
//! 7-parameter datum shift (spec. §4.4).
//!
//! Adapted from the teacher crate's `ellipsoid::geocart::GeoCart` trait,
//! dropping the generic `CoordinateTuple` machinery in favor of plain
//! `(lon, lat, h)` / `(x, y, z)` triples, since this crate has no
//! N-dimensional coordinate container to route through.

use super::Ellipsoid;

pub trait GeoCart {
    /// Geographic `(lon, lat, h)` (radians, radians, meters) to geocentric
    /// `(x, y, z)` meters. Follows Bowring's derivation as used by the
    /// teacher crate.
    fn geocentric(&self, lon: f64, lat: f64, h: f64) -> (f64, f64, f64);

    /// Geocentric `(x, y, z)` meters to geographic `(lon, lat, h)`.
    fn geographic(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64);
}

impl GeoCart for Ellipsoid {
    fn geocentric(&self, lon: f64, lat: f64, h: f64) -> (f64, f64, f64) {
        let n = self.prime_vertical_radius(lat);
        let (sinphi, cosphi) = lat.sin_cos();
        let (sinlam, coslam) = lon.sin_cos();

        let x = (n + h) * cosphi * coslam;
        let y = (n + h) * cosphi * sinlam;
        let z = (n * (1.0 - self.eccentricity_squared()) + h) * sinphi;
        (x, y, z)
    }

    fn geographic(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let lon = y.atan2(x);
        let p = x.hypot(y);

        if p < 1.0e-12 {
            let lat = std::f64::consts::FRAC_PI_2.copysign(z);
            let h = z.abs() - self.semiminor_axis();
            return (lon, lat, h);
        }

        let a = self.equatorial_axis();
        let b = self.semiminor_axis();
        let es = self.eccentricity_squared();
        let eps = es / (1.0 - es);

        let t = (z * a) / (p * b);
        let c = 1.0 / (1.0 + t * t).sqrt();
        let s = c * t;

        let phi_num = z + eps * b * s.powi(3);
        let phi_denom = p - es * a * c.powi(3);
        let lat = phi_num.atan2(phi_denom);

        let n = self.prime_vertical_radius(lat);
        let h = if lat.abs() < 1.0e-10 {
            p / lat.cos() - n
        } else {
            z / lat.sin() - n * (1.0 - es)
        };
        (lon, lat, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_geocentric_space() {
        let wgs84 = Ellipsoid::named("WGS84").unwrap();
        let lon = (-77.035242f64).to_radians();
        let lat = 38.889471f64.to_radians();
        let h = 50.0;

        let (x, y, z) = wgs84.geocentric(lon, lat, h);
        let (lon2, lat2, h2) = wgs84.geographic(x, y, z);

        assert!((lon - lon2).abs() < 1e-12);
        assert!((lat - lat2).abs() < 1e-12);
        assert!((h - h2).abs() < 1e-6);
    }
}

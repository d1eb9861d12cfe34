//! Helmert 7-parameter similarity transform (spec. §4.4), following the
//! teacher crate's `inner_op::helmert` for the ECEF rotation/scale step,
//! with the geographic round-trip delegated to [`GeoCart`].

use crate::ellipsoid::GeoCart;
use crate::Ellipsoid;

/// Apply a 7-parameter Helmert shift to `(lon, lat)` in radians on
/// `from_ellipsoid`, returning the shifted `(lon, lat)` on `to_ellipsoid`.
///
/// `translation` is `(Tx, Ty, Tz)` in meters, `rotation` is `(rx, ry, rz)`
/// in arcseconds, and `scale_ppm` is the scale correction in parts per
/// million, per spec. §4.4.
#[must_use]
pub fn helmert(
    lon: f64,
    lat: f64,
    from_ellipsoid: &Ellipsoid,
    to_ellipsoid: &Ellipsoid,
    translation: (f64, f64, f64),
    rotation: (f64, f64, f64),
    scale_ppm: f64,
) -> (f64, f64) {
    let (x, y, z) = from_ellipsoid.geocentric(lon, lat, 0.0);

    let arcsec_to_rad = std::f64::consts::PI / (180.0 * 3600.0);
    let (rx, ry, rz) = (
        rotation.0 * arcsec_to_rad,
        rotation.1 * arcsec_to_rad,
        rotation.2 * arcsec_to_rad,
    );
    let s = 1.0 + scale_ppm * 1e-6;

    let xp = translation.0 + s * (x - rz * y + ry * z);
    let yp = translation.1 + s * (rz * x + y - rx * z);
    let zp = translation.2 + s * (-ry * x + rx * y + z);

    let (lon2, lat2, _h2) = to_ellipsoid.geographic(xp, yp, zp);
    (lon2, lat2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osgb_to_wgs84_translation_only_shift_moves_the_point() {
        // spec. §6: OSGB Helmert to WGS84 is translation-only.
        let airy = Ellipsoid::named("Airy1830").unwrap();
        let wgs84 = Ellipsoid::named("WGS84").unwrap();
        let lon = (-2.0f64).to_radians();
        let lat = 52.0f64.to_radians();
        let (lon2, lat2) = helmert(lon, lat, &airy, &wgs84, (375.0, -111.0, 431.0), (0.0, 0.0, 0.0), 0.0);
        assert!((lon2 - lon).abs() > 1e-8 || (lat2 - lat).abs() > 1e-8);
    }

    #[test]
    fn identity_shift_between_matching_ellipsoids_is_a_no_op() {
        let wgs84 = Ellipsoid::named("WGS84").unwrap();
        let lon = 5.0f64.to_radians();
        let lat = 50.0f64.to_radians();
        let (lon2, lat2) = helmert(lon, lat, &wgs84, &wgs84, (0.0, 0.0, 0.0), (0.0, 0.0, 0.0), 0.0);
        assert!((lon2 - lon).abs() < 1e-9);
        assert!((lat2 - lat).abs() < 1e-9);
    }
}

//! Abridged Molodensky datum shift (spec. §4.4), Defense Mapping Agency
//! TR8350.2 §7.4. Adapted from the teacher crate's `inner_op::molodensky`,
//! trimmed to the abridged three-parameter form (no rotation/scale terms).

/// Shift `(lon, lat)` in radians by the abridged Molodensky formula, given
/// the source ellipsoid's `(a, e²)`, the translation `(dx, dy, dz)` in
/// meters, and the target-minus-source `(da, df)`. Height is assumed zero,
/// matching spec. §4.4.
#[must_use]
pub fn molodensky(lon: f64, lat: f64, a: f64, e2: f64, dx: f64, dy: f64, dz: f64, da: f64, df: f64) -> (f64, f64) {
    let (sinphi, cosphi) = lat.sin_cos();
    let (sinlam, coslam) = lon.sin_cos();
    let sinphi2 = sinphi * sinphi;

    let rn = a / (1.0 - e2 * sinphi2).sqrt();
    let rm = a * (1.0 - e2) / (1.0 - e2 * sinphi2).powf(1.5);
    let f = 1.0 - (1.0 - e2).sqrt();

    let dphi = (-dx * sinphi * coslam - dy * sinphi * sinlam
        + dz * cosphi
        + da * rn * e2 * sinphi * cosphi / a
        + df * (rm / (1.0 - f) + rn * (1.0 - f)) * sinphi * cosphi)
        / rm;

    let dlam = (-dx * sinlam + dy * coslam) / (rn * cosphi);

    (lon + dlam, lat + dphi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nad27_conus_shift_moves_the_point() {
        // spec. §6 NAD27 -> WGS84 CONUS translation.
        let a = 6_378_206.4;
        let e2 = 0.006_768_658;
        let da = 6_378_137.0 - a;
        let df = 1.0 / 298.257_223_563 - 1.0 / 294.978_698_2;
        let lon = (-100.0f64).to_radians();
        let lat = 40.0f64.to_radians();
        let (lon2, lat2) = molodensky(lon, lat, a, e2, -8.0, 160.0, 176.0, da, df);
        assert!((lon2 - lon).abs() > 1e-8);
        assert!((lat2 - lat).abs() > 1e-8);
    }

    #[test]
    fn zero_translation_is_a_no_op() {
        let lon = 10f64.to_radians();
        let lat = 45f64.to_radians();
        let (lon2, lat2) = molodensky(lon, lat, 6_378_137.0, 0.006_694_38, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!((lon - lon2).abs() < 1e-15);
        assert!((lat - lat2).abs() < 1e-15);
    }
}

//! Meridian arc length and its series inverse (the footprint latitude),
//! shared by the Transverse Mercator and Lambert/Albers projections
//! (spec. §4.3).
//!
//! Placed alongside [`crate::ellipsoid`] the same way the teacher crate
//! keeps its own meridian-arc series in `ellipsoid::meridians`, but here
//! following the exact truncated series spec'd in spec. §4.3 (Snyder's
//! classic e²/e⁴/e⁶ form) rather than the teacher's higher-order Bowring
//! series, since the numeric boundary constants in spec. §6 are pinned to
//! this specific truncation.

use super::Ellipsoid;

/// The distance, *M*, along a meridian from the equator to latitude `phi`
/// (radians), per spec. §4.3:
///
/// `M(φ) = a·[(1 − e²/4 − 3e⁴/64 − 5e⁶/256)φ − (3e²/8 + 3e⁴/32 + 45e⁶/1024)·sin 2φ
///            + (15e⁴/256 + 45e⁶/1024)·sin 4φ − (35e⁶/3072)·sin 6φ]`
#[must_use]
pub fn meridian_arc(ellipsoid: &Ellipsoid, phi: f64) -> f64 {
    let e2 = ellipsoid.eccentricity_squared();
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    let c0 = 1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0;
    let c2 = 3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0;
    let c4 = 15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0;
    let c6 = 35.0 * e6 / 3072.0;

    ellipsoid.equatorial_axis() * (c0 * phi - c2 * (2.0 * phi).sin() + c4 * (4.0 * phi).sin() - c6 * (6.0 * phi).sin())
}

/// The leading coefficient of [`meridian_arc`], `e0 = 1 - e²/4 - 3e⁴/64 - 5e⁶/256`,
/// used to scale `M` into `μ` before recovering the footprint latitude.
fn e0(e2: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0
}

/// The footprint latitude *φ₁*, recovered from a meridian distance `m` by
/// series inversion in `e₁ = (1 − √(1 − e²)) / (1 + √(1 − e²))`
/// (Snyder eq. 3-26), as used by the Transverse Mercator inverse (spec. §4.3).
#[must_use]
pub fn footprint_latitude(ellipsoid: &Ellipsoid, m: f64) -> f64 {
    let e2 = ellipsoid.eccentricity_squared();
    let mu = m / (ellipsoid.equatorial_axis() * e0(e2));

    let sqrt1me2 = (1.0 - e2).sqrt();
    let e1 = (1.0 - sqrt1me2) / (1.0 + sqrt1me2);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_3 * e1;

    mu + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn meridian_arc_at_equator_is_zero() {
        let grs80 = Ellipsoid::named("GRS80").unwrap();
        assert_eq!(meridian_arc(&grs80, 0.0), 0.0);
    }

    #[test]
    fn meridian_arc_at_the_pole_is_the_quarter_meridian() {
        // spec. §8: M(π/2) ≈ 10 001 965.73 m on GRS80, within 1 mm.
        let grs80 = Ellipsoid::named("GRS80").unwrap();
        let quarter = meridian_arc(&grs80, FRAC_PI_2);
        assert!((quarter - 10_001_965.73).abs() < 1e-3);
    }

    #[test]
    fn footprint_latitude_round_trips_the_arc() {
        let grs80 = Ellipsoid::named("GRS80").unwrap();
        for deg in [0.0, 10.0, 30.0, 45.0, 60.0, 80.0] {
            let phi = deg_to_rad(deg);
            let m = meridian_arc(&grs80, phi);
            let back = footprint_latitude(&grs80, m);
            assert!((back - phi).abs() < 1e-9, "deg={deg}");
        }
    }

    fn deg_to_rad(d: f64) -> f64 {
        d.to_radians()
    }
}

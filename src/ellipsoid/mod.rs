//! Ellipsoid catalog (spec. §4.1) and ellipsoidal geometry.
//!
//! Follows the teacher crate's `ellipsoid::biaxial::Ellipsoid` shape — an
//! immutable value type carrying `(a, f)`, with derived eccentricities and
//! curvatures computed on demand rather than cached.

mod constants;
mod geocart;
mod meridians;

pub use geocart::GeoCart;
pub use meridians::{footprint_latitude, meridian_arc};

use crate::Error;

/// A named reference ellipsoid: `{code, equatorial_axis_m, eccentricity,
/// eccentricity², inverse_flattening}` (spec. §3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    code: &'static str,
    a: f64,
    e2: f64,
    inverse_flattening: f64,
}

impl Ellipsoid {
    /// A user-defined ellipsoid from its semimajor axis and inverse
    /// flattening, used by `LAMBERTCUSTOM`/`TMCUSTOM` spatial references.
    #[must_use]
    pub fn new(a: f64, inverse_flattening: f64) -> Ellipsoid {
        let f = if inverse_flattening != 0.0 {
            1.0 / inverse_flattening
        } else {
            0.0
        };
        Ellipsoid {
            code: "custom",
            a,
            e2: f * (2.0 - f),
            inverse_flattening,
        }
    }

    /// Build an ellipsoid directly from `(a, e²)`, used internally by the
    /// projection kernel when a [`crate::SpatialReference`] already carries
    /// an exact `e²` and reconstructing it from `inverse_flattening` would
    /// lose precision.
    pub(crate) fn from_ae2(a: f64, e2: f64) -> Ellipsoid {
        let f = 1.0 - (1.0 - e2).max(0.0).sqrt();
        Ellipsoid {
            code: "custom",
            a,
            e2,
            inverse_flattening: if f != 0.0 { 1.0 / f } else { 0.0 },
        }
    }

    /// Look up one of the built-in named ellipsoids, e.g. `"WGS84"`,
    /// `"GRS80"`, `"Clarke1866"`. Case-insensitive.
    pub fn named(code: &str) -> Result<Ellipsoid, Error> {
        let key = code.to_ascii_lowercase();
        let (name, a, inverse_flattening, _description) = constants::ELLIPSOID_LIST
            .iter()
            .find(|e| e.0 == key)
            .ok_or_else(|| Error::UnknownDatum(code.to_string()))?;
        let f = 1.0 / inverse_flattening;
        let e2 = constants::EXACT_ECCENTRICITY_SQUARED
            .iter()
            .find(|e| e.0 == *name)
            .map(|e| e.1)
            .unwrap_or_else(|| f * (2.0 - f));
        Ok(Ellipsoid {
            code: name,
            a: *a,
            e2,
            inverse_flattening: *inverse_flattening,
        })
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// The equatorial (semimajor) axis, *a*, in meters.
    #[must_use]
    pub fn equatorial_axis(&self) -> f64 {
        self.a
    }

    /// Scale the ellipsoid's equatorial axis into different linear units,
    /// as required by spec. §3 invariant (iii): for TM/Lambert/Albers,
    /// `equatorialAxis` is always expressed in the output `units`.
    #[must_use]
    pub fn equatorial_axis_in(&self, meters_per_unit: f64) -> f64 {
        self.a / meters_per_unit
    }

    #[must_use]
    pub fn inverse_flattening(&self) -> f64 {
        self.inverse_flattening
    }

    #[must_use]
    pub fn flattening(&self) -> f64 {
        if self.inverse_flattening != 0.0 {
            1.0 / self.inverse_flattening
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        self.e2
    }

    #[must_use]
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }

    #[must_use]
    pub fn semiminor_axis(&self) -> f64 {
        self.a * (1.0 - self.flattening())
    }

    /// Radius of curvature in the prime vertical, *Rn = a / sqrt(1 - e² sin²φ)*.
    #[must_use]
    pub fn prime_vertical_radius(&self, latitude: f64) -> f64 {
        self.a / (1.0 - self.e2 * latitude.sin().powi(2)).sqrt()
    }

    /// Meridional radius of curvature, *Rm = a(1 - e²) / (1 - e² sin²φ)^1.5*.
    #[must_use]
    pub fn meridian_radius(&self, latitude: f64) -> f64 {
        let a = self.a;
        let denom = (1.0 - self.e2 * latitude.sin().powi(2)).powf(1.5);
        a * (1.0 - self.e2) / denom
    }
}

impl Default for Ellipsoid {
    /// WGS84 is the default ellipsoid.
    fn default() -> Ellipsoid {
        Ellipsoid::named("WGS84").expect("WGS84 is a built-in ellipsoid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_ellipsoids_carry_the_bit_exact_boundary_constants() {
        let clarke = Ellipsoid::named("Clarke1866").unwrap();
        assert_eq!(clarke.equatorial_axis(), 6_378_206.4);
        assert!((clarke.eccentricity_squared() - 0.006_768_658).abs() < 1e-15);

        let grs80 = Ellipsoid::named("GRS80").unwrap();
        assert_eq!(grs80.equatorial_axis(), 6_378_137.0);
        assert!((grs80.eccentricity_squared() - 0.006_694_38).abs() < 1e-15);

        let wgs84 = Ellipsoid::named("WGS84").unwrap();
        assert!((wgs84.eccentricity_squared() - 0.006_694_379_990_14).abs() < 1e-15);

        let airy = Ellipsoid::named("Airy1830").unwrap();
        assert_eq!(airy.equatorial_axis(), 6_377_563.396);
        assert!((airy.eccentricity_squared() - 0.006_670_540_074_149_084).abs() < 1e-15);
    }

    #[test]
    fn unknown_ellipsoid_fails() {
        assert!(Ellipsoid::named("nonesuch").is_err());
    }

    #[test]
    fn custom_ellipsoid_matches_grs80_flattening() {
        let custom = Ellipsoid::new(6_378_137.0, 298.257_222_100_882_7);
        let grs80 = Ellipsoid::named("GRS80").unwrap();
        assert!((custom.eccentricity_squared() - grs80.eccentricity_squared()).abs() < 1e-15);
    }

    #[test]
    fn curvatures_at_the_equator_and_pole() {
        let grs80 = Ellipsoid::named("GRS80").unwrap();
        assert!((grs80.prime_vertical_radius(0.0) - grs80.equatorial_axis()).abs() < 1e-6);
        let pole = std::f64::consts::FRAC_PI_2;
        assert!(
            (grs80.prime_vertical_radius(pole) - grs80.meridian_radius(pole)).abs() < 1e-4
        );
    }
}

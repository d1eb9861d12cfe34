//! Linear, areal and angular map units, and conversion between them.
//!
//! Grounded on the teacher crate's `ellipsoid::constants` pattern of a
//! flat, compile-time constructible table of named constants (a `HashMap`
//! would be nicer, but cannot be built at compile time).

use crate::Error;

/// The kind of quantity a [`MapUnit`] measures. Exactly one of linear,
/// areal or angular per spec. §3 — `degrees` and the opaque grid token
/// unit `grid` are the angular/opaque singletons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitKind {
    Linear { meters_per_unit: f64 },
    Areal { square_meters_per_unit: f64 },
    Angular,
    Grid,
}

/// A named unit of measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapUnit {
    code: &'static str,
    kind: UnitKind,
}

impl MapUnit {
    pub const fn linear(code: &'static str, meters_per_unit: f64) -> MapUnit {
        MapUnit {
            code,
            kind: UnitKind::Linear { meters_per_unit },
        }
    }

    pub const fn areal(code: &'static str, square_meters_per_unit: f64) -> MapUnit {
        MapUnit {
            code,
            kind: UnitKind::Areal {
                square_meters_per_unit,
            },
        }
    }

    pub const fn angular(code: &'static str) -> MapUnit {
        MapUnit {
            code,
            kind: UnitKind::Angular,
        }
    }

    pub const fn grid_token(code: &'static str) -> MapUnit {
        MapUnit {
            code,
            kind: UnitKind::Grid,
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    #[must_use]
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    #[must_use]
    pub fn is_linear(&self) -> bool {
        matches!(self.kind, UnitKind::Linear { .. })
    }

    #[must_use]
    pub fn is_areal(&self) -> bool {
        matches!(self.kind, UnitKind::Areal { .. })
    }

    #[must_use]
    pub fn meters_per_unit(&self) -> Option<f64> {
        match self.kind {
            UnitKind::Linear { meters_per_unit } => Some(meters_per_unit),
            _ => None,
        }
    }
}

/// US survey foot = 1200/3937 m, exactly (spec. §6 numeric boundary constant).
pub const US_SURVEY_FOOT_METERS: f64 = 1200. / 3937.;

/// International foot = 0.3048 m, exactly.
pub const INTL_FOOT_METERS: f64 = 0.3048;

#[rustfmt::skip]
pub(crate) const UNIT_LIST: &[MapUnit] = &[
    MapUnit::linear("m",        1.0),
    MapUnit::linear("us-ft",    US_SURVEY_FOOT_METERS),
    MapUnit::linear("ft",       INTL_FOOT_METERS),
    MapUnit::linear("km",       1000.0),
    MapUnit::areal("acre",      4_046.856_422_4),
    MapUnit::areal("m2",        1.0),
    MapUnit::angular("degrees"),
    MapUnit::grid_token("grid"),
];

/// Look up a built-in unit by its code.
pub fn unit(code: &str) -> Result<MapUnit, Error> {
    UNIT_LIST
        .iter()
        .find(|u| u.code.eq_ignore_ascii_case(code))
        .copied()
        .ok_or_else(|| Error::UnknownUnit(code.to_string()))
}

/// Convert `value` from unit `from` to unit `to`. Fails with
/// [`Error::UnitMismatch`] when mixing linear and areal units (or either
/// with the angular/grid singletons), and with [`Error::UnknownUnit`] for
/// unregistered codes.
pub fn units_convert(value: f64, from: &str, to: &str) -> Result<f64, Error> {
    let from = unit(from)?;
    let to = unit(to)?;
    match (from.kind, to.kind) {
        (UnitKind::Linear { meters_per_unit: f }, UnitKind::Linear { meters_per_unit: t }) => {
            Ok(value * f / t)
        }
        (
            UnitKind::Areal {
                square_meters_per_unit: f,
            },
            UnitKind::Areal {
                square_meters_per_unit: t,
            },
        ) => Ok(value * f / t),
        (UnitKind::Angular, UnitKind::Angular) => Ok(value),
        _ => Err(Error::UnitMismatch(
            from.code.to_string(),
            to.code.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meters_to_us_survey_feet() {
        let ft = units_convert(1.0, "m", "us-ft").unwrap();
        assert!((ft - 1.0 / US_SURVEY_FOOT_METERS).abs() < 1e-12);
    }

    #[test]
    fn us_survey_foot_is_exact() {
        assert!((US_SURVEY_FOOT_METERS - 0.304_800_609_6).abs() < 1e-10);
    }

    #[test]
    fn mixing_linear_and_areal_is_a_mismatch() {
        let err = units_convert(1.0, "m", "acre").unwrap_err();
        assert!(matches!(err, Error::UnitMismatch(_, _)));
    }

    #[test]
    fn unknown_unit_fails() {
        assert!(matches!(unit("furlong"), Err(Error::UnknownUnit(_))));
    }
}

//! The point type and conversion orchestrator (spec. §3, §4.6).
//!
//! Spec. §9 flags the source's "in-place mutation of a shared point object
//! through a five-stage pipeline" for re-architecture: `convert` here is a
//! pure function composing `project_forward ∘ datum_shift ∘ project_inverse`
//! over immutable values, returning a new [`GeoPoint`] rather than mutating
//! one in place.

use crate::datum_shift::shift;
use crate::ellipsoid::Ellipsoid;
use crate::grid::codec_for;
use crate::projection::projection_for;
use crate::registry::Registry;
use crate::{CoordSysType, Direction, Error, ShiftMethodTag, SpatialReference};

/// How a UTM/USNG zone is rendered when emitting a grid token: `"18S"`
/// (`Letter`) vs. `"18 North"` (`Hemisphere`), per spec. §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtmZoneStyle {
    Letter,
    Hemisphere,
}

/// The primary user-facing value (spec. §3). Semantics of `x`/`y` depend
/// on the reference it is currently expressed against: decimal degrees
/// for `WORLD`, projected easting/northing for a projected reference, or
/// an opaque `grid_token` (with `x`/`y` unused) for a grid reference.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
    pub grid_token: Option<String>,
    pub utm_zone_style: Option<UtmZoneStyle>,
}

impl GeoPoint {
    #[must_use]
    pub fn coordinates(x: f64, y: f64) -> GeoPoint {
        GeoPoint {
            x,
            y,
            grid_token: None,
            utm_zone_style: None,
        }
    }

    #[must_use]
    pub fn token(token: impl Into<String>) -> GeoPoint {
        GeoPoint {
            x: 0.0,
            y: 0.0,
            grid_token: Some(token.into()),
            utm_zone_style: None,
        }
    }

    #[must_use]
    pub fn with_utm_zone_style(mut self, style: UtmZoneStyle) -> Self {
        self.utm_zone_style = Some(style);
        self
    }
}

/// Parse a `"DD°MM'SS.s\""`-style DMS string into decimal degrees, or a
/// bare decimal-degrees string (both forms are accepted, matching the
/// leniency of the human-entry fields the CLI front-ends this with).
pub fn parse_lat_lon(input: &str) -> Result<f64, Error> {
    let trimmed = input.trim();
    if let Ok(decimal) = trimmed.parse::<f64>() {
        return Ok(decimal);
    }

    let negative = trimmed.starts_with('-') || trimmed.ends_with(['S', 'W', 's', 'w']);
    let numeric: String = trimmed
        .chars()
        .map(|c| if c.is_ascii_digit() || c == '.' { c } else { ' ' })
        .collect();
    let fields: Vec<f64> = numeric
        .split_whitespace()
        .filter_map(|f| f.parse::<f64>().ok())
        .collect();

    if fields.is_empty() {
        return Err(Error::ParseError {
            what: "latitude/longitude",
            input: input.to_string(),
        });
    }

    let degrees = fields[0];
    let minutes = fields.get(1).copied().unwrap_or(0.0);
    let seconds = fields.get(2).copied().unwrap_or(0.0);
    let magnitude = degrees + minutes / 60.0 + seconds / 3600.0;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Format `decimal_degrees` as `"DD°MM'SS.ss\""`.
#[must_use]
pub fn decimal_degrees_to_dms(decimal_degrees: f64) -> String {
    let sign = if decimal_degrees < 0.0 { "-" } else { "" };
    let magnitude = decimal_degrees.abs();
    let degrees = magnitude.floor();
    let minutes_full = (magnitude - degrees) * 60.0;
    let minutes = minutes_full.floor();
    let seconds = (minutes_full - minutes) * 60.0;
    format!("{sign}{degrees:.0}\u{b0}{minutes:.0}'{seconds:.2}\"")
}

/// Stage 1/3 of [`convert`]: resolve `point` against `sref` to/from plain
/// geographic `(lon°, lat°)`, dispatching on `sref.coord_sys().kind()` per
/// spec. §4.6.
fn project(
    point: &GeoPoint,
    sref: &SpatialReference,
    registry: &Registry,
    direction: Direction,
    grid_precision: Option<u8>,
) -> Result<GeoPoint, Error> {
    match direction {
        Direction::Inv => match sref.coord_sys().kind() {
            CoordSysType::World => Ok(GeoPoint::coordinates(point.x, point.y)),
            CoordSysType::Atlas => {
                let token = point.grid_token.as_deref().ok_or_else(|| Error::ParseError {
                    what: "atlas page token",
                    input: String::new(),
                })?;
                let (lon, lat) = registry.atlas_lookup(sref, token)?;
                Ok(GeoPoint::coordinates(lon, lat))
            }
            CoordSysType::Grid => {
                let token = point.grid_token.as_deref().ok_or_else(|| Error::ParseError {
                    what: "grid token",
                    input: String::new(),
                })?;
                let codec = codec_for(sref.coord_sys())?;
                let (lon, lat) = codec.decode(token)?;
                Ok(GeoPoint::coordinates(lon, lat))
            }
            _ => {
                let proj = projection_for(sref)?;
                let (lon, lat) = proj.inv(sref, point.x, point.y)?;
                Ok(GeoPoint::coordinates(lon.to_degrees(), lat.to_degrees()))
            }
        },
        Direction::Fwd => match sref.coord_sys().kind() {
            CoordSysType::World => Ok(GeoPoint::coordinates(point.x, point.y)),
            CoordSysType::Atlas => {
                let token = registry.atlas_forward(sref, point.x, point.y)?;
                Ok(GeoPoint::token(token))
            }
            CoordSysType::Grid => {
                let codec = codec_for(sref.coord_sys())?;
                let token = codec.encode(point.x, point.y, grid_precision)?;
                Ok(GeoPoint::token(token))
            }
            _ => {
                let proj = projection_for(sref)?;
                let (x, y) = proj.fwd(sref, point.x.to_radians(), point.y.to_radians())?;
                Ok(GeoPoint::coordinates(x, y))
            }
        },
    }
}

fn ellipsoid_for(sref: &SpatialReference, registry: &Registry) -> Result<Ellipsoid, Error> {
    if let Ok((a, e2)) = sref.ellipsoid_params() {
        return Ok(Ellipsoid::from_ae2(a, e2));
    }
    registry.ellipsoid_of_datum(sref.datum_code())
}

/// The single public conversion entry point (spec. §4.6): inverse-project
/// `point` off `src_ref`, datum-shift it onto `dst_ref`'s datum, then
/// forward-project it onto `dst_ref`. `grid_precision` (spec. §6's
/// `gridFormat`) controls the digit count of a token produced by a
/// grid-typed `dst_ref`; it is ignored otherwise.
pub fn convert(
    point: &GeoPoint,
    src_ref: &SpatialReference,
    dst_ref: &SpatialReference,
    shift_method: Option<ShiftMethodTag>,
    grid_precision: Option<u8>,
    registry: &Registry,
) -> Result<GeoPoint, Error> {
    let geographic = project(point, src_ref, registry, Direction::Inv, None)?;

    let src_canonical = registry.canonical_datum(src_ref.datum_code());
    let dst_canonical = registry.canonical_datum(dst_ref.datum_code());

    let shifted = if src_canonical == dst_canonical {
        geographic
    } else {
        let src_ellipsoid = ellipsoid_for(src_ref, registry)?;
        let dst_ellipsoid = ellipsoid_for(dst_ref, registry)?;
        let (lon2, lat2) = shift(
            registry.datum_shifts(),
            &src_canonical,
            &dst_canonical,
            shift_method,
            &src_ellipsoid,
            &dst_ellipsoid,
            geographic.x.to_radians(),
            geographic.y.to_radians(),
        )?;
        GeoPoint::coordinates(lon2.to_degrees(), lat2.to_degrees())
    };

    let mut out = project(&shifted, dst_ref, registry, Direction::Fwd, grid_precision)?;
    out.utm_zone_style = point.utm_zone_style;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_dms_latitudes() {
        assert!((parse_lat_lon("38.889471").unwrap() - 38.889471).abs() < 1e-9);
        let dms = parse_lat_lon("38 53 22").unwrap();
        assert!((dms - 38.889_444).abs() < 1e-3);
    }

    #[test]
    fn dms_formatting_round_trips_roughly() {
        let dms = decimal_degrees_to_dms(38.889471);
        assert!(dms.starts_with("38"));
        let parsed = parse_lat_lon(&dms).unwrap();
        assert!((parsed - 38.889471).abs() < 1e-3);
    }
}

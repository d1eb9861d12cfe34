//! UTM grid token codec (spec. §4.5): `"zzL x y"`, with the Norway/Svalbard
//! zone-override exceptions applied on encoding.

use super::GridCodec;
use crate::projection::{projection_for, Projection};
use crate::{CoordSys, CoordSysType, Error, SpatialReference};

const LAT_BANDS: &str = "CDEFGHJKLMNPQRSTUVWX";

/// 84°N is the inclusive upper bound of band `X` (spec. §8's boundary
/// behavior), hence the `..=`; UTM itself has no band beyond `X`.
fn band_letter(lat: f64) -> Option<char> {
    if !(-80.0..=84.0).contains(&lat) {
        return None;
    }
    let index = (((lat + 80.0) / 8.0) as usize).min(LAT_BANDS.len() - 1);
    LAT_BANDS.chars().nth(index)
}

/// The UTM zone for `(lat, lon)` in degrees, with the Norway and Svalbard
/// overrides from spec. §4.5 applied.
#[must_use]
pub fn utm_zone_for(lat: f64, lon: f64) -> u32 {
    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }
    if (72.0..84.0).contains(&lat) {
        if (0.0..9.0).contains(&lon) {
            return 31;
        }
        if (9.0..21.0).contains(&lon) {
            return 33;
        }
        if (21.0..33.0).contains(&lon) {
            return 35;
        }
        if (33.0..42.0).contains(&lon) {
            return 37;
        }
    }
    let zone = ((lon + 180.0) / 6.0).floor() as i64 + 1;
    zone.clamp(1, 60) as u32
}

fn reference(zone: u32, north: bool) -> SpatialReference {
    let cs = CoordSys::new("UTM", CoordSysType::TransverseMercator);
    SpatialReference::new(cs, "WGS84", "m")
        .expect("UTM is a WORLD-compatible projected reference")
        .with_origin(0.0, (6 * zone) as f64 - 183.0)
        .with_false_origin(500_000.0, if north { 0.0 } else { 10_000_000.0 })
        .with_scale_factor(0.9996)
        .with_ellipsoid(6_378_137.0, 0.006_694_379_990_14)
}

pub struct Utm;

impl GridCodec for Utm {
    fn encode(&self, lon_deg: f64, lat_deg: f64, _precision: Option<u8>) -> Result<String, Error> {
        let zone = utm_zone_for(lat_deg, lon_deg);
        let band = band_letter(lat_deg).ok_or(Error::OutOfDomain { lat: lat_deg, lon: lon_deg })?;
        let north = lat_deg >= 0.0;
        let sref = reference(zone, north);
        let proj = projection_for(&sref)?;
        let (x, y) = proj.fwd(&sref, lon_deg.to_radians(), lat_deg.to_radians())?;
        Ok(format!("{zone}{band} {x:.3} {y:.3}"))
    }

    fn decode(&self, token: &str) -> Result<(f64, f64), Error> {
        let parsed = parse_utm(token)?;
        let north = parsed.is_north();
        let sref = reference(parsed.zone, north);
        let proj = projection_for(&sref)?;
        let (lon, lat) = proj.inv(&sref, parsed.easting, parsed.northing)?;
        Ok((lon.to_degrees(), lat.to_degrees()))
    }
}

/// A parsed UTM token: zone plus either a latitude-band letter or an
/// explicit hemisphere word, and the easting/northing pair.
#[derive(Debug, Clone, PartialEq)]
pub struct UtmToken {
    pub zone: u32,
    pub band: Option<char>,
    pub hemisphere: Option<Hemisphere>,
    pub easting: f64,
    pub northing: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
}

impl UtmToken {
    #[must_use]
    pub fn is_north(&self) -> bool {
        match (self.band, self.hemisphere) {
            (Some(b), _) => b >= 'N',
            (None, Some(Hemisphere::North)) => true,
            (None, Some(Hemisphere::South)) => false,
            (None, None) => true,
        }
    }
}

/// Parse `"zzL x y"`, accepting either a latitude-band letter or a bare
/// `North`/`South` word for `L` (spec. §4.5).
pub fn parse_utm(token: &str) -> Result<UtmToken, Error> {
    let parts: Vec<&str> = token.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(Error::ParseError {
            what: "UTM token (expected 'zzL x y')",
            input: token.to_string(),
        });
    }

    let zone_field = parts[0];
    let digit_count = zone_field.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_count == 0 {
        return Err(Error::ParseError {
            what: "UTM zone",
            input: token.to_string(),
        });
    }
    let zone: u32 = zone_field[..digit_count].parse().map_err(|_| Error::ParseError {
        what: "UTM zone",
        input: token.to_string(),
    })?;

    let (band, hemisphere) = if digit_count < zone_field.len() {
        (Some(zone_field.as_bytes()[digit_count] as char), None)
    } else if parts.len() >= 4 {
        let word = parts[1].to_ascii_lowercase();
        match word.as_str() {
            "north" => (None, Some(Hemisphere::North)),
            "south" => (None, Some(Hemisphere::South)),
            _ => {
                return Err(Error::ParseError {
                    what: "UTM hemisphere (expected 'North' or 'South')",
                    input: token.to_string(),
                })
            }
        }
    } else {
        (None, None)
    };

    let rest = if hemisphere.is_some() { &parts[2..] } else { &parts[1..] };
    if rest.len() < 2 {
        return Err(Error::ParseError {
            what: "UTM easting/northing",
            input: token.to_string(),
        });
    }
    let easting: f64 = rest[0].parse().map_err(|_| Error::ParseError {
        what: "UTM easting",
        input: token.to_string(),
    })?;
    let northing: f64 = rest[1].parse().map_err(|_| Error::ParseError {
        what: "UTM northing",
        input: token.to_string(),
    })?;

    Ok(UtmToken {
        zone,
        band,
        hemisphere,
        easting,
        northing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norway_exception_overrides_the_zone() {
        assert_eq!(utm_zone_for(60.0, 5.0), 32);
    }

    #[test]
    fn svalbard_exception_overrides_the_zone() {
        assert_eq!(utm_zone_for(78.0, 10.0), 33);
    }

    #[test]
    fn ordinary_points_use_the_60_zone_grid() {
        assert_eq!(utm_zone_for(38.0, -77.0), 18);
    }

    #[test]
    fn round_trip_through_utm() {
        let lon = -77.035242;
        let lat = 38.889471;
        let token = Utm.encode(lon, lat, None).unwrap();
        let (lon2, lat2) = Utm.decode(&token).unwrap();
        assert!((lon - lon2).abs() < 1e-6);
        assert!((lat - lat2).abs() < 1e-6);
    }

    #[test]
    fn exactly_84n_still_resolves_to_band_x() {
        let token = Utm.encode(0.0, 84.0, None).unwrap();
        assert!(token.starts_with("31X"));
    }

    #[test]
    fn parses_hemisphere_word_form() {
        let parsed = parse_utm("18 North 323483 4306479").unwrap();
        assert_eq!(parsed.zone, 18);
        assert!(parsed.is_north());
    }
}

//! OSGB (Ordnance Survey Great Britain) and Irish Grid codecs (spec.
//! §4.5): two-letter (OSGB) or single-letter (Irish) 100km square codes
//! over a 25-letter alphabet, layered on Transverse Mercator on Airy
//! 1830/1849.
//!
//! The 500km-square lettering anchors square `S` two columns right, one
//! row up from the lower-left, per spec. §4.5; this module realizes that
//! by choosing the letter grid's origin so `S`'s southwest corner sits at
//! the projection's false origin `(0, 0)`.

use super::GridCodec;
use crate::projection::{projection_for, Projection};
use crate::{CoordSys, CoordSysType, Error, SpatialReference};

const ALPHABET: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZ";
const SQUARE_SIZE: f64 = 100_000.0;
const MAJOR_SIZE: f64 = 500_000.0;

/// The southwest-corner offset of the 500km-letter grid relative to the
/// projection's false origin, chosen so that square `S` (row 3, col 2 in
/// the row-major, `A`-upper-left alphabet) sits exactly at `(0, 0)`.
const MAJOR_ORIGIN_EASTING: f64 = -2.0 * MAJOR_SIZE;
const MAJOR_ORIGIN_NORTHING: f64 = -1.0 * MAJOR_SIZE;

fn letter_index(c: char) -> Option<usize> {
    ALPHABET.find(c.to_ascii_uppercase())
}

fn letter_at(index: usize) -> char {
    ALPHABET.chars().nth(index).unwrap_or('?')
}

/// A Transverse-Mercator-backed, letter-square alphanumeric grid.
pub struct Osgb {
    /// Two-letter 500km+100km squares (OSGB), or one-letter 100km
    /// squares (Irish).
    two_letter: bool,
    reference: SpatialReference,
}

impl Osgb {
    #[must_use]
    pub fn britain() -> Osgb {
        let cs = CoordSys::new("OSGB-TM", CoordSysType::TransverseMercator);
        let sref = SpatialReference::new(cs, "OSGB36", "m")
            .expect("OSGB TM is a projected reference")
            .with_origin(49.0, -2.0)
            .with_false_origin(0.0, 0.0)
            .with_scale_factor(0.999_601_271_7)
            .with_ellipsoid(6_377_563.396, 0.006_670_540_074_149_084);
        Osgb { two_letter: true, reference: sref }
    }

    #[must_use]
    pub fn ireland() -> Osgb {
        let cs = CoordSys::new("IRISH-TM", CoordSysType::TransverseMercator);
        let sref = SpatialReference::new(cs, "Ireland1965", "m")
            .expect("Irish TM is a projected reference")
            .with_origin(53.5, -8.0)
            .with_false_origin(0.0, 0.0)
            .with_scale_factor(1.000_035)
            .with_ellipsoid(6_377_340.189, 0.006_670_540_074_149_084);
        Osgb { two_letter: false, reference: sref }
    }
}

impl GridCodec for Osgb {
    fn encode(&self, lon_deg: f64, lat_deg: f64, precision: Option<u8>) -> Result<String, Error> {
        let proj = projection_for(&self.reference)?;
        let (x, y) = proj.fwd(&self.reference, lon_deg.to_radians(), lat_deg.to_radians())?;

        let letters = if self.two_letter {
            let gx = x - MAJOR_ORIGIN_EASTING;
            let gy = y - MAJOR_ORIGIN_NORTHING;
            let major_col = (gx / MAJOR_SIZE).floor() as i64;
            let major_row = 4 - (gy / MAJOR_SIZE).floor() as i64;
            if !(0..5).contains(&major_col) || !(0..5).contains(&major_row) {
                return Err(Error::OutOfDomain { lat: lat_deg, lon: lon_deg });
            }
            let major = letter_at((major_row * 5 + major_col) as usize);

            let within_e = gx.rem_euclid(MAJOR_SIZE);
            let within_n = gy.rem_euclid(MAJOR_SIZE);
            let minor_col = (within_e / SQUARE_SIZE).floor() as i64;
            let minor_row = 4 - (within_n / SQUARE_SIZE).floor() as i64;
            let minor = letter_at((minor_row * 5 + minor_col) as usize);
            format!("{major}{minor}")
        } else {
            let col = (x / SQUARE_SIZE).floor() as i64;
            let row = 4 - (y / SQUARE_SIZE).floor() as i64;
            if !(0..5).contains(&col) || !(0..5).contains(&row) {
                return Err(Error::OutOfDomain { lat: lat_deg, lon: lon_deg });
            }
            letter_at((row * 5 + col) as usize).to_string()
        };

        let digits = precision.unwrap_or(5).min(5) as usize;
        let scale = 10f64.powi(digits as i32 - 5);
        let e_local = x.rem_euclid(SQUARE_SIZE);
        let n_local = y.rem_euclid(SQUARE_SIZE);
        let e_str = format!("{:0width$}", (e_local * scale).floor() as i64, width = digits);
        let n_str = format!("{:0width$}", (n_local * scale).floor() as i64, width = digits);

        Ok(format!("{letters}{e_str}{n_str}"))
    }

    fn decode(&self, token: &str) -> Result<(f64, f64), Error> {
        let token: String = token.chars().filter(|c| !c.is_whitespace()).collect();
        let letter_count = if self.two_letter { 2 } else { 1 };
        if token.len() <= letter_count {
            return Err(Error::ParseError { what: "grid-square token", input: token });
        }

        let (x0, y0) = if self.two_letter {
            let major = letter_index(token.chars().next().unwrap()).ok_or_else(|| parse_err(&token))?;
            let minor = letter_index(token.chars().nth(1).unwrap()).ok_or_else(|| parse_err(&token))?;
            let major_row = major / 5;
            let major_col = major % 5;
            let minor_row = minor / 5;
            let minor_col = minor % 5;
            let gx = major_col as f64 * MAJOR_SIZE + minor_col as f64 * SQUARE_SIZE;
            let gy = (4 - major_row) as f64 * MAJOR_SIZE + (4 - minor_row) as f64 * SQUARE_SIZE;
            (gx + MAJOR_ORIGIN_EASTING, gy + MAJOR_ORIGIN_NORTHING)
        } else {
            let square = letter_index(token.chars().next().unwrap()).ok_or_else(|| parse_err(&token))?;
            let row = square / 5;
            let col = square % 5;
            (col as f64 * SQUARE_SIZE, (4 - row) as f64 * SQUARE_SIZE)
        };

        let digits: String = token.chars().skip(letter_count).collect();
        if digits.len() % 2 != 0 {
            return Err(parse_err(&token));
        }
        let half = digits.len() / 2;
        let scale = 10f64.powi(5 - half as i32);
        let e_local: f64 = digits[..half].parse::<f64>().map_err(|_| parse_err(&token))? * scale;
        let n_local: f64 = digits[half..].parse::<f64>().map_err(|_| parse_err(&token))? * scale;

        let x = x0 + e_local;
        let y = y0 + n_local;
        let proj = projection_for(&self.reference)?;
        let (lon, lat) = proj.inv(&self.reference, x, y)?;
        Ok((lon.to_degrees(), lat.to_degrees()))
    }
}

fn parse_err(token: &str) -> Error {
    Error::ParseError {
        what: "grid-square token",
        input: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osgb_square_s_sits_at_the_false_origin() {
        let osgb = Osgb::britain();
        let token = osgb.encode(-2.0, 49.0, Some(0)).unwrap();
        assert!(token.starts_with('S'));
    }

    #[test]
    fn round_trip_through_osgb() {
        let osgb = Osgb::britain();
        let lon = -0.1275;
        let lat = 51.5072;
        let token = osgb.encode(lon, lat, Some(5)).unwrap();
        let (lon2, lat2) = osgb.decode(&token).unwrap();
        assert!((lon - lon2).abs() < 1e-3);
        assert!((lat - lat2).abs() < 1e-3);
    }

    #[test]
    fn round_trip_through_irish_grid() {
        let irish = Osgb::ireland();
        let lon = -6.267;
        let lat = 53.35;
        let token = irish.encode(lon, lat, Some(5)).unwrap();
        let (lon2, lat2) = irish.decode(&token).unwrap();
        assert!((lon - lon2).abs() < 1e-3);
        assert!((lat - lat2).abs() < 1e-3);
    }
}

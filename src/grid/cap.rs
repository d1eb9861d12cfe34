//! Civil Air Patrol grid codecs (spec. §4.5): the classic sectional-chart
//! form and the lat/lon "cell" form.

use super::GridCodec;
use crate::Error;

/// One CAP sectional chart's bounding box and cell size, matching the
/// "N/S/W/E in degrees" table named in spec. §4.5.
#[derive(Debug, Clone, Copy)]
struct Sectional {
    code: &'static str,
    north: f64,
    south: f64,
    west: f64,
    east: f64,
    alaska: bool,
}

/// A small built-in sectional table; Alaska sections use 30'x60' cells,
/// the rest use 15'x15' cells, per spec. §4.5.
const SECTIONALS: &[Sectional] = &[
    Sectional { code: "SFO", north: 39.0, south: 36.0, west: -124.0, east: -119.0, alaska: false },
    Sectional { code: "LAX", north: 36.0, south: 33.0, west: -121.0, east: -116.0, alaska: false },
    Sectional { code: "ANC", north: 63.0, south: 59.0, west: -152.0, east: -144.0, alaska: true },
];

fn lookup(code: &str) -> Option<&'static Sectional> {
    SECTIONALS.iter().find(|s| s.code.eq_ignore_ascii_case(code))
}

fn cell_size(sectional: &Sectional) -> (f64, f64) {
    if sectional.alaska {
        (60.0 / 60.0, 30.0 / 60.0)
    } else {
        (15.0 / 60.0, 15.0 / 60.0)
    }
}

pub struct CapClassic;

impl GridCodec for CapClassic {
    fn encode(&self, lon_deg: f64, lat_deg: f64, _precision: Option<u8>) -> Result<String, Error> {
        let sectional = SECTIONALS
            .iter()
            .find(|s| lat_deg >= s.south && lat_deg < s.north && lon_deg >= s.west && lon_deg < s.east)
            .ok_or(Error::OutOfDomain { lat: lat_deg, lon: lon_deg })?;

        let (cell_lon, cell_lat) = cell_size(sectional);
        let cols = ((sectional.east - sectional.west) / cell_lon).round() as i64;
        let col = ((lon_deg - sectional.west) / cell_lon).floor() as i64;
        let row = ((sectional.north - lat_deg) / cell_lat).floor() as i64;
        let ordinal = row * cols + col + 1;

        let within_lon = (lon_deg - sectional.west) / cell_lon - col as f64;
        let within_lat = (sectional.north - lat_deg) / cell_lat - row as f64;
        let quadrant = match (within_lon >= 0.5, within_lat >= 0.5) {
            (false, false) => 'A',
            (true, false) => 'B',
            (false, true) => 'C',
            (true, true) => 'D',
        };

        Ok(format!("{} {:02}{}", sectional.code, ordinal, quadrant))
    }

    fn decode(&self, token: &str) -> Result<(f64, f64), Error> {
        let parts: Vec<&str> = token.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(parse_err(token));
        }
        let sectional = lookup(parts[0]).ok_or_else(|| parse_err(token))?;

        let cell_field = parts[1];
        let (digits, quadrant) = if cell_field.chars().last().is_some_and(|c| c.is_ascii_alphabetic()) {
            (&cell_field[..cell_field.len() - 1], cell_field.chars().last())
        } else {
            (cell_field, None)
        };
        let ordinal: i64 = digits.parse().map_err(|_| parse_err(token))?;

        let (cell_lon, cell_lat) = cell_size(sectional);
        let cols = ((sectional.east - sectional.west) / cell_lon).round() as i64;
        let index = ordinal - 1;
        let row = index / cols;
        let col = index % cols;

        let mut lon = sectional.west + (col as f64 + 0.5) * cell_lon;
        let mut lat = sectional.north - (row as f64 + 0.5) * cell_lat;

        if let Some(q) = quadrant {
            let (dlon, dlat) = match q.to_ascii_uppercase() {
                'A' => (-0.25, 0.25),
                'B' => (0.25, 0.25),
                'C' => (-0.25, -0.25),
                _ => (0.25, -0.25),
            };
            lon += dlon * cell_lon;
            lat += dlat * cell_lat;
        }

        Ok((lon, lat))
    }
}

/// `"DDLLLXXX"`: 2-digit latitude, 3-digit longitude, then 1-3 quartering
/// letters.
pub struct CapCell;

impl GridCodec for CapCell {
    fn encode(&self, lon_deg: f64, lat_deg: f64, precision: Option<u8>) -> Result<String, Error> {
        if !(-90.0..=90.0).contains(&lat_deg) || !(-180.0..=180.0).contains(&lon_deg) {
            return Err(Error::OutOfDomain { lat: lat_deg, lon: lon_deg });
        }
        let lat_deg_floor = lat_deg.floor();
        let lon_deg_floor = (-lon_deg).floor();

        let mut token = format!("{:02}{:03}", lat_deg_floor as i64, lon_deg_floor as i64);
        let mut lat_frac = lat_deg - lat_deg_floor;
        let mut lon_frac = (-lon_deg) - lon_deg_floor;
        let depth = precision.unwrap_or(1).min(3);
        for _ in 0..depth {
            let (letter, new_lat_frac, new_lon_frac) = quarter(lat_frac, lon_frac);
            token.push(letter);
            lat_frac = new_lat_frac;
            lon_frac = new_lon_frac;
        }
        Ok(token)
    }

    fn decode(&self, token: &str) -> Result<(f64, f64), Error> {
        if token.len() < 5 {
            return Err(parse_err(token));
        }
        let lat_deg: f64 = token[0..2].parse().map_err(|_| parse_err(token))?;
        let lon_deg: f64 = token[2..5].parse().map_err(|_| parse_err(token))?;

        let mut lat_lo = lat_deg;
        let mut lat_hi = lat_deg + 1.0;
        let mut lon_lo = -lon_deg - 1.0;
        let mut lon_hi = -lon_deg;

        for letter in token.chars().skip(5) {
            let lat_mid = (lat_lo + lat_hi) / 2.0;
            let lon_mid = (lon_lo + lon_hi) / 2.0;
            match letter.to_ascii_uppercase() {
                'A' => {
                    lon_hi = lon_mid;
                    lat_lo = lat_mid;
                }
                'B' => {
                    lon_lo = lon_mid;
                    lat_lo = lat_mid;
                }
                'C' => {
                    lon_hi = lon_mid;
                    lat_hi = lat_mid;
                }
                'D' => {
                    lon_lo = lon_mid;
                    lat_hi = lat_mid;
                }
                _ => return Err(parse_err(token)),
            }
        }

        Ok(((lon_lo + lon_hi) / 2.0, (lat_lo + lat_hi) / 2.0))
    }
}

fn quarter(lat_frac: f64, lon_frac: f64) -> (char, f64, f64) {
    match (lon_frac >= 0.5, lat_frac >= 0.5) {
        (false, true) => ('A', (lat_frac - 0.5) * 2.0, lon_frac * 2.0),
        (true, true) => ('B', (lat_frac - 0.5) * 2.0, (lon_frac - 0.5) * 2.0),
        (false, false) => ('C', lat_frac * 2.0, lon_frac * 2.0),
        (true, false) => ('D', lat_frac * 2.0, (lon_frac - 0.5) * 2.0),
    }
}

fn parse_err(token: &str) -> Error {
    Error::ParseError {
        what: "CAP token",
        input: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_round_trips_within_a_cell() {
        let lon = -122.3;
        let lat = 37.6;
        let token = CapClassic.encode(lon, lat, None).unwrap();
        let (lon2, lat2) = CapClassic.decode(&token).unwrap();
        assert!((lon - lon2).abs() < 0.25);
        assert!((lat - lat2).abs() < 0.25);
    }

    #[test]
    fn cell_round_trips_within_a_quadrant() {
        let lon = -122.3;
        let lat = 37.6;
        let token = CapCell.encode(lon, lat, Some(2)).unwrap();
        let (lon2, lat2) = CapCell.decode(&token).unwrap();
        assert!((lon - lon2).abs() < 0.3);
        assert!((lat - lat2).abs() < 0.3);
    }
}

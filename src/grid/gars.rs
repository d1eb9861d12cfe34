//! GARS (Global Area Reference System) codec (spec. §4.5): `"LLLA[Q]K"`.

use super::GridCodec;
use crate::Error;

const LAT_LETTERS: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ";

pub struct Gars;

impl GridCodec for Gars {
    fn encode(&self, lon_deg: f64, lat_deg: f64, precision: Option<u8>) -> Result<String, Error> {
        if !(-90.0..=90.0).contains(&lat_deg) || !(-180.0..=180.0).contains(&lon_deg) {
            return Err(Error::OutOfDomain { lat: lat_deg, lon: lon_deg });
        }

        let lon_30 = (lon_deg + 180.0) / 0.5;
        let lon_index = lon_30.floor() as i64 + 1;

        let lat_30 = (lat_deg + 90.0) / 0.5;
        let lat_cell = lat_30.floor() as i64;
        let first = lat_cell / 24;
        let second = lat_cell % 24;
        let lat_letters = format!(
            "{}{}",
            LAT_LETTERS.chars().nth(first as usize).unwrap_or('Z'),
            LAT_LETTERS.chars().nth(second as usize).unwrap()
        );

        let mut token = format!("{lon_index:03}{lat_letters}");
        let detail = precision.unwrap_or(2);
        if detail >= 1 {
            let within_lon = lon_30.fract() * 2.0;
            let within_lat = lat_30.fract() * 2.0;
            let quadrant = quadrant_digit(within_lon, within_lat);
            token.push_str(&quadrant.to_string());
            if detail >= 2 {
                let key_lon = (within_lon.fract()) * 3.0;
                let key_lat = (within_lat.fract()) * 3.0;
                let keypad = keypad_digit(key_lon, key_lat);
                token.push_str(&keypad.to_string());
            }
        }
        Ok(token)
    }

    fn decode(&self, token: &str) -> Result<(f64, f64), Error> {
        let token = token.trim();
        if token.len() < 5 {
            return Err(Error::ParseError { what: "GARS token", input: token.to_string() });
        }
        let lon_index: i64 = token[0..3].parse().map_err(|_| Error::ParseError {
            what: "GARS longitude index",
            input: token.to_string(),
        })?;
        let mut chars = token[3..].chars();
        let first = chars.next().ok_or_else(|| parse_err(token))?;
        let second = chars.next().ok_or_else(|| parse_err(token))?;
        let first_index = LAT_LETTERS.find(first).ok_or_else(|| parse_err(token))?;
        let second_index = LAT_LETTERS.find(second).ok_or_else(|| parse_err(token))?;
        let lat_cell = (first_index * 24 + second_index) as f64;

        let mut lon = -180.0 + (lon_index as f64 - 1.0) * 0.5 + 0.25;
        let mut lat = -90.0 + lat_cell * 0.5 + 0.25;

        let rest: String = chars.collect();
        if let Some(q) = rest.chars().next() {
            let q = q.to_digit(10).ok_or_else(|| parse_err(token))?;
            let (dlon, dlat) = quadrant_offset(q);
            lon += dlon * 0.125;
            lat += dlat * 0.125;

            if let Some(k) = rest.chars().nth(1) {
                let k = k.to_digit(10).ok_or_else(|| parse_err(token))?;
                let (klon, klat) = keypad_offset(k);
                lon += klon * (5.0 / 60.0 / 2.0);
                lat += klat * (5.0 / 60.0 / 2.0);
            }
        }

        Ok((lon, lat))
    }
}

fn parse_err(token: &str) -> Error {
    Error::ParseError {
        what: "GARS token",
        input: token.to_string(),
    }
}

fn quadrant_digit(within_lon: f64, within_lat: f64) -> u8 {
    match (within_lon >= 1.0, within_lat >= 1.0) {
        (false, true) => 1,
        (true, true) => 2,
        (false, false) => 3,
        (true, false) => 4,
    }
}

fn quadrant_offset(q: u32) -> (f64, f64) {
    match q {
        1 => (-1.0, 1.0),
        2 => (1.0, 1.0),
        3 => (-1.0, -1.0),
        _ => (1.0, -1.0),
    }
}

/// Phone-keypad numbering: `7 8 9 / 4 5 6 / 1 2 3` mapped onto the 15'
/// quadrant's 5' thirds.
fn keypad_digit(key_lon: f64, key_lat: f64) -> u8 {
    let col = (key_lon.floor() as i32).clamp(0, 2);
    let row = (key_lat.floor() as i32).clamp(0, 2);
    (1 + row * 3 + col) as u8
}

fn keypad_offset(k: u32) -> (f64, f64) {
    let k = k.clamp(1, 9) - 1;
    let col = (k % 3) as f64 - 1.0;
    let row = (k / 3) as f64 - 1.0;
    (col, row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_then_decodes_near_the_original_cell() {
        let lon = -77.4;
        let lat = 38.9;
        let token = Gars.encode(lon, lat, Some(2)).unwrap();
        let (lon2, lat2) = Gars.decode(&token).unwrap();
        assert!((lon - lon2).abs() < 0.25);
        assert!((lat - lat2).abs() < 0.25);
    }

    #[test]
    fn washington_monument_encodes_per_the_longitude_index_formula() {
        // 206 = floor((-77.035242 + 180) / 0.5) + 1, the 30' cell counting
        // up from 001 at 179.5°W; LT is the matching 24x24-letter pair.
        let token = Gars.encode(-77.035242, 38.889471, Some(2)).unwrap();
        assert_eq!(token, "206LT26");
    }

    #[test]
    fn short_form_is_accepted() {
        let lon = -77.4;
        let lat = 38.9;
        let token = Gars.encode(lon, lat, Some(0)).unwrap();
        assert_eq!(token.len(), 6);
        assert!(Gars.decode(&token).is_ok());
    }
}

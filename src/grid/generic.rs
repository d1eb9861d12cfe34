//! The generic stateplane-derived grid codec (spec. §4.5): a printf-like
//! `gridTemplate` drives both encoding and a regex synthesized for
//! decoding, following spec. §9's "default fall-through" guidance.

use once_cell::sync::OnceCell;
use regex::Regex;

use super::GridCodec;
use crate::Error;

/// One `{index,number,0000}`-style placeholder parsed out of a
/// `gridTemplate`.
#[derive(Debug, Clone, Copy)]
struct Placeholder {
    argument_index: usize,
    width: usize,
}

pub struct GenericGrid {
    placeholders: Vec<Placeholder>,
    literals: Vec<String>,
    cell_size_east: f64,
    cell_size_north: f64,
    input_resolution: f64,
    regex: OnceCell<Regex>,
}

impl GenericGrid {
    pub fn new(template: &str, cell_size_east: f64, cell_size_north: f64, input_resolution: f64) -> Result<GenericGrid, Error> {
        let (literals, placeholders) = parse_template(template)?;
        Ok(GenericGrid {
            placeholders,
            literals,
            cell_size_east,
            cell_size_north,
            input_resolution,
            regex: OnceCell::new(),
        })
    }

    fn pattern(&self) -> &Regex {
        self.regex.get_or_init(|| {
            let mut pattern = String::from("^");
            for (literal, placeholder) in self.literals.iter().zip(self.placeholders.iter()) {
                pattern.push_str(&regex::escape(literal));
                pattern.push_str(&format!("(\\d{{{}}})", placeholder.width));
            }
            if let Some(tail) = self.literals.last() {
                if self.literals.len() > self.placeholders.len() {
                    pattern.push_str(&regex::escape(tail));
                }
            }
            pattern.push('$');
            Regex::new(&pattern).expect("synthesized grid-template regex is always valid")
        })
    }
}

/// Split `template` into its literal runs and `{index,number,width}`
/// placeholders, e.g. `"Z{0,number,0000}B{1,number,000}"`.
fn parse_template(template: &str) -> Result<(Vec<String>, Vec<Placeholder>), Error> {
    let mut literals = Vec::new();
    let mut placeholders = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        literals.push(rest[..start].to_string());
        let end = rest[start..].find('}').ok_or_else(|| Error::ParseError {
            what: "grid template (unterminated placeholder)",
            input: template.to_string(),
        })? + start;
        let body = &rest[start + 1..end];
        let fields: Vec<&str> = body.split(',').collect();
        if fields.len() != 3 {
            return Err(Error::ParseError {
                what: "grid template placeholder (expected 'index,number,width')",
                input: template.to_string(),
            });
        }
        let argument_index: usize = fields[0].parse().map_err(|_| Error::ParseError {
            what: "grid template placeholder index",
            input: template.to_string(),
        })?;
        let width = fields[2].len();
        placeholders.push(Placeholder { argument_index, width });
        rest = &rest[end + 1..];
    }
    literals.push(rest.to_string());

    Ok((literals, placeholders))
}

impl GridCodec for GenericGrid {
    fn encode(&self, lon_deg: f64, lat_deg: f64, _precision: Option<u8>) -> Result<String, Error> {
        let easting = (lon_deg / self.input_resolution / self.cell_size_east).floor();
        let northing = (lat_deg / self.input_resolution / self.cell_size_north).floor();
        let args = [easting, northing];

        let mut out = String::new();
        for (literal, placeholder) in self.literals.iter().zip(self.placeholders.iter()) {
            out.push_str(literal);
            let value = args.get(placeholder.argument_index).copied().unwrap_or(0.0) as i64;
            out.push_str(&format!("{:0width$}", value, width = placeholder.width));
        }
        if let Some(tail) = self.literals.last() {
            if self.literals.len() > self.placeholders.len() {
                out.push_str(tail);
            }
        }
        Ok(out)
    }

    fn decode(&self, token: &str) -> Result<(f64, f64), Error> {
        let captures = self.pattern().captures(token).ok_or_else(|| Error::ParseError {
            what: "grid token (does not match the registered template)",
            input: token.to_string(),
        })?;

        let mut values = [0f64; 2];
        for (i, placeholder) in self.placeholders.iter().enumerate() {
            let raw: f64 = captures[i + 1].parse().map_err(|_| Error::ParseError {
                what: "grid token numeric field",
                input: token.to_string(),
            })?;
            if let Some(slot) = values.get_mut(placeholder.argument_index) {
                *slot = raw;
            }
        }

        let lon = values[0] * self.cell_size_east * self.input_resolution;
        let lat = values[1] * self.cell_size_north * self.input_resolution;
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_simple_template() {
        let grid = GenericGrid::new("Z{0,number,0000}B{1,number,000}", 1.0, 1.0, 0.01).unwrap();
        let token = grid.encode(12.34, 5.6, None).unwrap();
        assert!(token.starts_with('Z'));
        let (lon, lat) = grid.decode(&token).unwrap();
        assert!((lon - 12.34).abs() < 0.02);
        assert!((lat - 5.6).abs() < 0.02);
    }

    #[test]
    fn malformed_template_is_rejected() {
        assert!(GenericGrid::new("Z{0,number}B", 1.0, 1.0, 1.0).is_err());
    }
}

//! Atlas pages (spec. §4.6, §9): each atlas carves the globe into a
//! rectangular grid of lettered/numbered cells, the way a paper road atlas
//! indexes its pages.
//!
//! Spec. §9 flags the source's magic-prefixed `"BUSY - ..."` error strings
//! for replacement with a typed [`crate::Error::NotReady`] the caller can
//! match on and retry against; this module never blocks waiting for an
//! atlas to be registered; it returns `NotReady` immediately instead.

use crate::Error;

/// One atlas's page grid: a rectangular extent subdivided into
/// `grid_h`×`grid_v` cells, each `cell_width`×`cell_height` degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasPage {
    pub page_id: String,
    pub grid_h: u32,
    pub grid_v: u32,
    pub min_lon: f64,
    pub min_lat: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl AtlasPage {
    #[must_use]
    pub fn new(page_id: impl Into<String>, grid_h: u32, grid_v: u32, min_lon: f64, min_lat: f64, cell_width: f64, cell_height: f64) -> AtlasPage {
        AtlasPage {
            page_id: page_id.into(),
            grid_h,
            grid_v,
            min_lon,
            min_lat,
            cell_width,
            cell_height,
        }
    }

    fn max_lon(&self) -> f64 {
        self.min_lon + f64::from(self.grid_h) * self.cell_width
    }

    fn max_lat(&self) -> f64 {
        self.min_lat + f64::from(self.grid_v) * self.cell_height
    }

    fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon < self.max_lon() && lat >= self.min_lat && lat < self.max_lat()
    }

    fn cell_of(&self, lon: f64, lat: f64) -> (u32, u32) {
        let col = ((lon - self.min_lon) / self.cell_width).floor() as u32;
        let row = ((lat - self.min_lat) / self.cell_height).floor() as u32;
        (col.min(self.grid_h.saturating_sub(1)), row.min(self.grid_v.saturating_sub(1)))
    }

    fn centroid_of(&self, grid_h: u32, grid_v: u32) -> (f64, f64) {
        let lon = self.min_lon + (f64::from(grid_h) + 0.5) * self.cell_width;
        let lat = self.min_lat + (f64::from(grid_v) + 0.5) * self.cell_height;
        (lon, lat)
    }
}

/// A named collection of [`AtlasPage`]s, registered as a unit via
/// `Registry::register_atlas` (spec. §6).
#[derive(Debug, Clone, PartialEq)]
pub struct Atlas {
    id: String,
    pages: Vec<AtlasPage>,
}

impl Atlas {
    #[must_use]
    pub fn new(id: impl Into<String>, pages: Vec<AtlasPage>) -> Atlas {
        Atlas { id: id.into(), pages }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    fn page(&self, page_id: &str) -> Option<&AtlasPage> {
        self.pages.iter().find(|p| p.page_id == page_id)
    }

    /// `"pageId:gridH,gridV"` → `(lon°, lat°)` at the cell's centroid.
    pub(crate) fn lookup_token(&self, token: &str) -> Result<(f64, f64), Error> {
        let (page_id, cell) = token.split_once(':').ok_or_else(|| parse_err(token))?;
        let (h, v) = cell.split_once(',').ok_or_else(|| parse_err(token))?;
        let grid_h: u32 = h.trim().parse().map_err(|_| parse_err(token))?;
        let grid_v: u32 = v.trim().parse().map_err(|_| parse_err(token))?;
        let page = self.page(page_id).ok_or_else(|| parse_err(token))?;
        if grid_h >= page.grid_h || grid_v >= page.grid_v {
            return Err(parse_err(token));
        }
        Ok(page.centroid_of(grid_h, grid_v))
    }

    /// `(lon°, lat°)` → the `"pageId:gridH,gridV"` token of the page/cell
    /// containing it, first match wins when pages overlap.
    pub(crate) fn token_for(&self, lon: f64, lat: f64) -> Result<String, Error> {
        let page = self
            .pages
            .iter()
            .find(|p| p.contains(lon, lat))
            .ok_or(Error::OutOfDomain { lat, lon })?;
        let (grid_h, grid_v) = page.cell_of(lon, lat);
        Ok(format!("{}:{grid_h},{grid_v}", page.page_id))
    }
}

fn parse_err(token: &str) -> Error {
    Error::ParseError {
        what: "atlas page token",
        input: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Atlas {
        Atlas::new(
            "US-ROAD",
            vec![AtlasPage::new("12", 4, 4, -80.0, 35.0, 0.25, 0.25)],
        )
    }

    #[test]
    fn token_round_trips_to_a_cell_centroid() {
        let atlas = sample();
        let token = atlas.token_for(-79.6, 35.6).unwrap();
        assert_eq!(token, "12:1,2");
        let (lon, lat) = atlas.lookup_token(&token).unwrap();
        assert!((lon - (-79.625)).abs() < 1e-9);
        assert!((lat - 35.625).abs() < 1e-9);
    }

    #[test]
    fn point_outside_every_page_is_out_of_domain() {
        let atlas = sample();
        assert!(matches!(atlas.token_for(10.0, 10.0), Err(Error::OutOfDomain { .. })));
    }

    #[test]
    fn malformed_token_is_a_parse_error() {
        let atlas = sample();
        assert!(matches!(atlas.lookup_token("nonsense"), Err(Error::ParseError { .. })));
    }
}

//! Coordinate systems and spatial references (spec. §3).

use crate::Error;

/// The kind of coordinate system a [`CoordSys`] describes (spec. §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordSysType {
    World,
    Lambert,
    TransverseMercator,
    Albers,
    Mercator,
    Stereographic,
    Grid,
    Atlas,
}

/// `{code, type, optional base_coord_sys, optional grid_template, optional
/// grid_cell_size_east/north, optional bounds}` (spec. §3).
#[derive(Debug, Clone, PartialEq)]
pub struct CoordSys {
    code: String,
    kind: CoordSysType,
    base_coord_sys: Option<String>,
    grid_template: Option<String>,
    grid_cell_size_east: Option<f64>,
    grid_cell_size_north: Option<f64>,
    input_resolution: Option<f64>,
    bounds: Option<(f64, f64, f64, f64)>,
}

impl CoordSys {
    #[must_use]
    pub fn new(code: impl Into<String>, kind: CoordSysType) -> CoordSys {
        CoordSys {
            code: code.into(),
            kind,
            base_coord_sys: None,
            grid_template: None,
            grid_cell_size_east: None,
            grid_cell_size_north: None,
            input_resolution: None,
            bounds: None,
        }
    }

    /// Build a generic stateplane-derived grid coordinate system, with a
    /// printf-like `grid_template` (spec. §4.5) driving encode/decode.
    #[must_use]
    pub fn generic_grid(
        code: impl Into<String>,
        base_coord_sys: impl Into<String>,
        grid_template: impl Into<String>,
        cell_size_east: f64,
        cell_size_north: f64,
        input_resolution: f64,
    ) -> CoordSys {
        CoordSys {
            code: code.into(),
            kind: CoordSysType::Grid,
            base_coord_sys: Some(base_coord_sys.into()),
            grid_template: Some(grid_template.into()),
            grid_cell_size_east: Some(cell_size_east),
            grid_cell_size_north: Some(cell_size_north),
            input_resolution: Some(input_resolution),
            bounds: None,
        }
    }

    /// Build an atlas-backed coordinate system: `code` is the reference's
    /// own name, `atlas_id` names the [`crate::Atlas`] a `Registry` looks
    /// it up by (spec. §4.6's `srcRef.type == ATLAS` dispatch).
    #[must_use]
    pub fn atlas(code: impl Into<String>, atlas_id: impl Into<String>) -> CoordSys {
        CoordSys {
            code: code.into(),
            kind: CoordSysType::Atlas,
            base_coord_sys: Some(atlas_id.into()),
            grid_template: None,
            grid_cell_size_east: None,
            grid_cell_size_north: None,
            input_resolution: None,
            bounds: None,
        }
    }

    #[must_use]
    pub fn with_bounds(mut self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        self.bounds = Some((min_lon, min_lat, max_lon, max_lat));
        self
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn kind(&self) -> CoordSysType {
        self.kind
    }

    #[must_use]
    pub fn base_coord_sys(&self) -> Option<&str> {
        self.base_coord_sys.as_deref()
    }

    #[must_use]
    pub fn grid_template(&self) -> Option<&str> {
        self.grid_template.as_deref()
    }

    #[must_use]
    pub fn grid_cell_size(&self) -> Option<(f64, f64)> {
        match (self.grid_cell_size_east, self.grid_cell_size_north) {
            (Some(e), Some(n)) => Some((e, n)),
            _ => None,
        }
    }

    #[must_use]
    pub fn input_resolution(&self) -> Option<f64> {
        self.input_resolution
    }

    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.bounds
    }
}

/// The primary user-visible object (spec. §3): a coordinate system paired
/// with a datum and unit, plus whatever projection parameters that
/// combination needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialReference {
    coord_sys: CoordSys,
    datum_code: String,
    unit_code: String,

    origin_lat: Option<f64>,
    origin_lon: Option<f64>,
    parallel1: Option<f64>,
    parallel2: Option<f64>,
    origin_x: Option<f64>,
    origin_y: Option<f64>,
    central_scale_factor: Option<f64>,
    equatorial_axis: Option<f64>,
    eccentricity_squared: Option<f64>,
}

impl SpatialReference {
    /// Recognized named grid codes dispatched directly by
    /// [`crate::grid::codec_for`], independent of any caller-supplied
    /// template parameters.
    const NAMED_GRID_CODES: &'static [&'static str] =
        &["USNG", "MGRS", "UTM", "GARS", "OSGB", "IRISH", "CAPCLASSIC", "CAPCELL"];

    /// Construct a `SpatialReference`, checking the invariants in spec. §3:
    /// (i) `units=degrees` implies `type=WORLD`, and (ii) `type=GRID`
    /// implies `units=grid`, and a GRID reference is either a recognized
    /// named grid or carries a full template parameter set.
    pub fn new(coord_sys: CoordSys, datum_code: impl Into<String>, unit_code: impl Into<String>) -> Result<SpatialReference, Error> {
        let unit_code = unit_code.into();
        if unit_code == "degrees" && coord_sys.kind() != CoordSysType::World {
            return Err(Error::UnitMismatch(unit_code, "WORLD".to_string()));
        }
        if coord_sys.kind() == CoordSysType::Grid {
            if unit_code != "grid" {
                return Err(Error::UnitMismatch(unit_code, "grid".to_string()));
            }
            let is_named = Self::NAMED_GRID_CODES.contains(&coord_sys.code());
            let has_template = coord_sys.base_coord_sys().is_some()
                && coord_sys.grid_template().is_some()
                && coord_sys.grid_cell_size().is_some()
                && coord_sys.input_resolution().is_some();
            if !is_named && !has_template {
                return Err(Error::UnknownReference(format!(
                    "{} is neither a recognized named grid nor fully parameterized with a base coordinate system, grid template, cell size, and input resolution",
                    coord_sys.code()
                )));
            }
        }
        Ok(SpatialReference {
            coord_sys,
            datum_code: datum_code.into(),
            unit_code,
            origin_lat: None,
            origin_lon: None,
            parallel1: None,
            parallel2: None,
            origin_x: None,
            origin_y: None,
            central_scale_factor: None,
            equatorial_axis: None,
            eccentricity_squared: None,
        })
    }

    /// `setCustomParams` (spec. §4.2): fill in the projection parameters of
    /// an otherwise-unparameterized `LAMBERTCUSTOM`/`TMCUSTOM` reference.
    #[must_use]
    pub fn with_custom_params(
        mut self,
        parallel1: f64,
        parallel2: f64,
        origin_lat: f64,
        origin_lon: f64,
        origin_x: f64,
        origin_y: f64,
        k0: f64,
    ) -> Self {
        self.parallel1 = Some(parallel1);
        self.parallel2 = Some(parallel2);
        self.origin_lat = Some(origin_lat);
        self.origin_lon = Some(origin_lon);
        self.origin_x = Some(origin_x);
        self.origin_y = Some(origin_y);
        self.central_scale_factor = Some(k0);
        self
    }

    #[must_use]
    pub fn with_origin(mut self, lat: f64, lon: f64) -> Self {
        self.origin_lat = Some(lat);
        self.origin_lon = Some(lon);
        self
    }

    #[must_use]
    pub fn with_parallels(mut self, parallel1: f64, parallel2: f64) -> Self {
        self.parallel1 = Some(parallel1);
        self.parallel2 = Some(parallel2);
        self
    }

    #[must_use]
    pub fn with_false_origin(mut self, x: f64, y: f64) -> Self {
        self.origin_x = Some(x);
        self.origin_y = Some(y);
        self
    }

    #[must_use]
    pub fn with_scale_factor(mut self, k0: f64) -> Self {
        self.central_scale_factor = Some(k0);
        self
    }

    #[must_use]
    pub fn with_ellipsoid(mut self, equatorial_axis: f64, eccentricity_squared: f64) -> Self {
        self.equatorial_axis = Some(equatorial_axis);
        self.eccentricity_squared = Some(eccentricity_squared);
        self
    }

    #[must_use]
    pub fn coord_sys(&self) -> &CoordSys {
        &self.coord_sys
    }

    #[must_use]
    pub fn datum_code(&self) -> &str {
        &self.datum_code
    }

    #[must_use]
    pub fn unit_code(&self) -> &str {
        &self.unit_code
    }

    #[must_use]
    pub fn origin(&self) -> Option<(f64, f64)> {
        Some((self.origin_lat?, self.origin_lon?))
    }

    #[must_use]
    pub fn parallels(&self) -> Option<(f64, f64)> {
        Some((self.parallel1?, self.parallel2?))
    }

    #[must_use]
    pub fn false_origin(&self) -> (f64, f64) {
        (self.origin_x.unwrap_or(0.0), self.origin_y.unwrap_or(0.0))
    }

    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        self.central_scale_factor.unwrap_or(1.0)
    }

    #[must_use]
    pub fn equatorial_axis(&self) -> Option<f64> {
        self.equatorial_axis
    }

    #[must_use]
    pub fn eccentricity_squared(&self) -> Option<f64> {
        self.eccentricity_squared
    }

    /// `(equatorial_axis, e²)`, required for any projected reference.
    /// Spec. §3 invariant (iii): always populated for TM/Lambert/Albers
    /// (and, by extension, the other projected types) by the registry at
    /// construction time.
    pub fn ellipsoid_params(&self) -> Result<(f64, f64), Error> {
        match (self.equatorial_axis, self.eccentricity_squared) {
            (Some(a), Some(e2)) => Ok((a, e2)),
            _ => Err(Error::UnknownReference(format!(
                "{} has no ellipsoid parameters",
                self.coord_sys.code()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_units_require_world_coord_sys() {
        let cs = CoordSys::new("LCC-TEST", CoordSysType::Lambert);
        let err = SpatialReference::new(cs, "WGS84", "degrees").unwrap_err();
        assert!(matches!(err, Error::UnitMismatch(_, _)));
    }

    #[test]
    fn grid_coord_sys_requires_grid_units() {
        let cs = CoordSys::new("USNG", CoordSysType::Grid);
        let err = SpatialReference::new(cs, "WGS84", "m").unwrap_err();
        assert!(matches!(err, Error::UnitMismatch(_, _)));
    }

    #[test]
    fn unrecognized_template_less_grid_is_rejected_at_construction() {
        let cs = CoordSys::new("MYSTERY-GRID", CoordSysType::Grid);
        let err = SpatialReference::new(cs, "WGS84", "grid").unwrap_err();
        assert!(matches!(err, Error::UnknownReference(_)));
    }

    #[test]
    fn named_grid_code_builds_without_a_template() {
        let cs = CoordSys::new("USNG", CoordSysType::Grid);
        assert!(SpatialReference::new(cs, "WGS84", "grid").is_ok());
    }

    #[test]
    fn templated_grid_without_a_named_code_builds() {
        let cs = CoordSys::generic_grid("MY-GRID", "UTM-18", "Z{0,number,0000}", 1.0, 1.0, 1.0);
        assert!(SpatialReference::new(cs, "WGS84", "grid").is_ok());
    }

    #[test]
    fn valid_world_reference_builds() {
        let cs = CoordSys::new("WORLD", CoordSysType::World);
        let sref = SpatialReference::new(cs, "WGS84", "degrees").unwrap();
        assert_eq!(sref.datum_code(), "WGS84");
    }
}

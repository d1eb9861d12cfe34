//! Multiple Regression Equation datum shift (spec. §4.4): a sparse
//! bivariate polynomial correction, as used by the US National Geodetic
//! Survey's NADCON-predecessor MRE grids.

/// One term `cᵢⱼ·Uⁱ·Vʲ` of an MRE polynomial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MreTerm {
    pub i: i32,
    pub j: i32,
    pub coefficient: f64,
}

/// Evaluate a sparse bivariate polynomial `Σ cᵢⱼ·Uⁱ·Vʲ` at `(u, v)`.
#[must_use]
pub fn evaluate(terms: &[MreTerm], u: f64, v: f64) -> f64 {
    terms
        .iter()
        .map(|t| t.coefficient * u.powi(t.i) * v.powi(t.j))
        .sum()
}

/// Apply an MRE shift to `(lon, lat)` in radians. `k` is the fixed scale
/// factor and `(lat0, lon0)` the polynomial's expansion origin (degrees),
/// per spec. §4.4: `U = k(φ − φ₀)`, `V = k(λ − λ₀)`.
#[must_use]
pub fn mre(
    lon: f64,
    lat: f64,
    k: f64,
    lat0: f64,
    lon0: f64,
    lat_coefficients: &[MreTerm],
    lon_coefficients: &[MreTerm],
) -> (f64, f64) {
    let u = k * (lat.to_degrees() - lat0);
    let v = k * (lon.to_degrees() - lon0);

    let dphi_as = evaluate(lat_coefficients, u, v);
    let dlam_as = evaluate(lon_coefficients, u, v);

    let lat2 = lat + (dphi_as / 3600.0).to_radians();
    let lon2 = lon + (dlam_as / 3600.0).to_radians();
    (lon2, lat2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_term_shifts_uniformly() {
        let lat_terms = [MreTerm { i: 0, j: 0, coefficient: 3.6 }];
        let lon_terms = [MreTerm { i: 0, j: 0, coefficient: -1.8 }];
        let lon = 0.0;
        let lat = 0.0;
        let (lon2, lat2) = mre(lon, lat, 1.0, 0.0, 0.0, &lat_terms, &lon_terms);
        assert!((lat2.to_degrees() * 3600.0 - 3.6).abs() < 1e-9);
        assert!((lon2.to_degrees() * 3600.0 + 1.8).abs() < 1e-9);
    }

    #[test]
    fn empty_coefficients_are_a_no_op() {
        let lon = 1.0;
        let lat = 1.0;
        let (lon2, lat2) = mre(lon, lat, 1.0, 0.0, 0.0, &[], &[]);
        assert_eq!((lon, lat), (lon2, lat2));
    }
}

//! Great-circle/geodesic distance and polygon measures (spec. §6):
//! `metersBetween`, `polygonArea`, `polygonPerimeter`.

use crate::Ellipsoid;

/// The great-circle or geodesic method used by [`meters_between`] (spec. §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMethod {
    /// Spherical law of cosines; fast, loses precision for very short spans.
    LawOfCosines,
    /// Haversine; numerically stable at short spans.
    Haversine,
    /// Vincenty's inverse formula on the WGS84 ellipsoid; iterative, the
    /// most accurate of the three.
    Vincenty,
}

/// Mean earth radius, meters, used by the two spherical methods.
const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

const VINCENTY_TOLERANCE: f64 = 1e-12;
const VINCENTY_MAX_ITERATIONS: usize = 200;

/// Distance in meters between two `(lon°, lat°)` points by `method`.
#[must_use]
pub fn meters_between(p1: (f64, f64), p2: (f64, f64), method: DistanceMethod) -> f64 {
    match method {
        DistanceMethod::LawOfCosines => law_of_cosines(p1, p2),
        DistanceMethod::Haversine => haversine(p1, p2),
        DistanceMethod::Vincenty => vincenty(p1, p2),
    }
}

fn law_of_cosines(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let (lon1, lat1) = (p1.0.to_radians(), p1.1.to_radians());
    let (lon2, lat2) = (p2.0.to_radians(), p2.1.to_radians());
    let central_angle = (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon2 - lon1).cos()).clamp(-1.0, 1.0).acos();
    MEAN_EARTH_RADIUS_M * central_angle
}

fn haversine(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let (lon1, lat1) = (p1.0.to_radians(), p1.1.to_radians());
    let (lon2, lat2) = (p2.0.to_radians(), p2.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let central_angle = 2.0 * a.sqrt().asin();
    MEAN_EARTH_RADIUS_M * central_angle
}

/// Vincenty's inverse formula on WGS84, iterating on the reduced-latitude
/// auxiliary angle `lambda` until it stabilizes to within
/// [`VINCENTY_TOLERANCE`] radians, aborting after [`VINCENTY_MAX_ITERATIONS`]
/// (nearly-antipodal points may not converge; such points fall back to the
/// last iterate rather than erroring, since this is a read-only helper, not
/// part of the conversion kernel's typed error surface).
fn vincenty(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let wgs84 = Ellipsoid::default();
    let a = wgs84.equatorial_axis();
    let f = wgs84.flattening();
    let b = wgs84.semiminor_axis();

    let (lon1, lat1) = (p1.0.to_radians(), p1.1.to_radians());
    let (lon2, lat2) = (p2.0.to_radians(), p2.1.to_radians());

    let u1 = ((1.0 - f) * lat1.tan()).atan();
    let u2 = ((1.0 - f) * lat2.tan()).atan();
    let l = lon2 - lon1;

    let mut lambda = l;
    let (mut sin_sigma, mut cos_sigma, mut sigma, mut cos_sq_alpha, mut cos_2sigma_m) = (0.0, 0.0, 0.0, 0.0, 0.0);

    for _ in 0..VINCENTY_MAX_ITERATIONS {
        let sin_lambda = lambda.sin();
        let cos_lambda = lambda.cos();
        sin_sigma = ((u2.cos() * sin_lambda).powi(2) + (u1.cos() * u2.sin() - u1.sin() * u2.cos() * cos_lambda).powi(2)).sqrt();
        if sin_sigma == 0.0 {
            return 0.0;
        }
        cos_sigma = u1.sin() * u2.sin() + u1.cos() * u2.cos() * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = u1.cos() * u2.cos() * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha.powi(2);
        cos_2sigma_m = if cos_sq_alpha.abs() < 1e-12 {
            0.0
        } else {
            cos_sigma - 2.0 * u1.sin() * u2.sin() / cos_sq_alpha
        };
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = l + (1.0 - c) * f * sin_alpha * (sigma + c * sin_sigma * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));
        if (lambda - lambda_prev).abs() < VINCENTY_TOLERANCE {
            break;
        }
    }

    let u_sq = cos_sq_alpha * (a.powi(2) - b.powi(2)) / b.powi(2);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                    - big_b / 6.0 * cos_2sigma_m * (-3.0 + 4.0 * sin_sigma.powi(2)) * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));

    b * big_a * (sigma - delta_sigma)
}

/// Spherical excess area (in square meters) of the closed polygon named by
/// `points` (`(lon°, lat°)`, implicitly closed back to the first vertex).
#[must_use]
pub fn polygon_area(points: &[(f64, f64)]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for window in points.windows(2) {
        let (lon1, lat1) = (window[0].0.to_radians(), window[0].1.to_radians());
        let (lon2, lat2) = (window[1].0.to_radians(), window[1].1.to_radians());
        sum += (lon2 - lon1) * (2.0 + lat1.sin() + lat2.sin());
    }
    let (lon1, lat1) = (points[points.len() - 1].0.to_radians(), points[points.len() - 1].1.to_radians());
    let (lon2, lat2) = (points[0].0.to_radians(), points[0].1.to_radians());
    sum += (lon2 - lon1) * (2.0 + lat1.sin() + lat2.sin());

    (sum * MEAN_EARTH_RADIUS_M.powi(2) / 2.0).abs()
}

/// Sum of [`meters_between`] (Haversine) over each closed-polygon edge.
#[must_use]
pub fn polygon_perimeter(points: &[(f64, f64)]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for window in points.windows(2) {
        total += meters_between(window[0], window[1], DistanceMethod::Haversine);
    }
    total += meters_between(points[points.len() - 1], points[0], DistanceMethod::Haversine);
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_three_methods_roughly_agree_over_a_modest_span() {
        let paris = (2.3522, 48.8566);
        let london = (-0.1276, 51.5072);
        let law = meters_between(paris, london, DistanceMethod::LawOfCosines);
        let haversine = meters_between(paris, london, DistanceMethod::Haversine);
        let vincenty = meters_between(paris, london, DistanceMethod::Vincenty);
        assert!((law - haversine).abs() < 50.0);
        assert!((haversine - vincenty).abs() < 2_000.0);
        assert!((vincenty - 343_556.0).abs() < 2_000.0);
    }

    #[test]
    fn zero_distance_between_identical_points() {
        let p = (10.0, 20.0);
        assert!(meters_between(p, p, DistanceMethod::Vincenty) < 1e-6);
    }

    #[test]
    fn unit_square_area_and_perimeter() {
        let square = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
        let area = polygon_area(&square);
        assert!(area > 0.0);
        let perimeter = polygon_perimeter(&square);
        assert!(perimeter > 4.0 * 100_000.0);
    }
}

//! End-to-end conversion scenarios driven entirely through the public
//! surface (`Registry`, `SpatialReference`, `GeoPoint::convert`), exercised
//! as an independent downstream crate would use `geocodec`.

use geocodec::prelude::*;
use geocodec::CoordSysType;

fn world(datum: &str) -> SpatialReference {
    SpatialReference::new(CoordSys::new("WORLD", CoordSysType::World), datum, "degrees").unwrap()
}

fn utm(zone: u32, north: bool) -> SpatialReference {
    SpatialReference::new(CoordSys::new("UTM", CoordSysType::TransverseMercator), "WGS84", "m")
        .unwrap()
        .with_origin(0.0, (6 * zone) as f64 - 183.0)
        .with_false_origin(500_000.0, if north { 0.0 } else { 10_000_000.0 })
        .with_scale_factor(0.9996)
        .with_ellipsoid(6_378_137.0, 0.006_694_379_990_14)
}

fn usng() -> SpatialReference {
    SpatialReference::new(CoordSys::new("USNG", CoordSysType::Grid), "WGS84", "grid").unwrap()
}

fn ca_zone_3(registry: &Registry, datum: &str) -> SpatialReference {
    registry.lookup_spatial_ref("CA3", datum, "us-ft").unwrap().clone()
}

#[test]
fn world_to_utm_and_back_round_trips() {
    let registry = Registry::bootstrap();
    let src = world("WGS84");
    let dst = utm(18, true);

    // Washington Monument.
    let point = GeoPoint::coordinates(-77.035242, 38.889471);
    let projected = geocodec::convert(&point, &src, &dst, None, None, &registry).unwrap();
    assert!((projected.x - 323_483.0).abs() < 10.0);
    assert!((projected.y - 4_306_479.0).abs() < 10.0);

    let back = geocodec::convert(&projected, &dst, &src, None, None, &registry).unwrap();
    assert!((back.x - point.x).abs() < 1e-6);
    assert!((back.y - point.y).abs() < 1e-6);
}

#[test]
fn world_to_usng_token_round_trips() {
    let registry = Registry::bootstrap();
    let src = world("WGS84");
    let dst = usng();

    let point = GeoPoint::coordinates(-77.035242, 38.889471);
    let token = geocodec::convert(&point, &src, &dst, None, Some(5), &registry).unwrap();
    let as_token = token.grid_token.as_deref().unwrap();
    assert!(as_token.starts_with("18S"));

    let back = geocodec::convert(&token, &dst, &src, None, None, &registry).unwrap();
    assert!((back.x - point.x).abs() < 1e-3);
    assert!((back.y - point.y).abs() < 1e-3);
}

#[test]
fn nad27_to_wgs84_applies_the_registered_molodensky_shift() {
    let registry = Registry::bootstrap();
    let src = world("NAD27");
    let dst = world("WGS84");

    let point = GeoPoint::coordinates(-100.0, 40.0);
    let shifted = geocodec::convert(&point, &src, &dst, None, None, &registry).unwrap();

    // A Molodensky shift of this size moves the point measurably but not
    // wildly; exact values are cross-checked against the datum_shift unit
    // tests in `src/datum_shift/molodensky.rs`.
    assert!((shifted.x - point.x).abs() > 1e-6);
    assert!((shifted.x - point.x).abs() < 0.01);
    assert!((shifted.y - point.y).abs() < 0.01);
}

#[test]
fn synonym_datums_convert_without_numerical_drift() {
    let registry = Registry::bootstrap();
    let src = world("WGS84");
    let dst = world("NAD83");

    let point = GeoPoint::coordinates(-77.0, 38.0);
    let converted = geocodec::convert(&point, &src, &dst, None, None, &registry).unwrap();
    assert_eq!(converted.x, point.x);
    assert_eq!(converted.y, point.y);
}

#[test]
fn unregistered_atlas_reference_fails_not_ready_rather_than_blocking() {
    let registry = Registry::bootstrap();
    let src = world("WGS84");
    let atlas_ref = SpatialReference::new(CoordSys::atlas("US-ROAD", "US-ROAD"), "WGS84", "grid").unwrap();

    let point = GeoPoint::coordinates(-79.6, 35.6);
    let err = geocodec::convert(&point, &src, &atlas_ref, None, None, &registry).unwrap_err();
    assert!(matches!(err, geocodec::Error::NotReady(_)));
}

#[test]
fn caller_registered_atlas_resolves_once_added_to_the_registry() {
    let mut registry = Registry::bootstrap();
    registry.register_atlas(Atlas::new(
        "US-ROAD",
        vec![AtlasPage::new("12", 4, 4, -80.0, 35.0, 0.25, 0.25)],
    ));
    let atlas_cs = CoordSys::atlas("ATLAS-US-ROAD", "US-ROAD");
    let atlas_ref = SpatialReference::new(atlas_cs, "WGS84", "grid").unwrap();

    let src = world("WGS84");
    let point = GeoPoint::coordinates(-79.6, 35.6);
    let token = geocodec::convert(&point, &src, &atlas_ref, None, None, &registry).unwrap();
    assert_eq!(token.grid_token.as_deref(), Some("12:1,2"));
}

#[test]
fn ca_zone_3_nad27_to_world_wgs84_matches_the_published_fix() {
    let registry = Registry::bootstrap();
    let src = ca_zone_3(&registry, "NAD27");
    let dst = world("WGS84");

    let point = GeoPoint::coordinates(1_510_000.0, 520_000.0);
    let geographic = geocodec::convert(&point, &src, &dst, None, None, &registry).unwrap();
    assert!((geographic.y - 37.915_952_652).abs() < 1e-6);
    assert!((geographic.x - (-122.198_650_117)).abs() < 1e-6);
}

#[test]
fn ca_zone_3_nad27_to_nad83_round_trips() {
    let registry = Registry::bootstrap();
    let src = ca_zone_3(&registry, "NAD27");
    let dst = ca_zone_3(&registry, "NAD83");

    let point = GeoPoint::coordinates(1_486_710.0, 537_380.0);
    let converted = geocodec::convert(&point, &src, &dst, None, None, &registry).unwrap();
    // NAD27 and NAD83 Zone 3 share the same origin and parallels and differ
    // only by a sub-millimeter false-origin offset and the Clarke1866/GRS80
    // ellipsoid swap, so the easting/northing barely move.
    assert!((converted.x - point.x).abs() < 5.0);
    assert!((converted.y - point.y).abs() < 5.0);

    let back = geocodec::convert(&converted, &dst, &src, None, None, &registry).unwrap();
    assert!((back.x - point.x).abs() < 1e-3);
    assert!((back.y - point.y).abs() < 1e-3);
}

#[test]
fn distance_and_polygon_helpers_are_reachable_from_the_prelude() {
    let paris = (2.3522, 48.8566);
    let london = (-0.1276, 51.5072);
    let meters = meters_between(paris, london, DistanceMethod::Vincenty);
    assert!((meters - 343_556.0).abs() < 2_000.0);

    let square = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
    assert!(polygon_area(&square) > 0.0);
    assert!(polygon_perimeter(&square) > 0.0);
}

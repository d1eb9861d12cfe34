//! Built-in named ellipsoids (spec. §4.1, §6).
//!
//! A flat, compile-time constructible table, following the teacher crate's
//! `ellipsoid::constants::ELLIPSOID_LIST` layout (a `HashMap` cannot yet be
//! built at compile time in stable Rust).

/// `(code, equatorial_axis_m, inverse_flattening, description)`.
///
/// The numeric values for Clarke 1866, GRS80, WGS84, and Airy 1830 are the
/// bit-exact boundary constants named in spec. §6; the rest of the table
/// supplements the catalog with the other ellipsoids this system's grid
/// codecs run on (Airy 1849 for OSGB, Bessel 1841 for historical European
/// realizations).
#[rustfmt::skip]
pub(super) const ELLIPSOID_LIST: &[(&str, f64, f64, &str)] = &[
    ("clarke1866", 6_378_206.4,   294.978_698_2,         "Clarke 1866"),
    ("grs80",      6_378_137.0,   298.257_222_100_882_7, "GRS 1980 (IUGG 1980)"),
    ("wgs84",      6_378_137.0,   298.257_223_563,       "World Geodetic System 1984"),
    ("airy1830",   6_377_563.396, 299.324_964_6,         "Airy 1830"),
    ("airy1849",   6_377_340.189, 299.324_964_6,         "Airy 1830 (Ireland, 1849 adjustment)"),
    ("bessel1841", 6_377_397.155, 299.152_812_8,         "Bessel 1841"),
    ("intl1924",   6_378_388.0,   297.0,                 "International 1924 (Hayford)"),
];

/// `e²` values that must be preserved bit-exactly where spec. §6 calls them
/// out explicitly, rather than re-derived from `f` through the general
/// `e² = f(2 - f)` relation (the two differ in the last bit or two).
#[rustfmt::skip]
pub(super) const EXACT_ECCENTRICITY_SQUARED: &[(&str, f64)] = &[
    ("clarke1866", 0.006_768_658),
    ("grs80",      0.006_694_38),
    ("wgs84",      0.006_694_379_990_14),
    ("airy1830",   0.006_670_540_074_149_084),
];

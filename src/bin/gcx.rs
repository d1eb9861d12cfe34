//! `gcx`: convert points between reference systems from the command line.
//!
//! Reads one point per line of stdin (two whitespace-separated numbers for
//! a `WORLD`/projected `--from`, or a single grid/atlas token otherwise)
//! and writes the converted point to stdout, one per line.
//!
//! Reference shorthand is `CoordSys[.Datum[.Unit-or-precision]]`, e.g.
//! `WORLD.WGS84.DEG` or `USNG.WGS84.4`:
//!
//! ```text
//! echo "-77.035242 38.889471" | gcx --from WORLD.WGS84.DEG --to USNG.WGS84.4
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context as _};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use geocodec::prelude::*;
use geocodec::{CoordSys, CoordSysType, ShiftMethodTag};
use log::debug;

/// Convert points between geographic, projected and grid reference systems.
#[derive(Parser, Debug)]
#[command(name = "gcx", version, about)]
struct Opt {
    /// Source reference, e.g. `WGS84.DEG`, `USNG4`, `UTM`.
    #[arg(long)]
    from: String,

    /// Destination reference, in the same shorthand as `--from`.
    #[arg(long)]
    to: String,

    /// Datum shift method to require (rather than letting the registry
    /// pick the best match): `molodensky`, `helmert`, or `mre`.
    #[arg(long)]
    shift_method: Option<String>,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

/// A reference shorthand as accepted on the command line: a coord-sys code,
/// optionally dotted with a datum code, optionally dotted with a unit code
/// or numeric grid precision (e.g. `WGS84.DEG`, `USNG4`, `LCC.NAD83.M`).
struct ShorthandRef {
    coord_sys: String,
    datum: String,
    unit_or_precision: String,
}

fn parse_shorthand(input: &str) -> ShorthandRef {
    let mut fields = input.split('.');
    let first = fields.next().unwrap_or_default();

    // Trailing digits on the first field name a grid precision, e.g. "USNG4".
    let split_at = first.find(|c: char| c.is_ascii_digit()).unwrap_or(first.len());
    let (coord_sys, trailing_digits) = first.split_at(split_at);

    ShorthandRef {
        coord_sys: coord_sys.to_string(),
        datum: fields.next().unwrap_or("WGS84").to_string(),
        unit_or_precision: if !trailing_digits.is_empty() {
            trailing_digits.to_string()
        } else {
            fields.next().unwrap_or("degrees").to_string()
        },
    }
}

fn coord_sys_kind(code: &str) -> Result<CoordSysType, anyhow::Error> {
    Ok(match code.to_ascii_uppercase().as_str() {
        "WORLD" => CoordSysType::World,
        "LCC" | "LAMBERT" => CoordSysType::Lambert,
        "UTM" | "TM" => CoordSysType::TransverseMercator,
        "ALBERS" => CoordSysType::Albers,
        "MERCATOR" => CoordSysType::Mercator,
        "STEREO" => CoordSysType::Stereographic,
        "USNG" | "MGRS" | "GARS" | "OSGB" | "IRISH" | "CAPCLASSIC" | "CAPCELL" => CoordSysType::Grid,
        other => return Err(anyhow!("unrecognized coordinate system shorthand '{other}'")),
    })
}

fn resolve(shorthand: &str, registry: &Registry) -> Result<SpatialReference, anyhow::Error> {
    let parsed = parse_shorthand(shorthand);
    let kind = coord_sys_kind(&parsed.coord_sys)?;

    let units = match kind {
        CoordSysType::World => "degrees".to_string(),
        CoordSysType::Grid => "grid".to_string(),
        _ if parsed.unit_or_precision.chars().all(|c| c.is_ascii_digit()) => "m".to_string(),
        _ => parsed.unit_or_precision.to_ascii_lowercase(),
    };

    if let Ok(known) = registry.lookup_spatial_ref(&parsed.coord_sys, &parsed.datum, &units) {
        return Ok(known.clone());
    }
    if let Ok(known) = registry.spatial_ref_by_code(&parsed.coord_sys) {
        return Ok(known.clone());
    }

    let coord_sys = CoordSys::new(parsed.coord_sys.clone(), kind);
    SpatialReference::new(coord_sys, parsed.datum, units).with_context(|| format!("building reference for '{shorthand}'"))
}

/// The destination grid-token precision named in a `--to` shorthand's
/// trailing digits (e.g. the `4` in `USNG4`), if any.
fn grid_precision(shorthand: &str) -> Option<u8> {
    parse_shorthand(shorthand).unit_or_precision.parse().ok()
}

fn shift_method_tag(name: &str) -> Result<ShiftMethodTag, anyhow::Error> {
    match name.to_ascii_lowercase().as_str() {
        "synonym" => Ok(ShiftMethodTag::Synonym),
        "molodensky" => Ok(ShiftMethodTag::Molodensky),
        "helmert" => Ok(ShiftMethodTag::Helmert),
        "mre" => Ok(ShiftMethodTag::Mre),
        other => Err(anyhow!("unknown datum shift method '{other}'")),
    }
}

fn main() -> Result<(), anyhow::Error> {
    let opt = Opt::parse();
    env_logger::Builder::new().filter_level(opt.verbosity.log_level_filter()).init();
    debug!("gcx starting: {opt:?}");

    let registry = Registry::bootstrap();
    let src_ref = resolve(&opt.from, &registry)?;
    let dst_ref = resolve(&opt.to, &registry)?;

    let shift_method = opt.shift_method.as_deref().map(shift_method_tag).transpose()?;
    let dst_precision = grid_precision(&opt.to);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let point = if src_ref.coord_sys().kind() == CoordSysType::Grid {
            GeoPoint::token(trimmed)
        } else {
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            let lon = parse_lat_lon(fields.first().copied().unwrap_or_default())?;
            let lat = parse_lat_lon(fields.get(1).copied().unwrap_or_default())?;
            GeoPoint::coordinates(lon, lat)
        };

        match geocodec::convert(&point, &src_ref, &dst_ref, shift_method, dst_precision, &registry) {
            Ok(converted) => {
                if let Some(token) = &converted.grid_token {
                    writeln!(out, "{token}")?;
                } else {
                    writeln!(out, "{} {}", converted.x, converted.y)?;
                }
            }
            Err(err) => {
                writeln!(io::stderr(), "error converting '{trimmed}': {err}")?;
            }
        }
    }

    Ok(())
}

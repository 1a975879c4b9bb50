use std::path::PathBuf;

use clap::Parser;

use crate::map::GeoPosition;

/// Map viewer for school-route hazard reports.
#[derive(Debug, Clone, Parser)]
#[command(name = "route-safety-map", version, about)]
pub struct Args {
    /// Hazard table to load at startup (.csv, .json or .parquet)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Initial map center as LAT,LNG
    #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
    pub center: Option<GeoPosition>,

    /// Initial zoom level (0-19)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=19))]
    pub zoom: Option<u8>,

    /// Device position as LAT,LNG for "Locate me"; without it locating
    /// reports that no position is available
    #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
    pub location: Option<GeoPosition>,

    /// Screen radius in pixels within which markers are clustered
    #[arg(long)]
    pub cluster_radius: Option<f32>,
}

/// Parse `LAT,LNG`.
pub fn parse_position(s: &str) -> Result<GeoPosition, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{s}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{lat}'"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{lng}'"))?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("position {lat},{lng} is out of range"));
    }
    Ok(GeoPosition::new(lat, lng))
}

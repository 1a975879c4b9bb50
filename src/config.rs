use std::path::PathBuf;

use crate::cli::Args;
use crate::map::{FixedGeolocation, GeoPosition, Geolocator, NoGeolocation};
use crate::view::cluster::DEFAULT_CLUSTER_RADIUS;

/// Ashikaga city hall, roughly.
pub const DEFAULT_CENTER: GeoPosition = GeoPosition {
    lat: 36.3407,
    lng: 139.4495,
};
pub const DEFAULT_ZOOM: u8 = 13;
pub const DEFAULT_DATA_PATH: &str = "data/hazards.csv";
/// Zoom used when centering on the device.
pub const LOCATE_MAX_ZOOM: u8 = 17;

/// Startup configuration resolved from defaults and command-line flags.
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub center: GeoPosition,
    pub zoom: u8,
    pub data_path: PathBuf,
    pub device_location: Option<GeoPosition>,
    pub cluster_radius: f32,
    pub locate_max_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            device_location: None,
            cluster_radius: DEFAULT_CLUSTER_RADIUS,
            locate_max_zoom: LOCATE_MAX_ZOOM,
        }
    }
}

impl MapConfig {
    pub fn from_args(args: &Args) -> Self {
        let defaults = MapConfig::default();
        Self {
            center: args.center.unwrap_or(defaults.center),
            zoom: args.zoom.unwrap_or(defaults.zoom),
            data_path: args.data.clone().unwrap_or(defaults.data_path),
            device_location: args.location,
            cluster_radius: args.cluster_radius.unwrap_or(defaults.cluster_radius),
            ..defaults
        }
    }

    /// The geolocation source for this host.
    pub fn geolocator(&self) -> Box<dyn Geolocator> {
        match self.device_location {
            Some(pos) => Box::new(FixedGeolocation(pos)),
            None => Box::new(NoGeolocation),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let args = Args::parse_from(["route-safety-map"]);
        let config = MapConfig::from_args(&args);
        assert_eq!(config.center, DEFAULT_CENTER);
        assert_eq!(config.zoom, DEFAULT_ZOOM);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert!(config.geolocator().locate().is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "route-safety-map",
            "--data",
            "other.csv",
            "--zoom",
            "15",
            "--location",
            "36.3,139.4",
        ]);
        let config = MapConfig::from_args(&args);
        assert_eq!(config.data_path, PathBuf::from("other.csv"));
        assert_eq!(config.zoom, 15);
        assert_eq!(
            config.geolocator().locate().unwrap(),
            GeoPosition::new(36.3, 139.4)
        );
    }
}

//! Hazard report map: load geotagged reports, filter them and keep the map,
//! stats panel and GeoJSON export in step with the filtered subset.

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod map;
pub mod state;
pub mod ui;
pub mod view;

use std::path::{Path, PathBuf};

use crate::config::MapConfig;
use crate::data::export;
use crate::data::filter::{FilterCriteria, filtered_indices};
use crate::data::loader::LoadedDataset;
use crate::data::model::{Category, MIN_SEVERITY, Point, PointStore};
use crate::error::MapError;
use crate::map::{Geolocator, MapViewport};
use crate::view::cluster::ClusterLayer;
use crate::view::sync::{CategoryStats, synchronize};

// ---------------------------------------------------------------------------
// Commands dispatched by the UI
// ---------------------------------------------------------------------------

/// The user actions the UI adapter can trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ApplyFilters,
    ResetFilters,
    /// Save the filtered subset as GeoJSON at this path.
    Export(PathBuf),
    Locate,
}

/// How a status message should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded reports. Empty until a load completes.
    pub store: PointStore,

    /// Predicates being edited in the side panel.
    pub criteria: FilterCriteria,

    /// Indices into `store` of the points passing the last applied filter.
    pub visible_indices: Vec<usize>,

    /// Markers for `visible_indices`.
    pub markers: ClusterLayer,

    /// Per-category counts for `visible_indices`.
    pub stats: CategoryStats,

    pub viewport: MapViewport,

    /// Point whose details window is open.
    pub selected: Option<usize>,

    /// Status / error message shown in the UI.
    pub status_message: Option<(StatusKind, String)>,

    /// Set when the last load failed; drives the error window.
    pub load_error: Option<String>,

    /// File currently loaded or being loaded.
    pub data_path: Option<PathBuf>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,

    geolocator: Box<dyn Geolocator>,
    locate_max_zoom: u8,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&MapConfig::default())
    }
}

impl AppState {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            store: PointStore::default(),
            criteria: FilterCriteria::default(),
            visible_indices: Vec::new(),
            markers: ClusterLayer::new(config.cluster_radius),
            stats: CategoryStats::default(),
            viewport: MapViewport::new(config.center, config.zoom),
            selected: None,
            status_message: None,
            load_error: None,
            data_path: None,
            loading: false,
            geolocator: config.geolocator(),
            locate_max_zoom: config.locate_max_zoom,
        }
    }

    /// Mark a load as started. The store is emptied so a failure leaves
    /// an empty map.
    pub fn begin_load(&mut self, path: &Path) {
        self.store = PointStore::default();
        self.selected = None;
        self.data_path = Some(path.to_path_buf());
        self.loading = true;
        self.load_error = None;
        self.status_message = Some((StatusKind::Info, format!("Loading {}…", path.display())));
        self.apply_filters();
    }

    /// Completion callback for a load.
    pub fn finish_load(&mut self, result: anyhow::Result<LoadedDataset>) {
        self.loading = false;
        match result {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                let err = MapError::DatasetLoadFailed {
                    path: self.data_path.clone().unwrap_or_default(),
                    reason: format!("{e:#}"),
                };
                log::error!("{err}");
                self.store = PointStore::default();
                self.load_error = Some(format!(
                    "{err}\n\nCheck that the file exists and has lat, lng and category columns."
                ));
                self.status_message = Some((StatusKind::Error, "Loading hazard data failed".to_string()));
                self.apply_filters();
            }
        }
    }

    /// Ingest a newly loaded dataset and show everything that matches the
    /// current criteria.
    pub fn set_dataset(&mut self, dataset: LoadedDataset) {
        let LoadedDataset { store, report } = dataset;
        self.store = store;
        self.selected = None;
        self.load_error = None;
        self.loading = false;

        self.status_message = if self.store.is_empty() {
            Some((
                StatusKind::Error,
                format!(
                    "No valid hazard reports found ({} rows read, {} skipped)",
                    report.rows_read, report.rows_rejected
                ),
            ))
        } else {
            None
        };

        self.apply_filters();
    }

    // -- command handlers --

    pub fn dispatch(&mut self, command: Command) {
        log::debug!("Command: {command:?}");
        match command {
            Command::ApplyFilters => self.apply_filters(),
            Command::ResetFilters => self.reset_filters(),
            Command::Export(path) => {
                if let Err(e) = self.export_to(&path) {
                    log::error!("{e}");
                    self.status_message = Some((StatusKind::Error, e.to_string()));
                }
            }
            Command::Locate => self.locate(),
        }
    }

    /// Recompute the filtered subset and rebuild markers and stats from it.
    pub fn apply_filters(&mut self) {
        self.visible_indices = filtered_indices(&self.store, &self.criteria);
        let points = self.store.points();
        let subset = self.visible_indices.iter().map(|&i| (i, &points[i]));
        self.stats = synchronize(subset, &mut self.markers);

        if let Some(sel) = self.selected {
            if !self.visible_indices.contains(&sel) {
                self.selected = None;
            }
        }
    }

    /// Check every category, severity back to 1, clear search, re-apply.
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria {
            active: Category::ALL.into_iter().collect(),
            min_severity: MIN_SEVERITY,
            search: String::new(),
        };
        self.apply_filters();
    }

    /// Write the filtered subset to `path`.
    pub fn export_to(&mut self, path: &Path) -> Result<usize, MapError> {
        let n = export::write_geojson(self.filtered_points(), path)?;
        self.status_message = Some((
            StatusKind::Info,
            format!("Exported {n} reports to {}", path.display()),
        ));
        Ok(n)
    }

    /// Center the map on the device, or explain why we can't.
    pub fn locate(&mut self) {
        match self.geolocator.locate() {
            Ok(pos) => {
                self.viewport.locate(pos, self.locate_max_zoom);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("{e}");
                self.status_message = Some((StatusKind::Error, e.to_string()));
            }
        }
    }

    // -- accessors --

    /// The filtered subset, in store order.
    pub fn filtered_points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.visible_indices.iter().map(|&i| &self.store.points()[i])
    }

    pub fn toggle_category(&mut self, category: Category, checked: bool) {
        if checked {
            self.criteria.active.insert(category);
        } else {
            self.criteria.active.remove(&category);
        }
    }

    /// Open the details window for the marker at `marker_index`.
    pub fn select_marker(&mut self, marker_index: usize) {
        self.selected = self
            .markers
            .markers()
            .get(marker_index)
            .map(|m| m.point_index);
    }

    pub fn selected_point(&self) -> Option<&Point> {
        self.selected.and_then(|i| self.store.get(i))
    }
}

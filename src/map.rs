use crate::error::MapError;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPosition {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

// ---------------------------------------------------------------------------
// Viewport – what part of the map is on screen
// ---------------------------------------------------------------------------

/// Center and zoom of the map surface, slippy-map style zoom levels.
///
/// The view only pushes bounds to the plot when `pending` is set, so the
/// user can pan and zoom freely in between.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewport {
    pub center: GeoPosition,
    pub zoom: u8,
    pending: bool,
}

impl MapViewport {
    pub const MAX_ZOOM: u8 = 19;

    pub fn new(center: GeoPosition, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.min(Self::MAX_ZOOM),
            pending: true,
        }
    }

    pub fn set_view(&mut self, center: GeoPosition, zoom: u8) {
        self.center = center;
        self.zoom = zoom.min(Self::MAX_ZOOM);
        self.pending = true;
    }

    /// Center on a device position at `max_zoom`.
    pub fn locate(&mut self, position: GeoPosition, max_zoom: u8) {
        self.set_view(position, max_zoom);
    }

    /// Longitude span shown at the current zoom, assuming a ~1024 px wide
    /// view of 256 px tiles.
    pub fn lng_span(&self) -> f64 {
        360.0 / 2f64.powi(self.zoom as i32) * 4.0
    }

    /// Latitude span matching [`Self::lng_span`] for a `height / width`
    /// aspect ratio.
    pub fn lat_span(&self, aspect: f64) -> f64 {
        self.lng_span() * aspect * self.center.lat.to_radians().cos()
    }

    /// `[min_lng, min_lat]` and `[max_lng, max_lat]` of the view.
    pub fn bounds(&self, aspect: f64) -> ([f64; 2], [f64; 2]) {
        let half_lng = self.lng_span() / 2.0;
        let half_lat = self.lat_span(aspect) / 2.0;
        (
            [self.center.lng - half_lng, self.center.lat - half_lat],
            [self.center.lng + half_lng, self.center.lat + half_lat],
        )
    }

    /// Take the pending flag, returning whether bounds must be pushed.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

// ---------------------------------------------------------------------------
// Geolocation
// ---------------------------------------------------------------------------

/// Source of the device position.
pub trait Geolocator {
    fn locate(&self) -> Result<GeoPosition, MapError>;
}

/// A device with no location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

impl Geolocator for NoGeolocation {
    fn locate(&self) -> Result<GeoPosition, MapError> {
        Err(MapError::GeolocationUnavailable)
    }
}

/// A fixed position supplied on the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocation(pub GeoPosition);

impl Geolocator for FixedGeolocation {
    fn locate(&self) -> Result<GeoPosition, MapError> {
        Ok(self.0)
    }
}

use serde::Serialize;
use utoipa::ToSchema;

/// Axis-aligned latitude/longitude rectangle with a nominal center point.
///
/// Containment is inclusive on all four edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    pub center_lat: f64,
    pub center_lon: f64,
}

/// Loose box used to frame the lightning map. Strikes outside it are still
/// plotted; it only feeds the within-bounds diagnostic.
pub const LIGHTNING_DISPLAY_BOUNDS: GeoBounds = GeoBounds {
    lat_min: 0.95,
    lat_max: 1.75,
    lon_min: 103.27,
    lon_max: 104.52,
    center_lat: 1.3521,
    center_lon: 103.8198,
};

/// Tight box around Singapore. Geocoded points outside it are rejected.
pub const GEOCODE_ADMIN_BOUNDS: GeoBounds = GeoBounds {
    lat_min: 1.16,
    lat_max: 1.48,
    lon_min: 103.59,
    lon_max: 104.04,
    center_lat: 1.3521,
    center_lon: 103.8198,
};

impl GeoBounds {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&latitude)
            && (self.lon_min..=self.lon_max).contains(&longitude)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_lat, self.center_lon)
    }

    /// Count how many of the given points fall inside the box
    pub fn count_within<I>(&self, points: I) -> usize
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points
            .into_iter()
            .filter(|&(lat, lon)| self.contains(lat, lon))
            .count()
    }
}

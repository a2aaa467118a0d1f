//! Geographic point and bounding box types.

use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
///
/// Scene metadata lists positions as latitude first; GeoJSON output wants
/// longitude first, see [`LatLon::to_lon_lat`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// GeoJSON coordinate pair.
    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// Arithmetic mean of two positions.
    pub fn midpoint(&self, other: &LatLon) -> LatLon {
        LatLon {
            lat: (self.lat + other.lat) / 2.0,
            lon: (self.lon + other.lon) / 2.0,
        }
    }

    /// Component-wise minimum. The result need not be either input.
    pub fn component_min(&self, other: &LatLon) -> LatLon {
        LatLon {
            lat: self.lat.min(other.lat),
            lon: self.lon.min(other.lon),
        }
    }

    /// Component-wise maximum. The result need not be either input.
    pub fn component_max(&self, other: &LatLon) -> LatLon {
        LatLon {
            lat: self.lat.max(other.lat),
            lon: self.lon.max(other.lon),
        }
    }
}

/// A geographic bounding box in degrees (west, south, east, north).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Build from lower-left and upper-right corners, taken as given.
    ///
    /// Corners are not reordered: a caller passing an eastern "lower-left"
    /// gets a box with `min_lon > max_lon`.
    pub fn from_corners(lower_left: LatLon, upper_right: LatLon) -> Self {
        Self {
            min_lon: lower_left.lon,
            min_lat: lower_left.lat,
            max_lon: upper_right.lon,
            max_lat: upper_right.lat,
        }
    }

    /// STAC/GeoJSON `bbox` array.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// Check if a point is contained within this bbox.
    pub fn contains(&self, point: &LatLon) -> bool {
        point.lon >= self.min_lon
            && point.lon <= self.max_lon
            && point.lat >= self.min_lat
            && point.lat <= self.max_lat
    }

    /// Whether west/south do not exceed east/north.
    pub fn is_ordered(&self) -> bool {
        self.min_lon <= self.max_lon && self.min_lat <= self.max_lat
    }
}

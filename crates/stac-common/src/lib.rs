//! Common types and utilities shared across the STAC conversion crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod listing;
pub mod time;

pub use bbox::{GeoBox, LatLon};
pub use crs::{epsg_from_utm_zone, require_utm, utm_zone};
pub use error::{StacError, StacResult};
pub use listing::{last_segment, ChildListing};
pub use time::{acquisition_day, normalize_datetime};

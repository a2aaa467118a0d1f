//! UTM zone lookup and EPSG code derivation.
//!
//! Scene products are delivered in UTM; the STAC `proj:epsg` property is the
//! WGS84 / UTM code of the zone containing the scene center.

use crate::error::{StacError, StacResult};

/// Projection name carried by every supported product.
pub const UTM_PROJECTION: &str = "UTM";

/// Fail unless the metadata projection is UTM.
pub fn require_utm(projection_name: &str) -> StacResult<()> {
    if projection_name.trim().eq_ignore_ascii_case(UTM_PROJECTION) {
        Ok(())
    } else {
        Err(StacError::UnsupportedProjection(projection_name.to_string()))
    }
}

/// Signed UTM zone for a position: positive north of the equator, negative south.
///
/// Includes the Norway (32V) and Svalbard (31X-37X) exceptions.
pub fn utm_zone(lat: f64, lon: f64) -> i32 {
    let zone = zone_number(lat, lon);
    if lat < 0.0 {
        -zone
    } else {
        zone
    }
}

fn zone_number(lat: f64, lon: f64) -> i32 {
    // Normalize to [-180, 180)
    let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;

    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }

    if (72.0..=84.0).contains(&lat) && lon >= 0.0 {
        if lon < 9.0 {
            return 31;
        } else if lon < 21.0 {
            return 33;
        } else if lon < 33.0 {
            return 35;
        } else if lon < 42.0 {
            return 37;
        }
    }

    (((lon + 180.0) / 6.0).floor() as i32 % 60) + 1
}

/// EPSG code for a signed UTM zone: 326xx north, 327xx south.
pub fn epsg_from_utm_zone(zone: i32) -> u32 {
    if zone > 0 {
        32600 + zone as u32
    } else {
        32700 + zone.unsigned_abs()
    }
}

//! Geometric and orbital values derived from a parsed record.

use serde::{Deserialize, Serialize};

use stac_common::{epsg_from_utm_zone, require_utm, utm_zone, StacResult};

use crate::record::{NormalizedMetadataRecord, Optics, SunPosition};

/// Direction of the satellite pass over the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbitState {
    Ascending,
    Descending,
}

impl OrbitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrbitState::Ascending => "ascending",
            OrbitState::Descending => "descending",
        }
    }
}

/// Descending when the orbital velocity Z component is negative.
pub fn orbit_state(velocity_z: f64) -> OrbitState {
    if velocity_z < 0.0 {
        OrbitState::Descending
    } else {
        OrbitState::Ascending
    }
}

/// EPSG code of the UTM zone containing the scene center.
pub fn derive_epsg(record: &NormalizedMetadataRecord) -> StacResult<u32> {
    require_utm(&record.projection_name)?;
    let center = record.corners.center;
    Ok(epsg_from_utm_zone(utm_zone(center.lat, center.lon)))
}

/// Merge the right optic into the record when both optics are present.
///
/// The result covers both footprints but is not their exact union:
/// - center and sun position are the left/right means
/// - UR latitude and longitude are maximized independently
/// - LR comes from the right optic
/// - the bounding box takes the component-wise min of LL and max of UR
///
/// No-op for single-optic or already fused records.
pub fn fuse_optics(record: &mut NormalizedMetadataRecord) {
    let right = match record.optics {
        Optics::Dual { right } => right,
        _ => return,
    };

    let corners = &mut record.corners;
    corners.center = corners.center.midpoint(&right.center);
    corners.ur = corners.ur.component_max(&right.ur);
    corners.lr = right.lr;

    record.sun = SunPosition {
        azimuth: (record.sun.azimuth + right.sun.azimuth) / 2.0,
        elevation: (record.sun.elevation + right.sun.elevation) / 2.0,
    };

    record.bbox_ll = record.bbox_ll.component_min(&right.bbox_ll);
    record.bbox_ur = record.bbox_ur.component_max(&right.bbox_ur);
    record.optics = Optics::Fused;
}

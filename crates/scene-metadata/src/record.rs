//! Normalized scene metadata record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use stac_common::{GeoBox, LatLon, StacError};

/// Satellite program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mission {
    Cbers,
    Amazonia,
}

impl Mission {
    /// Upper-case name as used in filenames and ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mission::Cbers => "CBERS",
            Mission::Amazonia => "AMAZONIA",
        }
    }

    /// Lower-case name, the prefix of mission-specific STAC properties.
    pub fn property_prefix(&self) -> &'static str {
        match self {
            Mission::Cbers => "cbers",
            Mission::Amazonia => "amazonia",
        }
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mission {
    type Err = StacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CBERS" => Ok(Mission::Cbers),
            "AMAZONIA" => Ok(Mission::Amazonia),
            other => Err(StacError::UnknownMission(other.to_string())),
        }
    }
}

/// One head of a split-optics camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OpticSide {
    Left,
    Right,
}

impl OpticSide {
    /// Filename suffix, including the leading underscore.
    pub fn suffix(&self) -> &'static str {
        match self {
            OpticSide::Left => "_LEFT",
            OpticSide::Right => "_RIGHT",
        }
    }
}

/// The four scene corners plus center, as delivered in `imageData`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneCorners {
    pub ul: LatLon,
    pub ur: LatLon,
    pub lr: LatLon,
    pub ll: LatLon,
    pub center: LatLon,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunPosition {
    pub azimuth: f64,
    pub elevation: f64,
}

/// An available spectral band and its optional radiometric gain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandInfo {
    pub id: String,
    pub gain: Option<f64>,
}

/// Values read from the right camera of a split-optics document.
///
/// Only what the fusion step consumes is kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RightOptic {
    pub ur: LatLon,
    pub lr: LatLon,
    pub center: LatLon,
    pub sun: SunPosition,
    pub bbox_ll: LatLon,
    pub bbox_ur: LatLon,
}

/// Camera optics layout, resolved once at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Optics {
    /// One camera head. `side` is set when the product belongs to one head
    /// of a split camera and its files carry the `_LEFT`/`_RIGHT` suffix.
    Single { side: Option<OpticSide> },
    /// Both heads present; record fields hold the left head until fused.
    Dual { right: RightOptic },
    /// Both heads present and already merged.
    Fused,
}

/// Identifiers and storage fragments derived from the scene keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneIds {
    /// `CBERS_4_MUX_20170528_090_084`
    pub no_level_id: String,
    /// `CBERS_4_MUX_20170528_090_084_L2`
    pub item_id: String,
    /// `CBERS4/MUX/090/084/CBERS_4_MUX_20170528_090_084_L2`
    pub download_url: String,
    /// `CBERS4/MUX`
    pub sat_sensor: String,
    /// `CBERS4`
    pub sat_number: String,
}

/// Flat, normalized view of one scene's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetadataRecord {
    pub mission: Mission,
    /// Mission number/variant: "4", "4A", "1"
    pub number: String,
    pub sensor: String,
    pub path: u32,
    pub row: u32,
    pub processing_level: String,
    /// Acquisition day from the filename, `YYYYMMDD`
    pub acquisition_day: String,
    /// Scene center timestamp as delivered, microseconds optional
    pub acquisition_time: String,
    pub corners: SceneCorners,
    pub bbox_ll: LatLon,
    pub bbox_ur: LatLon,
    pub sun: SunPosition,
    pub roll: f64,
    /// Z component of the orbital velocity; only its sign is used
    pub velocity_z: f64,
    pub projection_name: String,
    pub bands: Vec<BandInfo>,
    pub optics: Optics,
    pub metadata_filename: String,
    pub ids: SceneIds,
}

impl NormalizedMetadataRecord {
    /// STAC collection id, e.g. `CBERS4-MUX`.
    pub fn collection_id(&self) -> String {
        format!("{}{}-{}", self.mission, self.number, self.sensor)
    }

    /// `L2`, `L4`, ...
    pub fn data_type(&self) -> String {
        format!("L{}", self.processing_level)
    }

    /// Platform label, e.g. `CBERS-4A`.
    pub fn platform(&self) -> String {
        format!("{}-{}", self.mission, self.number)
    }

    /// `_LEFT`/`_RIGHT` for single-head products of a split camera.
    pub fn optics_suffix(&self) -> &'static str {
        match self.optics {
            Optics::Single { side: Some(side) } => side.suffix(),
            _ => "",
        }
    }

    /// Whether the record still holds unfused dual-optics values.
    pub fn needs_fusion(&self) -> bool {
        matches!(self.optics, Optics::Dual { .. })
    }

    /// Bounding box from the LL/UR bounding-box corners.
    pub fn bounding_box(&self) -> GeoBox {
        GeoBox::from_corners(self.bbox_ll, self.bbox_ur)
    }

    /// Cloud-optimized GeoTIFF filename for a band.
    pub fn band_filename(&self, band: &str) -> String {
        format!("{}{}_BAND{}.tif", self.ids.item_id, self.optics_suffix(), band)
    }

    /// Thumbnail filename for a given extension.
    pub fn thumbnail_filename(&self, extension: &str) -> String {
        format!("{}{}.{}", self.ids.item_id, self.optics_suffix(), extension)
    }
}

//! INPE metadata document parser.
//!
//! A document is a `prdf` root holding `satellite`, `image` and
//! `ephemerides` sections. Split-optics products wrap those sections in
//! `leftCamera` and `rightCamera` nodes instead.

use tracing::debug;

use stac_common::{LatLon, StacError, StacResult};

use crate::filename::{parse_filename, FilenameKeys};
use crate::record::{
    BandInfo, Mission, NormalizedMetadataRecord, OpticSide, Optics, RightOptic, SceneCorners,
    SunPosition,
};
use crate::xml::XmlElement;

/// Everything read from one camera node.
#[derive(Debug, Clone)]
struct CameraMetadata {
    mission: Mission,
    number: String,
    instrument: String,
    level: String,
    acquisition_time: String,
    corners: SceneCorners,
    bbox_ll: LatLon,
    bbox_ur: LatLon,
    sun: SunPosition,
    roll: f64,
    velocity_z: f64,
    projection_name: String,
    bands: Vec<BandInfo>,
}

/// Parse a metadata document into a normalized record.
///
/// `filename` must follow the scene naming convention; it supplies the
/// scene keys (date, path, row) and must agree with the document on
/// mission, number, instrument and level.
pub fn parse_metadata(xml: &str, filename: &str) -> StacResult<NormalizedMetadataRecord> {
    let keys = parse_filename(filename)?;
    let root = XmlElement::parse(xml)?;

    let (camera, optics) = match (root.child("leftCamera"), root.child("rightCamera")) {
        (Some(left), Some(right)) => {
            if let Some(side) = keys.optics {
                return Err(StacError::MalformedMetadata(format!(
                    "filename names the {:?} optic but the document carries both cameras",
                    side
                )));
            }
            let left = read_camera(left)?;
            let right = read_camera(right)?;
            let side_channel = RightOptic {
                ur: right.corners.ur,
                lr: right.corners.lr,
                center: right.corners.center,
                sun: right.sun,
                bbox_ll: right.bbox_ll,
                bbox_ur: right.bbox_ur,
            };
            (left, Optics::Dual { right: side_channel })
        }
        (Some(left), None) => (read_camera(left)?, single_side(&keys, OpticSide::Left)?),
        (None, Some(right)) => (read_camera(right)?, single_side(&keys, OpticSide::Right)?),
        (None, None) => (read_camera(&root)?, Optics::Single { side: keys.optics }),
    };

    check_consistency(&camera, &keys)?;

    let ids = keys.scene_ids();
    debug!(item_id = %ids.item_id, optics = ?optics, "Parsed scene metadata");

    let metadata_filename = std::path::Path::new(filename)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string();

    Ok(NormalizedMetadataRecord {
        mission: camera.mission,
        number: camera.number,
        sensor: camera.instrument,
        path: keys.path,
        row: keys.row,
        processing_level: keys.level.clone(),
        acquisition_day: keys.date.clone(),
        acquisition_time: camera.acquisition_time,
        corners: camera.corners,
        bbox_ll: camera.bbox_ll,
        bbox_ur: camera.bbox_ur,
        sun: camera.sun,
        roll: camera.roll,
        velocity_z: camera.velocity_z,
        projection_name: camera.projection_name,
        bands: camera.bands,
        optics,
        metadata_filename,
        ids,
    })
}

/// A single camera node must match the side named in the filename, if any.
fn single_side(keys: &FilenameKeys, node_side: OpticSide) -> StacResult<Optics> {
    match keys.optics {
        Some(side) if side != node_side => Err(StacError::MalformedMetadata(format!(
            "filename names the {:?} optic but the document carries the {:?} camera",
            side, node_side
        ))),
        _ => Ok(Optics::Single {
            side: Some(node_side),
        }),
    }
}

fn read_camera(node: &XmlElement) -> StacResult<CameraMetadata> {
    let mission = text_at(node, "satellite/name")?
        .parse::<Mission>()
        .map_err(|e| StacError::MalformedMetadata(e.to_string()))?;

    let corners = SceneCorners {
        ul: position_at(node, "image/imageData/UL")?,
        ur: position_at(node, "image/imageData/UR")?,
        lr: position_at(node, "image/imageData/LR")?,
        ll: position_at(node, "image/imageData/LL")?,
        center: position_at(node, "image/imageData/CT")?,
    };

    let sun = SunPosition {
        azimuth: number_at(node, "image/sunPosition/sunAzimuth")?,
        elevation: number_at(node, "image/sunPosition/elevation")?,
    };

    Ok(CameraMetadata {
        mission,
        number: text_at(node, "satellite/number")?,
        instrument: text_at(node, "satellite/instrument")?,
        level: text_at(node, "image/level")?,
        acquisition_time: text_at(node, "image/timeStamp/center")?,
        corners,
        bbox_ll: position_at(node, "image/boundingBox/LL")?,
        bbox_ur: position_at(node, "image/boundingBox/UR")?,
        sun,
        roll: number_at(node, "image/offNadirAngle")?,
        velocity_z: number_at(node, "ephemerides/ephemeris/vz")?,
        projection_name: text_at(node, "image/projectionName")?,
        bands: read_bands(node)?,
    })
}

fn read_bands(node: &XmlElement) -> StacResult<Vec<BandInfo>> {
    let list = required(node, "image/availableBands")?;

    let mut bands = Vec::new();
    for band in list.children_named("band") {
        let id = band.text();
        if id.is_empty() {
            return Err(StacError::MalformedMetadata(
                "empty band identifier in availableBands".to_string(),
            ));
        }

        let gain = match band.attribute("gain") {
            Some(raw) => Some(finite_number(raw, &format!("gain of band {}", id))?),
            None => None,
        };

        bands.push(BandInfo {
            id: id.to_string(),
            gain,
        });
    }

    if bands.is_empty() {
        return Err(StacError::MalformedMetadata(
            "availableBands lists no band".to_string(),
        ));
    }

    Ok(bands)
}

fn check_consistency(camera: &CameraMetadata, keys: &FilenameKeys) -> StacResult<()> {
    let checks = [
        ("mission", camera.mission.as_str(), keys.mission.as_str()),
        ("number", camera.number.as_str(), keys.number.as_str()),
        ("instrument", camera.instrument.as_str(), keys.camera.as_str()),
        ("level", camera.level.as_str(), keys.level.as_str()),
    ];

    for (field, document, filename) in checks {
        if !document.eq_ignore_ascii_case(filename) {
            return Err(StacError::MalformedMetadata(format!(
                "{} '{}' in document does not match '{}' in filename",
                field, document, filename
            )));
        }
    }
    Ok(())
}

fn required<'a>(node: &'a XmlElement, path: &str) -> StacResult<&'a XmlElement> {
    node.find(path).ok_or_else(|| {
        StacError::MalformedMetadata(format!("missing node {}/{}", node.name, path))
    })
}

fn text_at(node: &XmlElement, path: &str) -> StacResult<String> {
    let text = required(node, path)?.text();
    if text.is_empty() {
        return Err(StacError::MalformedMetadata(format!(
            "empty node {}/{}",
            node.name, path
        )));
    }
    Ok(text.to_string())
}

fn number_at(node: &XmlElement, path: &str) -> StacResult<f64> {
    let text = text_at(node, path)?;
    finite_number(&text, &format!("node {}/{}", node.name, path))
}

/// `NaN` and infinities parse as `f64` but have no place in a footprint.
fn finite_number(text: &str, location: &str) -> StacResult<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(StacError::MalformedMetadata(format!(
            "{} is not a finite number: '{}'",
            location, text
        ))),
    }
}

fn position_at(node: &XmlElement, path: &str) -> StacResult<LatLon> {
    Ok(LatLon::new(
        number_at(node, &format!("{}/latitude", path))?,
        number_at(node, &format!("{}/longitude", path))?,
    ))
}

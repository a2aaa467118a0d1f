//! Scene filename parsing.
//!
//! Products follow
//! `SATELLITE_MISSION_CAMERA_YYYYMMDD_PPP_RRR_Lx[_LEFT|_RIGHT]_BANDn.(tif|xml)`,
//! e.g. `CBERS_4_MUX_20170528_090_084_L2_BAND6.xml` or
//! `AMAZONIA_1_WFI_20220810_033_018_L4_LEFT_BAND2.tif`.

use std::path::Path;

use stac_common::{acquisition_day, StacError, StacResult};

use crate::record::{Mission, OpticSide, SceneIds};

/// File kind accepted by the naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileExtension {
    Tif,
    Xml,
}

impl FileExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileExtension::Tif => "tif",
            FileExtension::Xml => "xml",
        }
    }
}

/// Keys extracted from a scene filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameKeys {
    pub mission: Mission,
    pub number: String,
    pub camera: String,
    /// `YYYYMMDD`
    pub date: String,
    pub path: u32,
    pub row: u32,
    /// Level without the `L` prefix
    pub level: String,
    pub optics: Option<OpticSide>,
    pub band: String,
    pub extension: FileExtension,
}

impl FilenameKeys {
    /// `CBERS_4_MUX_20170528_090_084`
    pub fn no_level_id(&self) -> String {
        format!(
            "{}_{}_{}_{}_{:03}_{:03}",
            self.mission, self.number, self.camera, self.date, self.path, self.row
        )
    }

    /// `CBERS_4_MUX_20170528_090_084_L2`
    pub fn item_id(&self) -> String {
        format!("{}_L{}", self.no_level_id(), self.level)
    }

    /// Derived identifiers and storage fragments for this scene.
    pub fn scene_ids(&self) -> SceneIds {
        let item_id = self.item_id();
        let sat_number = format!("{}{}", self.mission, self.number);
        let sat_sensor = format!("{}/{}", sat_number, self.camera);
        SceneIds {
            no_level_id: self.no_level_id(),
            download_url: format!("{}/{:03}/{:03}/{}", sat_sensor, self.path, self.row, item_id),
            item_id,
            sat_sensor,
            sat_number,
        }
    }

    /// Metadata filename for the given optics side.
    pub fn metadata_filename(&self, optics: Option<OpticSide>) -> String {
        format!(
            "{}{}_BAND{}.xml",
            self.item_id(),
            optics.map(|o| o.suffix()).unwrap_or(""),
            self.band
        )
    }

    /// Whether this camera may be delivered as split left/right optics.
    pub fn has_split_optics(&self) -> bool {
        self.mission == Mission::Amazonia && self.camera == "WFI"
    }
}

/// Parse a scene filename (directory components are ignored).
pub fn parse_filename(file_path: &str) -> StacResult<FilenameKeys> {
    let pattern_error = || StacError::FilenamePattern(file_path.to_string());

    let filename = Path::new(file_path)
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(pattern_error)?;

    let (stem, extension) = filename.rsplit_once('.').ok_or_else(pattern_error)?;
    let extension = match extension {
        "tif" => FileExtension::Tif,
        "xml" => FileExtension::Xml,
        _ => return Err(pattern_error()),
    };

    let parts: Vec<&str> = stem.split('_').collect();
    let (optics, band_part) = match parts.len() {
        8 => (None, parts[7]),
        9 => {
            let side = match parts[7] {
                "LEFT" => OpticSide::Left,
                "RIGHT" => OpticSide::Right,
                _ => return Err(pattern_error()),
            };
            (Some(side), parts[8])
        }
        _ => return Err(pattern_error()),
    };

    let mission = if is_upper_alpha(parts[0]) {
        parts[0].parse::<Mission>().map_err(|_| pattern_error())?
    } else {
        return Err(pattern_error());
    };

    let number = parts[1];
    let camera = parts[2];
    if !is_upper_alnum(number) || !is_upper_alnum(camera) {
        return Err(pattern_error());
    }

    let date = parts[3];
    acquisition_day(date).ok_or_else(pattern_error)?;

    let path = three_digits(parts[4]).ok_or_else(pattern_error)?;
    let row = three_digits(parts[5]).ok_or_else(pattern_error)?;

    // Level: a single character after `L`
    let level = parts[6]
        .strip_prefix('L')
        .filter(|l| l.len() == 1 && l.chars().all(|c| c.is_ascii_alphanumeric()))
        .ok_or_else(pattern_error)?;

    let band = band_part
        .strip_prefix("BAND")
        .filter(|b| !b.is_empty() && b.chars().all(|c| c.is_ascii_digit()))
        .ok_or_else(pattern_error)?;

    Ok(FilenameKeys {
        mission,
        number: number.to_string(),
        camera: camera.to_string(),
        date: date.to_string(),
        path,
        row,
        level: level.to_string(),
        optics,
        band: band.to_string(),
        extension,
    })
}

/// Metadata filenames worth trying for a scene, in order.
///
/// AMAZONIA WFI products may be delivered per optic head, so a key without
/// a side expands to the plain name followed by the `_LEFT` and `_RIGHT`
/// variants. Fetching them is left to the caller.
pub fn metadata_candidates(keys: &FilenameKeys) -> Vec<String> {
    if keys.optics.is_none() && keys.has_split_optics() {
        vec![
            keys.metadata_filename(None),
            keys.metadata_filename(Some(OpticSide::Left)),
            keys.metadata_filename(Some(OpticSide::Right)),
        ]
    } else {
        vec![keys.metadata_filename(keys.optics)]
    }
}

fn three_digits(s: &str) -> Option<u32> {
    if s.len() == 3 && s.chars().all(|c| c.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

fn is_upper_alpha(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_uppercase())
}

fn is_upper_alnum(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

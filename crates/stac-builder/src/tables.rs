//! Static per-mission, per-camera tables.
//!
//! Band names, common names and resolutions, international designators,
//! thumbnail formats and launch dates. The builders take a
//! [`MissionTables`] by reference; nothing here is global.
//!
//! Tables are either the compiled-in [`MissionTables::builtin`] set or
//! loaded from YAML, e.g. `config/missions.yaml`:
//!
//! ```yaml
//! license: CC-BY-SA-3.0
//! catalog_id: CBERS-AMAZONIA
//! catalog_description: ...
//! providers: [...]
//! missions:
//!   - mission: CBERS
//!     number: "4"
//!     international_designator: 2014-079A
//!     launch_date: "2014-12-07"
//!     description: ...
//!     thumbnail: { extension: jpg, media_type: image/jpeg }
//!     cameras:
//!       - name: MUX
//!         description: ...
//!         bands:
//!           - { id: "5", common_name: blue, gsd: 20.0 }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use scene_metadata::Mission;
use stac_common::{StacError, StacResult};
use stac_protocol::{media_types, Provider};

/// Everything the item and catalog builders need to know about the missions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionTables {
    pub license: String,
    pub catalog_id: String,
    pub catalog_description: String,
    #[serde(default)]
    pub providers: Vec<Provider>,
    pub missions: Vec<MissionSpec>,
}

/// One satellite, e.g. CBERS-4A.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionSpec {
    pub mission: Mission,
    /// "4", "4A", "1"
    pub number: String,
    pub international_designator: String,
    /// `YYYY-MM-DD`
    pub launch_date: String,
    pub description: String,
    pub thumbnail: ThumbnailFormat,
    pub cameras: Vec<CameraSpec>,
}

/// Image format of the browse thumbnail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThumbnailFormat {
    pub extension: String,
    pub media_type: String,
}

impl ThumbnailFormat {
    pub fn jpeg() -> Self {
        Self {
            extension: "jpg".to_string(),
            media_type: media_types::JPEG.to_string(),
        }
    }

    pub fn png() -> Self {
        Self {
            extension: "png".to_string(),
            media_type: media_types::PNG.to_string(),
        }
    }
}

/// One camera of a mission; becomes a STAC Collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraSpec {
    pub name: String,
    pub description: String,
    pub bands: Vec<BandSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BandSpec {
    /// Band number as it appears in filenames, without the `BAND` prefix.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// Ground sample distance in meters
    pub gsd: f64,
}

impl BandSpec {
    /// Asset key and `eo:bands` name, e.g. `B5`.
    pub fn name(&self) -> String {
        format!("B{}", self.id)
    }
}

impl CameraSpec {
    pub fn band(&self, id: &str) -> Option<&BandSpec> {
        self.bands.iter().find(|b| b.id == id)
    }

    /// Collection-level gsd: the finest band resolution of the camera.
    pub fn gsd(&self) -> f64 {
        self.bands
            .iter()
            .map(|b| b.gsd)
            .fold(f64::INFINITY, f64::min)
    }
}

impl MissionSpec {
    /// `CBERS4A`
    pub fn sat_number(&self) -> String {
        format!("{}{}", self.mission, self.number)
    }

    /// `CBERS-4A`
    pub fn platform(&self) -> String {
        format!("{}-{}", self.mission, self.number)
    }

    /// `CBERS4A-WPM`
    pub fn collection_id(&self, camera: &str) -> String {
        format!("{}-{}", self.sat_number(), camera)
    }

    pub fn camera(&self, name: &str) -> Option<&CameraSpec> {
        self.cameras.iter().find(|c| c.name == name)
    }

    /// Start of the temporal extent, midnight UTC on launch day.
    pub fn launch_datetime(&self) -> String {
        format!("{}T00:00:00Z", self.launch_date)
    }
}

impl MissionTables {
    /// Look up a mission by name and number.
    pub fn mission(&self, mission: Mission, number: &str) -> StacResult<&MissionSpec> {
        self.missions
            .iter()
            .find(|m| m.mission == mission && m.number.eq_ignore_ascii_case(number))
            .ok_or_else(|| StacError::UnknownMission(format!("{}{}", mission, number)))
    }

    /// Look up a camera of a mission.
    pub fn camera(
        &self,
        mission: Mission,
        number: &str,
        camera: &str,
    ) -> StacResult<(&MissionSpec, &CameraSpec)> {
        let spec = self.mission(mission, number)?;
        let camera_spec = spec.camera(camera).ok_or_else(|| {
            StacError::UnknownMission(format!("{}{}-{}", mission, number, camera))
        })?;
        Ok((spec, camera_spec))
    }

    /// Parse and validate tables from YAML text.
    pub fn from_yaml_str(yaml: &str) -> StacResult<Self> {
        let tables: MissionTables = serde_yaml::from_str(yaml)
            .map_err(|e| StacError::InvalidTables(format!("invalid YAML: {}", e)))?;
        tables.validate()?;
        Ok(tables)
    }

    /// Read, parse and validate a YAML tables file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> StacResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| StacError::InvalidTables(format!("cannot read {:?}: {}", path, e)))?;
        let tables = Self::from_yaml_str(&contents)?;
        debug!(path = ?path, missions = tables.missions.len(), "Loaded mission tables");
        Ok(tables)
    }

    /// Check structural consistency.
    pub fn validate(&self) -> StacResult<()> {
        let invalid = |msg: String| Err(StacError::InvalidTables(msg));

        if self.missions.is_empty() {
            return invalid("no missions defined".to_string());
        }
        if self.catalog_id.is_empty() {
            return invalid("catalog_id is empty".to_string());
        }

        let mut seen_missions = HashSet::new();
        for mission in &self.missions {
            let label = mission.sat_number();
            if !seen_missions.insert(label.clone()) {
                return invalid(format!("{} defined twice", label));
            }
            if NaiveDate::parse_from_str(&mission.launch_date, "%Y-%m-%d").is_err() {
                return invalid(format!(
                    "{}: launch_date '{}' is not YYYY-MM-DD",
                    label, mission.launch_date
                ));
            }
            if mission.thumbnail.extension.is_empty() {
                return invalid(format!("{}: empty thumbnail extension", label));
            }
            if mission.cameras.is_empty() {
                return invalid(format!("{}: no cameras", label));
            }

            let mut seen_cameras = HashSet::new();
            for camera in &mission.cameras {
                let collection = mission.collection_id(&camera.name);
                if !seen_cameras.insert(camera.name.as_str()) {
                    return invalid(format!("{} defined twice", collection));
                }
                if camera.bands.is_empty() {
                    return invalid(format!("{}: no bands", collection));
                }

                let mut seen_bands = HashSet::new();
                for band in &camera.bands {
                    if !seen_bands.insert(band.id.as_str()) {
                        return invalid(format!("{}: band {} defined twice", collection, band.id));
                    }
                    if !band.gsd.is_finite() || band.gsd <= 0.0 {
                        return invalid(format!(
                            "{}: band {} gsd {} is not positive",
                            collection, band.id, band.gsd
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Compiled-in tables for CBERS-4, CBERS-4A and AMAZONIA-1.
    pub fn builtin() -> Self {
        Self {
            license: "CC-BY-SA-3.0".to_string(),
            catalog_id: "CBERS-AMAZONIA".to_string(),
            catalog_description: "Catalog of CBERS-4, CBERS-4A and AMAZONIA-1 imagery".to_string(),
            providers: vec![
                Provider::new("Instituto Nacional de Pesquisas Espaciais, INPE")
                    .with_roles(&["producer", "licensor"])
                    .with_url("http://www.cbers.inpe.br"),
                Provider::new("AMS Kepler")
                    .with_roles(&["processor"])
                    .with_description("Convert INPE's original TIFF to COG and copy to Amazon Web Services")
                    .with_url("https://github.com/fredliporace/cbers-2-stac"),
                Provider::new("Amazon Web Services")
                    .with_roles(&["host"])
                    .with_url("https://registry.opendata.aws/cbers/"),
            ],
            missions: vec![
                MissionSpec {
                    mission: Mission::Cbers,
                    number: "4".to_string(),
                    international_designator: "2014-079A".to_string(),
                    launch_date: "2014-12-07".to_string(),
                    description: "China-Brazil Earth Resources Satellite 4".to_string(),
                    thumbnail: ThumbnailFormat::jpeg(),
                    cameras: vec![
                        camera("MUX", "Multispectral Camera", &[("5", "blue", 20.0), ("6", "green", 20.0), ("7", "red", 20.0), ("8", "nir", 20.0)]),
                        camera("AWFI", "Advanced Wide Field Imager", &[("13", "blue", 64.0), ("14", "green", 64.0), ("15", "red", 64.0), ("16", "nir", 64.0)]),
                        camera("PAN5M", "Panchromatic Camera, 5m panchromatic band", &[("1", "pan", 5.0)]),
                        camera("PAN10M", "Panchromatic Camera, 10m multispectral bands", &[("2", "green", 10.0), ("3", "red", 10.0), ("4", "nir", 10.0)]),
                    ],
                },
                MissionSpec {
                    mission: Mission::Cbers,
                    number: "4A".to_string(),
                    international_designator: "2019-093E".to_string(),
                    launch_date: "2019-12-20".to_string(),
                    description: "China-Brazil Earth Resources Satellite 4A".to_string(),
                    thumbnail: ThumbnailFormat::png(),
                    cameras: vec![
                        camera("MUX", "Multispectral Camera", &[("5", "blue", 16.5), ("6", "green", 16.5), ("7", "red", 16.5), ("8", "nir", 16.5)]),
                        camera("WFI", "Wide Field Imager", &[("13", "blue", 55.0), ("14", "green", 55.0), ("15", "red", 55.0), ("16", "nir", 55.0)]),
                        camera("WPM", "Wide Scan Multispectral and Panchromatic Camera", &[("0", "pan", 2.0), ("1", "blue", 8.0), ("2", "green", 8.0), ("3", "red", 8.0), ("4", "nir", 8.0)]),
                    ],
                },
                MissionSpec {
                    mission: Mission::Amazonia,
                    number: "1".to_string(),
                    international_designator: "2021-015A".to_string(),
                    launch_date: "2021-02-28".to_string(),
                    description: "AMAZONIA-1 Earth observation satellite".to_string(),
                    thumbnail: ThumbnailFormat::png(),
                    cameras: vec![
                        camera("WFI", "Wide Field Imager", &[("1", "blue", 64.0), ("2", "green", 64.0), ("3", "red", 64.0), ("4", "nir", 64.0)]),
                    ],
                },
            ],
        }
    }
}

fn camera(name: &str, description: &str, bands: &[(&str, &str, f64)]) -> CameraSpec {
    CameraSpec {
        name: name.to_string(),
        description: description.to_string(),
        bands: bands
            .iter()
            .map(|(id, common_name, gsd)| BandSpec {
                id: id.to_string(),
                common_name: Some(common_name.to_string()),
                gsd: *gsd,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        MissionTables::builtin().validate().unwrap();
    }

    #[test]
    fn test_camera_lookup() {
        let tables = MissionTables::builtin();
        let (mission, camera) = tables.camera(Mission::Cbers, "4A", "WPM").unwrap();
        assert_eq!(mission.international_designator, "2019-093E");
        assert_eq!(camera.gsd(), 2.0);
        assert_eq!(camera.band("3").unwrap().gsd, 8.0);
        assert_eq!(camera.band("3").unwrap().name(), "B3");
        assert!(camera.band("9").is_none());
    }

    #[test]
    fn test_number_lookup_is_case_insensitive() {
        let tables = MissionTables::builtin();
        assert!(tables.mission(Mission::Cbers, "4a").is_ok());
    }

    #[test]
    fn test_unknown_mission_and_camera() {
        let tables = MissionTables::builtin();
        assert!(matches!(
            tables.mission(Mission::Cbers, "5"),
            Err(StacError::UnknownMission(m)) if m == "CBERS5"
        ));
        assert!(matches!(
            tables.camera(Mission::Amazonia, "1", "MUX"),
            Err(StacError::UnknownMission(m)) if m == "AMAZONIA1-MUX"
        ));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_bad_gsd() {
        let mut tables = MissionTables::builtin();
        tables.missions[0].cameras[0].bands[0].gsd = 0.0;
        assert!(matches!(tables.validate(), Err(StacError::InvalidTables(_))));

        let mut tables = MissionTables::builtin();
        let copy = tables.missions[1].clone();
        tables.missions.push(copy);
        assert!(matches!(tables.validate(), Err(StacError::InvalidTables(_))));

        let mut tables = MissionTables::builtin();
        tables.missions[2].cameras[0].bands.clear();
        assert!(matches!(tables.validate(), Err(StacError::InvalidTables(_))));

        let mut tables = MissionTables::builtin();
        tables.missions[0].launch_date = "07/12/2014".to_string();
        assert!(matches!(tables.validate(), Err(StacError::InvalidTables(_))));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let tables = MissionTables::builtin();
        let yaml = serde_yaml::to_string(&tables).unwrap();
        let parsed = MissionTables::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, tables);
    }

    #[test]
    fn test_yaml_errors() {
        assert!(matches!(
            MissionTables::from_yaml_str("missions: [unclosed"),
            Err(StacError::InvalidTables(_))
        ));
        assert!(matches!(
            MissionTables::from_yaml_str("license: x\ncatalog_id: y\ncatalog_description: z\nmissions: []\n"),
            Err(StacError::InvalidTables(_))
        ));
    }
}

//! STAC Item: a GeoJSON Feature describing one scene.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::Link;

/// GeoJSON geometry. Scene footprints are always polygons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon {
        /// Linear rings of [longitude, latitude] pairs; the first is exterior.
        coordinates: Vec<Vec<[f64; 2]>>,
    },
}

impl Geometry {
    /// Polygon with a single exterior ring, closed if the caller did not.
    pub fn polygon(mut ring: Vec<[f64; 2]>) -> Self {
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if first != last {
                ring.push(first);
            }
        }
        Geometry::Polygon {
            coordinates: vec![ring],
        }
    }

    /// The exterior ring.
    pub fn exterior(&self) -> &[[f64; 2]] {
        match self {
            Geometry::Polygon { coordinates } => {
                coordinates.first().map(|r| r.as_slice()).unwrap_or(&[])
            }
        }
    }
}

/// Electro-optical band description (`eo:bands` entry).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EoBand {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
}

impl EoBand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            common_name: None,
        }
    }

    pub fn with_common_name(mut self, common_name: impl Into<String>) -> Self {
        self.common_name = Some(common_name.into());
        self
    }
}

/// A file belonging to an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub href: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    #[serde(rename = "eo:bands", skip_serializing_if = "Option::is_none")]
    pub eo_bands: Option<Vec<EoBand>>,

    /// Only set when it differs from the item-level gsd.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gsd: Option<f64>,
}

impl Asset {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            type_: None,
            title: None,
            roles: Vec::new(),
            eo_bands: None,
            gsd: None,
        }
    }

    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_eo_bands(mut self, bands: Vec<EoBand>) -> Self {
        self.eo_bands = Some(bands);
        self
    }

    pub fn with_gsd(mut self, gsd: f64) -> Self {
        self.gsd = Some(gsd);
        self
    }
}

/// Item properties with the extension fields this workspace emits.
///
/// Mission-specific keys (`cbers:path`, `amazonia:row`, ...) go to
/// `extra`, flattened after the typed fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemProperties {
    /// `YYYY-MM-DDTHH:MM:SSZ`
    pub datetime: String,

    pub platform: String,

    pub instruments: Vec<String>,

    pub gsd: f64,

    #[serde(rename = "view:sun_azimuth")]
    pub sun_azimuth: f64,

    #[serde(rename = "view:sun_elevation")]
    pub sun_elevation: f64,

    #[serde(rename = "view:off_nadir")]
    pub off_nadir: f64,

    #[serde(rename = "proj:epsg")]
    pub epsg: u32,

    #[serde(rename = "sat:platform_international_designator")]
    pub international_designator: String,

    /// "ascending" or "descending"
    #[serde(rename = "sat:orbit_state")]
    pub orbit_state: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A STAC Item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StacItem {
    pub stac_version: String,

    pub stac_extensions: Vec<String>,

    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    pub id: String,

    pub collection: String,

    pub geometry: Geometry,

    /// [min-lon, min-lat, max-lon, max-lat]
    pub bbox: Vec<f64>,

    pub properties: ItemProperties,

    pub assets: BTreeMap<String, Asset>,

    pub links: Vec<Link>,
}

impl StacItem {
    /// Create an item pinned to the current STAC version with the standard
    /// extension list and no assets or links.
    pub fn new(
        id: impl Into<String>,
        collection: impl Into<String>,
        geometry: Geometry,
        bbox: [f64; 4],
        properties: ItemProperties,
    ) -> Self {
        Self {
            stac_version: crate::STAC_VERSION.to_string(),
            stac_extensions: crate::extensions::ITEM
                .iter()
                .map(|e| e.to_string())
                .collect(),
            type_: "Feature".to_string(),
            id: id.into(),
            collection: collection.into(),
            geometry,
            bbox: bbox.to_vec(),
            properties,
            assets: BTreeMap::new(),
            links: Vec::new(),
        }
    }

    pub fn with_asset(mut self, key: impl Into<String>, asset: Asset) -> Self {
        self.assets.insert(key.into(), asset);
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// First link with the given relation.
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.rel == rel)
    }

    /// Pretty JSON with a trailing newline, as stored.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

//! Static catalog tree composition.
//!
//! The tree mirrors the object-store layout:
//!
//! ```text
//! catalog.json                                root
//! CBERS4/catalog.json                         mission
//! CBERS4/MUX/collection.json                  camera (STAC Collection)
//! CBERS4/MUX/083/catalog.json                 path
//! CBERS4/MUX/083/095/catalog.json             path+row, links items
//! CBERS4/MUX/083/095/{item_id}.json           item
//! ```
//!
//! Every node is rebuilt from scratch: [`base_catalog_or_collection`] gives
//! the fixed part (links up the tree, collection scaffold, children known
//! from the tables) and [`compose_from_listing`] adds the children found in
//! storage.

use serde_json::json;
use std::fmt;
use tracing::{debug, warn};

use scene_metadata::Mission;
use stac_common::{last_segment, ChildListing, StacError, StacResult};
use stac_protocol::{
    extensions, media_types, rel, CatalogNode, CollectionFields, EoBand, Extent,
    ItemAssetDefinition, Link,
};

use crate::config::stac_href;
use crate::tables::{CameraSpec, MissionSpec, MissionTables};

const CATALOG_FILE: &str = "catalog.json";
const COLLECTION_FILE: &str = "collection.json";

// ============================================================================
// Node addressing
// ============================================================================

/// Position of a node in the catalog tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAddress {
    Root,
    Mission {
        mission: Mission,
        number: String,
    },
    Camera {
        mission: Mission,
        number: String,
        camera: String,
    },
    Path {
        mission: Mission,
        number: String,
        camera: String,
        path: u32,
    },
    Row {
        mission: Mission,
        number: String,
        camera: String,
        path: u32,
        row: u32,
    },
}

impl NodeAddress {
    /// Infer the node from a storage prefix such as `CBERS4/MUX/083/095`.
    ///
    /// Segments are positional: satellite (mission letters followed by the
    /// number), camera, path, row. Leading and trailing slashes are ignored.
    pub fn from_prefix(prefix: &str) -> StacResult<Self> {
        let segments: Vec<&str> = prefix.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() > 4 {
            return Err(StacError::InvalidPrefix(prefix.to_string()));
        }
        let Some(satellite) = segments.first() else {
            return Ok(NodeAddress::Root);
        };

        let split = satellite
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(|| StacError::InvalidPrefix(prefix.to_string()))?;
        let (letters, number) = satellite.split_at(split);

        Self::from_parts(
            letters,
            Some(number),
            segments.get(1).copied(),
            segments.get(2).copied(),
            segments.get(3).copied(),
        )
        .map_err(|_| StacError::InvalidPrefix(prefix.to_string()))
    }

    /// Build a node from explicit parts, e.g. `("CBERS", Some("4A"), Some("WFI"), None, None)`.
    ///
    /// Parts must be contiguous: a row without a path is rejected. The root
    /// has no parts; use [`NodeAddress::Root`].
    pub fn from_parts(
        satellite: &str,
        mission: Option<&str>,
        camera: Option<&str>,
        path: Option<&str>,
        row: Option<&str>,
    ) -> StacResult<Self> {
        let describe = || {
            [Some(satellite), mission, camera, path, row]
                .into_iter()
                .map(|p| p.unwrap_or("-"))
                .collect::<Vec<_>>()
                .join("/")
        };
        let invalid = || StacError::InvalidPrefix(describe());

        let parsed: Mission = satellite.parse().map_err(|_| invalid())?;
        let number = mission
            .filter(|n| is_label(n))
            .ok_or_else(invalid)?
            .to_uppercase();

        let address = match (camera, path, row) {
            (None, None, None) => NodeAddress::Mission {
                mission: parsed,
                number,
            },
            (Some(camera), None, None) if is_label(camera) => NodeAddress::Camera {
                mission: parsed,
                number,
                camera: camera.to_string(),
            },
            (Some(camera), Some(path), None) if is_label(camera) => NodeAddress::Path {
                mission: parsed,
                number,
                camera: camera.to_string(),
                path: three_digits(path).ok_or_else(invalid)?,
            },
            (Some(camera), Some(path), Some(row)) if is_label(camera) => NodeAddress::Row {
                mission: parsed,
                number,
                camera: camera.to_string(),
                path: three_digits(path).ok_or_else(invalid)?,
                row: three_digits(row).ok_or_else(invalid)?,
            },
            _ => return Err(invalid()),
        };
        Ok(address)
    }

    /// Depth below the camera collection: 2 for the collection, 1 for a
    /// path, 0 for a path+row leaf. `None` above the collection.
    pub fn level(&self) -> Option<u8> {
        match self {
            NodeAddress::Root | NodeAddress::Mission { .. } => None,
            NodeAddress::Camera { .. } => Some(2),
            NodeAddress::Path { .. } => Some(1),
            NodeAddress::Row { .. } => Some(0),
        }
    }

    /// Whether children come from a storage listing rather than the tables.
    pub fn reads_listing(&self) -> bool {
        self.level().is_some()
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, NodeAddress::Camera { .. })
    }

    /// Storage prefix without trailing slash; empty for the root.
    pub fn prefix(&self) -> String {
        match self {
            NodeAddress::Root => String::new(),
            NodeAddress::Mission { mission, number } => format!("{}{}", mission, number),
            NodeAddress::Camera {
                mission,
                number,
                camera,
            } => format!("{}{}/{}", mission, number, camera),
            NodeAddress::Path {
                mission,
                number,
                camera,
                path,
            } => format!("{}{}/{}/{:03}", mission, number, camera, path),
            NodeAddress::Row {
                mission,
                number,
                camera,
                path,
                row,
            } => format!("{}{}/{}/{:03}/{:03}", mission, number, camera, path, row),
        }
    }

    /// STAC id, e.g. `CBERS4-MUX-083-095`.
    pub fn id(&self, tables: &MissionTables) -> String {
        match self {
            NodeAddress::Root => tables.catalog_id.clone(),
            _ => self.prefix().replace('/', "-"),
        }
    }

    /// The node one level up.
    pub fn parent(&self) -> Option<NodeAddress> {
        match self.clone() {
            NodeAddress::Root => None,
            NodeAddress::Mission { .. } => Some(NodeAddress::Root),
            NodeAddress::Camera {
                mission, number, ..
            } => Some(NodeAddress::Mission { mission, number }),
            NodeAddress::Path {
                mission,
                number,
                camera,
                ..
            } => Some(NodeAddress::Camera {
                mission,
                number,
                camera,
            }),
            NodeAddress::Row {
                mission,
                number,
                camera,
                path,
                ..
            } => Some(NodeAddress::Path {
                mission,
                number,
                camera,
                path,
            }),
        }
    }

    /// `catalog.json` or `collection.json`.
    pub fn file_name(&self) -> &'static str {
        if self.is_collection() {
            COLLECTION_FILE
        } else {
            CATALOG_FILE
        }
    }

    fn mission_key(&self) -> Option<(Mission, &str)> {
        match self {
            NodeAddress::Root => None,
            NodeAddress::Mission { mission, number }
            | NodeAddress::Camera {
                mission, number, ..
            }
            | NodeAddress::Path {
                mission, number, ..
            }
            | NodeAddress::Row {
                mission, number, ..
            } => Some((*mission, number.as_str())),
        }
    }

    fn camera_name(&self) -> Option<&str> {
        match self {
            NodeAddress::Camera { camera, .. }
            | NodeAddress::Path { camera, .. }
            | NodeAddress::Row { camera, .. } => Some(camera.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeAddress::Root => f.write_str("<root>"),
            _ => f.write_str(&self.prefix()),
        }
    }
}

/// Object key of a node document, e.g. `CBERS4/MUX/collection.json`.
pub fn node_key(address: &NodeAddress) -> String {
    match address {
        NodeAddress::Root => CATALOG_FILE.to_string(),
        _ => format!("{}/{}", address.prefix(), address.file_name()),
    }
}

// ============================================================================
// Node composition
// ============================================================================

/// A node document together with its position in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub address: NodeAddress,
    pub document: CatalogNode,
}

/// The fixed part of a node: self/root/parent links, the collection
/// scaffold for camera nodes, and the children known from the tables for
/// the root and mission nodes.
pub fn base_catalog_or_collection(
    bucket: &str,
    address: &NodeAddress,
    tables: &MissionTables,
) -> StacResult<TreeNode> {
    let mission = address
        .mission_key()
        .map(|(mission, number)| tables.mission(mission, number))
        .transpose()?;
    let camera = match (mission, address.camera_name()) {
        (Some(spec), Some(name)) => Some(spec.camera(name).ok_or_else(|| {
            StacError::UnknownMission(spec.collection_id(name))
        })?),
        _ => None,
    };

    let id = address.id(tables);
    let mut document = match (address, mission, camera) {
        (NodeAddress::Camera { .. }, Some(mission), Some(camera)) => {
            collection_scaffold(&id, mission, camera, tables)
        }
        _ => CatalogNode::catalog(id.clone(), describe(address, mission, camera, tables)),
    };

    document.links.push(
        Link::new(stac_href(bucket, &node_key(address)), rel::SELF).with_type(media_types::JSON),
    );
    document.links.push(
        Link::new(stac_href(bucket, CATALOG_FILE), rel::ROOT).with_type(media_types::JSON),
    );
    if let Some(parent) = address.parent() {
        document.links.push(
            Link::new(format!("../{}", parent.file_name()), rel::PARENT)
                .with_type(media_types::JSON),
        );
    }

    match address {
        NodeAddress::Root => {
            let children = tables
                .missions
                .iter()
                .map(|m| child_link(format!("{}/{}", m.sat_number(), CATALOG_FILE)))
                .collect();
            document.replace_descendants(children);
        }
        NodeAddress::Mission { .. } => {
            if let Some(mission) = mission {
                let children = mission
                    .cameras
                    .iter()
                    .map(|c| child_link(format!("{}/{}", c.name, COLLECTION_FILE)))
                    .collect();
                document.replace_descendants(children);
            }
        }
        _ => {}
    }

    Ok(TreeNode {
        address: address.clone(),
        document,
    })
}

/// Add the children found in storage to a base node.
///
/// Camera and path nodes get one `child` link per sub-prefix; the path+row
/// leaf gets one `item` link per `..._L{digit}.json` file. Existing
/// child/item links are replaced, so composing twice gives the same node.
pub fn compose_from_listing(node: TreeNode, listing: &ChildListing) -> StacResult<TreeNode> {
    let TreeNode {
        address,
        mut document,
    } = node;

    if !address.reads_listing() {
        return Err(StacError::ListingNotApplicable(address.to_string()));
    }
    if listing.truncated {
        return Err(StacError::TruncatedListing(address.to_string()));
    }

    let links = match &address {
        NodeAddress::Row { .. } => listing
            .files
            .iter()
            .filter_map(|entry| {
                let name = last_segment(entry);
                if is_item_file(name) {
                    Some(Link::new(name, rel::ITEM).with_type(media_types::GEO_JSON))
                } else {
                    if name != CATALOG_FILE && name != COLLECTION_FILE {
                        warn!(node = %address, entry = %entry, "Skipping non-item file");
                    }
                    None
                }
            })
            .collect::<Vec<_>>(),
        _ => listing
            .sub_prefixes
            .iter()
            .filter_map(|entry| {
                let segment = last_segment(entry);
                if segment.is_empty() {
                    warn!(node = %address, entry = %entry, "Skipping empty sub-prefix");
                    None
                } else {
                    Some(child_link(format!("{}/{}", segment, CATALOG_FILE)))
                }
            })
            .collect::<Vec<_>>(),
    };

    document.replace_descendants(links);
    debug!(
        node = %address,
        children = document.descendants().count(),
        "Composed catalog node"
    );

    Ok(TreeNode { address, document })
}

/// Base node plus listing for a storage prefix.
///
/// Root and mission nodes take no listing. Listing-driven nodes given
/// `None` are composed with no children.
pub fn build_node_for_prefix(
    bucket: &str,
    prefix: &str,
    listing: Option<&ChildListing>,
    tables: &MissionTables,
) -> StacResult<TreeNode> {
    let address = NodeAddress::from_prefix(prefix)?;
    let base = base_catalog_or_collection(bucket, &address, tables)?;

    match listing {
        Some(listing) => compose_from_listing(base, listing),
        None if address.reads_listing() => compose_from_listing(base, &ChildListing::default()),
        None => Ok(base),
    }
}

/// Item documents end in `L{digit}.json`.
pub fn is_item_file(name: &str) -> bool {
    if name == CATALOG_FILE || name == COLLECTION_FILE {
        return false;
    }
    let Some(stem) = name.strip_suffix(".json") else {
        return false;
    };
    let mut tail = stem.chars().rev();
    matches!(
        (tail.next(), tail.next()),
        (Some(digit), Some('L')) if digit.is_ascii_digit()
    )
}

fn child_link(href: String) -> Link {
    Link::new(href, rel::CHILD).with_type(media_types::JSON)
}

fn describe(
    address: &NodeAddress,
    mission: Option<&MissionSpec>,
    camera: Option<&CameraSpec>,
    tables: &MissionTables,
) -> String {
    match (address, mission, camera) {
        (NodeAddress::Root, _, _) => tables.catalog_description.clone(),
        (NodeAddress::Mission { .. }, Some(mission), _) => {
            format!("{} catalog", mission.description)
        }
        (NodeAddress::Path { path, .. }, Some(mission), Some(camera)) => format!(
            "{} {} camera, path {:03}",
            mission.platform(),
            camera.name,
            path
        ),
        (NodeAddress::Row { path, row, .. }, Some(mission), Some(camera)) => format!(
            "{} {} camera, path {:03}, row {:03}",
            mission.platform(),
            camera.name,
            path,
            row
        ),
        _ => address.to_string(),
    }
}

fn collection_scaffold(
    id: &str,
    mission: &MissionSpec,
    camera: &CameraSpec,
    tables: &MissionTables,
) -> CatalogNode {
    let eo_bands: Vec<EoBand> = camera
        .bands
        .iter()
        .map(|b| {
            let band = EoBand::new(b.name());
            match &b.common_name {
                Some(common_name) => band.with_common_name(common_name.clone()),
                None => band,
            }
        })
        .collect();

    let mut gsds: Vec<f64> = camera.bands.iter().map(|b| b.gsd).collect();
    gsds.sort_by(|a, b| a.total_cmp(b));
    gsds.dedup();

    let mut fields = CollectionFields::new(
        tables.license.clone(),
        Extent::global_since(mission.launch_datetime()),
    )
    .with_keywords(vec![
        mission.mission.to_string(),
        mission.platform(),
        camera.name.clone(),
        "INPE".to_string(),
    ])
    .with_providers(tables.providers.clone())
    .with_summary("platform", json!([mission.platform()]))
    .with_summary("instruments", json!([camera.name]))
    .with_summary("gsd", json!(gsds))
    .with_summary(
        "sat:platform_international_designator",
        json!([mission.international_designator]),
    )
    .with_summary("eo:bands", json!(eo_bands))
    .with_item_asset(
        "thumbnail",
        ItemAssetDefinition::new(mission.thumbnail.media_type.clone())
            .with_title("Thumbnail")
            .with_roles(&["thumbnail"]),
    )
    .with_item_asset(
        "metadata",
        ItemAssetDefinition::new(media_types::XML)
            .with_title("INPE original metadata")
            .with_roles(&["metadata"]),
    );

    for (band, eo_band) in camera.bands.iter().zip(eo_bands) {
        fields = fields.with_item_asset(
            band.name(),
            ItemAssetDefinition::new(media_types::COG)
                .with_title(format!("Band {}", band.id))
                .with_roles(&["data"])
                .with_eo_bands(vec![eo_band]),
        );
    }

    CatalogNode::collection(
        id,
        format!("{} {} camera", mission.platform(), camera.description),
        fields,
    )
    .with_title(format!("{} {}", mission.platform(), camera.name))
    .with_extensions(&[extensions::EO, extensions::SAT, extensions::ITEM_ASSETS])
}

fn is_label(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

fn three_digits(s: &str) -> Option<u32> {
    if s.len() == 3 && s.chars().all(|c| c.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

//! Structural validation of STAC documents.
//!
//! Not a JSON-schema validator: it checks the invariants this workspace
//! relies on (closed footprint, bbox shape, declared extensions, required
//! links) and reports the first violation found.

use chrono::DateTime;

use crate::catalog::CatalogNode;
use crate::errors::ValidationError;
use crate::item::StacItem;
use crate::{extensions, rel, STAC_VERSION};

/// Validate an item.
pub fn validate_item(item: &StacItem) -> Result<(), ValidationError> {
    if item.type_ != "Feature" {
        return Err(ValidationError::invalid("type", format!("expected Feature, got {}", item.type_)));
    }
    check_version(&item.stac_version)?;
    if item.id.is_empty() {
        return Err(ValidationError::MissingField("id"));
    }
    if item.collection.is_empty() {
        return Err(ValidationError::MissingField("collection"));
    }

    check_geometry(item)?;
    check_bbox(&item.bbox)?;

    DateTime::parse_from_rfc3339(&item.properties.datetime)
        .map_err(|e| ValidationError::invalid("properties.datetime", e.to_string()))?;

    if item.properties.gsd <= 0.0 {
        return Err(ValidationError::invalid("properties.gsd", "must be positive"));
    }
    if item.properties.instruments.is_empty() {
        return Err(ValidationError::MissingField("properties.instruments"));
    }

    let declared = |url: &str| item.stac_extensions.iter().any(|e| e == url);
    let used = [
        ("proj", extensions::PROJECTION),
        ("view", extensions::VIEW),
        ("sat", extensions::SAT),
    ];
    for (prefix, url) in used {
        if !declared(url) {
            return Err(ValidationError::UndeclaredExtension(format!("{}: {}", prefix, url)));
        }
    }
    let uses_eo = item.assets.values().any(|a| a.eo_bands.is_some());
    if uses_eo && !declared(extensions::EO) {
        return Err(ValidationError::UndeclaredExtension(format!("eo: {}", extensions::EO)));
    }

    if item.assets.is_empty() {
        return Err(ValidationError::MissingField("assets"));
    }
    if item.assets.values().any(|a| a.href.is_empty()) {
        return Err(ValidationError::invalid("assets", "asset with empty href"));
    }

    for required in [rel::SELF, rel::PARENT, rel::COLLECTION] {
        if item.link(required).is_none() {
            return Err(ValidationError::MissingLink(required));
        }
    }

    Ok(())
}

/// Validate a catalog or collection node.
///
/// Every node needs `self` and `root` links; all but the root need exactly
/// one `parent`.
pub fn validate_node(node: &CatalogNode) -> Result<(), ValidationError> {
    let expected_type = if node.is_collection() { "Collection" } else { "Catalog" };
    if node.type_ != expected_type {
        return Err(ValidationError::invalid(
            "type",
            format!("expected {}, got {}", expected_type, node.type_),
        ));
    }
    check_version(&node.stac_version)?;
    if node.id.is_empty() {
        return Err(ValidationError::MissingField("id"));
    }
    if node.description.is_empty() {
        return Err(ValidationError::MissingField("description"));
    }

    let self_link = node.link(rel::SELF).ok_or(ValidationError::MissingLink(rel::SELF))?;
    let root_link = node.link(rel::ROOT).ok_or(ValidationError::MissingLink(rel::ROOT))?;

    let parents = node.links.iter().filter(|l| l.rel == rel::PARENT).count();
    let is_root = self_link.href == root_link.href;
    match (is_root, parents) {
        (true, 0) | (false, 1) => {}
        (true, _) => return Err(ValidationError::invalid("links", "root node has a parent")),
        (false, 0) => return Err(ValidationError::MissingLink(rel::PARENT)),
        (false, _) => return Err(ValidationError::invalid("links", "more than one parent")),
    }

    if let Some(fields) = &node.collection {
        if fields.license.is_empty() {
            return Err(ValidationError::MissingField("license"));
        }
        for bbox in &fields.extent.spatial.bbox {
            check_bbox(bbox)?;
        }
        if fields.extent.temporal.interval.iter().any(|i| i.len() != 2) {
            return Err(ValidationError::invalid("extent.temporal", "interval is not a pair"));
        }
        if !fields.item_assets.is_empty()
            && !node.stac_extensions.iter().any(|e| e == extensions::ITEM_ASSETS)
        {
            return Err(ValidationError::UndeclaredExtension(
                extensions::ITEM_ASSETS.to_string(),
            ));
        }
    }

    Ok(())
}

fn check_version(version: &str) -> Result<(), ValidationError> {
    if version != STAC_VERSION {
        return Err(ValidationError::invalid(
            "stac_version",
            format!("expected {}, got {}", STAC_VERSION, version),
        ));
    }
    Ok(())
}

fn check_bbox(bbox: &[f64]) -> Result<(), ValidationError> {
    if bbox.len() != 4 {
        return Err(ValidationError::invalid("bbox", format!("{} values", bbox.len())));
    }
    if bbox.iter().any(|v| !v.is_finite()) {
        return Err(ValidationError::invalid("bbox", "non-finite value"));
    }
    if bbox[1] < -90.0 || bbox[3] > 90.0 {
        return Err(ValidationError::invalid("bbox", "latitude out of range"));
    }
    Ok(())
}

fn check_geometry(item: &StacItem) -> Result<(), ValidationError> {
    let ring = item.geometry.exterior();
    if ring.len() < 4 {
        return Err(ValidationError::Geometry(format!("ring has {} positions", ring.len())));
    }
    if ring.first() != ring.last() {
        return Err(ValidationError::Geometry("ring is not closed".to_string()));
    }
    for [lon, lat] in ring {
        if !(-180.0..=180.0).contains(lon) || !(-90.0..=90.0).contains(lat) {
            return Err(ValidationError::Geometry(format!("position ({}, {}) out of range", lon, lat)));
        }
    }
    Ok(())
}

//! STAC Catalog and Collection documents.
//!
//! Both share one record, [`CatalogNode`]; a collection is a catalog that
//! also carries [`CollectionFields`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::item::EoBand;
use crate::types::{Extent, Link, Provider};

/// Fields a STAC Collection adds on top of a Catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionFields {
    pub license: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<Provider>,

    pub extent: Extent,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub summaries: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub item_assets: BTreeMap<String, ItemAssetDefinition>,
}

impl CollectionFields {
    pub fn new(license: impl Into<String>, extent: Extent) -> Self {
        Self {
            license: license.into(),
            keywords: Vec::new(),
            providers: Vec::new(),
            extent,
            summaries: BTreeMap::new(),
            item_assets: BTreeMap::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_providers(mut self, providers: Vec<Provider>) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_summary(mut self, key: impl Into<String>, value: Value) -> Self {
        self.summaries.insert(key.into(), value);
        self
    }

    pub fn with_item_asset(mut self, key: impl Into<String>, asset: ItemAssetDefinition) -> Self {
        self.item_assets.insert(key.into(), asset);
        self
    }
}

/// Asset template shared by every item of a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemAssetDefinition {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    #[serde(rename = "eo:bands", skip_serializing_if = "Option::is_none")]
    pub eo_bands: Option<Vec<EoBand>>,
}

impl ItemAssetDefinition {
    pub fn new(type_: impl Into<String>) -> Self {
        Self {
            type_: Some(type_.into()),
            title: None,
            roles: Vec::new(),
            eo_bands: None,
        }
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
}

/// One level of the static catalog tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogNode {
    /// "Catalog" or "Collection".
    #[serde(rename = "type")]
    pub type_: String,

    pub stac_version: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stac_extensions: Vec<String>,

    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub description: String,

    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub collection: Option<CollectionFields>,

    pub links: Vec<Link>,
}

impl CatalogNode {
    /// A plain catalog.
    pub fn catalog(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            type_: "Catalog".to_string(),
            stac_version: crate::STAC_VERSION.to_string(),
            stac_extensions: Vec::new(),
            id: id.into(),
            title: None,
            description: description.into(),
            collection: None,
            links: Vec::new(),
        }
    }

    /// A collection carrying the given scaffold.
    pub fn collection(
        id: impl Into<String>,
        description: impl Into<String>,
        fields: CollectionFields,
    ) -> Self {
        Self {
            type_: "Collection".to_string(),
            collection: Some(fields),
            ..Self::catalog(id, description)
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.stac_extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn is_collection(&self) -> bool {
        self.collection.is_some()
    }

    /// First link with the given relation.
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.rel == rel)
    }

    /// Child and item links, in document order.
    pub fn descendants(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|l| l.is_descendant())
    }

    /// Replace every child/item link with `links`, sorted by href and
    /// de-duplicated. Other links keep their position ahead of them.
    pub fn replace_descendants(&mut self, mut links: Vec<Link>) {
        links.sort_by(|a, b| a.href.cmp(&b.href).then_with(|| a.cmp(b)));
        links.dedup_by(|a, b| a.href == b.href);
        self.links.retain(|l| !l.is_descendant());
        self.links.extend(links);
    }

    /// Pretty JSON with a trailing newline, as stored.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rel;

    #[test]
    fn test_catalog_serialization() {
        let node = CatalogNode::catalog("CBERS4", "CBERS-4 catalog")
            .with_link(Link::new("https://x/CBERS4/catalog.json", rel::SELF));
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["type"], "Catalog");
        assert_eq!(json["stac_version"], "1.0.0");
        assert!(json.get("license").is_none());
        assert!(json.get("stac_extensions").is_none());
        assert!(json.get("title").is_none());
    }

    #[test]
    fn test_collection_flattens_fields() {
        let fields = CollectionFields::new("CC-BY-SA-3.0", Extent::global_since("2014-12-08T00:00:00Z"))
            .with_keywords(vec!["CBERS".to_string()])
            .with_summary("gsd", serde_json::json!([20.0]))
            .with_item_asset("B5", ItemAssetDefinition::new(crate::media_types::COG));
        let node = CatalogNode::collection("CBERS4-MUX", "MUX camera", fields);

        assert!(node.is_collection());
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Collection");
        assert_eq!(json["license"], "CC-BY-SA-3.0");
        assert_eq!(json["summaries"]["gsd"][0], 20.0);
        assert!(json["item_assets"]["B5"]["type"].is_string());
    }

    #[test]
    fn test_collection_deserializes_back() {
        let fields = CollectionFields::new("CC-BY-SA-3.0", Extent::global_since("2019-12-20T00:00:00Z"));
        let node = CatalogNode::collection("CBERS4A-WPM", "WPM camera", fields);
        let parsed: CatalogNode = serde_json::from_str(&node.to_json().unwrap()).unwrap();
        assert_eq!(parsed, node);

        let catalog = CatalogNode::catalog("CBERS4A", "CBERS-4A");
        let parsed: CatalogNode = serde_json::from_str(&catalog.to_json().unwrap()).unwrap();
        assert!(!parsed.is_collection());
    }

    #[test]
    fn test_replace_descendants_sorts_and_dedups() {
        let mut node = CatalogNode::catalog("CBERS4-MUX-083", "path 083")
            .with_link(Link::new("self.json", rel::SELF))
            .with_link(Link::new("old/catalog.json", rel::CHILD))
            .with_link(Link::new("root.json", rel::ROOT));

        node.replace_descendants(vec![
            Link::new("095/catalog.json", rel::CHILD),
            Link::new("094/catalog.json", rel::CHILD),
            Link::new("095/catalog.json", rel::CHILD),
        ]);

        let hrefs: Vec<_> = node.links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec!["self.json", "root.json", "094/catalog.json", "095/catalog.json"]
        );
        assert_eq!(node.descendants().count(), 2);
    }
}

//! Core STAC types shared by items, catalogs and collections.

use serde::{Deserialize, Serialize};

/// A hyperlink to a related document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Link {
    /// The URI of the linked document.
    pub href: String,

    /// The relationship type ("self", "root", "parent", "child", "item", ...).
    pub rel: String,

    /// The media type of the linked document.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// A human-readable title for the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    /// Create a new link with required fields.
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            type_: None,
            title: None,
        }
    }

    /// Set the media type.
    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Whether this link points at a child catalog or an item.
    pub fn is_descendant(&self) -> bool {
        self.rel == crate::rel::CHILD || self.rel == crate::rel::ITEM
    }
}

/// An organization capturing or processing the data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provider {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// "licensor", "producer", "processor" or "host".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Provider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            roles: Vec::new(),
            url: None,
        }
    }

    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The spatial and temporal extent of a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Extent {
    pub spatial: SpatialExtent,
    pub temporal: TemporalExtent,
}

impl Extent {
    /// Extent with one bounding box and one open or closed time interval.
    pub fn new(bbox: [f64; 4], start: Option<String>, end: Option<String>) -> Self {
        Self {
            spatial: SpatialExtent {
                bbox: vec![bbox.to_vec()],
            },
            temporal: TemporalExtent {
                interval: vec![vec![start, end]],
            },
        }
    }

    /// Whole-globe extent, open-ended from `start`.
    pub fn global_since(start: impl Into<String>) -> Self {
        Self::new([-180.0, -90.0, 180.0, 90.0], Some(start.into()), None)
    }
}

/// Spatial extent with bounding boxes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpatialExtent {
    /// Bounding boxes as [west, south, east, north] arrays.
    pub bbox: Vec<Vec<f64>>,
}

/// Temporal extent with time intervals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemporalExtent {
    /// Time intervals as [start, end] pairs (RFC 3339); null is open-ended.
    pub interval: Vec<Vec<Option<String>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_builder() {
        let link = Link::new("https://example.com/catalog.json", "parent")
            .with_type("application/json")
            .with_title("Parent");

        assert_eq!(link.href, "https://example.com/catalog.json");
        assert_eq!(link.rel, "parent");
        assert_eq!(link.type_, Some("application/json".to_string()));
        assert!(!link.is_descendant());
    }

    #[test]
    fn test_link_serialization() {
        let link = Link::new("090/catalog.json", "child");
        let json = serde_json::to_string(&link).unwrap();
        assert_eq!(json, r#"{"href":"090/catalog.json","rel":"child"}"#);
        assert!(link.is_descendant());
    }

    #[test]
    fn test_extent_open_interval() {
        let extent = Extent::global_since("2014-12-08T00:00:00Z");
        let json = serde_json::to_value(&extent).unwrap();
        assert_eq!(json["spatial"]["bbox"][0][0], -180.0);
        assert_eq!(json["temporal"]["interval"][0][0], "2014-12-08T00:00:00Z");
        assert!(json["temporal"]["interval"][0][1].is_null());
    }

    #[test]
    fn test_provider_skips_empty_fields() {
        let provider = Provider::new("INPE").with_roles(&["producer", "licensor"]);
        let json = serde_json::to_value(&provider).unwrap();
        assert_eq!(json["roles"][1], "licensor");
        assert!(json.get("url").is_none());
    }
}

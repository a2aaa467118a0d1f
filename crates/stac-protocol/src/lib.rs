//! SpatioTemporal Asset Catalog (STAC) protocol types.
//!
//! Typed records for the STAC 1.0 documents this workspace publishes:
//! items (GeoJSON features), catalogs and collections, plus a structural
//! validator for items and nodes.
//!
//! All maps are `BTreeMap`s so that serializing the same document twice
//! yields identical bytes.
//!
//! # Example
//!
//! ```rust
//! use stac_protocol::{CatalogNode, Link, media_types};
//!
//! let node = CatalogNode::catalog("CBERS4", "CBERS-4 catalog")
//!     .with_link(Link::new("https://bucket.s3.amazonaws.com/CBERS4/catalog.json", "self")
//!         .with_type(media_types::JSON));
//! assert!(!node.is_collection());
//! ```

pub mod catalog;
pub mod errors;
pub mod item;
pub mod types;
pub mod validate;

pub use catalog::{CatalogNode, CollectionFields, ItemAssetDefinition};
pub use errors::ValidationError;
pub use item::{Asset, EoBand, Geometry, ItemProperties, StacItem};
pub use types::{Extent, Link, Provider, SpatialExtent, TemporalExtent};
pub use validate::{validate_item, validate_node};

/// STAC version every document is pinned to.
pub const STAC_VERSION: &str = "1.0.0";

/// Extension schema URLs.
pub mod extensions {
    /// Projection extension
    pub const PROJECTION: &str = "https://stac-extensions.github.io/projection/v1.0.0/schema.json";
    /// View geometry extension
    pub const VIEW: &str = "https://stac-extensions.github.io/view/v1.0.0/schema.json";
    /// Satellite extension
    pub const SAT: &str = "https://stac-extensions.github.io/sat/v1.0.0/schema.json";
    /// Electro-optical extension
    pub const EO: &str = "https://stac-extensions.github.io/eo/v1.0.0/schema.json";
    /// Item assets definition extension (collections)
    pub const ITEM_ASSETS: &str =
        "https://stac-extensions.github.io/item-assets/v1.0.0/schema.json";

    /// Extensions declared on every item, in declaration order.
    pub const ITEM: [&str; 4] = [PROJECTION, VIEW, SAT, EO];
}

/// Media types used in asset and link `type` fields.
pub mod media_types {
    /// Plain JSON (catalogs, collections)
    pub const JSON: &str = "application/json";
    /// GeoJSON (items)
    pub const GEO_JSON: &str = "application/geo+json";
    /// Cloud-optimized GeoTIFF
    pub const COG: &str = "image/tiff; application=geotiff; profile=cloud-optimized";
    /// Metadata documents
    pub const XML: &str = "text/xml";
    pub const JPEG: &str = "image/jpeg";
    pub const PNG: &str = "image/png";
}

/// Link relation types.
pub mod rel {
    pub const SELF: &str = "self";
    pub const ROOT: &str = "root";
    pub const PARENT: &str = "parent";
    pub const CHILD: &str = "child";
    pub const ITEM: &str = "item";
    pub const COLLECTION: &str = "collection";
    pub const LICENSE: &str = "license";
}

//! STAC document builders for CBERS-4/4A and AMAZONIA-1 scenes.
//!
//! - [`ItemBuilder`] turns a normalized scene record into a STAC Item
//! - [`tree`] composes the static catalog: root, mission, camera
//!   collection, path and path+row nodes
//! - [`MissionTables`] carries the per-mission/camera static data both
//!   builders read; it is always passed in, never global
//!
//! Builders are pure and deterministic: the same inputs serialize to the
//! same bytes.

pub mod config;
pub mod item;
pub mod tables;
pub mod tree;

pub use config::{asset_href, stac_href, BucketConfig};
pub use item::{item_key, ItemBuilder};
pub use tables::{BandSpec, CameraSpec, MissionSpec, MissionTables, ThumbnailFormat};
pub use tree::{
    base_catalog_or_collection, build_node_for_prefix, compose_from_listing, is_item_file,
    node_key, NodeAddress, TreeNode,
};

//! Bucket configuration and public URL conventions.

use serde::{Deserialize, Serialize};
use std::env;

/// The three buckets a scene touches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketConfig {
    /// Original INPE metadata XML files
    pub metadata: String,
    /// Cloud-optimized GeoTIFFs and thumbnails
    pub cog: String,
    /// Published STAC documents
    pub stac: String,
}

impl BucketConfig {
    pub fn new(
        metadata: impl Into<String>,
        cog: impl Into<String>,
        stac: impl Into<String>,
    ) -> Self {
        Self {
            metadata: metadata.into(),
            cog: cog.into(),
            stac: stac.into(),
        }
    }

    /// Read `METADATA_BUCKET`, `COG_BUCKET` and `STAC_BUCKET`.
    pub fn from_env() -> Self {
        Self {
            metadata: env::var("METADATA_BUCKET").unwrap_or_else(|_| "cbers-meta-pds".to_string()),
            cog: env::var("COG_BUCKET").unwrap_or_else(|_| "cbers-pds".to_string()),
            stac: env::var("STAC_BUCKET").unwrap_or_else(|_| "cbers-stac".to_string()),
        }
    }
}

/// Absolute URL of a STAC document: `https://{bucket}.s3.amazonaws.com/{key}`.
pub fn stac_href(bucket: &str, key: &str) -> String {
    format!("https://{}.s3.amazonaws.com/{}", bucket, key)
}

/// Absolute URL of a data file: `https://s3.amazonaws.com/{bucket}/{key}`.
pub fn asset_href(bucket: &str, key: &str) -> String {
    format!("https://s3.amazonaws.com/{}/{}", bucket, key)
}

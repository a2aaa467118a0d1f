//! Writer configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use stac_builder::{BucketConfig, MissionTables};
use storage::ObjectStorageConfig;

/// Everything the writer needs to reach storage and build documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Object storage connection
    pub storage: ObjectStorageConfig,

    /// Metadata, COG and STAC bucket names
    pub buckets: BucketConfig,

    /// Mission/camera tables
    pub tables: MissionTables,
}

impl WriterConfig {
    /// Load from environment variables, with mission tables from `tables_path`
    /// when given and the compiled-in tables otherwise.
    pub fn from_env(tables_path: Option<&Path>) -> Result<Self> {
        let tables = match tables_path {
            Some(path) => MissionTables::from_yaml_file(path)
                .with_context(|| format!("loading mission tables from {}", path.display()))?,
            None => MissionTables::builtin(),
        };

        Ok(Self {
            storage: ObjectStorageConfig::from_env(),
            buckets: BucketConfig::from_env(),
            tables,
        })
    }
}

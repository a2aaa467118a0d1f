//! Scene-to-catalog write pipeline.
//!
//! One scene: resolve its metadata document, build the item, write it, then
//! rebuild the row, path and camera nodes above it from fresh listings.

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use scene_metadata::{metadata_candidates, parse_filename, prepare_record};
use stac_builder::{
    base_catalog_or_collection, compose_from_listing, item_key, node_key, BucketConfig,
    ItemBuilder, MissionTables, NodeAddress,
};
use storage::ObjectStorage;

use crate::config::WriterConfig;

/// What a scene write changed in the STAC bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub item_key: String,
    pub item_written: bool,
    /// Node keys whose content changed
    pub nodes_written: Vec<String>,
}

/// Reads metadata from one bucket and publishes STAC documents to another.
pub struct StacWriter {
    metadata: ObjectStorage,
    stac: ObjectStorage,
    buckets: BucketConfig,
    tables: MissionTables,
}

impl StacWriter {
    pub fn new(
        metadata: ObjectStorage,
        stac: ObjectStorage,
        buckets: BucketConfig,
        tables: MissionTables,
    ) -> Self {
        Self {
            metadata,
            stac,
            buckets,
            tables,
        }
    }

    /// Connect to the metadata and STAC buckets named in the config.
    pub fn from_config(config: &WriterConfig) -> Result<Self> {
        let metadata = ObjectStorage::new(&config.storage, &config.buckets.metadata)?;
        let stac = ObjectStorage::new(&config.storage, &config.buckets.stac)?;
        Ok(Self::new(
            metadata,
            stac,
            config.buckets.clone(),
            config.tables.clone(),
        ))
    }

    /// Fetch the metadata document for a scene key.
    ///
    /// The key may name any file of the scene (band TIFF or XML, with or
    /// without directories). Returns the filename that was found and its
    /// contents.
    pub async fn resolve_metadata(&self, key: &str) -> Result<(String, String)> {
        let keys = parse_filename(key)?;
        let scene_dir = keys.scene_ids().download_url;

        for (attempt, candidate) in metadata_candidates(&keys).into_iter().enumerate() {
            let candidate_key = format!("{}/{}", scene_dir, candidate);
            if let Some(bytes) = self.metadata.get_opt(&candidate_key).await? {
                if attempt > 0 {
                    warn!(key = %key, found = %candidate_key, "Using fallback metadata filename");
                }
                let xml = String::from_utf8(bytes.to_vec())
                    .with_context(|| format!("{} is not UTF-8", candidate_key))?;
                return Ok((candidate, xml));
            }
            debug!(candidate = %candidate_key, "Metadata candidate not found");
        }

        Err(anyhow!(
            "no metadata document for {} under {}/{}",
            key,
            self.metadata.bucket(),
            scene_dir
        ))
    }

    /// Build and publish one scene, then refresh its ancestors up to the
    /// camera collection.
    #[instrument(skip(self))]
    pub async fn write_item(&self, key: &str) -> Result<ItemOutcome> {
        let (filename, xml) = self.resolve_metadata(key).await?;
        let record = prepare_record(&xml, &filename)
            .with_context(|| format!("parsing metadata {}", filename))?;
        let item = ItemBuilder::new(&self.tables, &self.buckets).build(&record)?;

        let item_key = item_key(&record);
        let item_written = self
            .stac
            .put_if_changed(&item_key, Bytes::from(item.to_json()?))
            .await?;

        let row = NodeAddress::from_parts(
            record.mission.as_str(),
            Some(&record.number),
            Some(&record.sensor),
            Some(&format!("{:03}", record.path)),
            Some(&format!("{:03}", record.row)),
        )?;

        let mut nodes_written = Vec::new();
        let mut next = Some(row);
        while let Some(address) = next {
            if !address.reads_listing() {
                break;
            }
            if self.rebuild_node(&address).await? {
                nodes_written.push(node_key(&address));
            }
            next = address.parent();
        }

        info!(
            item_id = %item.id,
            item_key = %item_key,
            item_written = item_written,
            nodes_written = nodes_written.len(),
            "Scene published"
        );

        Ok(ItemOutcome {
            item_key,
            item_written,
            nodes_written,
        })
    }

    /// Rebuild and publish a single node; returns whether it changed.
    #[instrument(skip(self), fields(node = %address))]
    pub async fn rebuild_node(&self, address: &NodeAddress) -> Result<bool> {
        let base = base_catalog_or_collection(&self.buckets.stac, address, &self.tables)?;
        let node = if address.reads_listing() {
            let listing = self.stac.list_children(&format!("{}/", address.prefix())).await?;
            compose_from_listing(base, &listing)?
        } else {
            base
        };

        let key = node_key(address);
        let written = self
            .stac
            .put_if_changed(&key, Bytes::from(node.document.to_json()?))
            .await?;
        debug!(key = %key, written = written, "Node published");
        Ok(written)
    }

    /// Rebuild the node for a storage prefix.
    pub async fn rebuild_prefix(&self, prefix: &str) -> Result<bool> {
        let address = NodeAddress::from_prefix(prefix)?;
        self.rebuild_node(&address).await
    }

    /// Rebuild the root catalog and every mission catalog from the tables.
    pub async fn rebuild_root(&self) -> Result<Vec<String>> {
        let mut addresses = vec![NodeAddress::Root];
        for mission in &self.tables.missions {
            addresses.push(NodeAddress::Mission {
                mission: mission.mission,
                number: mission.number.to_uppercase(),
            });
        }

        let mut written = Vec::new();
        for address in &addresses {
            if self.rebuild_node(address).await? {
                written.push(node_key(address));
            }
        }
        info!(nodes = addresses.len(), written = written.len(), "Root rebuilt");
        Ok(written)
    }
}

/// Convert a local metadata file to `{out_dir}/{item_id}.json`.
pub fn convert_local(
    xml_path: &Path,
    out_dir: &Path,
    tables: &MissionTables,
    buckets: &BucketConfig,
) -> Result<PathBuf> {
    let xml = fs::read_to_string(xml_path)
        .with_context(|| format!("reading {}", xml_path.display()))?;
    let filename = xml_path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("{} has no file name", xml_path.display()))?;

    let record = prepare_record(&xml, filename)?;
    let item = ItemBuilder::new(tables, buckets).build(&record)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let out_path = out_dir.join(format!("{}.json", item.id));
    fs::write(&out_path, item.to_json()?)
        .with_context(|| format!("writing {}", out_path.display()))?;

    info!(item_id = %item.id, path = %out_path.display(), "Item written");
    Ok(out_path)
}

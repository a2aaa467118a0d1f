//! Object storage interface for metadata and STAC documents (S3/MinIO compatible).

use bytes::Bytes;
use object_store::{aws::AmazonS3Builder, path::Path, ObjectStore};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tracing::{debug, instrument};

use stac_common::{ChildListing, StacError, StacResult};

/// Connection settings shared by every bucket the writer touches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectStorageConfig {
    /// Custom endpoint (MinIO, LocalStack); `None` talks to AWS
    pub endpoint: Option<String>,
    /// AWS region
    pub region: String,
    /// Access key ID; falls back to the AWS credential chain when unset
    pub access_key_id: Option<String>,
    /// Secret access key
    pub secret_access_key: Option<String>,
    /// Allow HTTP (for local MinIO)
    pub allow_http: bool,
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            allow_http: false,
        }
    }
}

impl ObjectStorageConfig {
    /// Read `S3_ENDPOINT`, `S3_REGION`, `S3_ACCESS_KEY`, `S3_SECRET_KEY` and
    /// `S3_ALLOW_HTTP`.
    pub fn from_env() -> Self {
        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());

        Self {
            endpoint: non_empty("S3_ENDPOINT"),
            region: non_empty("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            access_key_id: non_empty("S3_ACCESS_KEY"),
            secret_access_key: non_empty("S3_SECRET_KEY"),
            allow_http: env::var("S3_ALLOW_HTTP")
                .map(|v| v == "true")
                .unwrap_or(false),
        }
    }
}

/// Object storage client bound to one bucket.
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ObjectStorage {
    /// Create an S3 client for `bucket`.
    pub fn new(config: &ObjectStorageConfig, bucket: &str) -> StacResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(&config.region);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }
        if let (Some(key), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            builder = builder
                .with_access_key_id(key)
                .with_secret_access_key(secret);
        }
        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| StacError::Storage(format!("Failed to create S3 client: {}", e)))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: bucket.to_string(),
        })
    }

    /// Wrap an existing store, e.g. `object_store::memory::InMemory`.
    pub fn from_store(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Write bytes to a key.
    #[instrument(skip(self, data), fields(bucket = %self.bucket, key = %key))]
    pub async fn put(&self, key: &str, data: Bytes) -> StacResult<()> {
        let location = Path::from(key);
        debug!(size = data.len(), "Writing object");

        self.store
            .put(&location, data.into())
            .await
            .map_err(|e| StacError::Storage(format!("Failed to write {}: {}", key, e)))?;

        Ok(())
    }

    /// Read a whole object.
    #[instrument(skip(self), fields(bucket = %self.bucket, key = %key))]
    pub async fn get(&self, key: &str) -> StacResult<Bytes> {
        self.get_opt(key)
            .await?
            .ok_or_else(|| StacError::Storage(format!("Object not found: {}/{}", self.bucket, key)))
    }

    /// Read a whole object, `None` when it does not exist.
    pub async fn get_opt(&self, key: &str) -> StacResult<Option<Bytes>> {
        let location = Path::from(key);

        let result = match self.store.get(&location).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(e) => {
                return Err(StacError::Storage(format!("Failed to read {}: {}", key, e)));
            }
        };

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StacError::Storage(format!("Failed to read bytes of {}: {}", key, e)))?;

        debug!(key = %key, size = bytes.len(), "Read object");
        Ok(Some(bytes))
    }

    /// Read an object as UTF-8 text.
    pub async fn get_string(&self, key: &str) -> StacResult<String> {
        let bytes = self.get(key).await?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| StacError::MalformedMetadata(format!("{} is not UTF-8: {}", key, e)))
    }

    /// Check if an object exists.
    pub async fn exists(&self, key: &str) -> StacResult<bool> {
        let location = Path::from(key);

        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StacError::Storage(format!("Failed to check {}: {}", key, e))),
        }
    }

    /// Immediate children of a prefix: sub-prefixes and files one level down.
    ///
    /// The client follows continuation tokens, so the result is complete.
    #[instrument(skip(self), fields(bucket = %self.bucket, prefix = %prefix))]
    pub async fn list_children(&self, prefix: &str) -> StacResult<ChildListing> {
        let location = Path::from(prefix);
        let scope = if location.as_ref().is_empty() {
            None
        } else {
            Some(&location)
        };

        let result = self
            .store
            .list_with_delimiter(scope)
            .await
            .map_err(|e| StacError::Storage(format!("List of {} failed: {}", prefix, e)))?;

        let listing = ChildListing::complete(
            result
                .common_prefixes
                .iter()
                .map(|p| p.to_string())
                .collect(),
            result.objects.iter().map(|m| m.location.to_string()).collect(),
        );

        debug!(
            sub_prefixes = listing.sub_prefixes.len(),
            files = listing.files.len(),
            "Listed prefix"
        );
        Ok(listing)
    }

    /// Write `data` unless the stored object already has exactly these bytes.
    ///
    /// Returns whether a write happened.
    #[instrument(skip(self, data), fields(bucket = %self.bucket, key = %key))]
    pub async fn put_if_changed(&self, key: &str, data: Bytes) -> StacResult<bool> {
        if let Some(current) = self.get_opt(key).await? {
            if current == data {
                debug!("Object unchanged, skipping write");
                return Ok(false);
            }
        }

        self.put(key, data).await?;
        Ok(true)
    }

    /// Delete an object.
    #[instrument(skip(self), fields(bucket = %self.bucket, key = %key))]
    pub async fn delete(&self, key: &str) -> StacResult<()> {
        let location = Path::from(key);

        self.store
            .delete(&location)
            .await
            .map_err(|e| StacError::Storage(format!("Failed to delete {}: {}", key, e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    fn storage() -> ObjectStorage {
        ObjectStorage::from_store(Arc::new(InMemory::new()), "test-bucket")
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let storage = storage();
        storage
            .put("CBERS4/catalog.json", Bytes::from_static(b"{}\n"))
            .await
            .unwrap();

        assert_eq!(storage.get_string("CBERS4/catalog.json").await.unwrap(), "{}\n");
        assert!(storage.exists("CBERS4/catalog.json").await.unwrap());
        assert!(!storage.exists("CBERS4A/catalog.json").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_object() {
        let storage = storage();
        assert!(storage.get_opt("nope.json").await.unwrap().is_none());

        let err = storage.get("nope.json").await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_put_if_changed() {
        let storage = storage();
        let key = "CBERS4/MUX/collection.json";

        assert!(storage.put_if_changed(key, Bytes::from_static(b"a")).await.unwrap());
        assert!(!storage.put_if_changed(key, Bytes::from_static(b"a")).await.unwrap());
        assert!(storage.put_if_changed(key, Bytes::from_static(b"b")).await.unwrap());
        assert_eq!(storage.get(key).await.unwrap(), Bytes::from_static(b"b"));
    }

    #[tokio::test]
    async fn test_list_children_one_level() {
        let storage = storage();
        for key in [
            "CBERS4/MUX/083/095/A_L2.json",
            "CBERS4/MUX/083/095/catalog.json",
            "CBERS4/MUX/083/096/B_L2.json",
            "CBERS4/MUX/083/catalog.json",
        ] {
            storage.put(key, Bytes::from_static(b"{}")).await.unwrap();
        }

        let path = storage.list_children("CBERS4/MUX/083/").await.unwrap();
        let mut prefixes: Vec<_> = path
            .sub_prefixes
            .iter()
            .map(|p| stac_common::last_segment(p).to_string())
            .collect();
        prefixes.sort();
        assert_eq!(prefixes, vec!["095", "096"]);
        assert_eq!(path.files, vec!["CBERS4/MUX/083/catalog.json"]);
        assert!(!path.truncated);

        let row = storage.list_children("CBERS4/MUX/083/095").await.unwrap();
        assert!(row.sub_prefixes.is_empty());
        assert_eq!(row.files.len(), 2);

        let root = storage.list_children("").await.unwrap();
        assert_eq!(root.sub_prefixes, vec!["CBERS4"]);
        assert!(root.files.is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = ObjectStorageConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert!(config.endpoint.is_none());
        assert!(!config.allow_http);
    }
}

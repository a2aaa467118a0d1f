//! Storage abstractions for the STAC writer.
//!
//! Provides an object storage (S3/MinIO) client used to read INPE metadata
//! documents, publish STAC documents and list catalog prefixes.

pub mod object_store;

pub use self::object_store::{ObjectStorage, ObjectStorageConfig};

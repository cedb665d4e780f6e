//! Storage adapters.
//!
//! The services never talk to MongoDB directly. They go through two narrow
//! contracts:
//! - [`DocumentStore`] — per-collection documents keyed by `ObjectId`
//! - [`ObjectStore`] — binary blobs with filename, content type and metadata
//!
//! Both have a MongoDB-backed implementation (`mongo`) and an in-process one
//! (`memory`) used by tests and `--in-memory` runs.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use mongodb::bson::{Document, oid::ObjectId};
use serde::de::DeserializeOwned;
use std::io;
use thiserror::Error;

pub use memory::{MemoryDocumentStore, MemoryObjectStore};
pub use mongo::{GridFsObjectStore, MongoDocumentStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    #[error("stored document in `{collection}` is malformed: {reason}")]
    DataIntegrity { collection: String, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document database contract.
///
/// Documents are plain BSON; typed decoding happens through [`decode`] so a
/// missing or mistyped field surfaces as [`StoreError::DataIntegrity`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return the id assigned to it.
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<ObjectId>;

    async fn find_one(&self, collection: &str, id: &ObjectId) -> StoreResult<Option<Document>>;

    /// All documents of a collection in storage-native order.
    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Overwrite the given top-level fields. Returns `false` when no document matched.
    async fn update_fields(
        &self,
        collection: &str,
        id: &ObjectId,
        fields: Document,
    ) -> StoreResult<bool>;

    /// Returns `false` when no document matched.
    async fn delete_one(&self, collection: &str, id: &ObjectId) -> StoreResult<bool>;

    /// Round-trip to the backing database.
    async fn ping(&self) -> StoreResult<()>;

    /// Name of the database this store is bound to.
    fn database_name(&self) -> &str;
}

/// A blob to be written to the [`ObjectStore`].
#[derive(Debug, Clone)]
pub struct BlobUpload {
    pub filename: String,
    pub content_type: Option<String>,
    /// Free-form tags stored next to the blob (slot, owner id, ...).
    pub metadata: Document,
    pub bytes: Bytes,
}

/// A blob read back from the [`ObjectStore`].
#[derive(Debug, Clone)]
pub struct Blob {
    pub id: ObjectId,
    pub filename: String,
    pub content_type: Option<String>,
    pub metadata: Document,
    pub uploaded_at: DateTime<Utc>,
    /// Hex MD5 of the payload, when it was recorded at upload.
    pub etag: Option<String>,
    pub bytes: Bytes,
}

/// Large-object store contract.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, upload: BlobUpload) -> StoreResult<ObjectId>;

    async fn get(&self, id: &ObjectId) -> StoreResult<Option<Blob>>;
}

/// Metadata key holding the blob's content type.
pub const CONTENT_TYPE_KEY: &str = "contentType";
/// Metadata key holding the hex MD5 of the payload.
pub const MD5_KEY: &str = "md5";

/// Decode a raw document into `T`, failing with [`StoreError::DataIntegrity`].
pub fn decode<T: DeserializeOwned>(collection: &str, document: Document) -> StoreResult<T> {
    mongodb::bson::from_document(document).map_err(|err| StoreError::DataIntegrity {
        collection: collection.to_string(),
        reason: err.to_string(),
    })
}

/// Compute the metadata a blob carries in addition to caller-supplied tags.
pub(crate) fn blob_metadata(upload: &BlobUpload) -> Document {
    let mut metadata = upload.metadata.clone();
    if let Some(content_type) = &upload.content_type {
        metadata.insert(CONTENT_TYPE_KEY, content_type.as_str());
    }
    metadata.insert(MD5_KEY, format!("{:x}", md5::compute(&upload.bytes)));
    metadata
}

//! In-process adapters.
//!
//! Collections are kept as insertion-ordered vectors behind a `RwLock`. The
//! behaviour mirrors the MongoDB adapters closely enough to drive the
//! services and the HTTP layer in tests or in a throwaway `--in-memory` run.

use super::{
    Blob, BlobUpload, CONTENT_TYPE_KEY, DocumentStore, MD5_KEY, ObjectStore, StoreResult,
    blob_metadata,
};
use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::{Bson, Document, oid::ObjectId};
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};
use tracing::debug;

const ID_FIELD: &str = "_id";

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    name: String,
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: RwLock::default(),
        }
    }
}

fn has_id(document: &Document, id: &ObjectId) -> bool {
    matches!(document.get(ID_FIELD), Some(Bson::ObjectId(stored)) if stored == id)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(&self, collection: &str, mut document: Document) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        document.insert(ID_FIELD, id);
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        debug!(collection, %id, "inserted in-memory document");
        Ok(id)
    }

    async fn find_one(&self, collection: &str, id: &ObjectId) -> StoreResult<Option<Document>> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| has_id(doc, id)))
            .cloned())
    }

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &ObjectId,
        fields: Document,
    ) -> StoreResult<bool> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| has_id(doc, id)))
        else {
            return Ok(false);
        };
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(true)
    }

    async fn delete_one(&self, collection: &str, id: &ObjectId) -> StoreResult<bool> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| !has_id(doc, id));
        Ok(docs.len() != before)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn database_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    blobs: RwLock<HashMap<ObjectId, Blob>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs, including ones no record points at anymore.
    pub fn len(&self) -> usize {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, upload: BlobUpload) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        let metadata = blob_metadata(&upload);
        let blob = Blob {
            id,
            filename: upload.filename,
            content_type: metadata.get_str(CONTENT_TYPE_KEY).ok().map(str::to_string),
            etag: metadata.get_str(MD5_KEY).ok().map(str::to_string),
            metadata,
            uploaded_at: Utc::now(),
            bytes: upload.bytes,
        };
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, blob);
        Ok(id)
    }

    async fn get(&self, id: &ObjectId) -> StoreResult<Option<Blob>> {
        Ok(self
            .blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned())
    }
}

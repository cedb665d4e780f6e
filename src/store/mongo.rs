//! MongoDB-backed adapters: plain collections for records, a GridFS bucket for blobs.

use super::{
    Blob, BlobUpload, CONTENT_TYPE_KEY, DocumentStore, MD5_KEY, ObjectStore, StoreError,
    StoreResult, blob_metadata,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::{
    TryStreamExt,
    io::{AsyncReadExt, AsyncWriteExt},
};
use mongodb::{
    Client, Collection, Database,
    bson::{Bson, Document, doc, oid::ObjectId},
    gridfs::GridFsBucket,
    options::{ClientOptions, GridFsBucketOptions},
};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// GridFS bucket holding every uploaded media blob.
pub const MEDIA_BUCKET: &str = "media";

/// Connect to MongoDB and verify the server answers a ping.
pub async fn connect(url: &str, database: &str) -> StoreResult<Database> {
    let mut options = ClientOptions::parse(url).await?;
    options.app_name = Some("event-api".to_string());
    options.connect_timeout = Some(Duration::from_secs(10));
    options.server_selection_timeout = Some(Duration::from_secs(30));

    let client = Client::with_options(options)?;
    let db = client.database(database);
    db.run_command(doc! { "ping": 1 }).await?;
    info!(database, "connected to MongoDB");
    Ok(db)
}

#[derive(Clone, Debug)]
pub struct MongoDocumentStore {
    db: Database,
}

impl MongoDocumentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    #[instrument(skip(self, document))]
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<ObjectId> {
        let result = self.collection(collection).insert_one(document).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::DataIntegrity {
                collection: collection.to_string(),
                reason: format!("inserted id {} is not an ObjectId", result.inserted_id),
            })
    }

    #[instrument(skip(self))]
    async fn find_one(&self, collection: &str, id: &ObjectId) -> StoreResult<Option<Document>> {
        Ok(self
            .collection(collection)
            .find_one(doc! { "_id": *id })
            .await?)
    }

    #[instrument(skip(self))]
    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let cursor = self.collection(collection).find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, fields))]
    async fn update_fields(
        &self,
        collection: &str,
        id: &ObjectId,
        fields: Document,
    ) -> StoreResult<bool> {
        let result = self
            .collection(collection)
            .update_one(doc! { "_id": *id }, doc! { "$set": fields })
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete_one(&self, collection: &str, id: &ObjectId) -> StoreResult<bool> {
        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": *id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    fn database_name(&self) -> &str {
        self.db.name()
    }
}

/// Blob storage on a GridFS bucket of the same database.
#[derive(Clone)]
pub struct GridFsObjectStore {
    bucket: GridFsBucket,
}

impl GridFsObjectStore {
    pub fn new(db: &Database) -> Self {
        let options = GridFsBucketOptions::builder()
            .bucket_name(MEDIA_BUCKET.to_string())
            .build();
        Self {
            bucket: db.gridfs_bucket(options),
        }
    }
}

#[async_trait]
impl ObjectStore for GridFsObjectStore {
    #[instrument(skip(self, upload), fields(filename = %upload.filename, size = upload.bytes.len()))]
    async fn put(&self, upload: BlobUpload) -> StoreResult<ObjectId> {
        let metadata = blob_metadata(&upload);
        let mut stream = self
            .bucket
            .open_upload_stream(&upload.filename)
            .metadata(metadata)
            .await?;
        stream.write_all(&upload.bytes).await?;
        stream.close().await?;

        let id = stream.id().clone();
        debug!(%id, "blob written to GridFS");
        id.as_object_id().ok_or_else(|| StoreError::DataIntegrity {
            collection: format!("{MEDIA_BUCKET}.files"),
            reason: format!("file id {id} is not an ObjectId"),
        })
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &ObjectId) -> StoreResult<Option<Blob>> {
        let Some(file) = self.bucket.find_one(doc! { "_id": *id }).await? else {
            return Ok(None);
        };

        let mut download = self
            .bucket
            .open_download_stream(Bson::ObjectId(*id))
            .await?;
        let mut buf = Vec::with_capacity(usize::try_from(file.length).unwrap_or_default());
        download.read_to_end(&mut buf).await?;

        let metadata = file.metadata.unwrap_or_default();
        let uploaded_at = DateTime::<Utc>::from_timestamp_millis(file.upload_date.timestamp_millis())
            .unwrap_or_else(Utc::now);

        Ok(Some(Blob {
            id: *id,
            filename: file.filename.unwrap_or_else(|| id.to_hex()),
            content_type: metadata.get_str(CONTENT_TYPE_KEY).ok().map(str::to_string),
            etag: metadata.get_str(MD5_KEY).ok().map(str::to_string),
            metadata,
            uploaded_at,
            bytes: Bytes::from(buf),
        }))
    }
}

//! Media attachments for venues and events.
//!
//! A blob lives in the object store; the owner record only keeps its id in
//! the slot's field. Re-uploading overwrites that id and leaves the previous
//! blob in the store.

use super::{ServiceError, ServiceResult, parse_id};
use crate::{
    models::{DEFAULT_CONTENT_TYPE, Event, MediaSlot, Venue},
    store::{BlobUpload, DocumentStore, ObjectStore, decode},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use mongodb::bson::{Document, doc, oid::ObjectId};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A resolved attachment, ready to be streamed back.
#[derive(Debug, Clone)]
pub struct MediaContent {
    pub bytes: Bytes,
    pub content_type: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub etag: Option<String>,
}

#[derive(Clone)]
pub struct MediaService {
    documents: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStore>,
}

impl MediaService {
    pub fn new(documents: Arc<dyn DocumentStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { documents, objects }
    }

    /// Store `upload` and point the owner's slot at it. Returns the blob id.
    #[instrument(skip(self, upload), fields(filename = %upload.filename, size = upload.bytes.len()))]
    pub async fn attach(
        &self,
        slot: MediaSlot,
        owner_id: &str,
        upload: MediaUpload,
    ) -> ServiceResult<ObjectId> {
        let owner = slot.owner();
        let id = parse_id(owner, owner_id)?;

        if slot.checks_owner_first()
            && self
                .documents
                .find_one(owner.collection(), &id)
                .await?
                .is_none()
        {
            return Err(ServiceError::NotFound(owner));
        }

        let blob_id = self
            .objects
            .put(BlobUpload {
                filename: upload.filename,
                content_type: upload.content_type,
                metadata: doc! { "type": slot.tag(), "owner_id": id.to_hex() },
                bytes: upload.bytes,
            })
            .await?;

        let mut fields = Document::new();
        fields.insert(slot.field(), blob_id);
        if !self
            .documents
            .update_fields(owner.collection(), &id, fields)
            .await?
        {
            warn!(%blob_id, owner_id = %id, "owner missing after upload, blob left orphaned");
            return Err(ServiceError::NotFound(owner));
        }

        info!(%blob_id, owner_id = %id, "attachment stored");
        Ok(blob_id)
    }

    /// Look up the blob currently attached to the owner's slot.
    #[instrument(skip(self))]
    pub async fn resolve(&self, slot: MediaSlot, owner_id: &str) -> ServiceResult<MediaContent> {
        let owner = slot.owner();
        let id = parse_id(owner, owner_id)?;

        let document = self
            .documents
            .find_one(owner.collection(), &id)
            .await?
            .ok_or(ServiceError::NotFound(owner))?;
        let blob_id = attachment(slot, document)?.ok_or(ServiceError::NotFound(owner))?;

        let blob = self
            .objects
            .get(&blob_id)
            .await?
            .ok_or(ServiceError::NotFound(owner))?;

        Ok(MediaContent {
            bytes: blob.bytes,
            content_type: blob
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            filename: blob.filename,
            uploaded_at: blob.uploaded_at,
            etag: blob.etag,
        })
    }
}

/// Decode the owner record and read the slot's blob id.
fn attachment(slot: MediaSlot, document: Document) -> ServiceResult<Option<ObjectId>> {
    let collection = slot.owner().collection();
    Ok(match slot {
        MediaSlot::Photo => decode::<Venue>(collection, document)?.photo_id,
        MediaSlot::Poster => decode::<Event>(collection, document)?.poster_id,
        MediaSlot::PromoVideo => decode::<Event>(collection, document)?.promo_video_id,
    })
}

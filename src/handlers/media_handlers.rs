//! Upload and download of venue/event media.
//!
//! Uploads are `multipart/form-data` with the payload in a field named
//! `file`. Downloads return the raw bytes with the stored content type.

use crate::{
    errors::AppError,
    models::MediaSlot,
    services::{MediaContent, MediaService, MediaUpload, ServiceError},
};
use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: String,
}

/// `POST /venues/{id}/photo`
pub async fn upload_venue_photo(
    State(media): State<MediaService>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    upload(&media, MediaSlot::Photo, &id, multipart).await
}

/// `GET /venues/{id}/photo`
pub async fn get_venue_photo(
    State(media): State<MediaService>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    download(&media, MediaSlot::Photo, &id).await
}

/// `POST /events/{id}/poster`
pub async fn upload_event_poster(
    State(media): State<MediaService>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    upload(&media, MediaSlot::Poster, &id, multipart).await
}

/// `GET /events/{id}/poster`
pub async fn get_event_poster(
    State(media): State<MediaService>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    download(&media, MediaSlot::Poster, &id).await
}

/// `POST /events/{id}/promo-video`
pub async fn upload_event_promo_video(
    State(media): State<MediaService>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    upload(&media, MediaSlot::PromoVideo, &id, multipart).await
}

/// `GET /events/{id}/promo-video`
pub async fn get_event_promo_video(
    State(media): State<MediaService>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    download(&media, MediaSlot::PromoVideo, &id).await
}

async fn upload(
    media: &MediaService,
    slot: MediaSlot,
    owner_id: &str,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let upload = read_file_field(slot, multipart?).await?;
    let blob_id = media.attach(slot, owner_id, upload).await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            id: blob_id.to_hex(),
        }),
    ))
}

/// Pull the `file` field out of the form; other fields are ignored.
async fn read_file_field(slot: MediaSlot, mut multipart: Multipart) -> Result<MediaUpload, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| slot.tag().to_string());
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        return Ok(MediaUpload {
            filename,
            content_type,
            bytes,
        });
    }
    Err(ServiceError::validation(FILE_FIELD, "field required").into())
}

async fn download(media: &MediaService, slot: MediaSlot, owner_id: &str) -> Result<Response, AppError> {
    let content = media.resolve(slot, owner_id).await?;
    let mut response = Response::new(Body::empty());
    set_media_headers(response.headers_mut(), &content);
    *response.body_mut() = Body::from(content.bytes);
    *response.status_mut() = StatusCode::OK;
    Ok(response)
}

fn set_media_headers(headers: &mut HeaderMap, content: &MediaContent) {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&content.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content.bytes.len()));

    let disposition = format!(
        "inline; filename=\"{}\"",
        content.filename.replace(['"', '\\'], "_")
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    if let Some(etag) = content.etag.as_ref() {
        if let Ok(value) = HeaderValue::from_str(&format!("\"{}\"", etag)) {
            headers.insert(header::ETAG, value);
        }
    }

    let last_modified = content
        .uploaded_at
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();
    if let Ok(value) = HeaderValue::from_str(&last_modified) {
        headers.insert(header::LAST_MODIFIED, value);
    }
}

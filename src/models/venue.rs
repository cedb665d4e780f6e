//! A place where events happen.

use super::{EntityKind, Resource, hex_id};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /venues` and `PUT /venues/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct VenueInput {
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub name: String,

    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub address: String,

    #[validate(range(min = 1, message = "must be at least 1"))]
    pub capacity: i64,
}

/// A stored venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(rename(deserialize = "_id"), serialize_with = "hex_id::serialize")]
    pub id: ObjectId,

    pub name: String,

    pub address: String,

    pub capacity: i64,

    /// Blob id of the venue photo, set by a photo upload.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "hex_id::option::serialize"
    )]
    pub photo_id: Option<ObjectId>,
}

impl Resource for Venue {
    const KIND: EntityKind = EntityKind::Venue;
    const FIELDS: &'static [&'static str] = &["name", "address", "capacity"];

    type Input = VenueInput;
}

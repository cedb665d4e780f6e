//! A scheduled event held at a venue.

use super::{EntityKind, Reference, Resource, hex_id};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EventInput {
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Must name an existing venue when the event is written.
    pub venue_id: String,

    /// Free-form date string; not parsed.
    #[validate(length(min = 4, message = "must be at least 4 characters"))]
    pub date: String,

    #[validate(range(min = 1, message = "must be at least 1"))]
    pub max_attendees: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename(deserialize = "_id"), serialize_with = "hex_id::serialize")]
    pub id: ObjectId,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub venue_id: String,

    pub date: String,

    pub max_attendees: i64,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "hex_id::option::serialize"
    )]
    pub poster_id: Option<ObjectId>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "hex_id::option::serialize"
    )]
    pub promo_video_id: Option<ObjectId>,
}

impl Resource for Event {
    const KIND: EntityKind = EntityKind::Event;
    const FIELDS: &'static [&'static str] =
        &["name", "description", "venue_id", "date", "max_attendees"];

    type Input = EventInput;

    fn references(input: &EventInput) -> Vec<Reference<'_>> {
        vec![Reference {
            kind: EntityKind::Venue,
            id: &input.venue_id,
        }]
    }
}

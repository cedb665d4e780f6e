use super::{EntityKind, Resource, hex_id};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AttendeeInput {
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub name: String,

    /// Only the length is checked, not the address format.
    #[validate(length(min = 5, message = "must be at least 5 characters"))]
    pub email: String,

    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    #[serde(rename(deserialize = "_id"), serialize_with = "hex_id::serialize")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Resource for Attendee {
    const KIND: EntityKind = EntityKind::Attendee;
    const FIELDS: &'static [&'static str] = &["name", "email", "phone"];

    type Input = AttendeeInput;
}

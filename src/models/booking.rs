//! A reservation of tickets to an event by an attendee.
//!
//! `tickets` is not compared against the event's `max_attendees` nor against
//! other bookings; there is no capacity enforcement.

use super::{EntityKind, Reference, Resource, hex_id};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BookingInput {
    pub event_id: String,

    pub attendee_id: String,

    #[validate(range(min = 1, message = "must be at least 1"))]
    pub tickets: i64,

    #[validate(length(min = 4, message = "must be at least 4 characters"))]
    pub booking_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename(deserialize = "_id"), serialize_with = "hex_id::serialize")]
    pub id: ObjectId,
    pub event_id: String,
    pub attendee_id: String,
    pub tickets: i64,
    pub booking_date: String,
}

impl Resource for Booking {
    const KIND: EntityKind = EntityKind::Booking;
    const FIELDS: &'static [&'static str] = &["event_id", "attendee_id", "tickets", "booking_date"];

    type Input = BookingInput;

    /// Event first, then attendee.
    fn references(input: &BookingInput) -> Vec<Reference<'_>> {
        vec![
            Reference {
                kind: EntityKind::Event,
                id: &input.event_id,
            },
            Reference {
                kind: EntityKind::Attendee,
                id: &input.attendee_id,
            },
        ]
    }
}

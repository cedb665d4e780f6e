//! Resource records and their inputs.
//!
//! Each resource has two shapes:
//! - an *input* (`VenueInput`, ...) deserialized from request bodies and
//!   validated with `validator`; it is also exactly what gets written to the
//!   document store
//! - a *record* (`Venue`, ...) decoded from a stored document, carrying the
//!   `_id` and any attachment ids; it serializes to JSON with hex-string ids

pub mod attendee;
pub mod booking;
pub mod event;
pub mod media;
pub mod venue;

pub use attendee::{Attendee, AttendeeInput};
pub use booking::{Booking, BookingInput};
pub use event::{Event, EventInput};
pub use media::{DEFAULT_CONTENT_TYPE, MediaSlot};
pub use venue::{Venue, VenueInput};

use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use validator::Validate;

/// The four resource types managed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Venue,
    Event,
    Attendee,
    Booking,
}

impl EntityKind {
    /// Collection holding documents of this kind.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Venue => "venues",
            Self::Event => "events",
            Self::Attendee => "attendees",
            Self::Booking => "bookings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Venue => "Venue",
            Self::Event => "Event",
            Self::Attendee => "Attendee",
            Self::Booking => "Booking",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A foreign-key-like field of an input, checked for existence on write.
#[derive(Debug, Clone, Copy)]
pub struct Reference<'a> {
    pub kind: EntityKind,
    pub id: &'a str,
}

/// Ties a stored record to its input type and collection.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;

    type Input: Validate + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Input fields in declaration order; the first failing one is reported.
    const FIELDS: &'static [&'static str];

    /// Reference fields of `input`, in the order they must be checked.
    fn references(_input: &Self::Input) -> Vec<Reference<'_>> {
        Vec::new()
    }
}

/// Serde helpers rendering `ObjectId`s as plain hex strings in JSON output.
pub(crate) mod hex_id {
    use mongodb::bson::oid::ObjectId;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_hex())
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            id: &Option<ObjectId>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match id {
                Some(id) => serializer.serialize_some(&id.to_hex()),
                None => serializer.serialize_none(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_collections_and_labels() {
        assert_eq!(EntityKind::Venue.collection(), "venues");
        assert_eq!(EntityKind::Booking.collection(), "bookings");
        assert_eq!(EntityKind::Attendee.to_string(), "Attendee");
    }
}

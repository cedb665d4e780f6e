//! Attachment slots: which blob field on which owner record.

use super::EntityKind;
use std::fmt;

/// Content type reported when a blob was stored without one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    /// `Venue.photo_id`
    Photo,
    /// `Event.poster_id`
    Poster,
    /// `Event.promo_video_id`
    PromoVideo,
}

impl MediaSlot {
    pub fn owner(self) -> EntityKind {
        match self {
            Self::Photo => EntityKind::Venue,
            Self::Poster | Self::PromoVideo => EntityKind::Event,
        }
    }

    /// Field on the owner document holding the blob id.
    pub fn field(self) -> &'static str {
        match self {
            Self::Photo => "photo_id",
            Self::Poster => "poster_id",
            Self::PromoVideo => "promo_video_id",
        }
    }

    /// Tag stored as `type` in the blob metadata.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Poster => "poster",
            Self::PromoVideo => "promo_video",
        }
    }

    /// Whether the owner must exist before the blob is stored.
    ///
    /// Poster and promo-video uploads store first and only find out about a
    /// missing event when the attachment field is written, which leaves the
    /// blob orphaned.
    pub fn checks_owner_first(self) -> bool {
        matches!(self, Self::Photo)
    }
}

impl fmt::Display for MediaSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

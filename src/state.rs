//! Shared router state: every service, built once from the two adapters.

use crate::{
    models::{Attendee, Booking, Event, Venue},
    services::{MediaService, ResourceService},
    store::{DocumentStore, ObjectStore},
};
use axum::extract::FromRef;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    pub venues: ResourceService<Venue>,
    pub events: ResourceService<Event>,
    pub attendees: ResourceService<Attendee>,
    pub bookings: ResourceService<Booking>,
    pub media: MediaService,
}

impl AppState {
    pub fn new(documents: Arc<dyn DocumentStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self {
            venues: ResourceService::new(Arc::clone(&documents)),
            events: ResourceService::new(Arc::clone(&documents)),
            attendees: ResourceService::new(Arc::clone(&documents)),
            bookings: ResourceService::new(Arc::clone(&documents)),
            media: MediaService::new(Arc::clone(&documents), objects),
            documents,
        }
    }
}

impl FromRef<AppState> for ResourceService<Venue> {
    fn from_ref(state: &AppState) -> Self {
        state.venues.clone()
    }
}

impl FromRef<AppState> for ResourceService<Event> {
    fn from_ref(state: &AppState) -> Self {
        state.events.clone()
    }
}

impl FromRef<AppState> for ResourceService<Attendee> {
    fn from_ref(state: &AppState) -> Self {
        state.attendees.clone()
    }
}

impl FromRef<AppState> for ResourceService<Booking> {
    fn from_ref(state: &AppState) -> Self {
        state.bookings.clone()
    }
}

impl FromRef<AppState> for MediaService {
    fn from_ref(state: &AppState) -> Self {
        state.media.clone()
    }
}

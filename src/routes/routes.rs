//! Defines every HTTP route of the API.
//!
//! ## Structure
//! - **Service endpoints**
//!   - `GET /` — liveness message
//!   - `GET /health/db` — document store ping
//!
//! - **Resource endpoints** for `venues`, `events`, `attendees`, `bookings`
//!   - `POST   /{resource}` — create
//!   - `GET    /{resource}` — list
//!   - `GET    /{resource}/{id}` — fetch one
//!   - `PUT    /{resource}/{id}` — replace
//!   - `DELETE /{resource}/{id}` — delete
//!
//! - **Media endpoints** (multipart upload / raw download)
//!   - `POST|GET /venues/{id}/photo`
//!   - `POST|GET /events/{id}/poster`
//!   - `POST|GET /events/{id}/promo-video`

use crate::{
    handlers::{
        health_handlers::{database_health, root},
        media_handlers::{
            get_event_poster, get_event_promo_video, get_venue_photo, upload_event_poster,
            upload_event_promo_video, upload_venue_photo,
        },
        resource_handlers,
    },
    models::{Attendee, Booking, Event, Resource, Venue},
    services::ResourceService,
    state::AppState,
};
use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::get,
};

/// Largest accepted media upload.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Build and return the router for the whole API.
///
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health/db", get(database_health))
        .merge(resource_routes::<Venue>("/venues"))
        .merge(resource_routes::<Event>("/events"))
        .merge(resource_routes::<Attendee>("/attendees"))
        .merge(resource_routes::<Booking>("/bookings"))
        .merge(media_routes())
}

/// CRUD routes for one resource type mounted at `path`.
fn resource_routes<R: Resource>(path: &str) -> Router<AppState>
where
    ResourceService<R>: FromRef<AppState>,
{
    Router::new()
        .route(
            path,
            get(resource_handlers::list::<R>).post(resource_handlers::create::<R>),
        )
        .route(
            &format!("{path}/{{id}}"),
            get(resource_handlers::fetch::<R>)
                .put(resource_handlers::update::<R>)
                .delete(resource_handlers::delete::<R>),
        )
}

fn media_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/venues/{id}/photo",
            get(get_venue_photo).post(upload_venue_photo),
        )
        .route(
            "/events/{id}/poster",
            get(get_event_poster).post(upload_event_poster),
        )
        .route(
            "/events/{id}/promo-video",
            get(get_event_promo_video).post(upload_event_promo_video),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

//! Event management API: venues, events, attendees and bookings over a
//! document store, with media attachments kept in a large-object store.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::Router;
use state::AppState;
use std::sync::Arc;
use store::{DocumentStore, MemoryDocumentStore, MemoryObjectStore, ObjectStore};

/// Build the application router over the given adapters.
pub fn app(documents: Arc<dyn DocumentStore>, objects: Arc<dyn ObjectStore>) -> Router {
    routes::routes::routes().with_state(AppState::new(documents, objects))
}

/// Application backed by the in-process stores.
pub fn in_memory_app(database: &str) -> Router {
    app(
        Arc::new(MemoryDocumentStore::new(database)),
        Arc::new(MemoryObjectStore::new()),
    )
}

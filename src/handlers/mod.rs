//! HTTP handlers. They only extract, delegate to a service and shape the response.

pub mod health_handlers;
pub mod media_handlers;
pub mod resource_handlers;

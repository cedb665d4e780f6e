//! Resource and media services.
//!
//! Services own validation, id parsing and referential checks, and delegate
//! persistence to the adapters in `crate::store`.

pub mod media_service;
pub mod resource_service;

pub use media_service::{MediaContent, MediaService, MediaUpload};
pub use resource_service::ResourceService;

use crate::{models::EntityKind, store::StoreError};
use mongodb::bson::oid::ObjectId;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The id is not a well-formed `ObjectId`; storage was never consulted.
    #[error("Invalid {0} id")]
    InvalidId(EntityKind),
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    #[error("{0} not found")]
    NotFound(EntityKind),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Pick the first failing field, following `order`, from a validator report.
    pub(crate) fn from_validation(errors: &ValidationErrors, order: &[&str]) -> Self {
        let field_errors = errors.field_errors();
        let field = order
            .iter()
            .copied()
            .find(|field| field_errors.contains_key(*field))
            .map(str::to_string)
            .or_else(|| {
                let mut fields: Vec<String> = field_errors.keys().map(|k| k.to_string()).collect();
                fields.sort();
                fields.into_iter().next()
            })
            .unwrap_or_default();

        let message = field_errors
            .get(field.as_str())
            .and_then(|errs| errs.first())
            .map(|err| match &err.message {
                Some(message) => message.to_string(),
                None => err.code.to_string(),
            })
            .unwrap_or_else(|| "is invalid".to_string());

        Self::validation(field, message)
    }
}

/// Parse a client-supplied id for an entity of `kind`.
pub fn parse_id(kind: EntityKind, raw: &str) -> ServiceResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| ServiceError::InvalidId(kind))
}

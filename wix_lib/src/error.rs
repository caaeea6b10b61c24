//! Error types for the library layer.

use std::fmt;

use wix_api::TranslationError;

use crate::db::StoreError;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding translation, storage, serialization, and input validation failures.
#[derive(Debug)]
pub enum WixError {
    /// An error from the underlying API client.
    Api(wix_api::Error),
    /// A translation request rejected before it was sent.
    Translation(TranslationError),
    /// The event sequence store failed.
    Store(StoreError),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// The service returned a cursor chain that does not terminate.
    Pagination(String),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl WixError {
    /// The translation failure behind this error, whether detected locally or
    /// reported by the service.
    pub fn translation_error(&self) -> Option<TranslationError> {
        match self {
            Self::Translation(e) => Some(e.clone()),
            Self::Api(e) => e
                .application_error()
                .map(TranslationError::from_application_error),
            _ => None,
        }
    }
}

impl fmt::Display for WixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Translation(e) => write!(f, "Translation rejected: {}", e),
            Self::Store(e) => write!(f, "Store error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::Pagination(msg) => write!(f, "Pagination error: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for WixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wix_api::Error> for WixError {
    fn from(e: wix_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<TranslationError> for WixError {
    fn from(e: TranslationError) -> Self {
        Self::Translation(e)
    }
}

impl From<StoreError> for WixError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<serde_json::Error> for WixError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

use dcw_types::models::ComplaintId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A mandatory field was missing or held an unknown value.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unknown identifier or wrong secret. Deliberately does not say which.
    #[error("invalid credentials")]
    Auth,

    #[error("complaint {0} not found")]
    NotFound(ComplaintId),

    #[error("secret hashing failed: {0}")]
    Hashing(String),
}

impl StoreError {
    pub(crate) fn missing(field: &str) -> Self {
        Self::Validation(format!("{field} is required"))
    }
}

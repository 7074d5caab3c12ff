use std::time::Duration;

use thiserror::Error;

use crate::{Collection, StoreOp};

/// Library-local result type.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Typed error for the document store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No document matched in collection '{collection}'")]
    NotFound { collection: Collection },

    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },

    #[error("Unsupported store URI: {0}")]
    UnsupportedUri(String),

    #[error("Duplicate _id {id} in collection '{collection}'")]
    DuplicateKey { collection: Collection, id: String },

    #[error("Invalid update: {message}")]
    InvalidUpdate { message: String },

    #[error(transparent)]
    Encode(#[from] bson::ser::Error),

    #[error(transparent)]
    Decode(#[from] bson::de::Error),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error("Injected fault on {op:?} against '{collection}'")]
    InjectedFault { op: StoreOp, collection: Collection },
}

impl StoreError {
    pub fn not_found(collection: Collection) -> Self {
        Self::NotFound { collection }
    }

    pub fn timeout(op: &'static str, after: Duration) -> Self {
        Self::Timeout { op, after }
    }

    pub fn invalid_update(message: impl Into<String>) -> Self {
        Self::InvalidUpdate {
            message: message.into(),
        }
    }

    /// True for the "no matching document" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

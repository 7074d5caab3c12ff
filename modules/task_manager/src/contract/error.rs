use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskManagerError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Invalid {kind} reference: '{value}'")]
    InvalidReference { kind: &'static str, value: String },

    #[error("Parent {resource} not found: {id}")]
    ParentNotFound { resource: &'static str, id: String },

    /// A multi-step write stopped halfway; `ids` are the records left
    /// inconsistent (orphans or dangling references).
    #[error("Partial write during {operation}; inconsistent ids: {ids:?}")]
    PartialWrite {
        operation: &'static str,
        ids: Vec<String>,
    },

    #[error("Internal error")]
    Internal,
}

impl TaskManagerError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn invalid_reference(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidReference {
            kind,
            value: value.into(),
        }
    }

    pub fn parent_not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::ParentNotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn partial_write(operation: &'static str, ids: Vec<String>) -> Self {
        Self::PartialWrite { operation, ids }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmployeesError {
    #[error("Employee not found: {id}")]
    NotFound { id: i64 },

    #[error("Internal error")]
    Internal,
}

impl EmployeesError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

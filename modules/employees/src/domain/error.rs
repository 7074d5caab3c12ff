use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Employee not found: {id}")]
    EmployeeNotFound { id: i64 },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn employee_not_found(id: i64) -> Self {
        Self::EmployeeNotFound { id }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

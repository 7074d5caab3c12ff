use docstore::StoreError;
use thiserror::Error;

use crate::contract::model::{ProjectId, TaskId, UserId};

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: UserId },

    #[error("Project not found: {id}")]
    ProjectNotFound { id: ProjectId },

    #[error("Task not found: {id}")]
    TaskNotFound { id: TaskId },

    /// The parent named at creation time does not exist.
    #[error("Parent {resource} not found: {id}")]
    ParentNotFound { resource: &'static str, id: String },

    /// A two-collection write failed after its first step and could not be
    /// undone. `ids` name the orphaned children or dangling references.
    #[error("Partial write during {operation} (ids: {ids:?}): {source}")]
    PartialWrite {
        operation: &'static str,
        ids: Vec<String>,
        #[source]
        source: StoreError,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn user_not_found(id: UserId) -> Self {
        Self::UserNotFound { id }
    }

    pub fn project_not_found(id: ProjectId) -> Self {
        Self::ProjectNotFound { id }
    }

    pub fn task_not_found(id: TaskId) -> Self {
        Self::TaskNotFound { id }
    }

    pub fn parent_not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::ParentNotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn partial_write<I, T>(operation: &'static str, ids: I, source: StoreError) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self::PartialWrite {
            operation,
            ids: ids.into_iter().map(|id| id.to_string()).collect(),
            source,
        }
    }

    /// True for every "no such entity" variant.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound { .. } | Self::ProjectNotFound { .. } | Self::TaskNotFound { .. }
        )
    }
}

use async_trait::async_trait;

use crate::contract::model::{
    NewProject, NewTask, NewUser, Project, ProjectId, ProjectPatch, Task, TaskId, TaskPatch, User,
    UserId, UserPatch,
};

/// Public API of the task_manager module for in-process consumers.
///
/// Errors are [`crate::contract::error::TaskManagerError`] wrapped in `anyhow`.
#[async_trait]
pub trait TaskManagerApi: Send + Sync {
    async fn list_users(&self) -> anyhow::Result<Vec<User>>;
    async fn get_user(&self, id: UserId) -> anyhow::Result<User>;
    async fn create_user(&self, new_user: NewUser) -> anyhow::Result<User>;
    async fn update_user(&self, id: UserId, patch: UserPatch) -> anyhow::Result<User>;
    /// Replace only the non-empty / non-zero fields of `payload`.
    async fn overwrite_user(&self, id: UserId, payload: NewUser) -> anyhow::Result<User>;
    async fn delete_user(&self, id: UserId) -> anyhow::Result<()>;

    async fn list_projects(&self) -> anyhow::Result<Vec<Project>>;
    async fn list_user_projects(&self, user: UserId) -> anyhow::Result<Vec<Project>>;
    async fn get_project(&self, user: UserId, project: ProjectId) -> anyhow::Result<Project>;
    async fn create_project(&self, user: UserId, new_project: NewProject)
        -> anyhow::Result<Project>;
    async fn update_project(
        &self,
        user: UserId,
        project: ProjectId,
        patch: ProjectPatch,
    ) -> anyhow::Result<Project>;
    async fn overwrite_project(
        &self,
        user: UserId,
        project: ProjectId,
        payload: NewProject,
    ) -> anyhow::Result<Project>;
    async fn delete_project(&self, project: ProjectId) -> anyhow::Result<()>;
    /// Returns the number of removed projects.
    async fn delete_projects(&self, user: UserId, ids: Vec<ProjectId>) -> anyhow::Result<u64>;

    async fn list_tasks(&self) -> anyhow::Result<Vec<Task>>;
    async fn list_project_tasks(&self, project: ProjectId) -> anyhow::Result<Vec<Task>>;
    async fn get_task(&self, project: ProjectId, task: TaskId) -> anyhow::Result<Task>;
    async fn create_task(&self, project: ProjectId, new_task: NewTask) -> anyhow::Result<Task>;
    async fn update_task(
        &self,
        project: ProjectId,
        task: TaskId,
        patch: TaskPatch,
    ) -> anyhow::Result<Task>;
    async fn delete_task(&self, project: ProjectId, task: TaskId) -> anyhow::Result<()>;
    /// Returns the number of removed tasks.
    async fn delete_tasks(&self, project: ProjectId, ids: Vec<TaskId>) -> anyhow::Result<u64>;
}

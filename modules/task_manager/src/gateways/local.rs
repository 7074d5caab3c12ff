use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::TaskManagerApi,
    error::TaskManagerError,
    model::{
        NewProject, NewTask, NewUser, Project, ProjectId, ProjectPatch, Task, TaskId, TaskPatch,
        User, UserId, UserPatch,
    },
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the TaskManagerApi trait that delegates to the domain service
pub struct TaskManagerLocalClient {
    service: Arc<Service>,
}

impl TaskManagerLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TaskManagerApi for TaskManagerLocalClient {
    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        self.service.list_users().await.map_err(to_anyhow)
    }

    async fn get_user(&self, id: UserId) -> anyhow::Result<User> {
        self.service.get_user(id).await.map_err(to_anyhow)
    }

    async fn create_user(&self, new_user: NewUser) -> anyhow::Result<User> {
        self.service.create_user(new_user).await.map_err(to_anyhow)
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> anyhow::Result<User> {
        self.service.update_user(id, patch).await.map_err(to_anyhow)
    }

    async fn overwrite_user(&self, id: UserId, payload: NewUser) -> anyhow::Result<User> {
        self.service
            .overwrite_user(id, payload)
            .await
            .map_err(to_anyhow)
    }

    async fn delete_user(&self, id: UserId) -> anyhow::Result<()> {
        self.service.delete_user(id).await.map_err(to_anyhow)
    }

    async fn list_projects(&self) -> anyhow::Result<Vec<Project>> {
        self.service.list_projects().await.map_err(to_anyhow)
    }

    async fn list_user_projects(&self, user: UserId) -> anyhow::Result<Vec<Project>> {
        self.service
            .list_user_projects(user)
            .await
            .map_err(to_anyhow)
    }

    async fn get_project(&self, user: UserId, project: ProjectId) -> anyhow::Result<Project> {
        self.service
            .get_project(user, project)
            .await
            .map_err(to_anyhow)
    }

    async fn create_project(
        &self,
        user: UserId,
        new_project: NewProject,
    ) -> anyhow::Result<Project> {
        self.service
            .create_project(user, new_project)
            .await
            .map_err(to_anyhow)
    }

    async fn update_project(
        &self,
        user: UserId,
        project: ProjectId,
        patch: ProjectPatch,
    ) -> anyhow::Result<Project> {
        self.service
            .update_project(user, project, patch)
            .await
            .map_err(to_anyhow)
    }

    async fn overwrite_project(
        &self,
        user: UserId,
        project: ProjectId,
        payload: NewProject,
    ) -> anyhow::Result<Project> {
        self.service
            .overwrite_project(user, project, payload)
            .await
            .map_err(to_anyhow)
    }

    async fn delete_project(&self, project: ProjectId) -> anyhow::Result<()> {
        self.service
            .delete_project(project)
            .await
            .map_err(to_anyhow)
    }

    async fn delete_projects(&self, user: UserId, ids: Vec<ProjectId>) -> anyhow::Result<u64> {
        self.service
            .delete_projects(user, ids)
            .await
            .map_err(to_anyhow)
    }

    async fn list_tasks(&self) -> anyhow::Result<Vec<Task>> {
        self.service.list_tasks().await.map_err(to_anyhow)
    }

    async fn list_project_tasks(&self, project: ProjectId) -> anyhow::Result<Vec<Task>> {
        self.service
            .list_project_tasks(project)
            .await
            .map_err(to_anyhow)
    }

    async fn get_task(&self, project: ProjectId, task: TaskId) -> anyhow::Result<Task> {
        self.service
            .get_task(project, task)
            .await
            .map_err(to_anyhow)
    }

    async fn create_task(&self, project: ProjectId, new_task: NewTask) -> anyhow::Result<Task> {
        self.service
            .create_task(project, new_task)
            .await
            .map_err(to_anyhow)
    }

    async fn update_task(
        &self,
        project: ProjectId,
        task: TaskId,
        patch: TaskPatch,
    ) -> anyhow::Result<Task> {
        self.service
            .update_task(project, task, patch)
            .await
            .map_err(to_anyhow)
    }

    async fn delete_task(&self, project: ProjectId, task: TaskId) -> anyhow::Result<()> {
        self.service
            .delete_task(project, task)
            .await
            .map_err(to_anyhow)
    }

    async fn delete_tasks(&self, project: ProjectId, ids: Vec<TaskId>) -> anyhow::Result<u64> {
        self.service
            .delete_tasks(project, ids)
            .await
            .map_err(to_anyhow)
    }
}

impl From<DomainError> for TaskManagerError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UserNotFound { id } => Self::not_found(UserId::KIND, id),
            DomainError::ProjectNotFound { id } => Self::not_found(ProjectId::KIND, id),
            DomainError::TaskNotFound { id } => Self::not_found(TaskId::KIND, id),
            DomainError::ParentNotFound { resource, id } => Self::parent_not_found(resource, id),
            DomainError::PartialWrite { operation, ids, .. } => Self::partial_write(operation, ids),
            DomainError::Store(_) => Self::internal(),
        }
    }
}

/// Map domain errors to contract errors wrapped in anyhow. Store failures stay
/// in the chain underneath the contract error.
fn to_anyhow(err: DomainError) -> anyhow::Error {
    match err {
        DomainError::Store(source) => {
            anyhow::Error::new(source).context(TaskManagerError::internal())
        }
        DomainError::PartialWrite {
            operation,
            ids,
            source,
        } => {
            anyhow::Error::new(source).context(TaskManagerError::partial_write(operation, ids))
        }
        other => anyhow::Error::new(TaskManagerError::from(other)),
    }
}

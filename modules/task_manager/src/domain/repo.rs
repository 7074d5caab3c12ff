use async_trait::async_trait;
use docstore::StoreResult;

use crate::contract::model::{
    Project, ProjectId, ProjectPatch, Task, TaskId, TaskPatch, User, UserId, UserPatch,
};

/// Port for the domain layer: single-collection persistence steps.
///
/// Every method touches exactly one collection with one store call; the
/// service decides the order in which they run. Methods returning `bool`
/// report whether the filter matched a document.
#[async_trait]
pub trait TaskManagerRepository: Send + Sync {
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;
    async fn insert_user(&self, user: &User) -> StoreResult<()>;
    async fn update_user(&self, id: UserId, patch: &UserPatch) -> StoreResult<bool>;
    /// Returns true if a document was deleted.
    async fn delete_user(&self, id: UserId) -> StoreResult<bool>;
    /// Set-add `project` to the user's project array.
    async fn link_project(&self, user: UserId, project: ProjectId) -> StoreResult<bool>;
    /// Set-pull `project` from the user's project array.
    async fn unlink_project(&self, user: UserId, project: ProjectId) -> StoreResult<bool>;
    /// Membership pull of every id in `projects`.
    async fn unlink_projects(&self, user: UserId, projects: &[ProjectId]) -> StoreResult<bool>;

    /// `owner = None` lists every project.
    async fn list_projects(&self, owner: Option<UserId>) -> StoreResult<Vec<Project>>;
    /// `owner = None` looks the project up by id alone.
    async fn find_project(
        &self,
        id: ProjectId,
        owner: Option<UserId>,
    ) -> StoreResult<Option<Project>>;
    /// Subset of `ids` owned by `owner`, in natural order.
    async fn owned_project_ids(&self, owner: UserId, ids: &[ProjectId])
        -> StoreResult<Vec<ProjectId>>;
    async fn insert_project(&self, project: &Project) -> StoreResult<()>;
    async fn update_project(
        &self,
        owner: UserId,
        id: ProjectId,
        patch: &ProjectPatch,
    ) -> StoreResult<bool>;
    async fn delete_project(&self, id: ProjectId) -> StoreResult<bool>;
    /// Delete every listed project owned by `owner`; returns the count.
    async fn delete_projects(&self, owner: UserId, ids: &[ProjectId]) -> StoreResult<u64>;
    async fn link_task(&self, project: ProjectId, task: TaskId) -> StoreResult<bool>;
    async fn unlink_task(&self, project: ProjectId, task: TaskId) -> StoreResult<bool>;
    async fn unlink_tasks(&self, project: ProjectId, tasks: &[TaskId]) -> StoreResult<bool>;

    /// `project = None` lists every task.
    async fn list_tasks(&self, project: Option<ProjectId>) -> StoreResult<Vec<Task>>;
    async fn find_task(&self, project: ProjectId, id: TaskId) -> StoreResult<Option<Task>>;
    async fn insert_task(&self, task: &Task) -> StoreResult<()>;
    async fn update_task(&self, project: ProjectId, id: TaskId, patch: &TaskPatch)
        -> StoreResult<bool>;
    /// Unscoped delete, used to undo an orphaned insert.
    async fn discard_task(&self, id: TaskId) -> StoreResult<bool>;
    async fn delete_task(&self, project: ProjectId, id: TaskId) -> StoreResult<bool>;
    async fn delete_tasks(&self, project: ProjectId, ids: &[TaskId]) -> StoreResult<u64>;
    /// Delete every task belonging to any of `projects`; returns the count.
    async fn delete_tasks_of_projects(&self, projects: &[ProjectId]) -> StoreResult<u64>;
}

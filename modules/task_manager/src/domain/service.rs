use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use docstore::StoreResult;
use tracing::{debug, info, instrument};

use crate::config::TaskManagerConfig;
use crate::contract::model::{
    NewProject, NewTask, NewUser, Project, ProjectId, ProjectPatch, Task, TaskId, TaskPatch, User,
    UserId, UserPatch,
};
use crate::domain::error::DomainError;
use crate::domain::repo::TaskManagerRepository;

/// Coordinator for users, projects and tasks.
///
/// Projects and tasks live in their own collections and their parents carry a
/// denormalized array of child ids. There is no transaction spanning two
/// collections, so every write touching both runs its steps in a fixed order:
///
/// - create: insert child, then set-add its id to the parent. If the parent
///   step fails, the child is deleted again (when `compensate_orphans` is on).
/// - delete: remove children (and, with `cascade_deletes`, grandchildren)
///   first, then pull the ids from the parent.
///
/// A failure after the first step that cannot be undone is reported as
/// [`DomainError::PartialWrite`] naming the affected ids.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn TaskManagerRepository>,
    config: TaskManagerConfig,
}

impl Service {
    pub fn new(repo: Arc<dyn TaskManagerRepository>, config: TaskManagerConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &TaskManagerConfig {
        &self.config
    }

    // ---------------------------------------------------------------- users

    #[instrument(name = "task_manager.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let users = self.repo.list_users().await?;
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "task_manager.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: UserId) -> Result<User, DomainError> {
        debug!("Getting user by id");
        self.repo
            .find_user(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(
        name = "task_manager.service.create_user",
        skip(self, new_user),
        fields(email = %new_user.email)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");
        let user = User {
            id: UserId::generate(),
            name: new_user.name,
            occupation: new_user.occupation,
            age: new_user.age,
            salary: new_user.salary,
            email: new_user.email,
            projects: Vec::new(),
        };
        self.repo.insert_user(&user).await?;
        info!(user_id = %user.id, "Successfully created user");
        Ok(user)
    }

    /// Sparse update; an empty patch only checks that the user exists.
    #[instrument(
        name = "task_manager.service.update_user",
        skip(self, patch),
        fields(user_id = %id)
    )]
    pub async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");
        if !patch.is_empty() && !self.repo.update_user(id, &patch).await? {
            return Err(DomainError::user_not_found(id));
        }
        self.get_user(id).await
    }

    /// Legacy full-object update: only non-empty / non-zero payload fields
    /// replace stored values.
    pub async fn overwrite_user(&self, id: UserId, payload: NewUser) -> Result<User, DomainError> {
        self.update_user(id, UserPatch::from_payload(&payload)).await
    }

    /// Deletes the user; with `cascade_deletes` its projects and their tasks
    /// go first. Deleting a missing user is not an error.
    #[instrument(name = "task_manager.service.delete_user", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), DomainError> {
        info!("Deleting user");

        let mut removed_projects = Vec::new();
        if self.config.cascade_deletes {
            let owned: Vec<ProjectId> = self
                .repo
                .list_projects(Some(id))
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect();

            if !owned.is_empty() {
                let removed_tasks = self.repo.delete_tasks_of_projects(&owned).await?;
                match self.repo.delete_projects(id, &owned).await {
                    Ok(n) => debug!(
                        projects = n,
                        tasks = removed_tasks,
                        "Removed user's projects"
                    ),
                    Err(e) if removed_tasks > 0 => {
                        return Err(DomainError::partial_write("delete_user", &owned, e))
                    }
                    Err(e) => return Err(e.into()),
                }
                removed_projects = owned;
            }
        }

        match self.repo.delete_user(id).await {
            Ok(deleted) => {
                info!(deleted, "User delete finished");
                Ok(())
            }
            Err(e) if !removed_projects.is_empty() => {
                Err(DomainError::partial_write("delete_user", [id], e))
            }
            Err(e) => Err(e.into()),
        }
    }

    // ------------------------------------------------------------- projects

    #[instrument(name = "task_manager.service.list_projects", skip(self))]
    pub async fn list_projects(&self) -> Result<Vec<Project>, DomainError> {
        Ok(self.repo.list_projects(None).await?)
    }

    /// Projects owned by `user`, in insertion order.
    #[instrument(
        name = "task_manager.service.list_user_projects",
        skip(self),
        fields(user_id = %user)
    )]
    pub async fn list_user_projects(&self, user: UserId) -> Result<Vec<Project>, DomainError> {
        let projects = self.repo.list_projects(Some(user)).await?;
        debug!("Listed {} projects", projects.len());
        Ok(projects)
    }

    /// A project under a different owner is reported as not found.
    #[instrument(
        name = "task_manager.service.get_project",
        skip(self),
        fields(user_id = %user, project_id = %project)
    )]
    pub async fn get_project(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> Result<Project, DomainError> {
        debug!("Getting project");
        self.repo
            .find_project(project, Some(user))
            .await?
            .ok_or_else(|| DomainError::project_not_found(project))
    }

    #[instrument(
        name = "task_manager.service.create_project",
        skip(self, new_project),
        fields(user_id = %user, name = %new_project.name)
    )]
    pub async fn create_project(
        &self,
        user: UserId,
        new_project: NewProject,
    ) -> Result<Project, DomainError> {
        info!("Creating new project");
        let project = Project {
            id: ProjectId::generate(),
            user_id: user,
            name: new_project.name,
            description: new_project.description,
            priority: new_project.priority,
            author: new_project.author,
            responsible: new_project.responsible,
            performers: new_project.performers,
            created_at: creation_timestamp(),
            deadline: new_project.deadline,
            guests: new_project.guests,
            status: new_project.status,
            tasks: Vec::new(),
        };

        self.repo.insert_project(&project).await?;

        let cause = match self.repo.link_project(user, project.id).await {
            Ok(true) => {
                info!(project_id = %project.id, "Successfully created project");
                return Ok(project);
            }
            Ok(false) => DomainError::parent_not_found(UserId::KIND, user),
            Err(e) => DomainError::Store(e),
        };

        Err(self
            .settle_orphan(
                "create_project",
                project.id,
                self.repo.delete_project(project.id),
                cause,
            )
            .await)
    }

    /// Sparse update scoped to the owner; an empty patch only checks that the
    /// project exists.
    #[instrument(
        name = "task_manager.service.update_project",
        skip(self, patch),
        fields(user_id = %user, project_id = %project)
    )]
    pub async fn update_project(
        &self,
        user: UserId,
        project: ProjectId,
        patch: ProjectPatch,
    ) -> Result<Project, DomainError> {
        info!("Updating project");
        if !patch.is_empty() && !self.repo.update_project(user, project, &patch).await? {
            return Err(DomainError::project_not_found(project));
        }
        self.get_project(user, project).await
    }

    /// Legacy full-object update: only non-empty / non-zero payload fields
    /// replace stored values.
    pub async fn overwrite_project(
        &self,
        user: UserId,
        project: ProjectId,
        payload: NewProject,
    ) -> Result<Project, DomainError> {
        self.update_project(user, project, ProjectPatch::from_payload(&payload))
            .await
    }

    /// Looks the project up to find its owner, then deletes its tasks (with
    /// `cascade_deletes`), the project, and finally its id in the owner's
    /// array. Nothing is deleted if the lookup fails.
    #[instrument(
        name = "task_manager.service.delete_project",
        skip(self),
        fields(project_id = %project)
    )]
    pub async fn delete_project(&self, project: ProjectId) -> Result<(), DomainError> {
        info!("Deleting project");
        let existing = self
            .repo
            .find_project(project, None)
            .await?
            .ok_or_else(|| DomainError::project_not_found(project))?;

        let removed_tasks = if self.config.cascade_deletes {
            self.repo.delete_tasks_of_projects(&[project]).await?
        } else {
            0
        };

        let deleted = match self.repo.delete_project(project).await {
            Ok(deleted) => deleted,
            Err(e) if removed_tasks > 0 => {
                return Err(DomainError::partial_write("delete_project", [project], e))
            }
            Err(e) => return Err(e.into()),
        };

        match self.repo.unlink_project(existing.user_id, project).await {
            Ok(_) => {
                info!(tasks = removed_tasks, "Successfully deleted project");
                Ok(())
            }
            Err(e) if deleted || removed_tasks > 0 => {
                Err(DomainError::partial_write("delete_project", [project], e))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Bulk delete of `ids` owned by `user`: one multi-delete on projects and
    /// one membership pull on the user. Ids owned by someone else are left
    /// alone. Returns the number of removed projects.
    #[instrument(
        name = "task_manager.service.delete_projects",
        skip(self, ids),
        fields(user_id = %user, requested = ids.len())
    )]
    pub async fn delete_projects(
        &self,
        user: UserId,
        ids: Vec<ProjectId>,
    ) -> Result<u64, DomainError> {
        if ids.is_empty() {
            debug!("Nothing to delete");
            return Ok(0);
        }
        info!("Deleting projects");

        let mut removed_tasks = 0;
        if self.config.cascade_deletes {
            let owned = self.repo.owned_project_ids(user, &ids).await?;
            if !owned.is_empty() {
                removed_tasks = self.repo.delete_tasks_of_projects(&owned).await?;
            }
        }

        let removed = match self.repo.delete_projects(user, &ids).await {
            Ok(n) => n,
            Err(e) if removed_tasks > 0 => {
                return Err(DomainError::partial_write("delete_projects", &ids, e))
            }
            Err(e) => return Err(e.into()),
        };

        match self.repo.unlink_projects(user, &ids).await {
            Ok(_) => {
                info!(removed, tasks = removed_tasks, "Successfully deleted projects");
                Ok(removed)
            }
            Err(e) if removed > 0 || removed_tasks > 0 => {
                Err(DomainError::partial_write("delete_projects", &ids, e))
            }
            Err(e) => Err(e.into()),
        }
    }

    // ---------------------------------------------------------------- tasks

    #[instrument(name = "task_manager.service.list_tasks", skip(self))]
    pub async fn list_tasks(&self) -> Result<Vec<Task>, DomainError> {
        Ok(self.repo.list_tasks(None).await?)
    }

    #[instrument(
        name = "task_manager.service.list_project_tasks",
        skip(self),
        fields(project_id = %project)
    )]
    pub async fn list_project_tasks(&self, project: ProjectId) -> Result<Vec<Task>, DomainError> {
        let tasks = self.repo.list_tasks(Some(project)).await?;
        debug!("Listed {} tasks", tasks.len());
        Ok(tasks)
    }

    /// A task under a different project is reported as not found.
    #[instrument(
        name = "task_manager.service.get_task",
        skip(self),
        fields(project_id = %project, task_id = %task)
    )]
    pub async fn get_task(&self, project: ProjectId, task: TaskId) -> Result<Task, DomainError> {
        debug!("Getting task");
        self.repo
            .find_task(project, task)
            .await?
            .ok_or_else(|| DomainError::task_not_found(task))
    }

    #[instrument(
        name = "task_manager.service.create_task",
        skip(self, new_task),
        fields(project_id = %project, name = %new_task.name)
    )]
    pub async fn create_task(
        &self,
        project: ProjectId,
        new_task: NewTask,
    ) -> Result<Task, DomainError> {
        info!("Creating new task");
        let task = Task {
            id: TaskId::generate(),
            project_id: project,
            name: new_task.name,
            description: new_task.description,
            priority: new_task.priority,
            author: new_task.author,
            responsible: new_task.responsible,
            performers: new_task.performers,
            created_at: creation_timestamp(),
            deadline: new_task.deadline,
            guests: new_task.guests,
            status: new_task.status,
        };

        self.repo.insert_task(&task).await?;

        let cause = match self.repo.link_task(project, task.id).await {
            Ok(true) => {
                info!(task_id = %task.id, "Successfully created task");
                return Ok(task);
            }
            Ok(false) => DomainError::parent_not_found(ProjectId::KIND, project),
            Err(e) => DomainError::Store(e),
        };

        Err(self
            .settle_orphan("create_task", task.id, self.repo.discard_task(task.id), cause)
            .await)
    }

    #[instrument(
        name = "task_manager.service.update_task",
        skip(self, patch),
        fields(project_id = %project, task_id = %task)
    )]
    pub async fn update_task(
        &self,
        project: ProjectId,
        task: TaskId,
        patch: TaskPatch,
    ) -> Result<Task, DomainError> {
        info!("Updating task");
        if !patch.is_empty() && !self.repo.update_task(project, task, &patch).await? {
            return Err(DomainError::task_not_found(task));
        }
        self.get_task(project, task).await
    }

    /// Deletes the task, then pulls its id from the project. A missing task
    /// is not an error.
    #[instrument(
        name = "task_manager.service.delete_task",
        skip(self),
        fields(project_id = %project, task_id = %task)
    )]
    pub async fn delete_task(&self, project: ProjectId, task: TaskId) -> Result<(), DomainError> {
        info!("Deleting task");
        let deleted = self.repo.delete_task(project, task).await?;

        match self.repo.unlink_task(project, task).await {
            Ok(_) => {
                info!(deleted, "Task delete finished");
                Ok(())
            }
            Err(e) if deleted => Err(DomainError::partial_write("delete_task", [task], e)),
            Err(e) => Err(e.into()),
        }
    }

    /// Bulk delete: one multi-delete on tasks, one membership pull on the
    /// project. Returns the number of removed tasks.
    #[instrument(
        name = "task_manager.service.delete_tasks",
        skip(self, ids),
        fields(project_id = %project, requested = ids.len())
    )]
    pub async fn delete_tasks(
        &self,
        project: ProjectId,
        ids: Vec<TaskId>,
    ) -> Result<u64, DomainError> {
        if ids.is_empty() {
            debug!("Nothing to delete");
            return Ok(0);
        }
        info!("Deleting tasks");

        let removed = self.repo.delete_tasks(project, &ids).await?;

        match self.repo.unlink_tasks(project, &ids).await {
            Ok(_) => {
                info!(removed, "Successfully deleted tasks");
                Ok(removed)
            }
            Err(e) if removed > 0 => Err(DomainError::partial_write("delete_tasks", &ids, e)),
            Err(e) => Err(e.into()),
        }
    }

    // -------------------------------------------------------------- helpers

    /// Resolve a create whose parent step failed with `cause`.
    async fn settle_orphan<I, F>(
        &self,
        operation: &'static str,
        orphan: I,
        undo: F,
        cause: DomainError,
    ) -> DomainError
    where
        I: std::fmt::Display,
        F: Future<Output = StoreResult<bool>>,
    {
        if !self.config.compensate_orphans {
            debug!(orphan = %orphan, "Compensation disabled, orphan left in place");
            return cause;
        }
        match undo.await {
            Ok(_) => {
                debug!(orphan = %orphan, "Removed orphaned insert");
                cause
            }
            Err(e) => DomainError::partial_write(operation, [orphan], e),
        }
    }
}

/// Store-precision (milliseconds) "now", so the returned entity equals what a
/// later read yields.
fn creation_timestamp() -> DateTime<Utc> {
    bson::DateTime::now().to_chrono()
}

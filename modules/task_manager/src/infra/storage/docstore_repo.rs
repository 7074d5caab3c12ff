//! `TaskManagerRepository` over the shared document store.

use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use docstore::{Collection, DocStore, DocStoreExt, Filter, StoreResult, Update};

use crate::contract::model::{
    Project, ProjectId, ProjectPatch, Task, TaskId, TaskPatch, User, UserId, UserPatch,
};
use crate::domain::repo::TaskManagerRepository;
use crate::infra::storage::entity::{fields, ProjectDoc, TaskDoc, UserDoc};
use crate::infra::storage::mapper;

pub struct DocStoreRepository {
    store: Arc<dyn DocStore>,
}

impl DocStoreRepository {
    pub fn new(store: Arc<dyn DocStore>) -> Self {
        Self { store }
    }

    /// `find_one` with "no match" folded into `None`.
    async fn find_opt<T>(&self, collection: Collection, filter: Filter) -> StoreResult<Option<T>>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        match self.store.fetch_one::<T>(collection, &filter).await {
            Ok(doc) => Ok(Some(doc)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn matched(
        &self,
        collection: Collection,
        filter: Filter,
        update: Update,
    ) -> StoreResult<bool> {
        let outcome = self.store.update_one(collection, &filter, &update).await?;
        Ok(outcome.matched > 0)
    }

    /// `$addToSet` rejects a `null` array, so turn a missing or `null` child
    /// array into `[]` before linking into it.
    async fn ensure_array(
        &self,
        collection: Collection,
        parent: impl Into<Bson>,
        field: &str,
    ) -> StoreResult<()> {
        let filter = Filter::by_id(parent).eq(field, Bson::Null);
        let mut empty = Document::new();
        empty.insert(field, Bson::Array(Vec::new()));
        self.store
            .update_one(collection, &filter, &Update::set(empty))
            .await?;
        Ok(())
    }
}

fn oids<I: Into<ObjectId> + Copy>(ids: &[I]) -> Vec<ObjectId> {
    ids.iter().map(|id| (*id).into()).collect()
}

#[async_trait]
impl TaskManagerRepository for DocStoreRepository {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let docs: Vec<UserDoc> = self.store.fetch_all(Collection::Users, &Filter::all()).await?;
        Ok(docs.into_iter().map(mapper::user_from_doc).collect())
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let doc: Option<UserDoc> = self.find_opt(Collection::Users, Filter::by_id(id)).await?;
        Ok(doc.map(mapper::user_from_doc))
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.store
            .insert_as(Collection::Users, &mapper::user_to_doc(user))
            .await
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> StoreResult<bool> {
        let set = Update::set(mapper::user_patch_to_set(patch));
        self.matched(Collection::Users, Filter::by_id(id), set).await
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<bool> {
        let n = self
            .store
            .delete_one(Collection::Users, &Filter::by_id(id))
            .await?;
        Ok(n > 0)
    }

    async fn link_project(&self, user: UserId, project: ProjectId) -> StoreResult<bool> {
        self.ensure_array(Collection::Users, user, fields::PROJECTS)
            .await?;
        let update = Update::add_to_set(fields::PROJECTS, project);
        self.matched(Collection::Users, Filter::by_id(user), update).await
    }

    async fn unlink_project(&self, user: UserId, project: ProjectId) -> StoreResult<bool> {
        let update = Update::pull(fields::PROJECTS, project);
        self.matched(Collection::Users, Filter::by_id(user), update).await
    }

    async fn unlink_projects(&self, user: UserId, projects: &[ProjectId]) -> StoreResult<bool> {
        let update = Update::pull_in(fields::PROJECTS, oids(projects));
        self.matched(Collection::Users, Filter::by_id(user), update).await
    }

    async fn list_projects(&self, owner: Option<UserId>) -> StoreResult<Vec<Project>> {
        let filter = match owner {
            Some(user) => Filter::all().eq(fields::USER_ID, user),
            None => Filter::all(),
        };
        let docs: Vec<ProjectDoc> = self.store.fetch_all(Collection::Projects, &filter).await?;
        Ok(docs.into_iter().map(mapper::project_from_doc).collect())
    }

    async fn find_project(
        &self,
        id: ProjectId,
        owner: Option<UserId>,
    ) -> StoreResult<Option<Project>> {
        let mut filter = Filter::by_id(id);
        if let Some(user) = owner {
            filter = filter.eq(fields::USER_ID, user);
        }
        let doc: Option<ProjectDoc> = self.find_opt(Collection::Projects, filter).await?;
        Ok(doc.map(mapper::project_from_doc))
    }

    async fn owned_project_ids(
        &self,
        owner: UserId,
        ids: &[ProjectId],
    ) -> StoreResult<Vec<ProjectId>> {
        let filter = Filter::all()
            .eq(fields::USER_ID, owner)
            .is_in(fields::ID, oids(ids));
        let docs: Vec<ProjectDoc> = self.store.fetch_all(Collection::Projects, &filter).await?;
        Ok(docs.into_iter().map(|doc| doc.id.into()).collect())
    }

    async fn insert_project(&self, project: &Project) -> StoreResult<()> {
        self.store
            .insert_as(Collection::Projects, &mapper::project_to_doc(project))
            .await
    }

    async fn update_project(
        &self,
        owner: UserId,
        id: ProjectId,
        patch: &ProjectPatch,
    ) -> StoreResult<bool> {
        let filter = Filter::by_id(id).eq(fields::USER_ID, owner);
        let set = Update::set(mapper::project_patch_to_set(patch));
        self.matched(Collection::Projects, filter, set).await
    }

    async fn delete_project(&self, id: ProjectId) -> StoreResult<bool> {
        let n = self
            .store
            .delete_one(Collection::Projects, &Filter::by_id(id))
            .await?;
        Ok(n > 0)
    }

    async fn delete_projects(&self, owner: UserId, ids: &[ProjectId]) -> StoreResult<u64> {
        let filter = Filter::all()
            .eq(fields::USER_ID, owner)
            .is_in(fields::ID, oids(ids));
        self.store.delete_many(Collection::Projects, &filter).await
    }

    async fn link_task(&self, project: ProjectId, task: TaskId) -> StoreResult<bool> {
        self.ensure_array(Collection::Projects, project, fields::TASKS)
            .await?;
        let update = Update::add_to_set(fields::TASKS, task);
        self.matched(Collection::Projects, Filter::by_id(project), update)
            .await
    }

    async fn unlink_task(&self, project: ProjectId, task: TaskId) -> StoreResult<bool> {
        let update = Update::pull(fields::TASKS, task);
        self.matched(Collection::Projects, Filter::by_id(project), update)
            .await
    }

    async fn unlink_tasks(&self, project: ProjectId, tasks: &[TaskId]) -> StoreResult<bool> {
        let update = Update::pull_in(fields::TASKS, oids(tasks));
        self.matched(Collection::Projects, Filter::by_id(project), update)
            .await
    }

    async fn list_tasks(&self, project: Option<ProjectId>) -> StoreResult<Vec<Task>> {
        let filter = match project {
            Some(project) => Filter::all().eq(fields::PROJECT_ID, project),
            None => Filter::all(),
        };
        let docs: Vec<TaskDoc> = self.store.fetch_all(Collection::Tasks, &filter).await?;
        Ok(docs.into_iter().map(mapper::task_from_doc).collect())
    }

    async fn find_task(&self, project: ProjectId, id: TaskId) -> StoreResult<Option<Task>> {
        let filter = Filter::by_id(id).eq(fields::PROJECT_ID, project);
        let doc: Option<TaskDoc> = self.find_opt(Collection::Tasks, filter).await?;
        Ok(doc.map(mapper::task_from_doc))
    }

    async fn insert_task(&self, task: &Task) -> StoreResult<()> {
        self.store
            .insert_as(Collection::Tasks, &mapper::task_to_doc(task))
            .await
    }

    async fn update_task(
        &self,
        project: ProjectId,
        id: TaskId,
        patch: &TaskPatch,
    ) -> StoreResult<bool> {
        let filter = Filter::by_id(id).eq(fields::PROJECT_ID, project);
        let set = Update::set(mapper::task_patch_to_set(patch));
        self.matched(Collection::Tasks, filter, set).await
    }

    async fn discard_task(&self, id: TaskId) -> StoreResult<bool> {
        let n = self
            .store
            .delete_one(Collection::Tasks, &Filter::by_id(id))
            .await?;
        Ok(n > 0)
    }

    async fn delete_task(&self, project: ProjectId, id: TaskId) -> StoreResult<bool> {
        let filter = Filter::by_id(id).eq(fields::PROJECT_ID, project);
        let n = self.store.delete_one(Collection::Tasks, &filter).await?;
        Ok(n > 0)
    }

    async fn delete_tasks(&self, project: ProjectId, ids: &[TaskId]) -> StoreResult<u64> {
        let filter = Filter::all()
            .eq(fields::PROJECT_ID, project)
            .is_in(fields::ID, oids(ids));
        self.store.delete_many(Collection::Tasks, &filter).await
    }

    async fn delete_tasks_of_projects(&self, projects: &[ProjectId]) -> StoreResult<u64> {
        let filter = Filter::all().is_in(fields::PROJECT_ID, oids(projects));
        self.store.delete_many(Collection::Tasks, &filter).await
    }
}

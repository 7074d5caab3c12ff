#![cfg(feature = "integration")]
//! Coordinator scenarios against a real MongoDB started with testcontainers.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use common::{new_project, new_task, new_user};
use docstore::{DocStore, MongoStore, StoreConfig};
use task_manager::contract::model::ProjectId;
use task_manager::domain::error::DomainError;
use task_manager::domain::service::Service;
use task_manager::infra::storage::DocStoreRepository;
use task_manager::TaskManagerConfig;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;

#[tokio::test]
async fn lifecycle_against_mongo() -> Result<()> {
    let container = Mongo::default().start().await?;
    let port = container.get_host_port_ipv4(27017).await?;
    let cfg = StoreConfig {
        uri: format!("mongodb://127.0.0.1:{port}"),
        database: "task_manager_it".to_string(),
        ..StoreConfig::default()
    };
    let store: Arc<dyn DocStore> = Arc::new(MongoStore::connect(&cfg).await?);
    let repo = Arc::new(DocStoreRepository::new(store));
    let svc = Service::new(repo, TaskManagerConfig::default());

    let user = svc.create_user(new_user("Ann")).await?;
    let project = svc.create_project(user.id, new_project("Draft")).await?;
    assert_eq!(svc.get_user(user.id).await?.projects, vec![project.id]);

    let task = svc.create_task(project.id, new_task("Write outline")).await?;
    assert_eq!(svc.get_project(user.id, project.id).await?.tasks, vec![task.id]);
    assert_eq!(svc.get_task(project.id, task.id).await?, task);

    let stranger = svc.create_user(new_user("Bob")).await?;
    assert!(matches!(
        svc.get_project(stranger.id, project.id).await,
        Err(DomainError::ProjectNotFound { .. })
    ));

    svc.delete_task(project.id, task.id).await?;
    assert!(svc.get_project(user.id, project.id).await?.tasks.is_empty());

    let (a, b) = tokio::join!(
        svc.create_project(user.id, new_project("A")),
        svc.create_project(user.id, new_project("B")),
    );
    let (a, b) = (a?, b?);
    let ids: HashSet<ProjectId> = svc.get_user(user.id).await?.projects.into_iter().collect();
    assert_eq!(ids, HashSet::from([project.id, a.id, b.id]));

    assert_eq!(svc.delete_projects(user.id, vec![a.id, b.id]).await?, 2);
    svc.delete_project(project.id).await?;
    assert!(svc.get_user(user.id).await?.projects.is_empty());
    Ok(())
}

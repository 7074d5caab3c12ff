#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use docstore::MemoryStore;
use task_manager::config::TaskManagerConfig;
use task_manager::contract::model::{NewProject, NewTask, NewUser};
use task_manager::domain::service::Service;
use task_manager::infra::storage::DocStoreRepository;

pub struct Harness {
    pub store: MemoryStore,
    pub service: Service,
}

pub fn harness() -> Harness {
    harness_with(TaskManagerConfig::default())
}

pub fn harness_with(config: TaskManagerConfig) -> Harness {
    let store = MemoryStore::new();
    let repo = Arc::new(DocStoreRepository::new(Arc::new(store.clone())));
    Harness {
        service: Service::new(repo, config),
        store,
    }
}

pub fn new_user(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        occupation: "engineer".to_string(),
        age: 31,
        salary: 5200,
        email: format!("{}@example.com", name.to_lowercase()),
    }
}

pub fn new_project(name: &str) -> NewProject {
    NewProject {
        name: name.to_string(),
        description: "initial draft".to_string(),
        priority: 3,
        author: "ann".to_string(),
        responsible: "bob".to_string(),
        performers: "ann, bob".to_string(),
        deadline: Some(Utc.with_ymd_and_hms(2030, 1, 31, 12, 0, 0).unwrap()),
        guests: "carol".to_string(),
        status: "open".to_string(),
    }
}

pub fn new_task(name: &str) -> NewTask {
    NewTask {
        name: name.to_string(),
        description: "first pass".to_string(),
        priority: 5,
        author: "ann".to_string(),
        responsible: "bob".to_string(),
        performers: "bob".to_string(),
        deadline: None,
        guests: String::new(),
        status: "open".to_string(),
    }
}

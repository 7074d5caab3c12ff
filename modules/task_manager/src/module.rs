use std::sync::Arc;

use docstore::DocStore;
use tracing::info;

use crate::config::TaskManagerConfig;
use crate::contract::client::TaskManagerApi;
use crate::domain::service::Service;
use crate::gateways::local::TaskManagerLocalClient;
use crate::infra::storage::DocStoreRepository;

/// Module wiring: store-backed repository → domain service → local client.
#[derive(Clone)]
pub struct TaskManager {
    service: Arc<Service>,
    client: Arc<dyn TaskManagerApi>,
}

impl TaskManager {
    pub const NAME: &'static str = "task_manager";

    pub fn new(store: Arc<dyn DocStore>, config: TaskManagerConfig) -> Self {
        info!(
            cascade_deletes = config.cascade_deletes,
            compensate_orphans = config.compensate_orphans,
            "Initializing task_manager module"
        );
        let repo = Arc::new(DocStoreRepository::new(store));
        let service = Arc::new(Service::new(repo, config));
        let client: Arc<dyn TaskManagerApi> = Arc::new(TaskManagerLocalClient::new(service.clone()));
        Self { service, client }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process API for other modules.
    pub fn client(&self) -> Arc<dyn TaskManagerApi> {
        self.client.clone()
    }
}

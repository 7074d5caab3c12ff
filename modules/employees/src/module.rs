use std::sync::Arc;

use docstore::DocStore;
use tracing::info;

use crate::config::{EmployeesBackend, EmployeesConfig};
use crate::contract::client::EmployeesApi;
use crate::domain::repo::EmployeesRepository;
use crate::domain::service::Service;
use crate::gateways::local::EmployeesLocalClient;
use crate::infra::storage::{DocStoreEmployeesRepository, InMemoryEmployeesRepository};

#[derive(Clone)]
pub struct Employees {
    service: Arc<Service>,
    client: Arc<dyn EmployeesApi>,
}

impl Employees {
    pub const NAME: &'static str = "employees";

    /// Build the module on the configured backend. `store` is only touched
    /// for [`EmployeesBackend::Store`].
    pub async fn init(store: Arc<dyn DocStore>, config: EmployeesConfig) -> anyhow::Result<Self> {
        info!(backend = ?config.backend, "Initializing employees module");
        let repo: Arc<dyn EmployeesRepository> = match config.backend {
            EmployeesBackend::Memory => Arc::new(InMemoryEmployeesRepository::new()),
            EmployeesBackend::Store => Arc::new(DocStoreEmployeesRepository::open(store).await?),
        };
        let service = Arc::new(Service::new(repo));
        let client: Arc<dyn EmployeesApi> = Arc::new(EmployeesLocalClient::new(service.clone()));
        Ok(Self { service, client })
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn client(&self) -> Arc<dyn EmployeesApi> {
        self.client.clone()
    }
}

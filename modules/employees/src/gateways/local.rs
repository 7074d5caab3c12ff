use std::sync::Arc;

use async_trait::async_trait;

use crate::contract::client::EmployeesApi;
use crate::contract::error::EmployeesError;
use crate::contract::model::{Employee, NewEmployee};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Local implementation of the EmployeesApi trait that delegates to the domain service
pub struct EmployeesLocalClient {
    service: Arc<Service>,
}

impl EmployeesLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

impl From<DomainError> for EmployeesError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::EmployeeNotFound { id } => Self::not_found(id),
            DomainError::Storage { .. } => Self::internal(),
        }
    }
}

fn to_anyhow(e: DomainError) -> anyhow::Error {
    anyhow::Error::new(EmployeesError::from(e))
}

#[async_trait]
impl EmployeesApi for EmployeesLocalClient {
    async fn list_employees(&self) -> anyhow::Result<Vec<Employee>> {
        self.service.list_employees().await.map_err(to_anyhow)
    }

    async fn get_employee(&self, id: i64) -> anyhow::Result<Employee> {
        self.service.get_employee(id).await.map_err(to_anyhow)
    }

    async fn create_employee(&self, new_employee: NewEmployee) -> anyhow::Result<Employee> {
        self.service
            .create_employee(new_employee)
            .await
            .map_err(to_anyhow)
    }

    async fn update_employee(&self, id: i64, payload: NewEmployee) -> anyhow::Result<Employee> {
        self.service
            .update_employee(id, payload)
            .await
            .map_err(to_anyhow)
    }

    async fn delete_employee(&self, id: i64) -> anyhow::Result<()> {
        self.service.delete_employee(id).await.map_err(to_anyhow)
    }
}

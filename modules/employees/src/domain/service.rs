use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::contract::model::{Employee, NewEmployee};
use crate::domain::error::DomainError;
use crate::domain::repo::EmployeesRepository;

/// Domain service for legacy employee records.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn EmployeesRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn EmployeesRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "employees.service.list_employees", skip(self))]
    pub async fn list_employees(&self) -> Result<Vec<Employee>, DomainError> {
        let employees = self.repo.list().await.map_err(storage)?;
        debug!(count = employees.len(), "Listed employees");
        Ok(employees)
    }

    #[instrument(name = "employees.service.get_employee", skip(self), fields(employee_id = id))]
    pub async fn get_employee(&self, id: i64) -> Result<Employee, DomainError> {
        self.repo
            .get(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::employee_not_found(id))
    }

    #[instrument(name = "employees.service.create_employee", skip(self, new_employee))]
    pub async fn create_employee(&self, new_employee: NewEmployee) -> Result<Employee, DomainError> {
        let employee = self.repo.insert(new_employee).await.map_err(storage)?;
        info!(employee_id = employee.id, "Created employee");
        Ok(employee)
    }

    /// Only non-empty strings and non-zero numbers in `payload` replace
    /// stored values.
    #[instrument(
        name = "employees.service.update_employee",
        skip(self, payload),
        fields(employee_id = id)
    )]
    pub async fn update_employee(
        &self,
        id: i64,
        payload: NewEmployee,
    ) -> Result<Employee, DomainError> {
        let mut employee = self.get_employee(id).await?;
        employee.merge(payload);
        if !self.repo.update(&employee).await.map_err(storage)? {
            // removed between the read and the write
            return Err(DomainError::employee_not_found(id));
        }
        debug!("Updated employee");
        Ok(employee)
    }

    #[instrument(name = "employees.service.delete_employee", skip(self), fields(employee_id = id))]
    pub async fn delete_employee(&self, id: i64) -> Result<(), DomainError> {
        if self.repo.delete(id).await.map_err(storage)? {
            info!("Deleted employee");
        } else {
            debug!("Nothing to delete");
        }
        Ok(())
    }
}

fn storage(e: anyhow::Error) -> DomainError {
    DomainError::storage(format!("{e:#}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::storage::InMemoryEmployeesRepository;

    fn service() -> Service {
        Service::new(Arc::new(InMemoryEmployeesRepository::new()))
    }

    fn bob() -> NewEmployee {
        NewEmployee {
            name: "Bob".into(),
            role: "tester".into(),
            age: 28,
            salary: 2100,
        }
    }

    #[tokio::test]
    async fn get_missing_employee_is_not_found() {
        let err = service().get_employee(5).await.unwrap_err();
        assert!(matches!(err, DomainError::EmployeeNotFound { id: 5 }));
    }

    #[tokio::test]
    async fn update_merges_and_persists() {
        let svc = service();
        let created = svc.create_employee(bob()).await.unwrap();

        let updated = svc
            .update_employee(
                created.id,
                NewEmployee {
                    age: 29,
                    ..NewEmployee::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.age, 29);
        assert_eq!(updated.name, "Bob");
        assert_eq!(svc.get_employee(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_missing_employee_is_not_found() {
        let err = service().update_employee(1, bob()).await.unwrap_err();
        assert!(matches!(err, DomainError::EmployeeNotFound { id: 1 }));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let svc = service();
        let created = svc.create_employee(bob()).await.unwrap();
        svc.delete_employee(created.id).await.unwrap();
        svc.delete_employee(created.id).await.unwrap();
        assert!(svc.list_employees().await.unwrap().is_empty());
    }
}

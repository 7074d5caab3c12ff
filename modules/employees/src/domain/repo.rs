use async_trait::async_trait;

use crate::contract::model::{Employee, NewEmployee};

/// Port for the domain layer: persistence operations the domain needs.
#[async_trait]
pub trait EmployeesRepository: Send + Sync {
    /// All employees ordered by id.
    async fn list(&self) -> anyhow::Result<Vec<Employee>>;
    async fn get(&self, id: i64) -> anyhow::Result<Option<Employee>>;
    /// Assign the next id and persist. Ids are never reused.
    async fn insert(&self, new_employee: NewEmployee) -> anyhow::Result<Employee>;
    /// Replace the stored record with `employee.id`. Returns false if absent.
    async fn update(&self, employee: &Employee) -> anyhow::Result<bool>;
    /// Returns true if a record was deleted.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

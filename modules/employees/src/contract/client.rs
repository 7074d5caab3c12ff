use async_trait::async_trait;

use crate::contract::model::{Employee, NewEmployee};

/// Public API trait for the employees module
#[async_trait]
pub trait EmployeesApi: Send + Sync {
    /// All employees ordered by id
    async fn list_employees(&self) -> anyhow::Result<Vec<Employee>>;

    async fn get_employee(&self, id: i64) -> anyhow::Result<Employee>;

    async fn create_employee(&self, new_employee: NewEmployee) -> anyhow::Result<Employee>;

    /// Legacy merge: only non-empty / non-zero payload fields are applied
    async fn update_employee(&self, id: i64, payload: NewEmployee) -> anyhow::Result<Employee>;

    /// Deleting a missing employee succeeds
    async fn delete_employee(&self, id: i64) -> anyhow::Result<()>;
}

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::contract::model::{Employee, NewEmployee};
use crate::domain::repo::EmployeesRepository;

#[derive(Debug)]
struct State {
    items: BTreeMap<i64, Employee>,
    next_id: i64,
}

/// Process-local employee table. One lock serializes every operation and
/// also owns the id sequence.
#[derive(Debug)]
pub struct InMemoryEmployeesRepository {
    state: Mutex<State>,
}

impl InMemoryEmployeesRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                items: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryEmployeesRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmployeesRepository for InMemoryEmployeesRepository {
    async fn list(&self) -> anyhow::Result<Vec<Employee>> {
        Ok(self.state.lock().items.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<Employee>> {
        Ok(self.state.lock().items.get(&id).cloned())
    }

    async fn insert(&self, new_employee: NewEmployee) -> anyhow::Result<Employee> {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        let employee = Employee {
            id,
            name: new_employee.name,
            role: new_employee.role,
            age: new_employee.age,
            salary: new_employee.salary,
        };
        state.items.insert(id, employee.clone());
        Ok(employee)
    }

    async fn update(&self, employee: &Employee) -> anyhow::Result<bool> {
        let mut state = self.state.lock();
        match state.items.get_mut(&employee.id) {
            Some(slot) => {
                *slot = employee.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        Ok(self.state.lock().items.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> NewEmployee {
        NewEmployee {
            name: name.into(),
            role: "engineer".into(),
            age: 40,
            salary: 3000,
        }
    }

    #[tokio::test]
    async fn ids_start_at_one_and_are_not_reused() {
        let repo = InMemoryEmployeesRepository::new();
        let a = repo.insert(payload("a")).await.unwrap();
        let b = repo.insert(payload("b")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        assert!(repo.delete(b.id).await.unwrap());
        let c = repo.insert(payload("c")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn update_of_missing_record_reports_false() {
        let repo = InMemoryEmployeesRepository::new();
        let ghost = Employee {
            id: 99,
            name: "ghost".into(),
            role: String::new(),
            age: 0,
            salary: 0,
        };
        assert!(!repo.update(&ghost).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }
}

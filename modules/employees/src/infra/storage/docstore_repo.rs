//! Employees stored in the shared document store under integer `_id`s.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bson::doc;
use docstore::{Collection, DocStore, DocStoreExt, Filter, Update};
use serde::{Deserialize, Serialize};

use crate::contract::model::{Employee, NewEmployee};
use crate::domain::repo::EmployeesRepository;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmployeeDoc {
    #[serde(rename = "_id")]
    id: i64,
    name: String,
    role: String,
    age: i32,
    salary: i64,
}

impl From<EmployeeDoc> for Employee {
    fn from(doc: EmployeeDoc) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            role: doc.role,
            age: doc.age,
            salary: doc.salary,
        }
    }
}

pub struct DocStoreEmployeesRepository {
    store: Arc<dyn DocStore>,
    next_id: AtomicI64,
}

impl DocStoreEmployeesRepository {
    /// Scan the collection once to seed the id sequence past the highest
    /// stored id.
    pub async fn open(store: Arc<dyn DocStore>) -> anyhow::Result<Self> {
        let docs: Vec<EmployeeDoc> = store.fetch_all(Collection::Employees, &Filter::all()).await?;
        let max = docs.iter().map(|d| d.id).max().unwrap_or(0);
        tracing::debug!(seed = max + 1, existing = docs.len(), "Seeded employee id sequence");
        Ok(Self {
            store,
            next_id: AtomicI64::new(max + 1),
        })
    }
}

#[async_trait]
impl EmployeesRepository for DocStoreEmployeesRepository {
    async fn list(&self) -> anyhow::Result<Vec<Employee>> {
        let mut docs: Vec<EmployeeDoc> = self
            .store
            .fetch_all(Collection::Employees, &Filter::all())
            .await?;
        docs.sort_by_key(|d| d.id);
        Ok(docs.into_iter().map(Employee::from).collect())
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<Employee>> {
        match self
            .store
            .fetch_one::<EmployeeDoc>(Collection::Employees, &Filter::by_id(id))
            .await
        {
            Ok(doc) => Ok(Some(doc.into())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert(&self, new_employee: NewEmployee) -> anyhow::Result<Employee> {
        let doc = EmployeeDoc {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: new_employee.name,
            role: new_employee.role,
            age: new_employee.age,
            salary: new_employee.salary,
        };
        self.store.insert_as(Collection::Employees, &doc).await?;
        Ok(doc.into())
    }

    async fn update(&self, employee: &Employee) -> anyhow::Result<bool> {
        let set = Update::set(doc! {
            "name": employee.name.as_str(),
            "role": employee.role.as_str(),
            "age": employee.age,
            "salary": employee.salary,
        });
        let outcome = self
            .store
            .update_one(Collection::Employees, &Filter::by_id(employee.id), &set)
            .await?;
        Ok(outcome.matched > 0)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let n = self
            .store
            .delete_one(Collection::Employees, &Filter::by_id(id))
            .await?;
        Ok(n > 0)
    }
}

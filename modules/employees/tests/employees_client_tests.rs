use std::collections::HashSet;
use std::sync::Arc;

use docstore::{Collection, DocStore, MemoryStore, StoreOp};
use employees::contract::error::EmployeesError;
use employees::contract::model::NewEmployee;
use employees::{Employees, EmployeesBackend, EmployeesConfig};
use tracing_test::traced_test;

fn carol() -> NewEmployee {
    NewEmployee {
        name: "Carol".into(),
        role: "analyst".into(),
        age: 35,
        salary: 4100,
    }
}

async fn module(store: &MemoryStore, backend: EmployeesBackend) -> Employees {
    let store: Arc<dyn DocStore> = Arc::new(store.clone());
    Employees::init(store, EmployeesConfig { backend })
        .await
        .unwrap()
}

#[tokio::test]
async fn crud_flow_on_both_backends() {
    for backend in [EmployeesBackend::Memory, EmployeesBackend::Store] {
        let store = MemoryStore::new();
        let client = module(&store, backend).await.client();

        let created = client.create_employee(carol()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(client.get_employee(1).await.unwrap(), created);

        let updated = client
            .update_employee(
                1,
                NewEmployee {
                    role: "lead analyst".into(),
                    ..NewEmployee::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role, "lead analyst");
        assert_eq!(updated.salary, 4100);

        client.delete_employee(1).await.unwrap();
        client.delete_employee(1).await.unwrap();
        assert!(client.list_employees().await.unwrap().is_empty());

        let expected_docs = usize::from(backend == EmployeesBackend::Store);
        client.create_employee(carol()).await.unwrap();
        assert_eq!(store.count(Collection::Employees), expected_docs);
    }
}

#[tokio::test]
async fn missing_employee_maps_to_not_found() {
    let client = module(&MemoryStore::new(), EmployeesBackend::Memory)
        .await
        .client();
    let err = client.get_employee(12).await.unwrap_err();
    assert_eq!(
        err.downcast::<EmployeesError>().unwrap(),
        EmployeesError::not_found(12)
    );
}

#[tokio::test]
async fn store_failure_maps_to_internal() {
    let store = MemoryStore::new();
    let client = module(&store, EmployeesBackend::Store).await.client();

    store.fail_next(StoreOp::InsertOne, Collection::Employees);
    let err = client.create_employee(carol()).await.unwrap_err();
    assert_eq!(
        err.downcast::<EmployeesError>().unwrap(),
        EmployeesError::Internal
    );
}

#[tokio::test]
async fn store_backend_lists_in_id_order_after_restart() {
    let store = MemoryStore::new();
    {
        let client = module(&store, EmployeesBackend::Store).await.client();
        for _ in 0..3 {
            client.create_employee(carol()).await.unwrap();
        }
        client.delete_employee(3).await.unwrap();
    }

    let client = module(&store, EmployeesBackend::Store).await.client();
    let created = client.create_employee(carol()).await.unwrap();
    assert_eq!(created.id, 3);

    let ids: Vec<i64> = client
        .list_employees()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_distinct_ids() {
    for backend in [EmployeesBackend::Memory, EmployeesBackend::Store] {
        let client = module(&MemoryStore::new(), backend).await.client();

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { client.create_employee(carol()).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().unwrap().id);
        }
        assert_eq!(ids, (1..=32).collect::<HashSet<i64>>());
    }
}

#[tokio::test]
#[traced_test]
async fn service_logs_creation_and_noop_delete() {
    let client = module(&MemoryStore::new(), EmployeesBackend::Memory)
        .await
        .client();
    client.create_employee(carol()).await.unwrap();
    client.delete_employee(77).await.unwrap();

    assert!(logs_contain("Created employee"));
    assert!(logs_contain("Nothing to delete"));
}

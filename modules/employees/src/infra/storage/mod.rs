pub mod docstore_repo;
pub mod memory_repo;

pub use docstore_repo::DocStoreEmployeesRepository;
pub use memory_repo::InMemoryEmployeesRepository;

pub mod docstore_repo;
pub mod entity;
pub mod mapper;

pub use docstore_repo::DocStoreRepository;

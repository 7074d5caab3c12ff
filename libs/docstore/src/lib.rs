//! Document store abstraction.
//!
//! This crate wraps a document database behind the object-safe [`DocStore`]
//! trait: find-one, find-many (lazy stream), insert-one, update-one with
//! set / add-to-set / pull operators, delete-one and delete-many over a fixed
//! set of logical [`Collection`]s.
//!
//! Two backends are provided:
//! - [`MongoStore`]: MongoDB through the official driver
//! - [`MemoryStore`]: in-process store with the same semantics, used by tests
//!   and by `memory://` URIs
//!
//! # Example
//! ```rust,no_run
//! # async fn demo() -> docstore::StoreResult<()> {
//! use docstore::{bson::doc, Collection, Filter, StoreConfig};
//!
//! let store = docstore::connect(&StoreConfig::default()).await?;
//! store.insert_one(Collection::Users, doc! { "name": "Ann" }).await?;
//! let found = store
//!     .find_one(Collection::Users, &Filter::all().eq("name", "Ann"))
//!     .await?;
//! # let _ = found;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod memory;
pub mod mongo;
pub mod update;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bson::Document;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use bson;
pub use config::{CollectionNames, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use filter::Filter;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use update::{Update, UpdateOp};

/// Logical collections known to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Projects,
    Tasks,
    Employees,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Users,
        Collection::Projects,
        Collection::Tasks,
        Collection::Employees,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Projects => "projects",
            Collection::Tasks => "tasks",
            Collection::Employees => "employees",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primitive operations, used for timeouts and fault injection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOp {
    FindOne,
    FindMany,
    InsertOne,
    UpdateOne,
    DeleteOne,
    DeleteMany,
}

/// Lazy sequence of documents produced by [`DocStore::find_many`].
pub type DocStream = BoxStream<'static, StoreResult<Document>>;

/// Result of a single-document update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Number of documents the filter matched (0 or 1).
    pub matched: u64,
    /// Number of documents actually changed.
    pub modified: u64,
}

/// Storage backend engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreEngine {
    Mongo,
    Memory,
}

/// Port over a document database.
///
/// No retries happen at this layer. Driver errors pass through unchanged;
/// the only condition callers are expected to branch on is
/// [`StoreError::NotFound`] from [`DocStore::find_one`].
#[async_trait]
pub trait DocStore: Send + Sync {
    /// Engine behind this handle.
    fn engine(&self) -> StoreEngine;

    /// First document matching `filter`, or [`StoreError::NotFound`].
    async fn find_one(&self, collection: Collection, filter: &Filter) -> StoreResult<Document>;

    /// All documents matching `filter`, in natural (insertion) order.
    async fn find_many(&self, collection: Collection, filter: &Filter) -> StoreResult<DocStream>;

    async fn insert_one(&self, collection: Collection, doc: Document) -> StoreResult<()>;

    /// Apply `update` atomically to the first document matching `filter`.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateOutcome>;

    /// Returns the number of deleted documents (0 or 1).
    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<u64>;

    /// Returns the number of deleted documents.
    async fn delete_many(&self, collection: Collection, filter: &Filter) -> StoreResult<u64>;

    /// Liveness check.
    async fn ping(&self) -> StoreResult<()>;
}

/// Typed helpers on top of [`DocStore`] using serde + bson.
#[async_trait]
pub trait DocStoreExt: DocStore {
    async fn fetch_one<T>(&self, collection: Collection, filter: &Filter) -> StoreResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let doc = self.find_one(collection, filter).await?;
        Ok(bson::from_document(doc)?)
    }

    async fn fetch_all<T>(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.find_many(collection, filter)
            .await?
            .map(|item| item.and_then(|doc| bson::from_document(doc).map_err(StoreError::from)))
            .try_collect()
            .await
    }

    async fn insert_as<T>(&self, collection: Collection, value: &T) -> StoreResult<()>
    where
        T: Serialize + Sync,
    {
        let doc = bson::to_document(value)?;
        self.insert_one(collection, doc).await
    }
}

impl<S: DocStore + ?Sized> DocStoreExt for S {}

/// Pick the backend for a store URI by its scheme.
pub fn engine_for_uri(uri: &str) -> StoreResult<StoreEngine> {
    let raw = uri.trim();
    let parsed =
        url::Url::parse(raw).map_err(|e| StoreError::UnsupportedUri(format!("{raw}: {e}")))?;

    match parsed.scheme() {
        "mongodb" | "mongodb+srv" => Ok(StoreEngine::Mongo),
        "memory" => Ok(StoreEngine::Memory),
        other => Err(StoreError::UnsupportedUri(other.to_string())),
    }
}

/// Connect to the store described by `cfg`.
///
/// For MongoDB the whole connection sequence (URI parsing, client creation
/// and the initial ping) is bounded by `cfg.connect_timeout`.
pub async fn connect(cfg: &StoreConfig) -> StoreResult<Arc<dyn DocStore>> {
    match engine_for_uri(&cfg.uri)? {
        StoreEngine::Mongo => Ok(Arc::new(MongoStore::connect(cfg).await?)),
        StoreEngine::Memory => {
            tracing::info!("Using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_is_detected_from_scheme() {
        assert_eq!(
            engine_for_uri("mongodb://localhost:27017").unwrap(),
            StoreEngine::Mongo
        );
        assert_eq!(
            engine_for_uri("mongodb+srv://cluster.example.net").unwrap(),
            StoreEngine::Mongo
        );
        assert_eq!(engine_for_uri("memory://").unwrap(), StoreEngine::Memory);
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let err = engine_for_uri("postgres://localhost/db").unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedUri(s) if s == "postgres"));

        assert!(matches!(
            engine_for_uri("not a uri"),
            Err(StoreError::UnsupportedUri(_))
        ));
    }

    #[test]
    fn collection_names_are_stable() {
        let names: Vec<_> = Collection::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, ["users", "projects", "tasks", "employees"]);
    }

    #[tokio::test]
    async fn connect_memory_uri_yields_memory_engine() {
        let cfg = StoreConfig {
            uri: "memory://".to_string(),
            ..StoreConfig::default()
        };
        let store = connect(&cfg).await.unwrap();
        assert_eq!(store.engine(), StoreEngine::Memory);
        store.ping().await.unwrap();
    }
}

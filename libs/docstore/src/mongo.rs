//! MongoDB backend.

use std::future::IntoFuture;
use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, Document};
use futures::{StreamExt, TryStreamExt};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tracing::{debug, info};

use crate::config::{CollectionNames, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::update::Update;
use crate::{Collection, DocStore, DocStream, StoreEngine, UpdateOutcome};

/// Connection-scoped handle over one MongoDB database.
#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    db: Database,
    names: CollectionNames,
    op_timeout: Option<Duration>,
}

impl MongoStore {
    /// Connect and verify liveness with a `ping`, all within
    /// `cfg.connect_timeout`.
    pub async fn connect(cfg: &StoreConfig) -> StoreResult<Self> {
        let deadline = cfg.connect_timeout;
        debug!(uri = %cfg.redacted_uri(), database = %cfg.database, "Connecting to MongoDB");

        let connect = async {
            let mut opts = ClientOptions::parse(cfg.uri.as_str()).await?;
            opts.connect_timeout = Some(deadline);
            opts.server_selection_timeout = Some(deadline);
            if let Some(app_name) = &cfg.app_name {
                opts.app_name = Some(app_name.clone());
            }

            let client = Client::with_options(opts)?;
            let db = client.database(&cfg.database);
            db.run_command(doc! { "ping": 1 }).await?;
            Ok::<_, StoreError>((client, db))
        };

        let (client, db) = tokio::time::timeout(deadline, connect)
            .await
            .map_err(|_| StoreError::timeout("connect", deadline))??;

        info!(database = %cfg.database, "Connected to MongoDB");
        Ok(Self {
            client,
            db,
            names: cfg.collections.clone(),
            op_timeout: cfg.op_timeout,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Close all pooled connections.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.db.collection(self.names.name_of(collection))
    }

    async fn bounded<F, T>(&self, op: &'static str, fut: F) -> StoreResult<T>
    where
        F: IntoFuture<Output = mongodb::error::Result<T>> + Send,
        F::IntoFuture: Send,
    {
        match self.op_timeout {
            Some(after) => tokio::time::timeout(after, fut)
                .await
                .map_err(|_| StoreError::timeout(op, after))?
                .map_err(StoreError::from),
            None => fut.await.map_err(StoreError::from),
        }
    }
}

#[async_trait]
impl DocStore for MongoStore {
    fn engine(&self) -> StoreEngine {
        StoreEngine::Mongo
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> StoreResult<Document> {
        let coll = self.collection(collection);
        self.bounded("find_one", coll.find_one(filter.to_document()))
            .await?
            .ok_or_else(|| StoreError::not_found(collection))
    }

    async fn find_many(&self, collection: Collection, filter: &Filter) -> StoreResult<DocStream> {
        let coll = self.collection(collection);
        let cursor = self.bounded("find", coll.find(filter.to_document())).await?;
        Ok(cursor.map_err(StoreError::from).boxed())
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> StoreResult<()> {
        let coll = self.collection(collection);
        self.bounded("insert_one", coll.insert_one(doc)).await?;
        Ok(())
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateOutcome> {
        let coll = self.collection(collection);
        let res = self
            .bounded(
                "update_one",
                coll.update_one(filter.to_document(), update.to_document()),
            )
            .await?;
        Ok(UpdateOutcome {
            matched: res.matched_count,
            modified: res.modified_count,
        })
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let coll = self.collection(collection);
        let res = self
            .bounded("delete_one", coll.delete_one(filter.to_document()))
            .await?;
        Ok(res.deleted_count)
    }

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let coll = self.collection(collection);
        let res = self
            .bounded("delete_many", coll.delete_many(filter.to_document()))
            .await?;
        Ok(res.deleted_count)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.bounded("ping", self.db.run_command(doc! { "ping": 1 }))
            .await
            .map(|_| ())
    }
}

#![cfg(feature = "integration")]
//! Store contract against a real MongoDB started with testcontainers.

mod common;

use std::time::Duration;

use anyhow::Result;
use docstore::{MongoStore, StoreConfig};
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;

#[tokio::test]
async fn mongo_backend_satisfies_store_contract() -> Result<()> {
    let container = Mongo::default().start().await?;
    let port = container.get_host_port_ipv4(27017).await?;

    let cfg = StoreConfig {
        uri: format!("mongodb://127.0.0.1:{port}"),
        database: "docstore_it".to_string(),
        ..StoreConfig::default()
    };
    let store = MongoStore::connect(&cfg).await?;

    common::find_one_distinguishes_not_found(&store).await?;
    common::typed_round_trip(&store).await?;
    common::find_many_preserves_insertion_order(&store).await?;
    common::set_add_and_pull(&store).await?;
    common::update_without_match_reports_zero(&store).await?;
    common::deletes_count_removed_documents(&store).await?;

    store.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn unreachable_server_fails_within_connect_timeout() {
    let cfg = StoreConfig {
        // reserved TEST-NET-1 address, nothing listens there
        uri: "mongodb://192.0.2.1:27017".to_string(),
        connect_timeout: Duration::from_millis(500),
        ..StoreConfig::default()
    };

    let started = std::time::Instant::now();
    let result = MongoStore::connect(&cfg).await;
    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));
}

//! In-process document store.
//!
//! Mirrors the MongoDB semantics the coordinators rely on: natural order is
//! insertion order, `_id` is unique per collection, and every update is applied
//! atomically to one document. One mutex guards all collections; it is never
//! held across an await point.
//!
//! Tests can arm one-shot faults with [`MemoryStore::fail_next`] to exercise
//! partial-failure paths.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;
use futures::{stream, StreamExt};
use parking_lot::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::update::Update;
use crate::{Collection, DocStore, DocStream, StoreEngine, StoreOp, UpdateOutcome};

#[derive(Default)]
struct Inner {
    collections: HashMap<Collection, Vec<Document>>,
    faults: Vec<(StoreOp, Collection)>,
}

impl Inner {
    fn take_fault(&mut self, op: StoreOp, collection: Collection) -> StoreResult<()> {
        match self
            .faults
            .iter()
            .position(|(o, c)| *o == op && *c == collection)
        {
            Some(idx) => {
                self.faults.remove(idx);
                Err(StoreError::InjectedFault { op, collection })
            }
            None => Ok(()),
        }
    }

    fn docs(&mut self, collection: Collection) -> &mut Vec<Document> {
        self.collections.entry(collection).or_default()
    }
}

/// Cheaply cloneable handle; clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `op` against `collection` fail with
    /// [`StoreError::InjectedFault`]. Faults queue up and fire once each.
    pub fn fail_next(&self, op: StoreOp, collection: Collection) {
        self.inner.lock().faults.push((op, collection));
    }

    /// Copy of every document in `collection`, in natural order.
    pub fn snapshot(&self, collection: Collection) -> Vec<Document> {
        self.inner
            .lock()
            .collections
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.inner
            .lock()
            .collections
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocStore for MemoryStore {
    fn engine(&self) -> StoreEngine {
        StoreEngine::Memory
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> StoreResult<Document> {
        let mut inner = self.inner.lock();
        inner.take_fault(StoreOp::FindOne, collection)?;
        let found = inner
            .docs(collection)
            .iter()
            .find(|doc| filter.matches(doc))
            .cloned();
        found.ok_or_else(|| StoreError::not_found(collection))
    }

    async fn find_many(&self, collection: Collection, filter: &Filter) -> StoreResult<DocStream> {
        let mut inner = self.inner.lock();
        inner.take_fault(StoreOp::FindMany, collection)?;
        let matched: Vec<Document> = inner
            .docs(collection)
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();
        Ok(stream::iter(matched.into_iter().map(Ok)).boxed())
    }

    async fn insert_one(&self, collection: Collection, mut doc: Document) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        inner.take_fault(StoreOp::InsertOne, collection)?;

        let id = match doc.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = bson::Bson::ObjectId(ObjectId::new());
                doc.insert("_id", id.clone());
                id
            }
        };

        let docs = inner.docs(collection);
        if docs.iter().any(|d| d.get("_id") == Some(&id)) {
            return Err(StoreError::DuplicateKey {
                collection,
                id: id.to_string(),
            });
        }
        docs.push(doc);
        Ok(())
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateOutcome> {
        let mut inner = self.inner.lock();
        inner.take_fault(StoreOp::UpdateOne, collection)?;

        let Some(current) = inner
            .docs(collection)
            .iter_mut()
            .find(|doc| filter.matches(doc))
        else {
            return Ok(UpdateOutcome::default());
        };

        let mut next = current.clone();
        update.apply(&mut next)?;
        let modified = next != *current;
        if modified {
            *current = next;
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let mut inner = self.inner.lock();
        inner.take_fault(StoreOp::DeleteOne, collection)?;

        let docs = inner.docs(collection);
        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(idx) => {
                docs.remove(idx);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let mut inner = self.inner.lock();
        inner.take_fault(StoreOp::DeleteMany, collection)?;

        let docs = inner.docs(collection);
        let before = docs.len();
        docs.retain(|doc| !filter.matches(doc));
        Ok((before - docs.len()) as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

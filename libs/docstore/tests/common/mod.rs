//! Backend-independent checks shared by the memory and MongoDB test suites.
#![allow(dead_code)]

use anyhow::Result;
use docstore::bson::{doc, oid::ObjectId, Bson};
use docstore::{Collection, DocStore, DocStoreExt, Filter, Update};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub children: Vec<ObjectId>,
}

pub async fn find_one_distinguishes_not_found(store: &dyn DocStore) -> Result<()> {
    let err = store
        .find_one(Collection::Users, &Filter::by_id(ObjectId::new()))
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
    Ok(())
}

pub async fn typed_round_trip(store: &dyn DocStore) -> Result<()> {
    let parent = Parent {
        id: ObjectId::new(),
        name: "Ann".into(),
        children: vec![],
    };
    store.insert_as(Collection::Users, &parent).await?;

    let loaded: Parent = store
        .fetch_one(Collection::Users, &Filter::by_id(parent.id))
        .await?;
    assert_eq!(loaded, parent);
    Ok(())
}

pub async fn find_many_preserves_insertion_order(store: &dyn DocStore) -> Result<()> {
    let owner = ObjectId::new();
    let names = ["first", "second", "third"];
    for name in names {
        store
            .insert_one(Collection::Tasks, doc! { "owner": owner, "name": name })
            .await?;
    }
    store
        .insert_one(Collection::Tasks, doc! { "owner": ObjectId::new(), "name": "other" })
        .await?;

    let docs: Vec<_> = store
        .find_many(Collection::Tasks, &Filter::all().eq("owner", owner))
        .await?
        .try_collect()
        .await?;
    let got: Vec<_> = docs
        .iter()
        .map(|d| d.get_str("name").unwrap().to_string())
        .collect();
    assert_eq!(got, names);
    Ok(())
}

pub async fn set_add_and_pull(store: &dyn DocStore) -> Result<()> {
    let id = ObjectId::new();
    store
        .insert_one(Collection::Projects, doc! { "_id": id, "tasks": [] })
        .await?;
    let (a, b, c) = (ObjectId::new(), ObjectId::new(), ObjectId::new());

    for child in [a, b, a, c] {
        let outcome = store
            .update_one(
                Collection::Projects,
                &Filter::by_id(id),
                &Update::add_to_set("tasks", child),
            )
            .await?;
        assert_eq!(outcome.matched, 1);
    }
    let doc = store
        .find_one(Collection::Projects, &Filter::by_id(id))
        .await?;
    assert_eq!(
        doc.get_array("tasks")?,
        &vec![Bson::ObjectId(a), Bson::ObjectId(b), Bson::ObjectId(c)]
    );

    store
        .update_one(
            Collection::Projects,
            &Filter::by_id(id),
            &Update::pull_in("tasks", [a, c]),
        )
        .await?;
    store
        .update_one(Collection::Projects, &Filter::by_id(id), &Update::pull("tasks", b))
        .await?;
    let doc = store
        .find_one(Collection::Projects, &Filter::by_id(id))
        .await?;
    assert!(doc.get_array("tasks")?.is_empty());
    Ok(())
}

pub async fn update_without_match_reports_zero(store: &dyn DocStore) -> Result<()> {
    let outcome = store
        .update_one(
            Collection::Users,
            &Filter::by_id(ObjectId::new()),
            &Update::set(doc! { "name": "ghost" }),
        )
        .await?;
    assert_eq!(outcome.matched, 0);
    assert_eq!(outcome.modified, 0);
    Ok(())
}

pub async fn deletes_count_removed_documents(store: &dyn DocStore) -> Result<()> {
    let group = ObjectId::new();
    let ids: Vec<ObjectId> = (0..4).map(|_| ObjectId::new()).collect();
    for id in &ids {
        store
            .insert_one(Collection::Tasks, doc! { "_id": *id, "group": group })
            .await?;
    }

    assert_eq!(
        store
            .delete_one(Collection::Tasks, &Filter::by_id(ids[0]))
            .await?,
        1
    );
    // idempotent: second delete removes nothing
    assert_eq!(
        store
            .delete_one(Collection::Tasks, &Filter::by_id(ids[0]))
            .await?,
        0
    );

    let removed = store
        .delete_many(
            Collection::Tasks,
            &Filter::all().eq("group", group).is_in("_id", [ids[1], ids[2]]),
        )
        .await?;
    assert_eq!(removed, 2);

    let removed = store
        .delete_many(
            Collection::Tasks,
            &Filter::all().is_in("_id", Vec::<ObjectId>::new()),
        )
        .await?;
    assert_eq!(removed, 0);

    let left: Vec<_> = store
        .find_many(Collection::Tasks, &Filter::all().eq("group", group))
        .await?
        .try_collect()
        .await?;
    assert_eq!(left.len(), 1);

    let remaining = store
        .find_one(Collection::Tasks, &Filter::all().eq("group", group))
        .await?;
    assert_eq!(remaining.get_object_id("_id")?, ids[3]);
    Ok(())
}

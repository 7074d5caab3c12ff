//! Persisted document shapes.
//!
//! Child-id arrays decode as empty when missing or `null` (older writers
//! stored nil arrays as `null`); the coordinator never has to probe for them.

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};

/// Field names shared by filters, updates and the document structs.
pub mod fields {
    pub const ID: &str = "_id";
    pub const USER_ID: &str = "userId";
    pub const PROJECT_ID: &str = "projectId";
    pub const PROJECTS: &str = "projects";
    pub const TASKS: &str = "tasks";

    pub const NAME: &str = "name";
    pub const OCCUPATION: &str = "work";
    pub const AGE: &str = "age";
    pub const SALARY: &str = "salary";
    pub const EMAIL: &str = "email";

    pub const DESCRIPTION: &str = "description";
    pub const PRIORITY: &str = "priority";
    pub const AUTHOR: &str = "author";
    pub const RESPONSIBLE: &str = "responsible";
    pub const PERFORMERS: &str = "performers";
    pub const DATE_CREATION: &str = "dateCreation";
    pub const DEADLINE: &str = "deadline";
    pub const GUESTS: &str = "guests";
    pub const STATUS: &str = "status";
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ObjectId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ObjectId>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(rename = "work")]
    pub occupation: String,
    pub age: i32,
    pub salary: i64,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub projects: Vec<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub name: String,
    pub description: String,
    pub priority: i32,
    pub author: String,
    pub responsible: String,
    pub performers: String,
    pub date_creation: bson::DateTime,
    #[serde(default)]
    pub deadline: Option<bson::DateTime>,
    pub guests: String,
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tasks: Vec<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub project_id: ObjectId,
    pub name: String,
    pub description: String,
    pub priority: i32,
    pub author: String,
    pub responsible: String,
    pub performers: String,
    pub date_creation: bson::DateTime,
    #[serde(default)]
    pub deadline: Option<bson::DateTime>,
    pub guests: String,
    pub status: String,
}

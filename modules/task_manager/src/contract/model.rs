use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use bson::Bson;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::error::TaskManagerError;

macro_rules! object_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(ObjectId);

        impl $name {
            pub const KIND: &'static str = $kind;

            /// Fresh, never reused identifier.
            pub fn generate() -> Self {
                Self(ObjectId::new())
            }

            pub fn as_object_id(&self) -> ObjectId {
                self.0
            }
        }

        impl From<ObjectId> for $name {
            fn from(oid: ObjectId) -> Self {
                Self(oid)
            }
        }

        impl From<$name> for ObjectId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<$name> for Bson {
            fn from(id: $name) -> Self {
                Bson::ObjectId(id.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = TaskManagerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ObjectId::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| TaskManagerError::invalid_reference($kind, s))
            }
        }
    };
}

object_id!(
    /// Identifier of a [`User`].
    UserId,
    "user"
);
object_id!(
    /// Identifier of a [`Project`].
    ProjectId,
    "project"
);
object_id!(
    /// Identifier of a [`Task`].
    TaskId,
    "task"
);

/// A user together with the ids of the projects it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub occupation: String,
    pub age: i32,
    pub salary: i64,
    pub email: String,
    /// Maintained by the coordinator; never written by callers.
    pub projects: Vec<ProjectId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub occupation: String,
    pub age: i32,
    pub salary: i64,
    pub email: String,
}

/// Sparse update: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub occupation: Option<String>,
    pub age: Option<i32>,
    pub salary: Option<i64>,
    pub email: Option<String>,
}

impl UserPatch {
    /// Patch carrying only the non-empty / non-zero fields of a full payload.
    pub fn from_payload(new: &NewUser) -> Self {
        Self {
            name: non_empty(&new.name),
            occupation: non_empty(&new.occupation),
            age: non_zero(new.age),
            salary: non_zero(new.salary),
            email: non_empty(&new.email),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Owner; fixed at creation.
    pub user_id: UserId,
    pub name: String,
    pub description: String,
    pub priority: i32,
    pub author: String,
    pub responsible: String,
    pub performers: String,
    pub created_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub guests: String,
    pub status: String,
    /// Maintained by the coordinator; never written by callers.
    pub tasks: Vec<TaskId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub priority: i32,
    pub author: String,
    pub responsible: String,
    pub performers: String,
    pub deadline: Option<DateTime<Utc>>,
    pub guests: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<i32>,
    pub author: Option<String>,
    pub responsible: Option<String>,
    pub performers: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub guests: Option<String>,
    pub status: Option<String>,
}

impl ProjectPatch {
    /// Patch carrying only the non-empty / non-zero fields of a full payload.
    pub fn from_payload(new: &NewProject) -> Self {
        Self {
            name: non_empty(&new.name),
            description: non_empty(&new.description),
            priority: non_zero(new.priority),
            author: non_empty(&new.author),
            responsible: non_empty(&new.responsible),
            performers: non_empty(&new.performers),
            deadline: new.deadline,
            guests: non_empty(&new.guests),
            status: non_empty(&new.status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Owning project; fixed at creation.
    pub project_id: ProjectId,
    pub name: String,
    pub description: String,
    pub priority: i32,
    pub author: String,
    pub responsible: String,
    pub performers: String,
    pub created_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub guests: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub priority: i32,
    pub author: String,
    pub responsible: String,
    pub performers: String,
    pub deadline: Option<DateTime<Utc>>,
    pub guests: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<i32>,
    pub author: Option<String>,
    pub responsible: Option<String>,
    pub performers: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub guests: Option<String>,
    pub status: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn non_zero<T: Default + PartialEq + Copy>(value: T) -> Option<T> {
    (value != T::default()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_hex() {
        let id = ProjectId::generate();
        let parsed: ProjectId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_id_is_an_invalid_reference() {
        let err = "not-an-id".parse::<UserId>().unwrap_err();
        assert!(matches!(
            err,
            TaskManagerError::InvalidReference { kind: "user", .. }
        ));
    }

    #[test]
    fn payload_patch_keeps_only_meaningful_fields() {
        let patch = UserPatch::from_payload(&NewUser {
            name: "Ann".into(),
            age: 0,
            salary: 4200,
            ..NewUser::default()
        });
        assert_eq!(
            patch,
            UserPatch {
                name: Some("Ann".into()),
                salary: Some(4200),
                ..UserPatch::default()
            }
        );
        assert!(UserPatch::from_payload(&NewUser::default()).is_empty());
    }

    #[test]
    fn project_payload_patch_skips_zero_priority() {
        let patch = ProjectPatch::from_payload(&NewProject {
            status: "open".into(),
            ..NewProject::default()
        });
        assert_eq!(patch.status.as_deref(), Some("open"));
        assert!(patch.priority.is_none());
        assert!(patch.name.is_none());
    }
}

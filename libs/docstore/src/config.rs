//! Store configuration types.
//!
//! Deserialized from the `store` section of the application config. Durations
//! accept humantime strings (`"10s"`, `"250ms"`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Collection;

/// Connection settings for the document store.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// `mongodb://...`, `mongodb+srv://...` or `memory://`.
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub collections: CollectionNames,
    /// Upper bound for connection establishment and the startup ping.
    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    pub connect_timeout: Duration,
    /// Optional deadline for every steady-state call. None = unbounded.
    #[serde(with = "humantime_serde", default)]
    pub op_timeout: Option<Duration>,
    #[serde(default)]
    pub app_name: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
            collections: CollectionNames::default(),
            connect_timeout: default_connect_timeout(),
            op_timeout: None,
            app_name: None,
        }
    }
}

impl StoreConfig {
    /// URI with the password (if any) masked, safe for logs.
    pub fn redacted_uri(&self) -> String {
        match url::Url::parse(&self.uri) {
            Ok(mut url) if url.password().is_some() => {
                let _ = url.set_password(Some("***"));
                url.to_string()
            }
            _ => self.uri.clone(),
        }
    }
}

/// Physical collection names.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct CollectionNames {
    pub users: String,
    pub projects: String,
    pub tasks: String,
    pub employees: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            users: Collection::Users.as_str().to_string(),
            projects: Collection::Projects.as_str().to_string(),
            tasks: Collection::Tasks.as_str().to_string(),
            employees: Collection::Employees.as_str().to_string(),
        }
    }
}

impl CollectionNames {
    pub fn name_of(&self, collection: Collection) -> &str {
        match collection {
            Collection::Users => &self.users,
            Collection::Projects => &self.projects,
            Collection::Tasks => &self.tasks,
            Collection::Employees => &self.employees,
        }
    }
}

fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "taskhub".to_string()
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

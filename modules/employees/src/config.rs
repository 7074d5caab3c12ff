use serde::{Deserialize, Serialize};

/// Where employee records live.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmployeesBackend {
    /// Process-local map, lost on restart.
    #[default]
    Memory,
    /// The `employees` collection of the shared document store.
    Store,
}

/// Configuration for the employees module (`modules.employees`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EmployeesConfig {
    #[serde(default)]
    pub backend: EmployeesBackend,
}

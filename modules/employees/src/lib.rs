//! Legacy employee records: a single collection with integer ids, served
//! from memory or from the shared document store.

// === PUBLIC CONTRACT ===
pub mod contract;
pub use contract::{client, error, model};

pub mod config;
pub use config::{EmployeesBackend, EmployeesConfig};

pub mod module;
pub use module::Employees;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;

//! Users, projects and tasks over a document store, with the parent →
//! child id arrays kept consistent by the domain service.

// === PUBLIC CONTRACT ===
pub mod contract;
pub use contract::{client, error, model};

pub mod config;
pub use config::TaskManagerConfig;

pub mod module;
pub use module::TaskManager;

// === INTERNAL MODULES ===
// Exposed for tests; other crates should go through `contract`.
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;

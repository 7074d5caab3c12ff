//! Process-level plumbing shared by TaskHub binaries: layered configuration
//! loading and logging bootstrap.

pub mod config;
pub mod home_dir;
pub mod logging;

pub use config::{AppConfig, CliArgs, LoggingConfig, Section, ServerConfig};
pub use docstore::StoreConfig;

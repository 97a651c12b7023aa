//! Configuration system: schema, loading, and persistence.
//!
//! # Usage
//! ```no_run
//! use chatcli_core::config::{self, ConfigStore};
//!
//! let cfg = config::load_config(None);
//! println!("Default provider: {}", cfg.get_default_provider());
//! ```

pub mod loader;
pub mod schema;
pub mod store;

// Re-export key types
pub use loader::{get_config_path, load_config, save_config};
pub use schema::{Config, ProviderSettings};
pub use store::{ConfigFile, ConfigStore};

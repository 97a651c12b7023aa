//! Core types, configuration and path helpers shared by the ChatCLI crates.

pub mod config;
pub mod types;
pub mod utils;

pub use types::{Message, Role};

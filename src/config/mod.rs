//! Configuration loading and host settings
//!
//! Handles loading from the config file and environment variables
//! with precedence (Env > File > Defaults).

pub mod loader;
pub mod settings;

pub use loader::{default_config_dir, load_config};
pub use settings::{ApiProtocol, Config, HostConfig, DEFAULT_HOST};

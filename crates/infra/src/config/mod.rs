//! Configuration loading
//!
//! Environment-first loading with a config-file fallback; the probing
//! order and recognised variables live in [`loader`].

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};

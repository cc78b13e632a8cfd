// src/config/mod.rs
// Configuration and shared constants

pub mod env;
pub mod file;

pub use env::{ApiKeys, ConfigValidation, DEFAULT_POLL_INTERVAL, EnvConfig};
pub use file::StudioConfig;

// src/config/mod.rs

//! Configuration loading and validation for dojowatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the effective `WatchConfig` (`model.rs`).
//! - Load an optional config file from disk (`loader.rs`).
//! - Merge file + CLI values and validate them (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{Action, RawConfigFile, WatchConfig, WatchSection};
pub use validate::{resolve, Overrides};

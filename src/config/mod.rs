//! Configuration module for motorclub-onboard
//!
//! Holds the tunables of the add-vehicle flow and their TOML loading.

pub mod flow;

pub use flow::{ConfigError, FlowConfig};

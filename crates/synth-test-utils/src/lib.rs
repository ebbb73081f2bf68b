//! Shared test utilities for the synth configuration workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`conf`]: [`TestConfigDir`] builder for configuration directories
//! - [`fixtures`]: paths to the checked-in reference configuration

pub mod conf;
pub mod fixtures;

pub use conf::TestConfigDir;

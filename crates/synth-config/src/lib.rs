//! Composable, validated configuration for the cutout synthesis pipeline
//!
//! This crate turns a directory of configuration documents into one
//! immutable, fully resolved settings tree:
//!
//! - **Composition**: the root document's `defaults` list merges group
//!   variants (`paths: default`) and its own keys in a fixed order
//! - **Overrides**: caller-supplied `key=value` expressions win over files
//! - **Interpolation**: `${a.b.c}` references resolve against the final tree
//! - **Validation**: every entry in `tasks` must name a top-level section
//! - **Typed access**: [`ResolvedConfig::get`] and the [`PipelineSettings`] schema
//!
//! # Architecture
//!
//! ```text
//!                 synth-cli
//!                     |
//!               synth-config
//!                     |
//!                 synth-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! let config = synth_config::load("conf", "config", &["general.project_name=demo"])?;
//! let run_dir: String = config.get("paths.run_dir")?;
//! for task in config.pipeline()?.task_plan() {
//!     println!("{task}");
//! }
//! ```

pub mod compose;
pub mod document;
pub mod error;
pub mod interpolate;
pub mod key_path;
pub mod loader;
pub mod merge;
pub mod overrides;
pub mod registry;
pub mod resolved;
pub mod schema;
pub mod validate;

pub use document::{DefaultsEntry, Document, Package};
pub use error::{Error, Result};
pub use key_path::KeyPath;
pub use loader::{ConfigLoader, load};
pub use overrides::Override;
pub use registry::GroupRegistry;
pub use resolved::{FromValue, ResolvedConfig, ScalarType};
pub use schema::{PipelineSettings, Task};

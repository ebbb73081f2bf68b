//! Command implementations for synth-cli

pub mod get;
pub mod groups;
pub mod show;
pub mod tasks;

pub use get::run_get;
pub use groups::run_groups;
pub use show::run_show;
pub use tasks::run_tasks;

use serde_json::Value;

use crate::error::Result;

/// Render a value as pretty JSON or as a YAML document.
pub(crate) fn render(value: &Value, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(value)?);
    }
    let yaml = serde_yaml::to_string(value)?;
    Ok(yaml.trim_end().to_string())
}

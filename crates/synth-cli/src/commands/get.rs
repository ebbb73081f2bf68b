//! Print a single configuration value

use serde_json::Value;
use synth_config::ScalarType;

use crate::commands::render;
use crate::context::ConfigContext;
use crate::error::Result;

/// Run the get command
///
/// Strings are printed bare so the output can be used in shell scripts;
/// everything else is rendered like `show` does.
pub fn run_get(
    context: &ConfigContext,
    key: &str,
    value_type: &str,
    overrides: &[String],
    json: bool,
) -> Result<()> {
    let expected: ScalarType = value_type.parse()?;
    let config = context.load(overrides)?;
    let value = config.get_as(key, expected)?;

    let output = match &value {
        Value::String(text) if !json => text.clone(),
        other => render(other, json)?,
    };
    println!("{output}");
    Ok(())
}

//! Print the resolved configuration

use crate::commands::render;
use crate::context::ConfigContext;
use crate::error::Result;

/// Run the show command
pub fn run_show(context: &ConfigContext, overrides: &[String], json: bool) -> Result<()> {
    let config = context.load(overrides)?;
    println!("{}", render(config.as_value(), json)?);
    Ok(())
}

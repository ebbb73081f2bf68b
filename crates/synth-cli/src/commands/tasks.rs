//! List the tasks to run

use colored::Colorize;
use synth_config::Task;

use crate::context::ConfigContext;
use crate::error::Result;

/// Run the tasks command
pub fn run_tasks(context: &ConfigContext, overrides: &[String], json: bool) -> Result<()> {
    let config = context.load(overrides)?;
    let tasks = config.tasks();

    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("{}", "No tasks configured.".dimmed());
        return Ok(());
    }

    for (index, name) in tasks.iter().enumerate() {
        let label = match Task::from(name.as_str()) {
            Task::Other(_) => "custom".dimmed(),
            _ => "stage".cyan(),
        };
        println!("{:>2}. {:<16} {}", index + 1, name.green(), label);
    }
    Ok(())
}

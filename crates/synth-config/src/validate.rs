//! Post-resolution checks

use serde_json::Value;

use crate::{Error, Result};

/// Key holding the ordered task list.
pub const TASKS_KEY: &str = "tasks";

/// Below this `synthesize.resize_factor` synthesis is known to misbehave.
pub const MIN_RECOMMENDED_RESIZE_FACTOR: f64 = 0.15;

/// Validate the `tasks` list against the top-level sections of `tree`.
///
/// Returns the task names in order. A missing or null `tasks` key is an
/// empty plan; null entries are skipped.
pub fn validate_tasks(tree: &Value) -> Result<Vec<String>> {
    let entries = match tree.get(TASKS_KEY) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(Error::type_mismatch(TASKS_KEY, "sequence of strings", other));
        }
    };

    let mut tasks = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let task = match entry {
            Value::Null => continue,
            Value::String(task) => task,
            other => {
                return Err(Error::type_mismatch(
                    format!("{TASKS_KEY}.{index}"),
                    "string",
                    other,
                ));
            }
        };

        let is_section = task != TASKS_KEY && tree.get(task.as_str()).is_some();
        if !is_section {
            return Err(Error::UnknownTask {
                task: task.clone(),
                available: sections(tree),
            });
        }
        tasks.push(task.clone());
    }

    Ok(tasks)
}

/// Top-level section names other than `tasks`, in document order.
pub fn sections(tree: &Value) -> Vec<String> {
    tree.as_object()
        .map(|map| {
            map.keys()
                .filter(|key| key.as_str() != TASKS_KEY)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Log operational hints that are not hard errors.
pub fn warn_on_hints(tree: &Value) {
    let factor = tree
        .pointer("/synthesize/resize_factor")
        .and_then(Value::as_f64);
    if let Some(factor) = factor.filter(|f| *f < MIN_RECOMMENDED_RESIZE_FACTOR) {
        tracing::warn!(
            resize_factor = factor,
            recommended_min = MIN_RECOMMENDED_RESIZE_FACTOR,
            "synthesize.resize_factor is below the recommended minimum and may give issues"
        );
    }
}

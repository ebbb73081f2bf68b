//! List composition groups and their variants

use colored::Colorize;
use serde_json::{Map, Value, json};
use synth_config::{DefaultsEntry, Document};
use synth_fs::{DocumentId, DocumentSource};

use crate::context::ConfigContext;
use crate::error::Result;

/// Run the groups command
///
/// Variants selected by the root document's defaults list are marked.
pub fn run_groups(context: &ConfigContext, json: bool) -> Result<()> {
    let loader = context.loader()?;
    let root = Document::parse(
        &loader
            .source()
            .read(&DocumentId::root(context.config_name()))?,
    )?;
    let selected = |group: &str| -> Option<String> {
        root.effective_defaults().into_iter().find_map(|entry| match entry {
            DefaultsEntry::Group { group: name, variant } if name == group => variant,
            _ => None,
        })
    };

    let registry = loader.registry();
    if json {
        let mut groups = Map::new();
        for group in registry.groups() {
            groups.insert(
                group.clone(),
                json!({
                    "variants": registry.variants(&group),
                    "selected": selected(group.as_str()),
                }),
            );
        }
        println!("{}", serde_json::to_string_pretty(&Value::Object(groups))?);
        return Ok(());
    }

    if registry.is_empty() {
        println!("{}", "No groups found.".dimmed());
        return Ok(());
    }

    for group in registry.groups() {
        println!("{}:", group.cyan().bold());
        let current = selected(group.as_str());
        for variant in registry.variants(&group) {
            if current.as_deref() == Some(variant.as_str()) {
                println!("  {} {}", variant.green(), "(selected)".dimmed());
            } else {
                println!("  {variant}");
            }
        }
    }
    Ok(())
}

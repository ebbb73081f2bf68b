//! Composition of the root document with its group variants
//!
//! Walks the root document's defaults list in order, merging each selected
//! group document under its package and the root's inline keys at the
//! `_self_` position. Value overrides are applied last.

use serde_json::{Map, Value};
use synth_fs::{DocumentId, DocumentSource};

use crate::document::{DefaultsEntry, Document};
use crate::merge::deep_merge;
use crate::{Error, GroupRegistry, KeyPath, Override, Result};

/// Compose the tree for the root document `entry`.
///
/// The result is unresolved: `${...}` references are still strings.
pub fn compose(
    source: &dyn DocumentSource,
    registry: &GroupRegistry,
    entry: &str,
    overrides: &[Override],
) -> Result<Value> {
    let root = Document::parse(&source.read(&DocumentId::root(entry))?)?;
    let defaults = select_variants(&root, overrides);

    let mut tree = Value::Object(Map::new());
    for directive in &defaults {
        match directive {
            DefaultsEntry::SelfMarker => {
                tracing::debug!(document = %root.id, "Merging inline keys");
                deep_merge(&mut tree, &root.body);
            }
            DefaultsEntry::Group {
                group,
                variant: None,
            } => {
                tracing::debug!(group = %group, "Group disabled, skipping");
            }
            DefaultsEntry::Group {
                group,
                variant: Some(variant),
            } => {
                let layer = load_group(source, registry, group, variant)?;
                deep_merge(&mut tree, &layer);
            }
        }
    }

    for item in overrides.iter().filter(|o| !is_selection(o, &root)) {
        item.apply(&mut tree)?;
    }

    Ok(tree)
}

/// The root's defaults list with group overrides folded in.
///
/// A selection for a group the list does not name is appended at the end.
fn select_variants(root: &Document, overrides: &[Override]) -> Vec<DefaultsEntry> {
    let groups = root.group_names();
    let mut defaults = root.effective_defaults();

    for (group, variant) in overrides.iter().filter_map(|o| o.group_selection(&groups)) {
        tracing::debug!(group = %group, variant = ?variant, "Group selected by override");
        let existing = defaults.iter_mut().find_map(|entry| match entry {
            DefaultsEntry::Group { group: name, variant } if *name == group => Some(variant),
            _ => None,
        });
        match existing {
            Some(slot) => *slot = variant,
            None => defaults.push(DefaultsEntry::Group { group, variant }),
        }
    }

    defaults
}

fn is_selection(item: &Override, root: &Document) -> bool {
    item.group_selection(&root.group_names()).is_some()
}

/// Read one group variant and place its body under its package.
fn load_group(
    source: &dyn DocumentSource,
    registry: &GroupRegistry,
    group: &str,
    variant: &str,
) -> Result<Value> {
    let id = registry.lookup(group, variant)?;
    let document = Document::parse(&source.read(id)?)?;
    if document.defaults.is_some() {
        return Err(Error::Parse {
            document: id.to_string(),
            message: "group documents cannot carry a defaults list".to_string(),
        });
    }

    let target = document.package.target(group)?;
    tracing::debug!(document = %id, package = %target, "Merging group variant");
    Ok(wrap(&target, document.body))
}

/// Nest `body` under `target`.
fn wrap(target: &KeyPath, body: Value) -> Value {
    if target.is_root() {
        return body;
    }
    let mut tree = Value::Object(Map::new());
    target.set(&mut tree, body);
    tree
}

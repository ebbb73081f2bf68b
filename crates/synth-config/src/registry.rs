//! Registry of composition groups
//!
//! Maps each group name to its variants and each variant to the document
//! holding it, so the composer resolves `paths: default` by explicit lookup.

use std::collections::BTreeMap;

use synth_fs::{DocumentId, DocumentSource};

use crate::{Error, Result};

/// Registry mapping group -> variant -> document.
///
/// # Example
///
/// ```
/// use synth_config::GroupRegistry;
/// use synth_fs::DocumentId;
///
/// let mut registry = GroupRegistry::new();
/// registry.register("paths", "default", DocumentId::variant("paths", "default"));
/// assert!(registry.has_variant("paths", "default"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: BTreeMap<String, BTreeMap<String, DocumentId>>,
}

impl GroupRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from every group a source offers.
    pub fn discover(source: &dyn DocumentSource) -> Result<Self> {
        let mut registry = Self::new();
        for (group, variants) in source.groups()? {
            for variant in variants {
                let id = DocumentId::variant(group.as_str(), variant.as_str());
                registry.register(group.as_str(), variant, id);
            }
        }
        tracing::debug!(
            source = %source.describe(),
            groups = registry.len(),
            "Discovered configuration groups"
        );
        Ok(registry)
    }

    /// Register the document for `group`/`variant`.
    ///
    /// If the pair was already registered, the previous document is
    /// replaced.
    pub fn register(
        &mut self,
        group: impl Into<String>,
        variant: impl Into<String>,
        document: DocumentId,
    ) {
        self.groups
            .entry(group.into())
            .or_default()
            .insert(variant.into(), document);
    }

    /// Look up the document for `group`/`variant`.
    ///
    /// # Errors
    ///
    /// `MissingGroup` when either the group or the variant is unknown.
    pub fn lookup(&self, group: &str, variant: &str) -> Result<&DocumentId> {
        self.groups
            .get(group)
            .and_then(|variants| variants.get(variant))
            .ok_or_else(|| Error::MissingGroup {
                group: group.to_string(),
                variant: variant.to_string(),
                available: self.variants(group),
            })
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    pub fn has_variant(&self, group: &str, variant: &str) -> bool {
        self.groups
            .get(group)
            .is_some_and(|variants| variants.contains_key(variant))
    }

    /// Sorted group names.
    pub fn groups(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    /// Sorted variant names of `group`, empty for an unknown group.
    pub fn variants(&self, group: &str) -> Vec<String> {
        self.groups
            .get(group)
            .map(|variants| variants.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

//! Document sources
//!
//! The loader never touches the filesystem directly. It asks a
//! [`DocumentSource`] for documents by [`DocumentId`]:
//!
//! ```text
//! conf/
//!   config.yaml              <- DocumentId::root("config")
//!   paths/
//!     default.yaml           <- DocumentId::variant("paths", "default")
//!   cutout_filters/
//!     default.yaml
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;

use crate::{DocumentFormat, Error, NormalizedPath, Result, io};

/// Identifies a document within a source: an optional group and a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId {
    group: Option<String>,
    name: String,
}

impl DocumentId {
    /// A top-level document such as the entry `config`.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            group: None,
            name: name.into(),
        }
    }

    /// The `variant` document of `group` (e.g. `paths/default`).
    pub fn variant(group: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            name: variant.into(),
        }
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative location without extension, e.g. `paths/default`.
    pub fn relative_path(&self) -> String {
        match &self.group {
            Some(group) => format!("{}/{}", group, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path())
    }
}

/// Raw text of a document together with its detected format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub id: DocumentId,
    pub format: DocumentFormat,
    pub text: String,
}

/// Somewhere documents can be read from.
pub trait DocumentSource {
    /// Read the document identified by `id`.
    fn read(&self, id: &DocumentId) -> Result<RawDocument>;

    /// All groups this source offers, each with its sorted variant names.
    fn groups(&self) -> Result<BTreeMap<String, Vec<String>>>;

    /// Short description used in log and error messages.
    fn describe(&self) -> String;
}

/// Reads documents from a configuration directory.
///
/// A document id `group/name` maps to `<root>/group/name.<ext>`, probing
/// [`DocumentFormat::EXTENSIONS`] in order.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: NormalizedPath,
}

impl DirectorySource {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn locate(&self, id: &DocumentId) -> Option<(NormalizedPath, DocumentFormat)> {
        let base = id.relative_path();
        DocumentFormat::EXTENSIONS.iter().find_map(|ext| {
            let candidate = self.root.join(&format!("{base}.{ext}"));
            if candidate.is_file() {
                DocumentFormat::from_extension(ext)
                    .ok()
                    .map(|format| (candidate, format))
            } else {
                None
            }
        })
    }

    fn collect_groups(
        &self,
        dir: &NormalizedPath,
        prefix: &str,
        groups: &mut BTreeMap<String, Vec<String>>,
    ) -> Result<()> {
        let entries = fs::read_dir(dir.to_native()).map_err(|e| Error::io(dir.to_native(), e))?;

        for entry in entries {
            let entry = entry.map_err(|e| Error::io(dir.to_native(), e))?;
            let path = NormalizedPath::new(entry.path());
            let Some(name) = path.file_name().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
            if file_type.is_symlink() && path.is_dir() {
                tracing::debug!(path = %path, "Skipping symlinked directory");
                continue;
            }

            if file_type.is_dir() {
                let group = if prefix.is_empty() {
                    name
                } else {
                    format!("{prefix}/{name}")
                };
                self.collect_groups(&path, &group, groups)?;
            } else if !prefix.is_empty() {
                let known = path
                    .extension()
                    .is_some_and(|ext| DocumentFormat::from_extension(ext).is_ok());
                let Some(stem) = path.file_stem().filter(|_| known) else {
                    continue;
                };
                let variants = groups.entry(prefix.to_string()).or_default();
                if !variants.iter().any(|v| v == stem) {
                    variants.push(stem.to_string());
                }
            }
        }

        Ok(())
    }
}

impl DocumentSource for DirectorySource {
    fn read(&self, id: &DocumentId) -> Result<RawDocument> {
        let (path, format) = self.locate(id).ok_or_else(|| Error::DocumentNotFound {
            id: id.to_string(),
            searched: self.root.to_string(),
        })?;
        tracing::debug!(document = %id, path = %path, "Reading document");
        let text = io::read_text(&path)?;
        Ok(RawDocument {
            id: id.clone(),
            format,
            text,
        })
    }

    fn groups(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let mut groups = BTreeMap::new();
        if !self.root.is_dir() {
            return Ok(groups);
        }
        self.collect_groups(&self.root, "", &mut groups)?;
        for variants in groups.values_mut() {
            variants.sort();
        }
        Ok(groups)
    }

    fn describe(&self) -> String {
        self.root.to_string()
    }
}

/// An in-memory document store, for embedded configurations and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: BTreeMap<DocumentId, (DocumentFormat, String)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a YAML document.
    pub fn insert(&mut self, id: DocumentId, text: impl Into<String>) {
        self.insert_with_format(id, DocumentFormat::Yaml, text);
    }

    pub fn insert_with_format(
        &mut self,
        id: DocumentId,
        format: DocumentFormat,
        text: impl Into<String>,
    ) {
        self.documents.insert(id, (format, text.into()));
    }

    /// Builder-style [`MemorySource::insert`].
    pub fn with(mut self, id: DocumentId, text: impl Into<String>) -> Self {
        self.insert(id, text);
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn read(&self, id: &DocumentId) -> Result<RawDocument> {
        let (format, text) = self.documents.get(id).ok_or_else(|| Error::DocumentNotFound {
            id: id.to_string(),
            searched: self.describe(),
        })?;
        Ok(RawDocument {
            id: id.clone(),
            format: *format,
            text: text.clone(),
        })
    }

    fn groups(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for id in self.documents.keys() {
            if let Some(group) = id.group() {
                groups
                    .entry(group.to_string())
                    .or_default()
                    .push(id.name().to_string());
            }
        }
        for variants in groups.values_mut() {
            variants.sort();
        }
        Ok(groups)
    }

    fn describe(&self) -> String {
        format!("<memory: {} documents>", self.documents.len())
    }
}

//! Parsing of individual configuration documents
//!
//! A document is a mapping. The root document may carry a `defaults` list
//! naming the group variants to compose:
//!
//! ```yaml
//! defaults:
//!   - cutout_filters: default
//!   - paths: default
//!   - _self_
//!
//! general:
//!   project_name: example
//! ```
//!
//! A group document may start with a `# @package <target>` header choosing
//! where its content lands in the composed tree.

use serde_json::{Map, Value};
use synth_fs::{DocumentId, RawDocument};

use crate::{Error, KeyPath, Result};

/// Reserved top-level key holding the composition directives.
pub const DEFAULTS_KEY: &str = "defaults";

/// Marker placing the root document's own keys within the defaults list.
pub const SELF_MARKER: &str = "_self_";

const PACKAGE_DIRECTIVE: &str = "@package";

/// One composition directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultsEntry {
    /// Merge `group/variant`. A `None` variant (`group: null`) skips the group.
    Group {
        group: String,
        variant: Option<String>,
    },
    /// Merge the document's own inline keys here.
    SelfMarker,
}

/// Where a group document's content is placed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Package {
    /// Under the group's own key path (`paths/default` -> `paths`).
    #[default]
    Group,
    /// At the root of the tree.
    Global,
    /// At an explicit key path.
    Path(KeyPath),
}

impl Package {
    /// Key path the content of `group` is placed under.
    pub fn target(&self, group: &str) -> Result<KeyPath> {
        match self {
            Package::Group => KeyPath::parse(&group.replace('/', ".")),
            Package::Global => Ok(KeyPath::root()),
            Package::Path(path) => Ok(path.clone()),
        }
    }
}

/// A parsed document: its composition directives and its inline body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    /// `None` when the document has no `defaults` key at all.
    pub defaults: Option<Vec<DefaultsEntry>>,
    /// Everything except the `defaults` key.
    pub body: Value,
    pub package: Package,
}

impl Document {
    /// Parse a raw document read from a source.
    pub fn parse(raw: &RawDocument) -> Result<Self> {
        let document = raw.id.to_string();
        let value: Value = raw
            .format
            .parse(&raw.text, &document)
            .map_err(|e| match e {
                synth_fs::Error::ConfigParse { message, .. } => Error::Parse {
                    document: document.clone(),
                    message,
                },
                other => Error::Fs(other),
            })?;

        let mut body = match value {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(Error::Parse {
                    document,
                    message: format!(
                        "top level must be a mapping, found {}",
                        crate::error::value_kind(&other)
                    ),
                });
            }
        };

        let defaults = body
            .shift_remove(DEFAULTS_KEY)
            .map(|list| parse_defaults(&document, list))
            .transpose()?;

        Ok(Self {
            package: parse_package(&document, &raw.text)?,
            id: raw.id.clone(),
            defaults,
            body: Value::Object(body),
        })
    }

    /// Parse YAML text directly, mostly useful in tests.
    pub fn parse_str(id: DocumentId, text: &str) -> Result<Self> {
        Self::parse(&RawDocument {
            id,
            format: Default::default(),
            text: text.to_string(),
        })
    }

    /// The defaults list, with `_self_` appended when it was left out.
    pub fn effective_defaults(&self) -> Vec<DefaultsEntry> {
        let mut entries = self.defaults.clone().unwrap_or_default();
        if !entries.contains(&DefaultsEntry::SelfMarker) {
            entries.push(DefaultsEntry::SelfMarker);
        }
        entries
    }

    /// Names of the groups this document composes, in order.
    pub fn group_names(&self) -> Vec<&str> {
        self.defaults
            .iter()
            .flatten()
            .filter_map(|entry| match entry {
                DefaultsEntry::Group { group, .. } => Some(group.as_str()),
                DefaultsEntry::SelfMarker => None,
            })
            .collect()
    }
}

fn parse_defaults(document: &str, list: Value) -> Result<Vec<DefaultsEntry>> {
    let invalid = |reason: String| Error::InvalidDefaults {
        document: document.to_string(),
        reason,
    };

    let Value::Array(items) = list else {
        return Err(invalid("expected a sequence".into()));
    };

    let mut entries: Vec<DefaultsEntry> = Vec::with_capacity(items.len());
    for item in items {
        let entry = match item {
            Value::String(s) if s == SELF_MARKER => DefaultsEntry::SelfMarker,
            Value::Object(map) if map.len() == 1 => {
                let Some((group, variant)) = map.into_iter().next() else {
                    continue;
                };
                let variant = match variant {
                    Value::String(v) => Some(v),
                    Value::Null => None,
                    other => {
                        return Err(invalid(format!(
                            "variant of group '{}' must be a string or null, found {}",
                            group,
                            crate::error::value_kind(&other)
                        )));
                    }
                };
                DefaultsEntry::Group { group, variant }
            }
            other => {
                return Err(invalid(format!(
                    "entries must be '{}' or a single 'group: variant' pair, found {}",
                    SELF_MARKER, other
                )));
            }
        };

        let duplicate = entries.iter().any(|seen| match (seen, &entry) {
            (DefaultsEntry::SelfMarker, DefaultsEntry::SelfMarker) => true,
            (DefaultsEntry::Group { group: a, .. }, DefaultsEntry::Group { group: b, .. }) => {
                a == b
            }
            _ => false,
        });
        if duplicate {
            return Err(invalid(format!("duplicate entry {}", describe(&entry))));
        }
        entries.push(entry);
    }

    Ok(entries)
}

fn describe(entry: &DefaultsEntry) -> String {
    match entry {
        DefaultsEntry::SelfMarker => SELF_MARKER.to_string(),
        DefaultsEntry::Group { group, .. } => format!("for group '{group}'"),
    }
}

/// Look for `# @package <target>` among the leading comment lines.
fn parse_package(document: &str, text: &str) -> Result<Package> {
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        let Some(comment) = line.strip_prefix('#') else {
            break;
        };
        let Some(target) = comment.trim().strip_prefix(PACKAGE_DIRECTIVE) else {
            continue;
        };
        return match target.trim() {
            "_group_" => Ok(Package::Group),
            "_global_" => Ok(Package::Global),
            path => KeyPath::parse(path)
                .map(Package::Path)
                .map_err(|e| Error::Parse {
                    document: document.to_string(),
                    message: format!("bad package header: {e}"),
                }),
        };
    }
    Ok(Package::Group)
}

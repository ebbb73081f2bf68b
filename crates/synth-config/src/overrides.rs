//! Caller overrides
//!
//! Overrides use the familiar command-line grammar:
//!
//! - `synthesize.resize_factor=0.25` sets a value (parsed as YAML)
//! - `+aws.region=eu-west-1` same as above, accepted for compatibility
//! - `~mongodb.password` deletes a key
//! - `paths=cluster` selects another variant when `paths` is a group in
//!   the root document's defaults list

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::merge::deep_merge;
use crate::{Error, KeyPath, Result};

/// One caller-supplied override.
#[derive(Debug, Clone, PartialEq)]
pub enum Override {
    /// Store a literal value at a key path.
    Set { path: KeyPath, value: Value },
    /// Remove a key path.
    Delete { path: KeyPath },
    /// Choose a variant for a nested group such as `db/mongo=local`.
    SelectGroup {
        group: String,
        variant: Option<String>,
    },
}

impl Override {
    /// Parse an override expression.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidOverride {
            text: text.to_string(),
            reason,
        };

        if let Some(key) = text.strip_prefix('~') {
            if key.contains('=') {
                return Err(invalid("deletion takes no value".into()));
            }
            let path = KeyPath::parse(key.trim()).map_err(|e| invalid(e.to_string()))?;
            return Ok(Override::Delete { path });
        }

        let text_body = text.strip_prefix('+').unwrap_or(text);
        let Some((key, raw_value)) = text_body.split_once('=') else {
            return Err(invalid("expected 'key=value' or '~key'".into()));
        };
        let key = key.trim();

        let value: Value = serde_yaml::from_str(raw_value.trim())
            .map_err(|e| invalid(format!("value is not a valid literal: {e}")))?;

        if key.contains('/') {
            if key.split('/').any(str::is_empty) {
                return Err(invalid("empty group segment".into()));
            }
            let variant = variant_name(&value).ok_or_else(|| {
                invalid("a group selection needs a variant name or null".into())
            })?;
            return Ok(Override::SelectGroup {
                group: key.to_string(),
                variant,
            });
        }

        let path = KeyPath::parse(key).map_err(|e| invalid(e.to_string()))?;
        Ok(Override::Set { path, value })
    }

    /// Parse a list of override expressions, stopping at the first error.
    pub fn parse_all<I, S>(texts: I) -> Result<Vec<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|text| Self::parse(text.as_ref()))
            .collect()
    }

    /// If this override picks a variant for one of `groups`, return the
    /// group and the chosen variant.
    pub fn group_selection(&self, groups: &[&str]) -> Option<(String, Option<String>)> {
        match self {
            Override::SelectGroup { group, variant } => Some((group.clone(), variant.clone())),
            Override::Set { path, value } if path.segments().len() == 1 => {
                let key = path.head()?;
                if groups.contains(&key) {
                    variant_name(value).map(|variant| (key.to_string(), variant))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Apply a value override to `tree`. Group selections are a no-op here.
    ///
    /// A mapping set onto an existing mapping is deep-merged into it; any
    /// other value replaces what was there.
    pub fn apply(&self, tree: &mut Value) -> Result<()> {
        match self {
            Override::Set { path, value } => {
                tracing::debug!(path = %path, "Applying override");
                let merge = value.is_object() && path.lookup(tree).is_some_and(Value::is_object);
                match path.lookup_mut(tree).filter(|_| merge) {
                    Some(existing) => deep_merge(existing, value),
                    None => path.set(tree, value.clone()),
                }
                Ok(())
            }
            Override::Delete { path } => {
                tracing::debug!(path = %path, "Deleting key");
                path.remove(tree)
                    .map(|_| ())
                    .ok_or_else(|| Error::KeyNotFound {
                        path: path.to_string(),
                    })
            }
            Override::SelectGroup { .. } => Ok(()),
        }
    }
}

fn variant_name(value: &Value) -> Option<Option<String>> {
    match value {
        Value::String(s) => Some(Some(s.clone())),
        Value::Null => Some(None),
        _ => None,
    }
}

impl FromStr for Override {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Override::Set { path, value } => write!(f, "{path}={value}"),
            Override::Delete { path } => write!(f, "~{path}"),
            Override::SelectGroup { group, variant } => match variant {
                Some(variant) => write!(f, "{group}={variant}"),
                None => write!(f, "{group}=null"),
            },
        }
    }
}

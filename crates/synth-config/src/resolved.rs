//! The resolved, read-only configuration handed to pipeline stages

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::value_kind;
use crate::schema::PipelineSettings;
use crate::{Error, KeyPath, Result};

/// The final configuration after composition, overrides and interpolation.
///
/// Cheap to clone; every clone shares the same tree. Nothing in the API
/// mutates it, so stages can read it repeatedly and concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    tree: Arc<Value>,
    tasks: Arc<[String]>,
}

impl ResolvedConfig {
    pub(crate) fn new(tree: Value, tasks: Vec<String>) -> Self {
        Self {
            tree: Arc::new(tree),
            tasks: tasks.into(),
        }
    }

    /// The whole tree.
    pub fn as_value(&self) -> &Value {
        &self.tree
    }

    /// Validated task names, in execution order.
    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    /// Top-level section names in document order, `tasks` excluded.
    pub fn sections(&self) -> Vec<String> {
        crate::validate::sections(&self.tree)
    }

    /// Whether `path` exists (a null value counts as present).
    pub fn contains(&self, path: &str) -> bool {
        KeyPath::parse(path)
            .map(|p| p.lookup(&self.tree).is_some())
            .unwrap_or(false)
    }

    /// The raw value at a dotted key path.
    ///
    /// # Errors
    ///
    /// `InvalidKeyPath` for a malformed path, `KeyNotFound` when absent.
    pub fn value(&self, path: &str) -> Result<&Value> {
        KeyPath::parse(path)?
            .lookup(&self.tree)
            .ok_or_else(|| Error::KeyNotFound {
                path: path.to_string(),
            })
    }

    /// The value at `path` converted to `T`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let workers: u32 = config.get("synthesize.parallel_workers")?;
    /// let password: Option<String> = config.get("mongodb.password")?;
    /// ```
    ///
    /// An optional `T` reads an absent leaf as `None`, but only when its
    /// parent mapping exists; a path through a missing section is still
    /// `KeyNotFound`.
    pub fn get<T: FromValue>(&self, path: &str) -> Result<T> {
        let key = KeyPath::parse(path)?;
        if let Some(value) = key.lookup(&self.tree) {
            return T::from_value(path, value);
        }
        let parent_is_mapping = key
            .parent()
            .and_then(|parent| parent.lookup(&self.tree))
            .is_some_and(Value::is_object);
        if parent_is_mapping {
            T::from_missing(path)
        } else {
            Err(Error::KeyNotFound {
                path: path.to_string(),
            })
        }
    }

    /// The value at `path`, checked against a runtime-selected type.
    pub fn get_as(&self, path: &str, expected: ScalarType) -> Result<Value> {
        let value = self.value(path)?;
        let matches = match expected {
            ScalarType::Any => true,
            ScalarType::String => value.is_string(),
            ScalarType::Int => value.is_i64() || value.is_u64(),
            ScalarType::Float => value.is_number(),
            ScalarType::Bool => value.is_boolean(),
        };
        if !matches {
            return Err(Error::type_mismatch(path, expected.to_string(), value));
        }
        Ok(match expected {
            ScalarType::Float => value
                .as_f64()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| value.clone()),
            _ => value.clone(),
        })
    }

    /// Deserialize the subtree at `path` into a typed section.
    pub fn section<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.value(path)?.clone();
        serde_json::from_value(value).map_err(|e| Error::InvalidValue {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// The whole tree as the typed pipeline schema, with range checks.
    pub fn pipeline(&self) -> Result<PipelineSettings> {
        let settings: PipelineSettings =
            serde_json::from_value(self.tree.as_ref().clone()).map_err(|e| {
                Error::InvalidValue {
                    path: "<root>".to_string(),
                    reason: e.to_string(),
                }
            })?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Runtime type selector for [`ResolvedConfig::get_as`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    String,
    Int,
    Float,
    Bool,
    Any,
}

impl FromStr for ScalarType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "str" | "string" => Ok(ScalarType::String),
            "int" | "integer" => Ok(ScalarType::Int),
            "float" => Ok(ScalarType::Float),
            "bool" | "boolean" => Ok(ScalarType::Bool),
            "any" => Ok(ScalarType::Any),
            other => Err(Error::InvalidValue {
                path: "<type>".to_string(),
                reason: format!("unknown type '{other}', expected str, int, float, bool or any"),
            }),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::String => "string",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Bool => "bool",
            ScalarType::Any => "any",
        };
        f.write_str(name)
    }
}

/// Conversion from a tree value to a Rust type.
pub trait FromValue: Sized {
    /// Convert the value found at `path`.
    fn from_value(path: &str, value: &Value) -> Result<Self>;

    /// Called when `path` is absent. Errors unless the type is optional.
    fn from_missing(path: &str) -> Result<Self> {
        Err(Error::KeyNotFound {
            path: path.to_string(),
        })
    }
}

impl FromValue for Value {
    fn from_value(_path: &str, value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(path: &str, value: &Value) -> Result<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::type_mismatch(path, "string", value))
    }
}

impl FromValue for bool {
    fn from_value(path: &str, value: &Value) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| Error::type_mismatch(path, "bool", value))
    }
}

impl FromValue for f64 {
    fn from_value(path: &str, value: &Value) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| Error::type_mismatch(path, "float", value))
    }
}

impl FromValue for i64 {
    fn from_value(path: &str, value: &Value) -> Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| Error::type_mismatch(path, "int", value))
    }
}

macro_rules! unsigned_from_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(path: &str, value: &Value) -> Result<Self> {
                    value
                        .as_u64()
                        .and_then(|n| <$ty>::try_from(n).ok())
                        .ok_or_else(|| Error::type_mismatch(path, stringify!($ty), value))
                }
            }
        )*
    };
}

unsigned_from_value!(u64, u32, u16, usize);

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(path: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(path, other).map(Some),
        }
    }

    fn from_missing(_path: &str) -> Result<Self> {
        Ok(None)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(path: &str, value: &Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(Error::TypeMismatch {
                path: path.to_string(),
                expected: "sequence".to_string(),
                found: value_kind(value).to_string(),
            });
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| T::from_value(&format!("{path}.{index}"), item))
            .collect()
    }
}

//! Error types for synth-config

/// Result type for synth-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or reading a configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A document is not well-formed
    #[error("Failed to parse document '{document}': {message}")]
    Parse { document: String, message: String },

    /// A composition directive names a group/variant with no document
    #[error("No document for group '{group}' variant '{variant}'{}", available_hint(.available))]
    MissingGroup {
        group: String,
        variant: String,
        available: Vec<String>,
    },

    /// An interpolation names a key that does not exist
    #[error("Interpolation '${{{reference}}}' in '{key}' refers to a missing key")]
    MissingReference { key: String, reference: String },

    /// Interpolations refer to each other in a loop
    #[error("Cyclic interpolation: {}", .chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    /// A task has no matching top-level section
    #[error("Task '{task}' has no matching top-level section{}", available_hint(.available))]
    UnknownTask {
        task: String,
        available: Vec<String>,
    },

    /// Key path absent from the resolved tree
    #[error("Key not found: {path}")]
    KeyNotFound { path: String },

    /// Value present but not of the requested type
    #[error("Type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// Malformed dotted key path
    #[error("Invalid key path '{path}': {reason}")]
    InvalidKeyPath { path: String, reason: String },

    /// Malformed override expression
    #[error("Invalid override '{text}': {reason}")]
    InvalidOverride { text: String, reason: String },

    /// Malformed `defaults` list
    #[error("Invalid defaults list in '{document}': {reason}")]
    InvalidDefaults { document: String, reason: String },

    /// Interpolation that cannot be substituted into a string
    #[error("Invalid interpolation in '{key}': {reason}")]
    InvalidInterpolation { key: String, reason: String },

    /// Value of the right type but outside its allowed domain
    #[error("Invalid value at '{path}': {reason}")]
    InvalidValue { path: String, reason: String },

    /// Document source error from synth-fs
    #[error(transparent)]
    Fs(#[from] synth_fs::Error),
}

fn available_hint(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (available: {})", available.join(", "))
    }
}

impl Error {
    pub(crate) fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: &serde_json::Value,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            found: value_kind(found).to_string(),
        }
    }
}

/// Short name of a value's type, used in error messages.
pub fn value_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

//! Error types for synth-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from synth-config
    #[error(transparent)]
    Config(#[from] synth_config::Error),

    /// Error from synth-fs
    #[error(transparent)]
    Fs(#[from] synth_fs::Error),

    /// YAML output error
    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON output error
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

//! Document format detection and decoding

use crate::{Error, Result};
use serde::de::DeserializeOwned;

/// Serialization format of a configuration document.
///
/// Format is detected from file extension:
/// - `.yaml`, `.yml` -> YAML
/// - `.json` -> JSON
/// - `.toml` -> TOML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Extensions probed when looking a document up by id, in priority order.
    pub const EXTENSIONS: [&'static str; 4] = ["yaml", "yml", "json", "toml"];

    /// Detect the format from a file extension.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Human readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }

    /// Decode `content` into `T`.
    ///
    /// `document` only labels the error when decoding fails.
    pub fn parse<T: DeserializeOwned>(&self, content: &str, document: &str) -> Result<T> {
        let parsed = match self {
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::ConfigParse {
            document: document.to_string(),
            format: self.name().into(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_from_extension() {
        assert_eq!(DocumentFormat::from_extension("yml").unwrap(), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_extension("YAML").unwrap(), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_extension("json").unwrap(), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_extension("toml").unwrap(), DocumentFormat::Toml);
        assert!(matches!(
            DocumentFormat::from_extension("ini"),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_yaml_scalars() {
        let value: Value = DocumentFormat::Yaml
            .parse("a: True\nb: false\nc: 4\nd: 0.5\ne:\nf: text\n", "test")
            .unwrap();
        assert_eq!(
            value,
            json!({"a": true, "b": false, "c": 4, "d": 0.5, "e": null, "f": "text"})
        );
    }

    #[test]
    fn test_toml_document() {
        let value: Value = DocumentFormat::Toml
            .parse("workdir = \"/data\"\n", "paths/default")
            .unwrap();
        assert_eq!(value, json!({"workdir": "/data"}));
    }

    #[test]
    fn test_parse_error_names_document() {
        let err = DocumentFormat::Yaml
            .parse::<Value>("a: [unclosed", "config")
            .unwrap_err();
        match err {
            Error::ConfigParse { document, format, .. } => {
                assert_eq!(document, "config");
                assert_eq!(format, "YAML");
            }
            other => panic!("Expected ConfigParse, got {:?}", other),
        }
    }
}

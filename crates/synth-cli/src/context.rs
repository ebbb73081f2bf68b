//! Location of the configuration the commands operate on

use std::path::{Path, PathBuf};

use synth_config::{ConfigLoader, ResolvedConfig};
use synth_fs::DirectorySource;

use crate::error::{CliError, Result};

/// The configuration directory and root document chosen on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigContext {
    config_dir: PathBuf,
    config_name: String,
}

impl ConfigContext {
    pub fn new(config_dir: PathBuf, config_name: String) -> Self {
        Self {
            config_dir,
            config_name,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    /// A loader over the configuration directory.
    ///
    /// # Errors
    ///
    /// A user error when the directory does not exist.
    pub fn loader(&self) -> Result<ConfigLoader<DirectorySource>> {
        if !self.config_dir.is_dir() {
            return Err(CliError::user(format!(
                "Configuration directory not found: {}",
                self.config_dir.display()
            )));
        }
        Ok(ConfigLoader::new(DirectorySource::new(self.config_dir.as_path()))?)
    }

    /// Load the root document with `overrides` applied.
    pub fn load(&self, overrides: &[String]) -> Result<ResolvedConfig> {
        Ok(self.loader()?.load(&self.config_name, overrides)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synth_test_utils::TestConfigDir;

    #[test]
    fn test_missing_directory_is_user_error() {
        let conf = TestConfigDir::new();
        let context = ConfigContext::new(conf.root().join("missing"), "config".into());
        assert!(matches!(context.loader(), Err(CliError::User { .. })));
    }

    #[test]
    fn test_load_pipeline() {
        let conf = TestConfigDir::pipeline();
        let context = ConfigContext::new(conf.root().to_path_buf(), "config".into());
        let config = context.load(&["general.project_name=cli".to_string()]).unwrap();
        assert_eq!(config.get::<String>("general.project_name").unwrap(), "cli");
    }
}

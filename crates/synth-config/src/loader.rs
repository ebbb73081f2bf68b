//! Entry point: load a resolved configuration from a document source

use std::path::Path;

use serde_json::Value;
use synth_fs::{DirectorySource, DocumentSource};

use crate::{GroupRegistry, Override, ResolvedConfig, Result, compose, interpolate, validate};

/// Loads configurations from a [`DocumentSource`].
///
/// # Example
///
/// ```ignore
/// use synth_config::ConfigLoader;
/// use synth_fs::DirectorySource;
///
/// let loader = ConfigLoader::new(DirectorySource::new("conf"))?;
/// let config = loader.load("config", &["synthesize.resize_factor=0.25"])?;
/// let workers: u32 = config.get("synthesize.parallel_workers")?;
/// ```
#[derive(Debug)]
pub struct ConfigLoader<S> {
    source: S,
    registry: GroupRegistry,
}

impl<S: DocumentSource> ConfigLoader<S> {
    /// Create a loader, discovering groups from the source.
    pub fn new(source: S) -> Result<Self> {
        let registry = GroupRegistry::discover(&source)?;
        Ok(Self { source, registry })
    }

    /// Create a loader with a pre-built registry.
    pub fn with_registry(source: S, registry: GroupRegistry) -> Self {
        Self { source, registry }
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Compose `entry` with overrides applied, leaving references unresolved.
    pub fn compose(&self, entry: &str, overrides: &[Override]) -> Result<Value> {
        compose::compose(&self.source, &self.registry, entry, overrides)
    }

    /// Compose, resolve and validate the configuration rooted at `entry`.
    ///
    /// # Errors
    ///
    /// Fails on the first problem: unparsable documents or overrides,
    /// unknown group variants, dangling or cyclic references and tasks
    /// naming sections that do not exist.
    pub fn load<T: AsRef<str>>(&self, entry: &str, overrides: &[T]) -> Result<ResolvedConfig> {
        let overrides = Override::parse_all(overrides)?;
        tracing::info!(
            source = %self.source.describe(),
            entry,
            overrides = overrides.len(),
            "Loading configuration"
        );

        let composed = self.compose(entry, &overrides)?;
        let resolved = interpolate::resolve(&composed)?;
        let tasks = validate::validate_tasks(&resolved)?;
        validate::warn_on_hints(&resolved);

        tracing::debug!(tasks = ?tasks, "Configuration resolved");
        Ok(ResolvedConfig::new(resolved, tasks))
    }
}

/// Load `entry` from the configuration directory `config_dir`.
///
/// Shorthand for `ConfigLoader::new(DirectorySource::new(config_dir))?.load(..)`.
pub fn load<T: AsRef<str>>(
    config_dir: impl AsRef<Path>,
    entry: &str,
    overrides: &[T],
) -> Result<ResolvedConfig> {
    ConfigLoader::new(DirectorySource::new(config_dir.as_ref()))?.load(entry, overrides)
}

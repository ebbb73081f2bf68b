//! Normalized path handling for configuration directories

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Document ids such as `paths/default` are joined onto a configuration
/// root, so the internal form is kept slash-separated on every platform and
/// only converted to a native path at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Backslashes become forward slashes and repeated separators collapse
    /// into one. A trailing separator is dropped unless the path is `/`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        Self { inner: clean(&raw) }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        if segment.is_empty() || segment == "." {
            return self.clone();
        }
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        Self {
            inner: clean(&format!("{}/{}", self.inner, segment)),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) if idx > 0 => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the file name without its extension.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[..idx]),
            _ => Some(name),
        }
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

fn clean(raw: &str) -> String {
    let absolute = raw.starts_with('/');
    let joined = raw
        .split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslashes_are_normalized() {
        let path = NormalizedPath::new("conf\\paths\\default.yaml");
        assert_eq!(path.as_str(), "conf/paths/default.yaml");
    }

    #[test]
    fn test_repeated_separators_collapse() {
        assert_eq!(NormalizedPath::new("/data//projects/").as_str(), "/data/projects");
    }

    #[test]
    fn test_join_and_parent() {
        let root = NormalizedPath::new("/etc/synth");
        let joined = root.join("paths/default.yaml");
        assert_eq!(joined.as_str(), "/etc/synth/paths/default.yaml");
        assert_eq!(joined.parent().unwrap().as_str(), "/etc/synth/paths");
        assert_eq!(NormalizedPath::new("/etc").parent().unwrap().as_str(), "/");
    }

    #[test]
    fn test_file_components() {
        let path = NormalizedPath::new("conf/cutout_filters/default.yaml");
        assert_eq!(path.file_name(), Some("default.yaml"));
        assert_eq!(path.file_stem(), Some("default"));
        assert_eq!(path.extension(), Some("yaml"));
        assert_eq!(NormalizedPath::new("conf/.hidden").extension(), None);
    }
}

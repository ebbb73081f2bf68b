//! Bounded document reads

use std::fs;

use crate::{Error, NormalizedPath, Result};

/// Largest document the loader will read, in bytes.
pub const MAX_DOCUMENT_SIZE: u64 = 1024 * 1024;

/// Read text content from a file, refusing anything over [`MAX_DOCUMENT_SIZE`].
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    let metadata = fs::metadata(&native_path).map_err(|e| Error::io(&native_path, e))?;
    if metadata.len() > MAX_DOCUMENT_SIZE {
        return Err(Error::DocumentTooLarge {
            path: native_path,
            size: metadata.len(),
            max: MAX_DOCUMENT_SIZE,
        });
    }
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_text() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        fs::write(&file, "tasks: []\n").unwrap();

        let content = read_text(&NormalizedPath::new(&file)).unwrap();
        assert_eq!(content, "tasks: []\n");
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = read_text(&NormalizedPath::new(dir.path().join("missing.yaml")));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_read_oversized_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("huge.yaml");
        fs::write(&file, vec![b'#'; (MAX_DOCUMENT_SIZE + 1) as usize]).unwrap();

        let result = read_text(&NormalizedPath::new(&file));
        assert!(matches!(result, Err(Error::DocumentTooLarge { .. })));
    }
}

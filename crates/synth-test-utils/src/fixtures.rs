//! Locations of the reference configuration under `test-fixtures/`.

use std::path::PathBuf;

/// The workspace `test-fixtures/` directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("test-fixtures")
}

/// The reference pipeline configuration directory.
pub fn reference_conf_dir() -> PathBuf {
    fixtures_dir().join("conf")
}

//! [`TestConfigDir`] builder for configuration loading scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary configuration directory with helpers to write documents
/// and assert on them.
///
/// # Example
///
/// ```rust,no_run
/// use synth_test_utils::TestConfigDir;
///
/// let conf = TestConfigDir::new();
/// conf.write_root("config", "defaults:\n  - paths: default\n  - _self_\n");
/// conf.write_group("paths", "default", "workdir: /data\n");
/// conf.assert_file_exists("paths/default.yaml");
/// ```
pub struct TestConfigDir {
    temp_dir: TempDir,
}

impl Default for TestConfigDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigDir {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a directory pre-populated with the standard pipeline layout.
    pub fn pipeline() -> Self {
        let conf = Self::new();
        conf.write_root("config", PIPELINE_ROOT);
        conf.write_group("paths", "default", PIPELINE_PATHS);
        conf.write_group("cutout_filters", "default", PIPELINE_FILTERS);
        conf
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `<root>/<name>.yaml` and return its path.
    pub fn write_root(&self, name: &str, text: &str) -> PathBuf {
        self.write_file(&format!("{name}.yaml"), text)
    }

    /// Write `<root>/<group>/<variant>.yaml` and return its path.
    pub fn write_group(&self, group: &str, variant: &str, text: &str) -> PathBuf {
        self.write_file(&format!("{group}/{variant}.yaml"), text)
    }

    /// Write an arbitrary file relative to the root, creating parents.
    pub fn write_file(&self, relative: &str, text: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, text).unwrap();
        path
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}

const PIPELINE_ROOT: &str = "\
defaults:
  - cutout_filters: default
  - paths: default
  - _self_

general:
  project_name: test
  sub_project_name: sub_test

tasks:
  - synthesize

move_cutouts:
  parallel: True
  parallel_workers: 4

synthesize:
  resize_factor: 0.5
  parallel: True
  parallel_workers: 4
  instance_masks: True
  yolo_contour_labels: False
  yolo_bbox_labels: True

aws:
  s3_bucket: example-bucket

mongodb:
  host:
  port:
  db: cutouts
  collection: cutouts
  auth_source: admin
  auth_mechanism: SCRAM-SHA-1
  username:
  password:
";

const PIPELINE_PATHS: &str = "\
workdir: /data
projects_dir: ${paths.workdir}/projects
run_dir: ${paths.projects_dir}/${general.project_name}/${general.sub_project_name}
";

const PIPELINE_FILTERS: &str = "\
min_area: 500
blur_threshold: 100.0
";

//! Typed view of the pipeline configuration
//!
//! The loader itself is schema-agnostic. These types are what pipeline
//! stages deserialize the resolved tree into.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// All known sections of the pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    pub general: General,
    #[serde(default)]
    pub tasks: Vec<String>,
    pub paths: Paths,
    pub move_cutouts: Option<MoveCutouts>,
    pub synthesize: Option<Synthesize>,
    pub aws: Option<Aws>,
    pub mongodb: Option<MongoDb>,
    #[serde(default)]
    pub cutout_filters: Value,
    #[serde(default)]
    pub batches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct General {
    pub project_name: String,
    pub sub_project_name: String,
}

/// Filesystem locations. Only `workdir` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paths {
    pub workdir: String,
    pub data_dir: Option<String>,
    pub projects_dir: Option<String>,
    pub run_dir: Option<String>,
    pub primary_longterm_storage: Option<String>,
    pub secondary_longterm_storage: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveCutouts {
    pub parallel: bool,
    pub parallel_workers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesize {
    pub resize_factor: f64,
    pub parallel: bool,
    pub parallel_workers: u32,
    #[serde(default)]
    pub instance_masks: bool,
    #[serde(default)]
    pub yolo_contour_labels: bool,
    #[serde(default)]
    pub yolo_bbox_labels: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aws {
    pub s3_bucket: String,
}

/// Database connection settings. Credentials are usually blank in files
/// and supplied through overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MongoDb {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub db: String,
    pub collection: String,
    pub auth_source: Option<String>,
    pub auth_mechanism: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl PipelineSettings {
    /// Range checks that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if let Some(synthesize) = &self.synthesize {
            let factor = synthesize.resize_factor;
            if factor.is_nan() || factor <= 0.0 {
                return Err(Error::InvalidValue {
                    path: "synthesize.resize_factor".to_string(),
                    reason: format!("must be positive, got {factor}"),
                });
            }
            check_workers("synthesize", synthesize.parallel, synthesize.parallel_workers)?;
        }
        if let Some(moves) = &self.move_cutouts {
            check_workers("move_cutouts", moves.parallel, moves.parallel_workers)?;
        }
        Ok(())
    }

    /// The task list parsed into known stages.
    pub fn task_plan(&self) -> Vec<Task> {
        self.tasks.iter().map(|name| Task::from(name.as_str())).collect()
    }
}

fn check_workers(section: &str, parallel: bool, workers: u32) -> Result<()> {
    if parallel && workers == 0 {
        return Err(Error::InvalidValue {
            path: format!("{section}.parallel_workers"),
            reason: "parallel execution needs at least one worker".to_string(),
        });
    }
    Ok(())
}

/// A pipeline stage named in the task list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Task {
    CreateRecipes,
    MoveCutouts,
    Synthesize,
    JsonToMongo,
    /// A section without a dedicated stage type.
    Other(String),
}

impl Task {
    pub fn as_str(&self) -> &str {
        match self {
            Task::CreateRecipes => "create_recipes",
            Task::MoveCutouts => "move_cutouts",
            Task::Synthesize => "synthesize",
            Task::JsonToMongo => "json_to_mongo",
            Task::Other(name) => name,
        }
    }
}

impl From<&str> for Task {
    fn from(name: &str) -> Self {
        match name {
            "create_recipes" => Task::CreateRecipes,
            "move_cutouts" => Task::MoveCutouts,
            "synthesize" => Task::Synthesize,
            "json_to_mongo" => Task::JsonToMongo,
            other => Task::Other(other.to_string()),
        }
    }
}

impl FromStr for Task {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Task::from(s))
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> Value {
        json!({
            "general": {"project_name": "test", "sub_project_name": "sub_test"},
            "tasks": ["create_recipes", "synthesize"],
            "paths": {"workdir": "/data", "cache": "/tmp/cache"},
            "synthesize": {
                "resize_factor": 0.5,
                "parallel": true,
                "parallel_workers": 4,
                "instance_masks": true,
                "yolo_contour_labels": false,
                "yolo_bbox_labels": true
            },
            "mongodb": {
                "host": null, "port": null, "db": "cutouts", "collection": "cutouts",
                "auth_source": "admin", "auth_mechanism": "SCRAM-SHA-1",
                "username": null, "password": null
            },
            "create_recipes": {}
        })
    }

    #[test]
    fn test_deserialize_pipeline() {
        let settings: PipelineSettings = serde_json::from_value(tree()).unwrap();
        assert_eq!(settings.general.sub_project_name, "sub_test");
        assert_eq!(settings.paths.workdir, "/data");
        assert_eq!(settings.paths.extra.get("cache"), Some(&json!("/tmp/cache")));
        assert!(settings.move_cutouts.is_none());
        assert_eq!(settings.mongodb.unwrap().auth_mechanism.as_deref(), Some("SCRAM-SHA-1"));
        assert!(settings.batches.is_empty());
    }

    #[test]
    fn test_task_plan() {
        let settings: PipelineSettings = serde_json::from_value(tree()).unwrap();
        assert_eq!(
            settings.task_plan(),
            vec![Task::CreateRecipes, Task::Synthesize]
        );
        assert_eq!(Task::from("export"), Task::Other("export".to_string()));
        assert_eq!(Task::JsonToMongo.to_string(), "json_to_mongo");
    }

    #[test]
    fn test_validate_rejects_non_positive_resize() {
        let mut tree = tree();
        tree["synthesize"]["resize_factor"] = json!(0.0);
        let settings: PipelineSettings = serde_json::from_value(tree).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidValue { path, .. }) if path == "synthesize.resize_factor"
        ));
    }

    #[test]
    fn test_validate_accepts_small_resize() {
        let mut tree = tree();
        tree["synthesize"]["resize_factor"] = json!(0.1);
        let settings: PipelineSettings = serde_json::from_value(tree).unwrap();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_parallel_without_workers() {
        let mut tree = tree();
        tree["move_cutouts"] = json!({"parallel": true, "parallel_workers": 0});
        let settings: PipelineSettings = serde_json::from_value(tree).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidValue { path, .. }) if path == "move_cutouts.parallel_workers"
        ));
    }
}

//! Tests against the checked-in reference configuration

use pretty_assertions::assert_eq;
use rstest::rstest;
use synth_config::{ConfigLoader, Task, load};
use synth_fs::DirectorySource;
use synth_test_utils::fixtures::reference_conf_dir;

const NO_OVERRIDES: &[&str] = &[];

#[test]
fn test_reference_config_loads() {
    let config = load(reference_conf_dir(), "config", NO_OVERRIDES).expect("Should load");

    assert_eq!(config.tasks(), ["create_recipes", "synthesize"]);
    assert_eq!(
        config.get::<String>("paths.run_dir").unwrap(),
        "/data/projects/test/sub_test"
    );
    assert_eq!(
        config.get::<Vec<String>>("batches").unwrap(),
        vec!["batch_2024_05_01", "batch_2024_05_08"]
    );
}

#[test]
fn test_reference_registry() {
    let loader = ConfigLoader::new(DirectorySource::new(reference_conf_dir())).unwrap();
    let registry = loader.registry();

    assert_eq!(registry.groups(), vec!["cutout_filters", "paths"]);
    assert_eq!(registry.variants("paths"), vec!["cluster", "default"]);
}

#[test]
fn test_reference_section_order() {
    let config = load(reference_conf_dir(), "config", NO_OVERRIDES).unwrap();

    assert_eq!(
        config.sections(),
        vec![
            "cutout_filters",
            "paths",
            "general",
            "create_recipes",
            "move_cutouts",
            "synthesize",
            "json_to_mongo",
            "aws",
            "mongodb",
            "batches",
        ]
    );
}

#[test]
fn test_reference_pipeline_schema() {
    let settings = load(reference_conf_dir(), "config", NO_OVERRIDES)
        .unwrap()
        .pipeline()
        .unwrap();

    assert_eq!(settings.task_plan(), vec![Task::CreateRecipes, Task::Synthesize]);
    assert_eq!(
        settings.paths.primary_longterm_storage.as_deref(),
        Some("/data/longterm/primary")
    );
    let synthesize = settings.synthesize.expect("synthesize section");
    assert_eq!(synthesize.resize_factor, 0.5);
    assert!(synthesize.instance_masks);
    assert!(!synthesize.yolo_contour_labels);
}

#[rstest]
#[case::default_paths(&[], "/data/projects/test/sub_test")]
#[case::cluster_paths(&["paths=cluster"], "/scratch/synth/projects/test/sub_test")]
#[case::renamed_project(&["general.sub_project_name=run_2"], "/data/projects/test/run_2")]
#[case::moved_workdir(&["paths.workdir=/mnt"], "/mnt/projects/test/sub_test")]
fn test_run_dir_follows_overrides(#[case] overrides: &[&str], #[case] expected: &str) {
    let config = load(reference_conf_dir(), "config", overrides).unwrap();
    assert_eq!(config.get::<String>("paths.run_dir").unwrap(), expected);
}

#[test]
fn test_enable_commented_task_by_override() {
    let config = load(
        reference_conf_dir(),
        "config",
        &["tasks=[create_recipes, move_cutouts, synthesize, json_to_mongo]"],
    )
    .unwrap();

    assert_eq!(
        config.tasks(),
        ["create_recipes", "move_cutouts", "synthesize", "json_to_mongo"]
    );
}

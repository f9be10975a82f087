#![allow(clippy::unwrap_used, clippy::expect_used)]

use apirouter::{Manifest, MetadataError, RouterConfig};

mod common;
use common::temp_files;

const SECURED_MANIFEST: &str = r#"
handlers:
  - class: AdminPresenter
    annotations:
      route: { path: /admin }
      secured: { role: admin }
    methods: [actionDefault]
"#;

#[test]
fn test_config_file_formats() {
    let yaml = temp_files::create_temp_yaml("ignoreAnnotation:\n  - secured\n");
    let toml = temp_files::create_temp_file("ignore_metadata = [\"secured\"]\n", "toml");
    let json = temp_files::create_temp_json(r#"{"ignore_metadata": "secured"}"#);

    for file in [&yaml, &toml, &json] {
        let config = RouterConfig::load(file.path()).unwrap();
        assert!(config.is_ignored("secured"), "{}", file.path().display());
        assert!(config.is_ignored("persistent"));
        assert!(config.is_ignored("inject"));
    }
}

#[test]
fn test_config_load_errors_name_the_file() {
    let file = temp_files::create_temp_yaml("ignore_metadata: { not: a list }\n");
    let err = RouterConfig::load(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains(&file.path().display().to_string()));

    let missing = std::env::temp_dir().join("apirouter_missing_config.yaml");
    assert!(RouterConfig::load(&missing).is_err());
}

#[test]
fn test_ignore_list_controls_manifest_loading() {
    let file = temp_files::create_temp_yaml(SECURED_MANIFEST);

    let err = Manifest::load(file.path(), &RouterConfig::default()).unwrap_err();
    let root = err.root_cause().downcast_ref::<MetadataError>().unwrap();
    assert!(matches!(root, MetadataError::UnknownAnnotation { name, .. } if name == "secured"));

    let config = RouterConfig::with_ignored(["secured"]);
    let manifest = Manifest::load(file.path(), &config).unwrap();
    assert_eq!(manifest.handler_classes().len(), 1);
}

#[test]
fn test_unsupported_manifest_extension() {
    let file = temp_files::create_temp_file("handlers: []", "ini");
    assert!(Manifest::load(file.path(), &RouterConfig::default()).is_err());
}

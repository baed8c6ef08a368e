//! Configuration loading and precedence tests

use pretty_assertions::assert_eq;
use pushdown_config::{ConfigError, ConfigLoader, ProjectConfig, PROJECT_CONFIG_FILE};
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> std::path::PathBuf {
    let config_path = dir.join(PROJECT_CONFIG_FILE);
    fs::write(&config_path, content).unwrap();
    config_path
}

fn loader_without_global(dir: &Path) -> ConfigLoader {
    ConfigLoader::with_global_config_path(dir.join("missing-global.toml"))
}

// ============================================================================
// Config Loading Tests
// ============================================================================

#[test]
#[serial]
fn test_load_when_no_config_exists() {
    let temp_dir = TempDir::new().unwrap();

    let mut loader = loader_without_global(temp_dir.path());
    let config = loader.load_from_directory(temp_dir.path()).unwrap();

    assert!(!config.is_project());
    assert_eq!(config.grammar(), "errors");
    assert_eq!(config.format(), "text");
    assert_eq!(config.max_depth(), None);
}

#[test]
#[serial]
fn test_load_from_nested_subdirectory_finds_root() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[engine]
max_depth = 16
trace_frames = true
"#,
    );

    let deep = temp_dir.path().join("a").join("b").join("c");
    fs::create_dir_all(&deep).unwrap();

    let mut loader = loader_without_global(temp_dir.path());
    let config = loader.load_from_directory(&deep).unwrap();

    assert_eq!(config.project_root(), Some(temp_dir.path()));
    assert_eq!(config.max_depth(), Some(16));
    assert!(config.trace_frames());
}

#[test]
#[serial]
fn test_load_from_specific_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(
        temp_dir.path(),
        r#"
[cli]
grammar = "nested"
format = "json"
"#,
    );

    let mut loader = loader_without_global(temp_dir.path());
    let config = loader.load_from_file(&path).unwrap();

    assert_eq!(config.grammar(), "nested");
    assert_eq!(config.format(), "json");
}

#[test]
fn test_missing_specific_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let mut loader = loader_without_global(temp_dir.path());

    let result = loader.load_from_file(&temp_dir.path().join(PROJECT_CONFIG_FILE));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
#[serial]
fn test_invalid_toml_reports_file() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[engine\nmax_depth = ");

    let mut loader = loader_without_global(temp_dir.path());
    let err = loader.load_from_directory(temp_dir.path()).unwrap_err();

    match err {
        ConfigError::TomlParseError { file, .. } => {
            assert!(file.ends_with(PROJECT_CONFIG_FILE));
        }
        other => panic!("expected TOML error, got {:?}", other),
    }
}

// ============================================================================
// Precedence Tests
// ============================================================================

#[test]
#[serial]
fn test_project_overrides_global() {
    let temp_dir = TempDir::new().unwrap();
    let global = temp_dir.path().join("global.toml");
    fs::write(
        &global,
        r#"
[defaults]
grammar = "nested"
format = "json"

[log]
level = "info"
"#,
    )
    .unwrap();

    let project = temp_dir.path().join("project");
    fs::create_dir(&project).unwrap();
    create_config_file(
        &project,
        r#"
[cli]
grammar = "prefix"
"#,
    );

    let mut loader = ConfigLoader::with_global_config_path(&global);
    let config = loader.load_from_directory(&project).unwrap();

    assert_eq!(config.grammar(), "prefix");
    assert_eq!(config.format(), "json");
    assert_eq!(config.log_level(), "info");
}

#[test]
#[serial]
fn test_invalid_global_value_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let global = temp_dir.path().join("global.toml");
    fs::write(&global, "[defaults]\nformat = \"yaml\"\n").unwrap();

    let mut loader = ConfigLoader::with_global_config_path(&global);
    let result = loader.load_from_directory(temp_dir.path());

    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue { ref field, .. }) if field == "defaults.format"
    ));
}

#[test]
#[serial]
fn test_malformed_global_toml_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let global = temp_dir.path().join("global.toml");
    fs::write(&global, "[defaults\ngrammar = ").unwrap();
    let project_file = create_config_file(temp_dir.path(), "[cli]\ngrammar = \"prefix\"\n");

    let mut loader = ConfigLoader::with_global_config_path(&global);
    let result = loader.load_from_file(&project_file);

    assert!(matches!(result, Err(ConfigError::TomlParseError { ref file, .. }) if file == &global));
}

#[test]
#[serial]
fn test_env_overrides_project() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[cli]
grammar = "prefix"
format = "text"
"#,
    );

    env::set_var("PUSHDOWN_GRAMMAR", "nested");
    env::set_var("PUSHDOWN_FORMAT", "JSON");

    let mut loader = loader_without_global(temp_dir.path());
    let config = loader.load_from_directory(temp_dir.path());

    env::remove_var("PUSHDOWN_GRAMMAR");
    env::remove_var("PUSHDOWN_FORMAT");

    let config = config.unwrap();
    assert_eq!(config.grammar(), "nested");
    assert_eq!(config.format(), "json");
}

#[test]
#[serial]
fn test_env_rejects_unknown_grammar() {
    let temp_dir = TempDir::new().unwrap();

    env::set_var("PUSHDOWN_GRAMMAR", "cobol");

    let mut loader = loader_without_global(temp_dir.path());
    let result = loader.load_from_directory(temp_dir.path());

    env::remove_var("PUSHDOWN_GRAMMAR");
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

// ============================================================================
// Validation Tests
// ============================================================================

#[rstest]
#[case::zero_depth("[engine]\nmax_depth = 0\n")]
#[case::unknown_grammar("[cli]\ngrammar = \"sql\"\n")]
#[case::unknown_format("[cli]\nformat = \"xml\"\n")]
#[case::empty_log_level("[log]\nlevel = \"  \"\n")]
fn test_invalid_project_values(#[case] content: &str) {
    let config: ProjectConfig = toml::from_str(content).unwrap();
    assert!(config.validate().is_err());
}

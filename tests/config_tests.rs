//! Config file loading and defaults

use nlq::infrastructure::config::{load_config_from, write_config_sample, Config, LlmConfig, API_KEY_ENV};
use nlq::infrastructure::reference::StaticReference;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.theme, "default");
    assert_eq!(config.llm.base_url, "http://localhost:8000/v1");
    assert_eq!(config.llm.model, "Qwen/Qwen3-4B-Thinking-2507-FP8");
    assert_eq!(config.llm.max_tokens, 2048);
    assert_eq!(config.llm.timeout_secs, 120);
    assert!(config.llm.api_key.is_none());
    assert!(config.engine.dataset.is_none());
    assert!(config.logging.enable);
    assert_eq!(config.logging.level, "WARN");
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
reference = "codes.toml"

[llm]
base_url = "https://api.example.com/v1"
api_key = "from-file"

[engine]
dataset = "crime.json"
"#,
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.reference.as_deref(), Some("codes.toml"));
    assert_eq!(config.llm.base_url, "https://api.example.com/v1");
    assert_eq!(config.llm.api_key.as_deref(), Some("from-file"));
    assert_eq!(config.llm.model, "Qwen/Qwen3-4B-Thinking-2507-FP8");
    assert_eq!(config.engine.dataset.as_deref(), Some("crime.json"));
    assert_eq!(config.logging.level, "WARN");
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[llm\nbase_url = ").unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.llm.base_url, "http://localhost:8000/v1");
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(load_config_from(&dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_sample_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    write_config_sample(&path).unwrap();

    let config = load_config_from(&path).unwrap();
    let defaults = Config::default();
    assert_eq!(config.llm.model, defaults.llm.model);
    assert_eq!(config.llm.max_tokens, defaults.llm.max_tokens);
    assert_eq!(config.theme, defaults.theme);
}

#[test]
fn test_api_key_resolution() {
    let mut llm = LlmConfig {
        api_key: Some("from-file".to_string()),
        ..LlmConfig::default()
    };

    std::env::remove_var(API_KEY_ENV);
    assert_eq!(llm.resolved_api_key().as_deref(), Some("from-file"));

    llm.api_key = Some("   ".to_string());
    assert_eq!(llm.resolved_api_key(), None);

    std::env::set_var(API_KEY_ENV, "from-env");
    assert_eq!(llm.resolved_api_key().as_deref(), Some("from-env"));
    std::env::remove_var(API_KEY_ENV);
}

#[test]
fn test_reference_tables_load() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/reference.toml");
    let reference = StaticReference::load(std::path::Path::new(path)).unwrap();
    assert_eq!(
        reference.tables["schools"].get("002325").map(String::as_str),
        Some("University of Michigan")
    );

    let rendered = reference.render().unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["dispositions"]["Closed"], "Case closed");

    assert_eq!(StaticReference::default().render().unwrap(), None);
    let empty = StaticReference::default().with_table("schools", Vec::new());
    assert_eq!(empty.render().unwrap(), None);
}

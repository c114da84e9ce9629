//! Configuration file loading and validation.

use docoracle_rs::core::config::{EmbeddingBackend, MatcherConfig, DEFAULT_VECTORS_PATH};
use docoracle_rs::{DocOracleConfig, DocOracleError};
use std::fs;
use tempfile::tempdir;

#[test]
fn yaml_round_trip_preserves_settings() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("docoracle.yml");

    let mut config = DocOracleConfig::default();
    config.matcher.distance_threshold = 2.5;
    config.matcher.base_stopwords.push("returns".to_string());
    config.embedding.backend = EmbeddingBackend::VectorTable;
    config.embedding.vectors_path = Some(temp_dir.path().join("glove.txt"));
    config.audit.enabled = true;
    config.run.max_repair_attempts = 5;

    config.to_yaml_file(&path).unwrap();
    let loaded = DocOracleConfig::from_yaml_file(&path).unwrap();

    assert_eq!(loaded.matcher.distance_threshold, 2.5);
    assert!(loaded.matcher.base_stopwords.contains(&"returns".to_string()));
    assert_eq!(loaded.embedding.backend, EmbeddingBackend::VectorTable);
    assert_eq!(loaded.embedding.vectors_path, config.embedding.vectors_path);
    assert!(loaded.audit.enabled);
    assert_eq!(loaded.run.max_repair_attempts, 5);
}

#[test]
fn partial_file_falls_back_to_defaults() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("partial.yml");
    fs::write(&path, "run:\n  timeout_seconds: 30\n").unwrap();

    let loaded = DocOracleConfig::from_yaml_file(&path).unwrap();
    let defaults = MatcherConfig::default();
    assert_eq!(loaded.run.timeout_seconds, 30);
    assert_eq!(loaded.matcher.distance_threshold, defaults.distance_threshold);
    assert_eq!(loaded.matcher.base_stopwords, defaults.base_stopwords);
}

#[test]
fn vector_table_without_path_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("table.yml");
    fs::write(&path, "embedding:\n  backend: vector_table\n  vectors_path: null\n").unwrap();

    let err = DocOracleConfig::from_yaml_file(&path).unwrap_err();
    assert!(matches!(err, DocOracleError::Config { .. }));
}

#[test]
fn inverted_thresholds_are_rejected() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("thresholds.yml");
    fs::write(
        &path,
        "matcher:\n  distance_threshold: 7.0\n  long_comment_threshold: 6.0\n",
    )
    .unwrap();

    assert!(DocOracleConfig::from_yaml_file(&path).is_err());
}

#[test]
fn missing_file_is_an_io_error() {
    let temp_dir = tempdir().unwrap();
    let err = DocOracleConfig::from_yaml_file(temp_dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, DocOracleError::Io { .. }));
}

#[test]
fn default_vector_table_path_is_filled_in() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("table.yml");
    fs::write(&path, "embedding:\n  backend: vector_table\n").unwrap();

    let loaded = DocOracleConfig::from_yaml_file(&path).unwrap();
    assert_eq!(
        loaded.embedding.vectors_path.as_deref(),
        Some(std::path::Path::new(DEFAULT_VECTORS_PATH))
    );
}

#[test]
fn fast_embed_with_default_thresholds_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("fastembed.yml");
    fs::write(&path, "embedding:\n  backend: fast_embed\n").unwrap();
    assert!(DocOracleConfig::from_yaml_file(&path).is_err());

    fs::write(
        &path,
        "embedding:\n  backend: fast_embed\nmatcher:\n  distance_threshold: 0.6\n  long_comment_threshold: 1.0\n",
    )
    .unwrap();
    let loaded = DocOracleConfig::from_yaml_file(&path).unwrap();
    assert_eq!(loaded.embedding.backend, EmbeddingBackend::FastEmbed);
}

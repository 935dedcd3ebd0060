use std::fs;

use tempfile::TempDir;
use webclone::{
    ConfigLoadError, Document, ExtractConfig, PipelineError, WebcloneConfig, attach_visual_features,
    cluster_documents, load_documents_json, load_html_dir,
};

#[test]
fn missing_input_directory_is_reported() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    let err = load_html_dir(&missing, &ExtractConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::MissingInput(path) if path == missing));
}

#[test]
fn file_instead_of_directory_is_reported() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("page.html");
    fs::write(&file, "<html></html>").unwrap();
    let err = load_html_dir(&file, &ExtractConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::MissingInput(_)));
}

#[test]
fn invalid_extract_config_is_rejected_before_walking() {
    let dir = TempDir::new().unwrap();
    let mut cfg = ExtractConfig::default();
    cfg.version = 0;
    let err = load_html_dir(dir.path(), &cfg).unwrap_err();
    assert!(matches!(err, PipelineError::Canonical(_)));
}

#[test]
fn oversized_bands_fail_before_any_work() {
    let yaml = "perceptual:\n  num_hashes: 32\nindex:\n  bands: 8\n  rows_per_band: 8\n";
    let err = WebcloneConfig::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, ConfigLoadError::Validation(_)));

    let mut config = WebcloneConfig::default();
    config.perceptual = config.perceptual.with_num_hashes(32);
    let err = cluster_documents(vec![Document::new("a")], &config).unwrap_err();
    assert!(matches!(err, PipelineError::Config(ConfigLoadError::Validation(_))));
}

#[test]
fn weights_not_summing_to_one_fail_before_any_work() {
    let yaml = "matcher:\n  structure_weight: 5.0\n  class_weight: 5.0\n  text_weight: 5.0\n";
    let err = WebcloneConfig::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, ConfigLoadError::Validation(msg) if msg.contains("sum to 1.0")));

    let mut config = WebcloneConfig::default();
    config.matcher = config.matcher.with_weights(5.0, 5.0, 5.0);
    let err = cluster_documents(vec![Document::new("a")], &config).unwrap_err();
    assert!(matches!(err, PipelineError::Config(ConfigLoadError::Validation(_))));
}

#[test]
fn corpus_of_only_invalid_documents_is_empty_not_an_error() {
    let docs = vec![Document::new(""), Document::new("x").with_visual_features(Vec::new())];
    let run = cluster_documents(docs, &WebcloneConfig::default()).unwrap();
    assert!(run.clusters.is_empty());
    assert_eq!(run.stats.skipped, 2);
}

#[test]
fn documents_without_classes_or_text_still_cluster() {
    let docs = vec![Document::new("bare1"), Document::new("bare2")];
    let run = cluster_documents(docs, &WebcloneConfig::default()).unwrap();
    let total: usize = run.clusters.iter().map(|c| c.len()).sum();
    assert_eq!(total, 2);
}

#[test]
fn missing_document_file_is_an_io_error() {
    let err = load_documents_json("/definitely/not/docs.json").unwrap_err();
    assert!(matches!(err, PipelineError::Io { .. }));
}

#[test]
fn malformed_visual_map_is_a_json_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visual.json");
    fs::write(&path, "[1, 2, 3]").unwrap();
    let mut docs = vec![Document::new("a")];
    let err = attach_visual_features(&mut docs, &path).unwrap_err();
    assert!(matches!(err, PipelineError::Json { .. }));
    assert!(err.to_string().contains("visual.json"));
}

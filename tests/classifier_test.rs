use std::fs;
use std::path::{Path, PathBuf};

use tonality::{ClassifierBuilder, SentimentClassifier, SentimentError};

/// A minimal but valid tokenizer file, enough to get past tokenizer
/// deserialization and into model loading.
const TOKENIZER_JSON: &str = r#"{
  "version": "1.0",
  "truncation": null,
  "padding": null,
  "added_tokens": [],
  "normalizer": null,
  "pre_tokenizer": { "type": "Whitespace" },
  "post_processor": null,
  "decoder": null,
  "model": {
    "type": "WordLevel",
    "vocab": { "[UNK]": 0, "привет": 1, "пока": 2 },
    "unk_token": "[UNK]"
  }
}"#;

const LABELS_JSON: &str =
    r#"["позитив","негатив","нейтрально","сарказм_ирония","смешанные_эмоции"]"#;

fn fresh_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("/tmp/tonality-test/integration").join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn expect_artifact_not_found(result: Result<ClassifierBuilder, SentimentError>, path: &Path) {
    match result {
        Err(SentimentError::ArtifactNotFound(missing)) => assert_eq!(missing, path),
        Err(other) => panic!("expected ArtifactNotFound, got: {other}"),
        Ok(_) => panic!("construction unexpectedly succeeded"),
    }
}

#[test]
fn test_missing_model_dir_fails_with_the_model_path() {
    let dir = PathBuf::from("/tmp/tonality-test/integration/does-not-exist");
    let _ = fs::remove_dir_all(&dir);

    let result = SentimentClassifier::builder().with_artifact_dir(&dir);
    expect_artifact_not_found(result, &dir.join("model.onnx"));
}

#[test]
fn test_missing_tokenizer_is_named_once_the_model_exists() {
    let dir = fresh_dir("model-only");
    fs::write(dir.join("model.onnx"), b"not a real model").unwrap();

    let result = SentimentClassifier::builder().with_artifact_dir(&dir);
    expect_artifact_not_found(result, &dir.join("tokenizer.json"));
}

#[test]
fn test_missing_labels_is_named_once_model_and_tokenizer_exist() {
    let dir = fresh_dir("no-labels");
    fs::write(dir.join("model.onnx"), b"not a real model").unwrap();
    fs::write(dir.join("tokenizer.json"), TOKENIZER_JSON).unwrap();

    let result = SentimentClassifier::builder().with_artifact_dir(&dir);
    expect_artifact_not_found(result, &dir.join("labels.json"));
}

#[test]
fn test_corrupt_tokenizer_is_a_model_load_error() {
    let dir = fresh_dir("corrupt-tokenizer");
    fs::write(dir.join("model.onnx"), b"not a real model").unwrap();
    fs::write(dir.join("tokenizer.json"), "{ definitely not a tokenizer").unwrap();
    fs::write(dir.join("labels.json"), LABELS_JSON).unwrap();

    match SentimentClassifier::builder().with_artifact_dir(&dir) {
        Err(SentimentError::ModelLoad(msg)) => assert!(msg.contains("tokenizer")),
        Err(other) => panic!("expected ModelLoad, got: {other}"),
        Ok(_) => panic!("construction unexpectedly succeeded"),
    }
}

#[test]
fn test_corrupt_model_is_a_model_load_error() {
    let dir = fresh_dir("corrupt-model");
    fs::write(dir.join("model.onnx"), b"not a real model").unwrap();
    fs::write(dir.join("tokenizer.json"), TOKENIZER_JSON).unwrap();
    fs::write(dir.join("labels.json"), LABELS_JSON).unwrap();

    match SentimentClassifier::builder().with_artifact_dir(&dir) {
        Err(SentimentError::ModelLoad(msg)) => assert!(msg.contains("model.onnx")),
        Err(other) => panic!("expected ModelLoad, got: {other}"),
        Ok(_) => panic!("construction unexpectedly succeeded"),
    }
}

/// End-to-end prediction properties, run only when a real model directory is
/// provided via TONALITY_TEST_MODEL_DIR.
#[test]
fn test_prediction_properties_with_real_artifacts() {
    let Ok(model_dir) = std::env::var("TONALITY_TEST_MODEL_DIR") else {
        return;
    };

    let classifier = SentimentClassifier::builder()
        .with_artifact_dir(&model_dir)
        .unwrap()
        .build()
        .unwrap();

    let info = classifier.info();
    assert_eq!(info.num_classes, classifier.labels().len());
    assert!(info.model_path.ends_with("model.onnx"));

    // Every returned label belongs to the vocabulary.
    let texts = ["Отличный фильм!", "Ужасно.", "Ну такое себе кино", ""];
    for text in texts {
        let label = classifier.predict(text).unwrap();
        assert!(classifier.labels().iter().any(|l| l == &label));
    }

    // Idempotence: same Ready instance, same text, same label.
    let first = classifier.predict("Сегодня шел дождь весь день").unwrap();
    let second = classifier.predict("Сегодня шел дождь весь день").unwrap();
    assert_eq!(first, second);

    // Long inputs are truncated deterministically rather than rejected.
    let long_text = "слово ".repeat(4000);
    let from_long = classifier.predict(&long_text).unwrap();
    assert!(classifier.labels().iter().any(|l| l == &from_long));
}

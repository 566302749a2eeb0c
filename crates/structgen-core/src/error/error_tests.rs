#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test]
fn GenerateError___not_a_sequence___displays_dataset_and_kind() {
    let err = GenerateError::NotASequence {
        dataset: "primary".into(),
        kind: ShapeKind::Struct,
    };

    let display = err.to_string();

    assert_eq!(display, "dataset primary is not a sequence (got struct)");
}

#[test]
fn GenerateError___empty_sequence___displays_dataset() {
    let err = GenerateError::EmptySequence {
        dataset: "Tag".into(),
    };

    assert_eq!(err.to_string(), "dataset Tag is empty");
}

#[test]
fn GenerateError___io___displays_path_and_keeps_source() {
    let err = GenerateError::Io {
        path: PathBuf::from("out/tag_generated.rs"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };

    let display = err.to_string();

    assert!(display.contains("out/tag_generated.rs"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn GenerateError___from_serde_error___converts_to_config() {
    let json_err = serde_json::from_str::<String>("invalid").unwrap_err();

    let err: GenerateError = json_err.into();

    assert!(matches!(err, GenerateError::Config(_)));
}

#[test]
fn GenerateError___from_toml_error___converts_to_config() {
    let toml_err = toml::from_str::<toml::Table>("= broken").unwrap_err();

    let err: GenerateError = toml_err.into();

    assert!(matches!(err, GenerateError::Config(_)));
}

#[test_case(GenerateError::NotASequence { dataset: "a".into(), kind: ShapeKind::Map }, true ; "not a sequence")]
#[test_case(GenerateError::EmptySequence { dataset: "a".into() }, true ; "empty sequence")]
#[test_case(GenerateError::UnsupportedElementKind { dataset: "a".into(), kind: "int".into() }, true ; "unsupported element")]
#[test_case(GenerateError::Render("bad".into()), false ; "render")]
#[test_case(GenerateError::Config("bad".into()), false ; "config")]
fn GenerateError___variant___classified_as_validation(err: GenerateError, expected: bool) {
    assert_eq!(err.is_validation(), expected);
}

//! Error taxonomy tests: stable codes, delegation through wrappers, and
//! pipeline result bookkeeping.

use std::path::{Path, PathBuf};

use glean_core::errors::{
    AnnotationError, ConfigError, DetectionError, ErrorCode, ParseError, PipelineError,
    PipelineResult, QueryError, ScanError,
};

fn syntax_error() -> ParseError {
    ParseError::Syntax {
        path: PathBuf::from("api/bad.yaml"),
        line: 2,
        column: 7,
        kind: "ERROR".to_string(),
    }
}

#[test]
fn codes_are_stable() {
    assert_eq!(syntax_error().error_code(), "SYNTAX_ERROR");
    assert_eq!(
        ParseError::UnsupportedLanguage { extension: "rs".into() }.error_code(),
        "UNSUPPORTED_LANGUAGE"
    );
    assert_eq!(
        ScanError::RootNotFound { path: PathBuf::from("/nope") }.error_code(),
        "SCAN_ERROR"
    );
    assert_eq!(
        AnnotationError::MissingTree { pass: "paths" }.error_code(),
        "ANNOTATION_ERROR"
    );
    assert_eq!(
        ConfigError::InvalidRule {
            bundle: "b".into(),
            rule_id: "r".into(),
            message: "m".into(),
        }
        .error_code(),
        "RULE_BUNDLE_ERROR"
    );
}

#[test]
fn wrappers_delegate_codes() {
    let query = QueryError::MissingCapture {
        name: "q".into(),
        capture: "c".into(),
    };
    assert_eq!(ConfigError::from(query).error_code(), "QUERY_ERROR");
    assert_eq!(DetectionError::from(syntax_error()).error_code(), "SYNTAX_ERROR");

    let panic = DetectionError::DetectorPanic {
        id: "openapi".into(),
        message: "boom".into(),
    };
    let err = PipelineError::File {
        path: PathBuf::from("a.yaml"),
        detector: "openapi".into(),
        source: panic,
    };
    assert_eq!(err.error_code(), "DETECTOR_PANIC");
}

#[test]
fn diagnostic_prefixes_the_code() {
    let err = DetectionError::from(syntax_error());
    assert_eq!(
        err.diagnostic(),
        "[SYNTAX_ERROR] Parse error: Syntax error in api/bad.yaml at 2:7 (ERROR)"
    );
}

#[test]
fn pipeline_result_collects_per_path() {
    let mut result: PipelineResult<usize> = PipelineResult::new(3);
    assert!(result.is_clean());

    result.add_error(PipelineError::File {
        path: PathBuf::from("a.yaml"),
        detector: "openapi".into(),
        source: syntax_error().into(),
    });
    result.add_error(PipelineError::Directory {
        path: PathBuf::from("vendor"),
        detector: "openapi".into(),
        source: AnnotationError::MissingTree { pass: "paths" }.into(),
    });
    result.add_error(ScanError::RootNotFound { path: PathBuf::from("/x") }.into());

    assert_eq!(result.data, 3);
    assert_eq!(result.error_count(), 3);
    assert_eq!(result.errors_for(Path::new("a.yaml")).len(), 1);
    assert_eq!(result.errors_for(Path::new("vendor")).len(), 1);
    assert!(result.errors_for(Path::new("/x")).is_empty());
}

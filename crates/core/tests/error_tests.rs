//! Tests for error types

use buildwise_core::Error;
use miette::Diagnostic;
use std::path::PathBuf;

#[test]
fn test_configuration_error() {
    let error = Error::configuration("simulation.trials must be at least 1");
    assert_eq!(
        error.to_string(),
        "Configuration error: simulation.trials must be at least 1"
    );
}

#[test]
fn test_invalid_input_error() {
    let error = Error::invalid_input("area", String::from("must be a positive number, got 0"));
    assert_eq!(
        error.to_string(),
        "Invalid value for 'area': must be a positive number, got 0"
    );
}

#[test]
fn test_summary_error() {
    let error = Error::summary("remote", "quota exceeded");
    assert_eq!(
        error.to_string(),
        "Summary provider 'remote' failed: quota exceeded"
    );
}

#[test]
fn test_io_error_keeps_path() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error = Error::io(
        io_error,
        Some(PathBuf::from("/tmp/buildwise.toml")),
        "read configuration",
    );

    assert!(error.to_string().starts_with("I/O error during read configuration"));
    match error {
        Error::Io { path, .. } => {
            assert_eq!(path.as_deref(), Some(PathBuf::from("/tmp/buildwise.toml").as_path()));
        }
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn test_diagnostic_codes() {
    let cycle = Error::CycleDetected {
        message: "2 task(s) could not be ordered: A, B".to_string(),
    };
    assert_eq!(
        cycle.code().map(|c| c.to_string()),
        Some("buildwise::core::cycle_detected".to_string())
    );
    assert!(cycle.help().is_some());

    let missing = Error::MissingDependencies {
        missing: vec![
            ("T2".to_string(), "T0".to_string()),
            ("T3".to_string(), "X".to_string()),
        ],
    };
    assert_eq!(
        missing.to_string(),
        "Unknown task dependencies: T2 -> T0, T3 -> X"
    );
    assert_eq!(
        missing.code().map(|c| c.to_string()),
        Some("buildwise::core::missing_dependencies".to_string())
    );
}

//! Unit tests for error handling.

use crate::errors::errors::{Diagnostic, Error, ErrorImpl, ErrorTip};
use crate::Position;

fn at_line(line: u32) -> Position {
    Position { offset: 0, line }
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at_line(1),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        Position { offset: 42, line: 3 },
    );

    assert_eq!(error.get_position().offset, 42);
    assert_eq!(error.get_position().line, 3);
}

#[test]
fn test_runtime_error_display_carries_line() {
    let error = Error::new(
        ErrorImpl::IndexOutOfBounds {
            index: 5,
            length: 2,
        },
        at_line(7),
    );

    assert_eq!(error.get_error_name(), "IndexOutOfBounds");
    assert_eq!(
        error.to_string(),
        "line 7: index 5 out of range for length 2"
    );
}

#[test]
fn test_unsupported_operation_tip() {
    let error = Error::new(
        ErrorImpl::UnsupportedOperation {
            operator: "+".to_string(),
            left: "string".to_string(),
            right: "int".to_string(),
        },
        at_line(1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => {
            assert_eq!(tip, "Operation `+` not supported between string and int")
        }
        ErrorTip::None => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_diagnostic_display() {
    let diagnostic = Diagnostic::new(4, "x is not declared");
    assert_eq!(diagnostic.to_string(), "ERROR in line 4\nx is not declared");
}

#[test]
fn test_size_overflow_error() {
    let error = Error::new(
        ErrorImpl::SizeOverflow {
            what: "a 4294967296x4294967296 matrix".to_string(),
        },
        at_line(2),
    );

    assert_eq!(error.get_error_name(), "SizeOverflow");
    assert_eq!(
        error.to_string(),
        "line 2: a 4294967296x4294967296 matrix is too large"
    );
    assert_eq!(
        error.get_tip().to_string(),
        "a 4294967296x4294967296 matrix cannot be allocated"
    );
}

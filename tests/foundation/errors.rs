//! Integration tests for Error types
//!
//! Tests error construction, display, and error kinds.

use evalconsole_foundation::{Error, ErrorKind};

// =============================================================================
// Evaluation Errors
// =============================================================================

#[test]
fn eval_error_displays_name_and_message() {
    let err = Error::eval("boom");
    assert!(err.is_eval());
    assert_eq!(err.to_string(), "Error: boom");
}

#[test]
fn reference_error_names_the_identifier() {
    let err = Error::reference("missing");
    assert!(matches!(
        &err.kind,
        ErrorKind::Eval { name, .. } if name == "ReferenceError"
    ));
    assert_eq!(err.to_string(), "ReferenceError: missing is not defined");
}

#[test]
fn syntax_and_type_errors() {
    assert_eq!(
        Error::syntax("unexpected end of input").to_string(),
        "SyntaxError: unexpected end of input"
    );
    assert_eq!(
        Error::type_error("x is not a function").to_string(),
        "TypeError: x is not a function"
    );
}

// =============================================================================
// Console Errors
// =============================================================================

#[test]
fn bind_error_names_the_binding() {
    let err = Error::bind("env", "no value is registered under this name");
    assert!(!err.is_eval());
    assert!(matches!(err.kind, ErrorKind::Bind { .. }));
    let msg = err.to_string();
    assert!(msg.contains("env"));
    assert!(msg.contains("no value is registered"));
}

#[test]
fn load_error_names_the_source() {
    let err = Error::load("lib.js", "file not found");
    assert_eq!(err.to_string(), "failed to load lib.js: file not found");
}

#[test]
fn property_access_error() {
    let err = Error::property_access("secret", "access denied");
    assert!(matches!(err.kind, ErrorKind::PropertyAccess { .. }));
    assert!(err.to_string().contains("secret"));
}

#[test]
fn plain_kinds_display_their_payload() {
    let cases = [
        (ErrorKind::Config("bad".into()), "invalid configuration: bad"),
        (ErrorKind::Io("gone".into()), "I/O error: gone"),
        (ErrorKind::Serialization("eof".into()), "serialization error: eof"),
        (ErrorKind::Internal("oops".into()), "internal error: oops"),
    ];
    for (kind, expected) in cases {
        assert_eq!(Error::new(kind).to_string(), expected);
    }
}

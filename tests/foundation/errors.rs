//! Integration tests for Error types
//!
//! Tests error construction, locations, context, and diagnostics rendering.

use taskforge_foundation::{
    Diagnostics, Error, ErrorKind, InterpretationErrorKind, RegistryError, SemanticErrorKind,
    SourceLocation, TypeRegistrationError,
};

fn at(line: u32, column: u32) -> SourceLocation {
    SourceLocation::new("quest.dsl", line, column)
}

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn parse_error_message() {
    let err = Error::parse(at(3, 4), "`}`", "`;`");
    assert!(matches!(err.kind, ErrorKind::Parse(_)));
    assert_eq!(err.message(), "expected `}`, found `;`");
    assert_eq!(err.to_string(), "quest.dsl:3:4: expected `}`, found `;`");
}

#[test]
fn semantic_error_location() {
    let err = Error::semantic(at(2, 9), SemanticErrorKind::UnresolvedIdentifier("x".into()));
    assert_eq!(err.location(), Some(&at(2, 9)));
    assert!(err.message().contains("`x`"));
}

#[test]
fn registration_errors_have_no_location() {
    let err = Error::from(TypeRegistrationError::DuplicateOriginType("Goblin".into()));
    assert!(err.location().is_none());
    assert!(err.to_string().contains("Goblin"));

    let err = Error::from(RegistryError::DuplicateStorage("fetch_quest".into()));
    assert!(matches!(err.kind, ErrorKind::Registry(_)));
    assert!(err.location().is_none());
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn frames_and_source_accumulate() {
    let err = Error::interpretation(at(5, 1), InterpretationErrorKind::DivisionByZero)
        .with_frame("in inner (quest.dsl:5:1)")
        .with_frame("in outer (quest.dsl:9:3)")
        .with_source("quest.dsl");
    let context = err.context.unwrap();
    assert_eq!(context.source.as_deref(), Some("quest.dsl"));
    assert_eq!(context.stack.len(), 2);
    assert!(context.stack[0].contains("inner"));
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn diagnostics_render_one_line_per_error() {
    let diagnostics = Diagnostics::from(vec![
        Error::parse(at(1, 1), "definition", "`;`"),
        Error::internal("boom"),
    ]);
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(
        diagnostics.to_string(),
        "quest.dsl:1:1: expected definition, found `;`\ninternal error: boom"
    );

    let entries = diagnostics.entries();
    assert_eq!(entries[0].0, Some(at(1, 1)));
    assert_eq!(entries[1].0, None);
}

#[test]
fn empty_diagnostics() {
    let diagnostics = Diagnostics::new();
    assert!(diagnostics.is_empty());
    assert_eq!(diagnostics.to_string(), "");
}

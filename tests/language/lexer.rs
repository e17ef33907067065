//! Integration tests for the lexer

use taskforge_language::{Lexer, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize_all(source)
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        kinds("entity_type goblin graph fn var"),
        vec![
            TokenKind::EntityType,
            TokenKind::Ident("goblin".into()),
            TokenKind::Graph,
            TokenKind::Fn,
            TokenKind::Var,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn operators() {
    assert_eq!(
        kinds("-> == != <= >= = !"),
        vec![
            TokenKind::Arrow,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::LessEq,
            TokenKind::GreaterEq,
            TokenKind::Assign,
            TokenKind::Bang,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn literals() {
    assert_eq!(
        kinds(r#"42 2.5 "a\"b" true"#),
        vec![
            TokenKind::Int(42),
            TokenKind::Float(2.5),
            TokenKind::String("a\"b".into()),
            TokenKind::True,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("a // line\n /* block\n comment */ b"),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::Ident("b".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn spans_track_lines_and_columns() {
    let tokens = Lexer::tokenize_all("fn f() {\n  return;\n}");
    let ret = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Return)
        .unwrap();
    assert_eq!((ret.span.line, ret.span.column), (2, 3));
}

#[test]
fn malformed_input_becomes_error_tokens() {
    assert!(matches!(kinds("\"open")[0], TokenKind::Error(_)));
    assert!(matches!(kinds("/* open")[0], TokenKind::Error(_)));
    assert!(matches!(kinds("#")[0], TokenKind::Error(_)));
}

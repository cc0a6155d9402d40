//! Unit tests for the lexer.

use crate::lexer::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 3.14 .5 1e3 2.E-2").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Float);
    assert_eq!(tokens[2].value, ".5");
    // No decimal point, so the exponent is not part of the number
    assert_eq!(tokens[3].kind, TokenKind::Int);
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[5].kind, TokenKind::Float);
    assert_eq!(tokens[5].value, "2.E-2");
}

#[test]
fn test_tokenize_strings() {
    let tokens = tokenize(r#""hello" "a\"b\n""#).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].value, "a\"b\n");
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("if else for while break continue return print eye zeros ones other"),
        vec![
            TokenKind::If,
            TokenKind::Else,
            TokenKind::For,
            TokenKind::While,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Return,
            TokenKind::Print,
            TokenKind::Eye,
            TokenKind::Zeros,
            TokenKind::Ones,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_elementwise_operators() {
    assert_eq!(
        kinds("A.+B A.-B A.*B A./B"),
        vec![
            TokenKind::Identifier,
            TokenKind::DotPlus,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::DotDash,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::DotStar,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::DotSlash,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_compound_and_comparison_operators() {
    assert_eq!(
        kinds("+= -= *= /= == != <= >= = < >"),
        vec![
            TokenKind::PlusEquals,
            TokenKind::MinusEquals,
            TokenKind::StarEquals,
            TokenKind::SlashEquals,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_transpose_and_ranges() {
    assert_eq!(
        kinds("B = A'; x = A[0:2, 1];"),
        vec![
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Identifier,
            TokenKind::Apostrophe,
            TokenKind::Semicolon,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Identifier,
            TokenKind::OpenBracket,
            TokenKind::Int,
            TokenKind::Colon,
            TokenKind::Int,
            TokenKind::Comma,
            TokenKind::Int,
            TokenKind::CloseBracket,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("x = 1; # set x\n# whole line\ny = 2;"),
        vec![
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Int,
            TokenKind::Semicolon,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Int,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_line_tracking() {
    let tokens = tokenize("a = 1;\n\nb = 2;").unwrap();

    assert_eq!(tokens[0].span.start.line, 1);
    assert_eq!(tokens[4].value, "b");
    assert_eq!(tokens[4].span.start.line, 3);
    assert_eq!(tokens[4].span.start.offset, 8);
}

#[test]
fn test_unrecognised_token() {
    let error = tokenize("x = 1;\ny = @;").unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().line, 2);
    assert_eq!(error.get_position().offset, 11);
}

use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("while", TokenKind::While);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("return", TokenKind::Return);
        map.insert("print", TokenKind::Print);
        map.insert("eye", TokenKind::Eye);
        map.insert("zeros", TokenKind::Zeros);
        map.insert("ones", TokenKind::Ones);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Int,
    Float,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Semicolon,
    Colon,
    Comma,
    Apostrophe, // transpose

    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,

    Plus,
    Dash,
    Star,
    Slash,

    DotPlus,
    DotDash,
    DotStar,
    DotSlash,

    // Reserved
    If,
    Else,
    For,
    While,
    Break,
    Continue,
    Return,
    Print,
    Eye,
    Zeros,
    Ones,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.carries_value() {
            write!(f, "{} ({})", self.kind, self.value)
        } else {
            write!(f, "{} ()", self.kind)
        }
    }
}

impl Token {
    fn carries_value(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::String | TokenKind::Identifier | TokenKind::Int | TokenKind::Float
        )
    }

    /// Prints the token on its own line, prefixed with its source line.
    pub fn debug(&self) {
        println!("{:>4}: {}", self.span.start.line, self);
    }
}

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &str);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> Self {
        // Every rule is anchored so that a match is only ever tried at the
        // lexer's current offset.
        RegexPattern {
            regex: Regex::new(&format!("^(?:{})", pattern)).unwrap(),
            handler,
        }
    }
}

lazy_static! {
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern::new("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        RegexPattern::new(r"((\d+\.\d*)|(\d*\.\d+))([eE][+-]?\d+)?", float_handler),
        RegexPattern::new(r"\d+", int_handler),
        RegexPattern::new(r"\s+", skip_handler),
        RegexPattern::new(r#""([^"\\\n]|\\.)*""#, string_handler),
        RegexPattern::new("#.*", skip_handler),
        RegexPattern::new(r"\.\+", MK_DEFAULT_HANDLER!(TokenKind::DotPlus, ".+")),
        RegexPattern::new(r"\.-", MK_DEFAULT_HANDLER!(TokenKind::DotDash, ".-")),
        RegexPattern::new(r"\.\*", MK_DEFAULT_HANDLER!(TokenKind::DotStar, ".*")),
        RegexPattern::new(r"\./", MK_DEFAULT_HANDLER!(TokenKind::DotSlash, "./")),
        RegexPattern::new(r"\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=")),
        RegexPattern::new("-=", MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=")),
        RegexPattern::new(r"\*=", MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=")),
        RegexPattern::new("/=", MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=")),
        RegexPattern::new("==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        RegexPattern::new("!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        RegexPattern::new("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        RegexPattern::new(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        RegexPattern::new("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        RegexPattern::new("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        RegexPattern::new(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        RegexPattern::new(r"\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        RegexPattern::new("-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        RegexPattern::new(r"\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        RegexPattern::new("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        RegexPattern::new("'", MK_DEFAULT_HANDLER!(TokenKind::Apostrophe, "'")),
        RegexPattern::new(r"\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        RegexPattern::new(r"\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        RegexPattern::new(r"\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        RegexPattern::new(r"\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        RegexPattern::new(r"\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        RegexPattern::new(r"\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        RegexPattern::new(":", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        RegexPattern::new(",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        RegexPattern::new(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: u32,
}

impl Lexer {
    pub fn new(source: String) -> Lexer {
        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            line: 1,
        }
    }

    /// Moves past `n` bytes, keeping the line counter in step.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        self.line += self.source[self.pos..end].matches('\n').count() as u32;
        self.pos = end;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position {
            offset: self.pos as u32,
            line: self.line,
        }
    }

    /// Span of a token of `len` bytes starting at the current offset.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: self.position(),
            end: Position {
                offset: (self.pos + len) as u32,
                line: self.line,
            },
        }
    }
}

fn int_handler(lexer: &mut Lexer, matched: &str) {
    let span = lexer.span_of(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Int, matched.to_string(), span));
    lexer.advance_n(matched.len());
}

fn float_handler(lexer: &mut Lexer, matched: &str) {
    let span = lexer.span_of(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Float, matched.to_string(), span));
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Lexer, matched: &str) {
    lexer.advance_n(matched.len());
}

fn string_handler(lexer: &mut Lexer, matched: &str) {
    let span = lexer.span_of(matched.len());
    let literal = unescape(&matched[1..matched.len() - 1]);

    lexer.push(MK_TOKEN!(TokenKind::String, literal, span));
    lexer.advance_n(matched.len());
}

fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some(other) => {
                // Unknown escapes are kept verbatim
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) {
    let span = lexer.span_of(matched.len());
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, matched.to_string(), span));
    lexer.advance_n(matched.len());
}

#[tracing::instrument(level = "debug", skip_all)]
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source.to_string());

    while !lex.at_eof() {
        let found = PATTERNS.iter().find_map(|pattern| {
            pattern
                .regex
                .find(lex.remainder())
                .map(|m| (pattern.handler, m.as_str().to_string()))
        });

        match found {
            Some((handler, matched)) => handler(&mut lex, &matched),
            None => {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken {
                        token: lex.at().map(String::from).unwrap_or_default(),
                    },
                    lex.position(),
                ))
            }
        }
    }

    let span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    tracing::debug!(tokens = lex.tokens.len(), "tokenized source");

    Ok(lex.tokens)
}

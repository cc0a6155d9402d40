#![allow(clippy::module_inception)]

use std::{io::Write, time::Instant};

use crate::{
    ast::{ast::Ast, types::TypeTable},
    errors::errors::{Diagnostic, Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod stack;
pub mod type_checker;

extern crate regex;

/// Byte offset into the source and the 1-based line it falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Finds the line containing byte `offset`: its number, its text and the
/// offset within it. `None` when the offset is past the end of `source`.
pub fn get_line_at_position(source: &str, offset: u32) -> Option<(usize, String, usize)> {
    let pos = offset as usize;
    let mut start = 0;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let end = start + line.len();
        if (start..end).contains(&pos) {
            return Some((index + 1, line.to_string(), pos - start));
        }
        start = end;
    }

    None
}

/// A program that made it through every static phase.
#[derive(Debug)]
pub struct Program {
    pub ast: Ast,
    pub types: TypeTable,
}

/// Why a program is refused before it runs.
#[derive(Debug)]
pub enum Rejection {
    Lexical(Error),
    Syntax(Error),
    /// Every finding of the type checker, in source order
    Static(Vec<Diagnostic>),
}

/// Tokenizes, parses and checks `source`.
pub fn front_end(source: &str) -> Result<Program, Rejection> {
    let start = Instant::now();
    let tokens = tokenize(source).map_err(Rejection::Lexical)?;
    tracing::debug!(tokens = tokens.len(), elapsed = ?start.elapsed(), "tokenized");

    let parse_start = Instant::now();
    let ast = parse(tokens).map_err(Rejection::Syntax)?;
    tracing::debug!(statements = ast.stmt_count(), elapsed = ?parse_start.elapsed(), "parsed");

    let check_start = Instant::now();
    let outcome = type_check(&ast);
    tracing::debug!(elapsed = ?check_start.elapsed(), "type checked");

    if outcome.has_error() {
        return Err(Rejection::Static(outcome.diagnostics));
    }

    Ok(Program {
        ast,
        types: outcome.types,
    })
}

pub fn display_error(error: &Error, file_name: &str, source: &str, out: &mut impl Write) -> std::io::Result<()> {
    /*
        Error: name (tip)
        -> program.m
           |
        20 | x = A[5];
           | ----^
    */

    if let ErrorTip::None = error.get_tip() {
        writeln!(out, "Error: {}", error.get_error_name())?;
    } else {
        writeln!(out, "Error: {} ({})", error.get_error_name(), error.get_tip())?;
    }
    writeln!(out, "-> {}", file_name)?;

    let position = error.get_position();
    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.offset) else {
        return writeln!(out, "at end of input, line {}", position.line);
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;
    writeln!(out, "{:>padding$}", "|")?;

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    writeln!(out, "{} | {}", line_string, line_text_removed.trim_end())?;

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    writeln!(out, "{:>padding$} {:->arrows$}", "|", "^")
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let start = string.len() - string.trim_start_matches(|c: char| c == ' ' || c == '\t').len();
    (&string[start..], start)
}

//! Parser for building the arena AST from tokens.
//!
//! A Pratt parser: prefix (NUD) and infix/postfix (LED) handlers are looked
//! up by token kind, and binding powers decide how far an expression
//! extends. Statements are dispatched through a third lookup table keyed by
//! their leading keyword; anything else is parsed as an assignment.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;

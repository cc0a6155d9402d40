//! Lexical analysis.
//!
//! Converts source text into a stream of tokens using an ordered table of
//! regular expressions. The first rule that matches at the current offset
//! wins, so longer operators are listed before their prefixes.

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;

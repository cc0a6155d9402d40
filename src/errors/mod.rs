//! Error types and error reporting for the interpreter.
//!
//! This module defines the error types used throughout the pipeline:
//!
//! - Positioned errors for lexing, parsing and evaluation, which stop the run
//! - Line-numbered diagnostics collected by the type checker
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;

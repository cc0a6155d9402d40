//! Evaluation of checked programs.
//!
//! - `value` - runtime values and how they print
//! - `matrix` - dense numeric arrays
//! - `memory` - the runtime scope stack
//! - `operators` - arithmetic and comparison shared by scalars and matrices
//! - `interpreter`, `stmt`, `expr` - the tree walk

pub mod expr;
pub mod interpreter;
pub mod matrix;
pub mod memory;
pub mod operators;
pub mod stmt;
pub mod value;

#[cfg(test)]
mod tests;

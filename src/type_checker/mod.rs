//! Static type and shape checking.
//!
//! A single forward pass over the AST that annotates every expression with
//! a type and, for arrays, a symbolic shape. Findings are collected as
//! diagnostics rather than returned as errors, so one run reports every
//! problem in the program.
//!
//! - `symbol_table` - maps names to the expression that last defined them
//! - `type_map` - the operator compatibility table
//! - `type_checker` - the pass itself

pub mod symbol_table;
pub mod type_checker;
pub mod type_map;

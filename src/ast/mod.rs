//! Abstract Syntax Tree definitions.
//!
//! The tree is stored in a flat arena: expressions and statements are
//! addressed by [`ast::ExprId`] and [`ast::StmtId`], and child links are ids
//! rather than boxes. Inference results never live on the nodes themselves;
//! the type checker writes them to a [`types::TypeTable`] keyed by `ExprId`.
//!
//! - `ast` - the arena and node ids
//! - `expressions` - expression kinds and operators
//! - `statements` - statement kinds and assignment operators
//! - `types` - the type lattice, shapes and the annotation side table

pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;

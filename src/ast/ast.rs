use std::fmt::Display;

use crate::Span;

use super::{
    expressions::{Expr, ExprKind},
    statements::{Stmt, StmtKind},
};

/// Index of an expression in its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for ExprId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Index of a statement in its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(u32);

impl StmtId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena owning every node of one parsed program.
///
/// Nodes are appended by the parser and never modified afterwards. Each node
/// has exactly one parent, so walking from `body` visits every node once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ast {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    /// Top-level statements in source order
    pub body: Vec<StmtId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(Expr { kind, span });
        id
    }

    pub fn push_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId(self.stmts.len() as u32);
        self.stmts.push(Stmt { kind, span });
        id
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    /// Source line an expression starts on.
    pub fn expr_line(&self, id: ExprId) -> u32 {
        self.expr(id).span.start.line
    }

    pub fn stmt_line(&self, id: StmtId) -> u32 {
        self.stmt(id).span.start.line
    }
}

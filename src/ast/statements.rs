use std::fmt::Display;

use crate::Span;

use super::{
    ast::{ExprId, StmtId},
    expressions::ArithOp,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Compound(ArithOp),
}

impl Display for AssignOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignOp::Assign => write!(f, "="),
            AssignOp::Compound(op) => write!(f, "{}=", op),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Block(Vec<StmtId>),
    Assignment {
        target: ExprId,
        op: AssignOp,
        value: ExprId,
    },
    For {
        variable: String,
        /// Always an `ExprKind::Range`
        range: ExprId,
        body: StmtId,
    },
    While {
        condition: ExprId,
        body: StmtId,
    },
    If {
        condition: ExprId,
        then_body: StmtId,
        else_body: Option<StmtId>,
    },
    Break,
    Continue,
    Return(Vec<ExprId>),
    Print(Vec<ExprId>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

use std::fmt::Display;

use crate::Span;

use super::ast::ExprId;

/// Arithmetic operator shared by the linear (`+ - * /`) and elementwise
/// (`.+ .- .* ./`) forms, and by compound assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

impl Display for ArithOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
    Equals,
    NotEquals,
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            CompareOp::Less => "<",
            CompareOp::Greater => ">",
            CompareOp::LessEquals => "<=",
            CompareOp::GreaterEquals => ">=",
            CompareOp::Equals => "==",
            CompareOp::NotEquals => "!=",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Eye,
    Zeros,
    Ones,
}

impl Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Builtin::Eye => "eye",
            Builtin::Zeros => "zeros",
            Builtin::Ones => "ones",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    /// One row per element for a flat list; nested literals are rows
    ArrayLiteral(Vec<ExprId>),
    Identifier(String),
    /// Base is always an `Identifier` or a `StringLiteral`
    Indexed {
        base: ExprId,
        indices: Vec<ExprId>,
    },
    NumberBinaryOp {
        left: ExprId,
        op: ArithOp,
        right: ExprId,
    },
    MatrixBinaryOp {
        left: ExprId,
        op: ArithOp,
        right: ExprId,
    },
    BooleanOp {
        left: ExprId,
        op: CompareOp,
        right: ExprId,
    },
    UnaryMinus(ExprId),
    Transpose(ExprId),
    MatrixBuiltin {
        name: Builtin,
        args: Vec<ExprId>,
    },
    /// Half-open `[start, end)`
    Range {
        start: ExprId,
        end: ExprId,
    },
}

impl ExprKind {
    /// Whether this node can appear on the left of an assignment.
    pub fn is_lvalue(&self) -> bool {
        matches!(self, ExprKind::Identifier(_) | ExprKind::Indexed { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

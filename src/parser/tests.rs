//! Unit tests for the parser.

use pretty_assertions::assert_eq;

use crate::{
    ast::{
        ast::{Ast, ExprId},
        expressions::{ArithOp, Builtin, CompareOp, ExprKind},
        statements::{AssignOp, StmtKind},
    },
    lexer::lexer::tokenize,
    parser::parser::parse,
};

fn parse_source(source: &str) -> Ast {
    parse(tokenize(source).unwrap()).unwrap()
}

/// Value of the single `x = <expr>;` statement in `source`.
fn assigned_value(source: &str) -> (Ast, ExprId) {
    let ast = parse_source(source);
    let value = match &ast.stmt(ast.body[0]).kind {
        StmtKind::Assignment { value, .. } => *value,
        other => panic!("expected assignment, found {:?}", other),
    };
    (ast, value)
}

#[test]
fn test_parse_simple_assignment() {
    let ast = parse_source("x = 42;");

    assert_eq!(ast.body.len(), 1);
    match &ast.stmt(ast.body[0]).kind {
        StmtKind::Assignment { target, op, value } => {
            assert_eq!(ast.expr(*target).kind, ExprKind::Identifier("x".to_string()));
            assert_eq!(*op, AssignOp::Assign);
            assert_eq!(ast.expr(*value).kind, ExprKind::IntLiteral(42));
        }
        other => panic!("expected assignment, found {:?}", other),
    }
}

#[test]
fn test_parse_compound_assignment() {
    let ast = parse_source("x /= 2.5;");

    match &ast.stmt(ast.body[0]).kind {
        StmtKind::Assignment { op, value, .. } => {
            assert_eq!(*op, AssignOp::Compound(ArithOp::Div));
            assert_eq!(ast.expr(*value).kind, ExprKind::FloatLiteral(2.5));
        }
        other => panic!("expected assignment, found {:?}", other),
    }
}

#[test]
fn test_parse_precedence() {
    // 1 + (2 * 3)
    let (ast, value) = assigned_value("x = 1 + 2 * 3;");

    match &ast.expr(value).kind {
        ExprKind::NumberBinaryOp { left, op, right } => {
            assert_eq!(*op, ArithOp::Add);
            assert_eq!(ast.expr(*left).kind, ExprKind::IntLiteral(1));
            assert!(matches!(
                ast.expr(*right).kind,
                ExprKind::NumberBinaryOp { op: ArithOp::Mul, .. }
            ));
        }
        other => panic!("expected binary op, found {:?}", other),
    }
}

#[test]
fn test_parse_elementwise_binds_tighter_than_linear() {
    // A * (B .+ C)
    let (ast, value) = assigned_value("x = A * B .+ C;");

    match &ast.expr(value).kind {
        ExprKind::NumberBinaryOp { op, right, .. } => {
            assert_eq!(*op, ArithOp::Mul);
            assert!(matches!(
                ast.expr(*right).kind,
                ExprKind::MatrixBinaryOp { op: ArithOp::Add, .. }
            ));
        }
        other => panic!("expected binary op, found {:?}", other),
    }
}

#[test]
fn test_parse_unary_minus_wraps_transpose() {
    let (ast, value) = assigned_value("x = -A';");

    match &ast.expr(value).kind {
        ExprKind::UnaryMinus(inner) => {
            assert!(matches!(ast.expr(*inner).kind, ExprKind::Transpose(_)));
        }
        other => panic!("expected unary minus, found {:?}", other),
    }
}

#[test]
fn test_parse_comparison_is_loosest() {
    let (ast, value) = assigned_value("x = a + 1 < b;");

    assert!(matches!(
        ast.expr(value).kind,
        ExprKind::BooleanOp {
            op: CompareOp::Less,
            ..
        }
    ));
}

#[test]
fn test_parse_nested_array_literal() {
    let (ast, value) = assigned_value("A = [[1, 2], [3, 4]];");

    match &ast.expr(value).kind {
        ExprKind::ArrayLiteral(rows) => {
            assert_eq!(rows.len(), 2);
            match &ast.expr(rows[1]).kind {
                ExprKind::ArrayLiteral(row) => {
                    assert_eq!(ast.expr(row[0]).kind, ExprKind::IntLiteral(3));
                }
                other => panic!("expected row, found {:?}", other),
            }
        }
        other => panic!("expected array literal, found {:?}", other),
    }
}

#[test]
fn test_parse_empty_array_literal() {
    let (ast, value) = assigned_value("A = [];");

    assert_eq!(ast.expr(value).kind, ExprKind::ArrayLiteral(vec![]));
}

#[test]
fn test_parse_index_with_ranges() {
    let (ast, value) = assigned_value("x = A[0:2, 1];");

    match &ast.expr(value).kind {
        ExprKind::Indexed { base, indices } => {
            assert_eq!(ast.expr(*base).kind, ExprKind::Identifier("A".to_string()));
            assert_eq!(indices.len(), 2);
            assert!(matches!(ast.expr(indices[0]).kind, ExprKind::Range { .. }));
            assert_eq!(ast.expr(indices[1]).kind, ExprKind::IntLiteral(1));
        }
        other => panic!("expected index, found {:?}", other),
    }
}

#[test]
fn test_parse_indexed_assignment_target() {
    let ast = parse_source("s[1:3] = \"X\";");

    match &ast.stmt(ast.body[0]).kind {
        StmtKind::Assignment { target, .. } => {
            assert!(matches!(ast.expr(*target).kind, ExprKind::Indexed { .. }));
        }
        other => panic!("expected assignment, found {:?}", other),
    }
}

#[test]
fn test_parse_builtin() {
    let (ast, value) = assigned_value("Z = zeros(2, 3);");

    match &ast.expr(value).kind {
        ExprKind::MatrixBuiltin { name, args } => {
            assert_eq!(*name, Builtin::Zeros);
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected builtin, found {:?}", other),
    }
}

#[test]
fn test_parse_control_flow() {
    let ast = parse_source(
        "for i = 0:3 { if (i == 1) { continue; } else print i; }\nwhile (x < 2) x += 1;",
    );

    assert_eq!(ast.body.len(), 2);
    match &ast.stmt(ast.body[0]).kind {
        StmtKind::For { variable, range, body } => {
            assert_eq!(variable, "i");
            assert!(matches!(ast.expr(*range).kind, ExprKind::Range { .. }));
            match &ast.stmt(*body).kind {
                StmtKind::Block(statements) => {
                    assert!(matches!(
                        ast.stmt(statements[0]).kind,
                        StmtKind::If {
                            else_body: Some(_),
                            ..
                        }
                    ));
                }
                other => panic!("expected block, found {:?}", other),
            }
        }
        other => panic!("expected for, found {:?}", other),
    }
    assert!(matches!(ast.stmt(ast.body[1]).kind, StmtKind::While { .. }));
    assert_eq!(ast.stmt_line(ast.body[1]), 2);
}

#[test]
fn test_parse_return_and_print() {
    let ast = parse_source("print 1, \"a\"; return; return x, 2;");

    assert!(matches!(&ast.stmt(ast.body[0]).kind, StmtKind::Print(args) if args.len() == 2));
    assert!(matches!(&ast.stmt(ast.body[1]).kind, StmtKind::Return(args) if args.is_empty()));
    assert!(matches!(&ast.stmt(ast.body[2]).kind, StmtKind::Return(args) if args.len() == 2));
}

#[test]
fn test_missing_semicolon_is_error() {
    let error = parse(tokenize("x = 1\ny = 2;").unwrap()).unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_position().line, 2);
}

#[test]
fn test_expression_statement_is_error() {
    let error = parse(tokenize("x + 1;").unwrap()).unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_indexing_a_literal_number_is_error() {
    let error = parse(tokenize("x = 5[0];").unwrap()).unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_unclosed_block_is_error() {
    assert!(parse(tokenize("{ x = 1;").unwrap()).is_err());
}

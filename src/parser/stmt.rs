use crate::{
    ast::{
        ast::{ExprId, StmtId},
        expressions::ArithOp,
        statements::{AssignOp, StmtKind},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    stack::ensure_sufficient_stack,
};

use super::{
    expr::{parse_expr, parse_expr_list, push_range},
    lookups::BindingPower,
    parser::Parser,
};

pub fn parse_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    ensure_sufficient_stack(|| {
        let handler = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied();
        match handler {
            Some(handler) => handler(parser),
            None => parse_assignment_stmt(parser),
        }
    })
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    match kind {
        TokenKind::Assignment => Some(AssignOp::Assign),
        TokenKind::PlusEquals => Some(AssignOp::Compound(ArithOp::Add)),
        TokenKind::MinusEquals => Some(AssignOp::Compound(ArithOp::Sub)),
        TokenKind::StarEquals => Some(AssignOp::Compound(ArithOp::Mul)),
        TokenKind::SlashEquals => Some(AssignOp::Compound(ArithOp::Div)),
        _ => None,
    }
}

/// `target op value;`
///
/// Any expression is accepted as the target; whether it is assignable is
/// decided by the type checker.
pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.get_position();
    let target = parse_expr(parser, BindingPower::Default)?;

    let op = assign_op(parser.current_token_kind())
        .ok_or_else(|| parser.unexpected_detailed("expected an assignment"))?;
    parser.advance();

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    let span = parser.span_from(start);
    Ok(parser.push_stmt(StmtKind::Assignment { target, op, value }, span))
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    let span = parser.span_from(start);
    Ok(parser.push_stmt(StmtKind::Block(statements), span))
}

/// `(condition)`, shared by `if` and `while`.
fn parse_condition(parser: &mut Parser) -> Result<ExprId, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(condition)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;

    let condition = parse_condition(parser)?;
    let then_body = parse_stmt(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_stmt(parser)?)
    } else {
        None
    };

    let span = parser.span_from(start);
    Ok(parser.push_stmt(
        StmtKind::If {
            condition,
            then_body,
            else_body,
        },
        span,
    ))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;

    let condition = parse_condition(parser)?;
    let body = parse_stmt(parser)?;

    let span = parser.span_from(start);
    Ok(parser.push_stmt(StmtKind::While { condition, body }, span))
}

/// `for ID = start:end body`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;

    let variable = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::Assignment)?;

    let range_start = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let range_end = parse_expr(parser, BindingPower::Default)?;
    let range = push_range(parser, range_start, range_end);

    let body = parse_stmt(parser)?;

    let span = parser.span_from(start);
    Ok(parser.push_stmt(
        StmtKind::For {
            variable,
            range,
            body,
        },
        span,
    ))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;
    parser.expect(TokenKind::Semicolon)?;

    let span = parser.span_from(start);
    Ok(parser.push_stmt(StmtKind::Break, span))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;
    parser.expect(TokenKind::Semicolon)?;

    let span = parser.span_from(start);
    Ok(parser.push_stmt(StmtKind::Continue, span))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;
    let args = parse_expr_list(parser, TokenKind::Semicolon)?;

    let span = parser.span_from(start);
    Ok(parser.push_stmt(StmtKind::Return(args), span))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;
    if parser.current_token_kind() == TokenKind::Semicolon {
        return Err(parser.unexpected_detailed("print needs at least one argument"));
    }
    let args = parse_expr_list(parser, TokenKind::Semicolon)?;

    let span = parser.span_from(start);
    Ok(parser.push_stmt(StmtKind::Print(args), span))
}

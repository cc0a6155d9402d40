use crate::{
    ast::{
        ast::ExprId,
        expressions::{ArithOp, Builtin, CompareOp, ExprKind},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    stack::ensure_sufficient_stack,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

/// Parses an expression whose operators bind tighter than `bp`.
///
/// # Arguments
///
/// * `parser` - The parser, positioned at the first token of the expression
/// * `bp` - Binding power of the operator to the left of this expression
///
/// # Returns
///
/// The id of the parsed expression, or the first syntax error.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<ExprId, Error> {
    ensure_sufficient_stack(|| {
        // First parse NUD
        let token_kind = parser.current_token_kind();
        let nud = match parser.get_nud_lookup().get(&token_kind) {
            Some(nud) => *nud,
            None => return Err(parser.unexpected()),
        };

        let mut left = nud(parser)?;

        // While the current token binds tighter than `bp`, keep extending lhs
        while parser.current_binding_power() > bp {
            let token_kind = parser.current_token_kind();
            let led = match parser.get_led_lookup().get(&token_kind) {
                Some(led) => *led,
                None => return Err(parser.unexpected()),
            };

            left = led(parser, left, parser.current_binding_power())?;
        }

        Ok(left)
    })
}

/// Parses a literal or an identifier.
pub fn parse_primary_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let token = parser.advance();

    let kind = match token.kind {
        TokenKind::Int => match token.value.parse::<i64>() {
            Ok(value) => ExprKind::IntLiteral(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::Float => match token.value.parse::<f64>() {
            Ok(value) => ExprKind::FloatLiteral(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::String => ExprKind::StringLiteral(token.value),
        TokenKind::Identifier => ExprKind::Identifier(token.value),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    Ok(parser.push_expr(kind, token.span))
}

fn arith_op(kind: TokenKind) -> Option<ArithOp> {
    match kind {
        TokenKind::Plus | TokenKind::DotPlus => Some(ArithOp::Add),
        TokenKind::Dash | TokenKind::DotDash => Some(ArithOp::Sub),
        TokenKind::Star | TokenKind::DotStar => Some(ArithOp::Mul),
        TokenKind::Slash | TokenKind::DotSlash => Some(ArithOp::Div),
        _ => None,
    }
}

/// Parses the right operand of `+ - * /`.
pub fn parse_binary_expr(parser: &mut Parser, left: ExprId, bp: BindingPower) -> Result<ExprId, Error> {
    let operator = parser.current_token_kind();
    let op = arith_op(operator).ok_or_else(|| parser.unexpected())?;
    parser.advance();

    let right = parse_expr(parser, bp)?;
    let span = parser.span_from(parser.expr_span(left).start);

    Ok(parser.push_expr(ExprKind::NumberBinaryOp { left, op, right }, span))
}

/// Parses the right operand of `.+ .- .* ./`.
pub fn parse_elementwise_expr(parser: &mut Parser, left: ExprId, bp: BindingPower) -> Result<ExprId, Error> {
    let operator = parser.current_token_kind();
    let op = arith_op(operator).ok_or_else(|| parser.unexpected())?;
    parser.advance();

    let right = parse_expr(parser, bp)?;
    let span = parser.span_from(parser.expr_span(left).start);

    Ok(parser.push_expr(ExprKind::MatrixBinaryOp { left, op, right }, span))
}

pub fn parse_comparison_expr(parser: &mut Parser, left: ExprId, bp: BindingPower) -> Result<ExprId, Error> {
    let op = match parser.advance().kind {
        TokenKind::Less => CompareOp::Less,
        TokenKind::LessEquals => CompareOp::LessEquals,
        TokenKind::Greater => CompareOp::Greater,
        TokenKind::GreaterEquals => CompareOp::GreaterEquals,
        TokenKind::Equals => CompareOp::Equals,
        _ => CompareOp::NotEquals,
    };

    let right = parse_expr(parser, bp)?;
    let span = parser.span_from(parser.expr_span(left).start);

    Ok(parser.push_expr(ExprKind::BooleanOp { left, op, right }, span))
}

pub fn parse_unary_minus_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let start = parser.advance().span.start;
    let value = parse_expr(parser, BindingPower::Unary)?;
    let span = parser.span_from(start);

    Ok(parser.push_expr(ExprKind::UnaryMinus(value), span))
}

pub fn parse_transpose_expr(parser: &mut Parser, left: ExprId, _bp: BindingPower) -> Result<ExprId, Error> {
    parser.expect(TokenKind::Apostrophe)?;
    let span = parser.span_from(parser.expr_span(left).start);

    Ok(parser.push_expr(ExprKind::Transpose(left), span))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Parses comma separated expressions up to (and including) `terminator`.
pub fn parse_expr_list(parser: &mut Parser, terminator: TokenKind) -> Result<Vec<ExprId>, Error> {
    let mut items = vec![];

    if parser.current_token_kind() != terminator {
        items.push(parse_expr(parser, BindingPower::Default)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            items.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(terminator)?;
    Ok(items)
}

/// Parses `[ ]`, `[a, b, ...]` or a nested `[[...], [...]]` literal.
pub fn parse_array_literal_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let start = parser.expect(TokenKind::OpenBracket)?.span.start;
    let elements = parse_expr_list(parser, TokenKind::CloseBracket)?;
    let span = parser.span_from(start);

    Ok(parser.push_expr(ExprKind::ArrayLiteral(elements), span))
}

pub fn parse_builtin_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let token = parser.advance();
    let name = match token.kind {
        TokenKind::Eye => Builtin::Eye,
        TokenKind::Zeros => Builtin::Zeros,
        _ => Builtin::Ones,
    };

    parser.expect(TokenKind::OpenParen)?;
    let args = parse_expr_list(parser, TokenKind::CloseParen)?;
    let span = parser.span_from(token.span.start);

    Ok(parser.push_expr(ExprKind::MatrixBuiltin { name, args }, span))
}

/// Parses `expr` or `expr:expr`.
pub fn parse_index_component(parser: &mut Parser) -> Result<ExprId, Error> {
    let start = parse_expr(parser, BindingPower::Default)?;
    if parser.current_token_kind() != TokenKind::Colon {
        return Ok(start);
    }

    parser.advance();
    let end = parse_expr(parser, BindingPower::Default)?;
    Ok(push_range(parser, start, end))
}

pub fn push_range(parser: &mut Parser, start: ExprId, end: ExprId) -> ExprId {
    let span = Span {
        start: parser.expr_span(start).start,
        end: parser.expr_span(end).end,
    };
    parser.push_expr(ExprKind::Range { start, end }, span)
}

pub fn parse_index_expr(parser: &mut Parser, left: ExprId, _bp: BindingPower) -> Result<ExprId, Error> {
    if !matches!(
        parser.expr_kind(left),
        ExprKind::Identifier(_) | ExprKind::StringLiteral(_)
    ) {
        return Err(parser.unexpected_detailed("only variables and strings can be indexed"));
    }

    parser.expect(TokenKind::OpenBracket)?;

    let mut indices = vec![parse_index_component(parser)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        indices.push(parse_index_component(parser)?);
    }
    parser.expect(TokenKind::CloseBracket)?;

    let span = parser.span_from(parser.expr_span(left).start);
    Ok(parser.push_expr(ExprKind::Indexed { base: left, indices }, span))
}

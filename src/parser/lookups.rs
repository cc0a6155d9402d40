use std::collections::HashMap;

use crate::{
    ast::ast::{ExprId, StmtId},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator precedence, lowest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Relational,
    Additive,
    Multiplicative,
    ElementwiseAdditive,
    ElementwiseMultiplicative,
    Unary,
    Postfix,
    Primary,
}

pub type StmtHandler = fn(&mut Parser) -> Result<StmtId, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<ExprId, Error>;
pub type LEDHandler = fn(&mut Parser, ExprId, BindingPower) -> Result<ExprId, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Relational
    parser.led(TokenKind::Less, BindingPower::Relational, parse_comparison_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_comparison_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_comparison_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_comparison_expr);
    parser.led(TokenKind::Equals, BindingPower::Relational, parse_comparison_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Relational, parse_comparison_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);

    // Elementwise
    parser.led(TokenKind::DotPlus, BindingPower::ElementwiseAdditive, parse_elementwise_expr);
    parser.led(TokenKind::DotDash, BindingPower::ElementwiseAdditive, parse_elementwise_expr);
    parser.led(TokenKind::DotStar, BindingPower::ElementwiseMultiplicative, parse_elementwise_expr);
    parser.led(TokenKind::DotSlash, BindingPower::ElementwiseMultiplicative, parse_elementwise_expr);

    // Postfix
    parser.led(TokenKind::Apostrophe, BindingPower::Postfix, parse_transpose_expr);
    parser.led(TokenKind::OpenBracket, BindingPower::Postfix, parse_index_expr);

    // Literals, symbols and prefixes
    parser.nud(TokenKind::Int, parse_primary_expr);
    parser.nud(TokenKind::Float, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_primary_expr);
    parser.nud(TokenKind::Dash, parse_unary_minus_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenBracket, parse_array_literal_expr);
    parser.nud(TokenKind::Eye, parse_builtin_expr);
    parser.nud(TokenKind::Zeros, parse_builtin_expr);
    parser.nud(TokenKind::Ones, parse_builtin_expr);

    // Statements
    parser.stmt(TokenKind::OpenCurly, parse_block_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::Break, parse_break_stmt);
    parser.stmt(TokenKind::Continue, parse_continue_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Print, parse_print_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;

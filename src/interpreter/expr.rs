use std::io::Write;

use crate::{
    ast::{
        ast::ExprId,
        expressions::{Builtin, ExprKind},
    },
    errors::errors::{Error, ErrorImpl},
    stack::ensure_sufficient_stack,
};

use super::{
    interpreter::Interpreter,
    matrix::{Element, Matrix, Selector},
    operators::{arithmetic, compare, linear, negate},
    value::Value,
};

/// Evaluates an expression to a value.
pub fn eval_expression<W: Write>(
    interpreter: &mut Interpreter<'_, W>,
    id: ExprId,
) -> Result<Value, Error> {
    ensure_sufficient_stack(|| eval_kind(interpreter, id))
}

fn eval_kind<W: Write>(interpreter: &mut Interpreter<'_, W>, id: ExprId) -> Result<Value, Error> {
    let ast = interpreter.ast;

    match &ast.expr(id).kind {
        ExprKind::IntLiteral(value) => Ok(Value::Int(*value)),
        ExprKind::FloatLiteral(value) => Ok(Value::Float(*value)),
        ExprKind::StringLiteral(value) => Ok(Value::Str(value.clone())),
        ExprKind::ArrayLiteral(elements) => eval_array_literal(interpreter, id, elements),
        ExprKind::Identifier(name) => interpreter
            .memory
            .read(name)
            .cloned()
            .map_err(|error| interpreter.expr_error(error, id)),
        ExprKind::Indexed { base, indices } => {
            let base = eval_expression(interpreter, *base)?;
            let selectors = eval_selectors(interpreter, indices)?;
            read_indexed(base, &selectors).map_err(|error| interpreter.expr_error(error, id))
        }
        ExprKind::NumberBinaryOp { left, op, right } => {
            let left = eval_expression(interpreter, *left)?;
            let right = eval_expression(interpreter, *right)?;
            linear(*op, &left, &right).map_err(|error| interpreter.expr_error(error, id))
        }
        ExprKind::MatrixBinaryOp { left, op, right } => {
            let left = eval_expression(interpreter, *left)?;
            let right = eval_expression(interpreter, *right)?;
            arithmetic(*op, &left, &right).map_err(|error| interpreter.expr_error(error, id))
        }
        ExprKind::BooleanOp { left, op, right } => {
            let left = eval_expression(interpreter, *left)?;
            let right = eval_expression(interpreter, *right)?;
            compare(*op, &left, &right).map_err(|error| interpreter.expr_error(error, id))
        }
        ExprKind::UnaryMinus(value) => {
            let value = eval_expression(interpreter, *value)?;
            negate(&value).map_err(|error| interpreter.expr_error(error, id))
        }
        ExprKind::Transpose(value) => match eval_expression(interpreter, *value)? {
            Value::Matrix(matrix) => Ok(Value::Matrix(matrix.transpose())),
            scalar @ (Value::Int(_) | Value::Float(_)) => Ok(scalar),
            other => Err(interpreter.expr_error(
                ErrorImpl::UnsupportedUnary {
                    operator: String::from("'"),
                    operand: other.type_name().to_string(),
                },
                id,
            )),
        },
        ExprKind::MatrixBuiltin { name, args } => eval_builtin(interpreter, id, *name, args),
        ExprKind::Range { .. } => Err(interpreter.expr_error(
            ErrorImpl::InvalidIndex {
                message: String::from("a range can only index or drive a loop"),
            },
            id,
        )),
    }
}

/// Evaluates an expression that must produce an integer.
pub fn eval_int<W: Write>(interpreter: &mut Interpreter<'_, W>, id: ExprId) -> Result<i64, Error> {
    match eval_expression(interpreter, id)? {
        Value::Int(value) => Ok(value),
        other => Err(interpreter.expr_error(
            ErrorImpl::InvalidIndex {
                message: format!("expected an integer, found {}", other.type_name()),
            },
            id,
        )),
    }
}

pub fn eval_selectors<W: Write>(
    interpreter: &mut Interpreter<'_, W>,
    indices: &[ExprId],
) -> Result<Vec<Selector>, Error> {
    let ast = interpreter.ast;
    let mut selectors = Vec::with_capacity(indices.len());

    for index in indices {
        let selector = match &ast.expr(*index).kind {
            ExprKind::Range { start, end } => {
                Selector::Span(eval_int(interpreter, *start)?, eval_int(interpreter, *end)?)
            }
            _ => Selector::Point(eval_int(interpreter, *index)?),
        };
        selectors.push(selector);
    }
    Ok(selectors)
}

/// Character positions `[from, to)` selected in a string. A string is a
/// single row, so a leading row index may only be `0`.
pub fn string_selection(selectors: &[Selector], length: usize) -> Result<(usize, usize), ErrorImpl> {
    let selector = match selectors {
        [selector] | [Selector::Point(0), selector] => *selector,
        _ => {
            return Err(ErrorImpl::InvalidIndex {
                message: String::from("indices inconsistent with a string"),
            })
        }
    };
    Ok(selector.resolve(length)?)
}

pub fn matrix_selectors(matrix: &Matrix, selectors: &[Selector]) -> Result<(Selector, Selector), ErrorImpl> {
    match selectors {
        [index] => Ok(matrix.flat_selectors(*index)),
        [rows, cols] => Ok((*rows, *cols)),
        _ => Err(ErrorImpl::InvalidIndex {
            message: format!("{} indices for a two-dimensional array", selectors.len()),
        }),
    }
}

fn read_indexed(base: Value, selectors: &[Selector]) -> Result<Value, ErrorImpl> {
    match base {
        Value::Str(text) => {
            let (from, to) = string_selection(selectors, text.chars().count())?;
            Ok(Value::Str(text.chars().skip(from).take(to - from).collect()))
        }
        Value::Matrix(matrix) => {
            let (rows, cols) = matrix_selectors(&matrix, selectors)?;
            let part = matrix.select(rows, cols)?;
            Ok(Value::from_part(part))
        }
        other => Err(ErrorImpl::InvalidIndex {
            message: format!("{} cannot be indexed", other.type_name()),
        }),
    }
}

/// A flat literal is one row of numbers; a literal of row matrices stacks
/// them.
fn eval_array_literal<W: Write>(
    interpreter: &mut Interpreter<'_, W>,
    id: ExprId,
    elements: &[ExprId],
) -> Result<Value, Error> {
    let mut values = Vec::with_capacity(elements.len());
    for element in elements {
        values.push(eval_expression(interpreter, *element)?);
    }

    let numbers: Option<Vec<Element>> = values.iter().map(Value::as_element).collect();
    if let Some(row) = numbers {
        let integral = row.iter().all(|element| matches!(element, Element::Int(_)));
        let matrix = Matrix::from_rows(vec![row], integral)
            .map_err(|error| interpreter.expr_error(error, id))?;
        return Ok(Value::Matrix(matrix));
    }

    let mut rows = Vec::with_capacity(values.len());
    let mut integral = true;
    for (value, element) in values.iter().zip(elements) {
        match value {
            Value::Matrix(matrix) if matrix.rows() == 1 => {
                rows.push(matrix.row(0));
                integral &= matrix.is_integral();
            }
            other => {
                return Err(interpreter.expr_error(
                    ErrorImpl::ShapeMismatch {
                        message: format!("{} cannot be a matrix row", other.type_name()),
                    },
                    *element,
                ))
            }
        }
    }

    let matrix = Matrix::from_rows(rows, integral)
        .map_err(|error| interpreter.expr_error(error, id))?;
    Ok(Value::Matrix(matrix))
}

fn eval_builtin<W: Write>(
    interpreter: &mut Interpreter<'_, W>,
    id: ExprId,
    name: Builtin,
    args: &[ExprId],
) -> Result<Value, Error> {
    let mut dims = Vec::with_capacity(args.len());
    for arg in args {
        match eval_expression(interpreter, *arg)? {
            Value::Int(value) if value >= 0 => dims.push(value as usize),
            other => {
                return Err(interpreter.expr_error(
                    ErrorImpl::ShapeMismatch {
                        message: format!("{} cannot take {} as a dimension", name, other),
                    },
                    *arg,
                ))
            }
        }
    }

    let (rows, cols) = match dims.as_slice() {
        [size] => (*size, *size),
        [rows, cols] => (*rows, *cols),
        _ => {
            return Err(interpreter.expr_error(
                ErrorImpl::ShapeMismatch {
                    message: format!("{} takes 1 or 2 arguments, got {}", name, dims.len()),
                },
                id,
            ))
        }
    };

    let matrix = match name {
        Builtin::Eye => Matrix::eye(rows, cols),
        Builtin::Zeros => Matrix::zeros(rows, cols),
        Builtin::Ones => Matrix::ones(rows, cols),
    };
    matrix
        .map(Value::Matrix)
        .map_err(|error| interpreter.expr_error(error, id))
}

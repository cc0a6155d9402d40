//! Operator semantics shared by scalars and matrices.
//!
//! Integer operands use checked arithmetic whether they are scalars or
//! matrix elements. Matrices combine element by element, except for the
//! linear `*` between two matrices, which is the matrix product.

use std::fmt::Display;

use crate::{
    ast::expressions::{ArithOp, CompareOp},
    errors::errors::ErrorImpl,
};

use super::{
    matrix::{Element, Matrix},
    value::Value,
};

/// Longest string `repeat` may build, in bytes.
const MAX_STRING_BYTES: usize = isize::MAX as usize;

fn unsupported(operator: impl Display, left: &Value, right: &Value) -> ErrorImpl {
    ErrorImpl::UnsupportedOperation {
        operator: operator.to_string(),
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    }
}

fn int_arith(op: ArithOp, a: i64, b: i64) -> Result<i64, ErrorImpl> {
    let result = match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => a.checked_sub(b),
        ArithOp::Mul => a.checked_mul(b),
        ArithOp::Div => {
            if b == 0 {
                return Err(ErrorImpl::DivisionByZero);
            }
            a.checked_div(b)
        }
    };
    result.ok_or(ErrorImpl::IntegerOverflow)
}

fn float_arith(op: ArithOp, a: f64, b: f64) -> Result<f64, ErrorImpl> {
    match op {
        ArithOp::Add => Ok(a + b),
        ArithOp::Sub => Ok(a - b),
        ArithOp::Mul => Ok(a * b),
        ArithOp::Div if b == 0.0 => Err(ErrorImpl::DivisionByZero),
        ArithOp::Div => Ok(a / b),
    }
}

/// Element operation for matrices. Two integers use the checked scalar
/// rules; once a float is involved IEEE rules apply, including division by
/// zero.
fn element_arith(op: ArithOp, a: Element, b: Element) -> Result<Element, ErrorImpl> {
    match (a, b) {
        (Element::Int(a), Element::Int(b)) => int_arith(op, a, b).map(Element::Int),
        (a, b) => {
            let (a, b) = (a.as_float(), b.as_float());
            let value = match op {
                ArithOp::Add => a + b,
                ArithOp::Sub => a - b,
                ArithOp::Mul => a * b,
                ArithOp::Div => a / b,
            };
            Ok(Element::Float(value))
        }
    }
}

fn repeat(text: &str, count: i64) -> Result<String, ErrorImpl> {
    let count = usize::try_from(count.max(0)).unwrap_or(usize::MAX);
    match text.len().checked_mul(count) {
        Some(bytes) if bytes <= MAX_STRING_BYTES => Ok(text.repeat(count)),
        _ => Err(ErrorImpl::SizeOverflow {
            what: format!("a string of {} bytes repeated {} times", text.len(), count),
        }),
    }
}

fn elementwise(op: ArithOp, left: &Matrix, right: &Matrix) -> Result<Value, ErrorImpl> {
    let result = left.combine(right, op.symbol(), |a, b| element_arith(op, a, b))?;
    Ok(Value::Matrix(result))
}

/// Applies `op` between every element of `matrix` and `scalar`.
fn broadcast(
    op: ArithOp,
    matrix: &Matrix,
    scalar: Element,
    scalar_first: bool,
) -> Result<Value, ErrorImpl> {
    let integral = matrix.is_integral() && matches!(scalar, Element::Int(_));
    let result = matrix.try_map(integral, |element| {
        if scalar_first {
            element_arith(op, scalar, element)
        } else {
            element_arith(op, element, scalar)
        }
    })?;
    Ok(Value::Matrix(result))
}

/// Scalar or elementwise `+ - * /`. A number meeting a matrix is applied
/// to every element.
pub fn arithmetic(op: ArithOp, left: &Value, right: &Value) -> Result<Value, ErrorImpl> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_arith(op, *a, *b).map(Value::Int),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let a = left.as_element().ok_or_else(|| unsupported(op, left, right))?;
            let b = right.as_element().ok_or_else(|| unsupported(op, left, right))?;
            float_arith(op, a.as_float(), b.as_float()).map(Value::Float)
        }
        (Value::Str(a), Value::Str(b)) if op == ArithOp::Add => Ok(Value::Str(format!("{}{}", a, b))),
        (Value::Str(text), Value::Int(count)) | (Value::Int(count), Value::Str(text))
            if op == ArithOp::Mul =>
        {
            repeat(text, *count).map(Value::Str)
        }
        (Value::Matrix(a), Value::Matrix(b)) => elementwise(op, a, b),
        (Value::Matrix(matrix), scalar) => {
            let scalar = scalar.as_element().ok_or_else(|| unsupported(op, left, right))?;
            broadcast(op, matrix, scalar, false)
        }
        (scalar, Value::Matrix(matrix)) => {
            let scalar = scalar.as_element().ok_or_else(|| unsupported(op, left, right))?;
            broadcast(op, matrix, scalar, true)
        }
        _ => Err(unsupported(op, left, right)),
    }
}

/// Linear `+ - * /`: the matrix product for `*` between matrices,
/// [`arithmetic`] otherwise.
pub fn linear(op: ArithOp, left: &Value, right: &Value) -> Result<Value, ErrorImpl> {
    match (op, left, right) {
        (ArithOp::Mul, Value::Matrix(a), Value::Matrix(b)) => Ok(Value::Matrix(a.matmul(b)?)),
        _ => arithmetic(op, left, right),
    }
}

fn holds<T: PartialOrd>(op: CompareOp, a: T, b: T) -> bool {
    match op {
        CompareOp::Less => a < b,
        CompareOp::Greater => a > b,
        CompareOp::LessEquals => a <= b,
        CompareOp::GreaterEquals => a >= b,
        CompareOp::Equals => a == b,
        CompareOp::NotEquals => a != b,
    }
}

pub fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<Value, ErrorImpl> {
    let result = match (left, right) {
        (Value::Int(a), Value::Int(b)) => holds(op, a, b),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let a = left.as_element().ok_or_else(|| unsupported(op, left, right))?;
            let b = right.as_element().ok_or_else(|| unsupported(op, left, right))?;
            holds(op, a.as_float(), b.as_float())
        }
        (Value::Str(a), Value::Str(b)) => holds(op, a, b),
        (Value::Bool(a), Value::Bool(b)) if matches!(op, CompareOp::Equals | CompareOp::NotEquals) => {
            holds(op, a, b)
        }
        _ => return Err(unsupported(op, left, right)),
    };
    Ok(Value::Bool(result))
}

pub fn negate(value: &Value) -> Result<Value, ErrorImpl> {
    match value {
        Value::Int(value) => value
            .checked_neg()
            .map(Value::Int)
            .ok_or(ErrorImpl::IntegerOverflow),
        Value::Float(value) => Ok(Value::Float(-value)),
        Value::Matrix(matrix) => {
            let negated = matrix.try_map(matrix.is_integral(), |element| match element {
                Element::Int(value) => value
                    .checked_neg()
                    .map(Element::Int)
                    .ok_or(ErrorImpl::IntegerOverflow),
                Element::Float(value) => Ok(Element::Float(-value)),
            })?;
            Ok(Value::Matrix(negated))
        }
        other => Err(ErrorImpl::UnsupportedUnary {
            operator: String::from("-"),
            operand: other.type_name().to_string(),
        }),
    }
}

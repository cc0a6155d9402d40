use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A fatal error tied to a source position.
///
/// Lexing and parsing stop at the first `Error`, and so does evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UndefinedVariable { .. } => "UndefinedVariable",
            ErrorImpl::UnsupportedOperation { .. } => "UnsupportedOperation",
            ErrorImpl::UnsupportedUnary { .. } => "UnsupportedUnary",
            ErrorImpl::IndexOutOfBounds { .. } => "IndexOutOfBounds",
            ErrorImpl::InvalidIndex { .. } => "InvalidIndex",
            ErrorImpl::ShapeMismatch { .. } => "ShapeMismatch",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::IntegerOverflow => "IntegerOverflow",
            ErrorImpl::SizeOverflow { .. } => "SizeOverflow",
            ErrorImpl::InvalidCondition { .. } => "InvalidCondition",
            ErrorImpl::Output { .. } => "Output",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UndefinedVariable { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` was never assigned", variable))
            }
            ErrorImpl::UnsupportedOperation {
                operator,
                left,
                right,
            } => ErrorTip::Suggestion(format!(
                "Operation `{}` not supported between {} and {}",
                operator, left, right
            )),
            ErrorImpl::UnsupportedUnary { operator, operand } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to {}",
                operator, operand
            )),
            ErrorImpl::IndexOutOfBounds { index, length } => ErrorTip::Suggestion(format!(
                "Index {} is out of range for length {}",
                index, length
            )),
            ErrorImpl::InvalidIndex { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::ShapeMismatch { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::DivisionByZero => {
                ErrorTip::Suggestion(String::from("Integer division by zero"))
            }
            ErrorImpl::IntegerOverflow => {
                ErrorTip::Suggestion(String::from("Integer arithmetic overflowed"))
            }
            ErrorImpl::SizeOverflow { what } => {
                ErrorTip::Suggestion(format!("{} cannot be allocated", what))
            }
            ErrorImpl::InvalidCondition { found } => ErrorTip::Suggestion(format!(
                "Condition must be a boolean or a number, found {}",
                found
            )),
            ErrorImpl::Output { message } => {
                ErrorTip::Suggestion(format!("Could not write output: {}", message))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.position.line, self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("variable {variable:?} is undefined")]
    UndefinedVariable { variable: String },
    #[error("operation {operator} not supported between {left} and {right}")]
    UnsupportedOperation {
        operator: String,
        left: String,
        right: String,
    },
    #[error("operator {operator} cannot be applied to {operand}")]
    UnsupportedUnary { operator: String, operand: String },
    #[error("index {index} out of range for length {length}")]
    IndexOutOfBounds { index: i64, length: usize },
    #[error("invalid index: {message}")]
    InvalidIndex { message: String },
    #[error("shape mismatch: {message}")]
    ShapeMismatch { message: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("{what} is too large")]
    SizeOverflow { what: String },
    #[error("invalid condition of type {found}")]
    InvalidCondition { found: String },
    #[error("output error: {message}")]
    Output { message: String },
}

/// A static finding reported by the type checker.
///
/// Diagnostics do not stop checking; they are accumulated and the run is
/// refused once the pass is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            line,
            message: message.into(),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ERROR in line {}\n{}", self.line, self.message)
    }
}

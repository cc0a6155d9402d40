use std::fmt::Display;

use super::matrix::{format_float, Element, Matrix, Part};

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Matrix(Matrix),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Matrix(_) => "array",
        }
    }

    /// Truth value when used as a condition. Numbers are true when
    /// non-zero; strings and matrices have none.
    pub fn truthiness(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            Value::Int(value) => Some(*value != 0),
            Value::Float(value) => Some(*value != 0.0),
            Value::Str(_) | Value::Matrix(_) => None,
        }
    }

    /// A matrix element as a scalar value.
    pub fn from_element(element: Element) -> Value {
        match element {
            Element::Int(value) => Value::Int(value),
            Element::Float(value) => Value::Float(value),
        }
    }

    pub fn from_part(part: Part) -> Value {
        match part {
            Part::Scalar(element) => Value::from_element(element),
            Part::Matrix(matrix) => Value::Matrix(matrix),
        }
    }

    /// The number as a matrix element, if this is a number.
    pub fn as_element(&self) -> Option<Element> {
        match self {
            Value::Int(value) => Some(Element::Int(*value)),
            Value::Float(value) => Some(Element::Float(*value)),
            _ => None,
        }
    }

    /// What gets written when this value is assigned into a matrix.
    pub fn as_part(&self) -> Option<Part> {
        match self {
            Value::Matrix(matrix) => Some(Part::Matrix(matrix.clone())),
            other => other.as_element().map(Part::Scalar),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", format_float(*value)),
            Value::Str(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Matrix(matrix) => write!(f, "{}", matrix),
        }
    }
}

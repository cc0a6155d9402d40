//! Tree-walking evaluator.
//!
//! The interpreter runs one checked program. Statements report how control
//! leaves them through [`ControlFlow`]; loops consume `Break` and `Continue`,
//! and `Return` travels up to [`Interpreter::run`]. Runtime errors are fatal
//! and stop evaluation at the failing node.

use std::io::Write;

use crate::{
    ast::ast::{Ast, ExprId},
    errors::errors::{Error, ErrorImpl},
    Span,
};

use super::{memory::MemoryStack, stmt::exec_statement, value::Value};

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Normal,
    Break,
    Continue,
    Return(Vec<Value>),
}

pub struct Interpreter<'a, W: Write> {
    /// The program being run
    pub ast: &'a Ast,
    /// Runtime bindings
    pub memory: MemoryStack,
    /// Destination of `print`
    pub out: W,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(ast: &'a Ast, out: W) -> Self {
        Interpreter {
            ast,
            memory: MemoryStack::new(),
            out,
        }
    }

    /// Runs the top-level statements in order. Returns the arguments of a
    /// top-level `return`, or nothing when the program runs to its end.
    pub fn run(&mut self) -> Result<Vec<Value>, Error> {
        let ast = self.ast;
        for stmt in &ast.body {
            match exec_statement(self, *stmt)? {
                ControlFlow::Normal => {}
                ControlFlow::Return(values) => {
                    tracing::debug!(values = values.len(), "program returned");
                    return Ok(values);
                }
                // Rejected by the checker; a stray signal ends the program
                ControlFlow::Break | ControlFlow::Continue => {
                    tracing::debug!("loop signal outside a loop");
                    return Ok(vec![]);
                }
            }
        }
        Ok(vec![])
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn error(&self, error: impl Into<ErrorImpl>, span: Span) -> Error {
        Error::new(error.into(), span.start)
    }

    pub fn expr_error(&self, error: impl Into<ErrorImpl>, id: ExprId) -> Error {
        self.error(error, self.ast.expr(id).span)
    }

    /// Runs `body` inside a fresh scope that is left again however `body`
    /// finishes.
    pub fn scoped<T>(
        &mut self,
        label: &str,
        body: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.memory.enter(label);
        let result = body(self);
        self.memory.exit();
        result
    }

    pub fn write_line(&mut self, line: &str, span: Span) -> Result<(), Error> {
        writeln!(self.out, "{}", line).map_err(|error| {
            self.error(
                ErrorImpl::Output {
                    message: error.to_string(),
                },
                span,
            )
        })
    }
}

/// Runs a checked program, writing its output to `out`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn run<W: Write>(ast: &Ast, out: W) -> Result<Vec<Value>, Error> {
    let mut interpreter = Interpreter::new(ast, out);
    let result = interpreter.run();
    if let Err(error) = &result {
        tracing::debug!(error = %error, "runtime error");
    }
    result
}

use std::io::Write;

use crate::{
    ast::{
        ast::{ExprId, StmtId},
        expressions::ExprKind,
        statements::{AssignOp, StmtKind},
    },
    errors::errors::{Error, ErrorImpl},
    stack::ensure_sufficient_stack,
};

use super::{
    expr::{eval_expression, eval_int, eval_selectors, matrix_selectors, string_selection},
    interpreter::{ControlFlow, Interpreter},
    matrix::Selector,
    operators::arithmetic,
    value::Value,
};

pub fn exec_statement<W: Write>(
    interpreter: &mut Interpreter<'_, W>,
    id: StmtId,
) -> Result<ControlFlow, Error> {
    ensure_sufficient_stack(|| exec_kind(interpreter, id))
}

fn exec_kind<W: Write>(interpreter: &mut Interpreter<'_, W>, id: StmtId) -> Result<ControlFlow, Error> {
    let ast = interpreter.ast;
    let stmt = ast.stmt(id);

    match &stmt.kind {
        StmtKind::Block(body) => {
            for stmt in body {
                let flow = exec_statement(interpreter, *stmt)?;
                if flow != ControlFlow::Normal {
                    return Ok(flow);
                }
            }
            Ok(ControlFlow::Normal)
        }
        StmtKind::Assignment { target, op, value } => {
            exec_assignment(interpreter, *target, *op, *value)?;
            Ok(ControlFlow::Normal)
        }
        StmtKind::For {
            variable,
            range,
            body,
        } => {
            let (start, end) = match &ast.expr(*range).kind {
                ExprKind::Range { start, end } => {
                    (eval_int(interpreter, *start)?, eval_int(interpreter, *end)?)
                }
                _ => {
                    return Err(interpreter.expr_error(
                        ErrorImpl::InvalidIndex {
                            message: String::from("a for loop needs a range"),
                        },
                        *range,
                    ))
                }
            };
            tracing::trace!(variable = %variable, start, end, "for loop");

            interpreter.scoped("loop", |interpreter| {
                for i in start..end {
                    interpreter.memory.bind(variable, Value::Int(i));
                    match exec_statement(interpreter, *body)? {
                        ControlFlow::Break => break,
                        ControlFlow::Normal | ControlFlow::Continue => {}
                        flow @ ControlFlow::Return(_) => return Ok(flow),
                    }
                }
                Ok(ControlFlow::Normal)
            })
        }
        StmtKind::While { condition, body } => interpreter.scoped("loop", |interpreter| {
            while condition_holds(interpreter, *condition)? {
                match exec_statement(interpreter, *body)? {
                    ControlFlow::Break => break,
                    ControlFlow::Normal | ControlFlow::Continue => {}
                    flow @ ControlFlow::Return(_) => return Ok(flow),
                }
            }
            Ok(ControlFlow::Normal)
        }),
        StmtKind::If {
            condition,
            then_body,
            else_body,
        } => interpreter.scoped("if", |interpreter| {
            if condition_holds(interpreter, *condition)? {
                exec_statement(interpreter, *then_body)
            } else if let Some(else_body) = else_body {
                exec_statement(interpreter, *else_body)
            } else {
                Ok(ControlFlow::Normal)
            }
        }),
        StmtKind::Break => Ok(ControlFlow::Break),
        StmtKind::Continue => Ok(ControlFlow::Continue),
        StmtKind::Return(args) => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_expression(interpreter, *arg)?);
            }
            Ok(ControlFlow::Return(values))
        }
        StmtKind::Print(args) => {
            let mut parts = Vec::with_capacity(args.len());
            for arg in args {
                parts.push(eval_expression(interpreter, *arg)?.to_string());
            }
            interpreter.write_line(&parts.join(", "), stmt.span)?;
            Ok(ControlFlow::Normal)
        }
    }
}

fn condition_holds<W: Write>(
    interpreter: &mut Interpreter<'_, W>,
    condition: ExprId,
) -> Result<bool, Error> {
    let value = eval_expression(interpreter, condition)?;
    value.truthiness().ok_or_else(|| {
        interpreter.expr_error(
            ErrorImpl::InvalidCondition {
                found: value.type_name().to_string(),
            },
            condition,
        )
    })
}

/// Compound assignment reads the target, applies the elementwise operator
/// and stores the result like a plain assignment.
fn exec_assignment<W: Write>(
    interpreter: &mut Interpreter<'_, W>,
    target: ExprId,
    op: AssignOp,
    value: ExprId,
) -> Result<(), Error> {
    let mut value = eval_expression(interpreter, value)?;

    if let AssignOp::Compound(op) = op {
        let current = eval_expression(interpreter, target)?;
        value = arithmetic(op, &current, &value)
            .map_err(|error| interpreter.expr_error(error, target))?;
    }

    assign(interpreter, target, value)
}

fn assign<W: Write>(interpreter: &mut Interpreter<'_, W>, target: ExprId, value: Value) -> Result<(), Error> {
    let ast = interpreter.ast;

    match &ast.expr(target).kind {
        ExprKind::Identifier(name) => {
            interpreter.memory.bind(name, value);
            Ok(())
        }
        ExprKind::Indexed { base, indices } => {
            let ExprKind::Identifier(name) = &ast.expr(*base).kind else {
                return Err(interpreter.expr_error(
                    ErrorImpl::InvalidIndex {
                        message: String::from("only a variable can be assigned into"),
                    },
                    *base,
                ));
            };
            let selectors = eval_selectors(interpreter, indices)?;

            let result = match interpreter.memory.get_mut(name) {
                Some(current) => assign_into(current, &selectors, value),
                None => Err(ErrorImpl::UndefinedVariable {
                    variable: name.clone(),
                }),
            };
            result.map_err(|error| interpreter.expr_error(error, target))
        }
        _ => Err(interpreter.expr_error(
            ErrorImpl::InvalidIndex {
                message: String::from("cannot assign to an expression"),
            },
            target,
        )),
    }
}

/// Writes `value` into the selected part of `current`. A string is
/// replaced by the unaffected prefix, the new text and the unaffected
/// suffix.
fn assign_into(current: &mut Value, selectors: &[Selector], value: Value) -> Result<(), ErrorImpl> {
    let mismatch = |target: &str, value: &Value| ErrorImpl::UnsupportedOperation {
        operator: String::from("="),
        left: target.to_string(),
        right: value.type_name().to_string(),
    };

    match current {
        Value::Str(text) => {
            let replacement = match value {
                Value::Str(replacement) => replacement,
                other => return Err(mismatch("string", &other)),
            };
            let (from, to) = string_selection(selectors, text.chars().count())?;
            let rebuilt: String = text
                .chars()
                .take(from)
                .chain(replacement.chars())
                .chain(text.chars().skip(to))
                .collect();
            *text = rebuilt;
            Ok(())
        }
        Value::Matrix(matrix) => {
            let (rows, cols) = matrix_selectors(matrix, selectors)?;
            let part = value.as_part().ok_or_else(|| mismatch("array", &value))?;
            matrix.assign(rows, cols, &part)?;
            Ok(())
        }
        other => Err(ErrorImpl::InvalidIndex {
            message: format!("{} cannot be indexed", other.type_name()),
        }),
    }
}

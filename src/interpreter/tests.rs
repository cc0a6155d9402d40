//! Unit tests for the evaluator and its runtime support.

use pretty_assertions::assert_eq;

use crate::{
    ast::expressions::{ArithOp, CompareOp},
    errors::errors::{Error, ErrorImpl},
    interpreter::{
        interpreter::run,
        matrix::{Element, Matrix, MatrixError, Part, Selector},
        memory::MemoryStack,
        operators::{arithmetic, compare, linear, negate},
        value::Value,
    },
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

/// Checks and runs `source`, returning what it printed and how it ended.
fn run_source(source: &str) -> (String, Result<Vec<Value>, Error>) {
    let ast = parse(tokenize(source).unwrap()).unwrap();
    let outcome = type_check(&ast);
    assert!(!outcome.has_error(), "{:?}", outcome.diagnostics);

    let mut out = Vec::new();
    let result = run(&ast, &mut out);
    (String::from_utf8(out).unwrap(), result)
}

fn output_of(source: &str) -> String {
    let (output, result) = run_source(source);
    assert!(result.is_ok(), "{:?}", result);
    output
}

fn runtime_error(source: &str) -> (String, Error) {
    let (output, result) = run_source(source);
    (output, result.expect_err("program should fail at runtime"))
}

fn int_matrix(rows: Vec<Vec<i64>>) -> Matrix {
    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(Element::Int).collect())
        .collect();
    Matrix::from_rows(rows, true).unwrap()
}

fn float_matrix(rows: Vec<Vec<f64>>) -> Matrix {
    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(Element::Float).collect())
        .collect();
    Matrix::from_rows(rows, false).unwrap()
}

#[test]
fn test_matrix_from_rows_rejects_ragged_rows() {
    assert_eq!(
        Matrix::from_rows(
            vec![
                vec![Element::Int(1), Element::Int(2)],
                vec![Element::Int(3)]
            ],
            true
        ),
        Err(MatrixError::RaggedRows {
            expected: 2,
            found: 1
        })
    );
}

#[test]
fn test_matrix_builders() {
    let eye = Matrix::eye(2, 3).unwrap();
    assert_eq!(eye.to_string(), "[[1, 0, 0], [0, 1, 0]]");
    assert!(eye.is_integral());
    assert_eq!(Matrix::zeros(1, 2).unwrap().to_string(), "[[0, 0]]");
    assert_eq!(Matrix::ones(2, 1).unwrap().shape(), "2x1");
    assert_eq!(Matrix::zeros(0, 3).unwrap().to_string(), "[]");
}

#[test]
fn test_matrix_transpose_and_product() {
    let a = int_matrix(vec![vec![1, 2, 3], vec![4, 5, 6]]);
    let t = a.transpose();

    assert_eq!(t.to_string(), "[[1, 4], [2, 5], [3, 6]]");
    assert_eq!(a.matmul(&t).unwrap().to_string(), "[[14, 32], [32, 77]]");
    assert_eq!(
        a.matmul(&a),
        Err(MatrixError::ShapeMismatch {
            op: String::from("*"),
            left: String::from("2x3"),
            right: String::from("2x3"),
        })
    );
}

#[test]
fn test_selector_resolution() {
    assert_eq!(Selector::Point(2).resolve(3), Ok((2, 3)));
    assert_eq!(Selector::Span(2, 5).resolve(6), Ok((2, 5)));
    assert_eq!(Selector::Span(1, 1).resolve(1), Ok((1, 1)));
    assert_eq!(
        Selector::Point(3).resolve(3),
        Err(MatrixError::OutOfBounds {
            index: 3,
            length: 3
        })
    );
    assert_eq!(
        Selector::Span(0, 4).resolve(3),
        Err(MatrixError::OutOfBounds {
            index: 4,
            length: 3
        })
    );
    assert_eq!(
        Selector::Span(2, 1).resolve(3),
        Err(MatrixError::ReversedRange { start: 2, end: 1 })
    );
}

#[test]
fn test_matrix_selection() {
    let a = int_matrix(vec![vec![1, 2, 3], vec![4, 5, 6]]);

    assert_eq!(
        a.select(Selector::Point(1), Selector::Point(2)),
        Ok(Part::Scalar(Element::Int(6)))
    );
    assert_eq!(
        a.select(Selector::Span(0, 2), Selector::Point(1)),
        Ok(Part::Matrix(int_matrix(vec![vec![2], vec![5]])))
    );

    // One index selects a row of a matrix, an element of a row vector
    let (rows, cols) = a.flat_selectors(Selector::Point(1));
    assert_eq!(
        a.select(rows, cols),
        Ok(Part::Matrix(int_matrix(vec![vec![4, 5, 6]])))
    );
    let v = int_matrix(vec![vec![7, 8, 9]]);
    let (rows, cols) = v.flat_selectors(Selector::Point(1));
    assert_eq!(v.select(rows, cols), Ok(Part::Scalar(Element::Int(8))));
}

#[test]
fn test_matrix_assignment() {
    let mut a = Matrix::zeros(2, 2).unwrap();

    a.assign(
        Selector::Point(0),
        Selector::Span(0, 2),
        &Part::Scalar(Element::Float(3.7)),
    )
    .unwrap();
    assert_eq!(a.to_string(), "[[3, 3], [0, 0]]");

    a.assign(
        Selector::Span(0, 2),
        Selector::Point(1),
        &Part::Matrix(int_matrix(vec![vec![8], vec![9]])),
    )
    .unwrap();
    assert_eq!(a.to_string(), "[[3, 8], [0, 9]]");

    assert_eq!(
        a.assign(
            Selector::Span(0, 2),
            Selector::Span(0, 2),
            &Part::Matrix(Matrix::ones(1, 2).unwrap())
        ),
        Err(MatrixError::AssignShape {
            expected: String::from("2x2"),
            found: String::from("1x2"),
        })
    );
}

#[test]
fn test_memory_updates_visible_bindings() {
    let mut memory = MemoryStack::new();
    memory.bind("x", Value::Int(1));

    memory.enter("loop");
    memory.bind("x", Value::Int(2));
    memory.bind("y", Value::Int(3));
    assert_eq!(memory.read("y"), Ok(&Value::Int(3)));
    assert_eq!(memory.exit(), Some(String::from("loop")));

    assert_eq!(memory.read("x"), Ok(&Value::Int(2)));
    assert_eq!(
        memory.read("y"),
        Err(ErrorImpl::UndefinedVariable {
            variable: String::from("y")
        })
    );
    assert_eq!(memory.exit(), None);
    assert_eq!(memory.depth(), 1);
}

#[test]
fn test_scalar_arithmetic() {
    assert_eq!(
        arithmetic(ArithOp::Div, &Value::Int(7), &Value::Int(-2)),
        Ok(Value::Int(-3))
    );
    assert_eq!(
        arithmetic(ArithOp::Add, &Value::Int(1), &Value::Float(0.5)),
        Ok(Value::Float(1.5))
    );
    assert_eq!(
        arithmetic(ArithOp::Div, &Value::Float(1.0), &Value::Int(0)),
        Err(ErrorImpl::DivisionByZero)
    );
    assert_eq!(
        arithmetic(ArithOp::Mul, &Value::Int(i64::MAX), &Value::Int(2)),
        Err(ErrorImpl::IntegerOverflow)
    );
    assert_eq!(
        arithmetic(ArithOp::Mul, &Value::Int(-1), &Value::Str(String::from("ab"))),
        Ok(Value::Str(String::new()))
    );
    assert_eq!(
        arithmetic(ArithOp::Sub, &Value::Str(String::from("a")), &Value::Int(1)),
        Err(ErrorImpl::UnsupportedOperation {
            operator: String::from("-"),
            left: String::from("string"),
            right: String::from("int"),
        })
    );
}

#[test]
fn test_matrix_arithmetic() {
    let a = Value::Matrix(int_matrix(vec![vec![1, 2], vec![3, 4]]));

    assert_eq!(
        linear(ArithOp::Mul, &a, &a).map(|value| value.to_string()),
        Ok(String::from("[[7, 10], [15, 22]]"))
    );
    assert_eq!(
        arithmetic(ArithOp::Mul, &a, &a).map(|value| value.to_string()),
        Ok(String::from("[[1, 4], [9, 16]]"))
    );
    assert_eq!(
        arithmetic(ArithOp::Div, &a, &Value::Float(2.0)).map(|value| value.to_string()),
        Ok(String::from("[[0.5, 1.0], [1.5, 2.0]]"))
    );
    assert_eq!(
        arithmetic(ArithOp::Div, &a, &Value::Int(0)),
        Err(ErrorImpl::DivisionByZero)
    );
    assert_eq!(
        negate(&a).map(|value| value.to_string()),
        Ok(String::from("[[-1, -2], [-3, -4]]"))
    );
}

#[test]
fn test_integer_matrix_arithmetic_is_checked() {
    let max = Value::Matrix(int_matrix(vec![vec![i64::MAX, 1]]));
    let ones = Value::Matrix(int_matrix(vec![vec![1, 1]]));

    assert_eq!(
        arithmetic(ArithOp::Add, &max, &ones),
        Err(ErrorImpl::IntegerOverflow)
    );
    assert_eq!(
        arithmetic(ArithOp::Mul, &Value::Int(2), &max),
        Err(ErrorImpl::IntegerOverflow)
    );
    assert_eq!(
        arithmetic(
            ArithOp::Div,
            &ones,
            &Value::Matrix(int_matrix(vec![vec![1, 0]]))
        ),
        Err(ErrorImpl::DivisionByZero)
    );
    assert_eq!(
        negate(&Value::Matrix(int_matrix(vec![vec![i64::MIN]]))),
        Err(ErrorImpl::IntegerOverflow)
    );
}

#[test]
fn test_integer_matrix_product_is_checked() {
    let a = int_matrix(vec![vec![i64::MAX, 1]]);

    assert_eq!(
        a.matmul(&int_matrix(vec![vec![2], vec![0]])),
        Err(MatrixError::IntegerOverflow)
    );
    // Each product fits, their sum does not
    assert_eq!(
        a.matmul(&int_matrix(vec![vec![1], vec![1]])),
        Err(MatrixError::IntegerOverflow)
    );
    assert_eq!(
        linear(
            ArithOp::Mul,
            &Value::Matrix(a.clone()),
            &Value::Matrix(int_matrix(vec![vec![1], vec![0]]))
        )
        .map(|value| value.to_string()),
        Ok(String::from("[[9223372036854775807]]"))
    );
}

#[test]
fn test_float_matrices_follow_ieee() {
    let a = Value::Matrix(float_matrix(vec![vec![1.0, -1.0]]));

    assert_eq!(
        arithmetic(ArithOp::Div, &a, &Value::Int(0)).map(|value| value.to_string()),
        Ok(String::from("[[inf, -inf]]"))
    );
    assert_eq!(
        linear(
            ArithOp::Mul,
            &a,
            &Value::Matrix(int_matrix(vec![vec![2], vec![3]]))
        )
        .map(|value| value.to_string()),
        Ok(String::from("[[-1.0]]"))
    );
}

#[test]
fn test_large_integers_survive_matrices() {
    let big = 9_007_199_254_740_993;
    let a = int_matrix(vec![vec![big, i64::MIN]]);

    assert_eq!(a.get(0, 0), Some(Element::Int(big)));
    assert_eq!(
        a.select(Selector::Point(0), Selector::Point(1)),
        Ok(Part::Scalar(Element::Int(i64::MIN)))
    );
    assert_eq!(
        a.transpose().to_string(),
        "[[9007199254740993], [-9223372036854775808]]"
    );
}

#[test]
fn test_matrix_size_limits() {
    assert_eq!(
        Matrix::zeros(4_294_967_296, 4_294_967_296),
        Err(MatrixError::TooLarge {
            rows: 4_294_967_296,
            cols: 4_294_967_296
        })
    );
    assert!(Matrix::ones(100_000_000_000, 100_000_000_000).is_err());
    assert!(Matrix::eye(3_037_000_500, 3_037_000_500).is_err());
    assert_eq!(
        ErrorImpl::from(MatrixError::TooLarge { rows: 2, cols: 3 }),
        ErrorImpl::SizeOverflow {
            what: String::from("a 2x3 matrix")
        }
    );
}

#[test]
fn test_string_repeat_size_is_checked() {
    assert_eq!(
        arithmetic(
            ArithOp::Mul,
            &Value::Str(String::from("ab")),
            &Value::Int(i64::MAX)
        ),
        Err(ErrorImpl::SizeOverflow {
            what: String::from("a string of 2 bytes repeated 9223372036854775807 times")
        })
    );
    assert_eq!(
        arithmetic(ArithOp::Mul, &Value::Int(i64::MAX), &Value::Str(String::new())),
        Ok(Value::Str(String::new()))
    );
}

#[test]
fn test_comparisons() {
    assert_eq!(
        compare(CompareOp::Less, &Value::Int(1), &Value::Float(1.5)),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        compare(
            CompareOp::GreaterEquals,
            &Value::Str(String::from("b")),
            &Value::Str(String::from("a"))
        ),
        Ok(Value::Bool(true))
    );
    assert!(compare(CompareOp::Less, &Value::Bool(true), &Value::Bool(false)).is_err());
    assert_eq!(
        negate(&Value::Str(String::from("s"))),
        Err(ErrorImpl::UnsupportedUnary {
            operator: String::from("-"),
            operand: String::from("string"),
        })
    );
}

#[test]
fn test_value_display() {
    assert_eq!(Value::Float(2.0).to_string(), "2.0");
    assert_eq!(Value::Float(0.1).to_string(), "0.1");
    assert_eq!(Value::Bool(false).to_string(), "false");
    assert_eq!(Value::Str(String::from("hi")).to_string(), "hi");
}

#[test]
fn test_for_loop_with_continue() {
    assert_eq!(
        output_of("for i = 0:3 { if (i == 1) { continue; } print i; }"),
        "0\n2\n"
    );
}

#[test]
fn test_for_loop_range_is_half_open() {
    assert_eq!(output_of("for i = 2:5 print i;"), "2\n3\n4\n");
    assert_eq!(output_of("for i = 3:3 print i; print 0;"), "0\n");
}

#[test]
fn test_slice_length() {
    assert_eq!(
        output_of("v = [1, 2, 3, 4, 5, 6]; print v[2:5];"),
        "[[3, 4, 5]]\n"
    );
}

#[test]
fn test_string_slices() {
    assert_eq!(output_of("s = \"hello\"; print s[1:3], s[0, 4];"), "el, o\n");
    assert_eq!(
        output_of("s = \"hello\"; s[1:3] = \"X\"; print s;"),
        "hXlo\n"
    );
}

#[test]
fn test_while_with_break() {
    assert_eq!(
        output_of("i = 0; while (i < 10) { i += 1; if (i == 3) { break; } } print i;"),
        "3\n"
    );
}

#[test]
fn test_break_leaves_innermost_loop_only() {
    assert_eq!(
        output_of("for i = 0:2 { for j = 0:5 { if (j == 1) { break; } print i, j; } }"),
        "0, 0\n1, 0\n"
    );
}

#[test]
fn test_numeric_condition() {
    assert_eq!(
        output_of("x = 3; while (x) { print x; x -= 1; }"),
        "3\n2\n1\n"
    );
}

#[test]
fn test_transpose_and_products() {
    assert_eq!(
        output_of("A = [[1, 2], [3, 4]]; B = A'; print B;"),
        "[[1, 3], [2, 4]]\n"
    );
    assert_eq!(
        output_of("A = [[1, 2], [3, 4]]; B = [[5], [6]]; print A * B;"),
        "[[17], [39]]\n"
    );
    assert_eq!(
        output_of("A = [[1, 2], [3, 4]]; print A .* A, A ./ [[2, 2], [2, 2]];"),
        "[[1, 4], [9, 16]], [[0, 1], [1, 2]]\n"
    );
}

#[test]
fn test_scalar_printing() {
    assert_eq!(
        output_of("print 1.5, 2.0, 7 / 2, 7 / 2.0, -3;"),
        "1.5, 2.0, 3, 3.5, -3\n"
    );
    assert_eq!(
        output_of("print \"ab\" + \"cd\", 3 * \"ab\", \"x\" * 2;"),
        "abcd, ababab, xx\n"
    );
}

#[test]
fn test_matrix_builtins() {
    assert_eq!(
        output_of("print eye(2), zeros(1, 3), ones(2, 1);"),
        "[[1, 0], [0, 1]], [[0, 0, 0]], [[1], [1]]\n"
    );
}

#[test]
fn test_indexed_assignment() {
    assert_eq!(
        output_of(
            "A = zeros(2, 3); A[0, 1] = 5; A[1] = [7, 8, 9]; A[0, 2] = 2.9; print A;"
        ),
        "[[0, 5, 2], [7, 8, 9]]\n"
    );
    assert_eq!(
        output_of("A = ones(2, 2); A[1, 1] += 4; print A;"),
        "[[1, 1], [1, 5]]\n"
    );
}

#[test]
fn test_inner_scope_updates_outer_variable() {
    assert_eq!(
        output_of("x = 1; if (x == 1) { x = 2; y = 3; } print x;"),
        "2\n"
    );
}

#[test]
fn test_top_level_return() {
    let (output, result) = run_source("print 1; return 2, \"a\"; print 3;");

    assert_eq!(output, "1\n");
    assert_eq!(result, Ok(vec![Value::Int(2), Value::Str(String::from("a"))]));
}

#[test]
fn test_return_leaves_loops() {
    let (output, result) = run_source("for i = 0:5 { if (i == 2) { return i; } print i; }");

    assert_eq!(output, "0\n1\n");
    assert_eq!(result, Ok(vec![Value::Int(2)]));
}

#[test]
fn test_runtime_index_error_stops_the_program() {
    let (output, error) =
        runtime_error("print 1;\nA = zeros(2); i = 5; print A[i, 0];\nprint 2;");

    assert_eq!(output, "1\n");
    assert_eq!(error.get_position().line, 2);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::IndexOutOfBounds {
            index: 5,
            length: 2
        }
    );
}

#[test]
fn test_runtime_arithmetic_errors() {
    let (_, error) = runtime_error("a = 0; print 1 / a;");
    assert_eq!(error.get_internal_error(), &ErrorImpl::DivisionByZero);

    let (_, error) = runtime_error("a = 9223372036854775807; print a + 1;");
    assert_eq!(error.get_internal_error(), &ErrorImpl::IntegerOverflow);
}

#[test]
fn test_runtime_shape_mismatch() {
    let (_, error) = runtime_error("n = 2; A = zeros(n, 3); B = ones(n, 3); print A * B;");

    assert_eq!(error.get_error_name(), "ShapeMismatch");
}

#[test]
fn test_matrix_keeps_large_integers() {
    assert_eq!(
        output_of("x = 9007199254740993; A = [x, 1]; print x, A, A[0];"),
        "9007199254740993, [[9007199254740993, 1]], 9007199254740993\n"
    );
}

#[test]
fn test_runtime_matrix_overflow() {
    let (_, error) = runtime_error("A = [9223372036854775807] .+ [1];\nprint A;");
    assert_eq!(error.get_internal_error(), &ErrorImpl::IntegerOverflow);
    assert_eq!(error.get_position().line, 1);

    let (_, error) =
        runtime_error("A = [[9223372036854775807, 1]]; B = [[2], [1]];\nprint A * B;");
    assert_eq!(error.get_internal_error(), &ErrorImpl::IntegerOverflow);
    assert_eq!(error.get_position().line, 2);
}

#[test]
fn test_oversized_values_are_runtime_errors() {
    let (output, error) = runtime_error("print 1;\nA = zeros(4294967296, 4294967296);");
    assert_eq!(output, "1\n");
    assert_eq!(error.get_position().line, 2);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::SizeOverflow {
            what: String::from("a 4294967296x4294967296 matrix")
        }
    );

    let (_, error) = runtime_error("A = ones(100000000000);");
    assert_eq!(error.get_error_name(), "SizeOverflow");

    let (_, error) = runtime_error("A = eye(3037000500);");
    assert_eq!(error.get_error_name(), "SizeOverflow");

    let (_, error) = runtime_error("s = \"ab\" * 9223372036854775807;");
    assert_eq!(error.get_error_name(), "SizeOverflow");
}

#[test]
fn test_unknown_shapes_reach_scalar_and_row_operations() {
    // A row count known only at runtime leaves `A[i]` unknown to the checker
    assert_eq!(
        output_of("n = 2; A = zeros(n, 3); print A[0] + 1, 2 * A[1];"),
        "[[1, 1, 1]], [[0, 0, 0]]\n"
    );
    assert_eq!(
        output_of("m = 1; B = ones(m, 3); print B[1]', B[2] - 0.5;"),
        "1, 0.5\n"
    );
}

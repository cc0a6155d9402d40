//! Unit tests for the arena and annotation types.

use crate::{
    ast::{
        ast::Ast,
        expressions::ExprKind,
        types::{Annotation, Dim, ElemType, Shape, TypeTable, TypeTag},
    },
    Span,
};

#[test]
fn test_arena_ids_are_sequential() {
    let mut ast = Ast::new();
    let a = ast.push_expr(ExprKind::IntLiteral(1), Span::default());
    let b = ast.push_expr(ExprKind::IntLiteral(2), Span::default());

    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(ast.expr(b).kind, ExprKind::IntLiteral(2));
    assert_eq!(ast.expr_count(), 2);
}

#[test]
fn test_type_table_first_write_wins() {
    let mut ast = Ast::new();
    let id = ast.push_expr(ExprKind::IntLiteral(1), Span::default());
    let mut table = TypeTable::with_capacity(ast.expr_count());

    assert!(table.get(id).is_none());
    let first = table.record(id, Annotation::of(TypeTag::Int));
    let second = table.record(id, Annotation::of(TypeTag::Float));

    assert_eq!(first.ty, TypeTag::Int);
    assert_eq!(second.ty, TypeTag::Int);
    assert_eq!(table.get(id).map(|a| a.ty), Some(TypeTag::Int));
    assert_eq!(table.annotated_count(), 1);
}

#[test]
fn test_dim_conflicts_only_when_both_known() {
    assert!(Dim::Known(2).conflicts_with(Dim::Known(3)));
    assert!(!Dim::Known(2).conflicts_with(Dim::Known(2)));
    assert!(!Dim::Known(2).conflicts_with(Dim::Unknown));
    assert!(!Dim::Unknown.conflicts_with(Dim::Unknown));
    assert_eq!(Dim::Unknown.or(Dim::Known(4)), Dim::Known(4));
}

#[test]
fn test_tainted_array_displays_as_array() {
    assert_eq!(TypeTag::TaintedArray.to_string(), "array");
    assert!(TypeTag::TaintedArray.is_array_like());
}

#[test]
fn test_shape_display_and_transpose() {
    let shape = Shape::new(Dim::Known(2), Dim::Unknown, ElemType::Int);

    assert_eq!(shape.to_string(), "2x?");
    assert_eq!(shape.transposed().to_string(), "?x2");
}

#[test]
fn test_elem_type_promotion() {
    assert_eq!(ElemType::Int.promote(ElemType::Int), ElemType::Int);
    assert_eq!(ElemType::Int.promote(ElemType::Float), ElemType::Float);
    assert_eq!(ElemType::Unknown.promote(ElemType::Float), ElemType::Unknown);
}

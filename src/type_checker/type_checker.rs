use crate::{
    ast::{
        ast::{Ast, ExprId, StmtId},
        expressions::{ArithOp, Builtin, CompareOp, ExprKind},
        statements::{AssignOp, StmtKind},
        types::{Annotation, Dim, ElemType, Shape, TypeTable, TypeTag},
    },
    errors::errors::Diagnostic,
    stack::ensure_sufficient_stack,
};

use super::{
    symbol_table::SymbolTable,
    type_map::{Key, Operator, Outcome, TYPE_MAP},
};

/// Result of checking a whole program.
#[derive(Debug)]
pub struct CheckOutcome {
    pub types: TypeTable,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckOutcome {
    /// Any diagnostic means the program must not be run.
    pub fn has_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

pub struct TypeChecker<'a> {
    ast: &'a Ast,
    types: TypeTable,
    symbols: SymbolTable,
    diagnostics: Vec<Diagnostic>,
    /// Number of enclosing `for`/`while` bodies
    loop_depth: usize,
}

/// How one index component selects along an axis.
#[derive(Debug, Clone, Copy)]
enum Selection {
    Point(Option<i64>),
    Span(Option<(i64, i64)>),
    Invalid,
}

impl<'a> TypeChecker<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        TypeChecker {
            ast,
            types: TypeTable::with_capacity(ast.expr_count()),
            symbols: SymbolTable::new(),
            diagnostics: vec![],
            loop_depth: 0,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn into_outcome(self) -> CheckOutcome {
        CheckOutcome {
            types: self.types,
            diagnostics: self.diagnostics,
        }
    }

    fn error(&mut self, line: u32, message: String) {
        tracing::debug!(line, %message, "static error");
        self.diagnostics.push(Diagnostic::new(line, message));
    }

    pub fn check_program(&mut self) {
        let ast = self.ast;
        for stmt in &ast.body {
            self.check_stmt(*stmt);
        }
    }

    pub fn check_stmt(&mut self, id: StmtId) {
        ensure_sufficient_stack(|| self.visit_stmt(id))
    }

    /// Annotation of `id`, inferring it on first request only.
    pub fn check_expr(&mut self, id: ExprId) -> Annotation {
        if let Some(annotation) = self.types.get(id) {
            return *annotation;
        }

        let annotation = ensure_sufficient_stack(|| self.infer_expr(id));
        tracing::trace!(expr = %id, ty = %annotation.ty, "annotated");
        self.types.record(id, annotation)
    }

    fn visit_stmt(&mut self, id: StmtId) {
        let ast = self.ast;
        let line = ast.stmt_line(id);

        match &ast.stmt(id).kind {
            StmtKind::Block(body) => {
                for stmt in body {
                    self.check_stmt(*stmt);
                }
            }
            StmtKind::Assignment { target, op, value } => {
                self.check_assignment(line, *target, *op, *value)
            }
            StmtKind::For {
                variable,
                range,
                body,
            } => {
                self.check_expr(*range);
                self.symbols.push_scope("loop");
                self.loop_depth += 1;

                if self.symbols.lookup(variable).is_some() {
                    self.error(
                        line,
                        format!(
                            "{} cannot be an iterating variable, it was already declared",
                            variable
                        ),
                    );
                } else if let ExprKind::Range { start, .. } = ast.expr(*range).kind {
                    self.symbols.declare(variable, start);
                }

                self.check_stmt(*body);
                self.loop_depth -= 1;
                self.symbols.pop_scope();
            }
            StmtKind::While { condition, body } => {
                self.check_condition(*condition);
                self.symbols.push_scope("loop");
                self.loop_depth += 1;
                self.check_stmt(*body);
                self.loop_depth -= 1;
                self.symbols.pop_scope();
            }
            StmtKind::If {
                condition,
                then_body,
                else_body,
            } => {
                self.check_condition(*condition);
                self.symbols.push_scope("if");
                self.check_stmt(*then_body);
                self.symbols.pop_scope();

                if let Some(else_body) = else_body {
                    self.symbols.push_scope("else");
                    self.check_stmt(*else_body);
                    self.symbols.pop_scope();
                }
            }
            StmtKind::Break => {
                if self.loop_depth == 0 {
                    self.error(line, String::from("Cannot break from current scope"));
                }
            }
            StmtKind::Continue => {
                if self.loop_depth == 0 {
                    self.error(line, String::from("Cannot continue in current scope"));
                }
            }
            StmtKind::Return(args) | StmtKind::Print(args) => {
                for arg in args {
                    self.check_expr(*arg);
                }
            }
        }
    }

    fn check_condition(&mut self, condition: ExprId) {
        let annotation = self.check_expr(condition);
        if !matches!(
            annotation.ty,
            TypeTag::Bool | TypeTag::Int | TypeTag::Float | TypeTag::Unknown
        ) {
            self.error(
                self.ast.expr_line(condition),
                format!("{} is not a valid condition type", annotation.ty),
            );
        }
    }

    fn check_assignment(&mut self, line: u32, target: ExprId, op: AssignOp, value: ExprId) {
        let ast = self.ast;
        let value_ty = self.check_expr(value).ty;
        let operator = Operator::Assign(op);

        match &ast.expr(target).kind {
            ExprKind::Identifier(name) => match op {
                AssignOp::Assign => {
                    match TYPE_MAP.lookup(operator, &[Key::Identifier, Key::Type(value_ty)]) {
                        Outcome::Bind | Outcome::Type(_) => self.symbols.declare(name, value),
                        _ => self.error(
                            line,
                            format!(
                                "{} is not a valid type for the right side of assignment",
                                value_ty
                            ),
                        ),
                    }
                }
                AssignOp::Compound(_) => {
                    let Some(producer) = self.symbols.lookup(name) else {
                        self.error(line, format!("{} is not declared", name));
                        return;
                    };
                    let current = self.check_expr(producer).ty;

                    match TYPE_MAP.lookup(
                        operator,
                        &[Key::Identifier, Key::Type(current), Key::Type(value_ty)],
                    ) {
                        Outcome::Type(result) => {
                            // The variable changes type, so its new value
                            // is described by the right-hand side.
                            if result != current {
                                self.symbols.declare(name, value);
                            }
                        }
                        Outcome::Bind => {}
                        _ => self.error(
                            line,
                            format!("Cannot {} assign type {} to {}", op, value_ty, current),
                        ),
                    }
                }
            },
            ExprKind::Indexed { base, .. } => {
                if let ExprKind::StringLiteral(_) = ast.expr(*base).kind {
                    self.error(line, String::from("Assignment to entity not being variable"));
                    return;
                }

                let target_ty = self.check_expr(target);
                let base_annotation = self.check_expr(*base);

                if base_annotation.ty == TypeTag::String && matches!(op, AssignOp::Compound(_)) {
                    self.error(line, String::from("Operational assignment to a substring"));
                    return;
                }

                let outcome = TYPE_MAP.lookup(
                    operator,
                    &[Key::Indexed, Key::Type(target_ty.ty), Key::Type(value_ty)],
                );

                match outcome {
                    Outcome::Bind | Outcome::Type(_) => {
                        if target_ty.ty.is_array_like() && op == AssignOp::Assign {
                            let target_shape = target_ty.shape_or_unknown();
                            let value_shape = self.check_expr(value).shape_or_unknown();
                            if target_shape.rows.conflicts_with(value_shape.rows)
                                || target_shape.cols.conflicts_with(value_shape.cols)
                            {
                                self.error(line, String::from("Inconsistent dimensions of arrays"));
                            }
                        }
                    }
                    Outcome::OpNotSupported => {
                        let destination = if base_annotation.ty.is_array_like() {
                            format!(
                                "array of type {}",
                                base_annotation.shape_or_unknown().elem.as_tag()
                            )
                        } else {
                            target_ty.ty.to_string()
                        };
                        self.error(
                            line,
                            format!("Cannot {} assign type {} to {}", op, value_ty, destination),
                        );
                    }
                    Outcome::RightInvalid => self.error(
                        line,
                        format!(
                            "{} is not a valid type for the right side of assignment",
                            value_ty
                        ),
                    ),
                    Outcome::LeftInvalid => {
                        self.error(line, format!("Cannot assign to {}", target_ty.ty))
                    }
                }
            }
            _ => {
                let target_ty = self.check_expr(target).ty;
                let outcome =
                    TYPE_MAP.lookup(operator, &[Key::Type(target_ty), Key::Type(value_ty)]);
                if outcome == Outcome::LeftInvalid {
                    self.error(line, format!("Cannot assign to {}", target_ty));
                }
            }
        }
    }

    fn infer_expr(&mut self, id: ExprId) -> Annotation {
        let ast = self.ast;
        let line = ast.expr_line(id);

        match &ast.expr(id).kind {
            ExprKind::IntLiteral(_) => Annotation::of(TypeTag::Int),
            ExprKind::FloatLiteral(_) => Annotation::of(TypeTag::Float),
            ExprKind::StringLiteral(_) => Annotation::of(TypeTag::String),
            ExprKind::Identifier(name) => match self.symbols.lookup(name) {
                Some(producer) => self.check_expr(producer),
                None => {
                    self.error(line, format!("{} is not declared", name));
                    Annotation::unknown()
                }
            },
            ExprKind::ArrayLiteral(elements) => self.infer_array_literal(line, elements),
            ExprKind::Indexed { base, indices } => self.infer_indexed(line, *base, indices),
            ExprKind::NumberBinaryOp { left, op, right } => {
                self.infer_number_op(line, *left, *op, *right)
            }
            ExprKind::MatrixBinaryOp { left, op, right } => {
                self.infer_elementwise_op(line, *left, *op, *right)
            }
            ExprKind::BooleanOp { left, op, right } => {
                self.infer_comparison(line, *left, *op, *right)
            }
            ExprKind::UnaryMinus(value) => {
                let annotation = self.check_expr(*value);
                match annotation.ty {
                    TypeTag::Int
                    | TypeTag::Float
                    | TypeTag::Unknown
                    | TypeTag::Array
                    | TypeTag::TaintedArray => annotation,
                    other => {
                        self.error(line, format!("Cannot place unary minus before {}", other));
                        Annotation::unknown()
                    }
                }
            }
            ExprKind::Transpose(value) => {
                let annotation = self.check_expr(*value);
                match annotation.ty {
                    TypeTag::Array | TypeTag::TaintedArray => Annotation {
                        ty: annotation.ty,
                        shape: Some(annotation.shape_or_unknown().transposed()),
                    },
                    TypeTag::Unknown => annotation,
                    other => {
                        self.error(line, format!("Cannot transpose {}", other));
                        Annotation::unknown()
                    }
                }
            }
            ExprKind::MatrixBuiltin { name, args } => self.infer_builtin(line, *name, args),
            ExprKind::Range { start, end } => {
                for (bound, label) in [(*start, "start"), (*end, "end")] {
                    let ty = self.check_expr(bound).ty;
                    if !matches!(ty, TypeTag::Int | TypeTag::Unknown) {
                        self.error(
                            line,
                            format!("{} is not a valid type for a range {}", ty, label),
                        );
                    }
                }
                Annotation::of(TypeTag::Range)
            }
        }
    }

    fn infer_array_literal(&mut self, line: u32, elements: &[ExprId]) -> Annotation {
        let ast = self.ast;
        let annotations: Vec<Annotation> =
            elements.iter().map(|element| self.check_expr(*element)).collect();

        if annotations.is_empty() {
            return Annotation::array(Shape::unknown());
        }

        if !annotations.iter().any(|annotation| annotation.ty.is_array_like()) {
            return self.infer_row_literal(line, &annotations);
        }

        // A matrix: every element is one row
        let too_deep = elements.iter().zip(&annotations).any(|(element, annotation)| {
            let nested_literal = match &ast.expr(*element).kind {
                ExprKind::ArrayLiteral(cells) => cells.iter().any(|cell| {
                    self.types
                        .get(*cell)
                        .is_some_and(|cell| cell.ty.is_array_like())
                }),
                _ => false,
            };
            let multi_row = annotation
                .shape_or_unknown()
                .rows
                .known()
                .is_some_and(|rows| rows > 1);
            nested_literal || multi_row
        });
        if too_deep {
            self.error(line, String::from("Matrix can have maximum 2 dimensions"));
            return Annotation::tainted(Shape::unknown());
        }

        let rows = Dim::Known(elements.len());
        let mut cols = Dim::Unknown;
        let mut elem: Option<ElemType> = None;

        for annotation in &annotations {
            if annotation.ty == TypeTag::Unknown {
                elem = Some(ElemType::Unknown);
                continue;
            }
            if !annotation.ty.is_array_like() {
                self.error(
                    line,
                    format!("Inconsistent types array and {} in the array", annotation.ty),
                );
                return Annotation::tainted(Shape::new(rows, Dim::Unknown, ElemType::Unknown));
            }

            let row = annotation.shape_or_unknown();
            if cols.conflicts_with(row.cols) {
                self.error(
                    line,
                    format!("Inconsistent shapes {} and {} in the array", cols, row.cols),
                );
                return Annotation::tainted(Shape::new(rows, Dim::Unknown, ElemType::Unknown));
            }
            cols = cols.or(row.cols);
            elem = Some(elem.map_or(row.elem, |elem| elem.promote(row.elem)));
        }

        Annotation::array(Shape::new(rows, cols, elem.unwrap_or(ElemType::Unknown)))
    }

    /// A flat literal is a single row of scalars of one type.
    fn infer_row_literal(&mut self, line: u32, annotations: &[Annotation]) -> Annotation {
        let cols = Dim::Known(annotations.len());
        let mut known: Option<TypeTag> = None;
        let mut elem_unknown = false;

        for annotation in annotations {
            match (annotation.ty, known) {
                (TypeTag::Unknown, _) => elem_unknown = true,
                (TypeTag::Int | TypeTag::Float, None) => known = Some(annotation.ty),
                (TypeTag::Int | TypeTag::Float, Some(first)) if first == annotation.ty => {}
                (TypeTag::Int | TypeTag::Float, Some(first)) => {
                    self.error(
                        line,
                        format!("Inconsistent types {} and {} in the array", first, annotation.ty),
                    );
                    return Annotation::tainted(Shape::new(Dim::Known(1), cols, ElemType::Unknown));
                }
                (other, _) => {
                    self.error(line, format!("Array elements must be numbers, found {}", other));
                    return Annotation::tainted(Shape::new(Dim::Known(1), cols, ElemType::Unknown));
                }
            }
        }

        let elem = match known {
            Some(_) if elem_unknown => ElemType::Unknown,
            Some(tag) => ElemType::from_tag(tag),
            None => ElemType::Unknown,
        };
        Annotation::array(Shape::new(Dim::Known(1), cols, elem))
    }

    /// Checks one index component and describes its selection.
    fn check_index(&mut self, line: u32, index: ExprId) -> Selection {
        let ast = self.ast;
        let annotation = self.check_expr(index);

        match (annotation.ty, &ast.expr(index).kind) {
            (TypeTag::Range, ExprKind::Range { start, end }) => {
                match (&ast.expr(*start).kind, &ast.expr(*end).kind) {
                    (ExprKind::IntLiteral(start), ExprKind::IntLiteral(end)) => {
                        Selection::Span(Some((*start, *end)))
                    }
                    _ => Selection::Span(None),
                }
            }
            (TypeTag::Int, ExprKind::IntLiteral(value)) => Selection::Point(Some(*value)),
            (TypeTag::Int | TypeTag::Unknown, _) => Selection::Point(None),
            (other, _) => {
                self.error(line, format!("{} is not a valid array index type", other));
                Selection::Invalid
            }
        }
    }

    /// Size of the selection along an axis of length `bound`, reporting
    /// literal indices that fall outside it.
    fn select_axis(&mut self, line: u32, selection: Selection, bound: Dim, message: &str) -> Option<Dim> {
        match selection {
            Selection::Point(index) => {
                if let (Some(index), Some(bound)) = (index, bound.known()) {
                    if index < 0 || index as usize >= bound {
                        self.error(line, String::from(message));
                    }
                }
                None
            }
            Selection::Span(Some((start, end))) => {
                if let Some(bound) = bound.known() {
                    if start < 0 || end as usize > bound {
                        self.error(line, String::from(message));
                    }
                }
                if end - start <= 0 {
                    self.error(line, String::from("Wrong indexing"));
                    return Some(Dim::Unknown);
                }
                Some(Dim::Known((end - start) as usize))
            }
            Selection::Span(None) | Selection::Invalid => Some(Dim::Unknown),
        }
    }

    fn infer_indexed(&mut self, line: u32, base: ExprId, indices: &[ExprId]) -> Annotation {
        let ast = self.ast;
        let base_annotation = self.check_expr(base);
        let selections: Vec<Selection> =
            indices.iter().map(|index| self.check_index(line, *index)).collect();

        match base_annotation.ty {
            TypeTag::String => {
                let first_is_zero = indices
                    .first()
                    .is_some_and(|first| matches!(ast.expr(*first).kind, ExprKind::IntLiteral(0)));
                if indices.len() > 2 || (indices.len() == 2 && !first_is_zero) {
                    self.error(line, String::from("Indices inconsistent with dimensions"));
                }
                Annotation::of(TypeTag::String)
            }
            TypeTag::Unknown => Annotation::unknown(),
            TypeTag::Array | TypeTag::TaintedArray => {
                let shape = base_annotation.shape_or_unknown();
                let scalar = Annotation::of(shape.elem.as_tag());

                match selections.as_slice() {
                    [rows, cols] => {
                        let rows = self.select_axis(line, *rows, shape.rows, "Row index out of range");
                        let cols = self.select_axis(line, *cols, shape.cols, "Column index out of range");
                        match (rows, cols) {
                            (None, None) => scalar,
                            (rows, cols) => Annotation::array(Shape::new(
                                rows.unwrap_or(Dim::Known(1)),
                                cols.unwrap_or(Dim::Known(1)),
                                shape.elem,
                            )),
                        }
                    }
                    [index] => match shape.rows {
                        // A single row is indexed like a flat vector
                        Dim::Known(1) => {
                            match self.select_axis(line, *index, shape.cols, "Index out of range") {
                                None => scalar,
                                Some(cols) => {
                                    Annotation::array(Shape::new(Dim::Known(1), cols, shape.elem))
                                }
                            }
                        }
                        Dim::Known(_) => {
                            match self.select_axis(line, *index, shape.rows, "Index out of range") {
                                None => Annotation::array(Shape::new(
                                    Dim::Known(1),
                                    shape.cols,
                                    shape.elem,
                                )),
                                Some(rows) => {
                                    Annotation::array(Shape::new(rows, shape.cols, shape.elem))
                                }
                            }
                        }
                        Dim::Unknown => match index {
                            Selection::Span(_) => Annotation::array(Shape::new(
                                Dim::Unknown,
                                Dim::Unknown,
                                shape.elem,
                            )),
                            _ => Annotation::unknown(),
                        },
                    },
                    _ => {
                        self.error(line, String::from("Indices inconsistent with dimensions"));
                        Annotation::unknown()
                    }
                }
            }
            _ => {
                self.error(line, String::from("Subscripted value is neither array nor string"));
                Annotation::unknown()
            }
        }
    }

    fn infer_number_op(&mut self, line: u32, left: ExprId, op: ArithOp, right: ExprId) -> Annotation {
        let lhs = self.check_expr(left);
        let rhs = self.check_expr(right);
        let operator = Operator::Number(op);

        match TYPE_MAP.lookup(operator, &[Key::Type(lhs.ty), Key::Type(rhs.ty)]) {
            Outcome::Type(TypeTag::Array) => {
                let (l, r) = (lhs.shape_or_unknown(), rhs.shape_or_unknown());
                let shape = Shape::new(l.rows, r.cols, l.elem.promote(r.elem));

                if l.cols.conflicts_with(r.rows) {
                    self.error(
                        line,
                        format!(
                            "Inconsistent shape. Cannot {} matrices of shape {} and {}",
                            operator, l, r
                        ),
                    );
                    return Annotation::tainted(shape);
                }
                Annotation::array(shape)
            }
            Outcome::Type(ty) => Annotation::of(ty),
            _ => {
                self.error(
                    line,
                    format!(
                        "Operation {} not supported between {} and {}",
                        operator, lhs.ty, rhs.ty
                    ),
                );
                Annotation::unknown()
            }
        }
    }

    fn infer_elementwise_op(&mut self, line: u32, left: ExprId, op: ArithOp, right: ExprId) -> Annotation {
        let lhs = self.check_expr(left);
        let rhs = self.check_expr(right);
        let operator = Operator::Elementwise(op);

        match TYPE_MAP.lookup(operator, &[Key::Type(lhs.ty), Key::Type(rhs.ty)]) {
            Outcome::Type(TypeTag::Array) => {
                let (l, r) = (lhs.shape_or_unknown(), rhs.shape_or_unknown());
                let elem = l.elem.promote(r.elem);
                let rows_clash = l.rows.conflicts_with(r.rows);
                let cols_clash = l.cols.conflicts_with(r.cols);

                if rows_clash || cols_clash {
                    self.error(
                        line,
                        format!(
                            "Inconsistent shape. Cannot {} matrices of shape {} and {}",
                            operator, l, r
                        ),
                    );
                    let rows = if rows_clash { Dim::Unknown } else { l.rows.or(r.rows) };
                    let cols = if cols_clash { Dim::Unknown } else { l.cols.or(r.cols) };
                    return Annotation::tainted(Shape::new(rows, cols, elem));
                }
                Annotation::array(Shape::new(l.rows.or(r.rows), l.cols.or(r.cols), elem))
            }
            Outcome::Type(ty) => Annotation::of(ty),
            _ => {
                self.error(
                    line,
                    format!(
                        "Operation {} not supported between {} and {}",
                        operator, lhs.ty, rhs.ty
                    ),
                );
                Annotation::unknown()
            }
        }
    }

    fn infer_comparison(&mut self, line: u32, left: ExprId, op: CompareOp, right: ExprId) -> Annotation {
        let lhs = self.check_expr(left);
        let rhs = self.check_expr(right);

        if let Outcome::OpNotSupported =
            TYPE_MAP.lookup(Operator::Compare(op), &[Key::Type(lhs.ty), Key::Type(rhs.ty)])
        {
            self.error(
                line,
                format!("Operator {} not supported between {} and {}", op, lhs.ty, rhs.ty),
            );
        }
        Annotation::of(TypeTag::Bool)
    }

    fn infer_builtin(&mut self, line: u32, name: Builtin, args: &[ExprId]) -> Annotation {
        let ast = self.ast;

        if args.is_empty() || args.len() > 2 {
            for arg in args {
                self.check_expr(*arg);
            }
            self.error(
                line,
                format!("Matrix function {} takes 1 or 2 arguments, got {}", name, args.len()),
            );
            return Annotation::array(Shape::new(Dim::Unknown, Dim::Unknown, ElemType::Int));
        }

        let mut dims = vec![];
        for arg in args {
            let annotation = self.check_expr(*arg);
            let dim = match (annotation.ty, &ast.expr(*arg).kind) {
                (TypeTag::Int, ExprKind::IntLiteral(value)) if *value >= 0 => {
                    Dim::Known(*value as usize)
                }
                (TypeTag::Int | TypeTag::Unknown, _) => Dim::Unknown,
                (other, _) => {
                    self.error(
                        line,
                        format!("Matrix function {} cannot take {} as parameter", name, other),
                    );
                    Dim::Unknown
                }
            };
            dims.push(dim);
        }

        let rows = dims[0];
        let cols = dims.get(1).copied().unwrap_or(rows);
        Annotation::array(Shape::new(rows, cols, ElemType::Int))
    }
}

/// Checks a whole program and returns its annotations and diagnostics.
#[tracing::instrument(level = "debug", skip_all)]
pub fn type_check(ast: &Ast) -> CheckOutcome {
    let mut checker = TypeChecker::new(ast);
    checker.check_program();

    let outcome = checker.into_outcome();
    tracing::debug!(
        annotated = outcome.types.annotated_count(),
        diagnostics = outcome.diagnostics.len(),
        "type check finished"
    );
    outcome
}

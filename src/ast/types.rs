use std::fmt::Display;

use super::ast::ExprId;

/// Static type of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    Float,
    String,
    /// Result of a comparison
    Bool,
    /// An index or loop range, never a first-class value
    Range,
    Array,
    /// Array produced by an operation whose shapes were known to clash.
    /// Behaves like `Array` for every later check.
    TaintedArray,
    Unknown,
}

impl TypeTag {
    pub fn is_array_like(self) -> bool {
        matches!(self, TypeTag::Array | TypeTag::TaintedArray)
    }

    pub fn is_number(self) -> bool {
        matches!(self, TypeTag::Int | TypeTag::Float)
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::String => "string",
            TypeTag::Bool => "bool",
            TypeTag::Range => "range",
            TypeTag::Array | TypeTag::TaintedArray => "array",
            TypeTag::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// One dimension of an array shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    Known(usize),
    Unknown,
}

impl Dim {
    pub fn known(self) -> Option<usize> {
        match self {
            Dim::Known(n) => Some(n),
            Dim::Unknown => None,
        }
    }

    /// Only two known, different sizes clash.
    pub fn conflicts_with(self, other: Dim) -> bool {
        matches!((self, other), (Dim::Known(a), Dim::Known(b)) if a != b)
    }

    /// Whichever side is known, preferring `self`.
    pub fn or(self, other: Dim) -> Dim {
        match self {
            Dim::Known(_) => self,
            Dim::Unknown => other,
        }
    }
}

impl Display for Dim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dim::Known(n) => write!(f, "{}", n),
            Dim::Unknown => write!(f, "?"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElemType {
    Int,
    Float,
    Unknown,
}

impl ElemType {
    pub fn from_tag(tag: TypeTag) -> ElemType {
        match tag {
            TypeTag::Int => ElemType::Int,
            TypeTag::Float => ElemType::Float,
            _ => ElemType::Unknown,
        }
    }

    pub fn as_tag(self) -> TypeTag {
        match self {
            ElemType::Int => TypeTag::Int,
            ElemType::Float => TypeTag::Float,
            ElemType::Unknown => TypeTag::Unknown,
        }
    }

    /// Element type of an arithmetic result: float wins over int.
    pub fn promote(self, other: ElemType) -> ElemType {
        match (self, other) {
            (ElemType::Int, ElemType::Int) => ElemType::Int,
            (ElemType::Unknown, _) | (_, ElemType::Unknown) => ElemType::Unknown,
            _ => ElemType::Float,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub rows: Dim,
    pub cols: Dim,
    pub elem: ElemType,
}

impl Shape {
    pub fn new(rows: Dim, cols: Dim, elem: ElemType) -> Self {
        Shape { rows, cols, elem }
    }

    pub fn unknown() -> Self {
        Shape::new(Dim::Unknown, Dim::Unknown, ElemType::Unknown)
    }

    pub fn transposed(self) -> Self {
        Shape::new(self.cols, self.rows, self.elem)
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// What the checker inferred for one expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation {
    pub ty: TypeTag,
    /// Present exactly when `ty` is array-like
    pub shape: Option<Shape>,
}

impl Annotation {
    pub fn of(ty: TypeTag) -> Self {
        if ty.is_array_like() {
            Annotation {
                ty,
                shape: Some(Shape::unknown()),
            }
        } else {
            Annotation { ty, shape: None }
        }
    }

    pub fn unknown() -> Self {
        Annotation::of(TypeTag::Unknown)
    }

    pub fn array(shape: Shape) -> Self {
        Annotation {
            ty: TypeTag::Array,
            shape: Some(shape),
        }
    }

    pub fn tainted(shape: Shape) -> Self {
        Annotation {
            ty: TypeTag::TaintedArray,
            shape: Some(shape),
        }
    }

    /// Shape of an array-like annotation, fully unknown otherwise.
    pub fn shape_or_unknown(&self) -> Shape {
        self.shape.unwrap_or_else(Shape::unknown)
    }
}

/// Side table of annotations, indexed by [`ExprId`].
///
/// Entries are written once. A second write for the same id is ignored and
/// the first annotation is returned, which is what makes inference
/// memoized: a node is never annotated twice with different results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTable {
    entries: Vec<Option<Annotation>>,
}

impl TypeTable {
    pub fn with_capacity(expr_count: usize) -> Self {
        TypeTable {
            entries: vec![None; expr_count],
        }
    }

    pub fn get(&self, id: ExprId) -> Option<&Annotation> {
        self.entries.get(id.index()).and_then(Option::as_ref)
    }

    /// Records `annotation` for `id` unless one is already present, and
    /// returns whichever annotation the table holds afterwards.
    pub fn record(&mut self, id: ExprId, annotation: Annotation) -> Annotation {
        if id.index() >= self.entries.len() {
            self.entries.resize(id.index() + 1, None);
        }
        *self.entries[id.index()].get_or_insert(annotation)
    }

    pub fn annotated_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }
}

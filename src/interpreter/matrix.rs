//! Dense two-dimensional numeric arrays.
//!
//! Elements are stored row-major with their real type: a matrix built only
//! from integers holds `i64`, anything else holds `f64`. Integer elements
//! follow the same checked arithmetic as integer scalars, and values written
//! into an integer matrix are truncated. A flat literal is a matrix with a
//! single row; `zeros(n)` and friends are `n`x`n`.

use std::fmt::Display;

use thiserror::Error;

use crate::errors::errors::ErrorImpl;

/// Largest element count whose storage can be allocated.
const MAX_ELEMENTS: usize = isize::MAX as usize / std::mem::size_of::<i64>();

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("cannot {op} matrices of shape {left} and {right}")]
    ShapeMismatch {
        op: String,
        left: String,
        right: String,
    },
    #[error("rows of length {expected} and {found} in one matrix")]
    RaggedRows { expected: usize, found: usize },
    #[error("index {index} out of range for length {length}")]
    OutOfBounds { index: i64, length: usize },
    #[error("range {start}:{end} is reversed")]
    ReversedRange { start: i64, end: i64 },
    #[error("cannot assign a {found} block to a {expected} selection")]
    AssignShape { expected: String, found: String },
    #[error("a {rows}x{cols} matrix is too large")]
    TooLarge { rows: usize, cols: usize },
    #[error("integer overflow")]
    IntegerOverflow,
}

impl From<MatrixError> for ErrorImpl {
    fn from(error: MatrixError) -> Self {
        match &error {
            MatrixError::OutOfBounds { index, length } => ErrorImpl::IndexOutOfBounds {
                index: *index,
                length: *length,
            },
            MatrixError::ReversedRange { .. } => ErrorImpl::InvalidIndex {
                message: error.to_string(),
            },
            MatrixError::TooLarge { rows, cols } => ErrorImpl::SizeOverflow {
                what: format!("a {}x{} matrix", rows, cols),
            },
            MatrixError::IntegerOverflow => ErrorImpl::IntegerOverflow,
            _ => ErrorImpl::ShapeMismatch {
                message: error.to_string(),
            },
        }
    }
}

/// Selection along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Point(i64),
    /// Half-open `[start, end)`
    Span(i64, i64),
}

impl Selector {
    /// Positions `[from, to)` selected along an axis of `length`.
    pub fn resolve(self, length: usize) -> Result<(usize, usize), MatrixError> {
        match self {
            Selector::Point(index) => {
                if index < 0 || index as usize >= length {
                    return Err(MatrixError::OutOfBounds { index, length });
                }
                Ok((index as usize, index as usize + 1))
            }
            Selector::Span(start, end) => {
                if start > end {
                    return Err(MatrixError::ReversedRange { start, end });
                }
                if start < 0 {
                    return Err(MatrixError::OutOfBounds {
                        index: start,
                        length,
                    });
                }
                if end as usize > length {
                    return Err(MatrixError::OutOfBounds { index: end, length });
                }
                Ok((start as usize, end as usize))
            }
        }
    }

    pub fn is_point(self) -> bool {
        matches!(self, Selector::Point(_))
    }
}

/// One matrix cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element {
    Int(i64),
    Float(f64),
}

impl Element {
    pub fn as_float(self) -> f64 {
        match self {
            Element::Int(value) => value as f64,
            Element::Float(value) => value,
        }
    }

    /// Integer part, saturating at the `i64` bounds.
    pub fn truncated(self) -> i64 {
        match self {
            Element::Int(value) => value,
            Element::Float(value) => value.trunc() as i64,
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Int(value) => write!(f, "{}", value),
            Element::Float(value) => write!(f, "{}", format_float(*value)),
        }
    }
}

/// Result of a selection, or the value written into one.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Scalar(Element),
    Matrix(Matrix),
}

#[derive(Debug, Clone, PartialEq)]
enum Elements {
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl Elements {
    fn collect(values: impl IntoIterator<Item = Element>, integral: bool) -> Elements {
        let values = values.into_iter();
        if integral {
            Elements::Int(values.map(Element::truncated).collect())
        } else {
            Elements::Float(values.map(Element::as_float).collect())
        }
    }

    fn len(&self) -> usize {
        match self {
            Elements::Int(data) => data.len(),
            Elements::Float(data) => data.len(),
        }
    }

    fn get(&self, index: usize) -> Element {
        match self {
            Elements::Int(data) => Element::Int(data[index]),
            Elements::Float(data) => Element::Float(data[index]),
        }
    }

    fn set(&mut self, index: usize, value: Element) {
        match self {
            Elements::Int(data) => data[index] = value.truncated(),
            Elements::Float(data) => data[index] = value.as_float(),
        }
    }

    /// The elements at `indices`, in order, with the same storage type.
    fn gather(&self, indices: impl Iterator<Item = usize>) -> Elements {
        match self {
            Elements::Int(data) => Elements::Int(indices.map(|i| data[i]).collect()),
            Elements::Float(data) => Elements::Float(indices.map(|i| data[i]).collect()),
        }
    }
}

fn element_count(rows: usize, cols: usize) -> Result<usize, MatrixError> {
    rows.checked_mul(cols)
        .filter(|count| *count <= MAX_ELEMENTS)
        .ok_or(MatrixError::TooLarge { rows, cols })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Elements,
}

impl Matrix {
    fn filled(rows: usize, cols: usize, value: i64) -> Result<Self, MatrixError> {
        let count = element_count(rows, cols)?;
        Ok(Matrix {
            rows,
            cols,
            data: Elements::Int(vec![value; count]),
        })
    }

    pub fn zeros(rows: usize, cols: usize) -> Result<Self, MatrixError> {
        Matrix::filled(rows, cols, 0)
    }

    pub fn ones(rows: usize, cols: usize) -> Result<Self, MatrixError> {
        Matrix::filled(rows, cols, 1)
    }

    pub fn eye(rows: usize, cols: usize) -> Result<Self, MatrixError> {
        let mut matrix = Matrix::zeros(rows, cols)?;
        for i in 0..rows.min(cols) {
            matrix.data.set(i * cols + i, Element::Int(1));
        }
        Ok(matrix)
    }

    /// Builds a matrix from equally long rows, stored as integers when
    /// `integral` is set.
    pub fn from_rows(rows: Vec<Vec<Element>>, integral: bool) -> Result<Self, MatrixError> {
        let cols = rows.first().map_or(0, Vec::len);

        for row in &rows {
            if row.len() != cols {
                return Err(MatrixError::RaggedRows {
                    expected: cols,
                    found: row.len(),
                });
            }
        }

        Ok(Matrix {
            rows: rows.len(),
            cols,
            data: Elements::collect(rows.into_iter().flatten(), integral),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_integral(&self) -> bool {
        matches!(self.data, Elements::Int(_))
    }

    pub fn shape(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Element> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data.get(row * self.cols + col))
    }

    pub fn row(&self, row: usize) -> Vec<Element> {
        (0..self.cols)
            .map(|col| self.data.get(row * self.cols + col))
            .collect()
    }

    pub fn transpose(&self) -> Matrix {
        let (rows, cols) = (self.rows, self.cols);
        let order = (0..cols).flat_map(move |col| (0..rows).map(move |row| row * cols + col));

        Matrix {
            rows: cols,
            cols: rows,
            data: self.data.gather(order),
        }
    }

    /// Applies `f` to every element. The result holds integers when
    /// `integral` is set.
    pub fn try_map<E>(
        &self,
        integral: bool,
        f: impl Fn(Element) -> Result<Element, E>,
    ) -> Result<Matrix, E> {
        let values = (0..self.data.len())
            .map(|i| f(self.data.get(i)))
            .collect::<Result<Vec<Element>, E>>()?;

        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: Elements::collect(values, integral),
        })
    }

    /// Combines two matrices of the same shape element by element. The
    /// result holds integers when both operands do.
    pub fn combine<E: From<MatrixError>>(
        &self,
        other: &Matrix,
        op: &str,
        f: impl Fn(Element, Element) -> Result<Element, E>,
    ) -> Result<Matrix, E> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MatrixError::ShapeMismatch {
                op: op.to_string(),
                left: self.shape(),
                right: other.shape(),
            }
            .into());
        }

        let values = (0..self.data.len())
            .map(|i| f(self.data.get(i), other.data.get(i)))
            .collect::<Result<Vec<Element>, E>>()?;

        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: Elements::collect(values, self.is_integral() && other.is_integral()),
        })
    }

    /// Matrix product. Integer products are checked for overflow.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        if self.cols != other.rows {
            return Err(MatrixError::ShapeMismatch {
                op: String::from("*"),
                left: self.shape(),
                right: other.shape(),
            });
        }

        let count = element_count(self.rows, other.cols)?;
        let (inner, width) = (self.cols, other.cols);

        let data = match (&self.data, &other.data) {
            (Elements::Int(a), Elements::Int(b)) => {
                let mut data = vec![0i64; count];
                for row in 0..self.rows {
                    for k in 0..inner {
                        let x = a[row * inner + k];
                        for col in 0..width {
                            let product = x
                                .checked_mul(b[k * width + col])
                                .ok_or(MatrixError::IntegerOverflow)?;
                            let cell = &mut data[row * width + col];
                            *cell = cell
                                .checked_add(product)
                                .ok_or(MatrixError::IntegerOverflow)?;
                        }
                    }
                }
                Elements::Int(data)
            }
            _ => {
                let mut data = vec![0.0; count];
                for row in 0..self.rows {
                    for k in 0..inner {
                        let x = self.data.get(row * inner + k).as_float();
                        for col in 0..width {
                            let y = other.data.get(k * width + col).as_float();
                            data[row * width + col] += x * y;
                        }
                    }
                }
                Elements::Float(data)
            }
        };

        Ok(Matrix {
            rows: self.rows,
            cols: other.cols,
            data,
        })
    }

    /// Maps a single index onto both axes: a one-row matrix is indexed like
    /// a flat vector, anything else selects whole rows.
    pub fn flat_selectors(&self, index: Selector) -> (Selector, Selector) {
        if self.rows == 1 {
            (Selector::Point(0), index)
        } else {
            (index, Selector::Span(0, self.cols as i64))
        }
    }

    /// Reads a block. Two points give a scalar; otherwise a point keeps its
    /// axis with length 1.
    pub fn select(&self, rows: Selector, cols: Selector) -> Result<Part, MatrixError> {
        let (row_from, row_to) = rows.resolve(self.rows)?;
        let (col_from, col_to) = cols.resolve(self.cols)?;

        if rows.is_point() && cols.is_point() {
            return Ok(Part::Scalar(self.data.get(row_from * self.cols + col_from)));
        }

        let stride = self.cols;
        let cells = (row_from..row_to)
            .flat_map(move |row| (col_from..col_to).map(move |col| row * stride + col));

        Ok(Part::Matrix(Matrix {
            rows: row_to - row_from,
            cols: col_to - col_from,
            data: self.data.gather(cells),
        }))
    }

    /// Writes a scalar into every selected cell, or a matrix of exactly the
    /// selected shape.
    pub fn assign(&mut self, rows: Selector, cols: Selector, value: &Part) -> Result<(), MatrixError> {
        let (row_from, row_to) = rows.resolve(self.rows)?;
        let (col_from, col_to) = cols.resolve(self.cols)?;
        let (height, width) = (row_to - row_from, col_to - col_from);

        if let Part::Matrix(block) = value {
            if block.rows != height || block.cols != width {
                return Err(MatrixError::AssignShape {
                    expected: format!("{}x{}", height, width),
                    found: block.shape(),
                });
            }
        }

        for row in 0..height {
            for col in 0..width {
                let cell = match value {
                    Part::Scalar(scalar) => *scalar,
                    Part::Matrix(block) => block.data.get(row * width + col),
                };
                self.data
                    .set((row_from + row) * self.cols + col_from + col, cell);
            }
        }
        Ok(())
    }
}

/// Shortest text that reads back as the same float, always with a
/// fractional part or exponent.
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

impl Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for row in 0..self.rows {
            if row > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.data.get(row * self.cols + col))?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

use super::error::{DError, DResult};
use std::fmt;

/// One axis of a [`Shape`]: pinned when the matrix is declared, resolved at
/// runtime, or resolved at runtime up to a declared maximum.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Extent {
    Fixed(usize),
    Dynamic,
    /// Runtime size no larger than the given maximum.
    Bounded(usize),
}

impl Extent {
    #[inline]
    pub fn admits(&self, n: usize) -> bool {
        match *self {
            Extent::Fixed(f) => f == n,
            Extent::Bounded(max) => n <= max,
            Extent::Dynamic => true,
        }
    }

    /// Largest size this axis can ever take, if it is known up front.
    pub fn bound(&self) -> Option<usize> {
        match *self {
            Extent::Fixed(n) | Extent::Bounded(n) => Some(n),
            Extent::Dynamic => None,
        }
    }

    fn violation(&self) -> &'static str {
        match self {
            Extent::Bounded(_) => "exceeds maximum extent",
            _ => "differs from fixed extent",
        }
    }
}

/// Mapping from a logical `(row, col)` to a buffer offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    ColMajor,
    RowMajor,
}

#[derive(Clone, Debug)]
pub struct Shape {
    rows: usize,
    cols: usize,
    row_extent: Extent,
    col_extent: Extent,
}

impl Shape {
    pub fn new(row_extent: Extent, col_extent: Extent, rows: usize, cols: usize) -> DResult<Shape> {
        let s = Shape {
            rows,
            cols,
            row_extent,
            col_extent,
        };
        s.validate(rows, cols)?;
        Ok(s)
    }

    /// Both extents resolved at runtime.
    pub fn dynamic(rows: usize, cols: usize) -> Shape {
        Shape {
            rows,
            cols,
            row_extent: Extent::Dynamic,
            col_extent: Extent::Dynamic,
        }
    }

    /// Both extents pinned to the given sizes.
    pub fn fixed(rows: usize, cols: usize) -> DResult<Shape> {
        Shape::new(Extent::Fixed(rows), Extent::Fixed(cols), rows, cols)
    }

    /// Dynamic on both axes but never larger than `max_rows` x `max_cols`.
    pub fn bounded(max_rows: usize, max_cols: usize, rows: usize, cols: usize) -> DResult<Shape> {
        Shape::new(Extent::Bounded(max_rows), Extent::Bounded(max_cols), rows, cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims2(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn row_extent(&self) -> Extent {
        self.row_extent
    }

    pub fn col_extent(&self) -> Extent {
        self.col_extent
    }

    pub fn elem_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.elem_count() == 0
    }

    /// Element count of the largest shape both extents admit. `None` when
    /// either axis is dynamic.
    pub fn max_elem_count(&self) -> Option<usize> {
        self.row_extent.bound()?.checked_mul(self.col_extent.bound()?)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn is_vector(&self) -> bool {
        self.rows == 1 || self.cols == 1
    }

    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    fn validate(&self, rows: usize, cols: usize) -> DResult<()> {
        if !self.row_extent.admits(rows) {
            return Err(DError::invalid_shape(rows, cols, self.row_extent.violation()));
        }
        if !self.col_extent.admits(cols) {
            return Err(DError::invalid_shape(rows, cols, self.col_extent.violation()));
        }
        match rows.checked_mul(cols) {
            Some(n) if n <= isize::MAX as usize => Ok(()),
            _ => Err(DError::invalid_shape(rows, cols, "element count overflows")),
        }
    }

    /// Same extents, new sizes. Fails when a fixed extent would change or a
    /// bounded one would be exceeded.
    pub(crate) fn reshaped(&self, rows: usize, cols: usize) -> DResult<Shape> {
        self.validate(rows, cols)?;
        Ok(Shape {
            rows,
            cols,
            row_extent: self.row_extent,
            col_extent: self.col_extent,
        })
    }

    pub fn transposed(&self) -> Shape {
        Shape {
            rows: self.cols,
            cols: self.rows,
            row_extent: self.col_extent,
            col_extent: self.row_extent,
        }
    }

    // col-major [r, c] => strides [1, r]; row-major [r, c] => strides [c, 1]
    #[inline]
    pub fn strides(&self, order: Order) -> (usize, usize) {
        match order {
            Order::ColMajor => (1, self.rows),
            Order::RowMajor => (self.cols, 1),
        }
    }

    #[inline]
    pub fn offset(&self, order: Order, row: usize, col: usize) -> usize {
        let (rs, cs) = self.strides(order);
        row * rs + col * cs
    }

    /// Row-major walk over every coordinate.
    pub fn iter(&self) -> ShapeIter {
        ShapeIter {
            rows: self.rows,
            cols: self.cols,
            index: if self.is_empty() { None } else { Some((0, 0)) },
        }
    }
}

impl PartialEq<Shape> for Shape {
    fn eq(&self, other: &Shape) -> bool {
        self.dims2() == other.dims2()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

impl TryFrom<(i64, i64)> for Shape {
    type Error = DError;

    fn try_from((rows, cols): (i64, i64)) -> DResult<Shape> {
        if rows < 0 || cols < 0 {
            return Err(DError::InvalidShape {
                rows,
                cols,
                msg: "negative extent",
            });
        }
        Shape::new(Extent::Dynamic, Extent::Dynamic, rows as usize, cols as usize)
    }
}

pub struct ShapeIter {
    rows: usize,
    cols: usize,
    index: Option<(usize, usize)>,
}

impl Iterator for ShapeIter {
    type Item = (usize, usize);

    #[inline]
    fn next(&mut self) -> Option<(usize, usize)> {
        let cur = self.index?;
        let (mut r, mut c) = cur;
        c += 1;
        if c == self.cols {
            c = 0;
            r += 1;
        }
        self.index = if r == self.rows { None } else { Some((r, c)) };
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strides() {
        let s = Shape::dynamic(2, 3);
        assert_eq!(s.strides(Order::ColMajor), (1, 2));
        assert_eq!(s.strides(Order::RowMajor), (3, 1));
        assert_eq!(s.offset(Order::ColMajor, 1, 2), 1 + 2 * 2);
        assert_eq!(s.offset(Order::RowMajor, 1, 2), 3 + 2);
    }

    #[test]
    fn test_shape_iter() {
        let coords: Vec<_> = Shape::dynamic(2, 2).iter().collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(Shape::dynamic(0, 3).iter().count(), 0);
        assert_eq!(Shape::dynamic(3, 1).iter().count(), 3);
    }

    #[test]
    fn test_fixed_extent() {
        let s = Shape::new(Extent::Fixed(3), Extent::Dynamic, 3, 5).unwrap();
        assert!(s.reshaped(3, 9).is_ok());
        assert!(matches!(s.reshaped(1, 5), Err(DError::InvalidShape { .. })));
        assert!(Shape::new(Extent::Fixed(3), Extent::Dynamic, 1, 5).is_err());

        let t = s.transposed();
        assert_eq!(t.col_extent(), Extent::Fixed(3));
        assert_eq!(t.dims2(), (5, 3));
    }

    #[test]
    fn test_bounded_extent() {
        let s = Shape::bounded(10, 10, 3, 4).unwrap();
        assert_eq!(s.max_elem_count(), Some(100));
        assert!(s.reshaped(10, 10).is_ok());
        assert!(s.reshaped(0, 0).is_ok());
        assert_eq!(
            s.reshaped(11, 2).unwrap_err(),
            DError::InvalidShape {
                rows: 11,
                cols: 2,
                msg: "exceeds maximum extent"
            }
        );
        assert!(Shape::bounded(2, 2, 3, 1).is_err());

        assert_eq!(Shape::fixed(2, 3).unwrap().max_elem_count(), Some(6));
        assert_eq!(Shape::dynamic(2, 3).max_elem_count(), None);
        let mixed = Shape::new(Extent::Bounded(4), Extent::Dynamic, 2, 7).unwrap();
        assert_eq!(mixed.max_elem_count(), None);
        assert_eq!(mixed.transposed().col_extent(), Extent::Bounded(4));
    }

    #[test]
    fn test_signed_entry() {
        assert!(Shape::try_from((2i64, 3i64)).is_ok());
        assert!(matches!(
            Shape::try_from((-1i64, 3i64)),
            Err(DError::InvalidShape { rows: -1, .. })
        ));
        assert!(Shape::try_from((i64::MAX, 4)).is_err());
    }
}

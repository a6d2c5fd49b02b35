#[macro_use]
mod macros;

mod dtype;
mod error;
mod expr;
mod op;
mod reduce;
mod shape;
mod storage;

pub use crate::dtype::{DType, Element, RealElement, Scalar, RANDOM_INT_RANGE, RANDOM_REAL_RANGE};
pub use crate::error::{DError, DResult};
pub use crate::expr::{Expr, NoAlias, Operand};
pub use crate::op::scale_left;
pub use crate::shape::{Extent, Order, Shape, ShapeIter};
pub use crate::storage::{Storage, StorageSlice};
pub use num_complex::{Complex32, Complex64};

use crate::storage::View;
use rand::Rng;
use std::fmt;

/// Dense matrix owning its buffer. The scalar kind and storage order are
/// chosen at construction and never change.
#[derive(Clone)]
pub struct Matrix {
    shape: Shape,
    storage: Storage,
}

impl Matrix {
    pub(crate) fn from_parts(shape: Shape, storage: Storage) -> Matrix {
        debug_assert!(storage.len() == shape.elem_count());
        let mut m = Matrix { shape, storage };
        m.reserve_bound();
        m
    }

    // Bounded and fixed shapes hold their largest admitted size from the start,
    // so growing within the bound never reallocates.
    pub(crate) fn reserve_bound(&mut self) {
        if let Some(n) = self.shape.max_elem_count() {
            self.storage.reserve_total(n);
        }
    }

    /// Zero-filled, column-major, dynamic extents.
    pub fn new(rows: usize, cols: usize, dtype: DType) -> DResult<Matrix> {
        Matrix::with_order(rows, cols, dtype, Order::default())
    }

    /// Same as [`Matrix::new`].
    pub fn zeros(rows: usize, cols: usize, dtype: DType) -> DResult<Matrix> {
        Matrix::new(rows, cols, dtype)
    }

    pub fn with_order(rows: usize, cols: usize, dtype: DType, order: Order) -> DResult<Matrix> {
        let shape = Shape::new(Extent::Dynamic, Extent::Dynamic, rows, cols)?;
        Ok(Matrix::zeros_like_shape(shape, dtype, order))
    }

    /// Both extents pinned: later shape changes to other sizes fail.
    pub fn fixed(rows: usize, cols: usize, dtype: DType) -> DResult<Matrix> {
        let shape = Shape::fixed(rows, cols)?;
        Ok(Matrix::zeros_like_shape(shape, dtype, Order::default()))
    }

    /// Dynamic extents capped at `max_rows` x `max_cols`. The buffer is
    /// allocated for the cap up front.
    pub fn bounded(
        rows: usize,
        cols: usize,
        max_rows: usize,
        max_cols: usize,
        dtype: DType,
        order: Order,
    ) -> DResult<Matrix> {
        let shape = Shape::bounded(max_rows, max_cols, rows, cols)?;
        Ok(Matrix::zeros_like_shape(shape, dtype, order))
    }

    /// Builds a matrix over an arbitrary shape, e.g. one fixed and one
    /// dynamic extent.
    pub fn from_shape(shape: &Shape, dtype: DType, order: Order) -> DResult<Matrix> {
        let shape = shape.reshaped(shape.rows(), shape.cols())?;
        Ok(Matrix::zeros_like_shape(shape, dtype, order))
    }

    fn zeros_like_shape(shape: Shape, dtype: DType, order: Order) -> Matrix {
        let storage = Storage::zeros(dtype, shape.elem_count(), order);
        Matrix::from_parts(shape, storage)
    }

    /// `data` is read in row-major logical order.
    pub fn from_vec<T: Element>(rows: usize, cols: usize, data: Vec<T>) -> DResult<Matrix> {
        let mut m = Matrix::new(rows, cols, T::DTYPE)?;
        if data.len() != m.size() {
            return Err(DError::FillCountMismatch {
                expected: m.size(),
                got: data.len(),
            });
        }
        m.fill_typed(&data);
        Ok(m)
    }

    pub fn from_rows<T: Element, const N: usize>(rows: Vec<[T; N]>) -> Matrix {
        let shape = Shape::dynamic(rows.len(), N);
        let order = Order::default();
        let mut data = vec![T::zero(); shape.elem_count()];
        for (r, row) in rows.iter().enumerate() {
            for (c, x) in row.iter().enumerate() {
                data[shape.offset(order, r, c)] = *x;
            }
        }
        let storage = Storage::from_slice(T::wrap(data), order);
        Matrix::from_parts(shape, storage)
    }

    /// Column vector.
    pub fn from_column<T: Element>(data: Vec<T>) -> Matrix {
        let shape = Shape::dynamic(data.len(), 1);
        Matrix::from_parts(shape, Storage::from_slice(T::wrap(data), Order::default()))
    }

    /// Row vector.
    pub fn from_row<T: Element>(data: Vec<T>) -> Matrix {
        let shape = Shape::dynamic(1, data.len());
        Matrix::from_parts(shape, Storage::from_slice(T::wrap(data), Order::default()))
    }

    pub fn constant(rows: usize, cols: usize, value: impl Into<Scalar>) -> DResult<Matrix> {
        let value = value.into();
        let mut m = Matrix::new(rows, cols, value.dtype())?;
        m.set_constant(value)?;
        Ok(m)
    }

    pub fn identity(n: usize, dtype: DType) -> DResult<Matrix> {
        let mut m = Matrix::new(n, n, dtype)?;
        let one = crate::dtype::one_of(dtype);
        for i in 0..n {
            m.put(i, i, one);
        }
        Ok(m)
    }

    /// Uniform entries, see [`RANDOM_REAL_RANGE`] and [`RANDOM_INT_RANGE`].
    pub fn random(rows: usize, cols: usize, dtype: DType) -> DResult<Matrix> {
        Matrix::random_with(&mut rand::thread_rng(), rows, cols, dtype)
    }

    pub fn random_with<R: Rng + ?Sized>(
        rng: &mut R,
        rows: usize,
        cols: usize,
        dtype: DType,
    ) -> DResult<Matrix> {
        let mut m = Matrix::new(rows, cols, dtype)?;
        m.set_random_with(rng);
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    pub fn cols(&self) -> usize {
        self.shape.cols()
    }

    pub fn size(&self) -> usize {
        self.shape.elem_count()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    pub fn order(&self) -> Order {
        self.storage.order()
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    pub fn is_square(&self) -> bool {
        self.shape.is_square()
    }

    pub fn is_vector(&self) -> bool {
        self.shape.is_vector()
    }

    pub(crate) fn view<T: Element>(&self) -> DResult<View<'_, T>> {
        let data = self.storage.typed::<T>().ok_or(DError::DTypeMismatch {
            op: "view",
            lhs: self.dtype(),
            rhs: T::DTYPE,
        })?;
        Ok(View {
            data,
            shape: &self.shape,
            order: self.order(),
        })
    }

    fn check_index(&self, row: usize, col: usize) -> DResult<usize> {
        if !self.shape.contains(row, col) {
            return Err(DError::IndexOutOfRange {
                row,
                col,
                shape: self.shape.clone(),
            });
        }
        Ok(self.shape.offset(self.order(), row, col))
    }

    pub fn get(&self, row: usize, col: usize) -> DResult<Scalar> {
        self.check_index(row, col)?;
        Ok(self.get_unchecked(row, col))
    }

    pub(crate) fn get_unchecked(&self, row: usize, col: usize) -> Scalar {
        let off = self.shape.offset(self.order(), row, col);
        match self.storage.slice() {
            StorageSlice::I32(v) => Scalar::I32(v[off]),
            StorageSlice::F32(v) => Scalar::F32(v[off]),
            StorageSlice::F64(v) => Scalar::F64(v[off]),
            StorageSlice::C32(v) => Scalar::C32(v[off]),
            StorageSlice::C64(v) => Scalar::C64(v[off]),
        }
    }

    /// Typed read. The requested type must be the matrix's kind.
    pub fn at<T: Element>(&self, row: usize, col: usize) -> DResult<T> {
        let off = self.check_index(row, col)?;
        Ok(self.view::<T>()?.data[off])
    }

    /// Mutable slot of one element.
    pub fn at_mut<T: Element>(&mut self, row: usize, col: usize) -> DResult<&mut T> {
        let off = self.check_index(row, col)?;
        let dtype = self.dtype();
        let data = self.storage.typed_mut::<T>().ok_or(DError::DTypeMismatch {
            op: "at_mut",
            lhs: dtype,
            rhs: T::DTYPE,
        })?;
        Ok(&mut data[off])
    }

    pub fn set(&mut self, row: usize, col: usize, value: impl Into<Scalar>) -> DResult<()> {
        let value = value.into();
        self.check_index(row, col)?;
        self.dtype().check_admits_value("set", value.dtype())?;
        self.put(row, col, value);
        Ok(())
    }

    // Index already validated; the value is converted to the matrix kind.
    pub(crate) fn put(&mut self, row: usize, col: usize, value: Scalar) {
        let off = self.shape.offset(self.order(), row, col);
        match self.storage.slice_mut() {
            StorageSlice::I32(v) => v[off] = value.cast(),
            StorageSlice::F32(v) => v[off] = value.cast(),
            StorageSlice::F64(v) => v[off] = value.cast(),
            StorageSlice::C32(v) => v[off] = value.cast(),
            StorageSlice::C64(v) => v[off] = value.cast(),
        }
    }

    fn fill_typed<T: Element>(&mut self, data: &[T]) {
        let order = self.order();
        let shape = self.shape.clone();
        if let Some(dst) = self.storage.typed_mut::<T>() {
            for ((r, c), x) in shape.iter().zip(data.iter()) {
                dst[shape.offset(order, r, c)] = *x;
            }
        }
    }

    /// Assigns `values` in row-major logical order, whatever the storage
    /// order. Nothing is written when the count is wrong.
    pub fn fill_from<I, S>(&mut self, values: I) -> DResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        let values: Vec<Scalar> = values.into_iter().map(Into::into).collect();
        if values.len() != self.size() {
            return Err(DError::FillCountMismatch {
                expected: self.size(),
                got: values.len(),
            });
        }
        let dtype = self.dtype();
        for v in values.iter() {
            dtype.check_admits_value("fill_from", v.dtype())?;
        }
        let coords: Vec<_> = self.shape.iter().collect();
        for ((r, c), v) in coords.into_iter().zip(values) {
            self.put(r, c, v);
        }
        Ok(())
    }

    pub fn set_zero(&mut self) {
        self.storage.fill_zero();
    }

    pub fn set_constant(&mut self, value: impl Into<Scalar>) -> DResult<()> {
        let value = value.into();
        self.dtype().check_admits_value("set_constant", value.dtype())?;
        let coords: Vec<_> = self.shape.iter().collect();
        for (r, c) in coords {
            self.put(r, c, value);
        }
        Ok(())
    }

    pub fn set_random(&mut self) {
        self.set_random_with(&mut rand::thread_rng());
    }

    pub fn set_random_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let slice = StorageSlice::random(self.dtype(), self.size(), rng);
        self.storage = Storage::from_slice(slice, self.order());
        self.reserve_bound();
    }

    /// Destructive resize: previous values are not guaranteed to survive.
    pub fn resize(&mut self, rows: usize, cols: usize) -> DResult<()> {
        let shape = self.shape.reshaped(rows, cols)?;
        log::trace!("resize {} -> {}", self.shape, shape);
        self.storage.resize(shape.elem_count());
        self.shape = shape;
        Ok(())
    }

    /// Keeps every element whose coordinate exists in both shapes.
    pub fn conservative_resize(&mut self, rows: usize, cols: usize) -> DResult<()> {
        let shape = self.shape.reshaped(rows, cols)?;
        self.storage.conservative_resize(&self.shape, &shape);
        self.shape = shape;
        self.reserve_bound();
        Ok(())
    }

    /// Explicit kind conversion; complex to real keeps the real part.
    pub fn cast(&self, dtype: DType) -> Matrix {
        if dtype == self.dtype() {
            return self.clone();
        }
        let slice = self.storage.slice().cast(dtype);
        Matrix::from_parts(self.shape.clone(), Storage::from_slice(slice, self.order()))
    }

    /// Same logical content laid out in `order`.
    pub fn to_order(&self, order: Order) -> Matrix {
        if order == self.order() {
            return self.clone();
        }
        let mut out = Matrix::zeros_like_shape(self.shape.clone(), self.dtype(), order);
        for (r, c) in self.shape.iter() {
            out.put(r, c, self.get_unchecked(r, c));
        }
        out
    }

    /// Elements in row-major logical order.
    pub fn to_vec<T: Element>(&self) -> DResult<Vec<T>> {
        Ok(self.view::<T>()?.iter().collect())
    }

    /// Value of a 1x1 matrix.
    pub fn to_scalar(&self) -> DResult<Scalar> {
        if self.shape.dims2() != (1, 1) {
            return Err(DError::shape_mismatch(
                "to_scalar",
                &self.shape,
                &Shape::dynamic(1, 1),
            ));
        }
        Ok(self.get_unchecked(0, 0))
    }

    pub fn scalar<T: Element>(&self) -> DResult<T> {
        self.to_scalar()?;
        self.at::<T>(0, 0)
    }

    pub fn row(&self, i: usize) -> DResult<Matrix> {
        if i >= self.rows() {
            return Err(DError::IndexOutOfRange {
                row: i,
                col: 0,
                shape: self.shape.clone(),
            });
        }
        let mut out = Matrix::zeros_like_shape(Shape::dynamic(1, self.cols()), self.dtype(), self.order());
        for c in 0..self.cols() {
            out.put(0, c, self.get_unchecked(i, c));
        }
        Ok(out)
    }

    pub fn col(&self, j: usize) -> DResult<Matrix> {
        if j >= self.cols() {
            return Err(DError::IndexOutOfRange {
                row: 0,
                col: j,
                shape: self.shape.clone(),
            });
        }
        let mut out = Matrix::zeros_like_shape(Shape::dynamic(self.rows(), 1), self.dtype(), self.order());
        for r in 0..self.rows() {
            out.put(r, 0, self.get_unchecked(r, j));
        }
        Ok(out)
    }

    pub fn format_row(&self, i: usize) -> DResult<String> {
        Ok(join_cells(self.row(i)?.cells(None)))
    }

    pub fn format_col(&self, j: usize) -> DResult<String> {
        Ok(join_cells(self.col(j)?.cells(None)))
    }

    fn cells(&self, precision: Option<usize>) -> Vec<String> {
        self.shape
            .iter()
            .map(|(r, c)| {
                let v = self.get_unchecked(r, c);
                match precision {
                    Some(p) => format!("{:.*}", p, v),
                    None => format!("{}", v),
                }
            })
            .collect()
    }

    /// Elementwise comparison within `tol`; kinds may differ.
    pub fn approx_eq(&self, other: &Matrix, tol: f64) -> bool {
        self.shape == other.shape
            && self.shape.iter().all(|(r, c)| {
                let d = self.get_unchecked(r, c).to_c64() - other.get_unchecked(r, c).to_c64();
                d.norm() <= tol
            })
    }
}

fn join_cells(cells: Vec<String>) -> String {
    cells.join(" ")
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Matrix) -> bool {
        self.dtype() == other.dtype()
            && self.shape == other.shape
            && self
                .shape
                .iter()
                .all(|(r, c)| self.get_unchecked(r, c) == other.get_unchecked(r, c))
    }
}

impl TryFrom<&Matrix> for Scalar {
    type Error = DError;

    fn try_from(m: &Matrix) -> DResult<Scalar> {
        m.to_scalar()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self.cells(f.precision());
        let width = cells.iter().map(|s| s.chars().count()).max().unwrap_or(0);
        let cols = self.cols();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                f.write_str(if i % cols == 0 { "\n" } else { " " })?;
            }
            write!(f, "{:>width$}", cell, width = width)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Matrix {{ shape: {}, dtype: {:?}, order: {:?} }}",
            self.shape,
            self.dtype(),
            self.order()
        )?;
        f.write_str("[")?;
        for r in 0..self.rows() {
            if r > 0 {
                f.write_str(",\n ")?;
            }
            f.write_str("[")?;
            for c in 0..self.cols() {
                if c > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{:?}", self.get_unchecked(r, c))?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fill_row_major_logical() {
        for order in [Order::ColMajor, Order::RowMajor] {
            let mut m = Matrix::with_order(2, 2, DType::F64, order).unwrap();
            m.fill_from([1.0, 2.0, 3.0, 4.0]).unwrap();
            assert_eq!(m.get(0, 0).unwrap(), 1.0);
            assert_eq!(m.get(0, 1).unwrap(), 2.0);
            assert_eq!(m.get(1, 0).unwrap(), 3.0);
            assert_eq!(m.get(1, 1).unwrap(), 4.0);
        }
        let m = Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(m.storage().typed::<i32>().unwrap(), &[1, 3, 2, 4]);
        let m = m.to_order(Order::RowMajor);
        assert_eq!(m.storage().typed::<i32>().unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_fill_count_mismatch() {
        let mut m = Matrix::new(2, 2, DType::I32).unwrap();
        let err = m.fill_from([1, 2, 3]).unwrap_err();
        assert_eq!(err, DError::FillCountMismatch { expected: 4, got: 3 });
        assert_eq!(m.to_vec::<i32>().unwrap(), vec![0; 4]);
    }

    #[test]
    fn test_fill_rejects_complex_into_real() {
        let mut m = Matrix::new(1, 1, DType::F64).unwrap();
        let err = m.fill_from([Complex64::new(1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, DError::DTypeMismatch { .. }));
        // mixed literals narrow into the matrix kind
        let mut v = Matrix::new(3, 1, DType::F64).unwrap();
        v.fill_from([Scalar::I32(1), Scalar::I32(2), Scalar::F64(3.5)]).unwrap();
        assert_eq!(v.to_vec::<f64>().unwrap(), vec![1.0, 2.0, 3.5]);
    }

    #[test]
    fn test_element_access() {
        let mut m = Matrix::new(2, 2, DType::F64).unwrap();
        *m.at_mut::<f64>(0, 0).unwrap() = 1.0;
        *m.at_mut::<f64>(0, 1).unwrap() = 2.0;
        *m.at_mut::<f64>(1, 0).unwrap() = 3.0;
        let v = m.at::<f64>(1, 0).unwrap() + m.at::<f64>(0, 0).unwrap();
        m.set(1, 1, v).unwrap();
        assert_eq!(m.get(1, 1).unwrap(), 4.0);

        assert!(matches!(m.get(2, 0), Err(DError::IndexOutOfRange { row: 2, col: 0, .. })));
        assert!(matches!(m.at_mut::<f64>(0, 2), Err(DError::IndexOutOfRange { .. })));
        assert!(matches!(m.at_mut::<i32>(0, 0), Err(DError::DTypeMismatch { .. })));
    }

    #[test]
    fn test_constant_and_identity() {
        let c = Matrix::constant(3, 3, 5.2).unwrap();
        assert_eq!(c.dtype(), DType::F64);
        assert!(c.to_vec::<f64>().unwrap().iter().all(|&x| x == 5.2));
        let i = Matrix::identity(3, DType::I32).unwrap();
        assert_eq!(i.to_vec::<i32>().unwrap(), vec![1, 0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_random_bounds_and_seed() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = Matrix::random_with(&mut rng, 3, 3, DType::F64).unwrap();
        assert!(a.to_vec::<f64>().unwrap().iter().all(|x| (-1.0..=1.0).contains(x)));
        let mut rng = StdRng::seed_from_u64(42);
        let b = Matrix::random_with(&mut rng, 3, 3, DType::F64).unwrap();
        assert_eq!(a, b);
        let r = Matrix::random(4, 4, DType::I32).unwrap();
        assert!(r.to_vec::<i32>().unwrap().iter().all(|x| (-10..=10).contains(x)));
    }

    #[test]
    fn test_resize_then_conservative_resize() {
        let mut m = Matrix::new(2, 2, DType::F64).unwrap();
        m.resize(2, 3).unwrap();
        assert_eq!((m.rows(), m.cols(), m.size()), (2, 3, 6));
        m.set(0, 0, 7.0).unwrap();
        m.set(0, 1, 8.0).unwrap();
        m.set(1, 2, 9.0).unwrap();
        m.conservative_resize(3, 2).unwrap();
        assert_eq!((m.rows(), m.cols()), (3, 2));
        assert_eq!(m.get(0, 0).unwrap(), 7.0);
        assert_eq!(m.get(0, 1).unwrap(), 8.0);
        assert!(m.get(2, 1).is_ok());
        assert!(m.capacity() >= m.size());
    }

    #[test]
    fn test_conservative_resize_grow_preserves_all() {
        let mut rng = StdRng::seed_from_u64(3);
        for order in [Order::ColMajor, Order::RowMajor] {
            let src = Matrix::random_with(&mut rng, 3, 4, DType::F32).unwrap().to_order(order);
            let mut m = src.clone();
            m.conservative_resize(5, 6).unwrap();
            for (r, c) in src.shape().iter() {
                assert_eq!(m.get(r, c).unwrap(), src.get(r, c).unwrap());
            }
        }
    }

    #[test]
    fn test_resize_sizes() {
        let mut m = Matrix::new(2, 3, DType::F64).unwrap();
        m.resize(3, 5).unwrap();
        m.conservative_resize(5, 4).unwrap();
        assert_eq!((m.rows(), m.cols(), m.size()), (5, 4, 20));
    }

    #[test]
    fn test_fixed_extents() {
        let mut m = Matrix::fixed(3, 2, DType::F64).unwrap();
        assert!(matches!(m.resize(3, 3), Err(DError::InvalidShape { .. })));
        assert!(m.resize(3, 2).is_ok());
        let s = Shape::new(Extent::Fixed(3), Extent::Dynamic, 3, 5).unwrap();
        let mut m = Matrix::from_shape(&s, DType::F64, Order::RowMajor).unwrap();
        assert!(m.conservative_resize(3, 7).is_ok());
        assert!(m.conservative_resize(1, 5).is_err());
    }

    #[test]
    fn test_bounded_extents() {
        let mut m = Matrix::bounded(3, 4, 10, 10, DType::F64, Order::RowMajor).unwrap();
        assert_eq!((m.rows(), m.cols(), m.size()), (3, 4, 12));
        assert!(m.capacity() >= 100);

        m.set(2, 3, 7.0).unwrap();
        m.conservative_resize(5, 5).unwrap();
        assert_eq!(m.get(2, 3).unwrap(), 7.0);
        assert!(m.capacity() >= 100);

        assert!(m.resize(10, 10).is_ok());
        assert_eq!(m.size(), 100);
        assert!(matches!(m.resize(11, 2), Err(DError::InvalidShape { rows: 11, cols: 2, .. })));
        assert!(m.conservative_resize(2, 11).is_err());
        assert_eq!((m.rows(), m.cols()), (10, 10));

        m.set_random_with(&mut StdRng::seed_from_u64(3));
        assert!(m.capacity() >= 100);
        m.assign(Expr::of(&mat![[1.0, 2.0]])).unwrap();
        assert_eq!((m.rows(), m.cols()), (1, 2));
        assert!(m.capacity() >= 100);
        assert!(Matrix::bounded(4, 1, 3, 3, DType::I32, Order::ColMajor).is_err());
    }

    #[test]
    fn test_zeros() {
        let m = Matrix::zeros(2, 3, DType::C32).unwrap();
        assert_eq!(m.dtype(), DType::C32);
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.sum(), Scalar::C32(Complex32::new(0.0, 0.0)));
    }

    #[test]
    fn test_scalar_extraction() {
        let m = Matrix::constant(1, 1, 3.0).unwrap();
        assert_eq!(m.to_scalar().unwrap(), 3.0);
        assert_eq!(m.scalar::<f64>().unwrap(), 3.0);
        let big = Matrix::new(2, 1, DType::F64).unwrap();
        assert!(matches!(Scalar::try_from(&big), Err(DError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_display() {
        let m = mat![[1, 2], [3, 40]];
        assert_eq!(m.to_string(), " 1  2\n 3 40");
        let m = mat![[1.5, 2.0]];
        assert_eq!(format!("{:.2}", m), "1.50 2.00");
        assert_eq!(mat![[1, 2], [3, 4]].format_row(1).unwrap(), "3 4");
        assert_eq!(mat![[1, 2], [3, 4]].format_col(1).unwrap(), "2 4");
        assert!(format!("{:?}", m).contains("shape: 1x2"));
    }

    #[test]
    fn test_empty_matrix() {
        let m = Matrix::new(0, 0, DType::F64).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.to_string(), "");
        assert!(m.get(0, 0).is_err());
    }
}

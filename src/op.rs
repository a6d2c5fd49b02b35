use crate::dtype::{DType, Element, Scalar};
use crate::error::{DError, DResult};
use crate::shape::{Order, Shape};
use crate::storage::{map_slice, Storage, StorageSlice, View};
use crate::Matrix;
use num_complex::{Complex32, Complex64};
use std::borrow::Cow;

fn as_dtype(m: &Matrix, dtype: DType) -> Cow<'_, Matrix> {
    if m.dtype() == dtype {
        Cow::Borrowed(m)
    } else {
        Cow::Owned(m.cast(dtype))
    }
}

/// Both operands converted to their common kind.
pub(crate) fn promote_pair<'a>(
    op: &'static str,
    a: &'a Matrix,
    b: &'a Matrix,
) -> DResult<(Cow<'a, Matrix>, Cow<'a, Matrix>)> {
    let dtype = DType::promote_for(op, a.dtype(), b.dtype())?;
    Ok((as_dtype(a, dtype), as_dtype(b, dtype)))
}

/// `rhs` converted to the kind of an in-place destination.
pub(crate) fn accept_into<'a>(op: &'static str, dst: DType, rhs: &'a Matrix) -> DResult<Cow<'a, Matrix>> {
    dst.check_accepts(op, rhs.dtype())?;
    Ok(as_dtype(rhs, dst))
}

fn check_same_shape(op: &'static str, a: &Matrix, b: &Matrix) -> DResult<()> {
    if a.shape != b.shape {
        return Err(DError::shape_mismatch(op, &a.shape, &b.shape));
    }
    Ok(())
}

pub(crate) fn check_square(op: &'static str, m: &Matrix) -> DResult<()> {
    if !m.is_square() {
        return Err(DError::shape_mismatch(op, &m.shape, &m.shape.transposed()));
    }
    Ok(())
}

fn check_product(a: &Matrix, b: &Matrix) -> DResult<()> {
    if a.cols() != b.rows() {
        return Err(DError::shape_mismatch("multiply", &a.shape, &b.shape));
    }
    Ok(())
}

fn map_elems<T: Element>(v: &[T], f: impl Fn(T) -> T) -> StorageSlice {
    let out: Vec<T> = v.iter().map(|x| f(*x)).collect();
    T::wrap(out)
}

// Unary kernel writing a fresh buffer shaped `dst` in the input's order.
trait Map {
    fn f<T: Element>(&self, inp: View<'_, T>, dst: &Shape) -> Vec<T>;

    fn map(&self, inp: &Matrix, dst: &Shape) -> Matrix {
        let order = inp.order();
        let s = &inp.shape;
        let slice = match inp.storage.slice() {
            StorageSlice::I32(v) => StorageSlice::I32(self.f(View::new(v, s, order), dst)),
            StorageSlice::F32(v) => StorageSlice::F32(self.f(View::new(v, s, order), dst)),
            StorageSlice::F64(v) => StorageSlice::F64(self.f(View::new(v, s, order), dst)),
            StorageSlice::C32(v) => StorageSlice::C32(self.f(View::new(v, s, order), dst)),
            StorageSlice::C64(v) => StorageSlice::C64(self.f(View::new(v, s, order), dst)),
        };
        Matrix::from_parts(dst.clone(), Storage::from_slice(slice, order))
    }
}

// Binary kernel over operands of one kind.
trait Map2 {
    const OP: &'static str;

    fn f<T: Element>(&self, lhs: View<'_, T>, rhs: View<'_, T>, dst: &Shape, order: Order) -> Vec<T>;

    fn map(&self, lhs: &Matrix, rhs: &Matrix, dst: &Shape) -> DResult<Matrix> {
        let order = lhs.order();
        let (ls, lo) = (&lhs.shape, lhs.order());
        let (rs, ro) = (&rhs.shape, rhs.order());
        let slice = match (lhs.storage.slice(), rhs.storage.slice()) {
            (StorageSlice::I32(a), StorageSlice::I32(b)) => {
                StorageSlice::I32(self.f(View::new(a, ls, lo), View::new(b, rs, ro), dst, order))
            }
            (StorageSlice::F32(a), StorageSlice::F32(b)) => {
                StorageSlice::F32(self.f(View::new(a, ls, lo), View::new(b, rs, ro), dst, order))
            }
            (StorageSlice::F64(a), StorageSlice::F64(b)) => {
                StorageSlice::F64(self.f(View::new(a, ls, lo), View::new(b, rs, ro), dst, order))
            }
            (StorageSlice::C32(a), StorageSlice::C32(b)) => {
                StorageSlice::C32(self.f(View::new(a, ls, lo), View::new(b, rs, ro), dst, order))
            }
            (StorageSlice::C64(a), StorageSlice::C64(b)) => {
                StorageSlice::C64(self.f(View::new(a, ls, lo), View::new(b, rs, ro), dst, order))
            }
            (a, b) => {
                return Err(DError::DTypeMismatch {
                    op: Self::OP,
                    lhs: a.dtype(),
                    rhs: b.dtype(),
                })
            }
        };
        Ok(Matrix::from_parts(dst.clone(), Storage::from_slice(slice, order)))
    }
}

// In-place kernel over the destination buffer.
trait MapInPlace {
    fn f<T: Element>(&self, dst: &mut [T], shape: &Shape, order: Order);

    fn map(&self, m: &mut Matrix) {
        let order = m.order();
        let Matrix { shape, storage } = m;
        match storage.slice_mut() {
            StorageSlice::I32(v) => self.f(v, shape, order),
            StorageSlice::F32(v) => self.f(v, shape, order),
            StorageSlice::F64(v) => self.f(v, shape, order),
            StorageSlice::C32(v) => self.f(v, shape, order),
            StorageSlice::C64(v) => self.f(v, shape, order),
        }
    }
}

// In-place kernel reading one operand of the destination's kind.
trait Map2InPlace {
    const OP: &'static str;

    fn f<T: Element>(&self, dst: &mut [T], shape: &Shape, order: Order, rhs: View<'_, T>);

    fn map(&self, m: &mut Matrix, rhs: &Matrix) -> DResult<()> {
        let order = m.order();
        let (rs, ro) = (&rhs.shape, rhs.order());
        let Matrix { shape, storage } = m;
        match (storage.slice_mut(), rhs.storage.slice()) {
            (StorageSlice::I32(d), StorageSlice::I32(b)) => self.f(d, shape, order, View::new(b, rs, ro)),
            (StorageSlice::F32(d), StorageSlice::F32(b)) => self.f(d, shape, order, View::new(b, rs, ro)),
            (StorageSlice::F64(d), StorageSlice::F64(b)) => self.f(d, shape, order, View::new(b, rs, ro)),
            (StorageSlice::C32(d), StorageSlice::C32(b)) => self.f(d, shape, order, View::new(b, rs, ro)),
            (StorageSlice::C64(d), StorageSlice::C64(b)) => self.f(d, shape, order, View::new(b, rs, ro)),
            (d, b) => {
                return Err(DError::DTypeMismatch {
                    op: Self::OP,
                    lhs: d.dtype(),
                    rhs: b.dtype(),
                })
            }
        }
        Ok(())
    }
}

// In-place kernel reading two operands of the destination's kind.
trait Map3InPlace {
    const OP: &'static str;

    fn f<T: Element>(&self, dst: &mut [T], shape: &Shape, order: Order, a: View<'_, T>, b: View<'_, T>);

    fn map(&self, m: &mut Matrix, a: &Matrix, b: &Matrix) -> DResult<()> {
        let order = m.order();
        let av = (&a.shape, a.order());
        let bv = (&b.shape, b.order());
        let Matrix { shape, storage } = m;
        match (storage.slice_mut(), a.storage.slice(), b.storage.slice()) {
            (StorageSlice::I32(d), StorageSlice::I32(x), StorageSlice::I32(y)) => {
                self.f(d, shape, order, View::new(x, av.0, av.1), View::new(y, bv.0, bv.1))
            }
            (StorageSlice::F32(d), StorageSlice::F32(x), StorageSlice::F32(y)) => {
                self.f(d, shape, order, View::new(x, av.0, av.1), View::new(y, bv.0, bv.1))
            }
            (StorageSlice::F64(d), StorageSlice::F64(x), StorageSlice::F64(y)) => {
                self.f(d, shape, order, View::new(x, av.0, av.1), View::new(y, bv.0, bv.1))
            }
            (StorageSlice::C32(d), StorageSlice::C32(x), StorageSlice::C32(y)) => {
                self.f(d, shape, order, View::new(x, av.0, av.1), View::new(y, bv.0, bv.1))
            }
            (StorageSlice::C64(d), StorageSlice::C64(x), StorageSlice::C64(y)) => {
                self.f(d, shape, order, View::new(x, av.0, av.1), View::new(y, bv.0, bv.1))
            }
            (d, x, _) => {
                return Err(DError::DTypeMismatch {
                    op: Self::OP,
                    lhs: d.dtype(),
                    rhs: x.dtype(),
                })
            }
        }
        Ok(())
    }
}

// Binary fold to a scalar.
trait Fold2 {
    const OP: &'static str;

    fn f<T: Element>(&self, lhs: View<'_, T>, rhs: View<'_, T>) -> T;

    fn map(&self, lhs: &Matrix, rhs: &Matrix) -> DResult<Scalar> {
        let (ls, lo) = (&lhs.shape, lhs.order());
        let (rs, ro) = (&rhs.shape, rhs.order());
        Ok(match (lhs.storage.slice(), rhs.storage.slice()) {
            (StorageSlice::I32(a), StorageSlice::I32(b)) => {
                Scalar::I32(self.f(View::new(a, ls, lo), View::new(b, rs, ro)))
            }
            (StorageSlice::F32(a), StorageSlice::F32(b)) => {
                Scalar::F32(self.f(View::new(a, ls, lo), View::new(b, rs, ro)))
            }
            (StorageSlice::F64(a), StorageSlice::F64(b)) => {
                Scalar::F64(self.f(View::new(a, ls, lo), View::new(b, rs, ro)))
            }
            (StorageSlice::C32(a), StorageSlice::C32(b)) => {
                Scalar::C32(self.f(View::new(a, ls, lo), View::new(b, rs, ro)))
            }
            (StorageSlice::C64(a), StorageSlice::C64(b)) => {
                Scalar::C64(self.f(View::new(a, ls, lo), View::new(b, rs, ro)))
            }
            (a, b) => {
                return Err(DError::DTypeMismatch {
                    op: Self::OP,
                    lhs: a.dtype(),
                    rhs: b.dtype(),
                })
            }
        })
    }
}

fn zip_with<T: Element>(
    lhs: View<'_, T>,
    rhs: View<'_, T>,
    dst: &Shape,
    order: Order,
    f: impl Fn(T, T) -> T,
) -> Vec<T> {
    if lhs.order == order && rhs.order == order {
        return lhs.data.iter().zip(rhs.data.iter()).map(|(a, b)| f(*a, *b)).collect();
    }
    let mut out = vec![T::zero(); dst.elem_count()];
    for (r, c) in dst.iter() {
        out[dst.offset(order, r, c)] = f(lhs.at(r, c), rhs.at(r, c));
    }
    out
}

struct Add;

impl Map2 for Add {
    const OP: &'static str = "add";
    fn f<T: Element>(&self, lhs: View<'_, T>, rhs: View<'_, T>, dst: &Shape, order: Order) -> Vec<T> {
        zip_with(lhs, rhs, dst, order, T::wrapping_add)
    }
}

struct Sub;

impl Map2 for Sub {
    const OP: &'static str = "sub";
    fn f<T: Element>(&self, lhs: View<'_, T>, rhs: View<'_, T>, dst: &Shape, order: Order) -> Vec<T> {
        zip_with(lhs, rhs, dst, order, T::wrapping_sub)
    }
}

struct MatMul;

impl Map2 for MatMul {
    const OP: &'static str = "multiply";
    fn f<T: Element>(&self, lhs: View<'_, T>, rhs: View<'_, T>, dst: &Shape, order: Order) -> Vec<T> {
        let (m, n) = dst.dims2();
        let depth = lhs.cols();
        let mut out = vec![T::zero(); m * n];
        for i in 0..m {
            for j in 0..n {
                let mut acc = T::zero();
                for k in 0..depth {
                    acc = acc.wrapping_add(lhs.at(i, k).wrapping_mul(rhs.at(k, j)));
                }
                out[dst.offset(order, i, j)] = acc;
            }
        }
        out
    }
}

struct Cross;

impl Map2 for Cross {
    const OP: &'static str = "cross";
    // Vectors share one linear index in either order.
    fn f<T: Element>(&self, lhs: View<'_, T>, rhs: View<'_, T>, _: &Shape, _: Order) -> Vec<T> {
        let a: Vec<T> = lhs.iter().collect();
        let b: Vec<T> = rhs.iter().collect();
        vec![
            a[1].wrapping_mul(b[2]).wrapping_sub(a[2].wrapping_mul(b[1])),
            a[2].wrapping_mul(b[0]).wrapping_sub(a[0].wrapping_mul(b[2])),
            a[0].wrapping_mul(b[1]).wrapping_sub(a[1].wrapping_mul(b[0])),
        ]
    }
}

struct Transpose {
    conj: bool,
}

impl Map for Transpose {
    fn f<T: Element>(&self, inp: View<'_, T>, dst: &Shape) -> Vec<T> {
        let mut out = vec![T::zero(); dst.elem_count()];
        for (r, c) in inp.shape.iter() {
            let x = inp.at(r, c);
            out[dst.offset(inp.order, c, r)] = if self.conj { x.conj() } else { x };
        }
        out
    }
}

struct Scale {
    k: Scalar,
}

impl Map for Scale {
    fn f<T: Element>(&self, inp: View<'_, T>, _: &Shape) -> Vec<T> {
        let k: T = self.k.cast();
        inp.data.iter().map(|x| x.wrapping_mul(k)).collect()
    }
}

struct DivBy {
    k: Scalar,
}

impl Map for DivBy {
    fn f<T: Element>(&self, inp: View<'_, T>, _: &Shape) -> Vec<T> {
        let k: T = self.k.cast();
        inp.data.iter().map(|x| x.wrapping_div(k)).collect()
    }
}

struct ScaleInPlace {
    k: Scalar,
}

impl MapInPlace for ScaleInPlace {
    fn f<T: Element>(&self, dst: &mut [T], _: &Shape, _: Order) {
        let k: T = self.k.cast();
        dst.iter_mut().for_each(|x| *x = x.wrapping_mul(k));
    }
}

struct DivInPlace {
    k: Scalar,
}

impl MapInPlace for DivInPlace {
    fn f<T: Element>(&self, dst: &mut [T], _: &Shape, _: Order) {
        let k: T = self.k.cast();
        dst.iter_mut().for_each(|x| *x = x.wrapping_div(k));
    }
}

struct ConjInPlace;

impl MapInPlace for ConjInPlace {
    fn f<T: Element>(&self, dst: &mut [T], _: &Shape, _: Order) {
        dst.iter_mut().for_each(|x| *x = x.conj());
    }
}

// Square only: each off-diagonal pair is swapped exactly once.
struct SwapDiagonal {
    conj: bool,
}

impl MapInPlace for SwapDiagonal {
    fn f<T: Element>(&self, dst: &mut [T], shape: &Shape, order: Order) {
        let n = shape.rows();
        for i in 0..n {
            if self.conj {
                let d = shape.offset(order, i, i);
                dst[d] = dst[d].conj();
            }
            for j in (i + 1)..n {
                let a = shape.offset(order, i, j);
                let b = shape.offset(order, j, i);
                dst.swap(a, b);
                if self.conj {
                    dst[a] = dst[a].conj();
                    dst[b] = dst[b].conj();
                }
            }
        }
    }
}

fn zip_in_place<T: Element>(dst: &mut [T], shape: &Shape, order: Order, rhs: View<'_, T>, f: impl Fn(T, T) -> T) {
    if rhs.order == order {
        dst.iter_mut().zip(rhs.data.iter()).for_each(|(a, b)| *a = f(*a, *b));
        return;
    }
    for (r, c) in shape.iter() {
        let o = shape.offset(order, r, c);
        dst[o] = f(dst[o], rhs.at(r, c));
    }
}

struct AddTo;

impl Map2InPlace for AddTo {
    const OP: &'static str = "add_assign";
    fn f<T: Element>(&self, dst: &mut [T], shape: &Shape, order: Order, rhs: View<'_, T>) {
        zip_in_place(dst, shape, order, rhs, T::wrapping_add)
    }
}

struct SubFrom;

impl Map2InPlace for SubFrom {
    const OP: &'static str = "sub_assign";
    fn f<T: Element>(&self, dst: &mut [T], shape: &Shape, order: Order, rhs: View<'_, T>) {
        zip_in_place(dst, shape, order, rhs, T::wrapping_sub)
    }
}

// Partial products go straight into the destination.
struct GemmAcc {
    subtract: bool,
}

impl Map3InPlace for GemmAcc {
    const OP: &'static str = "noalias product";
    fn f<T: Element>(&self, dst: &mut [T], shape: &Shape, order: Order, a: View<'_, T>, b: View<'_, T>) {
        let (m, n) = shape.dims2();
        for i in 0..m {
            for j in 0..n {
                let o = shape.offset(order, i, j);
                for k in 0..a.cols() {
                    let p = a.at(i, k).wrapping_mul(b.at(k, j));
                    dst[o] = if self.subtract {
                        dst[o].wrapping_sub(p)
                    } else {
                        dst[o].wrapping_add(p)
                    };
                }
            }
        }
    }
}

struct Dot;

impl Fold2 for Dot {
    const OP: &'static str = "dot";
    fn f<T: Element>(&self, lhs: View<'_, T>, rhs: View<'_, T>) -> T {
        lhs.iter()
            .zip(rhs.iter())
            .fold(T::zero(), |acc, (a, b)| acc.wrapping_add(a.conj().wrapping_mul(b)))
    }
}

impl Matrix {
    pub fn add(&self, rhs: &Matrix) -> DResult<Matrix> {
        check_same_shape("add", self, rhs)?;
        let (a, b) = promote_pair("add", self, rhs)?;
        Add.map(&a, &b, &self.shape)
    }

    pub fn sub(&self, rhs: &Matrix) -> DResult<Matrix> {
        check_same_shape("sub", self, rhs)?;
        let (a, b) = promote_pair("sub", self, rhs)?;
        Sub.map(&a, &b, &self.shape)
    }

    pub fn neg(&self) -> Matrix {
        let slice = map_slice!(self.storage.slice(), v => map_elems(v, |x| x.wrapping_neg()));
        Matrix::from_parts(self.shape.clone(), Storage::from_slice(slice, self.order()))
    }

    pub fn add_assign(&mut self, rhs: &Matrix) -> DResult<()> {
        check_same_shape("add_assign", self, rhs)?;
        let rhs = accept_into("add_assign", self.dtype(), rhs)?;
        AddTo.map(self, &rhs)
    }

    pub fn sub_assign(&mut self, rhs: &Matrix) -> DResult<()> {
        check_same_shape("sub_assign", self, rhs)?;
        let rhs = accept_into("sub_assign", self.dtype(), rhs)?;
        SubFrom.map(self, &rhs)
    }

    /// Every element times `k`; the result kind is the promoted kind.
    pub fn scale(&self, k: impl Into<Scalar>) -> DResult<Matrix> {
        let k = k.into();
        let dtype = DType::promote_for("scale", self.dtype(), k.dtype())?;
        Ok(Scale { k }.map(&as_dtype(self, dtype), &self.shape))
    }

    pub fn div_scalar(&self, k: impl Into<Scalar>) -> DResult<Matrix> {
        let k = k.into();
        let dtype = DType::promote_for("div", self.dtype(), k.dtype())?;
        if dtype.is_integer() && k.is_zero() {
            return Err(DError::DivisionByZero);
        }
        Ok(DivBy { k }.map(&as_dtype(self, dtype), &self.shape))
    }

    pub fn mul_assign_scalar(&mut self, k: impl Into<Scalar>) -> DResult<()> {
        let k = k.into();
        self.dtype().check_accepts("mul_assign", k.dtype())?;
        ScaleInPlace { k }.map(self);
        Ok(())
    }

    pub fn div_assign_scalar(&mut self, k: impl Into<Scalar>) -> DResult<()> {
        let k = k.into();
        self.dtype().check_accepts("div_assign", k.dtype())?;
        if self.dtype().is_integer() && k.is_zero() {
            return Err(DError::DivisionByZero);
        }
        DivInPlace { k }.map(self);
        Ok(())
    }

    /// Matrix product, accumulated as `sum_k a[i,k] * b[k,j]` with `k`
    /// ascending.
    pub fn multiply(&self, rhs: &Matrix) -> DResult<Matrix> {
        check_product(self, rhs)?;
        let (a, b) = promote_pair("multiply", self, rhs)?;
        MatMul.map(&a, &b, &Shape::dynamic(self.rows(), rhs.cols()))
    }

    /// `self += a * b` (or `-=`) without a temporary for the product. The
    /// borrow checker already keeps `a` and `b` apart from `self`.
    pub(crate) fn gemm_acc(&mut self, a: &Matrix, b: &Matrix, subtract: bool) -> DResult<()> {
        check_product(a, b)?;
        let dst = Shape::dynamic(a.rows(), b.cols());
        if self.shape != dst {
            return Err(DError::shape_mismatch("noalias product", &self.shape, &dst));
        }
        let dtype = DType::promote_for("multiply", a.dtype(), b.dtype())?;
        self.dtype().check_accepts("noalias product", dtype)?;
        let a = as_dtype(a, self.dtype());
        let b = as_dtype(b, self.dtype());
        GemmAcc { subtract }.map(self, &a, &b)
    }

    pub fn transpose(&self) -> Matrix {
        Transpose { conj: false }.map(self, &self.shape.transposed())
    }

    /// Square matrices only.
    pub fn transpose_in_place(&mut self) -> DResult<()> {
        check_square("transpose_in_place", self)?;
        SwapDiagonal { conj: false }.map(self);
        Ok(())
    }

    pub fn conjugate(&self) -> Matrix {
        let slice = map_slice!(self.storage.slice(), v => map_elems(v, |x| x.conj()));
        Matrix::from_parts(self.shape.clone(), Storage::from_slice(slice, self.order()))
    }

    pub fn conjugate_in_place(&mut self) {
        if self.dtype().is_complex() {
            ConjInPlace.map(self);
        }
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Matrix {
        Transpose { conj: true }.map(self, &self.shape.transposed())
    }

    pub fn adjoint_in_place(&mut self) -> DResult<()> {
        check_square("adjoint_in_place", self)?;
        SwapDiagonal { conj: true }.map(self);
        Ok(())
    }

    /// `sum conj(self[i]) * rhs[i]` over two vectors of equal length.
    pub fn dot(&self, rhs: &Matrix) -> DResult<Scalar> {
        if !self.is_vector() || !rhs.is_vector() || self.size() != rhs.size() {
            return Err(DError::shape_mismatch("dot", &self.shape, &rhs.shape));
        }
        let (a, b) = promote_pair("dot", self, rhs)?;
        Dot.map(&a, &b)
    }

    /// 3-vector cross product, shaped like `self`.
    pub fn cross(&self, rhs: &Matrix) -> DResult<Matrix> {
        let is3 = |m: &Matrix| m.is_vector() && m.size() == 3;
        if !is3(self) || !is3(rhs) {
            return Err(DError::shape_mismatch("cross", &self.shape, &rhs.shape));
        }
        let (a, b) = promote_pair("cross", self, rhs)?;
        Cross.map(&a, &b, &self.shape)
    }
}

macro_rules! impl_binary_op {
    ($trt:ident, $mth:ident, $inner:ident) => {
        impl std::ops::$trt<&Matrix> for &Matrix {
            type Output = DResult<Matrix>;
            fn $mth(self, rhs: &Matrix) -> Self::Output {
                Matrix::$inner(self, rhs)
            }
        }

        impl std::ops::$trt<Matrix> for &Matrix {
            type Output = DResult<Matrix>;
            fn $mth(self, rhs: Matrix) -> Self::Output {
                Matrix::$inner(self, &rhs)
            }
        }

        impl std::ops::$trt<&Matrix> for Matrix {
            type Output = DResult<Matrix>;
            fn $mth(self, rhs: &Matrix) -> Self::Output {
                Matrix::$inner(&self, rhs)
            }
        }

        impl std::ops::$trt<Matrix> for Matrix {
            type Output = DResult<Matrix>;
            fn $mth(self, rhs: Matrix) -> Self::Output {
                Matrix::$inner(&self, &rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, add); // +
impl_binary_op!(Sub, sub, sub); // -
impl_binary_op!(Mul, mul, multiply); // *

/// `k * m`. Scalar multiplication commutes, so this is [`Matrix::scale`].
pub fn scale_left(k: impl Into<Scalar>, m: &Matrix) -> DResult<Matrix> {
    m.scale(k)
}

macro_rules! impl_scalar_op {
    ($($t:ty),*) => {
        $(
            impl std::ops::Mul<$t> for &Matrix {
                type Output = DResult<Matrix>;
                fn mul(self, k: $t) -> Self::Output {
                    self.scale(k)
                }
            }

            impl std::ops::Mul<$t> for Matrix {
                type Output = DResult<Matrix>;
                fn mul(self, k: $t) -> Self::Output {
                    self.scale(k)
                }
            }

            impl std::ops::Mul<&Matrix> for $t {
                type Output = DResult<Matrix>;
                fn mul(self, m: &Matrix) -> Self::Output {
                    scale_left(self, m)
                }
            }

            impl std::ops::Mul<Matrix> for $t {
                type Output = DResult<Matrix>;
                fn mul(self, m: Matrix) -> Self::Output {
                    scale_left(self, &m)
                }
            }

            impl std::ops::Div<$t> for &Matrix {
                type Output = DResult<Matrix>;
                fn div(self, k: $t) -> Self::Output {
                    self.div_scalar(k)
                }
            }

            impl std::ops::Div<$t> for Matrix {
                type Output = DResult<Matrix>;
                fn div(self, k: $t) -> Self::Output {
                    self.div_scalar(k)
                }
            }
        )*
    };
}

impl_scalar_op!(i32, f32, f64, Complex32, Complex64, Scalar);

impl std::ops::Neg for &Matrix {
    type Output = Matrix;
    fn neg(self) -> Matrix {
        Matrix::neg(self)
    }
}

impl std::ops::Neg for Matrix {
    type Output = Matrix;
    fn neg(self) -> Matrix {
        Matrix::neg(&self)
    }
}

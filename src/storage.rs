use crate::dtype::{DType, Element};
use crate::shape::{Order, Shape};
use num_complex::{Complex32, Complex64};
use num_traits::Zero;
use rand::Rng;

/// Typed contiguous buffer, one variant per scalar kind.
#[derive(Clone, Debug)]
pub enum StorageSlice {
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    C32(Vec<Complex32>),
    C64(Vec<Complex64>),
}

// Binds the inner `Vec<T>` of every variant to `$v` and evaluates `$body`
// with `T` resolved per arm.
macro_rules! map_slice {
    ($s:expr, $v:ident => $body:expr) => {
        match $s {
            StorageSlice::I32($v) => $body,
            StorageSlice::F32($v) => $body,
            StorageSlice::F64($v) => $body,
            StorageSlice::C32($v) => $body,
            StorageSlice::C64($v) => $body,
        }
    };
}
pub(crate) use map_slice;

fn cast_vec<S: Element, T: Element>(v: &[S]) -> Vec<T> {
    v.iter().map(|x| T::from_c64(x.to_c64())).collect()
}

fn random_vec<T: Element, R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<T> {
    (0..n).map(|_| T::sample(rng)).collect()
}

impl StorageSlice {
    pub fn zeros(dtype: DType, n: usize) -> Self {
        match dtype {
            DType::I32 => StorageSlice::I32(vec![Zero::zero(); n]),
            DType::F32 => StorageSlice::F32(vec![Zero::zero(); n]),
            DType::F64 => StorageSlice::F64(vec![Zero::zero(); n]),
            DType::C32 => StorageSlice::C32(vec![Zero::zero(); n]),
            DType::C64 => StorageSlice::C64(vec![Zero::zero(); n]),
        }
    }

    pub(crate) fn random<R: Rng + ?Sized>(dtype: DType, n: usize, rng: &mut R) -> Self {
        match dtype {
            DType::I32 => StorageSlice::I32(random_vec(n, rng)),
            DType::F32 => StorageSlice::F32(random_vec(n, rng)),
            DType::F64 => StorageSlice::F64(random_vec(n, rng)),
            DType::C32 => StorageSlice::C32(random_vec(n, rng)),
            DType::C64 => StorageSlice::C64(random_vec(n, rng)),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            StorageSlice::I32(_) => DType::I32,
            StorageSlice::F32(_) => DType::F32,
            StorageSlice::F64(_) => DType::F64,
            StorageSlice::C32(_) => DType::C32,
            StorageSlice::C64(_) => DType::C64,
        }
    }

    pub fn len(&self) -> usize {
        map_slice!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        map_slice!(self, v => v.capacity())
    }

    pub(crate) fn cast(&self, dtype: DType) -> StorageSlice {
        if self.dtype() == dtype {
            return self.clone();
        }
        map_slice!(self, v => match dtype {
            DType::I32 => StorageSlice::I32(cast_vec(v)),
            DType::F32 => StorageSlice::F32(cast_vec(v)),
            DType::F64 => StorageSlice::F64(cast_vec(v)),
            DType::C32 => StorageSlice::C32(cast_vec(v)),
            DType::C64 => StorageSlice::C64(cast_vec(v)),
        })
    }

    /// Destructive resize: contents are only kept when the length is unchanged.
    fn resize(&mut self, n: usize) {
        let old = self.len();
        if old == n {
            return;
        }
        let cap = self.capacity();
        map_slice!(self, v => {
            v.clear();
            v.resize(n, Zero::zero());
        });
        if n > cap {
            log::debug!("storage reallocated: {} -> {} elements", cap, self.capacity());
        }
    }

    fn fill_zero(&mut self) {
        map_slice!(self, v => v.iter_mut().for_each(|x| *x = Zero::zero()))
    }
}

/// Read-only typed window over a buffer with its logical shape.
#[derive(Clone, Copy)]
pub(crate) struct View<'a, T> {
    pub(crate) data: &'a [T],
    pub(crate) shape: &'a Shape,
    pub(crate) order: Order,
}

impl<'a, T: Element> View<'a, T> {
    pub(crate) fn new(data: &'a [T], shape: &'a Shape, order: Order) -> Self {
        View { data, shape, order }
    }

    #[inline]
    pub(crate) fn at(&self, row: usize, col: usize) -> T {
        self.data[self.shape.offset(self.order, row, col)]
    }

    pub(crate) fn rows(&self) -> usize {
        self.shape.rows()
    }

    pub(crate) fn cols(&self) -> usize {
        self.shape.cols()
    }

    /// Elements in row-major logical order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.shape.iter().map(move |(r, c)| self.at(r, c))
    }
}

#[derive(Clone, Debug)]
pub struct Storage {
    slice: StorageSlice,
    order: Order,
}

impl Storage {
    pub(crate) fn zeros(dtype: DType, n: usize, order: Order) -> Self {
        Storage {
            slice: StorageSlice::zeros(dtype, n),
            order,
        }
    }

    pub(crate) fn from_slice(slice: StorageSlice, order: Order) -> Self {
        Storage { slice, order }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn dtype(&self) -> DType {
        self.slice.dtype()
    }

    pub fn len(&self) -> usize {
        self.slice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slice.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.slice.capacity()
    }

    pub fn slice(&self) -> &StorageSlice {
        &self.slice
    }

    pub(crate) fn slice_mut(&mut self) -> &mut StorageSlice {
        &mut self.slice
    }

    pub(crate) fn typed<T: Element>(&self) -> Option<&[T]> {
        T::slice(&self.slice)
    }

    pub(crate) fn typed_mut<T: Element>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(&mut self.slice)
    }

    pub(crate) fn resize(&mut self, n: usize) {
        self.slice.resize(n)
    }

    pub(crate) fn fill_zero(&mut self) {
        self.slice.fill_zero()
    }

    /// Grows capacity to at least `n` elements without touching the contents.
    pub(crate) fn reserve_total(&mut self, n: usize) {
        map_slice!(&mut self.slice, v => v.reserve(n.saturating_sub(v.len())))
    }

    /// Moves every coordinate present in both shapes to its offset under `new`.
    pub(crate) fn conservative_resize(&mut self, old: &Shape, new: &Shape) {
        let order = self.order;
        let rows = old.rows().min(new.rows());
        let cols = old.cols().min(new.cols());
        log::trace!(
            "conservative resize {} -> {}, copying {}x{} block",
            old,
            new,
            rows,
            cols
        );
        map_slice!(&mut self.slice, v => {
            let mut dst = Vec::with_capacity(v.capacity().max(new.elem_count()));
            dst.resize(new.elem_count(), Zero::zero());
            for r in 0..rows {
                for c in 0..cols {
                    dst[new.offset(order, r, c)] = v[old.offset(order, r, c)];
                }
            }
            *v = dst;
        })
    }
}

use crate::dtype::{Element, RealElement, Scalar};
use crate::error::{DError, DResult};
use crate::op::check_square;
use crate::storage::{map_slice, StorageSlice, View};
use crate::Matrix;

trait Reduce {
    fn f<T: Element>(&self, v: View<'_, T>) -> T;

    fn map(&self, m: &Matrix) -> Scalar {
        let (s, o) = (&m.shape, m.order());
        match m.storage.slice() {
            StorageSlice::I32(d) => Scalar::I32(self.f(View::new(d, s, o))),
            StorageSlice::F32(d) => Scalar::F32(self.f(View::new(d, s, o))),
            StorageSlice::F64(d) => Scalar::F64(self.f(View::new(d, s, o))),
            StorageSlice::C32(d) => Scalar::C32(self.f(View::new(d, s, o))),
            StorageSlice::C64(d) => Scalar::C64(self.f(View::new(d, s, o))),
        }
    }
}

// Reductions that need an ordering; complex kinds have none.
trait RealReduce {
    const OP: &'static str;

    fn f<T: RealElement>(&self, v: View<'_, T>) -> (T, usize, usize);

    fn map(&self, m: &Matrix) -> DResult<(Scalar, usize, usize)> {
        if m.is_empty() {
            return Err(DError::EmptyMatrix { op: Self::OP });
        }
        let (s, o) = (&m.shape, m.order());
        Ok(match m.storage.slice() {
            StorageSlice::I32(d) => {
                let (x, r, c) = self.f(View::new(d, s, o));
                (Scalar::I32(x), r, c)
            }
            StorageSlice::F32(d) => {
                let (x, r, c) = self.f(View::new(d, s, o));
                (Scalar::F32(x), r, c)
            }
            StorageSlice::F64(d) => {
                let (x, r, c) = self.f(View::new(d, s, o));
                (Scalar::F64(x), r, c)
            }
            StorageSlice::C32(_) | StorageSlice::C64(_) => {
                return Err(DError::UnsupportedDType {
                    op: Self::OP,
                    dtype: m.dtype(),
                })
            }
        })
    }
}

struct Sum;

impl Reduce for Sum {
    fn f<T: Element>(&self, v: View<'_, T>) -> T {
        v.data.iter().fold(T::zero(), |acc, x| acc.wrapping_add(*x))
    }
}

struct Prod;

impl Reduce for Prod {
    fn f<T: Element>(&self, v: View<'_, T>) -> T {
        v.data.iter().fold(T::one(), |acc, x| acc.wrapping_mul(*x))
    }
}

struct Trace;

impl Reduce for Trace {
    fn f<T: Element>(&self, v: View<'_, T>) -> T {
        (0..v.rows()).fold(T::zero(), |acc, i| acc.wrapping_add(v.at(i, i)))
    }
}

struct Extremum {
    max: bool,
}

impl RealReduce for Extremum {
    const OP: &'static str = "min/max";

    // Row-major scan; the first occurrence wins ties and NaN never wins.
    fn f<T: RealElement>(&self, v: View<'_, T>) -> (T, usize, usize) {
        let mut best: Option<(T, usize, usize)> = None;
        for (r, c) in v.shape.iter() {
            let x = v.at(r, c);
            if x.partial_cmp(&x).is_none() {
                continue;
            }
            best = match best {
                Some((b, _, _)) if (self.max && x > b) || (!self.max && x < b) => Some((x, r, c)),
                None => Some((x, r, c)),
                keep => keep,
            };
        }
        best.unwrap_or_else(|| (v.at(0, 0), 0, 0))
    }
}

impl Matrix {
    /// Sum of all coefficients; zero for an empty matrix.
    pub fn sum(&self) -> Scalar {
        Sum.map(self)
    }

    /// Product of all coefficients; one for an empty matrix.
    pub fn prod(&self) -> Scalar {
        Prod.map(self)
    }

    /// Arithmetic mean. `I32` matrices use integer division.
    pub fn mean(&self) -> DResult<Scalar> {
        if self.is_empty() {
            return Err(DError::EmptyMatrix { op: "mean" });
        }
        let n = Scalar::F64(self.size() as f64).cast_to(self.dtype());
        self.sum().div(n)
    }

    pub fn min_coeff(&self) -> DResult<Scalar> {
        Ok(self.min_coeff_at()?.0)
    }

    pub fn max_coeff(&self) -> DResult<Scalar> {
        Ok(self.max_coeff_at()?.0)
    }

    /// Smallest coefficient and its (row, col).
    pub fn min_coeff_at(&self) -> DResult<(Scalar, usize, usize)> {
        Extremum { max: false }.map(self)
    }

    /// Largest coefficient and its (row, col).
    pub fn max_coeff_at(&self) -> DResult<(Scalar, usize, usize)> {
        Extremum { max: true }.map(self)
    }

    pub fn trace(&self) -> DResult<Scalar> {
        check_square("trace", self)?;
        Ok(Trace.map(self))
    }

    /// Sum of squared magnitudes, widened to `f64`.
    pub fn squared_norm(&self) -> f64 {
        map_slice!(self.storage.slice(), v => v.iter().map(|x| x.abs_sqr()).sum())
    }

    /// Frobenius norm.
    pub fn norm(&self) -> f64 {
        self.squared_norm().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DType;
    use num_complex::Complex64;

    #[test]
    fn test_reductions() {
        let m = mat![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(m.sum(), 10.0f64);
        assert_eq!(m.prod(), 24.0f64);
        assert_eq!(m.mean().unwrap(), 2.5f64);
        assert_eq!(m.trace().unwrap(), 5.0f64);
        assert_eq!(m.min_coeff_at().unwrap(), (Scalar::F64(1.0), 0, 0));
        assert_eq!(m.max_coeff_at().unwrap(), (Scalar::F64(4.0), 1, 1));
        assert_eq!(m.squared_norm(), 30.0);
        assert!((m.norm() - 30f64.sqrt()).abs() < 1e-12);

        let i = mat![[1, 2], [3, 4]];
        assert_eq!(i.mean().unwrap(), Scalar::I32(2));
        assert_eq!(i.sum(), Scalar::I32(10));
    }

    #[test]
    fn test_integer_reductions_wrap() {
        let m = Matrix::constant(2, 1, i32::MAX).unwrap();
        assert_eq!(m.sum(), Scalar::I32(-2));
        assert_eq!(m.prod(), Scalar::I32(1));
        assert_eq!(m.mean().unwrap(), Scalar::I32(-1));
        assert_eq!(mat![[i32::MIN]].mean().unwrap(), Scalar::I32(i32::MIN));
        assert_eq!(mat![[i32::MAX, 0], [0, 1]].trace().unwrap(), Scalar::I32(i32::MIN));
    }

    #[test]
    fn test_extremum_ties_and_layout() {
        let m = mat![[3, 1, 5], [1, 5, 0]].to_order(crate::Order::RowMajor);
        assert_eq!(m.min_coeff_at().unwrap(), (Scalar::I32(0), 1, 2));
        assert_eq!(m.max_coeff_at().unwrap(), (Scalar::I32(5), 0, 2));

        let m = mat![[2, 1], [1, 2]];
        assert_eq!(m.min_coeff_at().unwrap(), (Scalar::I32(1), 0, 1));
        assert_eq!(m.max_coeff_at().unwrap(), (Scalar::I32(2), 0, 0));
        assert_eq!(m.min_coeff().unwrap(), 1i32);
    }

    #[test]
    fn test_extremum_skips_nan() {
        let m = mat![[f64::NAN, 2.0], [-1.0, f64::NAN]];
        assert_eq!(m.min_coeff_at().unwrap(), (Scalar::F64(-1.0), 1, 0));
        assert_eq!(m.max_coeff_at().unwrap(), (Scalar::F64(2.0), 0, 1));
        let all = Matrix::constant(2, 2, f32::NAN).unwrap();
        let (v, r, c) = all.max_coeff_at().unwrap();
        assert!(v.to_f64().unwrap().is_nan());
        assert_eq!((r, c), (0, 0));
    }

    #[test]
    fn test_complex_reductions() {
        let c = |re: f64, im: f64| Complex64::new(re, im);
        let m = mat![[c(1.0, 1.0), c(0.0, 2.0)], [c(3.0, 0.0), c(1.0, -1.0)]];
        assert_eq!(m.sum(), Scalar::C64(c(5.0, 2.0)));
        assert_eq!(m.trace().unwrap(), Scalar::C64(c(2.0, 0.0)));
        assert_eq!(m.squared_norm(), 2.0 + 4.0 + 9.0 + 2.0);
        assert_eq!(
            m.min_coeff(),
            Err(DError::UnsupportedDType {
                op: "min/max",
                dtype: DType::C64
            })
        );
        assert!(m.max_coeff_at().is_err());
    }

    #[test]
    fn test_empty_and_non_square() {
        let e = Matrix::new(0, 3, DType::F64).unwrap();
        assert_eq!(e.sum(), 0.0f64);
        assert_eq!(e.prod(), 1.0f64);
        assert_eq!(e.mean(), Err(DError::EmptyMatrix { op: "mean" }));
        assert_eq!(e.min_coeff(), Err(DError::EmptyMatrix { op: "min/max" }));
        assert_eq!(e.squared_norm(), 0.0);

        let r = mat![[1, 2, 3]];
        assert!(matches!(r.trace(), Err(DError::ShapeMismatch { op: "trace", .. })));
    }
}

use crate::error::{DError, DResult};
use crate::storage::StorageSlice;
use num_complex::{Complex32, Complex64};
use num_traits::{Num, One, Zero};
use rand::Rng;
use std::fmt;
use std::ops::Neg;

/// Interval sampled by the random factories for floating kinds (and for both
/// parts of complex kinds), inclusive.
pub const RANDOM_REAL_RANGE: (f64, f64) = (-1.0, 1.0);

/// Interval sampled by the random factories for `I32`, inclusive.
pub const RANDOM_INT_RANGE: (i32, i32) = (-10, 10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    I32,
    F32,
    F64,
    C32,
    C64,
}

impl DType {
    pub fn is_complex(&self) -> bool {
        matches!(self, DType::C32 | DType::C64)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, DType::I32)
    }

    fn rank(&self) -> u8 {
        match self {
            DType::I32 => 0,
            DType::F32 | DType::C32 => 1,
            DType::F64 | DType::C64 => 2,
        }
    }

    /// Common kind of two operands. Real and complex never mix implicitly.
    pub fn promote(self, other: DType) -> Option<DType> {
        if self.is_complex() != other.is_complex() {
            return None;
        }
        Some(if self.rank() >= other.rank() { self } else { other })
    }

    pub(crate) fn promote_for(op: &'static str, lhs: DType, rhs: DType) -> DResult<DType> {
        lhs.promote(rhs)
            .ok_or(DError::DTypeMismatch { op, lhs, rhs })
    }

    /// `other` widens into `self` without changing `self`.
    pub fn accepts(self, other: DType) -> bool {
        self.promote(other) == Some(self)
    }

    pub(crate) fn check_accepts(self, op: &'static str, other: DType) -> DResult<()> {
        if self.accepts(other) {
            Ok(())
        } else {
            Err(DError::DTypeMismatch {
                op,
                lhs: self,
                rhs: other,
            })
        }
    }

    /// Literal values may narrow between real kinds, but a complex value
    /// never lands in a real slot.
    pub(crate) fn check_admits_value(self, op: &'static str, value: DType) -> DResult<()> {
        if value.is_complex() && !self.is_complex() {
            Err(DError::DTypeMismatch {
                op,
                lhs: self,
                rhs: value,
            })
        } else {
            Ok(())
        }
    }
}

macro_rules! scalar_arith {
    ($a:expr, $b:expr, $op:tt, $int:ident) => {
        match ($a, $b) {
            (Scalar::I32(x), Scalar::I32(y)) => Ok(Scalar::I32(x.$int(y))),
            (Scalar::F32(x), Scalar::F32(y)) => Ok(Scalar::F32(x $op y)),
            (Scalar::F64(x), Scalar::F64(y)) => Ok(Scalar::F64(x $op y)),
            (Scalar::C32(x), Scalar::C32(y)) => Ok(Scalar::C32(x $op y)),
            (Scalar::C64(x), Scalar::C64(y)) => Ok(Scalar::C64(x $op y)),
            (x, y) => Err(DError::DTypeMismatch {
                op: stringify!($op),
                lhs: x.dtype(),
                rhs: y.dtype(),
            }),
        }
    };
}

/// A scalar tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    I32(i32),
    F32(f32),
    F64(f64),
    C32(Complex32),
    C64(Complex64),
}

impl Scalar {
    pub fn dtype(&self) -> DType {
        match self {
            Scalar::I32(_) => DType::I32,
            Scalar::F32(_) => DType::F32,
            Scalar::F64(_) => DType::F64,
            Scalar::C32(_) => DType::C32,
            Scalar::C64(_) => DType::C64,
        }
    }

    pub fn to_c64(&self) -> Complex64 {
        match *self {
            Scalar::I32(v) => v.to_c64(),
            Scalar::F32(v) => v.to_c64(),
            Scalar::F64(v) => v.to_c64(),
            Scalar::C32(v) => v.to_c64(),
            Scalar::C64(v) => v,
        }
    }

    /// Real value, `None` for complex kinds.
    pub fn to_f64(&self) -> Option<f64> {
        if self.dtype().is_complex() {
            None
        } else {
            Some(self.to_c64().re)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.to_c64().is_zero()
    }

    /// Lossy conversion; complex to real keeps the real part.
    pub fn cast<T: Element>(self) -> T {
        match self {
            Scalar::I32(v) => T::from_i32(v),
            _ => T::from_c64(self.to_c64()),
        }
    }

    pub fn cast_to(self, dtype: DType) -> Scalar {
        match dtype {
            DType::I32 => Scalar::I32(self.cast()),
            DType::F32 => Scalar::F32(self.cast()),
            DType::F64 => Scalar::F64(self.cast()),
            DType::C32 => Scalar::C32(self.cast()),
            DType::C64 => Scalar::C64(self.cast()),
        }
    }

    pub fn conj(self) -> Scalar {
        match self {
            Scalar::C32(v) => Scalar::C32(v.conj()),
            Scalar::C64(v) => Scalar::C64(v.conj()),
            other => other,
        }
    }

    pub fn neg(self) -> Scalar {
        match self {
            Scalar::I32(v) => Scalar::I32(v.wrapping_neg()),
            Scalar::F32(v) => Scalar::F32(-v),
            Scalar::F64(v) => Scalar::F64(-v),
            Scalar::C32(v) => Scalar::C32(-v),
            Scalar::C64(v) => Scalar::C64(-v),
        }
    }

    fn promoted(self, rhs: Scalar, op: &'static str) -> DResult<(Scalar, Scalar)> {
        let dtype = DType::promote_for(op, self.dtype(), rhs.dtype())?;
        Ok((self.cast_to(dtype), rhs.cast_to(dtype)))
    }

    pub fn div(self, rhs: Scalar) -> DResult<Scalar> {
        let (a, b) = self.promoted(rhs, "div")?;
        if let (Scalar::I32(_), Scalar::I32(0)) = (a, b) {
            return Err(DError::DivisionByZero);
        }
        scalar_arith!(a, b, /, wrapping_div)
    }
}

macro_rules! impl_scalar_binop {
    ($name:ident, $op:tt, $int:ident) => {
        impl Scalar {
            pub fn $name(self, rhs: Scalar) -> DResult<Scalar> {
                let (a, b) = self.promoted(rhs, stringify!($name))?;
                scalar_arith!(a, b, $op, $int)
            }
        }
    };
}

impl_scalar_binop!(add, +, wrapping_add);
impl_scalar_binop!(sub, -, wrapping_sub);
impl_scalar_binop!(mul, *, wrapping_mul);

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::I32(v) => fmt::Display::fmt(v, f),
            Scalar::F32(v) => fmt::Display::fmt(v, f),
            Scalar::F64(v) => fmt::Display::fmt(v, f),
            Scalar::C32(v) => fmt::Display::fmt(v, f),
            Scalar::C64(v) => fmt::Display::fmt(v, f),
        }
    }
}

macro_rules! impl_scalar_from {
    ($($t:ty => $variant:ident),*) => {
        $(impl From<$t> for Scalar {
            fn from(v: $t) -> Self {
                Scalar::$variant(v)
            }
        }

        impl PartialEq<$t> for Scalar {
            fn eq(&self, other: &$t) -> bool {
                self.to_c64() == Scalar::from(*other).to_c64()
            }
        })*
    };
}

impl_scalar_from!(i32 => I32, f32 => F32, f64 => F64, Complex32 => C32, Complex64 => C64);

/// Element type of one storage variant.
pub trait Element:
    Copy + fmt::Debug + fmt::Display + PartialEq + Num + Neg<Output = Self> + Send + Sync + 'static
{
    const DTYPE: DType;

    fn conj(self) -> Self;

    fn to_c64(self) -> Complex64;

    fn from_c64(c: Complex64) -> Self;

    fn from_i32(v: i32) -> Self;

    fn abs_sqr(self) -> f64;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self;

    // Ring operations used by every kernel. `I32` wraps on overflow, the
    // floating and complex kinds use plain IEEE arithmetic.
    fn wrapping_add(self, rhs: Self) -> Self;

    fn wrapping_sub(self, rhs: Self) -> Self;

    fn wrapping_mul(self, rhs: Self) -> Self;

    /// Callers reject a zero integer divisor first.
    fn wrapping_div(self, rhs: Self) -> Self;

    fn wrapping_neg(self) -> Self;

    fn slice(s: &StorageSlice) -> Option<&[Self]>;

    fn slice_mut(s: &mut StorageSlice) -> Option<&mut [Self]>;

    fn wrap(v: Vec<Self>) -> StorageSlice;
}

/// Element kinds with a natural ordering.
pub trait RealElement: Element + PartialOrd {}

macro_rules! impl_element_storage {
    ($t:ty, $variant:ident) => {
        fn slice(s: &StorageSlice) -> Option<&[Self]> {
            match s {
                StorageSlice::$variant(v) => Some(v.as_slice()),
                _ => None,
            }
        }

        fn slice_mut(s: &mut StorageSlice) -> Option<&mut [Self]> {
            match s {
                StorageSlice::$variant(v) => Some(v.as_mut_slice()),
                _ => None,
            }
        }

        fn wrap(v: Vec<Self>) -> StorageSlice {
            StorageSlice::$variant(v)
        }
    };
}

macro_rules! impl_ring_ops {
    (wrapping) => {
        #[inline]
        fn wrapping_add(self, rhs: Self) -> Self {
            i32::wrapping_add(self, rhs)
        }

        #[inline]
        fn wrapping_sub(self, rhs: Self) -> Self {
            i32::wrapping_sub(self, rhs)
        }

        #[inline]
        fn wrapping_mul(self, rhs: Self) -> Self {
            i32::wrapping_mul(self, rhs)
        }

        #[inline]
        fn wrapping_div(self, rhs: Self) -> Self {
            i32::wrapping_div(self, rhs)
        }

        #[inline]
        fn wrapping_neg(self) -> Self {
            i32::wrapping_neg(self)
        }
    };
    (ieee) => {
        #[inline]
        fn wrapping_add(self, rhs: Self) -> Self {
            self + rhs
        }

        #[inline]
        fn wrapping_sub(self, rhs: Self) -> Self {
            self - rhs
        }

        #[inline]
        fn wrapping_mul(self, rhs: Self) -> Self {
            self * rhs
        }

        #[inline]
        fn wrapping_div(self, rhs: Self) -> Self {
            self / rhs
        }

        #[inline]
        fn wrapping_neg(self) -> Self {
            -self
        }
    };
}

macro_rules! impl_real_element {
    ($t:ident, $variant:ident, $ring:ident, $rng:ident => $sample:expr) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn conj(self) -> Self {
                self
            }

            #[inline]
            fn to_c64(self) -> Complex64 {
                Complex64::new(self as f64, 0.0)
            }

            #[inline]
            fn from_c64(c: Complex64) -> Self {
                c.re as $t
            }

            #[inline]
            fn from_i32(v: i32) -> Self {
                v as $t
            }

            #[inline]
            fn abs_sqr(self) -> f64 {
                let x = self as f64;
                x * x
            }

            fn sample<R: Rng + ?Sized>($rng: &mut R) -> Self {
                $sample
            }

            impl_ring_ops!($ring);
            impl_element_storage!($t, $variant);
        }

        impl RealElement for $t {}
    };
}

impl_real_element!(i32, I32, wrapping, rng => rng.gen_range(RANDOM_INT_RANGE.0..=RANDOM_INT_RANGE.1));
impl_real_element!(f32, F32, ieee, rng => rng.gen_range(RANDOM_REAL_RANGE.0..=RANDOM_REAL_RANGE.1) as f32);
impl_real_element!(f64, F64, ieee, rng => rng.gen_range(RANDOM_REAL_RANGE.0..=RANDOM_REAL_RANGE.1));

macro_rules! impl_complex_element {
    ($t:ident, $f:ident, $variant:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn conj(self) -> Self {
                $t::conj(&self)
            }

            #[inline]
            fn to_c64(self) -> Complex64 {
                Complex64::new(self.re as f64, self.im as f64)
            }

            #[inline]
            fn from_c64(c: Complex64) -> Self {
                $t::new(c.re as $f, c.im as $f)
            }

            #[inline]
            fn from_i32(v: i32) -> Self {
                $t::new(v as $f, 0.0)
            }

            #[inline]
            fn abs_sqr(self) -> f64 {
                self.norm_sqr() as f64
            }

            fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
                let (lo, hi) = RANDOM_REAL_RANGE;
                $t::new(rng.gen_range(lo..=hi) as $f, rng.gen_range(lo..=hi) as $f)
            }

            impl_ring_ops!(ieee);
            impl_element_storage!($t, $variant);
        }
    };
}

impl_complex_element!(Complex32, f32, C32);
impl_complex_element!(Complex64, f64, C64);

pub(crate) fn one_of(dtype: DType) -> Scalar {
    match dtype {
        DType::I32 => Scalar::I32(One::one()),
        DType::F32 => Scalar::F32(One::one()),
        DType::F64 => Scalar::F64(One::one()),
        DType::C32 => Scalar::C32(One::one()),
        DType::C64 => Scalar::C64(One::one()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_promote() {
        assert_eq!(DType::I32.promote(DType::F64), Some(DType::F64));
        assert_eq!(DType::F32.promote(DType::I32), Some(DType::F32));
        assert_eq!(DType::C32.promote(DType::C64), Some(DType::C64));
        assert_eq!(DType::F64.promote(DType::C64), None);
        assert!(DType::F64.accepts(DType::I32));
        assert!(!DType::I32.accepts(DType::F32));
        assert!(!DType::F64.accepts(DType::C32));
    }

    #[test]
    fn test_scalar_arith() {
        let a = Scalar::I32(3);
        let b = Scalar::F64(0.5);
        assert_eq!(a.add(b).unwrap(), Scalar::F64(3.5));
        assert_eq!(a.mul(Scalar::I32(4)).unwrap(), Scalar::I32(12));
        assert_eq!(a.div(Scalar::I32(0)), Err(DError::DivisionByZero));
        assert_eq!(Scalar::I32(i32::MIN).div(Scalar::I32(-1)).unwrap(), Scalar::I32(i32::MIN));
        assert_eq!(Scalar::I32(i32::MAX).add(Scalar::I32(1)).unwrap(), Scalar::I32(i32::MIN));
        assert_eq!(Scalar::I32(i32::MIN).neg(), Scalar::I32(i32::MIN));
        assert!(Scalar::F64(1.0).div(Scalar::F64(0.0)).unwrap().to_f64().unwrap().is_infinite());
        assert!(matches!(
            a.add(Scalar::C64(Complex64::new(1.0, 1.0))),
            Err(DError::DTypeMismatch { .. })
        ));
        assert_eq!(
            Scalar::C64(Complex64::new(1.0, 2.0)).conj(),
            Scalar::C64(Complex64::new(1.0, -2.0))
        );
    }

    #[test]
    fn test_scalar_eq_primitive() {
        assert_eq!(Scalar::F64(2.5), 2.5);
        assert_eq!(Scalar::I32(10), 10);
        assert!(Scalar::I32(10) != 10.5);
    }

    #[test]
    fn test_sample_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let x = f64::sample(&mut rng);
            assert!((-1.0..=1.0).contains(&x));
            let i = i32::sample(&mut rng);
            assert!((-10..=10).contains(&i));
            let c = Complex32::sample(&mut rng);
            assert!(c.re.abs() <= 1.0 && c.im.abs() <= 1.0);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Scalar::F64(2.5)), "2.5");
        assert_eq!(format!("{:.2}", Scalar::F64(2.5)), "2.50");
        assert_eq!(format!("{}", Scalar::C64(Complex64::new(1.0, -2.0))), "1-2i");
    }
}

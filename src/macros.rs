/// Row-major matrix literal: `mat![[1.0, 2.0], [3.0, 4.0]]`.
#[macro_export]
macro_rules! mat {
    ($([$($x:expr),* $(,)*]),+ $(,)*) => {{
        $crate::Matrix::from_rows(vec![$([$($x,)*],)*])
    }};
}

/// Column vector literal.
#[macro_export]
macro_rules! vector {
    ($($x:expr),* $(,)*) => {{
        $crate::Matrix::from_column(vec![$($x,)*])
    }};
}

#[macro_export]
macro_rules! row_vector {
    ($($x:expr),* $(,)*) => {{
        $crate::Matrix::from_row(vec![$($x,)*])
    }};
}

#[cfg(test)]
mod tests {
    use crate::DType;

    #[test]
    fn test_literals() {
        let m = mat![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.dtype(), DType::F64);
        assert_eq!(m.get(1, 0).unwrap(), 4.0);

        let v = vector![1, 2, 3];
        assert_eq!((v.rows(), v.cols()), (3, 1));
        assert_eq!(v.dtype(), DType::I32);

        let r = row_vector![1.0f32, 2.0];
        assert_eq!((r.rows(), r.cols()), (1, 2));
        assert_eq!(r.dtype(), DType::F32);
    }
}

use crate::dtype::DType;
use crate::shape::Shape;
use thiserror::Error;

pub type DResult<T> = Result<T, DError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DError {
    #[error("invalid shape {rows}x{cols}: {msg}")]
    InvalidShape {
        rows: i64,
        cols: i64,
        msg: &'static str,
    },
    #[error("shape mismatch in {op}: lhs {lhs}, rhs {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },
    #[error("index ({row}, {col}) out of range for shape {shape}")]
    IndexOutOfRange { row: usize, col: usize, shape: Shape },
    #[error("fill sequence has {got} values, expected {expected}")]
    FillCountMismatch { expected: usize, got: usize },
    #[error("{op} is undefined on an empty matrix")]
    EmptyMatrix { op: &'static str },
    #[error("integer division by zero")]
    DivisionByZero,
    #[error("dtype mismatch in {op}: {lhs:?} and {rhs:?}")]
    DTypeMismatch {
        op: &'static str,
        lhs: DType,
        rhs: DType,
    },
    #[error("{op} is not supported for dtype {dtype:?}")]
    UnsupportedDType { op: &'static str, dtype: DType },
    #[error("Unexpected: {0}")]
    Unexpected(String),
}

impl DError {
    pub(crate) fn shape_mismatch(op: &'static str, lhs: &Shape, rhs: &Shape) -> Self {
        DError::ShapeMismatch {
            op,
            lhs: lhs.clone(),
            rhs: rhs.clone(),
        }
    }

    pub(crate) fn invalid_shape(rows: usize, cols: usize, msg: &'static str) -> Self {
        DError::InvalidShape {
            rows: i64::try_from(rows).unwrap_or(i64::MAX),
            cols: i64::try_from(cols).unwrap_or(i64::MAX),
            msg,
        }
    }
}

impl From<&str> for DError {
    fn from(e: &str) -> Self {
        DError::Unexpected(e.to_string())
    }
}

impl From<String> for DError {
    fn from(e: String) -> Self {
        DError::Unexpected(e)
    }
}

impl From<DError> for String {
    fn from(e: DError) -> Self {
        format!("{}", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = DError::shape_mismatch("add", &Shape::dynamic(2, 3), &Shape::dynamic(3, 2));
        assert_eq!(e.to_string(), "shape mismatch in add: lhs 2x3, rhs 3x2");
        let s: String = DError::DivisionByZero.into();
        assert_eq!(s, "integer division by zero");
        let e: DError = "boom".into();
        assert!(matches!(e, DError::Unexpected(_)));
    }

    #[test]
    fn test_invalid_shape_saturates() {
        let e = DError::invalid_shape(usize::MAX, 3, "element count overflows");
        assert_eq!(
            e,
            DError::InvalidShape {
                rows: i64::MAX,
                cols: 3,
                msg: "element count overflows"
            }
        );
    }
}

use thiserror::Error;

/// Errors raised by the linear algebra layer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("cannot normalize a zero-length vector")]
    ZeroVector,
}

pub type MathResult<T> = Result<T, MathError>;

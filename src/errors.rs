use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InitError {
    #[error("invalid shape {shape:?}: {reason}")]
    InvalidShape { shape: Vec<usize>, reason: String },
    #[error("invalid configuration: {0}")]
    Configuration(String),
    // Rescaling would divide by (almost) zero.
    #[error("cannot rescale filter bank with variance {variance}")]
    DegenerateScaling { variance: f64 },
    #[error("numerical failure: {0}")]
    NumericalFailure(String),
}

impl InitError {
    pub(crate) fn invalid_shape(shape: &[usize], reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            shape: shape.to_vec(),
            reason: reason.into(),
        }
    }
}

pub type InitResult<T> = Result<T, InitError>;

// Empty shapes and zero-sized dimensions leave nothing to initialize. Once a
// shape passes, products over any subset of its dimensions fit in a usize.
pub(crate) fn validate_shape(shape: &[usize]) -> InitResult<()> {
    if shape.is_empty() {
        return Err(InitError::invalid_shape(shape, "shape must not be empty"));
    }
    if shape.iter().any(|&d| d == 0) {
        return Err(InitError::invalid_shape(shape, "all dimensions must be positive"));
    }
    if shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d)).is_none() {
        return Err(InitError::invalid_shape(shape, "element count overflows usize"));
    }
    Ok(())
}

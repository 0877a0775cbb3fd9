use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiffusionError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffusionError {
    #[error("coordinate ({x}, {y}) outside {width}x{height} grid")]
    OutOfRange {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("index {index} outside grid of {len} cells")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid diffusion coefficient {0} (must be finite and >= 0)")]
    InvalidCoefficient(f64),

    #[error("dimension mismatch: {left:?} vs {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("non-finite value {value} written at index {index}")]
    NonFiniteValue { index: usize, value: f64 },

    #[error("cannot {action} while harness is {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("grid must have non-zero width and height")]
    EmptyGrid,
}

impl DiffusionError {
    /// True for both the coordinate and the linear-index flavour of a bounds failure.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            DiffusionError::OutOfRange { .. } | DiffusionError::IndexOutOfRange { .. }
        )
    }
}

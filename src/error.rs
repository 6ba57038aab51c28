/// Crate-level error type for DTW distance computation and classification.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter `{name}`: got {value}, {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A time series (or a set of them) is empty when data was required.
    #[error("time series is empty")]
    EmptySeries,

    /// A time series contains non-finite values (NaN or Inf).
    #[error("time series contains non-finite values")]
    NonFiniteSeries,

    /// Input has incorrect shape for the operation.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// The warping window cannot connect the first and last samples.
    #[error(
        "warping window {window} is narrower than the length difference of {len_a} and {len_b}"
    )]
    WindowTooNarrow {
        window: usize,
        len_a: usize,
        len_b: usize,
    },

    /// The classifier was asked to predict before `fit` was called.
    #[error("classifier has not been fitted")]
    NotFitted,

    /// A dataset file contained a token that is not a number.
    #[error("line {line}: cannot parse `{token}` as a number")]
    Parse { line: usize, token: String },

    /// Chart rendering failed.
    #[error("render error: {0}")]
    Render(String),

    /// File I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for knn-dtw operations.
pub type Result<T> = std::result::Result<T, Error>;

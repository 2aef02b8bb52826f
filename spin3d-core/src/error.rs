/// Error type shared by every stage of the pipeline
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Normalizing a vector whose length is (near) zero
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    /// Scalar or perspective divide by (near) zero
    #[error("division by zero")]
    DivideByZero,

    #[error("degenerate projection parameters: {0}")]
    DegenerateProjectionParameters(String),

    /// Loader-level failure; `line` is 1-based
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

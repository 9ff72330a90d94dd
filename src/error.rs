use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The dataset or split could not be opened, fetched or parsed.
    #[error("dataset unavailable: {reason}")]
    DataUnavailable { reason: String },

    /// A record's image does not match the shape the pipeline expects.
    #[error("invalid record shape: expected {expected:?}, found {found:?} holding {samples} samples")]
    InvalidRecordShape {
        expected: Vec<usize>,
        found: Vec<usize>,
        samples: usize,
    },

    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            reason: reason.into(),
        }
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

use thiserror::Error;

/// Number of draws after which rejection sampling gives up.
///
/// A correctly sized sampler succeeds on the first draw with probability
/// at least 1/2, so reaching this bound indicates a programming error
/// rather than bad luck.
pub const MAX_REJECTION_ROUNDS: usize = 256;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("authentication failure: {0}")]
    AuthFailure(String),

    #[error("timestamp outside certificate validity window")]
    OutOfValidity,

    #[error("rejection sampling did not terminate within {MAX_REJECTION_ROUNDS} rounds")]
    RejectionLoop,

    #[error("cannot hash zero values or an empty list")]
    EmptyHash,

    #[error("cannot build an empty container without supplying its group")]
    EmptyWithoutGroup,
}

pub type CryptoResult<T> = Result<T, CryptoError>;

impl CryptoError {
    /// Shorthand for the most common failure kind.
    pub fn invalid(msg: impl Into<String>) -> Self {
        CryptoError::InvalidArgument(msg.into())
    }
}

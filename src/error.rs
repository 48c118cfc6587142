/// Errors raised while splitting, combining or refreshing shares.
///
/// Every variant except `Randomness` is an input error: nothing here is
/// transient and retrying with the same arguments fails the same way.
#[derive(Debug, thiserror::Error)]
pub enum SharingError {
    /// Share count or threshold out of bounds, empty secret, too few shares.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Zero or duplicated x-coordinate.
    #[error("malformed share: {0}")]
    MalformedShare(String),

    /// Shares of unequal length, or a share too short to carry any data.
    #[error("length mismatch: {0}")]
    LengthMismatch(String),

    #[error("division by zero in GF(2^8)")]
    DivisionByZero,

    /// The randomness source failed; no shares were produced.
    #[error("randomness source failed: {0}")]
    Randomness(#[from] rand::Error),

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

pub type Result<T> = std::result::Result<T, SharingError>;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures raised by the sign-request and verification core.
///
/// A signature that recovers to a different address is *not* an error; it is
/// a successful `false` verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    #[error("Signer recovery failed: {0}")]
    RecoveryFailure(String),
}

impl Error {
    /// True for errors caused by a malformed request rather than by the
    /// recovery primitive.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::InvalidSignatureFormat(_))
    }
}

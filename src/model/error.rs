use thiserror::Error;

/// The standard result type used throughout the application.
pub type StdResult<T> = Result<T, anyhow::Error>;

/// Error returned by a single page fetch.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be sent or the response could not be read (includes timeouts).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote API answered with a non-success status code.
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(u16),

    /// The response body is not an array of repositories.
    #[error("Decoding error: {0}")]
    Decode(String),
}

/// Error raised before any network activity when the inputs are unusable.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidArguments {
    /// The credential environment variable is missing or empty.
    #[error("GitHub token is not set. Please set the {0} environment variable.")]
    MissingCredential(String),

    /// The account name is empty.
    #[error("Account name must not be empty")]
    EmptyAccount,

    /// Page numbers start at 1.
    #[error("Page number must be at least 1, got {0}")]
    PageNumberOutOfRange(u32),

    /// Page size must be between 1 and the API maximum.
    #[error("Page size must be between 1 and {max}, got {0}", max = crate::MAX_PAGE_SIZE)]
    PageSizeOutOfRange(u16),

    /// An optional setting holds a value that is not understood.
    #[error("Invalid value {value:?} for {name}")]
    InvalidSetting { name: String, value: String },
}

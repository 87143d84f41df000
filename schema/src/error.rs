use thiserror::Error;

/// Failures raised while looking up or creating a flight
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("malformed flight identifier: {0:?}")]
    MalformedId(String),

    #[error("unknown city code: {0:?}")]
    UnknownCity(String),
}

/// Raised by a consumer that could not apply a price update
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("price update rejected: {0}")]
pub struct UpdateError(pub String);

/// Failures raised by a display sink
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("display unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

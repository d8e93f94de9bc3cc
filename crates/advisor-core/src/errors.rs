/// Core error type for the advisor relay.
///
/// Adapter crates map their specific errors into this type so the request
/// handler and notifier can treat failures uniformly.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid photo: {0}")]
    Photo(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;

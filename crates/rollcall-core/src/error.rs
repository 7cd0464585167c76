use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid card identifier: {0}")]
    InvalidIdentifier(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

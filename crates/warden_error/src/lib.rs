pub mod from;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WardenError>;

#[derive(Error, Debug)]
pub enum WardenError {
    #[error("Invalid input {0}")]
    InvalidInput(String),
    #[error("Unsupported hash algorithm {0}")]
    UnsupportedHash(String),
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
    #[error("Credential store error: {0}")]
    CredentialStore(String),
    #[error("Directory error: {0}")]
    Directory(String),
    #[error("Argument error: {0}")]
    ArgumentError(String),
    #[error("Internal error {0}")]
    Internal(String),
}

impl WardenError {
    pub fn new<T: std::fmt::Display>(msg: T) -> Self {
        WardenError::Internal(msg.to_string())
    }
}

use crate::WardenError;

impl From<std::io::Error> for WardenError {
    fn from(err: std::io::Error) -> Self {
        WardenError::CredentialStore(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for WardenError {
    fn from(err: bcrypt::BcryptError) -> Self {
        WardenError::MalformedHash(err.to_string())
    }
}

impl From<base64::DecodeError> for WardenError {
    fn from(err: base64::DecodeError) -> Self {
        WardenError::InvalidInput(err.to_string())
    }
}

impl From<std::str::Utf8Error> for WardenError {
    fn from(err: std::str::Utf8Error) -> Self {
        WardenError::InvalidInput(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for WardenError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        WardenError::InvalidInput(err.to_string())
    }
}

impl From<serde_json::Error> for WardenError {
    fn from(err: serde_json::Error) -> Self {
        WardenError::ArgumentError(err.to_string())
    }
}

impl From<anyhow::Error> for WardenError {
    fn from(err: anyhow::Error) -> Self {
        WardenError::Directory(err.to_string())
    }
}

//! Error types for garb

use std::fmt;

/// Main error type for garb operations
#[derive(Debug)]
pub enum GarbError {
    /// Package format not supported
    UnsupportedFormat(String),

    /// Package verification failed
    VerificationFailed(String),

    /// Remote asset could not be retrieved
    Fetch(String),

    /// Raw pixel data could not be encoded as an image
    UnsupportedImage(String),

    /// Configuration document could not be serialized
    Serialization(String),

    /// Archive read/write error
    Archive(zip::result::ZipError),

    /// IO error
    IoError(std::io::Error),

    /// JSON parsing error
    JsonError(serde_json::Error),

    /// Generic error with message
    Generic(String),
}

impl fmt::Display for GarbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GarbError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {msg}"),
            GarbError::VerificationFailed(msg) => write!(f, "Verification failed: {msg}"),
            GarbError::Fetch(msg) => write!(f, "Fetch error: {msg}"),
            GarbError::UnsupportedImage(msg) => write!(f, "Unsupported image: {msg}"),
            GarbError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            GarbError::Archive(err) => write!(f, "Archive error: {err}"),
            GarbError::IoError(err) => write!(f, "IO error: {err}"),
            GarbError::JsonError(err) => write!(f, "JSON error: {err}"),
            GarbError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GarbError {}

impl From<std::io::Error> for GarbError {
    fn from(err: std::io::Error) -> Self {
        GarbError::IoError(err)
    }
}

impl From<serde_json::Error> for GarbError {
    fn from(err: serde_json::Error) -> Self {
        GarbError::JsonError(err)
    }
}

impl From<zip::result::ZipError> for GarbError {
    fn from(err: zip::result::ZipError) -> Self {
        GarbError::Archive(err)
    }
}

impl From<image::ImageError> for GarbError {
    fn from(err: image::ImageError) -> Self {
        GarbError::UnsupportedImage(err.to_string())
    }
}

impl From<bson::ser::Error> for GarbError {
    fn from(err: bson::ser::Error) -> Self {
        GarbError::Serialization(err.to_string())
    }
}

impl From<bson::de::Error> for GarbError {
    fn from(err: bson::de::Error) -> Self {
        GarbError::Serialization(err.to_string())
    }
}

/// Result type for garb operations
pub type Result<T> = std::result::Result<T, GarbError>;

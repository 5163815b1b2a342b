//! Custom error types for the application.
//!
//! Provides structured error handling with meaningful error messages
//! and proper error categorization for each domain:
//!
//! - [`FetchError`] - Network/fetch-related errors for HTTP requests
//! - [`StorageError`] - localStorage operations for favorites and cache flags
//! - [`ReaderError`] - E-book rendering engine failures

use thiserror::Error;

/// Network/fetch-related errors for HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Browser window not available
    #[error("Browser window not available")]
    NoWindow,
    /// Failed to create HTTP request
    #[error("Failed to create request")]
    RequestCreationFailed,
    /// Network request failed (CORS, offline, etc.)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// HTTP error response (non-2xx status)
    #[error("HTTP error: {0}")]
    HttpError(u16),
    /// Failed to read response body
    #[error("Failed to read response")]
    ResponseReadFailed,
    /// Invalid response content
    #[error("Invalid response content")]
    InvalidContent,
    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParseError(String),
    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

/// Errors for durable key-value storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// localStorage not available (private mode, disabled, no window).
    #[error("localStorage not available")]
    Unavailable,
    /// Failed to serialize data to JSON.
    #[error("failed to serialize value: {0}")]
    SerializationFailed(String),
    /// Failed to write to storage (quota, permissions).
    #[error("failed to write key '{0}'")]
    WriteFailed(String),
}

/// E-book reader errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderError {
    /// The rendering engine script is not loaded.
    #[error("e-book engine not available")]
    EngineUnavailable,
    /// The viewport element to render into does not exist.
    #[error("reader viewport '{0}' not found")]
    ViewportMissing(String),
    /// The engine failed to load or display the document.
    #[error("failed to open book: {0}")]
    OpenFailed(String),
}

// SPDX-License-Identifier: MPL-2.0

//! Error types for the scanner

use crate::backends::camera::BackendError;
use thiserror::Error;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Scan workflow errors
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
    /// Decode script errors
    #[error("Script error: {0}")]
    Script(String),
    /// Storage/filesystem errors
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Conditions raised by the scan screen
///
/// None of these are fatal: the screen handles all of them locally and only
/// `PermissionDenied` is ever shown to the user as an alert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Camera access was refused
    #[error("Camera permission denied")]
    PermissionDenied,
    /// The permission query has not answered yet
    #[error("Camera permission not resolved yet")]
    PermissionPending,
    /// Empty or unsupported decode payload
    #[error("Malformed decode event: {0}")]
    MalformedDecodeEvent(MalformedReason),
    /// Event for a session that already produced its result or was stopped
    #[error("Duplicate decode event")]
    DuplicateDecodeEvent,
    /// The decoder could not be started
    #[error("Decoder error: {0}")]
    Decoder(BackendError),
    /// The screen is not mounted
    #[error("Scan screen is not active")]
    ScreenInactive,
    /// Mounted outside a tokio runtime, so background work cannot run
    #[error("No async runtime available")]
    RuntimeUnavailable,
}

/// Why a decode event was rejected as malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    /// Payload was empty or only whitespace
    #[error("empty payload")]
    EmptyPayload,
    /// Symbology name not recognized
    #[error("unknown symbology '{0}'")]
    UnknownSymbology(String),
    /// Symbology not part of the active scan mode
    #[error("symbology '{0}' not enabled for this session")]
    UnsupportedSymbology(String),
}

impl From<BackendError> for ScanError {
    fn from(err: BackendError) -> Self {
        ScanError::Decoder(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_converts_into_app_error() {
        let err: AppError = ScanError::PermissionDenied.into();
        assert!(matches!(err, AppError::Scan(ScanError::PermissionDenied)));
        assert_eq!(err.to_string(), "Scan error: Camera permission denied");
    }

    #[test]
    fn test_malformed_reason_display() {
        let err = ScanError::MalformedDecodeEvent(MalformedReason::UnknownSymbology(
            "aztec".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "Malformed decode event: unknown symbology 'aztec'"
        );
    }
}

// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use crate::constants::Symbology;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Answer of the platform camera-permission service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// The user allowed camera access
    Granted,
    /// The user refused camera access (or the prompt could not be shown)
    Denied,
}

/// A code recognized by the camera decoder
///
/// The symbology is kept as the raw string the hardware reported; parsing
/// happens when the scan session validates the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeEvent {
    /// Symbology name as reported by the decoder (e.g. "code128")
    #[serde(rename = "type")]
    pub kind: String,
    /// Decoded payload
    pub data: String,
}

impl DecodeEvent {
    pub fn new(kind: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }

    /// Build an event for a known symbology
    pub fn from_symbology(symbology: Symbology, data: impl Into<String>) -> Self {
        Self::new(symbology.wire_name(), data)
    }

    /// Parse the reported symbology
    pub fn symbology(&self) -> Option<Symbology> {
        self.kind.parse().ok()
    }
}

type EmitFn = dyn Fn(Uuid, DecodeEvent) -> bool + Send + Sync;

/// Where a decoder delivers its events while it is active
///
/// A sink is bound to exactly one listening session. Cloning is cheap; all
/// clones tag events with the same session id.
#[derive(Clone)]
pub struct DecodeSink {
    session_id: Uuid,
    emit: Arc<EmitFn>,
}

impl DecodeSink {
    pub fn new<F>(session_id: Uuid, emit: F) -> Self
    where
        F: Fn(Uuid, DecodeEvent) -> bool + Send + Sync + 'static,
    {
        Self {
            session_id,
            emit: Arc::new(emit),
        }
    }

    /// Session this sink belongs to
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Deliver an event, returns false once the consumer is gone
    pub fn emit(&self, event: DecodeEvent) -> bool {
        (self.emit)(self.session_id, event)
    }
}

impl std::fmt::Debug for DecodeSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeSink")
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Backend is not available on this system
    #[error("Backend not available: {0}")]
    NotAvailable(String),
    /// Failed to start the decoder
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),
    /// Camera is held by another consumer
    #[error("Camera is busy")]
    Busy,
    /// No symbologies were requested
    #[error("No symbologies configured")]
    NoSymbologies,
    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! The scan screen never talks to camera hardware directly. It goes through two
//! traits that a platform layer implements:
//!
//! ```text
//! ┌─────────────────────┐
//! │     ScanScreen      │
//! └──────┬───────┬──────┘
//!        │       │
//!        ▼       ▼
//! ┌──────────┐ ┌──────────────┐
//! │Permission│ │DecoderBackend│  ← start/stop + DecodeSink
//! │ Service  │ └──────────────┘
//! └──────────┘
//! ```
//!
//! Reference implementations live in [`crate::backends::virtual_camera`].

pub mod types;

pub use types::*;

use crate::constants::Symbology;
use futures::future::BoxFuture;

/// Platform service that asks the user for camera access
pub trait CameraPermissionService: Send + Sync {
    /// Ask for camera access
    ///
    /// May suspend for as long as the system prompt is on screen. The scan
    /// screen calls this exactly once per mount.
    fn request_camera_access(&self) -> BoxFuture<'static, PermissionStatus>;
}

/// Camera decoder controls
///
/// The camera sensor is a singleton: a backend serves at most one listening
/// session at a time and must only deliver events through the sink passed to
/// the most recent [`start`](DecoderBackend::start).
pub trait DecoderBackend: Send {
    /// Activate decoding for the given symbologies
    ///
    /// # Returns
    /// * `Ok(())` - Decoder is listening
    /// * `Err(BackendError::Busy)` - Decoder already active
    /// * `Err(BackendError)` - Decoder could not be started
    fn start(&mut self, symbologies: &'static [Symbology], sink: DecodeSink) -> BackendResult<()>;

    /// Deactivate decoding and drop the sink
    ///
    /// Calling this while inactive does nothing.
    fn stop(&mut self);

    /// Check if the decoder is currently listening
    fn is_active(&self) -> bool;

    /// Symbologies the decoder was configured with, if active
    fn active_symbologies(&self) -> Option<&'static [Symbology]>;
}

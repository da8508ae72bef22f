// SPDX-License-Identifier: MPL-2.0

//! ByeByeExpired scanner - barcode and QR scan workflow for an inventory tracker
//!
//! This library provides the scan screen of the ByeByeExpired app: camera
//! permission negotiation, scan mode selection, the scan session state
//! machine, the animated scan indicator and the hand-off of decoded payloads.
//! Decoding itself is done by the device's camera subsystem behind the
//! [`backends::camera::DecoderBackend`] trait.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Scan screen state, message handling, result hand-off
//! - [`backends`]: Camera permission and decoder abstraction, reference backends
//! - [`config`]: User configuration handling
//! - [`terminal`]: Interactive terminal rendering of the scan screen
//!
//! # Example
//!
//! ```ignore
//! let (decoder, handle) = ManualDecoder::new();
//! let mut screen = ScanScreen::new(&Config::default(), ScreenServices { .. });
//! screen.mount()?;
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod terminal;

// Re-export commonly used types
pub use app::{Message, ScanMode, ScanResult, ScanScreen, ScreenServices};
pub use config::Config;
pub use constants::Symbology;
pub use errors::{AppError, AppResult, ScanError};

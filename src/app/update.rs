// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The `update()` function is the only place screen state changes. It routes
//! each message to a focused handler in the `handlers` submodules:
//!
//! - `handlers::scan`: Start, stop, decode events, result acknowledgement
//! - `handlers::mode`: Scan mode selection
//! - `handlers::system`: Permission answers and back navigation

use crate::app::ScanScreen;
use crate::app::state::Message;
use crate::errors::ScanError;
use tracing::{debug, error, info};

impl ScanScreen {
    /// Main message handler - routes messages to appropriate handler methods.
    ///
    /// Errors are handled here (logged, and for a refused permission shown as
    /// an alert); they are returned so callers can observe the outcome.
    pub fn update(&mut self, message: Message) -> Result<(), ScanError> {
        if !self.is_mounted() {
            debug!(?message, lifecycle = ?self.lifecycle(), "Screen not mounted, message ignored");
            return Err(ScanError::ScreenInactive);
        }

        let result = match message {
            // ===== Permission =====
            Message::PermissionResolved(state) => {
                self.handle_permission_resolved(state);
                Ok(())
            }

            // ===== Mode =====
            Message::SetMode(mode) => {
                self.handle_set_mode(mode);
                Ok(())
            }
            Message::ToggleMode => {
                self.handle_toggle_mode();
                Ok(())
            }

            // ===== Session =====
            Message::StartScan => self.handle_start_scan(),
            Message::StopScan => {
                self.handle_stop_scan();
                Ok(())
            }
            Message::Decoded { session_id, event } => self.handle_decoded(session_id, event),
            Message::AcknowledgeResult => {
                self.handle_acknowledge_result();
                Ok(())
            }

            // ===== Navigation =====
            Message::NavigateBack => {
                self.handle_navigate_back();
                Ok(())
            }
        };

        if let Err(err) = &result {
            match err {
                ScanError::MalformedDecodeEvent(reason) => {
                    debug!(%reason, "Malformed decode event ignored")
                }
                ScanError::DuplicateDecodeEvent => debug!("Duplicate decode event ignored"),
                ScanError::PermissionPending => info!("Scan requested before permission answer"),
                ScanError::PermissionDenied => info!("Scan refused, no camera permission"),
                ScanError::Decoder(e) => error!(error = %e, "Decoder failure"),
                ScanError::RuntimeUnavailable => error!("No async runtime for background work"),
                ScanError::ScreenInactive => {}
            }
        }
        result
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Scan session handlers
//!
//! Handles starting and stopping the decoder, decode events, and dismissal of
//! the result alert.

use crate::app::ScanScreen;
use crate::app::state::Message;
use crate::backends::camera::{DecodeEvent, DecodeSink};
use crate::errors::ScanError;
use tracing::{debug, error, info};
use uuid::Uuid;

impl ScanScreen {
    // =========================================================================
    // Session Handlers
    // =========================================================================

    pub(crate) fn handle_start_scan(&mut self) -> Result<(), ScanError> {
        if self.session.is_active() {
            debug!("Scan already running");
            return Ok(());
        }

        if let Err(err) = self.permission.check() {
            match &err {
                ScanError::PermissionDenied => {
                    self.handoff.permission_denied();
                    self.status = Some("Camera access denied".to_string());
                }
                _ => {
                    self.status = Some("Waiting for camera permission...".to_string());
                }
            }
            return Err(err);
        }

        // Completed -> Idle before restarting, so a failed start still lands in Idle
        if self.session.acknowledge() {
            debug!("Previous result superseded by new scan");
        }

        let session_id = Uuid::new_v4();
        let symbologies = self.mode.symbologies();
        let inbox = self.inbox_tx.clone();
        let sink = DecodeSink::new(session_id, move |session_id, event| {
            inbox.send(Message::Decoded { session_id, event }).is_ok()
        });

        if let Err(err) = self.decoder.start(symbologies, sink) {
            error!(error = %err, mode = %self.mode, "Failed to start decoder");
            self.status = Some(format!("Camera unavailable: {}", err));
            return Err(err.into());
        }

        self.session.begin(session_id, symbologies);
        info!(session = %session_id, mode = %self.mode, "Scan started");
        self.status = Some(format!("Scanning for {}...", self.mode.display_name()));
        Ok(())
    }

    pub(crate) fn handle_stop_scan(&mut self) {
        if !self.session.cancel() {
            debug!("No scan running, stop ignored");
            return;
        }
        self.decoder.stop();
        info!("Scan stopped");
        self.status = Some("Scan stopped".to_string());
    }

    pub(crate) fn handle_decoded(
        &mut self,
        session_id: Uuid,
        event: DecodeEvent,
    ) -> Result<(), ScanError> {
        let listened = self.session.listening_for();
        let result = self.session.accept(session_id, &event)?.clone();
        debug!(session = %session_id, ?listened, "Decode event accepted");

        self.decoder.stop();
        self.handoff.deliver(&result);
        self.status = Some(format!("Scanned {}", result.symbology.display_name()));
        Ok(())
    }

    pub(crate) fn handle_acknowledge_result(&mut self) {
        if self.session.acknowledge() {
            debug!("Scan result acknowledged");
            self.status = None;
        }
    }
}

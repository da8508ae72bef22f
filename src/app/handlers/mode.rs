// SPDX-License-Identifier: GPL-3.0-only

//! Scan mode handlers
//!
//! The mode is locked while a session is listening; the decoder keeps the
//! symbologies it was started with.

use crate::app::ScanScreen;
use crate::app::state::ScanMode;
use tracing::{debug, info};

impl ScanScreen {
    pub(crate) fn handle_set_mode(&mut self, mode: ScanMode) {
        if self.session.is_active() {
            debug!(requested = %mode, current = %self.mode, "Mode locked while scanning");
            return;
        }
        if self.mode == mode {
            return;
        }
        info!(from = %self.mode, to = %mode, "Scan mode changed");
        self.mode = mode;
    }

    pub(crate) fn handle_toggle_mode(&mut self) {
        self.handle_set_mode(self.mode.toggled());
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles the camera permission answer and leaving the screen.

use crate::app::ScanScreen;
use crate::app::state::PermissionState;
use tracing::info;

impl ScanScreen {
    pub(crate) fn handle_permission_resolved(&mut self, state: PermissionState) {
        if !self.permission.resolve(state) {
            return;
        }
        self.status = match state {
            PermissionState::Granted => Some("Ready to scan".to_string()),
            PermissionState::Denied => Some("Camera access denied".to_string()),
            PermissionState::Unknown => None,
        };
    }

    pub(crate) fn handle_navigate_back(&mut self) {
        info!("Leaving scan screen");
        self.unmount();
        self.navigator.navigate_back();
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission gate
//!
//! Asks the platform once per mount, caches the answer, and refuses to let a
//! scan start unless access was granted.

use crate::app::state::{Message, PermissionState};
use crate::backends::camera::CameraPermissionService;
use crate::errors::ScanError;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

#[derive(Debug, Default)]
pub struct PermissionGate {
    state: PermissionState,
    requested: bool,
    query: Option<JoinHandle<()>>,
}

impl PermissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    /// Whether the query is still waiting for an answer
    pub fn is_pending(&self) -> bool {
        self.state == PermissionState::Unknown
    }

    /// Start the permission query, at most once
    ///
    /// The answer arrives as [`Message::PermissionResolved`] on `inbox`. A query
    /// that takes longer than `timeout` resolves to `Denied`.
    pub fn request(
        &mut self,
        runtime: &Handle,
        service: &Arc<dyn CameraPermissionService>,
        timeout: Duration,
        inbox: mpsc::UnboundedSender<Message>,
    ) -> bool {
        if self.requested {
            debug!("Camera permission already requested for this screen");
            return false;
        }
        self.requested = true;

        let query = service.request_camera_access();
        self.query = Some(runtime.spawn(async move {
            let state = match tokio::time::timeout(timeout, query).await {
                Ok(status) => PermissionState::from(status),
                Err(_) => {
                    error!(?timeout, "Camera permission request timed out");
                    PermissionState::Denied
                }
            };
            // The screen may already be gone; nothing to do then
            let _ = inbox.send(Message::PermissionResolved(state));
        }));
        true
    }

    /// Record the answer; only the first one counts
    pub fn resolve(&mut self, state: PermissionState) -> bool {
        if self.state != PermissionState::Unknown || state == PermissionState::Unknown {
            debug!(current = ?self.state, ignored = ?state, "Permission already resolved");
            return false;
        }
        info!(?state, "Camera permission resolved");
        self.state = state;
        self.query = None;
        true
    }

    /// Whether a scan may start now
    pub fn check(&self) -> Result<(), ScanError> {
        match self.state {
            PermissionState::Granted => Ok(()),
            PermissionState::Denied => Err(ScanError::PermissionDenied),
            PermissionState::Unknown => Err(ScanError::PermissionPending),
        }
    }

    /// Abort a query that has not answered yet
    pub fn cancel(&mut self) {
        if let Some(query) = self.query.take() {
            query.abort();
            debug!("Pending permission query aborted");
        }
    }
}

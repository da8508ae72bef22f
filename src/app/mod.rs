// SPDX-License-Identifier: MPL-2.0

//! Scan screen
//!
//! This module contains the screen-owned state object for the barcode/QR scan
//! workflow and everything it coordinates.
//!
//! # Architecture
//!
//! - `state`: Session state machine, scan modes, permission state, messages
//! - `permission`: Camera permission gate
//! - `scan_indicator`: Animated scan line driver
//! - `handoff`: Result and alert delivery
//! - `navigation`: Navigation host seam
//! - `update`: Message dispatch
//! - `handlers`: Message handlers grouped by concern
//!
//! # Main Types
//!
//! - `ScanScreen`: One mounted instance of the scan screen
//! - `Message`: Everything that can happen to it

pub mod cancellation;
mod handlers;
pub mod handoff;
pub mod navigation;
pub mod permission;
pub mod scan_indicator;
pub mod state;
mod update;

pub use handoff::{
    Notification, NotificationLog, NotificationSurface, PayloadKind, ResultHandoff, ScanResult,
};
pub use navigation::{NavigationHost, NavigationLog, NavigationRequest, Route, open_scanner};
pub use permission::PermissionGate;
pub use scan_indicator::ScanIndicator;
pub use state::{Lifecycle, Message, PermissionState, ScanMode, ScanSession, SessionPhase};

use crate::backends::camera::{CameraPermissionService, DecoderBackend};
use crate::config::Config;
use crate::errors::ScanError;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Collaborators the screen talks to
pub struct ScreenServices {
    pub permission: Arc<dyn CameraPermissionService>,
    pub decoder: Box<dyn DecoderBackend>,
    pub navigator: Arc<dyn NavigationHost>,
    pub notifier: Arc<dyn NotificationSurface>,
}

/// State of one scan screen, from mount to unmount
///
/// All mutation goes through [`ScanScreen::update`]. Background work (the
/// permission query, the indicator loop, the decoder) only posts messages to
/// the screen's inbox.
pub struct ScanScreen {
    lifecycle: Lifecycle,
    permission: PermissionGate,
    mode: ScanMode,
    session: ScanSession,
    indicator: Option<ScanIndicator>,
    permission_service: Arc<dyn CameraPermissionService>,
    decoder: Box<dyn DecoderBackend>,
    navigator: Arc<dyn NavigationHost>,
    handoff: ResultHandoff,
    inbox_tx: mpsc::UnboundedSender<Message>,
    inbox_rx: mpsc::UnboundedReceiver<Message>,
    /// One-line status for the UI
    status: Option<String>,
    indicator_period: Duration,
    frame_interval: Duration,
    permission_timeout: Duration,
}

impl ScanScreen {
    pub fn new(config: &Config, services: ScreenServices) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            lifecycle: Lifecycle::Created,
            permission: PermissionGate::new(),
            mode: config.default_mode,
            session: ScanSession::new(),
            indicator: None,
            permission_service: services.permission,
            decoder: services.decoder,
            navigator: services.navigator,
            handoff: ResultHandoff::new(services.notifier),
            inbox_tx,
            inbox_rx,
            status: None,
            indicator_period: config.indicator_period(),
            frame_interval: config.frame_interval(),
            permission_timeout: config.permission_timeout(),
        }
    }

    /// Forward accepted results to `sink` in addition to the alert
    pub fn with_result_sink(mut self, sink: mpsc::UnboundedSender<ScanResult>) -> Self {
        self.handoff.set_sink(sink);
        self
    }

    /// Show the screen: ask for camera access and start the indicator
    ///
    /// A screen mounts only once; later calls return `Ok(false)`. Outside a
    /// tokio runtime nothing is started and the screen stays unmounted.
    pub fn mount(&mut self) -> Result<bool, ScanError> {
        if self.lifecycle != Lifecycle::Created {
            warn!(lifecycle = ?self.lifecycle, "Scan screen can only be mounted once");
            return Ok(false);
        }
        let runtime = Handle::try_current().map_err(|err| {
            error!(error = %err, "Scan screen needs a tokio runtime to mount");
            ScanError::RuntimeUnavailable
        })?;

        self.lifecycle = Lifecycle::Mounted;
        self.permission.request(
            &runtime,
            &self.permission_service,
            self.permission_timeout,
            self.inbox_tx.clone(),
        );
        self.indicator = Some(ScanIndicator::start(
            &runtime,
            self.indicator_period,
            self.frame_interval,
        ));
        self.status = Some("Waiting for camera permission...".to_string());
        info!(mode = %self.mode, "Scan screen mounted");
        Ok(true)
    }

    /// Tear the screen down
    ///
    /// Stops the decoder and the indicator and abandons a pending permission
    /// query. Messages still in the inbox are discarded.
    pub fn unmount(&mut self) {
        if self.lifecycle != Lifecycle::Mounted {
            return;
        }
        if self.session.cancel() {
            debug!("Listening session cancelled by unmount");
        }
        self.decoder.stop();
        if let Some(mut indicator) = self.indicator.take() {
            indicator.stop();
        }
        self.permission.cancel();
        self.inbox_rx.close();
        while self.inbox_rx.try_recv().is_ok() {}
        self.lifecycle = Lifecycle::Unmounted;
        info!("Scan screen unmounted");
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    pub fn permission_state(&self) -> PermissionState {
        self.permission.state()
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Whether the mode buttons accept input
    pub fn mode_selectable(&self) -> bool {
        !self.session.is_active()
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn phase(&self) -> &SessionPhase {
        self.session.phase()
    }

    pub fn is_scanning(&self) -> bool {
        self.session.is_active()
    }

    pub fn last_result(&self) -> Option<&ScanResult> {
        self.session.last_result()
    }

    pub fn decoder_active(&self) -> bool {
        self.decoder.is_active()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Current indicator progress in `[0, 1)`, 0 when not mounted
    pub fn indicator_progress(&self) -> f32 {
        self.indicator
            .as_ref()
            .map_or(0.0, ScanIndicator::progress)
    }

    /// Indicator updates, while mounted
    pub fn subscribe_indicator(&self) -> Option<watch::Receiver<f32>> {
        self.indicator.as_ref().map(ScanIndicator::subscribe)
    }

    /// Results delivered on this screen so far
    pub fn delivered_count(&self) -> usize {
        self.handoff.delivered_count()
    }

    /// Post a message to the screen's own inbox
    pub fn post(&self, message: Message) -> bool {
        self.inbox_tx.send(message).is_ok()
    }

    /// Wait for the next message from a background task
    ///
    /// Returns `None` once the screen is unmounted.
    pub async fn next_message(&mut self) -> Option<Message> {
        if !self.is_mounted() {
            return None;
        }
        self.inbox_rx.recv().await
    }

    /// Apply every message already waiting in the inbox
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while self.is_mounted() {
            let Ok(message) = self.inbox_rx.try_recv() else {
                break;
            };
            let _ = self.update(message);
            processed += 1;
        }
        processed
    }
}

impl Drop for ScanScreen {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_camera::{ManualDecoder, ManualDecoderHandle, StaticPermission};

    fn screen(permission: StaticPermission) -> (ScanScreen, ManualDecoderHandle, NotificationLog) {
        let (decoder, handle) = ManualDecoder::new();
        let log = NotificationLog::new();
        let screen = ScanScreen::new(
            &Config::default(),
            ScreenServices {
                permission: Arc::new(permission),
                decoder: Box::new(decoder),
                navigator: Arc::new(NavigationLog::new()),
                notifier: Arc::new(log.clone()),
            },
        );
        (screen, handle, log)
    }

    #[tokio::test]
    async fn test_mount_resolves_permission() {
        let (mut screen, _handle, _log) = screen(StaticPermission::granted());
        assert_eq!(screen.mount(), Ok(true));
        assert_eq!(screen.mount(), Ok(false));
        assert_eq!(screen.permission_state(), PermissionState::Unknown);

        let message = screen.next_message().await.unwrap();
        screen.update(message).unwrap();
        assert_eq!(screen.permission_state(), PermissionState::Granted);
    }

    #[tokio::test]
    async fn test_unmount_closes_inbox() {
        let (mut screen, _handle, _log) = screen(StaticPermission::granted());
        screen.mount().unwrap();
        screen.unmount();
        assert_eq!(screen.lifecycle(), Lifecycle::Unmounted);
        assert!(!screen.post(Message::StartScan));
        assert!(screen.next_message().await.is_none());
        assert!(screen.subscribe_indicator().is_none());
    }

    #[test]
    fn test_mount_outside_runtime_fails() {
        let (mut screen, handle, _log) = screen(StaticPermission::granted());
        assert_eq!(screen.mount(), Err(ScanError::RuntimeUnavailable));
        assert_eq!(screen.lifecycle(), Lifecycle::Created);
        assert!(screen.subscribe_indicator().is_none());
        assert_eq!(handle.start_count(), 0);
    }
}

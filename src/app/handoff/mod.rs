// SPDX-License-Identifier: MPL-2.0

//! Result handoff
//!
//! Delivers accepted scan results to the user (a one-shot alert) and to the
//! surrounding inventory app (an optional result channel). Also carries the
//! permission-denied alert, the only error the user ever sees.

mod types;

pub use types::{PayloadKind, ScanResult, is_valid_gtin};

use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// A one-shot alert for the user
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A code was scanned
    ScanSucceeded(ScanResult),
    /// Camera access was refused and a scan was attempted
    PermissionDenied,
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self {
            Notification::ScanSucceeded(_) => "Success!",
            Notification::PermissionDenied => "No permission",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notification::ScanSucceeded(result) => {
                format!("Scan successful!\nData: {}", result.payload)
            }
            Notification::PermissionDenied => {
                "Camera access is not allowed. Please enable it in Settings.".to_string()
            }
        }
    }
}

/// Surface able to show alerts
///
/// Implementations only display; queuing and dismissal belong to the UI.
pub trait NotificationSurface: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notification surface that keeps every alert in memory
///
/// Used by the headless `simulate` command and by tests.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all alerts so far
    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Alert at `index`, in the order they were raised
    pub fn get(&self, index: usize) -> Option<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of permission-denied alerts
    pub fn denial_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|n| matches!(n, Notification::PermissionDenied))
            .count()
    }
}

impl NotificationSurface for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Hands accepted results to the user and to the inventory app
pub struct ResultHandoff {
    surface: Arc<dyn NotificationSurface>,
    sink: Option<mpsc::UnboundedSender<ScanResult>>,
    delivered: usize,
}

impl ResultHandoff {
    pub fn new(surface: Arc<dyn NotificationSurface>) -> Self {
        Self {
            surface,
            sink: None,
            delivered: 0,
        }
    }

    /// Also forward every result to `sink`
    pub fn with_sink(mut self, sink: mpsc::UnboundedSender<ScanResult>) -> Self {
        self.set_sink(sink);
        self
    }

    pub fn set_sink(&mut self, sink: mpsc::UnboundedSender<ScanResult>) {
        self.sink = Some(sink);
    }

    /// Present a result to the user and forward it
    ///
    /// The alert is always shown, even when the forwarding channel is gone.
    pub fn deliver(&mut self, result: &ScanResult) {
        info!(
            session = %result.session_id,
            symbology = %result.symbology,
            kind = ?result.kind,
            payload_len = result.payload.len(),
            "Scan result delivered"
        );
        self.surface
            .notify(Notification::ScanSucceeded(result.clone()));

        if let Some(sink) = &self.sink
            && sink.send(result.clone()).is_err()
        {
            warn!("Result receiver dropped, further results are only shown to the user");
            self.sink = None;
        }
        self.delivered += 1;
    }

    /// Show the permission-denied alert
    pub fn permission_denied(&self) {
        warn!("Scan attempted without camera permission");
        self.surface.notify(Notification::PermissionDenied);
    }

    /// Results delivered since creation
    pub fn delivered_count(&self) -> usize {
        self.delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Symbology;
    use uuid::Uuid;

    fn result(payload: &str) -> ScanResult {
        ScanResult::new(Uuid::new_v4(), Symbology::Code128, payload.to_string())
    }

    #[test]
    fn test_deliver_notifies_and_forwards() {
        let log = NotificationLog::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handoff = ResultHandoff::new(Arc::new(log.clone())).with_sink(tx);

        handoff.deliver(&result("9988776655"));

        assert_eq!(log.len(), 1);
        assert_eq!(rx.try_recv().unwrap().payload, "9988776655");
        assert_eq!(handoff.delivered_count(), 1);
    }

    #[test]
    fn test_closed_sink_still_notifies() {
        let log = NotificationLog::new();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut handoff = ResultHandoff::new(Arc::new(log.clone())).with_sink(tx);

        handoff.deliver(&result("A"));
        handoff.deliver(&result("B"));

        assert_eq!(log.len(), 2);
        assert_eq!(handoff.delivered_count(), 2);
    }

    #[test]
    fn test_notification_text() {
        let n = Notification::ScanSucceeded(result("XYZ"));
        assert_eq!(n.title(), "Success!");
        assert!(n.body().ends_with("Data: XYZ"));
        assert_eq!(Notification::PermissionDenied.title(), "No permission");
    }
}

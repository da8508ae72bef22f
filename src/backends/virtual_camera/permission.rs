// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::{CameraPermissionService, PermissionStatus};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Permission service with a preconfigured answer
#[derive(Debug, Clone)]
pub struct StaticPermission {
    /// `None` never answers (prompt left open)
    answer: Option<PermissionStatus>,
    /// Simulated time the user spends on the prompt
    delay: Duration,
    requests: Arc<AtomicUsize>,
}

impl StaticPermission {
    pub fn new(status: PermissionStatus) -> Self {
        Self {
            answer: Some(status),
            delay: Duration::ZERO,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn granted() -> Self {
        Self::new(PermissionStatus::Granted)
    }

    pub fn denied() -> Self {
        Self::new(PermissionStatus::Denied)
    }

    /// A prompt that is never answered
    pub fn never() -> Self {
        Self {
            answer: None,
            ..Self::granted()
        }
    }

    /// Answer only after `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of times the prompt was requested (shared between clones)
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl CameraPermissionService for StaticPermission {
    fn request_camera_access(&self) -> BoxFuture<'static, PermissionStatus> {
        let count = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        let answer = self.answer;
        let delay = self.delay;
        debug!(count, ?answer, ?delay, "Camera permission requested");

        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match answer {
                Some(status) => status,
                None => futures::future::pending().await,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answers_configured_status() {
        let service = StaticPermission::denied();
        assert_eq!(
            service.request_camera_access().await,
            PermissionStatus::Denied
        );
        assert_eq!(service.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_respected() {
        let service = StaticPermission::granted().with_delay(Duration::from_secs(5));
        let start = tokio::time::Instant::now();
        assert_eq!(
            service.request_camera_access().await,
            PermissionStatus::Granted
        );
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}

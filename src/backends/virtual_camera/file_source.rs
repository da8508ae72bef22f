// SPDX-License-Identifier: GPL-3.0-only

//! Scripted decode events
//!
//! Replays decode events from a JSON file as if a camera were pointed at a
//! sequence of codes. The file is either a JSON array or JSON lines:
//!
//! ```text
//! {"type": "code128", "data": "9988776655", "delay_ms": 250}
//! {"type": "qr", "data": "https://example.com"}
//! ```
//!
//! `delay_ms` is measured from the previous event. Playback position is kept
//! across sessions, so each new scan continues where the last one stopped.

use crate::backends::camera::{BackendError, BackendResult, DecodeEvent, DecodeSink, DecoderBackend};
use crate::constants::Symbology;
use crate::errors::{AppError, AppResult};
use async_stream::stream;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// One entry of a decode script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    #[serde(flatten)]
    pub event: DecodeEvent,
    /// Wait before emitting, relative to the previous event
    #[serde(default)]
    pub delay_ms: u64,
}

/// Parse a decode script from JSON array or JSON lines text
pub fn parse_script(text: &str) -> AppResult<Vec<ScriptedEvent>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| AppError::Script(format!("invalid script: {}", e)));
    }

    trimmed
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map_err(|e| AppError::Script(format!("line {}: {}", index + 1, e)))
        })
        .collect()
}

/// Load a decode script from disk
pub fn load_script(path: &Path) -> AppResult<Vec<ScriptedEvent>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::Script(format!("{}: {}", path.display(), e)))?;
    let script = parse_script(&text)?;
    info!(path = %path.display(), events = script.len(), "Loaded decode script");
    Ok(script)
}

/// Shared playback position of a script
#[derive(Debug, Clone)]
pub struct ScriptCursor {
    position: Arc<AtomicUsize>,
    len: usize,
}

impl ScriptCursor {
    /// Index of the next event to be emitted
    pub fn position(&self) -> usize {
        self.position.load(Ordering::SeqCst)
    }

    /// Whether every event has been emitted
    pub fn is_exhausted(&self) -> bool {
        self.position() >= self.len
    }
}

/// Decoder that replays a [`ScriptedEvent`] list while listening
///
/// Must be started from within a tokio runtime.
pub struct ScriptedDecoder {
    script: Arc<[ScriptedEvent]>,
    cursor: ScriptCursor,
    task: Option<JoinHandle<()>>,
    symbologies: Option<&'static [Symbology]>,
}

impl ScriptedDecoder {
    pub fn new(script: Vec<ScriptedEvent>) -> Self {
        let len = script.len();
        Self {
            script: script.into(),
            cursor: ScriptCursor {
                position: Arc::new(AtomicUsize::new(0)),
                len,
            },
            task: None,
            symbologies: None,
        }
    }

    /// Playback position, shared with the replay task
    pub fn cursor(&self) -> ScriptCursor {
        self.cursor.clone()
    }
}

/// Yield script entries from the cursor onward, honoring their delays
///
/// The cursor only advances once the delay has elapsed, so an entry interrupted
/// by `stop` is replayed in full by the next session.
fn replay(script: Arc<[ScriptedEvent]>, cursor: ScriptCursor) -> impl Stream<Item = DecodeEvent> {
    stream! {
        loop {
            let index = cursor.position();
            let Some(entry) = script.get(index) else {
                break;
            };
            if entry.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(entry.delay_ms)).await;
            }
            cursor.position.store(index + 1, Ordering::SeqCst);
            yield entry.event.clone();
        }
    }
}

impl DecoderBackend for ScriptedDecoder {
    fn start(&mut self, symbologies: &'static [Symbology], sink: DecodeSink) -> BackendResult<()> {
        if self.is_active() {
            return Err(BackendError::Busy);
        }
        if symbologies.is_empty() {
            return Err(BackendError::NoSymbologies);
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| BackendError::NotAvailable(format!("no async runtime: {}", e)))?;

        let session = sink.session_id();
        let events = replay(Arc::clone(&self.script), self.cursor.clone());
        debug!(%session, position = self.cursor.position(), "Script replay starting");

        self.task = Some(runtime.spawn(async move {
            futures::pin_mut!(events);
            while let Some(event) = events.next().await {
                if !sink.emit(event) {
                    debug!(%session, "Decode consumer gone, replay ends");
                    return;
                }
            }
            debug!(%session, "Script exhausted");
        }));
        self.symbologies = Some(symbologies);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(position = self.cursor.position(), "Script replay stopped");
        }
        self.symbologies = None;
    }

    fn is_active(&self) -> bool {
        self.task.is_some()
    }

    fn active_symbologies(&self) -> Option<&'static [Symbology]> {
        self.symbologies
    }
}

impl Drop for ScriptedDecoder {
    fn drop(&mut self) {
        self.stop();
    }
}

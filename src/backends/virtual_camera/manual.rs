// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::{BackendError, BackendResult, DecodeEvent, DecodeSink, DecoderBackend};
use crate::constants::Symbology;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct ManualState {
    sink: Option<DecodeSink>,
    symbologies: Option<&'static [Symbology]>,
    starts: usize,
    stops: usize,
    fail_next_start: Option<BackendError>,
}

fn lock(state: &Mutex<ManualState>) -> MutexGuard<'_, ManualState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Decoder whose events are injected through a [`ManualDecoderHandle`]
///
/// Events are forwarded as-is, like raw hardware output: validation is left to
/// the scan session.
#[derive(Debug)]
pub struct ManualDecoder {
    state: Arc<Mutex<ManualState>>,
}

/// Remote control for a [`ManualDecoder`] owned by a scan screen
#[derive(Debug, Clone)]
pub struct ManualDecoderHandle {
    state: Arc<Mutex<ManualState>>,
}

impl ManualDecoder {
    pub fn new() -> (Self, ManualDecoderHandle) {
        let state = Arc::new(Mutex::new(ManualState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            ManualDecoderHandle { state },
        )
    }
}

impl DecoderBackend for ManualDecoder {
    fn start(&mut self, symbologies: &'static [Symbology], sink: DecodeSink) -> BackendResult<()> {
        let mut state = lock(&self.state);
        if state.sink.is_some() {
            return Err(BackendError::Busy);
        }
        if symbologies.is_empty() {
            return Err(BackendError::NoSymbologies);
        }
        if let Some(err) = state.fail_next_start.take() {
            return Err(err);
        }

        debug!(session = %sink.session_id(), ?symbologies, "Manual decoder started");
        state.sink = Some(sink);
        state.symbologies = Some(symbologies);
        state.starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = lock(&self.state);
        if state.sink.take().is_some() {
            state.symbologies = None;
            state.stops += 1;
            debug!("Manual decoder stopped");
        }
    }

    fn is_active(&self) -> bool {
        lock(&self.state).sink.is_some()
    }

    fn active_symbologies(&self) -> Option<&'static [Symbology]> {
        lock(&self.state).symbologies
    }
}

impl ManualDecoderHandle {
    /// Push an event as if the camera had decoded it
    ///
    /// Returns false when the decoder is not listening or the screen is gone.
    pub fn emit(&self, event: DecodeEvent) -> bool {
        // Clone the sink so the lock is not held while the consumer runs
        let sink = lock(&self.state).sink.clone();
        match sink {
            Some(sink) => sink.emit(event),
            None => {
                trace!(?event, "Decoder inactive, event dropped");
                false
            }
        }
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).sink.is_some()
    }

    pub fn active_symbologies(&self) -> Option<&'static [Symbology]> {
        lock(&self.state).symbologies
    }

    /// How many times the decoder was started
    pub fn start_count(&self) -> usize {
        lock(&self.state).starts
    }

    /// How many times an active decoder was stopped
    pub fn stop_count(&self) -> usize {
        lock(&self.state).stops
    }

    /// Make the next `start` fail with `err`
    pub fn fail_next_start(&self, err: BackendError) {
        lock(&self.state).fail_next_start = Some(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BARCODE_SYMBOLOGIES, QR_SYMBOLOGIES};
    use uuid::Uuid;

    fn counting_sink() -> (DecodeSink, Arc<Mutex<Vec<DecodeEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = Arc::clone(&events);
        let sink = DecodeSink::new(Uuid::new_v4(), move |_, event| {
            events_clone.lock().unwrap().push(event);
            true
        });
        (sink, events)
    }

    #[test]
    fn test_emit_only_while_active() {
        let (mut decoder, handle) = ManualDecoder::new();
        let (sink, events) = counting_sink();

        assert!(!handle.emit(DecodeEvent::new("qr", "before")));
        decoder.start(QR_SYMBOLOGIES, sink).unwrap();
        assert!(handle.emit(DecodeEvent::new("qr", "during")));
        decoder.stop();
        assert!(!handle.emit(DecodeEvent::new("qr", "after")));

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "during");
    }

    #[test]
    fn test_second_start_is_busy() {
        let (mut decoder, handle) = ManualDecoder::new();
        decoder.start(BARCODE_SYMBOLOGIES, counting_sink().0).unwrap();
        assert_eq!(
            decoder.start(QR_SYMBOLOGIES, counting_sink().0),
            Err(BackendError::Busy)
        );
        assert_eq!(handle.active_symbologies(), Some(BARCODE_SYMBOLOGIES));
        assert_eq!(handle.start_count(), 1);
    }

    #[test]
    fn test_stop_when_inactive_is_noop() {
        let (mut decoder, handle) = ManualDecoder::new();
        decoder.stop();
        assert_eq!(handle.stop_count(), 0);
    }

    #[test]
    fn test_injected_start_failure() {
        let (mut decoder, handle) = ManualDecoder::new();
        handle.fail_next_start(BackendError::NotAvailable("no camera".into()));
        assert!(decoder.start(QR_SYMBOLOGIES, counting_sink().0).is_err());
        assert!(!decoder.is_active());
        assert!(decoder.start(QR_SYMBOLOGIES, counting_sink().0).is_ok());
    }
}

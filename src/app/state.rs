// SPDX-License-Identifier: GPL-3.0-only

//! Scan screen state management

use crate::app::handoff::ScanResult;
use crate::backends::camera::{DecodeEvent, PermissionStatus};
use crate::constants::{BARCODE_SYMBOLOGIES, QR_SYMBOLOGIES, Symbology};
use crate::errors::{MalformedReason, ScanError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Camera access as known to the screen
///
/// Starts as `Unknown` and is resolved exactly once per mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// Query still in flight
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl From<PermissionStatus> for PermissionState {
    fn from(status: PermissionStatus) -> Self {
        match status {
            PermissionStatus::Granted => PermissionState::Granted,
            PermissionStatus::Denied => PermissionState::Denied,
        }
    }
}

/// Which family of codes the user wants to scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Two-dimensional codes (QR, PDF417)
    #[default]
    Qr,
    /// Linear retail and industrial barcodes
    Barcode,
}

impl ScanMode {
    pub const ALL: [ScanMode; 2] = [ScanMode::Qr, ScanMode::Barcode];

    /// Symbologies the decoder accepts in this mode
    pub fn symbologies(&self) -> &'static [Symbology] {
        match self {
            ScanMode::Qr => QR_SYMBOLOGIES,
            ScanMode::Barcode => BARCODE_SYMBOLOGIES,
        }
    }

    /// Get display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            ScanMode::Qr => "QR Code",
            ScanMode::Barcode => "Barcode",
        }
    }

    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            ScanMode::Qr => ScanMode::Barcode,
            ScanMode::Barcode => ScanMode::Qr,
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Qr => f.write_str("qr"),
            ScanMode::Barcode => f.write_str("barcode"),
        }
    }
}

impl FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "qr" | "qrcode" => Ok(ScanMode::Qr),
            "barcode" | "bar" => Ok(ScanMode::Barcode),
            other => Err(format!("unknown scan mode '{}' (expected qr or barcode)", other)),
        }
    }
}

/// One-shot flag: the first `try_trip` wins, every later call loses
#[derive(Debug, Default)]
pub struct DecodeLatch {
    tripped: bool,
}

impl DecodeLatch {
    pub fn try_trip(&mut self) -> bool {
        !std::mem::replace(&mut self.tripped, true)
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped
    }
}

/// Scan session state machine
///
/// ```text
///          start               first valid decode
///   Idle ─────────► Listening ─────────────────► Completed
///    ▲   ◄─────────     │                            │
///    │   stop/cancel    └──── start (new session) ◄──┤
///    └───────────────────────────────────────────────┘
///                       acknowledge
/// ```
#[derive(Debug, Default)]
pub enum SessionPhase {
    /// Decoder off
    #[default]
    Idle,
    /// Decoder on, waiting for the first valid event
    Listening {
        session_id: Uuid,
        /// Symbologies the decoder was started with
        symbologies: &'static [Symbology],
        started_at: Instant,
        latch: DecodeLatch,
    },
    /// A result was accepted and is waiting to be acknowledged
    Completed { session_id: Uuid },
}

/// Session state owned by the scan screen
#[derive(Debug, Default)]
pub struct ScanSession {
    phase: SessionPhase,
    last_result: Option<ScanResult>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Whether the decoder should be listening
    pub fn is_active(&self) -> bool {
        matches!(self.phase, SessionPhase::Listening { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.phase, SessionPhase::Completed { .. })
    }

    /// Id of the current or just-completed session
    pub fn session_id(&self) -> Option<Uuid> {
        match &self.phase {
            SessionPhase::Idle => None,
            SessionPhase::Listening { session_id, .. } | SessionPhase::Completed { session_id } => {
                Some(*session_id)
            }
        }
    }

    /// Symbologies of the listening phase
    pub fn symbologies(&self) -> Option<&'static [Symbology]> {
        match &self.phase {
            SessionPhase::Listening { symbologies, .. } => Some(*symbologies),
            _ => None,
        }
    }

    pub fn last_result(&self) -> Option<&ScanResult> {
        self.last_result.as_ref()
    }

    /// How long the current session has been listening
    pub fn listening_for(&self) -> Option<Duration> {
        match &self.phase {
            SessionPhase::Listening { started_at, .. } => Some(started_at.elapsed()),
            _ => None,
        }
    }

    /// Enter `Listening` from `Idle` or `Completed`
    ///
    /// Clears the previous result. Returns false (and changes nothing) when a
    /// session is already listening.
    pub fn begin(&mut self, session_id: Uuid, symbologies: &'static [Symbology]) -> bool {
        if self.is_active() {
            return false;
        }
        self.last_result = None;
        self.phase = SessionPhase::Listening {
            session_id,
            symbologies,
            started_at: Instant::now(),
            latch: DecodeLatch::default(),
        };
        true
    }

    /// Leave `Listening` without a result
    pub fn cancel(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.phase = SessionPhase::Idle;
        true
    }

    /// Offer a decode event to the session
    ///
    /// The first well-formed event of the listening phase moves the session to
    /// `Completed` and becomes the last result. Everything else is rejected
    /// without touching state.
    pub fn accept(
        &mut self,
        session_id: Uuid,
        event: &DecodeEvent,
    ) -> Result<&ScanResult, ScanError> {
        let symbology = match &mut self.phase {
            SessionPhase::Listening {
                session_id: active,
                symbologies,
                latch,
                ..
            } => {
                if *active != session_id {
                    return Err(ScanError::DuplicateDecodeEvent);
                }
                let symbology = validate_event(event, *symbologies)?;
                if !latch.try_trip() {
                    return Err(ScanError::DuplicateDecodeEvent);
                }
                symbology
            }
            SessionPhase::Idle | SessionPhase::Completed { .. } => {
                return Err(ScanError::DuplicateDecodeEvent);
            }
        };

        self.phase = SessionPhase::Completed { session_id };
        let result = ScanResult::new(session_id, symbology, event.data.clone());
        Ok(&*self.last_result.insert(result))
    }

    /// Return from `Completed` to `Idle` once the result was seen
    pub fn acknowledge(&mut self) -> bool {
        if !self.is_completed() {
            return false;
        }
        self.phase = SessionPhase::Idle;
        true
    }
}

/// Check payload and symbology of an event against the active set
fn validate_event(event: &DecodeEvent, accepted: &[Symbology]) -> Result<Symbology, ScanError> {
    if event.data.trim().is_empty() {
        return Err(ScanError::MalformedDecodeEvent(MalformedReason::EmptyPayload));
    }
    let symbology = event.symbology().ok_or_else(|| {
        ScanError::MalformedDecodeEvent(MalformedReason::UnknownSymbology(event.kind.clone()))
    })?;
    if !accepted.contains(&symbology) {
        return Err(ScanError::MalformedDecodeEvent(
            MalformedReason::UnsupportedSymbology(event.kind.clone()),
        ));
    }
    Ok(symbology)
}

/// Screen lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Constructed, not yet shown
    #[default]
    Created,
    /// On screen; permission query and indicator running
    Mounted,
    /// Torn down; every further message is ignored
    Unmounted,
}

/// Everything that can happen to the scan screen
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ===== Permission =====
    /// The camera permission query answered
    PermissionResolved(PermissionState),

    // ===== Mode =====
    SetMode(ScanMode),
    ToggleMode,

    // ===== Session =====
    /// "Start scan" button
    StartScan,
    /// Stop button or closing the camera view
    StopScan,
    /// Event from the decoder, tagged with the session that started it
    Decoded { session_id: Uuid, event: DecodeEvent },
    /// The result alert was dismissed
    AcknowledgeResult,

    // ===== Navigation =====
    NavigateBack,
}

// SPDX-License-Identifier: MPL-2.0

//! Core types for accepted scan results
//!
//! A result is what the scan session hands to the rest of the inventory app
//! once a decode event has been accepted.

use crate::constants::Symbology;
use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

/// Rough meaning of a payload, derived from its content
///
/// The inventory screens use this to decide where a scan goes: product codes
/// look up a product, everything else is shown as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    /// GTIN-8/12/13/14 with a valid check digit
    ProductCode,
    /// http(s) link
    Url,
    /// Anything else
    Text,
}

impl PayloadKind {
    /// Classify a decoded payload
    ///
    /// Falls back to `Text` for unrecognized formats.
    pub fn classify(payload: &str) -> Self {
        let trimmed = payload.trim();

        if is_valid_gtin(trimmed) {
            return Self::ProductCode;
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Self::Url;
        }

        Self::Text
    }

    /// Get display name for the kind
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ProductCode => "Product code",
            Self::Url => "Link",
            Self::Text => "Text",
        }
    }
}

/// Check a GTIN (EAN-8, UPC-A, EAN-13, GTIN-14) including its check digit
///
/// Weights alternate 3,1,3,... starting from the digit left of the check digit.
pub fn is_valid_gtin(code: &str) -> bool {
    if !matches!(code.len(), 8 | 12 | 13 | 14) || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = code.bytes().map(|b| u32::from(b - b'0')).collect();
    let Some((&check, body)) = digits.split_last() else {
        return false;
    };

    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();

    (10 - sum % 10) % 10 == check
}

/// A decoded payload accepted by a scan session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    /// Session that produced this result
    pub session_id: Uuid,
    /// Symbology the decoder reported
    pub symbology: Symbology,
    /// Decoded content, exactly as delivered
    pub payload: String,
    /// Content classification
    pub kind: PayloadKind,
    /// When the result was accepted
    pub scanned_at: DateTime<Local>,
}

impl ScanResult {
    pub fn new(session_id: Uuid, symbology: Symbology, payload: String) -> Self {
        Self {
            session_id,
            symbology,
            kind: PayloadKind::classify(&payload),
            payload,
            scanned_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_gtins() {
        assert!(is_valid_gtin("4006381333931")); // EAN-13
        assert!(is_valid_gtin("96385074")); // EAN-8
        assert!(is_valid_gtin("036000291452")); // UPC-A
    }

    #[test]
    fn test_invalid_gtins() {
        assert!(!is_valid_gtin("4006381333932")); // wrong check digit
        assert!(!is_valid_gtin("9988776655")); // wrong length
        assert!(!is_valid_gtin("40063813339A1"));
        assert!(!is_valid_gtin(""));
    }

    #[test]
    fn test_classify() {
        assert_eq!(PayloadKind::classify("4006381333931"), PayloadKind::ProductCode);
        assert_eq!(
            PayloadKind::classify(" https://example.com/item/1 "),
            PayloadKind::Url
        );
        assert_eq!(PayloadKind::classify("9988776655"), PayloadKind::Text);
        assert_eq!(PayloadKind::classify("ABC123"), PayloadKind::Text);
    }

    #[test]
    fn test_result_keeps_payload_verbatim() {
        let result = ScanResult::new(Uuid::new_v4(), Symbology::Qr, " padded ".to_string());
        assert_eq!(result.payload, " padded ");
        assert_eq!(result.kind, PayloadKind::Text);
    }
}

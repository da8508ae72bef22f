// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Directory name used under the user's config and cache directories
pub const APP_DIR_NAME: &str = "byebye-scanner";

/// Config file name inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Time for the scan indicator line to sweep the scanner area once
pub const DEFAULT_INDICATOR_PERIOD: Duration = Duration::from_millis(2000);

/// Indicator refresh rate
pub const DEFAULT_INDICATOR_FPS: u32 = 30;

/// Upper bound for the indicator refresh rate
pub const MAX_INDICATOR_FPS: u32 = 120;

/// How long the permission prompt may stay unanswered before it counts as denied
pub const DEFAULT_PERMISSION_TIMEOUT: Duration = Duration::from_secs(30);

/// Encoding scheme of a scannable code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbology {
    /// QR code
    Qr,
    /// PDF417 stacked code
    Pdf417,
    /// EAN-13 retail code
    Ean13,
    /// EAN-8 retail code
    Ean8,
    /// Code 128
    Code128,
    /// Code 39
    Code39,
}

/// Symbologies accepted in QR mode
pub const QR_SYMBOLOGIES: &[Symbology] = &[Symbology::Qr, Symbology::Pdf417];

/// Symbologies accepted in barcode mode
pub const BARCODE_SYMBOLOGIES: &[Symbology] = &[
    Symbology::Ean13,
    Symbology::Ean8,
    Symbology::Code128,
    Symbology::Code39,
];

impl Symbology {
    pub const ALL: [Symbology; 6] = [
        Symbology::Qr,
        Symbology::Pdf417,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::Code128,
        Symbology::Code39,
    ];

    /// Name used by the camera decoder for this symbology
    pub fn wire_name(&self) -> &'static str {
        match self {
            Symbology::Qr => "qr",
            Symbology::Pdf417 => "pdf417",
            Symbology::Ean13 => "ean13",
            Symbology::Ean8 => "ean8",
            Symbology::Code128 => "code128",
            Symbology::Code39 => "code39",
        }
    }

    /// Get display name for the symbology
    pub fn display_name(&self) -> &'static str {
        match self {
            Symbology::Qr => "QR Code",
            Symbology::Pdf417 => "PDF417",
            Symbology::Ean13 => "EAN-13",
            Symbology::Ean8 => "EAN-8",
            Symbology::Code128 => "Code 128",
            Symbology::Code39 => "Code 39",
        }
    }

    /// Whether this is a one-dimensional (linear) symbology
    pub fn is_linear(&self) -> bool {
        !matches!(self, Symbology::Qr | Symbology::Pdf417)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Symbology {
    type Err = String;

    /// Decoders are inconsistent about case and separators ("EAN_13", "ean-13"),
    /// so both are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        Symbology::ALL
            .into_iter()
            .find(|symbology| symbology.wire_name() == normalized)
            .ok_or_else(|| format!("unknown symbology: {}", s))
    }
}

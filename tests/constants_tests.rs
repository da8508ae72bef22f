// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use byebye_scanner::app::ScanMode;
use byebye_scanner::constants::{BARCODE_SYMBOLOGIES, QR_SYMBOLOGIES, Symbology};

#[test]
fn test_mode_symbology_sets() {
    assert_eq!(ScanMode::Qr.symbologies(), QR_SYMBOLOGIES);
    assert_eq!(ScanMode::Barcode.symbologies(), BARCODE_SYMBOLOGIES);
    assert!(QR_SYMBOLOGIES.iter().all(|s| !s.is_linear()));
    assert!(BARCODE_SYMBOLOGIES.iter().all(|s| s.is_linear()));
}

#[test]
fn test_every_symbology_belongs_to_one_mode() {
    for symbology in Symbology::ALL {
        let in_qr = QR_SYMBOLOGIES.contains(&symbology);
        let in_barcode = BARCODE_SYMBOLOGIES.contains(&symbology);
        assert!(in_qr != in_barcode, "{} must be in exactly one mode", symbology);
    }
}

#[test]
fn test_symbology_wire_names_parse_back() {
    for symbology in Symbology::ALL {
        assert_eq!(symbology.wire_name().parse::<Symbology>(), Ok(symbology));
    }
    assert_eq!("EAN_13".parse::<Symbology>(), Ok(Symbology::Ean13));
    assert_eq!("Code-128".parse::<Symbology>(), Ok(Symbology::Code128));
    assert!("aztec".parse::<Symbology>().is_err());
}

#[test]
fn test_symbology_display_names() {
    for symbology in Symbology::ALL {
        assert!(!symbology.display_name().is_empty());
    }
}

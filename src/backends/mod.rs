// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for the camera
//!
//! This module provides the camera-facing seams of the scanner:
//! - Camera permission negotiation
//! - Barcode/QR decoder control and event delivery
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  App Layer                   │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌──────────────────────────────────────┐   │
//! │  │ Camera (permission + decoder traits) │   │
//! │  └──────────────────────────────────────┘   │
//! │  ┌──────────────────────────────────────┐   │
//! │  │ Virtual camera (static / manual /    │   │
//! │  │ scripted implementations)            │   │
//! │  └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: Collaborator traits and shared types
//! - [`virtual_camera`]: Software implementations of those traits

pub mod camera;
pub mod virtual_camera;

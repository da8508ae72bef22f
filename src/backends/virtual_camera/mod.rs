// SPDX-License-Identifier: GPL-3.0-only

//! Virtual camera backends
//!
//! Software stand-ins for the platform camera layer. They implement the same
//! traits a device backend would, so the scan screen cannot tell them apart:
//!
//! - [`StaticPermission`]: answers the permission prompt with a fixed status
//! - [`ManualDecoder`]: events are pushed by hand through a [`ManualDecoderHandle`]
//!   (tests, terminal keyboard-wedge input)
//! - [`ScriptedDecoder`]: replays decode events from a JSON script file

mod file_source;
mod manual;
mod permission;

pub use file_source::{ScriptCursor, ScriptedDecoder, ScriptedEvent, load_script, parse_script};
pub use manual::{ManualDecoder, ManualDecoderHandle};
pub use permission::StaticPermission;

// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for scanner operations
//!
//! This module provides command-line functionality for:
//! - Opening the interactive scan screen
//! - Replaying a decode script headless
//! - Listing the symbologies of each scan mode

use byebye_scanner::app::{
    NavigationLog, Notification, NotificationLog, PermissionState, ScanMode, ScanResult,
    ScanScreen, ScreenServices, SessionPhase,
};
use byebye_scanner::backends::camera::PermissionStatus;
use byebye_scanner::backends::virtual_camera::{
    ScriptedDecoder, ScriptedEvent, StaticPermission, load_script,
};
use byebye_scanner::config::Config;
use byebye_scanner::errors::ScanError;
use byebye_scanner::{Message, terminal};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// How long the headless run waits for more decode events once the script is
/// exhausted
const SETTLE_INTERVAL: Duration = Duration::from_millis(50);

/// Open the interactive scan screen
pub fn scan(
    mut config: Config,
    mode: Option<ScanMode>,
    script: Option<PathBuf>,
    deny_camera: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(mode) = mode {
        config.default_mode = mode;
    }
    let script = script.as_deref().map(load_script).transpose()?;
    terminal::run(config, script, permission_for(deny_camera))?;
    Ok(())
}

/// Outcome of a headless scan session
#[derive(Debug, Serialize)]
struct SimulationReport {
    mode: ScanMode,
    permission: &'static str,
    result: Option<ScanResult>,
    events_replayed: usize,
    alerts: Vec<String>,
}

/// Mount a screen without UI, start one session and replay `script` into it
pub fn simulate(
    mut config: Config,
    mode: Option<ScanMode>,
    script: &Path,
    deny_camera: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(mode) = mode {
        config.default_mode = mode;
    }
    let events = load_script(script)?;
    info!(path = %script.display(), events = events.len(), "Decode script loaded");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(run_simulation(config, events, deny_camera));

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Mode: {}", report.mode.display_name());
    println!("Camera permission: {}", report.permission);
    println!("Events replayed: {}", report.events_replayed);
    for alert in &report.alerts {
        println!("Alert: {}", alert.replace('\n', " | "));
    }
    match &report.result {
        Some(result) => {
            println!();
            println!("  Symbology: {}", result.symbology.display_name());
            println!("  Kind:      {}", result.kind.display_name());
            println!("  Data:      {}", result.payload);
            println!("  Scanned:   {}", result.scanned_at.format("%Y-%m-%d %H:%M:%S"));
        }
        None => println!("No code scanned."),
    }
    Ok(())
}

async fn run_simulation(
    config: Config,
    events: Vec<ScriptedEvent>,
    deny_camera: bool,
) -> SimulationReport {
    let decoder = ScriptedDecoder::new(events);
    let cursor = decoder.cursor();
    let alerts = NotificationLog::new();
    let mut screen = ScanScreen::new(
        &config,
        ScreenServices {
            permission: Arc::new(permission_for(deny_camera)),
            decoder: Box::new(decoder),
            navigator: Arc::new(NavigationLog::new()),
            notifier: Arc::new(alerts.clone()),
        },
    );
    if let Err(err) = screen.mount() {
        debug!(error = %err, "Simulation screen did not mount");
    }

    while screen.permission_state() == PermissionState::Unknown {
        let Some(message) = screen.next_message().await else {
            break;
        };
        let _ = screen.update(message);
    }

    match screen.update(Message::StartScan) {
        Ok(()) => {
            loop {
                if matches!(screen.phase(), SessionPhase::Completed { .. }) {
                    break;
                }
                match tokio::time::timeout(SETTLE_INTERVAL, screen.next_message()).await {
                    Ok(Some(message)) => {
                        let _ = screen.update(message);
                    }
                    Ok(None) => break,
                    Err(_) if cursor.is_exhausted() => {
                        debug!("Script exhausted without an accepted event");
                        break;
                    }
                    Err(_) => {}
                }
            }
        }
        Err(ScanError::PermissionDenied) => debug!("Simulation refused by permission gate"),
        Err(err) => debug!(error = %err, "Simulation could not start"),
    }

    let report = SimulationReport {
        mode: screen.mode(),
        permission: match screen.permission_state() {
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Unknown => "unknown",
        },
        result: screen.last_result().cloned(),
        events_replayed: cursor.position(),
        alerts: alerts
            .entries()
            .iter()
            .map(describe)
            .collect(),
    };
    let _ = screen.update(Message::NavigateBack);
    report
}

/// List the symbologies each scan mode accepts
pub fn list_symbologies() -> Result<(), Box<dyn std::error::Error>> {
    for mode in ScanMode::ALL {
        println!("{} ({}):", mode.display_name(), mode);
        for symbology in mode.symbologies() {
            println!("  {:<10} {}", symbology.wire_name(), symbology.display_name());
        }
        println!();
    }
    Ok(())
}

fn permission_for(deny_camera: bool) -> StaticPermission {
    StaticPermission::new(if deny_camera {
        PermissionStatus::Denied
    } else {
        PermissionStatus::Granted
    })
}

fn describe(notification: &Notification) -> String {
    format!("{}: {}", notification.title(), notification.body())
}

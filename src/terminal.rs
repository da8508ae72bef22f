// SPDX-License-Identifier: GPL-3.0-only

//! Terminal-based scan screen
//!
//! Renders the scan screen in the terminal: mode buttons, the bracketed
//! scanner area with its moving indicator line, the last scanned payload and
//! modal alerts. Without a decode script the terminal acts as a keyboard-wedge
//! scanner: while scanning, typed characters followed by Enter are delivered
//! as one decode event.

use crate::app::{
    NavigationLog, Notification, NotificationLog, ScanMode, ScanScreen, ScreenServices,
    SessionPhase, open_scanner,
};
use crate::app::state::{Message, PermissionState};
use crate::backends::camera::{DecodeEvent, DecoderBackend};
use crate::backends::virtual_camera::{
    ManualDecoder, ManualDecoderHandle, ScriptedDecoder, ScriptedEvent, StaticPermission,
};
use crate::config::Config;
use crate::constants::Symbology;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Run the terminal scan screen
///
/// Background work runs on a tokio runtime entered for the duration of the
/// call; the draw loop itself polls the terminal synchronously.
pub fn run(
    config: Config,
    script: Option<Vec<ScriptedEvent>>,
    permission: StaticPermission,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, TerminalApp::new(config, script, permission));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct TerminalApp {
    config: Config,
    script: Option<Vec<ScriptedEvent>>,
    permission: StaticPermission,
    navigator: NavigationLog,
    alerts: NotificationLog,
    /// Alerts already dismissed
    alerts_seen: usize,
    /// `None` while the user is back on the home prompt
    screen: Option<ScanScreen>,
    wedge: Option<ManualDecoderHandle>,
    input: String,
}

impl TerminalApp {
    fn new(
        config: Config,
        script: Option<Vec<ScriptedEvent>>,
        permission: StaticPermission,
    ) -> Self {
        let mut app = Self {
            config,
            script,
            permission,
            navigator: NavigationLog::new(),
            alerts: NotificationLog::new(),
            alerts_seen: 0,
            screen: None,
            wedge: None,
            input: String::new(),
        };
        app.open_screen();
        app
    }

    /// Mount a fresh scan screen
    fn open_screen(&mut self) {
        open_scanner(&self.navigator);

        let decoder: Box<dyn DecoderBackend> = match &self.script {
            Some(script) => {
                self.wedge = None;
                Box::new(ScriptedDecoder::new(script.clone()))
            }
            None => {
                let (decoder, handle) = ManualDecoder::new();
                self.wedge = Some(handle);
                Box::new(decoder)
            }
        };

        let mut screen = ScanScreen::new(
            &self.config,
            ScreenServices {
                permission: Arc::new(self.permission.clone()),
                decoder,
                navigator: Arc::new(self.navigator.clone()),
                notifier: Arc::new(self.alerts.clone()),
            },
        );
        if let Err(err) = screen.mount() {
            warn!(error = %err, "Scan screen did not mount");
        }
        self.input.clear();
        self.screen = Some(screen);
    }

    fn pending_alert(&self) -> Option<Notification> {
        self.alerts.get(self.alerts_seen)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        // Ctrl+C to quit
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Flow::Quit;
        }

        if let Some(alert) = self.pending_alert() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alerts_seen += 1;
                if let (Notification::ScanSucceeded(_), Some(screen)) = (&alert, &mut self.screen) {
                    let _ = screen.update(Message::AcknowledgeResult);
                }
            }
            return Flow::Continue;
        }

        let Some(screen) = self.screen.as_mut() else {
            return match key.code {
                KeyCode::Char('s') | KeyCode::Enter => {
                    self.open_screen();
                    Flow::Continue
                }
                KeyCode::Char('q') | KeyCode::Esc => Flow::Quit,
                _ => Flow::Continue,
            };
        };

        if screen.is_scanning() {
            match (key.code, &self.wedge) {
                (KeyCode::Esc, _) => {
                    self.input.clear();
                    let _ = screen.update(Message::StopScan);
                }
                (KeyCode::Enter, Some(wedge)) if !self.input.is_empty() => {
                    let payload = std::mem::take(&mut self.input);
                    let symbology = wedge_symbology(screen.mode(), &payload);
                    debug!(%symbology, "Keyboard wedge input");
                    wedge.emit(DecodeEvent::from_symbology(symbology, payload));
                }
                (KeyCode::Backspace, Some(_)) => {
                    self.input.pop();
                }
                (KeyCode::Char(c), Some(_)) => self.input.push(c),
                (KeyCode::Char('q'), None) => return Flow::Quit,
                _ => {}
            }
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Enter | KeyCode::Char('s') => {
                let _ = screen.update(Message::StartScan);
            }
            KeyCode::Tab | KeyCode::Char('m') => {
                let _ = screen.update(Message::ToggleMode);
            }
            KeyCode::Char('1') => {
                let _ = screen.update(Message::SetMode(ScanMode::Qr));
            }
            KeyCode::Char('2') => {
                let _ = screen.update(Message::SetMode(ScanMode::Barcode));
            }
            KeyCode::Esc | KeyCode::Char('b') => {
                let _ = screen.update(Message::NavigateBack);
                self.screen = None;
                self.wedge = None;
                info!("Back on home prompt");
            }
            _ => {}
        }
        Flow::Continue
    }

    fn render(&self, f: &mut Frame) {
        let area = f.area();
        let Some(screen) = &self.screen else {
            render_home(f, area);
            return;
        };

        let [title_area, modes_area, scanner_area, result_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .areas(area);

        f.render_widget(
            Paragraph::new("Scan Barcode").style(Style::default().add_modifier(Modifier::BOLD)),
            title_area,
        );
        render_mode_buttons(f, modes_area, screen.mode(), screen.mode_selectable());
        f.render_widget(
            ScannerArea {
                progress: screen.indicator_progress(),
                scanning: screen.is_scanning(),
                input: self.wedge.as_ref().map(|_| self.input.as_str()),
            },
            scanner_area,
        );
        render_result(f, result_area, screen);

        let status = StatusBar {
            message: &status_message(screen, self.wedge.is_some()),
        };
        f.render_widget(status, status_area);

        if let Some(alert) = self.pending_alert() {
            render_alert(f, area, &alert);
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: TerminalApp,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if let Some(screen) = app.screen.as_mut() {
            screen.process_pending();
        }

        terminal.draw(|f| app.render(f))?;

        // Handle input with timeout for indicator updates
        if event::poll(Duration::from_millis(16))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key) == Flow::Quit
        {
            break;
        }
    }
    Ok(())
}

/// Symbology reported for typed input
///
/// Wedge scanners only type the payload; the type is inferred from the mode
/// and the payload shape.
fn wedge_symbology(mode: ScanMode, payload: &str) -> Symbology {
    match mode {
        ScanMode::Qr => Symbology::Qr,
        ScanMode::Barcode if payload.bytes().all(|b| b.is_ascii_digit()) => match payload.len() {
            13 => Symbology::Ean13,
            8 => Symbology::Ean8,
            _ => Symbology::Code128,
        },
        ScanMode::Barcode => Symbology::Code128,
    }
}

fn status_message(screen: &ScanScreen, wedge: bool) -> String {
    let hint = match (screen.permission_state(), screen.phase()) {
        (PermissionState::Unknown, _) => "waiting for camera permission | 'q' quit",
        (_, SessionPhase::Listening { .. }) if wedge => {
            "type a code + Enter | Esc stop | Ctrl+C quit"
        }
        (_, SessionPhase::Listening { .. }) => "Esc stop | 'q' quit",
        _ => "Enter scan | Tab mode | 'b' back | 'q' quit",
    };
    match screen.status() {
        Some(status) => format!("{} | {}", status, hint),
        None => hint.to_string(),
    }
}

fn render_home(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "ByeByeExpired",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("'s' open scanner | 'q' quit"),
    ];
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);
    f.render_widget(
        Paragraph::new(text).alignment(ratatui::layout::Alignment::Center),
        middle,
    );
}

fn render_mode_buttons(f: &mut Frame, area: Rect, mode: ScanMode, enabled: bool) {
    let [qr_area, barcode_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);

    let buttons = [
        (ScanMode::Qr, qr_area, '1'),
        (ScanMode::Barcode, barcode_area, '2'),
    ];
    for (button, button_area, key) in buttons {
        let style = match (button == mode, enabled) {
            (true, true) => Style::default().fg(Color::Black).bg(Color::Cyan),
            (true, false) => Style::default().fg(Color::Black).bg(Color::DarkGray),
            (false, true) => Style::default().fg(Color::White),
            (false, false) => Style::default().fg(Color::DarkGray),
        };
        f.render_widget(
            Paragraph::new(format!("[{}] {}", key, button.display_name()))
                .alignment(ratatui::layout::Alignment::Center)
                .style(style)
                .block(Block::bordered()),
            button_area,
        );
    }
}

fn render_result(f: &mut Frame, area: Rect, screen: &ScanScreen) {
    let lines = match screen.last_result() {
        Some(result) => vec![
            Line::from(vec![
                Span::styled("Scanned Data: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(result.payload.clone()),
            ]),
            Line::from(format!(
                "{} | {}",
                result.symbology.display_name(),
                result.kind.display_name()
            )),
        ],
        None => vec![Line::from(Span::styled(
            "No code scanned yet",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title("Result")),
        area,
    );
}

fn render_alert(f: &mut Frame, area: Rect, alert: &Notification) {
    let width = area.width.min(50);
    let body = alert.body();
    let height = (body.lines().count() as u16 + 4).min(area.height);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let mut lines: Vec<Line> = body.lines().map(|l| Line::from(l.to_string())).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter OK",
        Style::default().fg(Color::Cyan),
    )));

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::bordered().title(alert.title())),
        popup,
    );
}

/// Scanner area with corner brackets and the indicator line
struct ScannerArea<'a> {
    progress: f32,
    scanning: bool,
    /// Typed wedge input, when the keyboard acts as the scanner
    input: Option<&'a str>,
}

impl Widget for ScannerArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }
        let bracket = Style::default().fg(Color::White);
        let left = area.x;
        let right = area.x + area.width - 1;
        let top = area.y;
        let bottom = area.y + area.height - 1;
        let arm = (area.width / 6).max(1);

        // Corner brackets
        for (x, y, corner, dx) in [
            (left, top, '┌', 1_i32),
            (right, top, '┐', -1),
            (left, bottom, '└', 1),
            (right, bottom, '┘', -1),
        ] {
            buf.set_string(x, y, corner.to_string(), bracket);
            for i in 1..=arm {
                let hx = (x as i32 + dx * i as i32) as u16;
                buf.set_string(hx, y, "─", bracket);
            }
            let vy = if y == top { y + 1 } else { y - 1 };
            buf.set_string(x, vy, "│", bracket);
        }

        // Indicator line sweeps the inner rows
        let inner_height = area.height - 2;
        let row = top + 1 + ((self.progress * inner_height as f32) as u16).min(inner_height - 1);
        let line = "━".repeat((area.width - 4) as usize);
        buf.set_string(left + 2, row, line, Style::default().fg(Color::Red));

        let label = match (self.scanning, self.input) {
            (true, Some(input)) if !input.is_empty() => format!("> {}", input),
            (true, _) => "Scanning...".to_string(),
            (false, _) => "Press Enter to scan".to_string(),
        };
        let width = (label.chars().count() as u16).min(area.width - 2);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let mut y = area.y + area.height / 2;
        if y == row {
            y = if y + 1 < bottom { y + 1 } else { y - 1 };
        }
        buf.set_stringn(x, y, &label, width as usize, Style::default());
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        buf.set_stringn(
            area.x,
            area.y,
            self.message,
            area.width as usize,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{NavigationRequest, Route};

    /// Build the app and apply the permission answer
    async fn ready_app(script: Option<Vec<ScriptedEvent>>) -> TerminalApp {
        let mut app = TerminalApp::new(Config::default(), script, StaticPermission::granted());
        let screen = app.screen.as_mut().unwrap();
        let message = screen.next_message().await.unwrap();
        screen.update(message).unwrap();
        app
    }

    fn press(app: &mut TerminalApp, code: KeyCode) -> Flow {
        app.handle_key(KeyEvent::from(code))
    }

    fn screen(app: &TerminalApp) -> &ScanScreen {
        app.screen.as_ref().unwrap()
    }

    #[tokio::test]
    async fn test_wedge_input_completes_and_enter_acknowledges() {
        let mut app = ready_app(None).await;
        press(&mut app, KeyCode::Enter);
        assert!(screen(&app).is_scanning());

        for c in "ABC".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.input.is_empty());
        app.screen.as_mut().unwrap().process_pending();

        assert!(matches!(screen(&app).phase(), SessionPhase::Completed { .. }));
        assert_eq!(screen(&app).delivered_count(), 1);
        assert_eq!(app.alerts.len(), 1);
        assert!(app.pending_alert().is_some());

        // Other keys wait for the alert
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.alerts_seen, 0);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.alerts_seen, 1);
        assert!(app.pending_alert().is_none());
        assert!(matches!(screen(&app).phase(), SessionPhase::Idle));
        assert_eq!(screen(&app).last_result().unwrap().payload, "ABC");
    }

    #[tokio::test]
    async fn test_empty_wedge_enter_sends_nothing() {
        let mut app = ready_app(None).await;
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen.as_mut().unwrap().process_pending(), 0);
        assert!(screen(&app).is_scanning());
    }

    #[tokio::test]
    async fn test_mode_keys_inert_while_scanning() {
        let mut app = ready_app(Some(Vec::new())).await;
        assert_eq!(screen(&app).mode(), ScanMode::Qr);
        press(&mut app, KeyCode::Enter);
        assert!(screen(&app).is_scanning());

        for code in [KeyCode::Tab, KeyCode::Char('m'), KeyCode::Char('2')] {
            press(&mut app, code);
        }
        assert_eq!(screen(&app).mode(), ScanMode::Qr);
        assert!(screen(&app).is_scanning());

        press(&mut app, KeyCode::Esc);
        assert!(!screen(&app).is_scanning());
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(screen(&app).mode(), ScanMode::Barcode);
        press(&mut app, KeyCode::Tab);
        assert_eq!(screen(&app).mode(), ScanMode::Qr);
    }

    #[tokio::test]
    async fn test_back_and_reopen_scanner() {
        let mut app = ready_app(None).await;
        assert_eq!(press(&mut app, KeyCode::Char('b')), Flow::Continue);
        assert!(app.screen.is_none());
        assert!(app.wedge.is_none());

        assert_eq!(press(&mut app, KeyCode::Char('s')), Flow::Continue);
        assert!(app.screen.as_ref().is_some_and(ScanScreen::is_mounted));
        assert_eq!(
            app.navigator.requests(),
            vec![
                NavigationRequest::To(Route::ScanBarcode),
                NavigationRequest::Back,
                NavigationRequest::To(Route::ScanBarcode),
            ]
        );

        press(&mut app, KeyCode::Esc);
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
    }

    #[test]
    fn test_wedge_symbology() {
        assert_eq!(wedge_symbology(ScanMode::Qr, "4006381333931"), Symbology::Qr);
        assert_eq!(
            wedge_symbology(ScanMode::Barcode, "4006381333931"),
            Symbology::Ean13
        );
        assert_eq!(wedge_symbology(ScanMode::Barcode, "96385074"), Symbology::Ean8);
        assert_eq!(
            wedge_symbology(ScanMode::Barcode, "9988776655"),
            Symbology::Code128
        );
        assert_eq!(wedge_symbology(ScanMode::Barcode, "AB-12"), Symbology::Code128);
    }

    #[test]
    fn test_scanner_area_draws_indicator_row() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        ScannerArea {
            progress: 0.0,
            scanning: false,
            input: None,
        }
        .render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "┌");
        assert_eq!(buf[(19, 9)].symbol(), "┘");
        assert_eq!(buf[(2, 1)].symbol(), "━");
    }

    #[test]
    fn test_scanner_area_ignores_tiny_area() {
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        ScannerArea {
            progress: 0.5,
            scanning: true,
            input: Some("123"),
        }
        .render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }
}

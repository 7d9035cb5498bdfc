// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Interactive shell (ratatui + crossterm) around [`ViewController`]: prompt and context fields,
//! a half-block preview of the rendered flowchart, the raw Mermaid source, and a footer.

use std::{
    error::Error,
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};

use crate::api::{GenerateRequest, GenerationClient, GenerationError};
use crate::controller::{ViewController, ViewState};
use crate::export::{DirectorySink, DownloadSink, ExportOutcome};
use crate::render::preview::preview_lines;

mod theme;

use theme::TuiTheme;

const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const FOOTER_BRAND: &str = "🅵 🅻 🅾 🆆 🅶 🅴 🅽 ";
const TOAST_TTL: Duration = Duration::from_secs(4);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

type Outcome = Result<String, GenerationError>;

/// What the TUI needs besides the client.
#[derive(Debug, Clone)]
pub struct TuiSettings {
    /// Shown in the title bar.
    pub endpoint: String,
    pub export_dir: PathBuf,
}

/// Runs the interactive terminal UI until the user quits.
///
/// Generation requests are spawned onto `runtime`; their outcomes come back over a channel that
/// is drained once per tick, so the UI thread never waits on the network.
pub fn run<C>(client: Arc<C>, runtime: Handle, settings: TuiSettings) -> Result<(), Box<dyn Error>>
where
    C: GenerationClient + 'static,
{
    let theme = TuiTheme::from_env()?;
    let mut terminal = TerminalSession::new()?;
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<Outcome>();
    let mut app = App::new(settings, theme);

    while !app.should_quit {
        app.drain_outcomes(&mut outcome_rx);
        app.expire_toast(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        if let Some(request) = app.take_pending_request() {
            let client = client.clone();
            let outcome_tx = outcome_tx.clone();
            runtime.spawn(async move {
                let outcome = client.generate(&request).await;
                let _ = outcome_tx.send(outcome);
            });
        }

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Prompt,
    Context,
}

impl Field {
    fn toggle(self) -> Self {
        match self {
            Self::Prompt => Self::Context,
            Self::Context => Self::Prompt,
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

struct App {
    controller: ViewController,
    settings: TuiSettings,
    theme: TuiTheme,
    sink: Box<dyn DownloadSink>,
    focus: Field,
    source_scroll: u16,
    show_help: bool,
    toast: Option<Toast>,
    pending_request: Option<GenerateRequest>,
    should_quit: bool,
}

impl App {
    fn new(settings: TuiSettings, theme: TuiTheme) -> Self {
        let sink = Box::new(DirectorySink::new(settings.export_dir.clone()));
        Self::with_sink(settings, theme, sink)
    }

    fn with_sink(settings: TuiSettings, theme: TuiTheme, sink: Box<dyn DownloadSink>) -> Self {
        Self {
            controller: ViewController::new(),
            settings,
            theme,
            sink,
            focus: Field::Prompt,
            source_scroll: 0,
            show_help: false,
            toast: None,
            pending_request: None,
            should_quit: false,
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast { message: message.into(), expires_at: Instant::now() + TOAST_TTL });
    }

    fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }

    fn take_pending_request(&mut self) -> Option<GenerateRequest> {
        self.pending_request.take()
    }

    fn drain_outcomes(&mut self, outcomes: &mut UnboundedReceiver<Outcome>) {
        loop {
            match outcomes.try_recv() {
                Ok(outcome) => self.apply_outcome(outcome),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        self.controller.finish(outcome);
        self.source_scroll = 0;
        match self.controller.state() {
            ViewState::Failed(err) => {
                let message = format!("Generation failed: {err}");
                self.set_toast(message);
            }
            ViewState::Ready => match self.controller.render_error() {
                Some(err) => {
                    let message = format!("Render failed: {err}");
                    self.set_toast(message);
                }
                None => self.set_toast("Flowchart ready"),
            },
            ViewState::Idle | ViewState::Generating => {}
        }
    }

    fn focused_text_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Prompt => self.controller.input_mut(),
            Field::Context => self.controller.context_mut(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('l') if ctrl => self.clear(),
            KeyCode::Char('e') if ctrl => self.export(),
            KeyCode::Char('y') if ctrl => self.yank_source(),
            KeyCode::F(1) => self.show_help = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = self.focus.toggle();
            }
            KeyCode::Enter => self.submit(),
            KeyCode::PageDown => self.source_scroll = self.source_scroll.saturating_add(5),
            KeyCode::PageUp => self.source_scroll = self.source_scroll.saturating_sub(5),
            KeyCode::Backspace => {
                self.focused_text_mut().pop();
            }
            KeyCode::Char(ch) if !ctrl => self.focused_text_mut().push(ch),
            _ => {}
        }
    }

    fn submit(&mut self) {
        if self.controller.is_generating() {
            return;
        }
        match self.controller.begin_submit() {
            Some(request) => {
                self.pending_request = Some(request);
                self.set_toast("Generating flowchart…");
            }
            None => self.set_toast("Enter a prompt first"),
        }
    }

    fn clear(&mut self) {
        if self.controller.clear() {
            self.focus = Field::Prompt;
            self.source_scroll = 0;
            self.set_toast("Cleared");
        } else {
            self.set_toast("Wait for the current request to finish");
        }
    }

    fn export(&mut self) {
        match self.controller.export(self.sink.as_mut()) {
            Ok(ExportOutcome::Saved(path)) => {
                let message = format!("Saved {}", path.display());
                self.set_toast(message);
            }
            Ok(ExportOutcome::Unavailable) => self.set_toast("Nothing to export yet"),
            Err(err) => {
                tracing::warn!(error = %err, "export failed");
                let message = format!("Export failed: {err}");
                self.set_toast(message);
            }
        }
    }

    fn yank_source(&mut self) {
        let source = self.controller.diagram_source();
        if source.is_empty() {
            self.set_toast("Nothing to yank yet");
            return;
        }
        match copy_to_clipboard(source) {
            Ok(backend) => self.set_toast(format!("Yanked Mermaid source ({backend})")),
            Err(err) => self.set_toast(format!("Clipboard error: {err}")),
        }
    }

    fn status_label(&self) -> String {
        match self.controller.state() {
            ViewState::Idle => "Idle".to_owned(),
            ViewState::Generating => "Generating…".to_owned(),
            ViewState::Ready => match self.controller.rendered() {
                Some(rendered) => {
                    let (width, height) = rendered.size();
                    format!("Ready {width}x{height}")
                }
                None => "Ready".to_owned(),
            },
            ViewState::Failed(_) => "Failed".to_owned(),
        }
    }

    fn preview_text(&self, area: Rect) -> Text<'static> {
        if let Some(rendered) = self.controller.rendered() {
            return Text::from(preview_lines(rendered.raster(), area.width, area.height));
        }
        if let Some(err) = self.controller.render_error() {
            return Text::from(Line::styled(err.to_string(), self.theme.error_style()));
        }
        if self.controller.is_generating() {
            return Text::from(Line::styled("Generating…", self.theme.dim_style()));
        }
        if let Some(err) = self.controller.last_error() {
            return Text::from(Line::styled(err.to_string(), self.theme.error_style()));
        }
        Text::from(Line::styled(
            "Type a prompt and press Enter to generate a flowchart.",
            self.theme.dim_style(),
        ))
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let (prompt_area, context_area, main_area, footer_area) = (rows[0], rows[1], rows[2], rows[3]);

    draw_field(frame, app, Field::Prompt, prompt_area);
    draw_field(frame, app, Field::Context, context_area);

    let direction = if stack_panes_vertically(main_area) {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let panes = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(main_area);

    let preview_block = Block::default()
        .borders(Borders::ALL)
        .title(preview_title(app))
        .style(app.theme.base_style());
    let preview_inner = preview_block.inner(panes[0]);
    frame.render_widget(
        Paragraph::new(app.preview_text(preview_inner)).block(preview_block),
        panes[0],
    );

    let source_block = Block::default()
        .borders(Borders::ALL)
        .title(" Mermaid code ")
        .style(app.theme.base_style());
    let source = Paragraph::new(app.controller.diagram_source().to_owned())
        .block(source_block)
        .wrap(Wrap { trim: false })
        .scroll((app.source_scroll, 0));
    frame.render_widget(source, panes[1]);

    let toast = app.toast.as_ref().map(|toast| toast.message.as_str()).unwrap_or_default();
    let footer = footer_line(app, toast, footer_area.width < 90);
    frame.render_widget(Paragraph::new(footer), footer_area);

    if app.show_help {
        render_help(frame, app, main_area);
    }
}

fn draw_field(frame: &mut Frame<'_>, app: &App, field: Field, area: Rect) {
    let focused = app.focus == field && !app.show_help;
    let (title, text) = match field {
        Field::Prompt => (" Prompt ", app.controller.input()),
        Field::Context => (" Context (optional) ", app.controller.context()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(app.theme.panel_border_style(focused));
    let inner = block.inner(area);

    let visible = visible_tail(text, inner.width.saturating_sub(1) as usize);
    let cursor_x = inner.x + visible.chars().count() as u16;
    frame.render_widget(
        Paragraph::new(visible.to_owned()).style(app.theme.base_style()).block(block),
        area,
    );

    if focused && inner.width > 0 && inner.height > 0 {
        frame.set_cursor(cursor_x.min(inner.right().saturating_sub(1)), inner.y);
    }
}

fn preview_title(app: &App) -> String {
    match app.controller.rendered() {
        Some(rendered) => {
            let (width, height) = rendered.size();
            format!(" Flowchart {width}x{height} · {} ", app.settings.endpoint)
        }
        None => format!(" Flowchart · {} ", app.settings.endpoint),
    }
}

/// The last `width` characters of `text`, so the caret end of a long prompt stays visible.
fn visible_tail(text: &str, width: usize) -> &str {
    let count = text.chars().count();
    if count <= width {
        return text;
    }
    let skip = count - width;
    let start = text.char_indices().nth(skip).map(|(idx, _)| idx).unwrap_or(text.len());
    &text[start..]
}

include!("chrome.rs");

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

fn copy_to_clipboard(text: &str) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

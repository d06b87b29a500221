//! Play command implementation - interactive terminal UI.

use super::CliError;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fauna::{Button, ButtonSet, Game, GameConfig, InputFrame, SAVE_SIZE, SaveBlock, Screen};
use log::{info, warn};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::fs;
use std::io::stdout;
use std::path::Path;
use std::time::{Duration, Instant};

/// Frame pacing.
const FRAME: Duration = Duration::from_millis(16);

/// Terminals only report key presses; a key counts as held this long after
/// its last press or auto-repeat.
const HOLD_WINDOW: Duration = Duration::from_millis(150);

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the terminal can't be driven or the save file can't be
/// written on exit.
pub(crate) fn execute(config: GameConfig, save: &Path) -> Result<(), CliError> {
    let mut game = Game::with_config(config);
    if let Some(block) = read_slot(save) {
        game.set_save_slot(block);
        info!("save slot loaded from {}", save.display());
    }

    let outcome = run_tui(&mut game);

    fs::write(save, game.save_slot())
        .map_err(|e| CliError::new(format!("Failed to write {}: {e}", save.display())))?;
    outcome
}

/// Read a save slot file; anything missing or mis-sized yields an empty slot.
fn read_slot(path: &Path) -> Option<SaveBlock> {
    let bytes = fs::read(path).ok()?;
    match SaveBlock::try_from(bytes.as_slice()) {
        Ok(block) => Some(block),
        Err(_) => {
            warn!(
                "ignoring {}: expected {SAVE_SIZE} bytes, found {}",
                path.display(),
                bytes.len()
            );
            None
        }
    }
}

/// Key state for the TUI.
struct Pad {
    last_seen: [Option<Instant>; Button::ALL.len()],
    previous: ButtonSet,
    /// Chord queued by a single key: modifier held and Confirm pressed.
    chord: Option<Button>,
    quit: bool,
}

impl Pad {
    fn new() -> Self {
        Self {
            last_seen: [None; Button::ALL.len()],
            previous: ButtonSet::EMPTY,
            chord: None,
            quit: false,
        }
    }

    fn key(&mut self, code: KeyCode, now: Instant) {
        let button = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit = true;
                return;
            }
            KeyCode::Char('b') => {
                self.chord = Some(Button::LeftModifier);
                return;
            }
            KeyCode::Char('o') => {
                self.chord = Some(Button::RightModifier);
                return;
            }
            KeyCode::Up | KeyCode::Char('w') => Button::Up,
            KeyCode::Down | KeyCode::Char('s') => Button::Down,
            KeyCode::Left | KeyCode::Char('a') => Button::Left,
            KeyCode::Right | KeyCode::Char('d') => Button::Right,
            KeyCode::Char('z' | ' ') => Button::Confirm,
            KeyCode::Char('x') | KeyCode::Backspace => Button::Cancel,
            KeyCode::Enter => Button::Menu,
            KeyCode::Char('c') => Button::Select,
            KeyCode::Char('l') => Button::LeftModifier,
            KeyCode::Char('r') => Button::RightModifier,
            _ => return,
        };
        self.last_seen[usize::from(button as u8)] = Some(now);
    }

    /// Input for the frame at `now`.
    fn frame(&mut self, now: Instant) -> InputFrame {
        let current: ButtonSet = Button::ALL
            .into_iter()
            .filter(|&button| {
                self.last_seen[usize::from(button as u8)]
                    .is_some_and(|seen| now.duration_since(seen) < HOLD_WINDOW)
            })
            .collect();
        let mut frame = InputFrame::from_transition(self.previous, current);
        self.previous = current;
        if let Some(modifier) = self.chord.take() {
            frame = frame.and_hold(modifier).and_press(Button::Confirm);
        }
        frame
    }
}

fn run_tui(game: &mut Game) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let mut pad = Pad::new();
    let mut next_frame = Instant::now();

    let result = loop {
        // Collect keys until the frame is due
        let timeout = next_frame.saturating_duration_since(Instant::now());
        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    pad.key(key.code, Instant::now());
                    if pad.quit {
                        break Ok(());
                    }
                    continue;
                }
                Ok(_) => continue,
                Err(e) => break Err(CliError::from(e)),
            },
            Ok(false) => {}
            Err(e) => break Err(CliError::from(e)),
        }

        let now = Instant::now();
        next_frame = now + FRAME;
        let frame = game.tick(pad.frame(now));
        if let Err(e) = terminal.draw(|f| ui(f, &frame)) {
            break Err(CliError::new(e.to_string()));
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn ui(f: &mut ratatui::Frame, frame: &fauna::Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Screen
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(f.area());

    match &frame.screen {
        Screen::World(view) => render_world(f, chunks[0], view),
        Screen::Panel { title, lines } => render_panel(f, chunks[0], title, lines),
    }

    let message = Paragraph::new(frame.message.clone().unwrap_or_default())
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let controls = " [←↑↓→/wasd] Move  [z] Act  [x] Back  [Enter] Menu  [c] Craft  [l/r] Select  [b] Build  [o] Orb  [q] Quit ";
    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[2]);
}

fn render_world(f: &mut ratatui::Frame, area: Rect, view: &fauna::WorldView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(5)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(16)])
        .split(rows[0]);

    let map: Vec<Line> = view.viewport.iter().map(|row| colored_row(row)).collect();
    let map_widget = Paragraph::new(map).block(Block::default().borders(Borders::ALL).title(" World "));
    f.render_widget(map_widget, columns[0]);

    let minimap: Vec<Line> = view.minimap.iter().map(|row| Line::from(row.as_str())).collect();
    let minimap_widget =
        Paragraph::new(minimap).block(Block::default().borders(Borders::ALL).title(" Map "));
    f.render_widget(minimap_widget, columns[1]);

    let status = vec![
        Line::from(view.status.as_str()),
        Line::from(view.companions.as_str()),
        Line::from(view.hud.as_str()),
    ];
    let status_widget = Paragraph::new(status)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(status_widget, rows[1]);
}

fn colored_row(row: &str) -> Line<'_> {
    let spans: Vec<Span> = row
        .chars()
        .map(|ch| {
            let color = match ch {
                'G' => Color::Green,
                'Y' => Color::LightGreen,
                'W' => Color::Blue,
                'S' => Color::Yellow,
                '#' => Color::DarkGray,
                'H' => Color::Red,
                '@' => Color::Magenta,
                'P' => Color::Cyan,
                _ => Color::White,
            };
            Span::styled(ch.to_string(), Style::default().fg(color))
        })
        .collect();
    Line::from(spans)
}

fn render_panel(f: &mut ratatui::Frame, area: Rect, title: &str, lines: &[String]) {
    let body: Vec<Line> = lines.iter().map(|line| Line::from(line.as_str())).collect();
    let panel = Paragraph::new(body)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {title} "))
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(panel, area);
}

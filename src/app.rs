//! App: terminal init, single-threaded event loop, tick and key dispatch.

use crate::Args;
use crate::input::{self, Command};
use crate::piece::Lcg;
use crate::session::{Session, Status};
use crate::theme::Theme;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// External tick cadence; the session's per-level divider decides how many
/// of these elapse between descents.
const TICK_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Topic,
    Playing,
    Over,
    Bonus,
    Farewell,
}

/// Owns the session and the screen state. Timer deadlines and key events
/// are serialized through one loop; nothing else ever touches the session.
pub struct App {
    session: Session,
    theme: Theme,
    screen: Screen,
}

impl App {
    pub fn new(args: &Args, theme: Theme) -> Self {
        let session = Session::new(args.level, Box::new(Lcg::from_entropy()));
        let screen = if args.no_splash {
            Screen::Playing
        } else {
            Screen::Splash
        };
        Self {
            session,
            theme,
            screen,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size},
        };

        let (cols, rows) = size()?;
        if cols < ui::MIN_COLS || rows < ui::MIN_ROWS {
            anyhow::bail!(
                "terminal too small: need {}x{}, have {}x{}",
                ui::MIN_COLS,
                ui::MIN_ROWS,
                cols,
                rows
            );
        }

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut next_tick = Instant::now() + TICK_INTERVAL;
        loop {
            terminal.draw(|f| ui::draw(f, self.screen, &self.session, &self.theme))?;

            match self.screen {
                Screen::Splash | Screen::Topic => {
                    if poll_key(Duration::from_millis(100))?.is_some() {
                        self.screen = if self.screen == Screen::Splash {
                            Screen::Topic
                        } else {
                            Screen::Playing
                        };
                        next_tick = Instant::now() + TICK_INTERVAL;
                    }
                }
                Screen::Playing => {
                    let timeout = next_tick.saturating_duration_since(Instant::now());
                    if event::poll(timeout)? {
                        while event::poll(Duration::ZERO)? {
                            if let Event::Key(key) = event::read()? {
                                if key.kind != KeyEventKind::Press {
                                    continue;
                                }
                                match input::command_for(key) {
                                    Command::Quit => {
                                        self.screen = Screen::Farewell;
                                        break;
                                    }
                                    cmd => self.apply(cmd),
                                }
                            }
                        }
                    }
                    if self.screen != Screen::Playing {
                        continue;
                    }
                    while Instant::now() >= next_tick {
                        self.session.tick();
                        next_tick += TICK_INTERVAL;
                    }
                    match self.session.status {
                        Status::Over => self.screen = Screen::Over,
                        Status::BonusEnding => self.screen = Screen::Bonus,
                        _ => {}
                    }
                }
                Screen::Over | Screen::Bonus | Screen::Farewell => {
                    if poll_key(Duration::from_millis(250))?.is_some() {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::MoveLeft => self.session.move_left(),
            Command::MoveRight => self.session.move_right(),
            Command::SoftDrop => self.session.soft_drop(),
            Command::HardDrop => self.session.hard_drop(),
            Command::RotateCw => self.session.rotate(true),
            Command::RotateCcw => self.session.rotate(false),
            Command::Quit | Command::None => {}
        }
    }
}

/// Wait up to `timeout` for a key press; repeats and releases are dropped.
fn poll_key(timeout: Duration) -> Result<Option<crossterm::event::KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}

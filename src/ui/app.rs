use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::Backend, Terminal};

use super::delay::UiConfig;
use super::game_view::{self, Screen};
use crate::error::{MoveError, SessionError};
use crate::game::{GameOutcome, Move, COLS};
use crate::session::{SessionSnapshot, SharedSession};

/// A computer move that is already on the board but not shown yet.
struct Reveal {
    mv: Move,
    at: Instant,
}

pub struct App {
    session: SharedSession,
    snapshot: SessionSnapshot,
    ui: UiConfig,
    rng: StdRng,
    selected_column: usize,
    reveal: Option<Reveal>,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(session: SharedSession, ui: UiConfig) -> Result<Self, SessionError> {
        let snapshot = session.snapshot()?;
        Ok(App {
            session,
            snapshot,
            ui,
            rng: StdRng::from_os_rng(),
            selected_column: COLS / 2,
            reveal: None,
            should_quit: false,
            message: None,
        })
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            self.tick();
            terminal
                .draw(|f| self.render(f))
                .map_err(Into::<io::Error>::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Show the computer's token once its thinking time is up.
    fn tick(&mut self) {
        if self.reveal.as_ref().is_some_and(|r| Instant::now() >= r.at) {
            self.reveal = None;
            self.announce_outcome();
        }
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < COLS {
                    self.selected_column += 1;
                }
            }
            KeyCode::Char(c @ '1'..='7') => {
                self.selected_column = c as usize - '1' as usize;
                self.drop_piece();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('n') => {
                self.reveal = None;
                self.apply(|session| session.next_round(), "New round!");
                self.selected_column = COLS / 2;
            }
            KeyCode::Char('s') => {
                self.apply(|session| session.reset_scores(), "Scores reset.");
            }
            _ => {}
        }
    }

    fn apply(&mut self, action: impl FnOnce(&SharedSession) -> Result<(), SessionError>, done: &str) {
        match action(&self.session) {
            Ok(()) => self.message = Some(done.to_string()),
            Err(err) => self.message = Some(err.to_string()),
        }
        self.refresh();
    }

    fn drop_piece(&mut self) {
        if self.reveal.is_some() {
            self.message = Some("Wait for the computer's move.".to_string());
            return;
        }
        if self.snapshot.game.game_over {
            self.message = Some("Game over! Press 'n' for a new round.".to_string());
            return;
        }

        match self.session.play_turn(self.selected_column) {
            Ok(report) => {
                self.refresh();
                match (report.computer, self.snapshot.opponent.difficulty()) {
                    (Some(mv), Some(difficulty)) => {
                        let delay = self.ui.thinking_delay(difficulty, &mut self.rng);
                        self.reveal = Some(Reveal {
                            mv,
                            at: Instant::now() + delay,
                        });
                        self.message = Some(format!("{} is thinking...", self.name_of(&mv)));
                    }
                    _ => {
                        self.message = None;
                        self.announce_outcome();
                    }
                }
            }
            Err(SessionError::Move(MoveError::ColumnFull(_))) => {
                self.message = Some("Column is full!".to_string());
            }
            Err(err) => {
                self.message = Some(err.to_string());
                self.refresh();
            }
        }
    }

    fn refresh(&mut self) {
        match self.session.snapshot() {
            Ok(snapshot) => self.snapshot = snapshot,
            Err(err) => {
                self.message = Some(err.to_string());
                self.should_quit = true;
            }
        }
    }

    fn announce_outcome(&mut self) {
        let game = &self.snapshot.game;
        if !game.game_over {
            return;
        }
        self.message = Some(match game.winner {
            Some(player) => format!("{} wins!", game.player_name(player)),
            None => "It's a draw!".to_string(),
        });
    }

    fn name_of(&self, mv: &Move) -> String {
        self.snapshot.game.player_name(mv.player).to_string()
    }

    /// Outcome as shown on screen; hidden while the computer is "thinking".
    fn visible_outcome(&self) -> Option<GameOutcome> {
        if self.reveal.is_some() || !self.snapshot.game.game_over {
            return None;
        }
        Some(match self.snapshot.game.winner {
            Some(player) => GameOutcome::Winner(player),
            None => GameOutcome::Draw,
        })
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        let screen = Screen {
            snapshot: &self.snapshot,
            hidden: self.reveal.as_ref().map(|r| r.mv),
            outcome: self.visible_outcome(),
            selected_column: self.selected_column,
            message: self.message.as_deref(),
        };
        game_view::render(frame, &screen);
    }
}

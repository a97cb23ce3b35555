use crate::coordinator::{LocalMatch, TickOutcome};
use crate::error::CoordinatorError;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::{Duration, Instant};

pub struct App {
    game: LocalMatch,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    tick_rate: Duration,
}

impl App {
    pub fn new(game: LocalMatch, tick_rate: Duration) -> Self {
        let selected_column = game.variant().cols() / 2; // Start in middle
        App {
            game,
            selected_column,
            should_quit: false,
            message: None,
            tick_rate,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        let mut last_tick = Instant::now();
        loop {
            terminal.draw(|f| self.render(f)).map_err(Into::into)?;

            if self.should_quit {
                break;
            }

            let timeout = self.tick_rate.saturating_sub(last_tick.elapsed());
            self.handle_events(timeout)?;
            if last_tick.elapsed() >= self.tick_rate {
                self.tick();
                last_tick = Instant::now();
            }
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self, timeout: Duration) -> io::Result<()> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Advance the falling piece, if any.
    fn tick(&mut self) {
        match self.game.tick() {
            Ok(TickOutcome::Landed(applied)) if applied.outcome.is_some() => {
                self.message = Some("Press 'r' for a new game.".to_string());
            }
            Ok(_) => {}
            Err(err) => {
                log::error!("tick failed: {err}");
                self.message = Some(err.to_string());
            }
        }
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                }
            }
            KeyCode::Right => {
                if self.selected_column + 1 < self.game.variant().cols() {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.game.reset();
                self.selected_column = self.game.variant().cols() / 2;
                self.message = Some("New game started!".to_string());
            }
            _ => {}
        }
    }

    /// Drop piece in selected column
    fn drop_piece(&mut self) {
        match self.game.play(self.selected_column) {
            Ok(()) => {}
            Err(CoordinatorError::MoveInFlight) => {}
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, &self.game, self.selected_column, &self.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, VariantKind};

    fn app() -> App {
        let game = LocalMatch::new(VariantKind::ConnectFive.variant(), None);
        App::new(game, Duration::from_millis(10))
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut app = app();
        assert_eq!(app.selected_column, 4);
        for _ in 0..10 {
            app.handle_key(KeyEvent::from(KeyCode::Right));
        }
        assert_eq!(app.selected_column, 8);
        for _ in 0..10 {
            app.handle_key(KeyEvent::from(KeyCode::Left));
        }
        assert_eq!(app.selected_column, 0);
    }

    #[test]
    fn test_enter_drops_after_ticks() {
        let mut app = app();
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.game.board().filled(), 0);
        for _ in 0..6 {
            app.tick();
        }
        assert_eq!(app.game.board().get(5, 4), Cell::Red);
        assert!(app.message.is_none());
    }

    #[test]
    fn test_full_column_shows_reason() {
        let mut app = app();
        for _ in 0..6 {
            app.handle_key(KeyEvent::from(KeyCode::Char(' ')));
            app.game.run_until_idle().unwrap();
        }
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.message.as_deref(), Some("move rejected: column is full"));
    }

    #[test]
    fn test_reset_and_quit() {
        let mut app = app();
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        app.handle_key(KeyEvent::from(KeyCode::Char('r')));
        app.tick();
        assert_eq!(app.game.board().filled(), 0);

        app.handle_key(KeyEvent::from(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use log::{debug, info};

use crate::game::{GameOverReason, RunState, SnakeGame, TickOutcome};
use crate::input::{key_action, Button, KeyAction};
use crate::screen::{ButtonBar, Frame, Overlay, Screen};
use crate::term;
use crate::timer::RepeatingTimer;

pub const TICK_INTERVAL: Duration = Duration::from_millis(150);

// How long to wait for input when no tick is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Owns the game and the screen, and decides when the game moves.
pub struct Controller<S: Screen> {
    game: SnakeGame,
    screen: S,
    timer: RepeatingTimer,
    start_pending: bool,
    quit: bool,
    shown_scores: Option<(u32, u32)>,
    shown_overlay: Option<Overlay>,
    shown_buttons: Option<ButtonBar>,
}

impl<S: Screen> Controller<S> {
    pub fn new(game: SnakeGame, screen: S) -> Self {
        Controller {
            game,
            screen,
            timer: RepeatingTimer::new(TICK_INTERVAL),
            start_pending: false,
            quit: false,
            shown_scores: None,
            shown_overlay: None,
            shown_buttons: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.render()?;

        while !self.should_quit() {
            self.run_pending(Instant::now())?;

            let wait = self.next_wakeup(Instant::now());
            if let Some(ev) = term::wait_event(wait)? {
                self.handle_event(ev, Instant::now())?;
            }

            self.on_timer(Instant::now())?;
        }

        info!("Quitting");
        Ok(())
    }

    pub fn handle_event(&mut self, ev: Event, now: Instant) -> Result<()> {
        match ev {
            Event::Key(key) => self.handle_key(&key, now),
            Event::Mouse(MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, .. }) => {
                match self.screen.button_at(column, row) {
                    Some(button) => self.click(button, now),
                    None => Ok(()),
                }
            }
            Event::Resize(..) => self.redraw(),
            _ => Ok(()),
        }
    }

    pub fn handle_key(&mut self, ev: &KeyEvent, now: Instant) -> Result<()> {
        let action = key_action(ev);

        match action {
            KeyAction::Quit => {
                self.quit = true;
                Ok(())
            }
            KeyAction::Pause => match self.game.run_state() {
                RunState::Running | RunState::Paused => self.toggle_pause(now),
                RunState::Idle | RunState::Over => self.start(now),
            },
            KeyAction::Steer(_) | KeyAction::Other => {
                if matches!(self.game.run_state(), RunState::Idle | RunState::Over) {
                    self.start(now)?;
                }
                if let KeyAction::Steer(dir) = action {
                    self.game.set_direction(dir);
                }
                Ok(())
            }
        }
    }

    pub fn click(&mut self, button: Button, now: Instant) -> Result<()> {
        if !ButtonBar::for_state(self.game.run_state()).is_enabled(button) {
            debug!("Ignoring click on disabled {:?}", button);
            return Ok(());
        }

        match button {
            Button::Start => self.start(now),
            Button::Pause => self.toggle_pause(now),
            Button::Reset => self.reset(),
            Button::Restart => self.restart(),
        }
    }

    /// Runs one tick and one frame if the timer is due.
    pub fn on_timer(&mut self, now: Instant) -> Result<()> {
        if !self.timer.poll(now) {
            return Ok(());
        }

        if let TickOutcome::GameOver(_) = self.game.tick() {
            self.timer.cancel();
        }
        self.render()
    }

    /// Second half of a restart: the reset frame is on screen, so begin moving.
    pub fn run_pending(&mut self, now: Instant) -> Result<()> {
        if !self.start_pending {
            return Ok(());
        }
        self.start(now)
    }

    pub fn next_wakeup(&self, now: Instant) -> Duration {
        if self.start_pending {
            return Duration::from_millis(0);
        }
        self.timer.time_until_due(now).unwrap_or(IDLE_POLL)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn game(&self) -> &SnakeGame {
        &self.game
    }

    #[cfg(test)]
    pub fn timer_active(&self) -> bool {
        self.timer.is_active()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn start(&mut self, now: Instant) -> Result<()> {
        self.start_pending = false;
        let was_over = self.game.run_state() == RunState::Over;

        if !self.game.start() {
            return Ok(());
        }

        // One schedule per running session, never a second one beside it.
        self.timer.restart(now);

        if was_over {
            self.render()
        } else {
            self.sync_ui()?;
            self.screen.flush()
        }
    }

    fn toggle_pause(&mut self, now: Instant) -> Result<()> {
        if !self.game.toggle_pause() {
            return Ok(());
        }

        match self.game.run_state() {
            RunState::Running => self.timer.restart(now),
            _ => self.timer.cancel(),
        }
        self.sync_ui()?;
        self.screen.flush()
    }

    fn reset(&mut self) -> Result<()> {
        self.timer.cancel();
        self.start_pending = false;
        self.game.reset();
        self.render()
    }

    fn restart(&mut self) -> Result<()> {
        self.reset()?;
        self.start_pending = true;
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        self.shown_scores = None;
        self.shown_overlay = None;
        self.shown_buttons = None;
        self.render()
    }

    fn render(&mut self) -> Result<()> {
        let frame = Frame {
            snake: self.game.snake(),
            direction: self.game.direction(),
            food: self.game.food(),
        };
        self.screen.draw_board(&frame)?;
        self.sync_ui()?;
        self.screen.flush()
    }

    fn sync_ui(&mut self) -> Result<()> {
        let scores = (self.game.score(), self.game.high_score());
        if self.shown_scores != Some(scores) {
            self.screen.show_scores(scores.0, scores.1)?;
            self.shown_scores = Some(scores);
        }

        let overlay = match self.game.run_state() {
            RunState::Paused => Some(Overlay::Paused),
            RunState::Over => Some(Overlay::GameOver {
                score: self.game.score(),
                high_score: self.game.high_score(),
                reason: self.game.game_over_reason().unwrap_or(GameOverReason::Wall),
            }),
            RunState::Idle | RunState::Running => None,
        };
        if overlay != self.shown_overlay {
            match overlay {
                Some(o) => self.screen.show_overlay(o)?,
                None => self.screen.hide_overlay()?,
            }
            self.shown_overlay = overlay;
        }

        let bar = ButtonBar::for_state(self.game.run_state());
        if self.shown_buttons != Some(bar) {
            self.screen.draw_buttons(bar)?;
            self.shown_buttons = Some(bar);
        }

        Ok(())
    }
}

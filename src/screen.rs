//! The drawing surface the controller talks to. The terminal implements it in
//! `term.rs`; tests use a recorder.

use anyhow::Result;

use crate::Coords;
use crate::game::{GameOverReason, RunState};
use crate::input::Button;
use crate::snake::{Direction, Snake};

pub struct Frame<'a> {
    pub snake: &'a Snake,
    pub direction: Direction,
    pub food: Coords,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Overlay {
    Paused,
    GameOver { score: u32, high_score: u32, reason: GameOverReason },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ButtonBar {
    pub start_enabled: bool,
    pub pause_enabled: bool,
    pub paused: bool,
}

impl ButtonBar {
    pub fn for_state(state: RunState) -> Self {
        ButtonBar {
            start_enabled: matches!(state, RunState::Idle | RunState::Over),
            pause_enabled: matches!(state, RunState::Running | RunState::Paused),
            paused: state == RunState::Paused,
        }
    }

    pub fn pause_label(&self) -> &'static str {
        if self.paused { "Resume" } else { "Pause" }
    }

    pub fn is_enabled(&self, button: Button) -> bool {
        match button {
            Button::Start => self.start_enabled,
            Button::Pause => self.pause_enabled,
            Button::Reset | Button::Restart => true,
        }
    }
}

pub trait Screen {
    /// Grid, snake (head distinct) and food.
    fn draw_board(&mut self, frame: &Frame) -> Result<()>;
    fn show_scores(&mut self, score: u32, high_score: u32) -> Result<()>;
    fn show_overlay(&mut self, overlay: Overlay) -> Result<()>;
    fn hide_overlay(&mut self) -> Result<()>;
    fn draw_buttons(&mut self, bar: ButtonBar) -> Result<()>;
    /// Which control, if any, is drawn at this terminal cell.
    fn button_at(&self, column: u16, row: u16) -> Option<Button>;
    fn flush(&mut self) -> Result<()>;
}

use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{bail, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::{Coords, GRID_COUNT, TermInt};
use crate::game::GameOverReason;
use crate::input::Button;
use crate::screen::{ButtonBar, Frame, Overlay, Screen};
use crate::snake::Snake;

// Two terminal columns per board cell keeps cells roughly square.
const CELL_WIDTH: TermInt = 2;
const BOARD_WIDTH: TermInt = GRID_COUNT as TermInt * CELL_WIDTH + 2;
const BOARD_HEIGHT: TermInt = GRID_COUNT as TermInt + 2;
const SCORE_ROW: TermInt = BOARD_HEIGHT;
const BUTTON_ROW: TermInt = BOARD_HEIGHT + 2;
pub const REQUIRED_SIZE: (TermInt, TermInt) = (BOARD_WIDTH, BUTTON_ROW + 1);

const EMPTY_CELL: [char; 2] = ['·', ' '];
const SNAKE_BODY: [char; 2] = ['█', '█'];
const APPLE: [char; 2] = ['(', ')'];

const GRID_COLOR: Color = Color::DarkGrey;
const BODY_COLOR: Color = Color::Blue;
const HEAD_COLOR: Color = Color::Magenta;
const APPLE_COLOR: Color = Color::Red;
const TEXT_COLOR: Color = Color::White;
const DISABLED_COLOR: Color = Color::DarkGrey;

type TermPos = (TermInt, TermInt);

const RESTART_LABEL: &str = "[ Restart ]";

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<(char, Color)>,
    current_msg: Option<Message>,
    buttons: Vec<ButtonRect>,
}

struct Message {
    top_left: TermPos,
    width: TermInt,
    height: TermInt,
    lines: Vec<String>,
    restart: Option<ButtonRect>,
}

#[derive(Copy, Clone)]
struct ButtonRect {
    button: Button,
    column: TermInt,
    row: TermInt,
    width: TermInt,
}

impl ButtonRect {
    fn contains(&self, column: TermInt, row: TermInt) -> bool {
        row == self.row && column >= self.column && column < self.column + self.width
    }
}

/// Waits up to `timeout` for the next terminal event.
pub fn wait_event(timeout: Duration) -> Result<Option<Event>> {
    if poll(timeout)? {
        Ok(Some(read()?))
    } else {
        Ok(None)
    }
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        if width < REQUIRED_SIZE.0 || height < REQUIRED_SIZE.1 {
            bail!(
                "terminal is {}x{}, the board needs at least {}x{}",
                width, height, REQUIRED_SIZE.0, REQUIRED_SIZE.1
            );
        }

        let stdout = stdout();
        let screen = vec![(' ', TEXT_COLOR); width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None, buttons: vec![] })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, EnableMouseCapture)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        self.clear()?;
        self.draw_borders()
    }

    fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking)?;
        execute!(self.stdout, DisableMouseCapture, LeaveAlternateScreen)?;
        Ok(())
    }

    fn draw_borders(&mut self) -> Result<()> {
        let end_x = BOARD_WIDTH - 1;
        let end_y = BOARD_HEIGHT - 1;

        for x in 0..BOARD_WIDTH {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.print_at((x, 0), ch, TEXT_COLOR)?;
            self.print_at((x, end_y), ch, TEXT_COLOR)?;
        }

        for y in 1..end_y {
            self.print_at((0, y), '|', TEXT_COLOR)?;
            self.print_at((end_x, y), '|', TEXT_COLOR)?;
        }

        self.flush()
    }

    fn show_message(&mut self, lines: Vec<String>, restart_line: Option<usize>) -> Result<()> {
        if self.current_msg.is_some() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 4) as TermInt;
        let center = (BOARD_WIDTH / 2, BOARD_HEIGHT / 2);
        let top_left = (center.0 - msg_width / 2, center.1 - msg_height / 2);

        let restart = restart_line.map(|i| {
            let label = RESTART_LABEL.len() as TermInt;
            ButtonRect {
                button: Button::Restart,
                column: top_left.0 + (msg_width - label) / 2,
                row: top_left.1 + i as TermInt + 1,
                width: label,
            }
        });

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height, lines, restart });
        self.draw_message()
    }

    fn draw_message(&mut self) -> Result<()> {
        let (top_left, width, height, lines) = match &self.current_msg {
            Some(msg) => (msg.top_left, msg.width, msg.height, msg.lines.clone()),
            None => return Ok(()),
        };

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + height - 1].iter() {
            for x_diff in 0..width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ', TEXT_COLOR)?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch, TEXT_COLOR)?;
            }
        }

        Ok(())
    }

    fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                let (ch, color) = self.screen[self.width as usize * y as usize + x as usize];
                self.print_at_no_save((x, y), ch, color)?;
            }
        }

        Ok(())
    }

    fn print_cell(&mut self, cell: Coords, glyph: [char; 2], color: Color) -> Result<()> {
        let x = 1 + cell.0 as TermInt * CELL_WIDTH;
        let y = 1 + cell.1 as TermInt;
        self.print_at((x, y), glyph[0], color)?;
        self.print_at((x + 1, y), glyph[1], color)
    }

    fn print_str_at(&mut self, pos: TermPos, s: &str, color: Color) -> Result<()> {
        for (i, ch) in s.chars().enumerate() {
            self.print_at((pos.0 + i as TermInt, pos.1), ch, color)?;
        }
        Ok(())
    }

    fn print_at(&mut self, pos: TermPos, ch: char, color: Color) -> Result<()> {
        if pos.0 >= self.width || pos.1 >= self.height {
            return Ok(());
        }
        self.print_at_no_save(pos, ch, color)?;
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = (ch, color);
        Ok(())
    }

    fn print_at_no_save(&mut self, pos: TermPos, ch: char, color: Color) -> Result<()> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::SetForegroundColor(color), style::Print(ch))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![(' ', TEXT_COLOR); self.width as usize * self.height as usize];
        Ok(())
    }
}

impl Screen for TermManager {
    fn draw_board(&mut self, frame: &Frame) -> Result<()> {
        for y in 0..GRID_COUNT {
            for x in 0..GRID_COUNT {
                self.print_cell((x, y), EMPTY_CELL, GRID_COLOR)?;
            }
        }

        self.print_cell(frame.food, APPLE, APPLE_COLOR)?;

        for (i, pos) in frame.snake.body().iter().enumerate().rev() {
            if i == 0 {
                let head = Snake::head_char(frame.direction);
                self.print_cell(*pos, [head, head], HEAD_COLOR)?;
            } else {
                self.print_cell(*pos, SNAKE_BODY, BODY_COLOR)?;
            }
        }

        // The board was drawn over any open message.
        self.draw_message()
    }

    fn show_scores(&mut self, score: u32, high_score: u32) -> Result<()> {
        let line = format!(" Score: {:<8} High score: {:<8}", score, high_score);
        self.print_str_at((0, SCORE_ROW), &line, TEXT_COLOR)
    }

    fn show_overlay(&mut self, overlay: Overlay) -> Result<()> {
        match overlay {
            Overlay::Paused => self.show_message(
                vec!["Paused".to_string(), "Space to resume".to_string()],
                None,
            ),
            Overlay::GameOver { score, high_score, reason } => {
                let title = match reason {
                    GameOverReason::BoardFull => "You won!",
                    GameOverReason::Wall | GameOverReason::Body => "Game over!",
                };
                let lines = vec![
                    title.to_string(),
                    format!("Score: {}", score),
                    format!("High score: {}", high_score),
                    String::new(),
                    RESTART_LABEL.to_string(),
                ];
                self.show_message(lines, Some(4))
            }
        }
    }

    fn hide_overlay(&mut self) -> Result<()> {
        self.hide_message()
    }

    fn draw_buttons(&mut self, bar: ButtonBar) -> Result<()> {
        let controls = [
            (Button::Start, "Start", bar.start_enabled),
            (Button::Pause, bar.pause_label(), bar.pause_enabled),
            (Button::Reset, "Reset", true),
        ];

        let blank = " ".repeat(BOARD_WIDTH as usize);
        self.print_str_at((0, BUTTON_ROW), &blank, TEXT_COLOR)?;

        self.buttons.clear();
        let mut column = 1;
        for (button, label, enabled) in controls.iter() {
            let text = format!("[ {} ]", label);
            let color = if *enabled { TEXT_COLOR } else { DISABLED_COLOR };
            self.print_str_at((column, BUTTON_ROW), &text, color)?;

            let width = text.len() as TermInt;
            self.buttons.push(ButtonRect { button: *button, column, row: BUTTON_ROW, width });
            column += width + 2;
        }

        Ok(())
    }

    fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        let restart = self.current_msg.as_ref().and_then(|msg| msg.restart);
        restart
            .iter()
            .chain(self.buttons.iter())
            .find(|rect| rect.contains(column, row))
            .map(|rect| rect.button)
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

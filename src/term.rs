use std::io::{stdout, Stdout, Write};

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::board::{Board, Position};
use crate::error::{Error, Result};
use crate::food::Look;
use crate::game::{GameOver, Snapshot};

/// What the driver loop needs from the terminal.
pub trait Screen {
    /// Current board size. Queried once per tick.
    fn board(&mut self) -> Result<Board>;

    /// Draws one frame on the board the tick was evaluated against.
    fn draw_frame(&mut self, board: &Board, snapshot: &Snapshot<'_>) -> Result<()>;

    fn show_game_over(&mut self, over: &GameOver) -> Result<()>;
}

pub struct TermManager {
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout() }
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        let (width, height) = terminal::size().map_err(Error::TerminalSize)?;

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as u16;
        let top_left = (
            (width / 2).saturating_sub(msg_width / 2),
            (height / 2).saturating_sub(msg_height / 2),
        );

        queue!(self.stdout, terminal::Clear(ClearType::All), ResetColor)?;

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), Print(padded_line))?;
        }

        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    fn print_at(&mut self, pos: Position, look: Look) -> Result<()> {
        // Board cells are 1-based, the cursor is 0-based.
        let (Ok(x), Ok(y)) = (u16::try_from(pos.x - 1), u16::try_from(pos.y - 1)) else {
            return Ok(());
        };
        queue!(
            self.stdout,
            cursor::MoveTo(x, y),
            SetForegroundColor(look.color),
            Print(look.glyph)
        )?;
        Ok(())
    }
}

/// Column that centers `status` on the top row.
fn status_column(board: &Board, status: &str) -> u16 {
    let x = board.width / 2 - status.chars().count() as i32 / 2;
    u16::try_from(x.max(0)).unwrap_or(0)
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for TermManager {
    fn board(&mut self) -> Result<Board> {
        let (w, h) = terminal::size().map_err(Error::TerminalSize)?;
        Ok(Board::new(w, h))
    }

    fn draw_frame(&mut self, board: &Board, snapshot: &Snapshot<'_>) -> Result<()> {
        let status = format!("Score: {}", snapshot.score);
        let status_x = status_column(board, &status);

        queue!(
            self.stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(status_x, 0),
            SetForegroundColor(Color::Green),
            Print(status)
        )?;

        for food in snapshot.foods {
            self.print_at(food.pos, food.kind.look)?;
        }

        for (i, segment) in snapshot.body.iter().enumerate() {
            let look = if i == 0 { Look::HEAD } else { segment.look };
            self.print_at(segment.pos, look)?;
        }

        queue!(self.stdout, ResetColor)?;
        self.flush()
    }

    fn show_game_over(&mut self, over: &GameOver) -> Result<()> {
        self.show_message(&["Game over!", &format!("Score: {}", over.score)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_centered_on_the_tick_board() {
        assert_eq!(status_column(&Board::new(80, 24), "Score: 12"), 36);
        assert_eq!(status_column(&Board::new(20, 24), "Score: 12"), 6);
        assert_eq!(status_column(&Board::new(4, 24), "Score: 12"), 0);
    }
}

use std::io::{self, Write};
use std::thread;

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::components::{GhostStatus, Pos, Tile};
use crate::config::Config;
use crate::game::{Game, Phase};

/// Where frames go. Only `frame` is required; the death flash and the final
/// screen are optional extras.
pub trait Render {
    fn frame(&mut self, game: &Game) -> io::Result<()>;

    fn death(&mut self, _game: &Game, _at: Pos) -> io::Result<()> {
        Ok(())
    }

    fn game_over(&mut self, _game: &Game) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Player,
    Ghost,
    GhostBlue,
    Wall,
    Empty,
    Dot,
    Pill,
    Death,
}

/// What is visible at `pos`: player over ghosts over the maze.
pub fn cell_for(game: &Game, status: GhostStatus, pos: Pos) -> Glyph {
    if game.player().pos == pos {
        return Glyph::Player;
    }
    if game.ghosts().iter().any(|g| g.pos == pos) {
        return match status {
            GhostStatus::Normal => Glyph::Ghost,
            GhostStatus::Vulnerable => Glyph::GhostBlue,
        };
    }
    match game.grid().cell_at(pos) {
        Tile::Wall => Glyph::Wall,
        Tile::Empty => Glyph::Empty,
        Tile::Dot => Glyph::Dot,
        Tile::Pill => Glyph::Pill,
    }
}

pub fn hud(game: &Game, config: &Config) -> String {
    let lives = if config.use_emoji {
        config.player.repeat(game.lives() as usize)
    } else {
        game.lives().to_string()
    };
    let mut line = format!("Score: {}\tLives: {}", game.score(), lives);
    let power = game.power().snapshot();
    if power.status == GhostStatus::Vulnerable {
        line.push_str(&format!("\tPower: {}s", power.remaining.as_secs() + 1));
    }
    line
}

/// Draws the maze on a raw-mode terminal, redrawing only cells that changed
/// since the previous frame.
pub struct TerminalRenderer<W: Write> {
    out: W,
    config: Config,
    cell_w: usize,
    last: Vec<Glyph>,
    last_hud: String,
    needs_full: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, config: Config) -> Self {
        let cell_w = if config.use_emoji { 2 } else { 1 };
        Self {
            out,
            config,
            cell_w,
            last: Vec::new(),
            last_hud: String::new(),
            needs_full: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn text(&self, glyph: Glyph) -> &str {
        match glyph {
            Glyph::Player => &self.config.player,
            Glyph::Ghost => &self.config.ghost,
            Glyph::GhostBlue => &self.config.ghost_blue,
            Glyph::Wall => &self.config.wall,
            Glyph::Empty => &self.config.space,
            Glyph::Dot => &self.config.dot,
            Glyph::Pill => &self.config.pill,
            Glyph::Death => &self.config.death,
        }
    }

    fn draw_cell(&mut self, pos: Pos, glyph: Glyph) -> io::Result<()> {
        let x = (pos.col * self.cell_w) as u16;
        let y = pos.row as u16;
        let text = self.text(glyph).to_string();

        self.out.queue(MoveTo(x, y))?;
        match glyph {
            Glyph::Wall => {
                self.out.queue(SetBackgroundColor(Color::Blue))?;
            }
            _ if !self.config.use_emoji => {
                self.out.queue(SetForegroundColor(color_for(glyph)))?;
            }
            _ => {}
        }
        self.out.queue(Print(&text))?;
        let w = UnicodeWidthStr::width(text.as_str());
        for _ in w..self.cell_w {
            self.out.queue(Print(' '))?;
        }
        self.out.queue(ResetColor)?;
        Ok(())
    }

    fn status_row(&self, game: &Game) -> u16 {
        game.grid().height() as u16 + 1
    }
}

fn color_for(glyph: Glyph) -> Color {
    match glyph {
        Glyph::Player => Color::Yellow,
        Glyph::Ghost => Color::Red,
        Glyph::GhostBlue => Color::Blue,
        Glyph::Wall | Glyph::Empty => Color::Reset,
        Glyph::Dot => Color::White,
        Glyph::Pill => Color::Magenta,
        Glyph::Death => Color::DarkRed,
    }
}

impl<W: Write> Render for TerminalRenderer<W> {
    fn frame(&mut self, game: &Game) -> io::Result<()> {
        let grid = game.grid();
        let (height, width) = (grid.height(), grid.width());
        if self.last.len() != width * height {
            self.last = vec![Glyph::Empty; width * height];
            self.needs_full = true;
        }
        if self.needs_full {
            self.out.queue(Clear(ClearType::All))?;
        }

        // One read of the shared status per frame.
        let status = game.ghost_status();
        for row in 0..height {
            for col in 0..width {
                let pos = Pos { row, col };
                let glyph = cell_for(game, status, pos);
                let idx = row * width + col;
                if self.needs_full || glyph != self.last[idx] {
                    self.last[idx] = glyph;
                    self.draw_cell(pos, glyph)?;
                }
            }
        }

        let hud = hud(game, &self.config);
        if self.needs_full || hud != self.last_hud {
            let row = self.status_row(game);
            self.out.queue(MoveTo(0, row))?;
            self.out.queue(Clear(ClearType::CurrentLine))?;
            self.out.queue(Print(&hud))?;
            self.last_hud = hud;
        }
        self.needs_full = false;

        self.out.flush()
    }

    fn death(&mut self, game: &Game, at: Pos) -> io::Result<()> {
        self.draw_cell(at, Glyph::Death)?;
        if let Some(slot) = self.last.get_mut(at.row * game.grid().width() + at.col) {
            *slot = Glyph::Death;
        }
        self.out.flush()?;
        thread::sleep(self.config.death_pause());
        Ok(())
    }

    fn game_over(&mut self, game: &Game) -> io::Result<()> {
        if game.lives() == 0 {
            self.draw_cell(game.player().pos, Glyph::Death)?;
        }
        let row = self.status_row(game) + 1;
        let msg = match game.phase() {
            Phase::Won => format!("YOU WIN - Final Score: {}", game.score()),
            _ => format!("GAME OVER - Final Score: {}", game.score()),
        };
        self.out.queue(MoveTo(0, row))?;
        self.out.queue(Print(msg))?;
        self.out.queue(Print("\r\n"))?;
        self.out.flush()
    }
}

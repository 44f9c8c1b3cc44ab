//! The tick loop: input, ghosts, collisions, termination, render, sleep.

use std::io;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::components::{Dir, GhostStatus, Pos};
use crate::config::Config;
use crate::ghost::{move_ghosts, DirectionSource, Ghost};
use crate::input::{InputStream, Key};
use crate::level::{Grid, Level};
use crate::player::{Eaten, Player};
use crate::power::PowerEffect;
use crate::render::Render;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collision {
    pub ghost: usize,
    pub at: Pos,
    pub status: GhostStatus,
}

/// What happened during one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub key: Option<Key>,
    pub eaten: Option<Eaten>,
    pub collisions: Vec<Collision>,
    pub phase: Phase,
}

/// Anything the loop can poll for the next key without waiting.
pub trait KeySource {
    fn poll_key(&mut self) -> Option<Key>;
}

impl KeySource for InputStream {
    fn poll_key(&mut self) -> Option<Key> {
        self.poll()
    }
}

pub struct Game {
    grid: Grid,
    player: Player,
    ghosts: Vec<Ghost>,
    score: u32,
    lives: u32,
    dots_left: usize,
    power: PowerEffect,
    phase: Phase,
}

impl Game {
    pub fn new(level: Level, lives: u32, pill_duration: Duration) -> Self {
        Self {
            grid: level.grid,
            player: Player::new(level.player_spawn),
            ghosts: level.ghost_spawns.into_iter().map(Ghost::new).collect(),
            score: 0,
            lives,
            dots_left: level.dots,
            power: PowerEffect::new(pill_duration),
            phase: Phase::Running,
        }
    }

    pub fn from_config(level: Level, config: &Config) -> Self {
        Self::new(level, config.lives, config.pill_duration())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn dots_left(&self) -> usize {
        self.dots_left
    }

    pub fn ghost_status(&self) -> GhostStatus {
        self.power.status()
    }

    pub fn power(&self) -> &PowerEffect {
        &self.power
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advances the game by one tick. Once the game has ended this does
    /// nothing and keeps reporting the final phase.
    pub fn tick(&mut self, key: Option<Key>, dirs: &mut impl DirectionSource) -> TickReport {
        let mut report = TickReport {
            key,
            eaten: None,
            collisions: Vec::new(),
            phase: self.phase,
        };
        if self.phase != Phase::Running {
            return report;
        }

        match key {
            Some(Key::Esc) => {
                info!("quit requested");
                self.lives = 0;
            }
            Some(key) => {
                if let Some(dir) = key.dir() {
                    report.eaten = self.move_player(dir);
                }
            }
            None => {}
        }

        move_ghosts(&mut self.ghosts, &self.grid, dirs);

        report.collisions = self.handle_collisions();

        self.phase = self.check_end();
        report.phase = self.phase;
        report
    }

    fn move_player(&mut self, dir: Dir) -> Option<Eaten> {
        let eaten = self.player.step(&mut self.grid, dir)?;
        self.score += eaten.score();
        match eaten {
            Eaten::Dot => self.dots_left = self.dots_left.saturating_sub(1),
            Eaten::Pill => self.power.activate(),
        }
        Some(eaten)
    }

    /// Every ghost standing on the player costs one life, counted against
    /// where the player stood before any respawn.
    fn handle_collisions(&mut self) -> Vec<Collision> {
        let at = self.player.pos;
        let hits: Vec<usize> = self
            .ghosts
            .iter()
            .enumerate()
            .filter(|(_, ghost)| ghost.pos == at)
            .map(|(idx, _)| idx)
            .collect();
        if hits.is_empty() {
            return Vec::new();
        }

        let status = self.power.status();
        self.lives = self.lives.saturating_sub(hits.len() as u32);
        debug!(
            row = at.row,
            col = at.col,
            ghosts = hits.len(),
            ?status,
            lives = self.lives,
            "caught"
        );
        if self.lives > 0 {
            self.player.respawn();
        }

        hits.into_iter()
            .map(|ghost| Collision { ghost, at, status })
            .collect()
    }

    fn check_end(&self) -> Phase {
        if self.dots_left == 0 {
            Phase::Won
        } else if self.lives == 0 {
            Phase::Lost
        } else {
            Phase::Running
        }
    }
}

/// Runs ticks until the game is won or lost.
///
/// Each tick polls at most one key, advances the game, hands the result to
/// `sink` and sleeps for `tick`.
pub fn run(
    game: &mut Game,
    keys: &mut impl KeySource,
    dirs: &mut impl DirectionSource,
    sink: &mut impl Render,
    tick: Duration,
) -> io::Result<Phase> {
    sink.frame(game)?;
    loop {
        let report = game.tick(keys.poll_key(), dirs);

        if let Some(hit) = report.collisions.first() {
            if game.lives() > 0 {
                sink.death(game, hit.at)?;
            }
        }
        sink.frame(game)?;

        if report.phase != Phase::Running {
            info!(phase = ?report.phase, score = game.score(), lives = game.lives(), "game over");
            sink.game_over(game)?;
            return Ok(report.phase);
        }

        thread::sleep(tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Tile;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Dir>);

    impl DirectionSource for Scripted {
        fn next_dir(&mut self) -> Dir {
            self.0.pop_front().unwrap_or(Dir::Up)
        }
    }

    fn game(maze: &str) -> Game {
        Game::new(Level::parse(maze).unwrap(), 3, Duration::from_secs(5))
    }

    fn stay() -> Scripted {
        Scripted(VecDeque::new())
    }

    #[test]
    fn no_key_moves_nobody_but_ghosts() {
        let mut game = game("#####\n#P.G#\n#####");
        let report = game.tick(None, &mut Scripted(VecDeque::from([Dir::Left])));
        assert_eq!(game.player().pos, Pos::new(1, 1));
        assert_eq!(game.ghosts()[0].pos, Pos::new(1, 2));
        assert_eq!(report.eaten, None);
        assert_eq!(report.phase, Phase::Running);
    }

    #[test]
    fn dot_scores_one_and_counts_down() {
        let mut game = game("#######\n#P..G.#\n#######");
        let report = game.tick(Some(Key::Right), &mut stay());
        assert_eq!(report.eaten, Some(Eaten::Dot));
        assert_eq!(game.score(), 1);
        assert_eq!(game.dots_left(), 2);
        assert_eq!(game.grid().cell_at(Pos::new(1, 2)), Tile::Empty);
    }

    #[test]
    fn pill_scores_ten_and_turns_ghosts_blue() {
        let mut game = game("#####\n#PX.#\n#G###");
        let report = game.tick(Some(Key::Right), &mut stay());
        assert_eq!(report.eaten, Some(Eaten::Pill));
        assert_eq!(game.score(), 10);
        assert_eq!(game.dots_left(), 1);
        assert_eq!(game.ghost_status(), GhostStatus::Vulnerable);
        assert!(game.power().is_active());
    }

    #[test]
    fn escape_forces_a_loss_this_tick() {
        let mut game = game("#####\n#P.G#\n#####");
        let report = game.tick(Some(Key::Esc), &mut stay());
        assert_eq!(game.lives(), 0);
        assert_eq!(report.phase, Phase::Lost);
        assert_eq!(game.player().pos, Pos::new(1, 1));
    }

    #[test]
    fn finished_game_ignores_further_ticks() {
        let mut game = game("#####\n#P.G#\n#####");
        game.tick(Some(Key::Esc), &mut stay());
        let report = game.tick(Some(Key::Right), &mut stay());
        assert_eq!(report.phase, Phase::Lost);
        assert_eq!(game.score(), 0);
        assert_eq!(game.player().pos, Pos::new(1, 1));
    }

    #[test]
    fn caught_player_loses_a_life_and_respawns() {
        let mut game = game("#######\n#P...G#\n#######");
        game.tick(Some(Key::Right), &mut Scripted(VecDeque::from([Dir::Left])));
        game.tick(Some(Key::Right), &mut Scripted(VecDeque::from([Dir::Up])));
        assert_eq!(game.player().pos, Pos::new(1, 3));
        assert_eq!(game.ghosts()[0].pos, Pos::new(1, 4));

        let report = game.tick(None, &mut Scripted(VecDeque::from([Dir::Left])));
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].at, Pos::new(1, 3));
        assert_eq!(report.collisions[0].status, GhostStatus::Normal);
        assert_eq!(game.lives(), 2);
        assert_eq!(game.player().pos, Pos::new(1, 1));
        assert_eq!(report.phase, Phase::Running);
    }

    #[test]
    fn last_life_leaves_player_in_place() {
        let mut game = Game::new(
            Level::parse("#####\n#PG.#\n#####").unwrap(),
            1,
            Duration::from_secs(5),
        );
        let report = game.tick(None, &mut Scripted(VecDeque::from([Dir::Left])));
        assert_eq!(game.lives(), 0);
        assert_eq!(game.player().pos, Pos::new(1, 1));
        assert_eq!(report.phase, Phase::Lost);
    }

    #[test]
    fn win_takes_precedence_over_loss() {
        let mut game = Game::new(
            Level::parse("#####\n#P.G#\n#####").unwrap(),
            1,
            Duration::from_secs(5),
        );
        let report = game.tick(Some(Key::Right), &mut Scripted(VecDeque::from([Dir::Left])));
        assert_eq!(game.dots_left(), 0);
        assert_eq!(game.lives(), 0);
        assert_eq!(report.phase, Phase::Won);
    }
}

//! Terminal maze chase.
//!
//! A [`Game`] owns the maze, the player, the ghosts and the power-pill timer
//! and advances them one [`Game::tick`] at a time. [`run`] drives the ticks
//! from an [`InputStream`] into a [`Render`] sink.

pub mod components;
pub mod config;
pub mod error;
pub mod game;
pub mod ghost;
pub mod input;
pub mod level;
pub mod movement;
pub mod player;
pub mod power;
pub mod render;

pub use components::{Dir, GhostStatus, Pos, Tile};
pub use config::Config;
pub use error::{LoadError, LoadResult};
pub use game::{run, Collision, Game, KeySource, Phase, TickReport};
pub use ghost::{DirectionSource, Ghost, Wander};
pub use input::{decode, InputStream, Key};
pub use level::{Grid, Level};
pub use movement::resolve;
pub use player::{Eaten, Player};
pub use power::{PowerEffect, PowerSnapshot};
pub use render::{Render, TerminalRenderer};

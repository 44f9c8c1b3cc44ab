use std::io::{self, Stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pacman_chase::{run, Config, Game, InputStream, Level, Phase, TerminalRenderer, Wander};

/// Eat every dot, dodge the ghosts. Arrow keys move, ESC quits.
#[derive(Parser, Debug)]
#[command(name = "pacman", version)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long, default_value = "assets/config.json")]
    config_file: PathBuf,

    /// Path to the maze file.
    #[arg(long, default_value = "assets/maze01.txt")]
    maze_file: PathBuf,

    /// Seed for ghost movement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    // Nothing touches the terminal until both files load.
    let level = Level::load(&cli.maze_file).context("failed to load maze")?;
    let config = Config::load(&cli.config_file).context("failed to load configuration")?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = play(level, config, cli.seed);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    let (phase, score) = result?;
    match phase {
        Phase::Won => println!("You win! Final score: {score}"),
        _ => println!("Game over. Final score: {score}"),
    }
    Ok(())
}

fn play(level: Level, config: Config, seed: Option<u64>) -> Result<(Phase, u32)> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut dirs = Wander::new(rng);
    let mut input = InputStream::spawn(io::stdin()).context("failed to start input reader")?;
    let mut renderer: TerminalRenderer<Stdout> = TerminalRenderer::new(io::stdout(), config.clone());
    let mut game = Game::from_config(level, &config);

    info!(?seed, tick_ms = config.tick_ms, "starting");
    let phase = run(&mut game, &mut input, &mut dirs, &mut renderer, config.tick())
        .context("terminal write failed")?;
    input.shutdown();
    Ok((phase, game.score()))
}

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{LoadError, LoadResult};

pub const DEFAULT_TICK_MS: u64 = 200;
pub const DEFAULT_LIVES: u32 = 3;
pub const DEFAULT_PILL_SECS: u64 = 10;
pub const DEFAULT_DEATH_PAUSE_MS: u64 = 1000;
pub const MAX_PILL_SECS: u64 = 3600;

/// Glyphs and timings. Everything has a default, so `{}` is a valid file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub player: String,
    pub ghost: String,
    pub ghost_blue: String,
    pub wall: String,
    pub dot: String,
    pub pill: String,
    pub death: String,
    pub space: String,
    pub use_emoji: bool,
    pub pill_duration_secs: u64,
    pub tick_ms: u64,
    pub lives: u32,
    pub death_pause_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player: "P".to_string(),
            ghost: "G".to_string(),
            ghost_blue: "B".to_string(),
            wall: "#".to_string(),
            dot: ".".to_string(),
            pill: "X".to_string(),
            death: "*".to_string(),
            space: " ".to_string(),
            use_emoji: false,
            pill_duration_secs: DEFAULT_PILL_SECS,
            tick_ms: DEFAULT_TICK_MS,
            lives: DEFAULT_LIVES,
            death_pause_ms: DEFAULT_DEATH_PAUSE_MS,
        }
    }
}

impl Config {
    /// Reads the JSON file, then applies `PACMAN_TICK_MS` if it is set.
    pub fn load(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&text)?;
        config.apply_env(std::env::var("PACMAN_TICK_MS").ok().as_deref());
        config.validate()?;
        info!(
            path = %path.display(),
            tick_ms = config.tick_ms,
            pill_secs = config.pill_duration_secs,
            emoji = config.use_emoji,
            "config loaded"
        );
        Ok(config)
    }

    pub fn parse(text: &str) -> LoadResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self, tick_ms: Option<&str>) {
        let Some(raw) = tick_ms else {
            return;
        };
        match raw.parse::<u64>().ok().filter(|v| *v > 0) {
            Some(v) => self.tick_ms = v,
            None => warn!("ignoring PACMAN_TICK_MS={raw:?}"),
        }
    }

    fn validate(&self) -> LoadResult<()> {
        if self.tick_ms == 0 {
            return Err(LoadError::Setting {
                name: "tick_ms",
                reason: "must be positive".to_string(),
            });
        }
        if self.pill_duration_secs > MAX_PILL_SECS {
            return Err(LoadError::Setting {
                name: "pill_duration_secs",
                reason: format!("must be at most {MAX_PILL_SECS}"),
            });
        }
        if self.lives == 0 {
            return Err(LoadError::Setting {
                name: "lives",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn pill_duration(&self) -> Duration {
        Duration::from_secs(self.pill_duration_secs)
    }

    pub fn death_pause(&self) -> Duration {
        Duration::from_millis(self.death_pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(Config::parse("{}").unwrap(), Config::default());
    }

    #[test]
    fn reads_glyphs_and_timing() {
        let config = Config::parse(
            r#"{
                "player": "😋", "ghost": "👻", "ghost_blue": "💀",
                "wall": "  ", "dot": "•", "pill": "💊", "death": "💀",
                "space": "  ", "use_emoji": true, "pill_duration_secs": 5
            }"#,
        )
        .unwrap();
        assert_eq!(config.player, "😋");
        assert!(config.use_emoji);
        assert_eq!(config.pill_duration(), Duration::from_secs(5));
        assert_eq!(config.tick(), Duration::from_millis(DEFAULT_TICK_MS));
        assert_eq!(config.lives, DEFAULT_LIVES);
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        assert!(matches!(
            Config::parse("{ not json").unwrap_err(),
            LoadError::Config(_)
        ));
        assert!(matches!(
            Config::parse(r#"{"pill_duration_secs": "ten"}"#).unwrap_err(),
            LoadError::Config(_)
        ));
    }

    #[test]
    fn rejects_zero_tick_and_lives() {
        assert!(matches!(
            Config::parse(r#"{"tick_ms": 0}"#).unwrap_err(),
            LoadError::Setting { name: "tick_ms", .. }
        ));
        assert!(matches!(
            Config::parse(r#"{"lives": 0}"#).unwrap_err(),
            LoadError::Setting { name: "lives", .. }
        ));
    }

    #[test]
    fn rejects_pill_durations_past_the_cap() {
        assert!(matches!(
            Config::parse(r#"{"pill_duration_secs": 18446744073709551615}"#).unwrap_err(),
            LoadError::Setting {
                name: "pill_duration_secs",
                ..
            }
        ));
        let longest = Config::parse(r#"{"pill_duration_secs": 3600}"#).unwrap();
        assert_eq!(longest.pill_duration(), Duration::from_secs(MAX_PILL_SECS));
    }

    #[test]
    fn env_override_needs_a_positive_number() {
        let mut config = Config::default();
        config.apply_env(Some("50"));
        assert_eq!(config.tick_ms, 50);
        config.apply_env(Some("0"));
        assert_eq!(config.tick_ms, 50);
        config.apply_env(Some("fast"));
        assert_eq!(config.tick_ms, 50);
        config.apply_env(None);
        assert_eq!(config.tick_ms, 50);
    }
}

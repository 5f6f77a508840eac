use std::time::Duration;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use thiserror::Error;

pub const DEFAULT_BOARD_SIZE: u32 = 50;
pub const DEFAULT_WALL_THRESHOLD: f64 = 0.1;
pub const DEFAULT_FPS: u32 = 60;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("The board needs at least one cell per side")]
    ZeroBoardSize,
    #[error("Wall threshold {0} is not a probability")]
    InvalidWallThreshold(f64),
}

/// Board and pacing settings.
#[derive(clap::Args, Clone, Debug, PartialEq)]
pub struct BoardConfig {
    /// Rows and columns of the board
    #[arg(long, env = "ASTAR_BOARD_SIZE", default_value_t = DEFAULT_BOARD_SIZE)]
    pub board_size: u32,

    /// Probability for a cell to be a wall
    #[arg(long, env = "ASTAR_WALL_THRESHOLD", default_value_t = DEFAULT_WALL_THRESHOLD)]
    pub wall_threshold: f64,

    /// Search steps (and frames) per second, 0 runs unthrottled
    #[arg(long, env = "ASTAR_FPS", default_value_t = DEFAULT_FPS)]
    pub fps: u32,

    /// Seed for the maze generator, random when missing
    #[arg(long, env = "ASTAR_SEED")]
    pub seed: Option<u64>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            wall_threshold: DEFAULT_WALL_THRESHOLD,
            fps: DEFAULT_FPS,
            seed: None,
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::ZeroBoardSize);
        }
        if !(0.0..=1.0).contains(&self.wall_threshold) {
            return Err(ConfigError::InvalidWallThreshold(self.wall_threshold));
        }
        Ok(())
    }

    /// The configured seed, or a fresh one.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }

    /// A maze RNG seeded with [`BoardConfig::seed`].
    pub fn rng(&self) -> (u64, ChaCha8Rng) {
        let seed = self.seed();
        log::debug!("Seeding the maze generator with {seed}");
        (seed, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Time between two steps, `None` when unthrottled.
    pub fn tick(&self) -> Option<Duration> {
        (self.fps > 0).then(|| Duration::from_secs_f64(1.0 / self.fps as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Args {
        #[command(flatten)]
        board: BoardConfig,
    }

    #[test]
    fn defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.board_size, 50);
        assert_eq!(config.wall_threshold, 0.1);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.tick(), Some(Duration::from_secs_f64(1.0 / 60.0)));
    }

    #[test]
    fn parse_flags() {
        let args = Args::try_parse_from([
            "astar",
            "--board-size",
            "20",
            "--wall-threshold",
            "0.3",
            "--fps",
            "0",
            "--seed",
            "7",
        ])
        .unwrap();

        assert_eq!(
            args.board,
            BoardConfig {
                board_size: 20,
                wall_threshold: 0.3,
                fps: 0,
                seed: Some(7),
            }
        );
        assert_eq!(args.board.tick(), None);
        assert_eq!(args.board.seed(), 7);
    }

    #[test]
    fn validation() {
        let config = BoardConfig {
            board_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroBoardSize));

        let config = BoardConfig {
            wall_threshold: 1.5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidWallThreshold(1.5))
        );

        let config = BoardConfig {
            wall_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn seeded_rngs_repeat() {
        let config = BoardConfig {
            seed: Some(3),
            ..Default::default()
        };
        let (seed_a, mut a) = config.rng();
        let (seed_b, mut b) = config.rng();

        assert_eq!(seed_a, seed_b);
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }
}

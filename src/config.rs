use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use crate::game::GameConfig;
use crate::runtime::RunConfig;

#[derive(Parser, Debug)]
#[command(
    name = "term-snake",
    about = "Snake in the terminal. Arrow keys or WASD to steer, Ctrl+C to quit"
)]
pub struct Args {
    /// Milliseconds between ticks
    #[arg(long, default_value_t = 50)]
    pub tick_ms: u64,

    /// Seconds a food stays put after it is first drawn
    #[arg(long, default_value_t = 5)]
    pub food_ttl_secs: u64,

    /// Food never spawns closer than this to an edge
    #[arg(long, default_value_t = 10)]
    pub food_inset: i32,

    /// Seed for food placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Append diagnostics to this file
    #[arg(long, default_value = "run.log")]
    pub log_file: PathBuf,

    /// Milliseconds the final score stays on screen
    #[arg(long, default_value_t = 1500)]
    pub linger_ms: u64,
}

impl Args {
    pub fn game_config(&self) -> GameConfig {
        GameConfig { food_inset: self.food_inset, ..GameConfig::default() }
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            tick: Duration::from_millis(self.tick_ms),
            food_ttl: Duration::from_secs(self.food_ttl_secs),
            linger: Duration::from_millis(self.linger_ms),
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["term-snake"]).unwrap();
        let run = args.run_config();
        let game = args.game_config();

        assert_eq!(run.tick, Duration::from_millis(50));
        assert_eq!(run.food_ttl, Duration::from_secs(5));
        assert_eq!(game.food_inset, 10);
        assert_eq!(game.max_food_count, 3);
        assert_eq!(args.log_file, PathBuf::from("run.log"));
        assert!(args.seed.is_none());
    }

    #[test]
    fn seed_makes_rng_repeatable() {
        let args = Args::try_parse_from(["term-snake", "--seed", "11", "--tick-ms", "80"]).unwrap();
        assert_eq!(args.run_config().tick, Duration::from_millis(80));

        let a: u64 = args.rng().gen();
        let b: u64 = args.rng().gen();
        assert_eq!(a, b);
    }
}

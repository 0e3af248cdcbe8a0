use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use simplelog::LevelFilter;

const HIGH_SCORE_FILE: &str = "high_score.json";
const LOG_FILE: &str = "snake.log";

#[derive(Parser, Debug)]
#[command(version, about = "Snake on a 20x20 board, in the terminal")]
pub struct Args {
    /// Where the high score is kept [default: the platform data directory]
    #[arg(long)]
    pub high_score_file: Option<PathBuf>,

    /// Where log lines go [default: the platform data directory]
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub struct Config {
    pub high_score_file: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let data_dir = if args.high_score_file.is_some() && args.log_file.is_some() {
            None
        } else {
            Some(data_dir()?)
        };
        let in_data_dir = |name: &str| data_dir.as_ref().map(|dir| dir.join(name)).unwrap_or_default();

        Ok(Config {
            high_score_file: args.high_score_file.unwrap_or_else(|| in_data_dir(HIGH_SCORE_FILE)),
            log_file: args.log_file.unwrap_or_else(|| in_data_dir(LOG_FILE)),
            log_level: args.log_level,
            seed: args.seed,
        })
    }
}

fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "agubelu", "snake")
        .context("could not resolve project directories")?;
    Ok(proj.data_local_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_are_kept() {
        let args = Args::parse_from([
            "snake",
            "--high-score-file", "/tmp/hs.json",
            "--log-file", "/tmp/snake.log",
            "--log-level", "debug",
            "--seed", "42",
        ]);
        let config = Config::from_args(args).unwrap();

        assert_eq!(config.high_score_file, PathBuf::from("/tmp/hs.json"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/snake.log"));
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn defaults() {
        let args = Args::parse_from(["snake", "--high-score-file", "hs.json", "--log-file", "x.log"]);
        assert_eq!(args.log_level, LevelFilter::Info);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn bad_level_is_rejected() {
        assert!(Args::try_parse_from(["snake", "--log-level", "loud"]).is_err());
    }
}

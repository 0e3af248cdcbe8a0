mod config;
mod controller;
mod game;
mod input;
mod screen;
mod snake;
mod storage;
mod term;
mod timer;

use std::fs::{self, File};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use simplelog::{Config as LogConfig, WriteLogger};

use crate::config::{Args, Config};
use crate::controller::Controller;
use crate::game::SnakeGame;
use crate::storage::JsonFileStore;
use crate::term::TermManager;

pub type TermInt = u16;
pub type Coords = (i16, i16);

/// Cells along each side of the square board.
pub const GRID_COUNT: i16 = 20;

fn main() -> Result<()> {
    let config = Config::from_args(Args::parse())?;
    init_logging(&config)?;
    info!("Starting snake with {:?}", config);

    let store = JsonFileStore::new(config.high_score_file.clone());
    info!("High score file: {}", store.path().display());
    let game = SnakeGame::new(Box::new(store), config.seed);

    let mut term = TermManager::new().context("could not set up the board")?;
    term.setup().context("could not prepare the terminal")?;

    // The terminal is restored when the controller (and its TermManager) drops.
    let mut controller = Controller::new(game, term);
    let res = controller.run();
    info!("Leaving with high score {}", controller.game().high_score());
    drop(controller);

    res
}

fn init_logging(config: &Config) -> Result<()> {
    if let Some(dir) = config.log_file.parent() {
        fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))?;
    }
    let file = File::create(&config.log_file)
        .with_context(|| format!("could not create log file {}", config.log_file.display()))?;
    WriteLogger::init(config.log_level, LogConfig::default(), file)
        .context("could not initialize logging")?;
    Ok(())
}

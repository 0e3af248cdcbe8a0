use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Somewhere to keep the high score between sessions.
pub trait HighScoreStore {
    fn load(&self) -> Option<u32>;
    fn save(&mut self, score: u32) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
struct HighScoreSlot {
    #[serde(rename = "snakeHighScore")]
    high_score: u32,
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        JsonFileStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Option<u32> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                debug!("No high score at {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<HighScoreSlot>(&data) {
            Ok(slot) => Some(slot.high_score),
            Err(e) => {
                warn!("Ignoring malformed high score file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&mut self, score: u32) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("could not create {}", dir.display()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(&HighScoreSlot { high_score: score })?;
        fs::write(&tmp, data).with_context(|| format!("could not write {}", tmp.display()))?;

        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("could not replace {}", self.path.display()))?;

        Ok(())
    }
}

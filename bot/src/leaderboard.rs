use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use common::{GameResult, Leaderboard, ResultSink, ScoreEntry, ScoreLookup};
use tracing::{debug, info};

/// Leaderboard that records results under one player name, optionally
/// persisted as JSON after every reported round.
#[derive(Debug)]
pub struct LeaderboardStore {
    path: Option<PathBuf>,
    player_name: String,
    board: Leaderboard,
}

impl LeaderboardStore {
    pub fn in_memory(player_name: impl Into<String>) -> Self {
        LeaderboardStore {
            path: None,
            player_name: player_name.into(),
            board: Leaderboard::new(),
        }
    }

    /// Loads `path` if it exists; a missing file starts an empty board.
    pub fn open(path: impl AsRef<Path>, player_name: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let board = if path.exists() {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read leaderboard {}", path.display()))?;
            Leaderboard::from_json(&json)
                .with_context(|| format!("Failed to parse leaderboard {}", path.display()))?
        } else {
            debug!("No leaderboard at {}, starting empty", path.display());
            Leaderboard::new()
        };

        Ok(LeaderboardStore {
            path: Some(path),
            player_name: player_name.into(),
            board,
        })
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = self.board.to_json()?;
        fs::write(path, json).with_context(|| format!("Failed to write leaderboard {}", path.display()))
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }
}

impl ResultSink for LeaderboardStore {
    fn report(&mut self, result: &GameResult) -> Result<()> {
        let entry = ScoreEntry {
            player_name: self.player_name.clone(),
            score: result.score,
            date: Utc::now().to_rfc3339(),
        };
        info!("{} scored {} in {}", entry.player_name, entry.score, result.game_name);
        self.board.record(&result.game_id, entry);
        self.save()
    }
}

impl ScoreLookup for LeaderboardStore {
    fn best_scores(&self, game_id: &str) -> Vec<ScoreEntry> {
        self.board.best_scores(game_id)
    }
}

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::constants::LEADERBOARD_SIZE;

/// Terminal record of a round, emitted once when the snake dies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub game_name: String,
    pub game_id: String,
    pub score: u32,
}

/// Receives finished rounds. Storage and presentation are up to the implementor.
pub trait ResultSink {
    fn report(&mut self, result: &GameResult) -> Result<()>;
}

impl ResultSink for Vec<GameResult> {
    fn report(&mut self, result: &GameResult) -> Result<()> {
        self.push(result.clone());
        Ok(())
    }
}

/// Lets the caller keep a handle on a sink the engine owns.
impl<S: ResultSink> ResultSink for Arc<Mutex<S>> {
    fn report(&mut self, result: &GameResult) -> Result<()> {
        self.lock()
            .map_err(|_| anyhow!("Result sink lock poisoned"))?
            .report(result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: u32,
    /// RFC 3339 timestamp of when the score was recorded.
    pub date: String,
}

/// Read access to best scores, keyed by game id.
pub trait ScoreLookup {
    fn best_scores(&self, game_id: &str) -> Vec<ScoreEntry>;
}

/// Best scores per game, highest first, capped at `LEADERBOARD_SIZE` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    games: BTreeMap<String, Vec<ScoreEntry>>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, game_id: &str, entry: ScoreEntry) {
        let entries = self.games.entry(game_id.to_string()).or_default();
        entries.push(entry);
        // Stable sort: earlier entries stay ahead of later equal scores.
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_SIZE);
    }

    pub fn top_score(&self, game_id: &str) -> Option<u32> {
        self.games
            .get(game_id)
            .and_then(|entries| entries.first())
            .map(|entry| entry.score)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ScoreLookup for Leaderboard {
    fn best_scores(&self, game_id: &str) -> Vec<ScoreEntry> {
        self.games.get(game_id).cloned().unwrap_or_default()
    }
}

//! Match summaries and the bounded history they are appended to.

use crate::{DetailedStats, MatchId, Result, RoundRecord, Winner};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use tracing::debug;

/// Number of matches kept in a history
pub const HISTORY_CAP: usize = 100;

/// Snapshot of a finished match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub timestamp: DateTime<Utc>,
    pub winner: Winner,
    pub player_score: i64,
    pub ai_score: i64,
    pub rounds: Vec<RoundRecord>,
    pub detailed_stats: DetailedStats,
}

/// Most recent match summaries, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchHistory {
    records: VecDeque<MatchSummary>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a summary, dropping the oldest entries beyond the cap
    pub fn push(&mut self, summary: MatchSummary) {
        self.records.push_back(summary);
        while self.records.len() > HISTORY_CAP {
            self.records.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchSummary> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&MatchSummary> {
        self.records.back()
    }

    /// Wins, losses and draws from the player's point of view
    pub fn tally(&self) -> (usize, usize, usize) {
        self.records
            .iter()
            .fold((0, 0, 0), |(w, l, d), summary| match summary.winner {
                Winner::Player => (w + 1, l, d),
                Winner::Ai => (w, l + 1, d),
                Winner::Draw => (w, l, d + 1),
            })
    }

    /// Load a history file; a missing file is an empty history
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No history file yet");
            return Ok(Self::new());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut history: MatchHistory = serde_json::from_str(&raw)?;
        while history.records.len() > HISTORY_CAP {
            history.records.pop_front();
        }
        Ok(history)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

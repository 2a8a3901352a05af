//! Score statistics tracked per side.

use crate::Winner;
use serde::{Deserialize, Serialize};

/// Running score state of one side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideScore {
    /// Match-cumulative points
    pub total: i64,
    /// Points gained in the current round
    pub round: i64,
    /// Round-scoped sum of the per-turn "survived" heuristic
    pub cells_survived: u64,
    /// Round-scoped sum of population drops
    pub cells_destroyed: u64,
    /// Round-scoped sum of population gains
    pub cells_created: u64,
}

impl SideScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one turn's points to both accumulators
    pub fn credit(&mut self, points: i64) {
        self.round += points;
        self.total += points;
    }

    /// Zero everything except the match total
    pub fn reset_round(&mut self) {
        self.round = 0;
        self.cells_survived = 0;
        self.cells_destroyed = 0;
        self.cells_created = 0;
    }

    /// Survival rate minus destruction rate, as a rounded percentage
    pub fn efficiency(&self) -> i64 {
        let total_actions = self.cells_survived + self.cells_destroyed + self.cells_created;
        if total_actions == 0 {
            return 0;
        }

        let survival_rate = self.cells_survived as f64 / total_actions as f64;
        let destruction_rate = self.cells_destroyed as f64 / total_actions as f64;
        ((survival_rate - destruction_rate) * 100.0).round() as i64
    }

    pub fn report(&self) -> SideReport {
        SideReport {
            total_score: self.total,
            round_score: self.round,
            cells_survived: self.cells_survived,
            cells_destroyed: self.cells_destroyed,
            cells_created: self.cells_created,
            efficiency: self.efficiency(),
        }
    }
}

/// Serializable view of a [`SideScore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideReport {
    pub total_score: i64,
    pub round_score: i64,
    pub cells_survived: u64,
    pub cells_destroyed: u64,
    pub cells_created: u64,
    pub efficiency: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedStats {
    pub player: SideReport,
    pub ai: SideReport,
}

/// Result of one finished round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub index: u32,
    pub player_round_score: i64,
    pub ai_round_score: i64,
    pub winner: Winner,
}

impl RoundRecord {
    pub fn new(index: u32, player_round_score: i64, ai_round_score: i64) -> Self {
        Self {
            index,
            player_round_score,
            ai_round_score,
            winner: Winner::from_scores(player_round_score, ai_round_score),
        }
    }
}

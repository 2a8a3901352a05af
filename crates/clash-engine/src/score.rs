//! Turn scoring from population snapshots.
//!
//! Points per side and turn are `alive + 2 * survived - destroyed`, where
//! `survived` is the whole current population and `destroyed` the drop
//! since the previous turn. Cells are not tracked individually, so the
//! population is effectively counted three times; outcomes depend on this
//! exact shape and it is kept as is.

use crate::grid::Grid;
use clash_core::{DetailedStats, OwnerCounts, Side, SideScore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Points earned by each side in one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnPoints {
    pub player: i64,
    pub ai: i64,
}

/// Population change of one side between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct CellChanges {
    survived: u64,
    destroyed: u64,
    created: u64,
}

impl CellChanges {
    fn between(previous: usize, current: usize) -> Self {
        Self {
            survived: current as u64,
            destroyed: previous.saturating_sub(current) as u64,
            created: current.saturating_sub(previous) as u64,
        }
    }

    fn points(&self, alive: usize) -> i64 {
        alive as i64 + 2 * self.survived as i64 - self.destroyed as i64
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    player: SideScore,
    ai: SideScore,
    previous: OwnerCounts,
}

impl ScoreEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score the grid against the previous turn's snapshot and accumulate
    pub fn score_turn(&mut self, grid: &Grid) -> TurnPoints {
        let current = grid.count_by_owner();

        let player = CellChanges::between(self.previous.player, current.player);
        let ai = CellChanges::between(self.previous.ai, current.ai);

        let points = TurnPoints {
            player: player.points(current.player),
            ai: ai.points(current.ai),
        };

        Self::record(&mut self.player, player, points.player);
        Self::record(&mut self.ai, ai, points.ai);
        self.previous = current;

        debug!(
            player_points = points.player,
            ai_points = points.ai,
            player_total = self.player.total,
            ai_total = self.ai.total,
            "Turn scored"
        );

        points
    }

    fn record(score: &mut SideScore, changes: CellChanges, points: i64) {
        score.credit(points);
        score.cells_survived += changes.survived;
        score.cells_destroyed += changes.destroyed;
        score.cells_created += changes.created;
    }

    /// Start a new round: round counters and baseline go to zero, totals stay
    pub fn reset_round_scores(&mut self) {
        self.player.reset_round();
        self.ai.reset_round();
        self.previous = OwnerCounts::default();
    }

    /// Start a new match
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn side(&self, side: Side) -> &SideScore {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    /// Match-cumulative totals as `(player, ai)`
    pub fn totals(&self) -> (i64, i64) {
        (self.player.total, self.ai.total)
    }

    /// Round-scoped scores as `(player, ai)`
    pub fn round_scores(&self) -> (i64, i64) {
        (self.player.round, self.ai.round)
    }

    pub fn detailed_stats(&self) -> DetailedStats {
        DetailedStats {
            player: self.player.report(),
            ai: self.ai.report(),
        }
    }
}

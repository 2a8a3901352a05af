//! Observer seam for presentation layers.

use clash_core::{Owner, Phase, Winner};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Receives state changes; nothing it does feeds back into the simulation
pub trait Renderer: Send {
    fn on_cell_changed(&mut self, _row: usize, _col: usize, _alive: bool, _owner: Owner) {}
    fn on_phase_changed(&mut self, _phase: Phase) {}
    fn on_turn_changed(&mut self, _turn: u32, _max_turns: u32) {}
    fn on_round_changed(&mut self, _round: u32, _max_rounds: u32) {}
    fn on_score_changed(&mut self, _player_total: i64, _ai_total: i64) {}
    fn on_budget_changed(&mut self, _player_remaining: u32, _ai_remaining: u32) {}
    fn on_countdown(&mut self, _seconds_left: u32) {}
    fn on_game_ended(&mut self, _winner: Winner, _player_total: i64, _ai_total: i64) {}
}

/// Discards every notification
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {}

/// Logs notifications; cell changes only at trace level
#[derive(Debug, Default)]
pub struct TracingRenderer;

impl Renderer for TracingRenderer {
    fn on_cell_changed(&mut self, row: usize, col: usize, alive: bool, owner: Owner) {
        trace!(row, col, alive, owner = ?owner, "Cell changed");
    }

    fn on_phase_changed(&mut self, phase: Phase) {
        info!(phase = ?phase, "Phase changed");
    }

    fn on_turn_changed(&mut self, turn: u32, max_turns: u32) {
        debug!(turn, max_turns, "Turn");
    }

    fn on_round_changed(&mut self, round: u32, max_rounds: u32) {
        info!(round, max_rounds, "Round");
    }

    fn on_score_changed(&mut self, player_total: i64, ai_total: i64) {
        debug!(player_total, ai_total, "Score");
    }

    fn on_budget_changed(&mut self, player_remaining: u32, ai_remaining: u32) {
        debug!(player_remaining, ai_remaining, "Placement budget");
    }

    fn on_countdown(&mut self, seconds_left: u32) {
        debug!(seconds_left, "Placement countdown");
    }

    fn on_game_ended(&mut self, winner: Winner, player_total: i64, ai_total: i64) {
        info!(winner = %winner, player_total, ai_total, "Game ended");
    }
}

/// One recorded notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderEvent {
    CellChanged { row: usize, col: usize, alive: bool, owner: Owner },
    PhaseChanged(Phase),
    TurnChanged { turn: u32, max_turns: u32 },
    RoundChanged { round: u32, max_rounds: u32 },
    ScoreChanged { player_total: i64, ai_total: i64 },
    BudgetChanged { player_remaining: u32, ai_remaining: u32 },
    Countdown(u32),
    GameEnded { winner: Winner, player_total: i64, ai_total: i64 },
}

/// Records notifications; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().clone()
    }

    pub fn drain(&self) -> Vec<RenderEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    fn push(&self, event: RenderEvent) {
        self.events.lock().push(event);
    }
}

impl Renderer for EventLog {
    fn on_cell_changed(&mut self, row: usize, col: usize, alive: bool, owner: Owner) {
        self.push(RenderEvent::CellChanged {
            row,
            col,
            alive,
            owner,
        });
    }

    fn on_phase_changed(&mut self, phase: Phase) {
        self.push(RenderEvent::PhaseChanged(phase));
    }

    fn on_turn_changed(&mut self, turn: u32, max_turns: u32) {
        self.push(RenderEvent::TurnChanged { turn, max_turns });
    }

    fn on_round_changed(&mut self, round: u32, max_rounds: u32) {
        self.push(RenderEvent::RoundChanged { round, max_rounds });
    }

    fn on_score_changed(&mut self, player_total: i64, ai_total: i64) {
        self.push(RenderEvent::ScoreChanged {
            player_total,
            ai_total,
        });
    }

    fn on_budget_changed(&mut self, player_remaining: u32, ai_remaining: u32) {
        self.push(RenderEvent::BudgetChanged {
            player_remaining,
            ai_remaining,
        });
    }

    fn on_countdown(&mut self, seconds_left: u32) {
        self.push(RenderEvent::Countdown(seconds_left));
    }

    fn on_game_ended(&mut self, winner: Winner, player_total: i64, ai_total: i64) {
        self.push(RenderEvent::GameEnded {
            winner,
            player_total,
            ai_total,
        });
    }
}

//! Match-scoped state owned by the round controller.

use clash_core::{MatchId, Phase, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub match_id: MatchId,
    /// 1-based round index
    pub current_round: u32,
    /// Turns played in the current combat phase
    pub current_turn: u32,
    pub cumulative_player_score: i64,
    pub cumulative_ai_score: i64,
    pub phase: Phase,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            match_id: MatchId::new(),
            current_round: 1,
            current_turn: 0,
            cumulative_player_score: 0,
            cumulative_ai_score: 0,
            phase: Phase::Placement,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Cells each side may still place this round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budgets {
    cap: u32,
    player_remaining: u32,
    ai_remaining: u32,
}

impl Budgets {
    pub fn new(cap: u32) -> Self {
        Self {
            cap,
            player_remaining: cap,
            ai_remaining: cap,
        }
    }

    pub fn reset(&mut self) {
        self.player_remaining = self.cap;
        self.ai_remaining = self.cap;
    }

    pub fn remaining(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_remaining,
            Side::Ai => self.ai_remaining,
        }
    }

    pub fn player_remaining(&self) -> u32 {
        self.player_remaining
    }

    pub fn ai_remaining(&self) -> u32 {
        self.ai_remaining
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// Take one cell from a side's budget; false when it is spent
    pub fn try_consume(&mut self, side: Side) -> bool {
        let remaining = match side {
            Side::Player => &mut self.player_remaining,
            Side::Ai => &mut self.ai_remaining,
        };
        if *remaining == 0 {
            return false;
        }
        *remaining -= 1;
        true
    }
}

//! Turn clock: which tick source is active, and whether a tick is still wanted.
//!
//! The clock does not measure time. Drivers read [`TurnClock::schedule`],
//! run the matching timers, and deliver [`TickKind`] events to the
//! controller. Arming a new schedule bumps the epoch, so a driver can tell
//! that its timers are stale and must be dropped.

use clash_core::TimingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

/// Discrete clock events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickKind {
    /// One second of the placement countdown
    Countdown,
    /// One AI placement decision
    AiPlacement,
    /// One full combat turn
    Combat,
    /// The pause between two rounds has elapsed
    InterRound,
}

/// Timers a driver should run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schedule {
    Idle,
    /// Placement phase before the countdown is armed; nothing ticks yet
    AwaitingPlayer,
    Placement {
        countdown_secs: u32,
        ai_start_delay: Duration,
        ai_period_min: Duration,
        ai_period_max: Duration,
    },
    Combat {
        period: Duration,
    },
    InterRound {
        delay: Duration,
    },
}

impl Schedule {
    pub fn placement(timing: &TimingConfig) -> Self {
        Schedule::Placement {
            countdown_secs: timing.placement_secs,
            ai_start_delay: Duration::from_millis(timing.ai_start_delay_ms),
            ai_period_min: Duration::from_millis(timing.ai_placement_min_ms),
            ai_period_max: Duration::from_millis(
                timing.ai_placement_max_ms.max(timing.ai_placement_min_ms),
            ),
        }
    }

    pub fn combat(timing: &TimingConfig) -> Self {
        Schedule::Combat {
            period: Duration::from_millis(timing.combat_tick_ms),
        }
    }

    pub fn inter_round(timing: &TimingConfig) -> Self {
        Schedule::InterRound {
            delay: Duration::from_millis(timing.inter_round_delay_ms),
        }
    }

    pub fn accepts(&self, kind: TickKind) -> bool {
        matches!(
            (self, kind),
            (Schedule::Placement { .. }, TickKind::Countdown)
                | (Schedule::Placement { .. }, TickKind::AiPlacement)
                | (Schedule::Combat { .. }, TickKind::Combat)
                | (Schedule::InterRound { .. }, TickKind::InterRound)
        )
    }
}

#[derive(Debug, Clone)]
pub struct TurnClock {
    schedule: Schedule,
    epoch: u64,
}

impl Default for TurnClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnClock {
    pub fn new() -> Self {
        Self {
            schedule: Schedule::Idle,
            epoch: 0,
        }
    }

    /// Replace the active schedule; the previous one is cancelled
    pub fn arm(&mut self, schedule: Schedule) -> u64 {
        self.epoch += 1;
        self.schedule = schedule;
        trace!(epoch = self.epoch, schedule = ?schedule, "Clock armed");
        self.epoch
    }

    /// Stop accepting further ticks
    pub fn cancel(&mut self) {
        if self.schedule != Schedule::Idle {
            self.arm(Schedule::Idle);
        }
    }

    pub fn accepts(&self, kind: TickKind) -> bool {
        self.schedule.accepts(kind)
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

//! Wall-clock driver: runs the timers the controller asks for and feeds it ticks.

use anyhow::{bail, Result};
use clash_core::{Error, MatchSummary, Phase, PLAYER_ZONE};
use clash_engine::{PlacementProvider, RoundController, Schedule, StrategyHint, TickKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);
const MIN_PERIOD: Duration = Duration::from_millis(1);

pub struct RealtimeDriver {
    controller: RoundController,
    player: Box<dyn PlacementProvider>,
    rng: ChaCha8Rng,
    cancel: CancellationToken,
}

impl RealtimeDriver {
    pub fn new(
        controller: RoundController,
        player: Box<dyn PlacementProvider>,
        cancel: CancellationToken,
    ) -> Self {
        let seed = controller.config().seed;
        Self {
            controller,
            player,
            rng: ChaCha8Rng::seed_from_u64(seed),
            cancel,
        }
    }

    /// Play until the match ends; `None` when cancelled first
    #[instrument(skip(self))]
    pub async fn run(mut self) -> Result<Option<MatchSummary>> {
        self.controller.start_game()?;

        loop {
            if self.cancel.is_cancelled() {
                info!("Match cancelled");
                self.controller.stop();
                return Ok(None);
            }

            let (epoch, schedule) = self.controller.schedule();
            match schedule {
                Schedule::Idle => {
                    if self.controller.phase() == Some(Phase::Ended) {
                        return Ok(self.controller.match_summary());
                    }
                    bail!("clock idle while the match is still running");
                }
                Schedule::AwaitingPlayer => self.place_player_cells()?,
                Schedule::Placement {
                    ai_start_delay,
                    ai_period_min,
                    ai_period_max,
                    ..
                } => {
                    self.drive_placement(epoch, ai_start_delay, ai_period_min, ai_period_max)
                        .await?
                }
                Schedule::Combat { period } => self.drive_combat(epoch, period).await?,
                Schedule::InterRound { delay } => {
                    let cancel = self.cancel.clone();
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        _ = time::sleep(delay) => {
                            self.controller.on_tick(TickKind::InterRound)?;
                        }
                    }
                }
            }
        }
    }

    fn place_player_cells(&mut self) -> Result<()> {
        let mut placed = 0;
        while self.controller.budgets().player_remaining() > 0 {
            let hint = StrategyHint::for_placement(placed);
            let Some(coord) = self.player.decide(self.controller.grid(), PLAYER_ZONE, hint) else {
                break;
            };
            match self.controller.place_player_cell(coord.row, coord.col) {
                Ok(()) => placed += 1,
                Err(Error::InvalidPlacement(_)) | Err(Error::OutOfBounds { .. }) => break,
                Err(err) => return Err(err.into()),
            }
        }

        debug!(placed, "Player placement done");
        if placed == 0 {
            self.controller.end_placement()?;
        }
        Ok(())
    }

    async fn drive_placement(
        &mut self,
        epoch: u64,
        ai_start_delay: Duration,
        ai_period_min: Duration,
        ai_period_max: Duration,
    ) -> Result<()> {
        let cancel = self.cancel.clone();
        let mut countdown = time::interval_at(Instant::now() + COUNTDOWN_PERIOD, COUNTDOWN_PERIOD);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let ai_next = time::sleep(ai_start_delay);
        tokio::pin!(ai_next);

        while self.controller.schedule().0 == epoch {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = countdown.tick() => {
                    self.controller.on_tick(TickKind::Countdown)?;
                }
                _ = &mut ai_next => {
                    self.controller.on_tick(TickKind::AiPlacement)?;
                    let pause = self.jitter(ai_period_min, ai_period_max);
                    ai_next.as_mut().reset(Instant::now() + pause);
                }
            }
        }
        Ok(())
    }

    async fn drive_combat(&mut self, epoch: u64, period: Duration) -> Result<()> {
        let cancel = self.cancel.clone();
        let period = period.max(MIN_PERIOD);
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.controller.schedule().0 == epoch {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = ticker.tick() => {
                    self.controller.on_tick(TickKind::Combat)?;
                }
            }
        }
        Ok(())
    }

    fn jitter(&mut self, min: Duration, max: Duration) -> Duration {
        let low = min.as_millis() as u64;
        let high = (max.as_millis() as u64).max(low);
        Duration::from_millis(self.rng.gen_range(low..=high))
    }
}

//! Drives a whole match on a virtual clock, without waiting on real time.

use crate::ai::{PlacementProvider, StrategyHint};
use crate::clock::TickKind;
use crate::round::RoundController;
use clash_core::{Error, MatchSummary, Phase, Result, PLAYER_ZONE};
use tracing::{debug, info, instrument};

pub struct MatchRunner {
    controller: RoundController,
    player: Box<dyn PlacementProvider>,
}

impl MatchRunner {
    /// `controller` must already carry the AI provider
    pub fn new(controller: RoundController, player: Box<dyn PlacementProvider>) -> Self {
        Self { controller, player }
    }

    pub fn controller(&self) -> &RoundController {
        &self.controller
    }

    pub fn into_controller(self) -> RoundController {
        self.controller
    }

    /// Play every round to completion and return the match summary
    #[instrument(skip(self))]
    pub fn run(&mut self) -> Result<MatchSummary> {
        self.controller.start_game()?;

        loop {
            match self.controller.phase() {
                Some(Phase::Placement) => self.run_placement()?,
                Some(Phase::Combat) => self.tick(TickKind::Combat)?,
                Some(Phase::RoundEnding) => self.tick(TickKind::InterRound)?,
                Some(Phase::Ended) => break,
                None => return Err(Error::InvalidState("match not started".to_string())),
            }
        }

        let summary = self
            .controller
            .match_summary()
            .ok_or_else(|| Error::InvalidState("match ended without a winner".to_string()))?;
        info!(
            match_id = %summary.match_id,
            winner = %summary.winner,
            player_score = summary.player_score,
            ai_score = summary.ai_score,
            "Match complete"
        );
        Ok(summary)
    }

    fn run_placement(&mut self) -> Result<()> {
        let placed = self.place_player_cells()?;
        if placed == 0 {
            debug!("Player placed nothing, closing placement");
            return self.controller.end_placement();
        }

        // AI cadence until its budget stops moving, then let the countdown run out
        loop {
            let before = self.controller.budgets().ai_remaining();
            self.tick(TickKind::AiPlacement)?;
            if self.controller.budgets().ai_remaining() == before {
                break;
            }
        }

        while self.controller.phase() == Some(Phase::Placement) {
            self.tick(TickKind::Countdown)?;
        }
        Ok(())
    }

    fn place_player_cells(&mut self) -> Result<u32> {
        let mut placed = 0;
        while self.controller.budgets().player_remaining() > 0 {
            let hint = StrategyHint::for_placement(placed);
            let Some(coord) = self.player.decide(self.controller.grid(), PLAYER_ZONE, hint) else {
                break;
            };
            match self.controller.place_player_cell(coord.row, coord.col) {
                Ok(()) => placed += 1,
                Err(Error::InvalidPlacement(_)) | Err(Error::OutOfBounds { .. }) => break,
                Err(err) => return Err(err),
            }
        }
        Ok(placed)
    }

    fn tick(&mut self, kind: TickKind) -> Result<()> {
        if self.controller.on_tick(kind)? {
            Ok(())
        } else {
            Err(Error::InvalidState(format!(
                "{:?} tick rejected by {:?}",
                kind,
                self.controller.schedule().1
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{RandomAdjacentProvider, ScriptedProvider};
    use crate::events::{EventLog, RenderEvent};
    use clash_core::{Coord, GameConfig, Owner, Winner};

    fn glider_script() -> ScriptedProvider {
        ScriptedProvider::repeating(vec![
            Coord::new(14, 5),
            Coord::new(15, 6),
            Coord::new(16, 4),
            Coord::new(16, 5),
            Coord::new(16, 6),
            Coord::new(13, 12),
            Coord::new(13, 13),
            Coord::new(14, 12),
            Coord::new(14, 13),
            Coord::new(18, 1),
        ])
    }

    #[test]
    fn test_mirrored_match_runs_all_rounds() {
        let player = glider_script();
        let ai = player.mirrored();
        let controller = RoundController::new(GameConfig::default()).with_provider(Box::new(ai));
        let mut runner = MatchRunner::new(controller, Box::new(player));

        let summary = runner.run().unwrap();
        assert_eq!(summary.rounds.len(), 10);
        assert_eq!(
            summary.winner,
            Winner::from_scores(summary.player_score, summary.ai_score)
        );

        let player_sum: i64 = summary.rounds.iter().map(|r| r.player_round_score).sum();
        let ai_sum: i64 = summary.rounds.iter().map(|r| r.ai_round_score).sum();
        assert_eq!(player_sum, summary.player_score);
        assert_eq!(ai_sum, summary.ai_score);
        assert_eq!(summary.detailed_stats.player.total_score, summary.player_score);

        let indices: Vec<u32> = summary.rounds.iter().map(|r| r.index).collect();
        assert_eq!(indices, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_mirrored_blocks_draw() {
        // A block is stable at home, rides the conveyor for seven turns,
        // then collapses on its own cells at the band edge and dies out.
        let player = ScriptedProvider::repeating(vec![
            Coord::new(18, 18),
            Coord::new(18, 19),
            Coord::new(19, 18),
            Coord::new(19, 19),
        ]);
        let ai = player.mirrored();
        let controller = RoundController::new(GameConfig::default()).with_provider(Box::new(ai));
        let mut runner = MatchRunner::new(controller, Box::new(player));

        let summary = runner.run().unwrap();
        assert_eq!(summary.winner, Winner::Draw);
        // Seven turns at 4 + 2*4 points, then 4 cells lost on turn eight
        assert_eq!(summary.player_score, 800);
        assert_eq!(summary.ai_score, 800);
        for record in &summary.rounds {
            assert_eq!(record.player_round_score, 80);
            assert_eq!(record.ai_round_score, 80);
            assert_eq!(record.winner, Winner::Draw);
        }
        assert_eq!(runner.controller().grid().count_by_owner().total(), 0);
    }

    #[test]
    fn test_empty_player_still_finishes() {
        let mut config = GameConfig::default();
        config.rounds.max_rounds = 3;
        let log = EventLog::new();
        let controller = RoundController::new(config)
            .with_provider(Box::new(RandomAdjacentProvider::new(Owner::Ai, 11)))
            .with_renderer(Box::new(log.clone()));
        let mut runner = MatchRunner::new(controller, Box::new(ScriptedProvider::new(vec![])));

        let summary = runner.run().unwrap();
        assert_eq!(summary.rounds.len(), 3);
        // Without a player placement the countdown never starts
        assert!(!log
            .events()
            .iter()
            .any(|e| matches!(e, RenderEvent::Countdown(_))));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let play = |seed: u64| {
            let controller = RoundController::new(GameConfig::default())
                .with_provider(Box::new(RandomAdjacentProvider::new(Owner::Ai, seed)));
            let mut runner = MatchRunner::new(
                controller,
                Box::new(RandomAdjacentProvider::new(Owner::Player, seed + 1)),
            );
            let summary = runner.run().unwrap();
            (summary.player_score, summary.ai_score, summary.rounds)
        };

        assert_eq!(play(5), play(5));
    }
}

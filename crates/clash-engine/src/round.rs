//! Round controller: placement, combat, scoring and the match lifecycle.

use crate::ai::{PlacementProvider, StrategyHint};
use crate::clock::{Schedule, TickKind, TurnClock};
use crate::conveyor::ConveyorMover;
use crate::events::{NullRenderer, Renderer};
use crate::grid::Grid;
use crate::rules::RuleEngine;
use crate::score::{ScoreEngine, TurnPoints};
use crate::session::{Budgets, GameSession};
use clash_core::{
    Cell, Coord, DetailedStats, Error, GameConfig, MatchSummary, OwnerCounts, Phase,
    PlacementRejection, Result, RoundRecord, Side, Winner, AI_ZONE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, event, info, instrument, trace, warn, Level};

/// What one combat turn did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub round: u32,
    pub turn: u32,
    pub points: TurnPoints,
    pub population: OwnerCounts,
    /// The turn closed the round (turn limit or total extinction)
    pub round_over: bool,
}

/// Read-only view for observers and persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub session: GameSession,
    pub grid: Grid,
    pub budgets: Budgets,
    pub schedule: Schedule,
    pub countdown: Option<u32>,
    pub rounds: Vec<RoundRecord>,
    pub winner: Option<Winner>,
}

pub struct RoundController {
    config: GameConfig,
    grid: Grid,
    rules: RuleEngine,
    conveyor: ConveyorMover,
    scores: ScoreEngine,
    session: Option<GameSession>,
    budgets: Budgets,
    clock: TurnClock,
    /// Seconds left once the player's first placement armed the countdown
    countdown: Option<u32>,
    ai_placed: u32,
    rounds: Vec<RoundRecord>,
    final_stats: Option<DetailedStats>,
    winner: Option<Winner>,
    provider: Option<Box<dyn PlacementProvider>>,
    renderer: Box<dyn Renderer>,
}

impl RoundController {
    pub fn new(config: GameConfig) -> Self {
        Self {
            rules: RuleEngine::new(config.rules.clone()),
            budgets: Budgets::new(config.rounds.cells_per_round),
            config,
            grid: Grid::new(),
            conveyor: ConveyorMover::new(),
            scores: ScoreEngine::new(),
            session: None,
            clock: TurnClock::new(),
            countdown: None,
            ai_placed: 0,
            rounds: Vec::new(),
            final_stats: None,
            winner: None,
            provider: None,
            renderer: Box::new(NullRenderer),
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn PlacementProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn set_provider(&mut self, provider: Box<dyn PlacementProvider>) {
        self.provider = Some(provider);
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderer = renderer;
    }

    /// Start (or restart) a match at round 1
    #[instrument(skip(self))]
    pub fn start_game(&mut self) -> Result<()> {
        if self.provider.is_none() {
            return Err(Error::ProviderUnavailable);
        }

        self.clock.cancel();
        self.scores.reset();
        self.rounds.clear();
        self.final_stats = None;
        self.winner = None;

        let session = GameSession::new();
        info!(match_id = %session.match_id, "Starting match");
        self.session = Some(session);
        self.renderer.on_score_changed(0, 0);
        self.enter_placement()
    }

    /// Deliver one clock event; returns false when the tick was stale and ignored
    pub fn on_tick(&mut self, kind: TickKind) -> Result<bool> {
        if !self.clock.accepts(kind) {
            warn!(tick = ?kind, schedule = ?self.clock.schedule(), "Dropping stale tick");
            return Ok(false);
        }

        match kind {
            TickKind::Countdown => self.countdown_tick()?,
            TickKind::AiPlacement => {
                self.ai_placement_tick()?;
            }
            TickKind::Combat => {
                self.combat_turn()?;
            }
            TickKind::InterRound => self.begin_next_round()?,
        }
        Ok(true)
    }

    /// Stop every tick source without changing the phase
    pub fn stop(&mut self) {
        self.clock.cancel();
    }

    pub fn place_player_cell(&mut self, row: usize, col: usize) -> Result<()> {
        self.place(Side::Player, row, col)?;

        if self.countdown.is_none() {
            let secs = self.config.timing.placement_secs;
            self.countdown = Some(secs);
            self.clock.arm(Schedule::placement(&self.config.timing));
            debug!(seconds = secs, "Placement countdown armed");
            self.renderer.on_countdown(secs);
        }
        Ok(())
    }

    pub fn place_ai_cell(&mut self, row: usize, col: usize) -> Result<()> {
        self.place(Side::Ai, row, col)?;
        self.ai_placed += 1;
        Ok(())
    }

    /// Ask the provider for one AI placement; `None` consumes no budget
    pub fn ai_placement_tick(&mut self) -> Result<Option<Coord>> {
        self.require_phase(Phase::Placement)?;
        if self.budgets.ai_remaining() == 0 {
            return Ok(None);
        }

        let hint = StrategyHint::for_placement(self.ai_placed);
        let provider = self.provider.as_mut().ok_or(Error::ProviderUnavailable)?;
        let Some(coord) = provider.decide(&self.grid, AI_ZONE, hint) else {
            debug!(hint = ?hint, "AI provider found no legal cell");
            return Ok(None);
        };

        match self.place_ai_cell(coord.row, coord.col) {
            Ok(()) => {
                trace!(row = coord.row, col = coord.col, hint = ?hint, "AI placed cell");
                Ok(Some(coord))
            }
            Err(err @ (Error::InvalidPlacement(_) | Error::OutOfBounds { .. })) => {
                warn!(
                    row = coord.row,
                    col = coord.col,
                    error = %err,
                    "AI provider chose an illegal cell"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Close placement and start combat
    #[instrument(skip(self))]
    pub fn end_placement(&mut self) -> Result<()> {
        self.require_phase(Phase::Placement)?;
        self.clock.cancel();
        self.countdown = None;

        let session = self.session_mut()?;
        session.phase = Phase::Combat;
        session.current_turn = 0;
        let round = session.current_round;

        info!(
            round,
            player_left = self.budgets.player_remaining(),
            ai_left = self.budgets.ai_remaining(),
            "Placement closed"
        );
        self.renderer.on_phase_changed(Phase::Combat);
        self.renderer.on_turn_changed(0, self.config.rounds.max_turns);
        self.clock.arm(Schedule::combat(&self.config.timing));
        Ok(())
    }

    /// Move, apply rules, score; each stage is committed before observers hear of it
    #[instrument(skip(self))]
    pub fn combat_turn(&mut self) -> Result<TurnReport> {
        self.require_phase(Phase::Combat)?;

        let moved = self.conveyor.advance(&self.grid);
        self.commit_stage(moved);

        let next = self.rules.compute_next_generation(&self.grid);
        self.commit_stage(next);

        let points = self.scores.score_turn(&self.grid);
        let (player_total, ai_total) = self.scores.totals();
        let population = self.grid.count_by_owner();
        let max_turns = self.config.rounds.max_turns;

        let session = self.session_mut()?;
        session.current_turn += 1;
        session.cumulative_player_score = player_total;
        session.cumulative_ai_score = ai_total;
        let (round, turn) = (session.current_round, session.current_turn);

        self.renderer.on_turn_changed(turn, max_turns);
        self.renderer.on_score_changed(player_total, ai_total);

        debug!(
            turn,
            player = population.player,
            ai = population.ai,
            neutral = population.neutral,
            "Turn complete"
        );

        let extinct = population.player == 0 && population.ai == 0;
        if extinct {
            info!(round, turn, "Both sides extinct, ending round early");
        }
        let round_over = extinct || turn >= max_turns;
        if round_over {
            self.end_round()?;
        }

        Ok(TurnReport {
            round,
            turn,
            points,
            population,
            round_over,
        })
    }

    /// Leave the inter-round pause and open the next placement phase
    pub fn begin_next_round(&mut self) -> Result<()> {
        self.require_phase(Phase::RoundEnding)?;
        self.enter_placement()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.session.as_ref().map(|s| s.phase)
    }

    pub fn budgets(&self) -> &Budgets {
        &self.budgets
    }

    pub fn scores(&self) -> &ScoreEngine {
        &self.scores
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn countdown(&self) -> Option<u32> {
        self.countdown
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Active tick source and its epoch
    pub fn schedule(&self) -> (u64, Schedule) {
        (self.clock.epoch(), self.clock.schedule())
    }

    pub fn snapshot(&self) -> Option<GameSnapshot> {
        let session = self.session.clone()?;
        Some(GameSnapshot {
            session,
            grid: self.grid.clone(),
            budgets: self.budgets,
            schedule: self.clock.schedule(),
            countdown: self.countdown,
            rounds: self.rounds.clone(),
            winner: self.winner,
        })
    }

    /// Summary record once the match has ended
    pub fn match_summary(&self) -> Option<MatchSummary> {
        let session = self.session.as_ref()?;
        let winner = self.winner?;
        Some(MatchSummary {
            match_id: session.match_id,
            timestamp: chrono::Utc::now(),
            winner,
            player_score: session.cumulative_player_score,
            ai_score: session.cumulative_ai_score,
            rounds: self.rounds.clone(),
            detailed_stats: self
                .final_stats
                .clone()
                .unwrap_or_else(|| self.scores.detailed_stats()),
        })
    }

    fn place(&mut self, side: Side, row: usize, col: usize) -> Result<()> {
        let result = self.validate_placement(side, row, col);
        if let Err(err) = &result {
            warn!(side = %side, row, col, error = %err, "Placement rejected");
            return result;
        }

        self.grid.set(row, col, Cell::alive(side.owner()))?;
        self.budgets.try_consume(side);
        self.renderer.on_cell_changed(row, col, true, side.owner());
        self.renderer.on_budget_changed(
            self.budgets.player_remaining(),
            self.budgets.ai_remaining(),
        );
        trace!(side = %side, row, col, "Cell placed");
        Ok(())
    }

    fn validate_placement(&self, side: Side, row: usize, col: usize) -> Result<()> {
        if self.phase() != Some(Phase::Placement) {
            return Err(Error::InvalidPlacement(PlacementRejection::WrongPhase));
        }
        let zone = self.grid.zone_of(row, col)?;
        if self.budgets.remaining(side) == 0 {
            return Err(Error::InvalidPlacement(PlacementRejection::BudgetExhausted));
        }
        if zone != side.home_zone() {
            return Err(Error::InvalidPlacement(PlacementRejection::WrongZone));
        }
        if self.grid.get(row, col)?.alive {
            return Err(Error::InvalidPlacement(PlacementRejection::Occupied));
        }
        Ok(())
    }

    fn countdown_tick(&mut self) -> Result<()> {
        let Some(left) = self.countdown else {
            return Ok(());
        };
        let left = left.saturating_sub(1);
        self.countdown = Some(left);
        self.renderer.on_countdown(left);

        if left == 0 {
            debug!("Placement countdown elapsed");
            self.end_placement()?;
        }
        Ok(())
    }

    fn enter_placement(&mut self) -> Result<()> {
        let cleared = Grid::new();
        self.commit_stage(cleared);
        self.budgets.reset();
        self.countdown = None;
        self.ai_placed = 0;

        let session = self.session_mut()?;
        session.phase = Phase::Placement;
        session.current_turn = 0;
        let round = session.current_round;

        info!(round, max_rounds = self.config.rounds.max_rounds, "Placement phase");
        self.clock.arm(Schedule::AwaitingPlayer);
        self.renderer.on_round_changed(round, self.config.rounds.max_rounds);
        self.renderer.on_phase_changed(Phase::Placement);
        self.renderer.on_budget_changed(
            self.budgets.player_remaining(),
            self.budgets.ai_remaining(),
        );
        Ok(())
    }

    fn end_round(&mut self) -> Result<()> {
        self.clock.cancel();

        let (player_round, ai_round) = self.scores.round_scores();
        let stats = self.scores.detailed_stats();
        let max_rounds = self.config.rounds.max_rounds;

        let session = self.session_mut()?;
        session.phase = Phase::RoundEnding;
        let round = session.current_round;

        let record = RoundRecord::new(round, player_round, ai_round);
        info!(
            round,
            player_round_score = player_round,
            ai_round_score = ai_round,
            winner = %record.winner,
            "Round finished"
        );
        event!(
            Level::INFO,
            gauge_name = "round_score_delta",
            gauge_value = player_round - ai_round,
            round,
            "Round score delta"
        );

        self.rounds.push(record);
        self.final_stats = Some(stats);
        self.scores.reset_round_scores();
        self.renderer.on_phase_changed(Phase::RoundEnding);

        if round >= max_rounds {
            return self.end_game();
        }

        self.session_mut()?.current_round = round + 1;
        self.clock.arm(Schedule::inter_round(&self.config.timing));
        Ok(())
    }

    fn end_game(&mut self) -> Result<()> {
        self.clock.cancel();
        let (player_total, ai_total) = self.scores.totals();
        let winner = Winner::from_scores(player_total, ai_total);

        let session = self.session_mut()?;
        session.phase = Phase::Ended;
        session.cumulative_player_score = player_total;
        session.cumulative_ai_score = ai_total;

        self.winner = Some(winner);
        info!(winner = %winner, player_total, ai_total, "Match over");
        event!(
            Level::INFO,
            gauge_name = "final_score_delta",
            gauge_value = player_total - ai_total,
            "Final score delta"
        );

        self.renderer.on_phase_changed(Phase::Ended);
        self.renderer.on_game_ended(winner, player_total, ai_total);
        Ok(())
    }

    /// Swap in a finished grid and report the cells that changed
    fn commit_stage(&mut self, next: Grid) {
        let changes: Vec<_> = self.grid.diff(&next).collect();
        self.grid = next;
        for (coord, cell) in changes {
            self.renderer.on_cell_changed(coord.row, coord.col, cell.alive, cell.owner);
        }
    }

    fn require_phase(&self, expected: Phase) -> Result<()> {
        match self.phase() {
            Some(phase) if phase == expected => Ok(()),
            other => Err(Error::InvalidState(format!(
                "expected {:?} phase, found {:?}",
                expected, other
            ))),
        }
    }

    fn session_mut(&mut self) -> Result<&mut GameSession> {
        self.session
            .as_mut()
            .ok_or_else(|| Error::InvalidState("match not started".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ScriptedProvider;
    use crate::events::{EventLog, RenderEvent};
    use clash_core::Owner;
    use proptest::prelude::*;

    fn controller() -> RoundController {
        RoundController::new(GameConfig::default())
            .with_provider(Box::new(ScriptedProvider::new(vec![])))
    }

    fn started() -> RoundController {
        let mut controller = controller();
        controller.start_game().unwrap();
        controller
    }

    fn rejection(result: Result<()>) -> PlacementRejection {
        match result {
            Err(Error::InvalidPlacement(reason)) => reason,
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_start_requires_provider() {
        let mut controller = RoundController::new(GameConfig::default());
        assert!(matches!(controller.start_game(), Err(Error::ProviderUnavailable)));
        assert!(controller.session().is_none());
    }

    #[test]
    fn test_start_enters_placement() {
        let controller = started();
        let session = controller.session().unwrap();
        assert_eq!(session.phase, Phase::Placement);
        assert_eq!(session.current_round, 1);
        assert_eq!(controller.budgets().player_remaining(), 10);
        assert_eq!(controller.budgets().ai_remaining(), 10);
        assert_eq!(controller.schedule().1, Schedule::AwaitingPlayer);
    }

    #[test]
    fn test_placement_rejections_leave_state_untouched() {
        let mut controller = controller();
        assert_eq!(rejection(controller.place_player_cell(15, 3)), PlacementRejection::WrongPhase);

        controller.start_game().unwrap();
        assert_eq!(rejection(controller.place_player_cell(3, 3)), PlacementRejection::WrongZone);
        assert_eq!(rejection(controller.place_ai_cell(15, 3)), PlacementRejection::WrongZone);
        assert_eq!(rejection(controller.place_player_cell(9, 3)), PlacementRejection::WrongZone);
        assert!(matches!(
            controller.place_player_cell(20, 3),
            Err(Error::OutOfBounds { row: 20, col: 3 })
        ));

        controller.place_player_cell(15, 3).unwrap();
        assert_eq!(rejection(controller.place_player_cell(15, 3)), PlacementRejection::Occupied);

        assert_eq!(controller.grid().count_by_owner(), OwnerCounts::new(1, 0, 0));
        assert_eq!(controller.budgets().player_remaining(), 9);
        assert_eq!(controller.budgets().ai_remaining(), 10);
    }

    #[test]
    fn test_budget_exhaustion() {
        let mut controller = started();
        for col in 0..10 {
            controller.place_ai_cell(2, col).unwrap();
        }
        assert_eq!(controller.budgets().ai_remaining(), 0);
        assert_eq!(rejection(controller.place_ai_cell(2, 15)), PlacementRejection::BudgetExhausted);
        // The other side keeps placing; placement does not end on its own
        controller.place_player_cell(14, 0).unwrap();
        assert_eq!(controller.phase(), Some(Phase::Placement));
    }

    #[test]
    fn test_first_player_cell_arms_countdown() {
        let mut controller = started();
        assert!(!controller.on_tick(TickKind::Countdown).unwrap());

        controller.place_player_cell(14, 4).unwrap();
        assert_eq!(controller.countdown(), Some(15));

        for _ in 0..14 {
            assert!(controller.on_tick(TickKind::Countdown).unwrap());
        }
        assert_eq!(controller.phase(), Some(Phase::Placement));
        assert!(controller.on_tick(TickKind::Countdown).unwrap());
        assert_eq!(controller.phase(), Some(Phase::Combat));

        // Placement ticks are cancelled once combat starts
        assert!(!controller.on_tick(TickKind::AiPlacement).unwrap());
        assert!(!controller.on_tick(TickKind::Countdown).unwrap());
        assert_eq!(rejection(controller.place_player_cell(14, 5)), PlacementRejection::WrongPhase);
    }

    #[test]
    fn test_ai_tick_uses_provider() {
        let mut controller = RoundController::new(GameConfig::default()).with_provider(Box::new(
            ScriptedProvider::new(vec![Coord::new(15, 0), Coord::new(2, 2), Coord::new(2, 3)]),
        ));
        controller.start_game().unwrap();
        controller.place_player_cell(14, 0).unwrap();

        // Out-of-band cells are skipped by the scripted provider itself
        assert_eq!(controller.ai_placement_tick().unwrap(), Some(Coord::new(2, 2)));
        assert_eq!(controller.ai_placement_tick().unwrap(), Some(Coord::new(2, 3)));
        assert_eq!(controller.ai_placement_tick().unwrap(), None);
        assert_eq!(controller.budgets().ai_remaining(), 8);
    }

    #[test]
    fn test_total_extinction_ends_round_early() {
        let mut controller = started();
        controller.end_placement().unwrap();

        let report = controller.combat_turn().unwrap();
        assert_eq!(report.turn, 1);
        assert!(report.round_over);
        assert_eq!(controller.phase(), Some(Phase::RoundEnding));
        assert_eq!(controller.rounds().len(), 1);
        assert!(controller.on_tick(TickKind::InterRound).unwrap());
        assert_eq!(controller.session().unwrap().current_round, 2);
        assert_eq!(controller.phase(), Some(Phase::Placement));
    }

    #[test]
    fn test_one_sided_extinction_keeps_fighting() {
        let mut controller = started();
        controller.place_player_cell(15, 10).unwrap();
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            controller.place_ai_cell(row, col).unwrap();
        }
        controller.end_placement().unwrap();

        let report = controller.combat_turn().unwrap();
        assert_eq!(report.population.player, 0);
        assert_eq!(report.population.ai, 4);
        assert!(!report.round_over);
        assert_eq!(controller.phase(), Some(Phase::Combat));
    }

    #[test]
    fn test_round_runs_max_turns() {
        let mut controller = started();
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            controller.place_ai_cell(row, col).unwrap();
        }
        for (row, col) in [(18, 18), (18, 19), (19, 18), (19, 19)] {
            controller.place_player_cell(row, col).unwrap();
        }
        controller.end_placement().unwrap();

        let mut turns = 0;
        while controller.phase() == Some(Phase::Combat) {
            controller.on_tick(TickKind::Combat).unwrap();
            turns += 1;
        }
        assert!(turns <= 25);
        assert_eq!(controller.phase(), Some(Phase::RoundEnding));

        let record = &controller.rounds()[0];
        let (player_total, ai_total) = controller.scores().totals();
        assert_eq!(record.player_round_score, player_total);
        assert_eq!(record.ai_round_score, ai_total);
        assert_eq!(controller.scores().round_scores(), (0, 0));
    }

    #[test]
    fn test_next_round_clears_grid_and_budgets() {
        let mut controller = started();
        controller.place_player_cell(14, 4).unwrap();
        controller.place_ai_cell(4, 4).unwrap();
        controller.end_placement().unwrap();
        while controller.phase() == Some(Phase::Combat) {
            controller.combat_turn().unwrap();
        }
        controller.begin_next_round().unwrap();

        assert_eq!(controller.grid().count_by_owner(), OwnerCounts::default());
        assert_eq!(controller.budgets().player_remaining(), 10);
        assert_eq!(controller.budgets().ai_remaining(), 10);
        assert_eq!(controller.countdown(), None);
    }

    #[test]
    fn test_operations_in_wrong_phase() {
        let mut controller = started();
        assert!(matches!(controller.combat_turn(), Err(Error::InvalidState(_))));
        assert!(matches!(controller.begin_next_round(), Err(Error::InvalidState(_))));
        controller.end_placement().unwrap();
        assert!(matches!(controller.end_placement(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_match_ends_after_max_rounds() {
        let mut config = GameConfig::default();
        config.rounds.max_rounds = 2;
        let log = EventLog::new();
        let mut controller = RoundController::new(config)
            .with_provider(Box::new(ScriptedProvider::new(vec![])))
            .with_renderer(Box::new(log.clone()));
        controller.start_game().unwrap();

        for round in 1..=2 {
            controller.place_player_cell(19, 0).unwrap();
            controller.end_placement().unwrap();
            while controller.phase() == Some(Phase::Combat) {
                controller.combat_turn().unwrap();
            }
            if round < 2 {
                controller.begin_next_round().unwrap();
            }
        }

        assert_eq!(controller.phase(), Some(Phase::Ended));
        assert_eq!(controller.session().unwrap().current_round, 2);
        let (player_total, ai_total) = controller.scores().totals();
        assert_eq!(controller.winner(), Some(Winner::from_scores(player_total, ai_total)));
        assert!(!controller.on_tick(TickKind::InterRound).unwrap());

        let summary = controller.match_summary().unwrap();
        assert_eq!(summary.rounds.len(), 2);
        assert_eq!(summary.player_score, player_total);

        let events = log.events();
        assert!(events.contains(&RenderEvent::PhaseChanged(Phase::Ended)));
        assert!(matches!(events.last(), Some(RenderEvent::GameEnded { .. })));
    }

    #[test]
    fn test_renderer_sees_committed_changes() {
        let log = EventLog::new();
        let mut controller = controller().with_renderer(Box::new(log.clone()));
        controller.start_game().unwrap();
        controller.place_ai_cell(7, 5).unwrap();
        controller.end_placement().unwrap();
        log.drain();

        controller.combat_turn().unwrap();
        let events = log.events();
        // Conveyor stage: (7,5) empties, (8,5) fills; then the lone cell dies
        assert_eq!(
            events[0],
            RenderEvent::CellChanged { row: 7, col: 5, alive: false, owner: Owner::None }
        );
        assert_eq!(
            events[1],
            RenderEvent::CellChanged { row: 8, col: 5, alive: true, owner: Owner::Ai }
        );
        assert_eq!(
            events[2],
            RenderEvent::CellChanged { row: 8, col: 5, alive: false, owner: Owner::None }
        );
        assert!(events.contains(&RenderEvent::TurnChanged { turn: 1, max_turns: 25 }));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut controller = started();
        controller.place_player_cell(13, 7).unwrap();
        let snapshot = controller.snapshot().unwrap();
        assert_eq!(snapshot.countdown, Some(15));

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.grid, *controller.grid());
        assert_eq!(restored.budgets.player_remaining(), 9);
        assert_eq!(restored.schedule, controller.schedule().1);
    }

    proptest! {
        #[test]
        fn prop_budgets_stay_in_range(
            attempts in proptest::collection::vec((any::<bool>(), 0usize..22, 0usize..22), 0..60)
        ) {
            let mut controller = started();
            let mut placed = [0u32; 2];
            for (player, row, col) in attempts {
                let result = if player {
                    controller.place_player_cell(row, col)
                } else {
                    controller.place_ai_cell(row, col)
                };
                if result.is_ok() {
                    placed[usize::from(player)] += 1;
                }
                let budgets = controller.budgets();
                prop_assert!(budgets.player_remaining() <= 10);
                prop_assert!(budgets.ai_remaining() <= 10);
            }
            prop_assert_eq!(controller.budgets().ai_remaining(), 10 - placed[0]);
            prop_assert_eq!(controller.budgets().player_remaining(), 10 - placed[1]);
        }
    }
}

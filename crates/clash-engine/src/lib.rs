//! Match engine.
//!
//! Grid, rule and conveyor stages, scoring, and the round controller that
//! sequences placement and combat across a match.

pub mod grid;
pub mod rules;
pub mod conveyor;
pub mod score;
pub mod clock;
pub mod events;
pub mod ai;
pub mod session;
pub mod round;
pub mod runner;

pub use grid::Grid;
pub use rules::RuleEngine;
pub use conveyor::ConveyorMover;
pub use score::{ScoreEngine, TurnPoints};
pub use clock::{Schedule, TickKind, TurnClock};
pub use events::{EventLog, NullRenderer, RenderEvent, Renderer, TracingRenderer};
pub use ai::{PlacementProvider, RandomAdjacentProvider, ScriptedProvider, StrategyHint};
pub use session::{Budgets, GameSession};
pub use round::{GameSnapshot, RoundController, TurnReport};
pub use runner::MatchRunner;

//! Configuration types for the game.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Match length and placement budget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Rounds per match
    pub max_rounds: u32,
    /// Combat turns per round
    pub max_turns: u32,
    /// Cells each side may place per round
    pub cells_per_round: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            max_turns: 25,
            cells_per_round: 10,
        }
    }
}

/// Clock periods used by real-time drivers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Placement countdown, armed on the player's first placement
    pub placement_secs: u32,
    /// Delay before the AI starts placing
    pub ai_start_delay_ms: u64,
    /// Lower bound of the jittered AI placement period
    pub ai_placement_min_ms: u64,
    /// Upper bound of the jittered AI placement period
    pub ai_placement_max_ms: u64,
    /// Combat turn period
    pub combat_tick_ms: u64,
    /// Pause between two rounds
    pub inter_round_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            placement_secs: 15,
            ai_start_delay_ms: 1000,
            ai_placement_min_ms: 600,
            ai_placement_max_ms: 1400,
            combat_tick_ms: 400,
            inter_round_delay_ms: 3000,
        }
    }
}

/// Neighbor thresholds of the automaton.
///
/// Births always need exactly three live neighbors: domination among the
/// three parents is only defined for that count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub survival_min: usize,
    pub survival_max: usize,
    /// Total neighbor count at which a lone Neutral cell still survives
    pub neutral_resistance: usize,
    /// Same-side neighbors needed to convert a Neutral cell
    pub chameleon_threshold: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            survival_min: 2,
            survival_max: 3,
            neutral_resistance: 1,
            chameleon_threshold: 4,
        }
    }
}

impl RuleConfig {
    pub fn survives(&self, neighbors: usize) -> bool {
        neighbors >= self.survival_min && neighbors <= self.survival_max
    }
}

/// Everything the engine needs to run a match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rounds: RoundConfig,
    pub timing: TimingConfig,
    pub rules: RuleConfig,
    /// Seed for stock AI providers and clock jitter
    pub seed: u64,
}

/// User preferences carried alongside a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub language: String,
    pub volume: f32,
    pub theme: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: "us".to_string(),
            volume: 1.0,
            theme: "dark".to_string(),
        }
    }
}

impl Preferences {
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Clamp values that may have been edited by hand
    pub fn sanitized(mut self) -> Self {
        self.set_volume(self.volume);
        self
    }
}

/// Binary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub preferences: Preferences,
    /// JSON file holding the match history
    pub history_path: String,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    /// Run on a virtual clock instead of wall time
    pub fast: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            preferences: Preferences::default(),
            history_path: "./data/history.json".to_string(),
            log_filter: "info,clash_engine=debug".to_string(),
            json_logs: false,
            fast: false,
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: AppConfig = serde_json::from_str(&raw)?;
        config.preferences = config.preferences.sanitized();
        Ok(config)
    }

    /// Load from the file named by `CLASH_CONFIG`, or fall back to defaults
    pub fn from_env() -> Result<Self> {
        match std::env::var("CLASH_CONFIG") {
            Ok(path) => Self::load(path),
            Err(_) => Ok(Self::default()),
        }
    }
}

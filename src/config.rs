// Configuration module for reading Game.toml
//
// All tunable parameters live here: time management, search selection and
// limits, game rules, heuristic weights, and the decision log.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub rules: RulesConfig,
    pub weights: WeightsConfig,
    pub debug: DebugConfig,
}

/// Time management constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    /// Margin kept unspent at the end of every decision, in milliseconds.
    /// The search treats a node as a leaf once only this much time is left.
    pub safety_buffer_ms: u64,
    /// Extra slack added on top of the safety buffer when a turn budget is
    /// clamped upward, so depth 1 always completes
    pub min_budget_slack_ms: u64,
    /// Planned spend on the final move of the game, the first term of the
    /// geometric whole-game schedule
    pub final_move_ms: u64,
    /// Bisection iterations when solving for the schedule's common ratio
    pub ratio_solver_iterations: u32,
    /// Starting guess for the common ratio
    pub initial_ratio: f64,
    /// Starting half-step for the ratio refinement
    pub ratio_step: f64,
}

impl TimingConfig {
    pub fn safety_buffer(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.safety_buffer_ms)
    }

    /// Smallest budget any turn is allowed to run with
    pub fn min_turn_budget(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.safety_buffer_ms + self.min_budget_slack_ms)
    }
}

/// Which engine to run and how deep it may go
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// "alphabeta" or "minimax"
    pub algorithm: String,
    /// Depth ceiling as a fraction of the board's cell count
    pub depth_ceiling_scale: f64,
    /// Hard cap on iterative-deepening depth regardless of board size
    pub max_depth: u32,
    /// Pick a uniformly random legal move instead of failing when no depth
    /// completes. Off by default: an exhausted search signals a budget
    /// miscalibration and should be loud.
    pub random_fallback: bool,
}

/// Game rule constants shared by both players and the referee
#[derive(Debug, Deserialize, Clone)]
pub struct RulesConfig {
    /// Score deducted from a player who runs out of moves first
    pub penalty_score: f64,
    /// Whole-game thinking allowance per player, in seconds
    pub game_time_s: f64,
    /// Per-turn cap handed to `make_move`, in milliseconds
    pub turn_time_limit_ms: u64,
    /// Fruits expire after this many full rounds
    pub fruit_lifetime_turns: u32,
}

/// Weights of the composite heuristic. All terms are oriented so that
/// higher is better for the evaluated player before weighting.
#[derive(Debug, Deserialize, Clone)]
pub struct WeightsConfig {
    /// Bounded-BFS reachable-cell count
    pub reachable: f64,
    /// Normalized Manhattan distance to the rival (subtracted)
    pub rival_distance: f64,
    /// Immediate move-count difference
    pub mobility: f64,
    /// Consumed-fruit total difference, normalized by the forfeit penalty
    pub fruit_gap: f64,
    /// The BFS expansion cap is min(width, height) divided by this
    pub bfs_cap_divisor: f64,
}

/// Decision log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Game.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Game.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback.
    /// This should match the constants defined in Game.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                safety_buffer_ms: 200,
                min_budget_slack_ms: 50,
                final_move_ms: 250,
                ratio_solver_iterations: 20,
                initial_ratio: 2.0,
                ratio_step: 0.5,
            },
            search: SearchConfig {
                algorithm: "alphabeta".to_string(),
                depth_ceiling_scale: 0.67,
                max_depth: 64,
                random_fallback: false,
            },
            rules: RulesConfig {
                penalty_score: 300.0,
                game_time_s: 120.0,
                turn_time_limit_ms: 2000,
                fruit_lifetime_turns: 15,
            },
            weights: WeightsConfig {
                reachable: 1.0,
                rival_distance: 1.0,
                mobility: 1.0,
                fruit_gap: 1.0,
                bfs_cap_divisor: 4.0,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "fruit_duel_moves.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Game.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

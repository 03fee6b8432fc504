// Library exports for the fruit-duel bot
// This allows integration tests and external tooling to use the core logic

pub mod board;
pub mod config;
pub mod game;
pub mod heuristics;
pub mod loader;
pub mod move_log;
pub mod player;
pub mod search;
pub mod types;

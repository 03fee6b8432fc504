// Decision logging module
//
// Writes one JSON line per decision so games can be inspected after the
// fact. The crate is single-threaded by design, so writes happen inline;
// a logger that fails to open its file downgrades itself to a no-op.

use log::error;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;

use crate::types::{Direction, PlayerId};

/// A single decision record
#[derive(Debug, Serialize)]
struct MoveLogEntry<'a> {
    turn: u32,
    player: &'a str,
    chosen_move: &'a str,
    score: f64,
    depth: u32,
    elapsed_ms: u128,
    timestamp: String,
}

/// Per-player JSONL decision log
pub struct MoveLogger {
    file: Option<File>,
}

impl MoveLogger {
    /// Creates a new logger. If enabled, the log file is created
    /// (truncating an existing one); on failure the logger stays disabled.
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
        {
            Ok(file) => {
                log::info!("Decision logging enabled: {}", log_file_path);
                MoveLogger { file: Some(file) }
            }
            Err(e) => {
                error!("Failed to create decision log '{}': {}", log_file_path, e);
                MoveLogger { file: None }
            }
        }
    }

    /// Creates a disabled logger (no-op)
    pub fn disabled() -> Self {
        MoveLogger { file: None }
    }

    /// Appends one decision record
    pub fn log_move(
        &mut self,
        turn: u32,
        player: PlayerId,
        chosen_move: Direction,
        score: f64,
        depth: u32,
        elapsed_ms: u128,
    ) {
        let file = match self.file.as_mut() {
            Some(file) => file,
            None => return,
        };

        let entry = MoveLogEntry {
            turn,
            player: player.as_str(),
            chosen_move: chosen_move.as_str(),
            score,
            depth,
            elapsed_ms,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        match serde_json::to_string(&entry) {
            Ok(json_line) => {
                if let Err(e) = writeln!(file, "{}", json_line) {
                    error!("Failed to write decision log entry: {}", e);
                } else if let Err(e) = file.flush() {
                    error!("Failed to flush decision log: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize decision log entry: {}", e);
            }
        }
    }
}

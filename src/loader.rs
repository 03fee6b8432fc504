// Board file loading
//
// Boards are whitespace-delimited numeric grids. The file's top line is the
// visually-top row, so rows are mirrored vertically on load: the last line
// of the file becomes board row 0. Cell codes are normalized into `Cell`
// here (fruits use raw value encoding: the code is the value); this is the
// single place where the numeric format crosses into the typed model.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::board::Board;
use crate::types::Position;

/// Parses a board from the textual grid format.
///
/// Returns the board, the initial fruit mapping, and the two start
/// positions. Malformed grids (ragged rows, unknown codes, a wrong count
/// of start positions) are construction-time errors, not recoverable.
pub fn parse_board(text: &str) -> Result<(Board, HashMap<Position, f64>, [Position; 2]), String> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|e| format!("bad cell code '{}' on line {}: {}", token, line_num + 1, e))
            })
            .collect::<Result<Vec<f64>, String>>()?;
        rows.push(row);
    }

    // Mirror vertically: file top line is the highest row index
    rows.reverse();

    Board::from_codes(&rows)
}

/// Loads and parses a board file
pub fn load_board<P: AsRef<Path>>(
    path: P,
) -> Result<(Board, HashMap<Position, f64>, [Position; 2]), String> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|e| format!("Failed to read board file: {}", e))?;
    parse_board(&text)
}

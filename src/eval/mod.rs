//! Pure functions over a board: terminal detection, winning-line extraction
//! with a fixed tie-break order, and the search heuristics.

mod heuristic;
mod lines;

pub use heuristic::{evaluate_five, evaluate_four, WIN_SCORE};
pub use lines::{find_winning_line, is_terminal, winning_line, WinningLine};

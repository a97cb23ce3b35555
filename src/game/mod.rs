//! Core board logic: gravity-drop board, player colors, snapshot encoding,
//! and the variant descriptor that selects board size and win length.

mod board;
mod geometry;
mod player;
mod snapshot;
mod variant;

pub use board::{Board, Cell, CellPos};
pub use geometry::{BoardGeometry, DisplayPoint};
pub use player::Player;
pub use variant::{GameVariant, VariantKind};

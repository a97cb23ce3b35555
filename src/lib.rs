//! # Connect Sync
//!
//! A connect-N game engine with a minimax opponent and an authority-driven
//! synchronization layer for networked two-player matches. Comes with a
//! terminal UI built with Ratatui and a headless loopback simulator.
//!
//! ## Modules
//!
//! - [`game`]: Board, players, snapshot encoding and game variants
//! - [`eval`]: Winning-line detection and heuristic scoring
//! - [`ai`]: Agent trait, minimax search and a random baseline
//! - [`net`]: Room properties, RPC messages and the transport seam
//! - [`coordinator`]: Local and networked match state machines
//! - [`ui`]: Terminal UI for local play
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod eval;
pub mod game;
pub mod net;
pub mod ui;

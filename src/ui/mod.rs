//! Terminal UI for playing a local match against the configured opponent.

mod app;
mod game_view;

pub use app::App;

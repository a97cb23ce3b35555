use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use connect_sync::config::{AppConfig, OpponentKind};
use connect_sync::coordinator::LocalMatch;
use connect_sync::game::VariantKind;
use connect_sync::ui::App;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Play connect-N in the terminal.
#[derive(Parser)]
#[command(name = "connect-sync", about = "Play connect-N against the computer")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Board variant: connect-four or connect-five
    #[arg(long)]
    variant: Option<String>,

    /// Opponent: minimax, random or none (hot seat)
    #[arg(long)]
    opponent: Option<String>,

    /// Override minimax search depth
    #[arg(long)]
    depth: Option<usize>,

    /// Write logs to this file (nothing is logged otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(variant) = cli.variant.as_deref() {
        config.game.variant = match variant {
            "connect-four" => VariantKind::ConnectFour,
            "connect-five" => VariantKind::ConnectFive,
            other => bail!("unknown variant '{other}' (expected 'connect-four' or 'connect-five')"),
        };
    }
    if let Some(opponent) = cli.opponent.as_deref() {
        config.ai.opponent = match opponent {
            "minimax" => OpponentKind::Minimax,
            "random" => OpponentKind::Random,
            "none" => OpponentKind::None,
            other => bail!("unknown opponent '{other}' (expected 'minimax', 'random' or 'none')"),
        };
    }
    if let Some(depth) = cli.depth {
        config.ai.depth = depth;
    }
    config.validate().context("invalid configuration")?;

    let game = LocalMatch::new(config.game.variant.variant(), config.ai.build_agent());
    let mut app = App::new(game, Duration::from_millis(config.animation.tick_ms));
    log::info!(
        "starting {} against {}",
        config.game.variant,
        opponent_label(&config)
    );

    run(&mut app).context("terminal session failed")
}

fn opponent_label(config: &AppConfig) -> String {
    match config.ai.opponent {
        OpponentKind::Minimax => format!("minimax (depth {})", config.ai.depth),
        OpponentKind::Random => "random".to_string(),
        OpponentKind::None => "hot seat".to_string(),
    }
}

fn run(app: &mut App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}

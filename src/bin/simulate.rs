use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use connect_sync::ai::{Agent, MinimaxAgent, RandomAgent};
use connect_sync::config::AppConfig;
use connect_sync::coordinator::{NetworkCoordinator, Phase};
use connect_sync::game::{Player, VariantKind};
use connect_sync::net::{LoopbackHub, LoopbackTransport};

type Peer = NetworkCoordinator<LoopbackTransport>;

/// Play networked matches between two computer players over the in-process
/// transport, rematching through the restart vote after every game.
#[derive(Parser)]
#[command(name = "simulate", about = "Headless networked matches between two agents")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Board variant: connect-four or connect-five
    #[arg(long)]
    variant: Option<String>,

    /// Agent for the authority (Red): minimax or random
    #[arg(long, default_value = "minimax")]
    red: String,

    /// Agent for the guest (Yellow): minimax or random
    #[arg(long, default_value = "random")]
    yellow: String,

    /// Override minimax search depth
    #[arg(long)]
    depth: Option<usize>,

    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Seed for random agents
    #[arg(long)]
    seed: Option<u64>,
}

fn build_agent(kind: &str, depth: usize, seed: Option<u64>) -> Result<Box<dyn Agent>> {
    Ok(match kind {
        "minimax" => Box::new(MinimaxAgent::new(depth)),
        "random" => match seed {
            Some(seed) => Box::new(RandomAgent::with_seed(seed)),
            None => Box::new(RandomAgent::new()),
        },
        other => bail!("unknown agent '{other}' (expected 'minimax' or 'random')"),
    })
}

/// Pump every peer until no events remain.
fn settle(peers: &mut [&mut Peer]) -> Result<()> {
    for _ in 0..1_000 {
        let mut handled = 0;
        for peer in peers.iter_mut() {
            handled += peer.pump()?;
        }
        if handled == 0 {
            return Ok(());
        }
    }
    bail!("peers did not settle")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(variant) = cli.variant.as_deref() {
        config.game.variant = match variant {
            "connect-four" => VariantKind::ConnectFour,
            "connect-five" => VariantKind::ConnectFive,
            other => bail!("unknown variant '{other}' (expected 'connect-four' or 'connect-five')"),
        };
    }
    if let Some(depth) = cli.depth {
        config.ai.depth = depth;
    }
    config.validate().context("invalid configuration")?;

    let variant = config.game.variant.variant();
    let mut red = build_agent(&cli.red, config.ai.depth, cli.seed)?;
    let mut yellow = build_agent(&cli.yellow, config.ai.depth, cli.seed.map(|s| s.wrapping_add(1)))?;

    let hub = LoopbackHub::new();
    let mut host = NetworkCoordinator::new(variant, config.network.clone(), config.display, hub.join());
    let mut guest = NetworkCoordinator::new(variant, config.network.clone(), config.display, hub.join());
    settle(&mut [&mut host, &mut guest])?;
    if host.phase() != Phase::InProgress {
        bail!("room never became ready");
    }

    let (mut red_wins, mut yellow_wins, mut draws) = (0usize, 0usize, 0usize);
    for game in 1..=cli.games {
        let mut moves = 0;
        while host.phase() == Phase::InProgress {
            let (mover, agent) = if Some(host.turn()) == host.local_player() {
                (&mut host, &mut red)
            } else {
                (&mut guest, &mut yellow)
            };
            let Some(column) = agent.select_action(mover.variant(), mover.board(), mover.turn())
            else {
                bail!("{} had no legal move in game {game}", agent.name());
            };
            mover.request_move(column)?;
            settle(&mut [&mut host, &mut guest])?;
            moves += 1;
        }

        if host.board() != guest.board() {
            bail!("peers disagree on the final board of game {game}");
        }
        match host.outcome().and_then(|o| o.winner()) {
            Some(Player::Red) => red_wins += 1,
            Some(Player::Yellow) => yellow_wins += 1,
            None => draws += 1,
        }
        println!("game {game}: {} after {moves} moves", host.status());

        if game < cli.games {
            host.request_restart()?;
            guest.request_restart()?;
            settle(&mut [&mut host, &mut guest])?;
        }
    }

    println!(
        "{} ({}) {red_wins} - {yellow_wins} {} ({}), {draws} draws",
        red.name(),
        Player::Red.name(),
        yellow.name(),
        Player::Yellow.name()
    );
    Ok(())
}

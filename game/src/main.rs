use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context;
use clap::Parser;
use winit::dpi::PhysicalSize;

use engine::app::{AppConfig, run_game};
use tetris_connect::{
    app::TetrisApp,
    config,
    leaderboard_client::{LeaderboardClient, LeaderboardWorker},
    tetris_ui::{FRAME_HEIGHT, FRAME_WIDTH},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tetris with an online leaderboard", long_about = None)]
struct Args {
    /// Piece order seed; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Nickname pre-filled in the score prompt (env: TETRIS_NICKNAME).
    #[arg(long)]
    nickname: Option<String>,

    /// Leaderboard base url (env: TETRIS_LEADERBOARD_URL).
    #[arg(long)]
    leaderboard_url: Option<String>,

    /// Play without contacting the leaderboard.
    #[arg(long, default_value_t = false)]
    offline: bool,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(clock_seed);
    let nickname = args
        .nickname
        .or_else(|| config::resolve_nickname(|k| env::var(k).ok()));

    let leaderboard = if args.offline {
        None
    } else {
        let url = args
            .leaderboard_url
            .unwrap_or_else(|| config::resolve_leaderboard_url(|k| env::var(k).ok()));
        tracing::info!(%url, "using leaderboard");
        let worker = LeaderboardWorker::spawn(LeaderboardClient::new(url))
            .context("failed to start leaderboard worker")?;
        Some(worker)
    };

    tracing::info!(seed, "starting tetris");
    let app = TetrisApp::new(seed, nickname, leaderboard);
    let config = AppConfig {
        title: "Tetris".to_string(),
        frame_size: PhysicalSize::new(FRAME_WIDTH, FRAME_HEIGHT),
    };
    run_game(config, app).context("window loop failed")?;
    Ok(())
}

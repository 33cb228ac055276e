use std::{env, net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::Parser;

use tetris_connect::{
    config,
    leaderboard_api::{AppState, router},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Leaderboard HTTP service", long_about = None)]
struct Args {
    /// Listen address (env: TETRIS_LEADERBOARD_ADDR or TETRIS_LEADERBOARD_PORT).
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Directory with the ranking page (env: TETRIS_STATIC_DIR).
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Serve the API only.
    #[arg(long, default_value_t = false)]
    no_static: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let addr = args
        .addr
        .unwrap_or_else(|| config::resolve_server_addr(|k| env::var(k).ok()));
    let static_dir = if args.no_static {
        None
    } else {
        Some(
            args.static_dir
                .unwrap_or_else(|| config::resolve_static_dir(|k| env::var(k).ok())),
        )
    };

    let app = router(AppState::with_seed_scores(), static_dir.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        static_dir = ?static_dir,
        "leaderboard listening"
    );

    axum::serve(listener, app)
        .await
        .context("leaderboard server failed")?;
    Ok(())
}

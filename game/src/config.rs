use std::{net::SocketAddr, path::PathBuf};

pub const ADDR_ENV: &str = "TETRIS_LEADERBOARD_ADDR";
pub const PORT_ENV: &str = "TETRIS_LEADERBOARD_PORT";
pub const STATIC_DIR_ENV: &str = "TETRIS_STATIC_DIR";
pub const URL_ENV: &str = "TETRIS_LEADERBOARD_URL";
pub const NICKNAME_ENV: &str = "TETRIS_NICKNAME";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LEADERBOARD_URL: &str = "http://127.0.0.1:3000";

/// Listen address: an explicit address, then a port on loopback, then the default.
/// Unparseable values fall through to the next source.
pub fn resolve_server_addr<F>(mut get_env: F) -> SocketAddr
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(addr) = get_env(ADDR_ENV).and_then(|v| v.trim().parse().ok()) {
        return addr;
    }

    if let Some(port) = get_env(PORT_ENV).and_then(|v| v.trim().parse::<u16>().ok()) {
        return SocketAddr::from(([127, 0, 0, 1], port));
    }

    SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
}

pub fn default_static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public")
}

pub fn resolve_static_dir<F>(mut get_env: F) -> PathBuf
where
    F: FnMut(&str) -> Option<String>,
{
    non_blank(get_env(STATIC_DIR_ENV))
        .map(PathBuf::from)
        .unwrap_or_else(default_static_dir)
}

pub fn resolve_leaderboard_url<F>(mut get_env: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    non_blank(get_env(URL_ENV)).unwrap_or_else(|| DEFAULT_LEADERBOARD_URL.to_string())
}

/// Nickname used for automatic submission at game over, if any.
pub fn resolve_nickname<F>(mut get_env: F) -> Option<String>
where
    F: FnMut(&str) -> Option<String>,
{
    non_blank(get_env(NICKNAME_ENV))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

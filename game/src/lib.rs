pub mod app;
pub mod config;
pub mod input;
pub mod leaderboard;
pub mod leaderboard_api;
pub mod leaderboard_client;
pub mod session;
pub mod tetris_core;
pub mod tetris_ui;
pub mod view;

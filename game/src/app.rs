use std::time::Duration;

use engine::app::{AppControl, GameApp, KeyEvent};
use engine::graphics::Canvas;

use crate::input::{InputContext, KeyCommand, ScorePrompt, command_for_key};
use crate::leaderboard::ScoreRecord;
use crate::leaderboard_client::{LeaderboardEvent, LeaderboardRequest, LeaderboardWorker};
use crate::session::{GameSession, SessionInput};
use crate::tetris_core::TetrisCore;
use crate::tetris_ui::{HudInfo, draw_session};
use crate::view::GameView;

/// The windowed client: one session, the score prompt and the ranking panel.
pub struct TetrisApp {
    session: GameSession,
    prompt: Option<ScorePrompt>,
    ranking: Vec<ScoreRecord>,
    status: Option<String>,
    nickname: Option<String>,
    leaderboard: Option<LeaderboardWorker>,
    submitting: bool,
    // Set when a key press opened the prompt; its character event is dropped.
    swallow_text: bool,
    // Sub-millisecond remainder carried between frames.
    tick_carry: Duration,
}

impl TetrisApp {
    pub fn new(seed: u64, nickname: Option<String>, leaderboard: Option<LeaderboardWorker>) -> Self {
        let mut app = Self {
            session: GameSession::new(TetrisCore::new(seed)),
            prompt: None,
            ranking: Vec::new(),
            status: None,
            nickname,
            leaderboard,
            submitting: false,
            swallow_text: false,
            tick_carry: Duration::ZERO,
        };
        app.send(LeaderboardRequest::LoadRanking);
        app
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn prompt(&self) -> Option<&ScorePrompt> {
        self.prompt.as_ref()
    }

    pub fn ranking(&self) -> &[ScoreRecord] {
        &self.ranking
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn apply(&mut self, input: SessionInput) {
        let before = self.session.view;
        self.session.apply(input);

        if before != GameView::GameOver && self.session.view == GameView::GameOver {
            let score = self.session.tetris().score();
            self.prompt = Some(ScorePrompt::new(score, self.nickname.as_deref()));
            self.status = None;
            self.submitting = false;
        }
    }

    fn send(&mut self, request: LeaderboardRequest) {
        let Some(worker) = &self.leaderboard else {
            self.status = Some("OFFLINE".to_string());
            return;
        };
        if !worker.request(request) {
            tracing::warn!("leaderboard worker stopped");
            self.leaderboard = None;
            self.status = Some("OFFLINE".to_string());
        }
    }

    fn submit_prompt(&mut self) {
        if self.submitting {
            return;
        }
        let Some(prompt) = &self.prompt else {
            return;
        };
        let Some(nickname) = prompt.submission() else {
            self.status = Some("ENTER A NICKNAME".to_string());
            return;
        };
        let request = LeaderboardRequest::Submit {
            nickname: nickname.to_string(),
            score: u64::from(prompt.score()),
        };
        self.status = Some("SAVING...".to_string());
        self.send(request);
        // Offline or a dead worker: nothing is in flight.
        self.submitting = self.leaderboard.is_some();
    }

    fn handle_leaderboard_event(&mut self, event: LeaderboardEvent) {
        match event {
            LeaderboardEvent::Ranking(Ok(ranking)) => {
                self.ranking = ranking;
            }
            LeaderboardEvent::Ranking(Err(err)) => {
                tracing::warn!("failed to load ranking: {err}");
                self.status = Some("RANKING UNAVAILABLE".to_string());
            }
            LeaderboardEvent::Submitted(Ok(saved)) => {
                tracing::info!("{}", saved.message);
                self.submitting = false;
                self.ranking = saved.top_scores;
                self.prompt = None;
                self.status = Some("SCORE SAVED".to_string());
                self.send(LeaderboardRequest::LoadRanking);
            }
            LeaderboardEvent::Submitted(Err(err)) => {
                tracing::warn!("failed to save score: {err}");
                self.submitting = false;
                self.status = Some("SAVE FAILED".to_string());
            }
        }
    }

    fn elapsed_ms(&mut self, dt: Duration) -> u32 {
        let total = self.tick_carry + dt;
        let ms = total.as_millis();
        self.tick_carry = total - Duration::from_millis(ms as u64);
        u32::try_from(ms).unwrap_or(u32::MAX)
    }
}

impl GameApp for TetrisApp {
    fn on_key(&mut self, event: KeyEvent) -> AppControl {
        self.swallow_text = false;
        if !event.pressed {
            return AppControl::Continue;
        }
        let ctx = InputContext {
            view: self.session.view,
            prompt_open: self.prompt.is_some(),
        };
        let Some(command) = command_for_key(event.key, event.modifiers, ctx) else {
            return AppControl::Continue;
        };

        match command {
            KeyCommand::Session(input) => {
                let prompt_was_open = self.prompt.is_some();
                self.apply(input);
                self.swallow_text = !prompt_was_open && self.prompt.is_some();
            }
            KeyCommand::SubmitScore => self.submit_prompt(),
            KeyCommand::DismissPrompt => {
                self.prompt = None;
                self.status = None;
                self.submitting = false;
            }
            KeyCommand::EraseChar => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.erase_char();
                }
            }
            KeyCommand::Quit => return AppControl::Exit,
        }
        AppControl::Continue
    }

    fn on_text(&mut self, ch: char) {
        if std::mem::take(&mut self.swallow_text) {
            return;
        }
        if let Some(prompt) = &mut self.prompt {
            prompt.push_char(ch);
        }
    }

    fn update(&mut self, dt: Duration) -> AppControl {
        let events = self
            .leaderboard
            .as_ref()
            .map(LeaderboardWorker::poll)
            .unwrap_or_default();
        for event in events {
            self.handle_leaderboard_event(event);
        }

        let ms = self.elapsed_ms(dt);
        if ms > 0 {
            self.apply(SessionInput::Tick { ms });
        }
        AppControl::Continue
    }

    fn render(&mut self, canvas: &mut Canvas<'_>) {
        let hud = HudInfo {
            ranking: &self.ranking,
            status: self.status.as_deref(),
            prompt: self.prompt.as_ref(),
        };
        draw_session(canvas, &self.session, hud);
    }
}

use engine::GameLogic;
use serde::{Deserialize, Serialize};

use crate::tetris_core::TetrisCore;
use crate::view::{GameView, GameViewEffect, GameViewEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionInput {
    Start,
    TogglePause,
    Action(InputAction),
    /// Wall-clock time elapsed since the previous frame.
    Tick { ms: u32 },
}

/// Everything one game needs between frames: the board, the view state and
/// the gravity accumulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub view: GameView,
    pub tetris: TetrisCore,
    pub drop_elapsed_ms: u32,
}

impl GameSession {
    pub fn new(tetris: TetrisCore) -> Self {
        Self {
            view: GameView::default(),
            tetris,
            drop_elapsed_ms: 0,
        }
    }

    pub fn tetris(&self) -> &TetrisCore {
        &self.tetris
    }

    /// Score to submit once the game has ended.
    pub fn final_score(&self) -> Option<u32> {
        (self.view == GameView::GameOver).then(|| self.tetris.score())
    }

    pub fn apply(&mut self, input: SessionInput) {
        match input {
            SessionInput::Start => {
                let (view, effect) = self.view.handle(GameViewEvent::Start);
                self.view = view;
                if effect == GameViewEffect::ResetTetris {
                    self.tetris.initialize_game();
                    self.drop_elapsed_ms = 0;
                    tracing::debug!("game started");
                }
            }
            SessionInput::TogglePause => {
                self.view = self.view.handle(GameViewEvent::TogglePause).0;
            }
            SessionInput::Action(action) => {
                if self.view.is_active() {
                    self.apply_action(action);
                }
            }
            SessionInput::Tick { ms } => {
                if self.view.is_active() {
                    self.advance_gravity(ms);
                }
            }
        }

        if self.view.is_playing() && self.tetris.is_game_over() {
            self.view = self.view.handle(GameViewEvent::GameOver).0;
            tracing::debug!(score = self.tetris.score(), "game over");
        }
    }

    fn apply_action(&mut self, action: InputAction) {
        match action {
            InputAction::MoveLeft => {
                self.tetris.move_piece(-1);
            }
            InputAction::MoveRight => {
                self.tetris.move_piece(1);
            }
            InputAction::SoftDrop => {
                self.tetris.soft_drop();
            }
            InputAction::Rotate => {
                self.tetris.rotate_piece();
            }
            InputAction::HardDrop => {
                self.tetris.hard_drop();
            }
            InputAction::Hold => {
                self.tetris.hold_piece();
            }
        }
    }

    fn advance_gravity(&mut self, ms: u32) {
        self.drop_elapsed_ms = self.drop_elapsed_ms.saturating_add(ms);
        if self.drop_elapsed_ms > self.tetris.drop_interval_ms() {
            self.tetris.drop_piece();
            self.drop_elapsed_ms = 0;
        }
    }
}

/// Pure stepping over `GameSession`, seeded so runs are reproducible.
#[derive(Debug, Clone)]
pub struct TetrisLogic {
    seed: u64,
}

impl TetrisLogic {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl GameLogic for TetrisLogic {
    type State = GameSession;
    type Input = SessionInput;

    fn initial_state(&self) -> Self::State {
        GameSession::new(TetrisCore::new(self.seed))
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        next.apply(input);
        next
    }
}

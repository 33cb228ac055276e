use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameView {
    #[default]
    Ready,
    Playing {
        paused: bool,
    },
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameViewEvent {
    Start,
    TogglePause,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameViewEffect {
    None,
    ResetTetris,
}

impl GameView {
    /// Pure transition function for the session's view state machine.
    ///
    /// Side-effects (resetting the board) are reported via `GameViewEffect`.
    pub fn handle(self, event: GameViewEvent) -> (GameView, GameViewEffect) {
        match (self, event) {
            (GameView::Ready | GameView::GameOver, GameViewEvent::Start) => (
                GameView::Playing { paused: false },
                GameViewEffect::ResetTetris,
            ),
            (GameView::Playing { paused }, GameViewEvent::TogglePause) => {
                (GameView::Playing { paused: !paused }, GameViewEffect::None)
            }
            (GameView::Playing { .. }, GameViewEvent::GameOver) => {
                (GameView::GameOver, GameViewEffect::None)
            }

            // Starting twice or pausing outside play is ignored.
            (state, _) => (state, GameViewEffect::None),
        }
    }

    pub fn is_playing(self) -> bool {
        matches!(self, GameView::Playing { .. })
    }

    /// Playing and not paused: the only state where the board accepts input.
    pub fn is_active(self) -> bool {
        matches!(self, GameView::Playing { paused: false })
    }

    pub fn is_paused(self) -> bool {
        matches!(self, GameView::Playing { paused: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_resets_from_ready_and_game_over() {
        for from in [GameView::Ready, GameView::GameOver] {
            assert_eq!(
                from.handle(GameViewEvent::Start),
                (GameView::Playing { paused: false }, GameViewEffect::ResetTetris)
            );
        }
    }

    #[test]
    fn start_is_ignored_while_playing() {
        let playing = GameView::Playing { paused: true };
        assert_eq!(
            playing.handle(GameViewEvent::Start),
            (playing, GameViewEffect::None)
        );
    }

    #[test]
    fn pause_toggles_only_while_playing() {
        let (paused, _) = GameView::Playing { paused: false }.handle(GameViewEvent::TogglePause);
        assert!(paused.is_paused());
        let (resumed, _) = paused.handle(GameViewEvent::TogglePause);
        assert!(resumed.is_active());

        let (ready, _) = GameView::Ready.handle(GameViewEvent::TogglePause);
        assert_eq!(ready, GameView::Ready);
    }

    #[test]
    fn game_over_only_ends_a_running_game() {
        let (over, _) = GameView::Playing { paused: false }.handle(GameViewEvent::GameOver);
        assert_eq!(over, GameView::GameOver);
        let (ready, _) = GameView::Ready.handle(GameViewEvent::GameOver);
        assert_eq!(ready, GameView::Ready);
    }
}

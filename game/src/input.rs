use engine::app::{ModifiersState, VirtualKeyCode};

use crate::session::{InputAction, SessionInput};
use crate::view::GameView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Session(SessionInput),
    SubmitScore,
    DismissPrompt,
    EraseChar,
    Quit,
}

pub const NICKNAME_MAX_CHARS: usize = 16;

/// Nickname entry shown after a game ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorePrompt {
    score: u32,
    nickname: String,
}

impl ScorePrompt {
    pub fn new(score: u32, nickname: Option<&str>) -> Self {
        let mut prompt = Self {
            score,
            nickname: String::new(),
        };
        for ch in nickname.unwrap_or_default().chars() {
            prompt.push_char(ch);
        }
        prompt
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// The nickname to submit, or `None` while it is blank.
    pub fn submission(&self) -> Option<&str> {
        Some(self.nickname.trim()).filter(|name| !name.is_empty())
    }

    pub fn push_char(&mut self, ch: char) {
        if ch.is_control() || self.nickname.chars().count() >= NICKNAME_MAX_CHARS {
            return;
        }
        self.nickname.push(ch);
    }

    pub fn erase_char(&mut self) {
        self.nickname.pop();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputContext {
    pub view: GameView,
    /// The game-over score prompt is showing.
    pub prompt_open: bool,
}

/// Maps a key press to a command for the current screen. Releases are not
/// passed here.
pub fn command_for_key(
    key: VirtualKeyCode,
    modifiers: ModifiersState,
    ctx: InputContext,
) -> Option<KeyCommand> {
    if ctx.prompt_open {
        return match key {
            VirtualKeyCode::Return | VirtualKeyCode::NumpadEnter => Some(KeyCommand::SubmitScore),
            VirtualKeyCode::Escape => Some(KeyCommand::DismissPrompt),
            VirtualKeyCode::Back => Some(KeyCommand::EraseChar),
            _ => None,
        };
    }

    if !ctx.view.is_playing() {
        return match key {
            VirtualKeyCode::Return | VirtualKeyCode::NumpadEnter => {
                Some(KeyCommand::Session(SessionInput::Start))
            }
            VirtualKeyCode::Escape => Some(KeyCommand::Quit),
            _ => None,
        };
    }

    let action = match key {
        VirtualKeyCode::Left => InputAction::MoveLeft,
        VirtualKeyCode::Right => InputAction::MoveRight,
        VirtualKeyCode::Down => InputAction::SoftDrop,
        VirtualKeyCode::Up => InputAction::Rotate,
        VirtualKeyCode::C => InputAction::Hold,
        // Ctrl/Cmd+S belongs to the platform.
        VirtualKeyCode::S if modifiers.ctrl() || modifiers.logo() => return None,
        VirtualKeyCode::S => InputAction::HardDrop,
        VirtualKeyCode::Space => return Some(KeyCommand::Session(SessionInput::TogglePause)),
        VirtualKeyCode::Escape => return Some(KeyCommand::Quit),
        _ => return None,
    };
    Some(KeyCommand::Session(SessionInput::Action(action)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> InputContext {
        InputContext {
            view: GameView::Playing { paused: false },
            prompt_open: false,
        }
    }

    #[test]
    fn arrows_map_to_piece_actions() {
        let none = ModifiersState::empty();
        let cases = [
            (VirtualKeyCode::Left, InputAction::MoveLeft),
            (VirtualKeyCode::Right, InputAction::MoveRight),
            (VirtualKeyCode::Down, InputAction::SoftDrop),
            (VirtualKeyCode::Up, InputAction::Rotate),
            (VirtualKeyCode::C, InputAction::Hold),
            (VirtualKeyCode::S, InputAction::HardDrop),
        ];
        for (key, action) in cases {
            assert_eq!(
                command_for_key(key, none, playing()),
                Some(KeyCommand::Session(SessionInput::Action(action)))
            );
        }
    }

    #[test]
    fn space_toggles_pause() {
        assert_eq!(
            command_for_key(VirtualKeyCode::Space, ModifiersState::empty(), playing()),
            Some(KeyCommand::Session(SessionInput::TogglePause))
        );
    }

    #[test]
    fn ctrl_s_is_not_a_hard_drop() {
        assert_eq!(
            command_for_key(VirtualKeyCode::S, ModifiersState::CTRL, playing()),
            None
        );
        assert_eq!(
            command_for_key(VirtualKeyCode::S, ModifiersState::LOGO, playing()),
            None
        );
    }

    #[test]
    fn game_keys_are_ignored_outside_play() {
        let ctx = InputContext {
            view: GameView::Ready,
            prompt_open: false,
        };
        assert_eq!(
            command_for_key(VirtualKeyCode::Left, ModifiersState::empty(), ctx),
            None
        );
        assert_eq!(
            command_for_key(VirtualKeyCode::Return, ModifiersState::empty(), ctx),
            Some(KeyCommand::Session(SessionInput::Start))
        );
    }

    #[test]
    fn prompt_captures_enter_and_escape() {
        let ctx = InputContext {
            view: GameView::GameOver,
            prompt_open: true,
        };
        let none = ModifiersState::empty();
        assert_eq!(
            command_for_key(VirtualKeyCode::Return, none, ctx),
            Some(KeyCommand::SubmitScore)
        );
        assert_eq!(
            command_for_key(VirtualKeyCode::Escape, none, ctx),
            Some(KeyCommand::DismissPrompt)
        );
        assert_eq!(
            command_for_key(VirtualKeyCode::Back, none, ctx),
            Some(KeyCommand::EraseChar)
        );
        // Letters arrive as text while the prompt is open.
        assert_eq!(command_for_key(VirtualKeyCode::S, none, ctx), None);
    }

    #[test]
    fn prompt_caps_nickname_length() {
        let mut prompt = ScorePrompt::new(1200, Some("ABCDEFGHIJKLMNOPQRST"));
        assert_eq!(prompt.nickname().chars().count(), NICKNAME_MAX_CHARS);
        prompt.erase_char();
        prompt.push_char('!');
        assert!(prompt.nickname().ends_with('!'));
        assert_eq!(prompt.score(), 1200);
    }

    #[test]
    fn blank_prompt_has_no_submission() {
        let mut prompt = ScorePrompt::new(10, None);
        assert_eq!(prompt.submission(), None);
        prompt.push_char(' ');
        assert_eq!(prompt.submission(), None);
        prompt.push_char('a');
        prompt.push_char('\n');
        assert_eq!(prompt.submission(), Some("a"));
    }
}

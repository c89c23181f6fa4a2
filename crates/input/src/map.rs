//! Key mapping from terminal events to UI intents.

use crate::types::{Difficulty, GameCommand, GamePhase};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks for, before the current phase is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiIntent {
    SelectDifficulty(Difficulty),
    /// Enter / space: start, next stage, play again
    Confirm,
    /// Esc: back to the menu
    Back,
    /// Rotate the grabbed shape (or the one under the pointer)
    Rotate,
}

/// Map keyboard input to UI intents.
pub fn handle_key_event(key: KeyEvent) -> Option<UiIntent> {
    match key.code {
        // Difficulty
        KeyCode::Char('1') | KeyCode::Char('e') | KeyCode::Char('E') => {
            Some(UiIntent::SelectDifficulty(Difficulty::Easy))
        }
        KeyCode::Char('2') | KeyCode::Char('n') | KeyCode::Char('N') => {
            Some(UiIntent::SelectDifficulty(Difficulty::Normal))
        }
        KeyCode::Char('3') | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(UiIntent::SelectDifficulty(Difficulty::Hard))
        }

        KeyCode::Enter | KeyCode::Char(' ') => Some(UiIntent::Confirm),
        KeyCode::Esc => Some(UiIntent::Back),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(UiIntent::Rotate),

        _ => None,
    }
}

/// Translate an intent into a state machine command for the given phase.
///
/// `Rotate` never maps to a command; the drag controller handles it.
pub fn command_for(intent: UiIntent, phase: GamePhase) -> Option<GameCommand> {
    match (intent, phase) {
        (UiIntent::SelectDifficulty(difficulty), GamePhase::Menu) => {
            Some(GameCommand::SetDifficulty { difficulty })
        }
        (UiIntent::Confirm, GamePhase::Menu) => Some(GameCommand::Start),
        (UiIntent::Confirm, GamePhase::StageClear) => Some(GameCommand::Next),
        (UiIntent::Confirm, GamePhase::GameClear) => Some(GameCommand::Reset),
        (UiIntent::Back, GamePhase::Playing | GamePhase::StageClear | GamePhase::GameClear) => {
            Some(GameCommand::Reset)
        }
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

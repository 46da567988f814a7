//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use crossterm::event::KeyCode;

use super::actions::Action;
use super::state::{App, AppMode};

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: &AppMode, key: KeyCode) -> Option<Action> {
    match mode {
        AppMode::Login => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Enter => Some(Action::Submit),
            _ => None,
        },
        AppMode::Normal => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Tab => Some(Action::NextScreen),
            KeyCode::BackTab => Some(Action::PrevScreen),
            KeyCode::Char('/') => Some(Action::StartSearch),
            KeyCode::Char('n') | KeyCode::Right => Some(Action::NextPage),
            KeyCode::Char('p') | KeyCode::Left => Some(Action::PrevPage),
            KeyCode::Char(c @ '1'..='9') => {
                c.to_digit(10).map(|d| Action::SortColumn(d as usize - 1))
            }
            KeyCode::Char('a') => Some(Action::StartAdd),
            KeyCode::Char('e') => Some(Action::StartEdit),
            KeyCode::Char('d') => Some(Action::StartDelete),
            KeyCode::Char('r') => Some(Action::Reload),
            KeyCode::Char('x') => Some(Action::Export),
            KeyCode::Char('L') => Some(Action::Logout),
            _ => None,
        },
        AppMode::Searching => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::Form(_) => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::Confirm(_) => match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Submit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
    }
}

/// 处理按键事件，返回是否退出
pub fn handle_key_event(app: &mut App, key: KeyCode) -> bool {
    match get_action(&app.mode, key) {
        Some(action) => app.dispatch(action),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::state::{ConfirmAction, Screen};

    #[test]
    fn test_digits_map_to_headers() {
        assert_eq!(
            get_action(&AppMode::Normal, KeyCode::Char('1')),
            Some(Action::SortColumn(0))
        );
        assert_eq!(
            get_action(&AppMode::Normal, KeyCode::Char('9')),
            Some(Action::SortColumn(8))
        );
        assert_eq!(get_action(&AppMode::Normal, KeyCode::Char('0')), None);
    }

    #[test]
    fn test_typing_in_search_mode_is_input() {
        assert_eq!(
            get_action(&AppMode::Searching, KeyCode::Char('q')),
            Some(Action::Input('q'))
        );
        assert_eq!(
            get_action(&AppMode::Normal, KeyCode::Char('q')),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_confirm_keys() {
        let mode = AppMode::Confirm(ConfirmAction::Delete {
            screen: Screen::Agents,
            id: "a".to_string(),
        });
        assert_eq!(get_action(&mode, KeyCode::Char('y')), Some(Action::Submit));
        assert_eq!(get_action(&mode, KeyCode::Esc), Some(Action::Cancel));
        assert_eq!(get_action(&mode, KeyCode::Char('d')), None);
    }
}

use crossterm::event::{KeyCode, KeyEvent};

use crate::controller::Outcome;
use crate::tui::app::{App, ConfirmAction, ConfirmState, Mode};

/// Ask y/n before running `action`
pub(super) fn request_confirm(app: &mut App, prompt: &'static str, action: ConfirmAction) {
    app.confirm_state = Some(ConfirmState { prompt, action });
    app.mode = Mode::Confirm;
}

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.mode = Mode::Navigate;
            if let Some(state) = app.confirm_state.take() {
                run_action(app, state.action);
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.mode = Mode::Navigate;
            app.confirm_state = None;
        }
        _ => {}
    }
}

/// The user already said yes, so the controller's own prompt is answered
/// with yes too.
fn run_action(app: &mut App, action: ConfirmAction) {
    let mut yes = |_: &str| true;
    let (result, done) = match &action {
        ConfirmAction::DeleteList(id) => (app.controller.delete_list(id, &mut yes), "list deleted"),
        ConfirmAction::DeleteSubList(id) => {
            (app.controller.delete_sub_list(id, &mut yes), "group deleted")
        }
        ConfirmAction::ResetBoard => (app.controller.reset_board(&mut yes), "new board created"),
    };
    match result {
        Ok(Outcome::Applied) => app.set_status(done),
        Ok(_) => {}
        Err(e) => app.set_error(e),
    }
    if action == ConfirmAction::ResetBoard {
        app.cursor = Default::default();
        app.first_list = 0;
    }
    app.clamp_cursor();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::CONFIRM_RESET;
    use crate::model::defaults::default_board;
    use crate::tui::app::Cursor;
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::{ch, key};
    use crate::tui::render::test_helpers::app_with_board;

    #[test]
    fn delete_group_after_yes() {
        let mut app = app_with_board(default_board());
        app.cursor = Cursor { list: 0, row: 4 };
        handle_key(&mut app, ch('d'));
        assert_eq!(app.mode, Mode::Confirm);
        handle_key(&mut app, ch('y'));
        assert_eq!(app.board().lists[0].sub_lists.len(), 1);
        assert_eq!(app.board().total(), 3600.0);
        assert_eq!(app.cursor, Cursor { list: 0, row: 3 });
        assert_eq!(app.status_message.as_deref(), Some("group deleted"));
    }

    #[test]
    fn esc_declines() {
        let mut app = app_with_board(default_board());
        request_confirm(&mut app, CONFIRM_RESET, ConfirmAction::ResetBoard);
        handle_key(&mut app, ch('x'));
        assert_eq!(app.mode, Mode::Confirm);
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.confirm_state.is_none());
    }

    #[test]
    fn reset_restores_default_board() {
        let mut app = app_with_board(default_board());
        app.cursor = Cursor { list: 1, row: 3 };
        let id = app.board().lists[0].id.clone();
        app.controller.rename_list(&id, "Mine").unwrap();
        handle_key(&mut app, ch('R'));
        handle_key(&mut app, ch('y'));
        assert_eq!(app.board().lists[0].name, "Option A");
        assert_eq!(app.board().total(), 4200.0);
        assert_eq!(app.cursor, Cursor::default());
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::controller::{CONFIRM_DELETE_LIST, CONFIRM_DELETE_SUB_LIST, CONFIRM_RESET};
use crate::dnd::DragTarget;
use crate::ops::edit_ops::StickerForm;
use crate::tui::app::{App, ConfirmAction, EditTarget};

use super::*;

/// Width change per `<` / `>` press
const WIDTH_STEP: u32 = 20;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    // Clear any transient status message on keypress
    app.status_message = None;
    app.status_is_error = false;

    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('?')) => app.show_help = true,

        // Cursor
        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => move_vertical(app, -1),
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => move_vertical(app, 1),
        (_, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => move_horizontal(app, -1),
        (_, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => move_horizontal(app, 1),
        (KeyModifiers::NONE, KeyCode::Char('g')) => app.cursor.row = 0,
        (_, KeyCode::Char('G')) => {
            app.cursor.row = app.rows(app.cursor.list).len().saturating_sub(1);
        }

        // Pick up
        (_, KeyCode::Char(' ')) | (_, KeyCode::Enter) => start_drag(app),

        // Create
        (KeyModifiers::NONE, KeyCode::Char('a')) => add_here(app),
        (_, KeyCode::Char('A')) => add_list(app),

        // Edit
        (KeyModifiers::NONE, KeyCode::Char('e')) => edit_name(app),
        (KeyModifiers::NONE, KeyCode::Char('p')) => edit_sticker_field(app, StickerField::Price),
        (KeyModifiers::NONE, KeyCode::Char('u')) => edit_sticker_field(app, StickerField::Link),
        (KeyModifiers::NONE, KeyCode::Char('n')) => {
            edit_sticker_field(app, StickerField::Description)
        }
        (KeyModifiers::NONE, KeyCode::Char('c')) => cycle_color(app),
        (_, KeyCode::Char('<')) => resize(app, false),
        (_, KeyCode::Char('>')) => resize(app, true),

        // Delete / reset
        (KeyModifiers::NONE, KeyCode::Char('d')) => delete_focused(app),
        (_, KeyCode::Char('R')) => {
            request_confirm(app, CONFIRM_RESET, ConfirmAction::ResetBoard);
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Cursor movement (shared with drag mode)
// ---------------------------------------------------------------------------

pub(super) fn move_vertical(app: &mut App, delta: isize) {
    let rows = app.rows(app.cursor.list).len();
    if rows == 0 {
        return;
    }
    let row = app.cursor.row as isize + delta;
    app.cursor.row = row.clamp(0, rows as isize - 1) as usize;
}

pub(super) fn move_horizontal(app: &mut App, delta: isize) {
    let lists = app.board().lists.len();
    if lists == 0 {
        return;
    }
    let list = (app.cursor.list as isize + delta).clamp(0, lists as isize - 1) as usize;
    if list == app.cursor.list {
        return;
    }
    app.cursor.list = list;
    app.scroll_offset = 0;
    let rows = app.rows(list).len();
    app.cursor.row = app.cursor.row.min(rows.saturating_sub(1));
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

fn add_list(app: &mut App) {
    match app.controller.add_list() {
        Ok(id) => {
            app.focus(&DragTarget::List(id));
            edit_name(app);
        }
        Err(e) => app.set_error(e),
    }
}

/// Add a child of the focused item: a group under a list header, a sticker
/// under a group or next to a sticker.
fn add_here(app: &mut App) {
    let result = match app.focused() {
        None => return add_list(app),
        Some(DragTarget::List(id)) => app.controller.add_sub_list(&id).map(DragTarget::SubList),
        Some(DragTarget::SubList(id)) => app.controller.add_sticker(&id).map(DragTarget::Sticker),
        Some(DragTarget::Sticker(id)) => {
            let Some(sub_id) = app
                .board()
                .find_sticker(&id)
                .map(|(_, sub, _)| sub.id.clone())
            else {
                return;
            };
            app.controller.add_sticker(&sub_id).map(DragTarget::Sticker)
        }
    };
    match result {
        Ok(target) => {
            app.focus(&target);
            edit_name(app);
        }
        Err(e) => app.set_error(e),
    }
}

fn edit_name(app: &mut App) {
    let Some(target) = app.focused() else { return };
    let board = app.board();
    let (edit, name) = match &target {
        DragTarget::List(id) => (
            EditTarget::ListName(id.clone()),
            board.find_list(id).map(|l| l.name.clone()),
        ),
        DragTarget::SubList(id) => (
            EditTarget::SubListName(id.clone()),
            board.find_sub_list(id).map(|(_, s)| s.name.clone()),
        ),
        DragTarget::Sticker(id) => (
            EditTarget::StickerName(id.clone()),
            board.find_sticker(id).map(|(_, _, s)| s.name.clone()),
        ),
    };
    begin_edit(app, edit, name.unwrap_or_default());
}

#[derive(Debug, Clone, Copy)]
enum StickerField {
    Price,
    Link,
    Description,
}

fn edit_sticker_field(app: &mut App, field: StickerField) {
    let Some(DragTarget::Sticker(id)) = app.focused() else {
        app.set_error("select a sticker first");
        return;
    };
    let Some((_, _, sticker)) = app.board().find_sticker(&id) else {
        return;
    };
    let form = StickerForm::from_sticker(sticker);
    let (edit, value) = match field {
        StickerField::Price => (EditTarget::StickerPrice(id), form.price),
        StickerField::Link => (EditTarget::StickerLink(id), form.link),
        StickerField::Description => (EditTarget::StickerDescription(id), form.description),
    };
    begin_edit(app, edit, value);
}

fn cycle_color(app: &mut App) {
    let Some(target) = app.focused() else { return };
    let board = app.board();
    let result = match &target {
        DragTarget::List(id) => match board.find_list(id).map(|l| l.color.next()) {
            Some(color) => app.controller.recolor_list(id, color),
            None => return,
        },
        DragTarget::SubList(id) => match board.find_sub_list(id).map(|(_, s)| s.color.next()) {
            Some(color) => app.controller.recolor_sub_list(id, color),
            None => return,
        },
        DragTarget::Sticker(id) => match board
            .find_sticker(id)
            .map(|(_, sub, s)| s.effective_color(sub).next())
        {
            Some(color) => app.controller.recolor_sticker(id, color),
            None => return,
        },
    };
    if let Err(e) = result {
        app.set_error(e);
    }
}

fn resize(app: &mut App, grow: bool) {
    let Some(list) = app.board().lists.get(app.cursor.list) else {
        return;
    };
    let id = list.id.clone();
    let width = if grow {
        list.width.saturating_add(WIDTH_STEP)
    } else {
        list.width.saturating_sub(WIDTH_STEP)
    };
    match app.controller.resize_list(&id, width) {
        Ok(width) => app.set_status(format!("width {}", width)),
        Err(e) => app.set_error(e),
    }
}

/// Stickers go straight away; lists and groups ask first.
fn delete_focused(app: &mut App) {
    match app.focused() {
        Some(DragTarget::List(id)) => {
            request_confirm(app, CONFIRM_DELETE_LIST, ConfirmAction::DeleteList(id));
        }
        Some(DragTarget::SubList(id)) => {
            request_confirm(app, CONFIRM_DELETE_SUB_LIST, ConfirmAction::DeleteSubList(id));
        }
        Some(DragTarget::Sticker(id)) => {
            match app.controller.delete_sticker(&id) {
                Ok(()) => app.set_status("sticker deleted"),
                Err(e) => app.set_error(e),
            }
            app.clamp_cursor();
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColorTag;
    use crate::model::defaults::default_board;
    use crate::tui::app::{Cursor, Mode};
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::{ch, key, type_str};
    use crate::tui::render::test_helpers::app_with_board;

    #[test]
    fn cursor_moves_and_clamps() {
        let mut app = app_with_board(default_board());
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('j'));
        assert_eq!(app.cursor, Cursor { list: 0, row: 5 });

        // Option B has only four rows
        handle_key(&mut app, ch('l'));
        assert_eq!(app.cursor, Cursor { list: 1, row: 3 });
        handle_key(&mut app, ch('l'));
        assert_eq!(app.cursor.list, 1);

        handle_key(&mut app, ch('g'));
        assert_eq!(app.cursor.row, 0);
        handle_key(&mut app, ch('G'));
        assert_eq!(app.cursor.row, 3);
    }

    #[test]
    fn add_list_opens_name_editor() {
        let mut app = app_with_board(default_board());
        handle_key(&mut app, ch('A'));
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.cursor, Cursor { list: 2, row: 0 });

        handle_key(&mut app, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        type_str(&mut app, "Option C");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board().lists[2].name, "Option C");
    }

    #[test]
    fn add_on_sticker_adds_to_its_group() {
        let mut app = app_with_board(default_board());
        app.cursor = Cursor { list: 0, row: 2 };
        handle_key(&mut app, ch('a'));
        handle_key(&mut app, key(KeyCode::Esc));
        let equipment = &app.board().lists[0].sub_lists[0];
        assert_eq!(equipment.stickers.len(), 3);
        assert_eq!(app.cursor, Cursor { list: 0, row: 4 });
    }

    #[test]
    fn delete_sticker_is_immediate() {
        let mut app = app_with_board(default_board());
        app.cursor = Cursor { list: 1, row: 3 };
        handle_key(&mut app, ch('d'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board().lists[1].sub_lists[0].stickers.len(), 1);
        assert_eq!(app.cursor, Cursor { list: 1, row: 2 });
    }

    #[test]
    fn delete_list_asks_first() {
        let mut app = app_with_board(default_board());
        app.cursor = Cursor { list: 1, row: 0 };
        handle_key(&mut app, ch('d'));
        assert_eq!(app.mode, Mode::Confirm);
        handle_key(&mut app, ch('n'));
        assert_eq!(app.board().lists.len(), 2);

        handle_key(&mut app, ch('d'));
        handle_key(&mut app, ch('y'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board().lists.len(), 1);
        assert_eq!(app.cursor, Cursor { list: 0, row: 0 });
    }

    #[test]
    fn color_cycles() {
        let mut app = app_with_board(default_board());
        app.cursor = Cursor { list: 0, row: 1 };
        handle_key(&mut app, ch('c'));
        assert_eq!(app.board().lists[0].sub_lists[0].color, ColorTag::Pink);

        app.cursor = Cursor { list: 0, row: 0 };
        handle_key(&mut app, ch('c'));
        assert_eq!(app.board().lists[0].color, ColorTag::PaleGreen);
    }

    #[test]
    fn resize_steps_and_clamps() {
        let mut app = app_with_board(default_board());
        handle_key(&mut app, ch('>'));
        assert_eq!(app.board().lists[0].width, 340);
        for _ in 0..5 {
            handle_key(&mut app, ch('<'));
        }
        assert_eq!(app.board().lists[0].width, 280);
    }

    #[test]
    fn price_editor_updates_totals() {
        let mut app = app_with_board(default_board());
        app.cursor = Cursor { list: 0, row: 2 };
        handle_key(&mut app, ch('p'));
        assert_eq!(app.edit_buffer, "1200");
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        type_str(&mut app, "$999");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.board().lists[0].total(), 1899.0);
    }

    #[test]
    fn price_keys_need_a_sticker() {
        let mut app = app_with_board(default_board());
        handle_key(&mut app, ch('p'));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.status_is_error);
    }

    #[test]
    fn help_toggles() {
        let mut app = app_with_board(default_board());
        handle_key(&mut app, ch('?'));
        assert!(app.show_help);
        handle_key(&mut app, ch('j'));
        assert_eq!(app.cursor.row, 0);
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(!app.show_help);
    }
}

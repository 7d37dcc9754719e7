use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Price;
use crate::tui::app::{App, EditTarget, Mode};
use crate::util::unicode;

/// Open the edit line on `target`, prefilled with `initial`
pub(super) fn begin_edit(app: &mut App, target: EditTarget, initial: String) {
    app.edit_cursor = initial.len();
    app.edit_buffer = initial;
    app.edit_target = Some(target);
    app.mode = Mode::Edit;
}

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => finish_edit(app),
        (_, KeyCode::Enter) => commit_edit(app),

        // Cursor
        (_, KeyCode::Left) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = prev;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(next) = unicode::next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = next;
            }
        }
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => app.edit_cursor = 0,
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            app.edit_cursor = app.edit_buffer.len();
        }

        // Deletion
        (KeyModifiers::NONE, KeyCode::Backspace) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.drain(prev..app.edit_cursor);
                app.edit_cursor = prev;
            }
        }
        (m, KeyCode::Backspace)
            if m.contains(KeyModifiers::ALT) || m.contains(KeyModifiers::CONTROL) =>
        {
            delete_word_left(app);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => delete_word_left(app),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            app.edit_buffer.drain(..app.edit_cursor);
            app.edit_cursor = 0;
        }
        (_, KeyCode::Delete) => {
            if let Some(next) = unicode::next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.drain(app.edit_cursor..next);
            }
        }

        // Type character
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.edit_buffer.insert(app.edit_cursor, c);
            app.edit_cursor += c.len_utf8();
        }
        _ => {}
    }
}

fn delete_word_left(app: &mut App) {
    let start = unicode::word_boundary_left(&app.edit_buffer, app.edit_cursor);
    app.edit_buffer.drain(start..app.edit_cursor);
    app.edit_cursor = start;
}

fn finish_edit(app: &mut App) {
    app.edit_target = None;
    app.edit_buffer.clear();
    app.edit_cursor = 0;
    app.mode = Mode::Navigate;
}

/// Write the edit line back. An unusable price keeps the editor open.
fn commit_edit(app: &mut App) {
    let Some(target) = app.edit_target.clone() else {
        finish_edit(app);
        return;
    };
    let text = app.edit_buffer.trim().to_string();
    let result = match &target {
        EditTarget::ListName(id) => app.controller.rename_list(id, &text),
        EditTarget::SubListName(id) => app.controller.rename_sub_list(id, &text),
        EditTarget::StickerName(id) => app.controller.rename_sticker(id, &text),
        EditTarget::StickerPrice(id) => match Price::from_input(&text) {
            Some(price) => app.controller.reprice_sticker(id, price.amount()),
            None => {
                app.set_error(format!("not a price: {:?}", text));
                return;
            }
        },
        EditTarget::StickerLink(id) => app.controller.relink_sticker(id, &text),
        EditTarget::StickerDescription(id) => app.controller.redescribe_sticker(id, &text),
    };
    finish_edit(app);
    if let Err(e) = result {
        app.set_error(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::defaults::default_board;
    use crate::tui::app::Cursor;
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::{ch, key, type_str};
    use crate::tui::render::test_helpers::app_with_board;

    fn editing(initial: &str) -> App {
        let mut app = app_with_board(default_board());
        app.cursor = Cursor { list: 0, row: 2 };
        let id = app.board().lists[0].sub_lists[0].stickers[0].id.clone();
        begin_edit(&mut app, EditTarget::StickerName(id), initial.to_string());
        app
    }

    #[test]
    fn backspace_removes_whole_graphemes() {
        let mut app = editing("cafe\u{301}");
        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.edit_buffer, "caf");
        assert_eq!(app.edit_cursor, 3);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut app = editing("Lapop");
        handle_key(&mut app, key(KeyCode::Left));
        handle_key(&mut app, key(KeyCode::Left));
        type_str(&mut app, "t");
        assert_eq!(app.edit_buffer, "Laptop");
        handle_key(&mut app, key(KeyCode::Home));
        handle_key(&mut app, key(KeyCode::Delete));
        assert_eq!(app.edit_buffer, "aptop");
    }

    #[test]
    fn word_delete() {
        let mut app = editing("Gaming laptop");
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(app.edit_buffer, "Gaming ");
    }

    #[test]
    fn enter_saves_and_esc_discards() {
        let mut app = editing("Laptop");
        type_str(&mut app, " Pro");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.board().lists[0].sub_lists[0].stickers[0].name, "Laptop Pro");

        handle_key(&mut app, ch('e'));
        type_str(&mut app, " Max");
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board().lists[0].sub_lists[0].stickers[0].name, "Laptop Pro");
    }

    #[test]
    fn bad_price_keeps_editor_open() {
        let mut app = app_with_board(default_board());
        let id = app.board().lists[0].sub_lists[0].stickers[0].id.clone();
        begin_edit(&mut app, EditTarget::StickerPrice(id), "lots".into());
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Edit);
        assert!(app.status_is_error);
        assert_eq!(app.board().lists[0].total(), 2100.0);
    }

    #[test]
    fn blank_link_clears() {
        let mut app = app_with_board(default_board());
        let id = app.board().lists[0].sub_lists[0].stickers[0].id.clone();
        begin_edit(&mut app, EditTarget::StickerLink(id.clone()), "https://shop".into());
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(
            app.board().find_sticker(&id).unwrap().2.link.as_deref(),
            Some("https://shop")
        );
        begin_edit(&mut app, EditTarget::StickerLink(id.clone()), "  ".into());
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.board().find_sticker(&id).unwrap().2.link, None);
    }
}

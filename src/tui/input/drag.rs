use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::dnd::DragTarget;
use crate::tui::app::{App, Mode};

use super::*;

/// Pick up the item under the cursor
pub(super) fn start_drag(app: &mut App) {
    let Some(target) = app.focused() else { return };
    if app.controller.drag_start(target) {
        app.mode = Mode::Drag;
        app.drag_over = None;
    }
}

pub(super) fn handle_drag(app: &mut App, key: KeyEvent) {
    let Some(active) = app.controller.session().active().cloned() else {
        app.mode = Mode::Navigate;
        return;
    };

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => cancel_drag(app, &active),
        (_, KeyCode::Char(' ')) | (_, KeyCode::Enter) => drop_active(app, &active),

        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
            move_vertical(app, -1);
            hover(app, &active);
        }
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
            move_vertical(app, 1);
            hover(app, &active);
        }
        (_, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
            move_horizontal(app, -1);
            hover(app, &active);
        }
        (_, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
            move_horizontal(app, 1);
            hover(app, &active);
        }
        _ => {}
    }
}

/// The cursor landed on a new row: report it as the hover target. After a
/// live move the cursor stays on the item it was over.
fn hover(app: &mut App, active: &DragTarget) {
    let Some(over) = app.focused() else { return };
    app.drag_over = Some(over.clone());
    if over == *active {
        return;
    }
    match app.controller.drag_over(active, &over) {
        Ok(true) => {
            app.focus(&over);
        }
        Ok(false) => {}
        Err(e) => {
            app.set_error(e);
            app.focus(&over);
        }
    }
}

fn drop_active(app: &mut App, active: &DragTarget) {
    let over = app.focused();
    let result = app.controller.drag_end(active, over.as_ref());
    app.mode = Mode::Navigate;
    app.drag_over = None;
    match result {
        Ok(true) => app.set_status("moved"),
        Ok(false) => {}
        Err(e) => app.set_error(e),
    }
    if !app.focus(active) {
        app.clamp_cursor();
    }
}

fn cancel_drag(app: &mut App, active: &DragTarget) {
    app.controller.drag_cancel();
    app.mode = Mode::Navigate;
    app.drag_over = None;
    if !app.focus(active) {
        app.clamp_cursor();
    }
    app.set_status("drag cancelled");
}

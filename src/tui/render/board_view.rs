use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::cli::output::format_money;
use crate::dnd::DragTarget;
use crate::model::List;
use crate::tui::app::{App, Mode, Row, column_rows};
use crate::util::unicode;

/// Terminal cells per column for a list width in pixels
const PIXELS_PER_CELL: u32 = 10;

const LINK_MARKER: &str = "\u{2197}";

/// Width of a list column in cells, never wider than the screen
fn column_width(list: &List, available: u16) -> u16 {
    let cells = (list.width / PIXELS_PER_CELL).min(u16::MAX as u32) as u16;
    cells.min(available).max(1)
}

/// Columns that fit on screen starting at `first`: (list index, x offset, width)
fn visible_columns(lists: &[List], first: usize, available: u16) -> Vec<(usize, u16, u16)> {
    let mut columns = Vec::new();
    let mut x = 0u16;
    for (i, list) in lists.iter().enumerate().skip(first) {
        let w = column_width(list, available);
        if x.saturating_add(w) > available && !columns.is_empty() {
            break;
        }
        columns.push((i, x, w));
        x = x.saturating_add(w);
    }
    columns
}

/// Shift `first_list` so the cursor's column is on screen
fn adjust_first_list(app: &mut App, available: u16) {
    let cursor_list = app.cursor.list;
    if cursor_list < app.first_list {
        app.first_list = cursor_list;
    }
    let lists = &app.controller.board().lists;
    app.first_list = app.first_list.min(lists.len().saturating_sub(1));
    while app.first_list < cursor_list
        && !visible_columns(lists, app.first_list, available)
            .iter()
            .any(|(i, _, _)| *i == cursor_list)
    {
        app.first_list += 1;
    }
}

pub fn render_board_view(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.board().lists.is_empty() {
        let empty = Paragraph::new(" No lists. Press A to add one.")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    adjust_first_list(app, area.width);

    // Keep the cursor row inside the focused column's viewport
    let visible_height = area.height.saturating_sub(2) as usize;
    if visible_height > 0 {
        let cursor = app.cursor.row;
        if cursor < app.scroll_offset {
            app.scroll_offset = cursor;
        } else if cursor >= app.scroll_offset + visible_height {
            app.scroll_offset = cursor + 1 - visible_height;
        }
    }

    let app = &*app;
    let dragged = match app.mode {
        Mode::Drag => app.controller.session().active().cloned(),
        _ => None,
    };
    let lists = &app.board().lists;

    for (li, x, w) in visible_columns(lists, app.first_list, area.width) {
        let list = &lists[li];
        let rect = Rect {
            x: area.x + x,
            y: area.y,
            width: w,
            height: area.height,
        };
        let is_focused = li == app.cursor.list;
        let border = if is_focused {
            app.theme.selection_border
        } else {
            app.theme.dim
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border).bg(app.theme.background))
            .style(Style::default().bg(app.theme.background));

        let inner_width = w.saturating_sub(2) as usize;
        let scroll = if is_focused { app.scroll_offset } else { 0 };
        let lines: Vec<Line> = column_rows(list)
            .into_iter()
            .enumerate()
            .skip(scroll)
            .take(visible_height)
            .map(|(row_index, row)| {
                let is_cursor = is_focused && row_index == app.cursor.row;
                let is_dragged = dragged
                    .as_ref()
                    .is_some_and(|d| row_target(list, row) == *d);
                row_line(app, list, row, inner_width, is_cursor, is_dragged)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), rect);
    }
}

fn row_target(list: &List, row: Row) -> DragTarget {
    match row {
        Row::List => DragTarget::List(list.id.clone()),
        Row::SubList(si) => DragTarget::SubList(list.sub_lists[si].id.clone()),
        Row::Sticker(si, ki) => DragTarget::Sticker(list.sub_lists[si].stickers[ki].id.clone()),
    }
}

fn row_line(
    app: &App,
    list: &List,
    row: Row,
    width: usize,
    is_cursor: bool,
    is_dragged: bool,
) -> Line<'static> {
    let theme = &app.theme;
    let bg = if is_cursor {
        theme.selection_bg
    } else {
        theme.background
    };
    let mut text_style = Style::default().fg(theme.text).bg(bg);
    if is_dragged {
        text_style = text_style.fg(theme.highlight).add_modifier(Modifier::BOLD);
    }

    match row {
        Row::List => {
            let right = if app.show_totals {
                format_money(list.total())
            } else {
                String::new()
            };
            let style = if is_dragged {
                text_style
            } else {
                Style::default()
                    .fg(theme.tag_color(list.color))
                    .bg(bg)
                    .add_modifier(Modifier::BOLD)
            };
            Line::from(Span::styled(unicode::spread(&list.name, &right, width), style))
        }
        Row::SubList(si) => {
            let sub = &list.sub_lists[si];
            let right = if app.show_totals {
                format_money(sub.total())
            } else {
                String::new()
            };
            Line::from(vec![
                Span::styled(
                    "\u{25A0} ",
                    Style::default().fg(theme.tag_color(sub.color)).bg(bg),
                ),
                Span::styled(
                    unicode::spread(&sub.name, &right, width.saturating_sub(2)),
                    text_style.add_modifier(Modifier::BOLD),
                ),
            ])
        }
        Row::Sticker(si, ki) => {
            let sub = &list.sub_lists[si];
            let sticker = &sub.stickers[ki];
            let mut right = format_money(sticker.amount());
            if sticker.link.is_some() {
                right.push(' ');
                right.push_str(LINK_MARKER);
            }
            Line::from(vec![
                Span::styled("  ", Style::default().bg(bg)),
                Span::styled(
                    "\u{25CF} ",
                    Style::default()
                        .fg(theme.tag_color(sticker.effective_color(sub)))
                        .bg(bg),
                ),
                Span::styled(
                    unicode::spread(&sticker.name, &right, width.saturating_sub(4)),
                    text_style,
                ),
            ])
        }
    }
}

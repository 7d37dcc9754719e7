use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::dnd::DragTarget;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let (spans, hint) = match app.mode {
        Mode::Navigate => (navigate_spans(app), "? help"),
        Mode::Drag => {
            let name = app
                .controller
                .session()
                .origin()
                .map(|o| o.name.clone())
                .unwrap_or_default();
            (
                vec![Span::styled(
                    format!("dragging {}", name),
                    Style::default().fg(app.theme.highlight).bg(bg),
                )],
                "Enter drop  Esc cancel",
            )
        }
        Mode::Edit => {
            let label = app.edit_target.as_ref().map_or("", |t| t.label());
            let cursor = app.edit_cursor.min(app.edit_buffer.len());
            let text = Style::default().fg(app.theme.text_bright).bg(bg);
            (
                vec![
                    Span::styled(format!("{}: ", label), dim),
                    Span::styled(app.edit_buffer[..cursor].to_string(), text),
                    Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
                    Span::styled(app.edit_buffer[cursor..].to_string(), text),
                ],
                "Enter save  Esc cancel",
            )
        }
        Mode::Confirm => {
            let prompt = app.confirm_state.as_ref().map_or("", |c| c.prompt);
            (
                vec![Span::styled(
                    format!("{} [y/n]", prompt),
                    Style::default()
                        .fg(app.theme.highlight)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                )],
                "",
            )
        }
    };

    let mut spans = spans;
    let content_width: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
    let hint_width = unicode::display_width(hint);
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, dim));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Status message if there is one, else details of the focused sticker
fn navigate_spans(app: &App) -> Vec<Span<'static>> {
    let bg = app.theme.background;
    if let Some(message) = &app.status_message {
        let color = if app.status_is_error {
            app.theme.red
        } else {
            app.theme.text_bright
        };
        return vec![Span::styled(message.clone(), Style::default().fg(color).bg(bg))];
    }

    let Some(DragTarget::Sticker(id)) = app.focused() else {
        return Vec::new();
    };
    let Some((_, _, sticker)) = app.board().find_sticker(&id) else {
        return Vec::new();
    };
    let mut spans = Vec::new();
    if let Some(description) = &sticker.description {
        spans.push(Span::styled(
            description.clone(),
            Style::default().fg(app.theme.text).bg(bg),
        ));
    }
    if let Some(link) = &sticker.link {
        if !spans.is_empty() {
            spans.push(Span::styled("  ", Style::default().bg(bg)));
        }
        spans.push(Span::styled(
            link.clone(),
            Style::default()
                .fg(app.theme.dim)
                .bg(bg)
                .add_modifier(Modifier::UNDERLINED),
        ));
    }
    spans
}

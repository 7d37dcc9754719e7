pub mod board_view;
pub mod help_overlay;
pub mod status_row;
#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::cli::output::format_money;
use crate::util::unicode;

use super::app::App;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: title bar (1 row) | board | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_title_bar(frame, app, chunks[0]);
    board_view::render_board_view(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }
}

/// App name on the left, board total on the right
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let right = if app.show_totals {
        format!("total {} ", format_money(app.board().total()))
    } else {
        String::new()
    };
    let text = unicode::spread(" stickerboard", &right, width);
    let line = Line::from(Span::styled(
        text,
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;
    use crate::model::defaults::default_board;

    #[test]
    fn full_frame_has_title_columns_and_status() {
        let mut app = app_with_board(default_board());
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        let first = output.lines().next().unwrap();
        assert!(first.starts_with(" stickerboard"));
        assert!(first.ends_with("total $4,200"));
        assert!(output.contains("Option A"));
        assert!(output.contains("Option B"));
        assert!(output.lines().last().unwrap().contains("? help"));
    }

    #[test]
    fn totals_can_be_hidden() {
        let mut app = app_with_board(default_board());
        app.show_totals = false;
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(!output.contains("total"));
        assert!(!output.contains("$2,100"));
    }
}

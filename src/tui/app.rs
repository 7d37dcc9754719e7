use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::controller::{BoardController, ControllerOptions};
use crate::dnd::DragTarget;
use crate::io::config_io;
use crate::io::recovery::RecoveryLog;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::store::{FileStore, KeyValueStore, LockingFileStore};
use crate::io::watcher::StoreWatcher;
use crate::model::{Board, BoardConfig, List};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// An item is picked up; cursor moves are hover events
    Drag,
    /// Single-line editor is open
    Edit,
    /// Waiting for y/n on a destructive action
    Confirm,
}

/// A row inside a list column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    /// The list's own header line
    List,
    SubList(usize),
    Sticker(usize, usize),
}

/// Flattened rows of a column: header, then each sub-list followed by its
/// stickers.
pub fn column_rows(list: &List) -> Vec<Row> {
    let mut rows = vec![Row::List];
    for (si, sub) in list.sub_lists.iter().enumerate() {
        rows.push(Row::SubList(si));
        rows.extend((0..sub.stickers.len()).map(|ki| Row::Sticker(si, ki)));
    }
    rows
}

/// Cursor position: a list column and a row inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub list: usize,
    pub row: usize,
}

/// What the edit line writes back to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    ListName(String),
    SubListName(String),
    StickerName(String),
    StickerPrice(String),
    StickerLink(String),
    StickerDescription(String),
}

impl EditTarget {
    pub fn label(&self) -> &'static str {
        match self {
            EditTarget::ListName(_) => "list name",
            EditTarget::SubListName(_) => "group name",
            EditTarget::StickerName(_) => "name",
            EditTarget::StickerPrice(_) => "price",
            EditTarget::StickerLink(_) => "link",
            EditTarget::StickerDescription(_) => "description",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteList(String),
    DeleteSubList(String),
    ResetBoard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub prompt: &'static str,
    pub action: ConfirmAction,
}

/// Main application state
pub struct App {
    pub controller: BoardController<Box<dyn KeyValueStore>>,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_totals: bool,
    pub cursor: Cursor,
    /// First list column on screen
    pub first_list: usize,
    /// Scroll offset of the focused column
    pub scroll_offset: usize,
    /// Help overlay visible
    pub show_help: bool,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub edit_target: Option<EditTarget>,
    pub edit_buffer: String,
    /// Byte offset into `edit_buffer`
    pub edit_cursor: usize,
    pub confirm_state: Option<ConfirmState>,
    /// Target under the cursor at the last hover event
    pub drag_over: Option<DragTarget>,
    /// Directory for UI state, when running against a store directory
    pub state_dir: Option<PathBuf>,
    /// The store changed on disk while a drag was in progress
    pub reload_pending: bool,
}

impl App {
    pub fn new(controller: BoardController<Box<dyn KeyValueStore>>, config: &BoardConfig) -> Self {
        App {
            controller,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            show_totals: config.ui.show_totals,
            cursor: Cursor::default(),
            first_list: 0,
            scroll_offset: 0,
            show_help: false,
            status_message: None,
            status_is_error: false,
            edit_target: None,
            edit_buffer: String::new(),
            edit_cursor: 0,
            confirm_state: None,
            drag_over: None,
            state_dir: None,
            reload_pending: false,
        }
    }

    pub fn board(&self) -> &Board {
        self.controller.board()
    }

    /// Rows of the column at `list`, empty past the last list
    pub fn rows(&self, list: usize) -> Vec<Row> {
        self.board().lists.get(list).map(column_rows).unwrap_or_default()
    }

    /// Keep the cursor on an existing row after the board changed
    pub fn clamp_cursor(&mut self) {
        let lists = self.board().lists.len();
        if lists == 0 {
            self.cursor = Cursor::default();
            return;
        }
        self.cursor.list = self.cursor.list.min(lists - 1);
        let rows = self.rows(self.cursor.list).len();
        self.cursor.row = self.cursor.row.min(rows.saturating_sub(1));
    }

    /// Drag target for the row at `cursor`
    pub fn target_at(&self, cursor: Cursor) -> Option<DragTarget> {
        let list = self.board().lists.get(cursor.list)?;
        match *self.rows(cursor.list).get(cursor.row)? {
            Row::List => Some(DragTarget::List(list.id.clone())),
            Row::SubList(si) => Some(DragTarget::SubList(list.sub_lists[si].id.clone())),
            Row::Sticker(si, ki) => Some(DragTarget::Sticker(
                list.sub_lists[si].stickers[ki].id.clone(),
            )),
        }
    }

    /// Item under the cursor
    pub fn focused(&self) -> Option<DragTarget> {
        self.target_at(self.cursor)
    }

    /// Where `target` currently sits on the board
    pub fn locate(&self, target: &DragTarget) -> Option<Cursor> {
        self.board().lists.iter().enumerate().find_map(|(li, list)| {
            let row = column_rows(list).iter().position(|row| match (row, target) {
                (Row::List, DragTarget::List(id)) => list.id == *id,
                (Row::SubList(si), DragTarget::SubList(id)) => list.sub_lists[*si].id == *id,
                (Row::Sticker(si, ki), DragTarget::Sticker(id)) => {
                    list.sub_lists[*si].stickers[*ki].id == *id
                }
                _ => false,
            })?;
            Some(Cursor { list: li, row })
        })
    }

    /// Move the cursor onto `target`; false when it is not on the board
    pub fn focus(&mut self, target: &DragTarget) -> bool {
        match self.locate(target) {
            Some(cursor) => {
                self.cursor = cursor;
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl std::fmt::Display) {
        self.status_message = Some(message.to_string());
        self.status_is_error = true;
    }

    /// Pick up changes another process wrote to the store. Deferred while
    /// a drag is in progress.
    pub fn reload(&mut self) {
        if self.mode == Mode::Drag {
            self.reload_pending = true;
            return;
        }
        self.reload_pending = false;
        let focus = self.focused();
        match self.controller.reload() {
            Ok(true) => {
                if !focus.is_some_and(|t| self.focus(&t)) {
                    self.clamp_cursor();
                }
                self.set_status("board changed on disk, reloaded");
            }
            Ok(false) => {}
            Err(e) => self.set_error(format!("reload failed: {}", e)),
        }
    }
}

/// Restore the cursor from .state.json
pub fn restore_ui_state(app: &mut App) {
    let Some(dir) = &app.state_dir else { return };
    let Some(state) = read_ui_state(dir) else {
        return;
    };
    if let Some(target) = state.focus.and_then(|s| s.parse::<DragTarget>().ok()) {
        app.focus(&target);
    }
    app.first_list = state.first_list.min(app.cursor.list);
}

/// Save the cursor to .state.json
pub fn save_ui_state(app: &App) {
    let Some(dir) = &app.state_dir else { return };
    let state = UiState {
        focus: app.focused().map(|t| t.to_string()),
        first_list: app.first_list,
    };
    if let Err(e) = write_ui_state(dir, &state) {
        tracing::debug!(error = %e, "could not save ui state");
    }
}

/// Run the TUI against a store directory
pub fn run(store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::read_config(store_dir)?;
    let store: Box<dyn KeyValueStore> = Box::new(LockingFileStore::new(FileStore::open(store_dir)?));
    let controller = BoardController::open_with(
        store,
        ControllerOptions {
            list_width: Some(config.board.list_width()),
            recovery: Some(RecoveryLog::new(store_dir)),
        },
    );

    let mut app = App::new(controller, &config);
    app.state_dir = Some(store_dir.to_path_buf());
    restore_ui_state(&mut app);

    let watcher = match StoreWatcher::start(store_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "file watcher unavailable, external edits need a restart");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        let changed = watcher.is_some_and(|w| w.poll());
        if changed || (app.reload_pending && app.mode != Mode::Drag) {
            app.reload();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

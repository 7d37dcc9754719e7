use std::path::{Path, PathBuf};

use crate::dnd::{DragSession, DragTarget};
use crate::io::board_io::{self, BoardError, LoadedBoard};
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, RecoveryLog};
use crate::io::share::{self, ShareError};
use crate::io::store::{BOARD_KEY, KeyValueStore, StoreError};
use crate::model::defaults::{default_board, is_pristine};
use crate::model::{Board, ColorTag, DEFAULT_LIST_WIDTH, EntityKind, List, SubList};
use crate::ops::edit_ops::{self, EditError, StickerForm};

pub const CONFIRM_DELETE_LIST: &str = "Are you sure you want to delete this option?";
pub const CONFIRM_DELETE_SUB_LIST: &str = "Are you sure you want to delete this group?";
pub const CONFIRM_RESET: &str =
    "Are you sure you want to create a new board? This will delete all current data.";
pub const CONFIRM_LOAD_SHARED: &str =
    "A shared board was found. Replace your current board with it?";

/// Asks the user to approve a destructive action
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of an action that may need confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Declined,
    Unchanged,
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Share(#[from] ShareError),
}

#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// Width for new lists (clamped on use)
    pub list_width: Option<u32>,
    pub recovery: Option<RecoveryLog>,
}

/// Owns the board and keeps the store in step with it.
///
/// Every successful mutation replaces the board and writes the canonical
/// document under [`BOARD_KEY`]. If that write fails the in-memory board
/// keeps the change, the document goes to the recovery log, and the error
/// is returned.
pub struct BoardController<S: KeyValueStore> {
    board: Board,
    store: S,
    session: DragSession,
    list_width: u32,
    recovery: Option<RecoveryLog>,
}

impl<S: KeyValueStore> BoardController<S> {
    pub fn open(store: S) -> Self {
        Self::open_with(store, ControllerOptions::default())
    }

    /// Load the stored board, falling back to the default board when
    /// nothing is stored or the stored document is unreadable.
    pub fn open_with(store: S, options: ControllerOptions) -> Self {
        let mut controller = BoardController {
            board: Board::default(),
            store,
            session: DragSession::new(),
            list_width: options.list_width.unwrap_or(DEFAULT_LIST_WIDTH),
            recovery: options.recovery,
        };
        let (board, needs_save) = controller.load_initial();
        controller.board = board;
        if needs_save {
            // Failures are already logged and recorded by persist.
            let _ = controller.persist();
        }
        controller
    }

    /// The initial board, and whether it differs from what is stored
    /// (nothing stored, unreadable, or ids repaired).
    fn load_initial(&mut self) -> (Board, bool) {
        let text = match self.store.get(BOARD_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return (default_board(), true),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored board, using default");
                let saved = self.set_aside_unreadable(&e);
                return (default_board(), saved);
            }
        };
        match board_io::parse_board(&text) {
            Ok(LoadedBoard { board, repairs }) => {
                tracing::info!(lists = board.lists.len(), "loaded board");
                (board, !repairs.is_empty())
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored board is unreadable, using default");
                self.record(
                    RecoveryEntry::new(RecoveryCategory::Import, "stored board unreadable")
                        .field("Error", &e)
                        .body(text),
                );
                (default_board(), true)
            }
        }
    }

    /// Keep what we can of a stored board that could not be read: its text
    /// in the recovery log and the file itself moved aside. Returns true
    /// when the stored copy is out of the way and may be overwritten.
    fn set_aside_unreadable(&mut self, error: &StoreError) -> bool {
        let mut entry = RecoveryEntry::new(RecoveryCategory::Import, "stored board unreadable")
            .field("Error", error);
        if let StoreError::NotUtf8 { lossy, .. } = error {
            entry = entry.body(lossy.clone());
        }
        let moved = match self.store.set_aside(BOARD_KEY) {
            Ok(Some(path)) => {
                entry = entry.field("Saved as", path.display());
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "could not move unreadable board aside");
                false
            }
        };
        self.record(entry);
        moved
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn list_width(&self) -> u32 {
        self.list_width
    }

    fn record(&self, entry: RecoveryEntry) {
        if let Some(log) = &self.recovery {
            log.record(entry);
        }
    }

    /// Replace the board and persist it
    fn replace(&mut self, next: Board) -> Result<(), ControllerError> {
        self.board = next;
        self.persist()
    }

    fn persist(&mut self) -> Result<(), ControllerError> {
        let text = board_io::serialize_board(&self.board)?;
        if let Err(e) = self.store.set(BOARD_KEY, &text) {
            tracing::warn!(error = %e, "could not save board");
            self.record(
                RecoveryEntry::new(RecoveryCategory::Write, "board not saved")
                    .field("Error", &e)
                    .body(text),
            );
            return Err(e.into());
        }
        Ok(())
    }

    /// Apply an edit to a copy of the board; on success the copy replaces
    /// the board and is saved, on failure nothing changes.
    fn edit<T>(
        &mut self,
        f: impl FnOnce(&mut Board) -> Result<T, EditError>,
    ) -> Result<T, ControllerError> {
        let mut next = self.board.clone();
        let value = f(&mut next)?;
        self.replace(next)?;
        Ok(value)
    }

    /// Re-read the stored board if another process changed it. Skipped
    /// while a drag is in progress. Returns true when the board changed.
    pub fn reload(&mut self) -> Result<bool, ControllerError> {
        if self.session.is_dragging() {
            return Ok(false);
        }
        let Some(text) = self.store.get(BOARD_KEY)? else {
            return Ok(false);
        };
        if text == board_io::serialize_board(&self.board)? {
            return Ok(false);
        }
        let loaded = board_io::parse_board(&text)?;
        tracing::info!("board changed on disk, reloaded");
        self.board = loaded.board;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    pub fn add_list(&mut self) -> Result<String, ControllerError> {
        let width = self.list_width;
        self.edit(|b| Ok(edit_ops::add_list(b, width)))
    }

    pub fn add_sub_list(&mut self, list_id: &str) -> Result<String, ControllerError> {
        self.edit(|b| edit_ops::add_sub_list(b, list_id))
    }

    pub fn add_sticker(&mut self, sub_list_id: &str) -> Result<String, ControllerError> {
        self.edit(|b| edit_ops::add_sticker(b, sub_list_id))
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    pub fn delete_list(
        &mut self,
        id: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<Outcome, ControllerError> {
        if self.board.find_list(id).is_none() {
            return Err(EditError::PathNotFound {
                kind: EntityKind::List,
                id: id.to_string(),
            }
            .into());
        }
        if !confirm.confirm(CONFIRM_DELETE_LIST) {
            return Ok(Outcome::Declined);
        }
        let removed = self.edit(|b| edit_ops::delete_list(b, id))?;
        self.record_deleted_list(&removed);
        Ok(Outcome::Applied)
    }

    pub fn delete_sub_list(
        &mut self,
        id: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<Outcome, ControllerError> {
        let Some((list, _)) = self.board.find_sub_list(id) else {
            return Err(EditError::PathNotFound {
                kind: EntityKind::SubList,
                id: id.to_string(),
            }
            .into());
        };
        let list_name = list.name.clone();
        if !confirm.confirm(CONFIRM_DELETE_SUB_LIST) {
            return Ok(Outcome::Declined);
        }
        let removed = self.edit(|b| edit_ops::delete_sub_list(b, id))?;
        self.record_deleted_sub_list(&removed, &list_name);
        Ok(Outcome::Applied)
    }

    pub fn delete_sticker(&mut self, id: &str) -> Result<(), ControllerError> {
        self.edit(|b| edit_ops::delete_sticker(b, id).map(drop))
    }

    fn record_deleted_list(&self, list: &List) {
        self.record(
            RecoveryEntry::new(RecoveryCategory::Delete, format!("list {} deleted", list.name))
                .field("List", &list.id)
                .body(serde_json::to_string_pretty(list).unwrap_or_default()),
        );
    }

    fn record_deleted_sub_list(&self, sub: &SubList, list_name: &str) {
        self.record(
            RecoveryEntry::new(RecoveryCategory::Delete, format!("group {} deleted", sub.name))
                .field("Group", &sub.id)
                .field("List", list_name)
                .body(serde_json::to_string_pretty(sub).unwrap_or_default()),
        );
    }

    // -----------------------------------------------------------------------
    // Field edits
    // -----------------------------------------------------------------------

    pub fn rename_list(&mut self, id: &str, name: &str) -> Result<(), ControllerError> {
        self.edit(|b| edit_ops::rename_list(b, id, name.to_string()))
    }

    pub fn resize_list(&mut self, id: &str, width: u32) -> Result<u32, ControllerError> {
        self.edit(|b| edit_ops::resize_list(b, id, width))
    }

    pub fn recolor_list(&mut self, id: &str, color: ColorTag) -> Result<(), ControllerError> {
        self.edit(|b| edit_ops::recolor_list(b, id, color))
    }

    pub fn rename_sub_list(&mut self, id: &str, name: &str) -> Result<(), ControllerError> {
        self.edit(|b| edit_ops::rename_sub_list(b, id, name.to_string()))
    }

    pub fn recolor_sub_list(&mut self, id: &str, color: ColorTag) -> Result<(), ControllerError> {
        self.edit(|b| edit_ops::recolor_sub_list(b, id, color))
    }

    pub fn rename_sticker(&mut self, id: &str, name: &str) -> Result<(), ControllerError> {
        self.edit(|b| edit_ops::rename_sticker(b, id, name.to_string()))
    }

    pub fn reprice_sticker(&mut self, id: &str, price: f64) -> Result<(), ControllerError> {
        self.edit(|b| edit_ops::reprice_sticker(b, id, price))
    }

    pub fn recolor_sticker(&mut self, id: &str, color: ColorTag) -> Result<(), ControllerError> {
        self.edit(|b| edit_ops::recolor_sticker(b, id, color))
    }

    pub fn relink_sticker(&mut self, id: &str, link: &str) -> Result<(), ControllerError> {
        self.edit(|b| edit_ops::relink_sticker(b, id, link))
    }

    pub fn redescribe_sticker(&mut self, id: &str, text: &str) -> Result<(), ControllerError> {
        self.edit(|b| edit_ops::redescribe_sticker(b, id, text))
    }

    pub fn save_sticker_form(&mut self, id: &str, form: &StickerForm) -> Result<(), ControllerError> {
        self.edit(|b| edit_ops::save_sticker_form(b, id, form))
    }

    // -----------------------------------------------------------------------
    // Drag and drop
    // -----------------------------------------------------------------------

    pub fn drag_start(&mut self, target: DragTarget) -> bool {
        self.session.on_drag_start(&self.board, target)
    }

    /// Hover tick; true when the live preview moved something
    pub fn drag_over(
        &mut self,
        active: &DragTarget,
        over: &DragTarget,
    ) -> Result<bool, ControllerError> {
        match self.session.on_drag_over(&self.board, active, over) {
            Some(next) => self.replace(next).map(|_| true),
            None => Ok(false),
        }
    }

    /// Drop; true when the drop reordered something
    pub fn drag_end(
        &mut self,
        active: &DragTarget,
        over: Option<&DragTarget>,
    ) -> Result<bool, ControllerError> {
        match self.session.on_drag_end(&self.board, active, over) {
            Some(next) => self.replace(next).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn drag_cancel(&mut self) {
        self.session.on_drag_cancel();
    }

    // -----------------------------------------------------------------------
    // Whole-board operations
    // -----------------------------------------------------------------------

    /// Replace the board with a fresh default board
    pub fn reset_board(&mut self, confirm: &mut dyn Confirm) -> Result<Outcome, ControllerError> {
        if !confirm.confirm(CONFIRM_RESET) {
            return Ok(Outcome::Declined);
        }
        self.replace(default_board())?;
        Ok(Outcome::Applied)
    }

    /// Replace the board with a parsed document. A document that does not
    /// parse is reported and leaves the board unchanged.
    pub fn import_document(&mut self, text: &str) -> Result<LoadedBoard, ControllerError> {
        let loaded = match board_io::parse_board(text) {
            Ok(loaded) => loaded,
            Err(e) => {
                self.record(
                    RecoveryEntry::new(RecoveryCategory::Import, "document rejected")
                        .field("Error", &e)
                        .body(text),
                );
                return Err(e.into());
            }
        };
        tracing::info!(lists = loaded.board.lists.len(), "imported board");
        self.replace(loaded.board.clone())?;
        Ok(loaded)
    }

    pub fn import_file(&mut self, path: &Path) -> Result<LoadedBoard, ControllerError> {
        let text = board_io::read_document(path)?;
        self.import_document(&text)
    }

    /// Pretty JSON of the current board
    pub fn export_document(&self) -> Result<String, ControllerError> {
        Ok(board_io::serialize_board_pretty(&self.board)?)
    }

    pub fn export_file(&self, path: &Path) -> Result<PathBuf, ControllerError> {
        Ok(board_io::export_to_file(&self.board, path)?)
    }

    pub fn share_token(&self) -> Result<String, ControllerError> {
        Ok(share::encode(&self.board)?)
    }

    /// Load a board from a share token or link. Loads straight away when
    /// the current board is empty or still the starter board; otherwise
    /// asks first.
    pub fn load_shared(
        &mut self,
        input: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<Outcome, ControllerError> {
        let loaded = match share::decode(input) {
            Ok(loaded) => loaded,
            Err(e) => {
                self.record(
                    RecoveryEntry::new(RecoveryCategory::Import, "share link rejected")
                        .field("Error", &e)
                        .body(input.trim()),
                );
                return Err(e.into());
            }
        };
        if loaded.board == self.board {
            return Ok(Outcome::Unchanged);
        }
        if !is_pristine(&self.board) && !confirm.confirm(CONFIRM_LOAD_SHARED) {
            return Ok(Outcome::Declined);
        }
        self.replace(loaded.board)?;
        Ok(Outcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn yes(_: &str) -> bool {
        true
    }

    fn no(_: &str) -> bool {
        false
    }

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }
        fn set(&mut self, key: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Write {
                path: PathBuf::from(key),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn stored(c: &BoardController<MemoryStore>) -> String {
        c.store().get(BOARD_KEY).unwrap().unwrap()
    }

    #[test]
    fn empty_store_opens_and_saves_default_board() {
        let c = BoardController::open(MemoryStore::new());
        assert!(is_pristine(c.board()));
        assert_eq!(c.board().lists.len(), 2);
        assert_eq!(stored(&c), board_io::serialize_board(c.board()).unwrap());
    }

    #[test]
    fn corrupt_store_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let log = RecoveryLog::new(tmp.path());
        let c = BoardController::open_with(
            MemoryStore::with(BOARD_KEY, "{not json"),
            ControllerOptions {
                recovery: Some(log.clone()),
                ..Default::default()
            },
        );
        assert!(is_pristine(c.board()));
        let entries = log.entries(None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].body, "{not json");
        // The fallback board replaces the unreadable document
        assert!(stored(&c).starts_with('['));
    }

    #[test]
    fn unreadable_stored_file_is_moved_aside_before_saving() {
        use crate::io::store::FileStore;

        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("store");
        let store = FileStore::open(&dir).unwrap();
        let raw = b"[{\"id\":\"l\",\"name\":\"Caf\xE9\",\"subLists\":[]}]";
        std::fs::write(dir.join("boardData.json"), raw).unwrap();

        let log = RecoveryLog::new(tmp.path());
        let mut c = BoardController::open_with(
            store,
            ControllerOptions {
                recovery: Some(log.clone()),
                ..Default::default()
            },
        );
        assert!(is_pristine(c.board()));
        c.add_list().unwrap();

        let entries = log.entries(None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "stored board unreadable");
        assert!(entries[0].body.contains("Caf\u{FFFD}"));
        let (_, saved_as) = entries[0]
            .fields
            .iter()
            .find(|(k, _)| k == "Saved as")
            .unwrap();
        assert_eq!(std::fs::read(saved_as).unwrap(), raw);

        // The store now holds the new board
        let text = c.store().get(BOARD_KEY).unwrap().unwrap();
        assert_eq!(board_io::parse_board(&text).unwrap().board, *c.board());
    }

    #[test]
    fn stored_board_is_loaded() {
        let doc = r#"[{"id":"l1","name":"Mine","subLists":[]}]"#;
        let c = BoardController::open(MemoryStore::with(BOARD_KEY, doc));
        assert_eq!(c.board().lists[0].name, "Mine");
    }

    #[test]
    fn every_change_is_saved() {
        let mut c = BoardController::open(MemoryStore::new());
        let id = c.add_list().unwrap();
        assert!(stored(&c).contains(&id));
        c.rename_list(&id, "Option Z").unwrap();
        assert!(stored(&c).contains("Option Z"));
    }

    #[test]
    fn failed_edit_changes_nothing() {
        let mut c = BoardController::open(MemoryStore::new());
        let before = c.board().clone();
        let doc = stored(&c);
        assert!(c.rename_list("missing", "x").is_err());
        assert_eq!(c.board(), &before);
        assert_eq!(stored(&c), doc);
    }

    #[test]
    fn declined_delete_leaves_document_identical() {
        let mut c = BoardController::open(MemoryStore::new());
        let list_id = c.board().lists[0].id.clone();
        c.rename_list(&list_id, "Saved").unwrap();
        let doc = stored(&c);

        let sub_id = c.board().lists[0].sub_lists[0].id.clone();
        assert_eq!(c.delete_sub_list(&sub_id, &mut no).unwrap(), Outcome::Declined);
        assert_eq!(c.delete_list(&list_id, &mut no).unwrap(), Outcome::Declined);
        assert_eq!(stored(&c), doc);
        assert_eq!(board_io::serialize_board(c.board()).unwrap(), doc);
    }

    #[test]
    fn confirmed_delete_is_recorded() {
        let tmp = TempDir::new().unwrap();
        let log = RecoveryLog::new(tmp.path());
        let mut c = BoardController::open_with(
            MemoryStore::new(),
            ControllerOptions {
                recovery: Some(log.clone()),
                ..Default::default()
            },
        );
        let sub_id = c.board().lists[0].sub_lists[1].id.clone();
        let mut asked = Vec::new();
        let outcome = c
            .delete_sub_list(&sub_id, &mut |prompt: &str| {
                asked.push(prompt.to_string());
                true
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(asked, vec![CONFIRM_DELETE_SUB_LIST.to_string()]);
        assert_eq!(c.board().lists[0].sub_lists.len(), 1);

        let entries = log.entries(None);
        assert_eq!(entries[0].category, RecoveryCategory::Delete);
        assert!(entries[0].body.contains("Adobe Suite"));
    }

    #[test]
    fn sticker_delete_needs_no_confirmation() {
        let mut c = BoardController::open(MemoryStore::new());
        let id = c.board().lists[0].sub_lists[0].stickers[0].id.clone();
        c.delete_sticker(&id).unwrap();
        assert!(c.board().find_sticker(&id).is_none());
    }

    #[test]
    fn store_failure_keeps_change_and_logs_document() {
        let tmp = TempDir::new().unwrap();
        let log = RecoveryLog::new(tmp.path());
        let mut c = BoardController::open_with(
            ReadOnlyStore,
            ControllerOptions {
                recovery: Some(log.clone()),
                ..Default::default()
            },
        );
        let err = c.add_list().unwrap_err();
        assert!(matches!(err, ControllerError::Store(_)));
        assert_eq!(c.board().lists.len(), 3);
        let entries = log.entries(None);
        assert_eq!(entries[0].category, RecoveryCategory::Write);
        assert!(entries[0].body.contains("Option 3"));
    }

    #[test]
    fn reset_requires_confirmation() {
        let mut c = BoardController::open(MemoryStore::new());
        let first = c.board().lists[0].id.clone();
        c.rename_list(&first, "Changed").unwrap();
        assert_eq!(c.reset_board(&mut no).unwrap(), Outcome::Declined);
        assert_eq!(c.board().lists[0].name, "Changed");
        assert_eq!(c.reset_board(&mut yes).unwrap(), Outcome::Applied);
        assert!(is_pristine(c.board()));
        assert_ne!(c.board().lists[0].id, first);
    }

    #[test]
    fn bad_import_leaves_board() {
        let mut c = BoardController::open(MemoryStore::new());
        let before = c.board().clone();
        assert!(matches!(
            c.import_document("[{"),
            Err(ControllerError::Board(BoardError::Parse(_)))
        ));
        assert_eq!(c.board(), &before);
    }

    #[test]
    fn shared_board_loads_over_pristine_board() {
        let mut other = BoardController::open(MemoryStore::new());
        let id = other.board().lists[0].id.clone();
        other.rename_list(&id, "Shared").unwrap();
        let token = other.share_token().unwrap();

        let mut c = BoardController::open(MemoryStore::new());
        let mut asked = false;
        let outcome = c
            .load_shared(&token, &mut |_: &str| {
                asked = true;
                false
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert!(!asked);
        assert_eq!(c.board().lists[0].name, "Shared");
    }

    #[test]
    fn shared_board_over_edited_board_asks() {
        let token = BoardController::open(MemoryStore::new())
            .share_token()
            .unwrap();
        let mut c = BoardController::open(MemoryStore::new());
        let id = c.board().lists[0].id.clone();
        c.rename_list(&id, "Mine").unwrap();

        assert_eq!(c.load_shared(&token, &mut no).unwrap(), Outcome::Declined);
        assert_eq!(c.board().lists[0].name, "Mine");
        assert_eq!(c.load_shared(&token, &mut yes).unwrap(), Outcome::Applied);
        assert_eq!(c.board().lists[0].name, "Option A");
        assert_eq!(c.load_shared(&token, &mut no).unwrap(), Outcome::Unchanged);
    }

    #[test]
    fn drag_persists_live_moves_and_drop() {
        let mut c = BoardController::open(MemoryStore::new());
        let board = c.board().clone();
        let laptop = DragTarget::Sticker(board.lists[0].sub_lists[0].stickers[0].id.clone());
        let b_sub = DragTarget::SubList(board.lists[1].sub_lists[0].id.clone());

        assert!(c.drag_start(laptop.clone()));
        assert!(c.drag_over(&laptop, &b_sub).unwrap());
        assert_eq!(
            board_io::parse_board(&stored(&c)).unwrap().board,
            c.board().clone()
        );
        assert!(!c.drag_end(&laptop, Some(&b_sub)).unwrap());
        assert!(!c.session().is_dragging());
        assert_eq!(c.board().lists[1].total(), 3300.0);
    }

    #[test]
    fn reload_picks_up_external_changes() {
        let mut c = BoardController::open(MemoryStore::new());
        assert!(!c.reload().unwrap());
        let id = c.add_list().unwrap();
        assert!(!c.reload().unwrap());

        let mut external = c.board().clone();
        external.lists.retain(|l| l.id != id);
        c.store
            .set(BOARD_KEY, &board_io::serialize_board(&external).unwrap())
            .unwrap();
        assert!(c.reload().unwrap());
        assert_eq!(c.board().lists.len(), 2);
    }
}

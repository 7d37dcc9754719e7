use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::store::BOARD_KEY;

/// Change notifications for the board document
#[derive(Debug, PartialEq, Eq)]
pub enum StoreEvent {
    BoardChanged,
}

/// Watches the store directory for another process rewriting the board.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<StoreEvent>,
}

impl StoreWatcher {
    pub fn start(store_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let board_file = board_file_name();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else { return };
                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }
                if event.paths.iter().any(|p| is_board_file(p, &board_file)) {
                    let _ = tx.send(StoreEvent::BoardChanged);
                }
            },
            Config::default(),
        )?;
        // Atomic writes rename into place, so watch the directory rather
        // than the file.
        watcher.watch(store_dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Drain pending notifications; true when the board changed at least
    /// once since the last poll.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while let Ok(StoreEvent::BoardChanged) = self.rx.try_recv() {
            changed = true;
        }
        changed
    }
}

fn board_file_name() -> String {
    format!("{}.json", BOARD_KEY)
}

fn is_board_file(path: &Path, board_file: &str) -> bool {
    path.file_name().and_then(|n| n.to_str()) == Some(board_file)
}

/// Path of the board document inside a store directory
pub fn board_path(store_dir: &Path) -> PathBuf {
    store_dir.join(board_file_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_board_file_counts() {
        let name = board_file_name();
        assert!(is_board_file(Path::new("/s/boardData.json"), &name));
        assert!(!is_board_file(Path::new("/s/.recovery.log"), &name));
        assert!(!is_board_file(Path::new("/s/.tmpA1b2"), &name));
        assert_eq!(board_path(Path::new("/s")), PathBuf::from("/s/boardData.json"));
    }
}

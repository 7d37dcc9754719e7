use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::lock::{LockError, StoreLock};

/// Key under which the board document is stored
pub const BOARD_KEY: &str = "boardData";

/// Environment variable naming the store directory
pub const STORE_DIR_ENV: &str = "STICKERBOARD_DIR";

/// Error type for key-value store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf, lossy: String },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("no store directory: pass --store or set STICKERBOARD_DIR")]
    NoStoreDir,
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Minimal string key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Move an unreadable value aside so the next `set` cannot destroy it.
    /// Returns where it went, or `None` when the store keeps no copies.
    fn set_aside(&mut self, _key: &str) -> Result<Option<PathBuf>, StoreError> {
        Ok(None)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn set_aside(&mut self, key: &str) -> Result<Option<PathBuf>, StoreError> {
        (**self).set_aside(key)
    }
}

/// Store backed by a directory: key `k` lives in `<dir>/k.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store directory
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir).map_err(|source| StoreError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(FileStore {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn key_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key)?;
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Some(text)),
            Err(e) => Err(StoreError::NotUtf8 {
                path,
                lossy: String::from_utf8_lossy(e.as_bytes()).into_owned(),
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        atomic_write(&path, value.as_bytes()).map_err(|source| StoreError::Write { path, source })
    }

    /// Rename `<key>.json` to `<key>.json.<timestamp>.bak`
    fn set_aside(&mut self, key: &str) -> Result<Option<PathBuf>, StoreError> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f");
        let backup = self.dir.join(format!("{}.json.{}.bak", key, stamp));
        std::fs::rename(&path, &backup).map_err(|source| StoreError::Write {
            path: backup.clone(),
            source,
        })?;
        Ok(Some(backup))
    }
}

/// File store that takes the store lock around each write. Used by
/// long-lived sessions; one-shot commands hold the lock for their whole
/// load-edit-save cycle instead.
#[derive(Debug, Clone)]
pub struct LockingFileStore {
    inner: FileStore,
}

impl LockingFileStore {
    pub fn new(inner: FileStore) -> Self {
        LockingFileStore { inner }
    }

    pub fn dir(&self) -> &Path {
        self.inner.dir()
    }
}

impl KeyValueStore for LockingFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let _lock = StoreLock::acquire_default(self.inner.dir())?;
        self.inner.set(key, value)
    }

    fn set_aside(&mut self, key: &str) -> Result<Option<PathBuf>, StoreError> {
        let _lock = StoreLock::acquire_default(self.inner.dir())?;
        self.inner.set_aside(key)
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Write `content` to `path` via a temp file in the same directory and a
/// rename, so readers never see a partial file.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Pick the store directory: explicit flag, then `$STICKERBOARD_DIR`, then
/// `$XDG_DATA_HOME/stickerboard`, then `~/.local/share/stickerboard`.
pub fn resolve_store_dir(explicit: Option<&Path>) -> Result<PathBuf, StoreError> {
    resolve_store_dir_from(explicit, |name| std::env::var_os(name).map(PathBuf::from))
}

fn resolve_store_dir_from(
    explicit: Option<&Path>,
    env: impl Fn(&str) -> Option<PathBuf>,
) -> Result<PathBuf, StoreError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    let non_empty = |name: &str| env(name).filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = non_empty(STORE_DIR_ENV) {
        return Ok(dir);
    }
    if let Some(data) = non_empty("XDG_DATA_HOME") {
        return Ok(data.join("stickerboard"));
    }
    non_empty("HOME")
        .map(|home| home.join(".local").join("share").join("stickerboard"))
        .ok_or(StoreError::NoStoreDir)
}

//! Directory-based state backend for persistent storage.

use crate::backend::{validate_slot, StateBackend};
use crate::error::StorageResult;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File extension used for slot files.
const SLOT_EXTENSION: &str = "slot";

/// A directory-based state backend.
///
/// Each slot is stored as `<dir>/<slot>.slot`. Data survives process
/// restarts.
///
/// # Durability
///
/// - `put()` writes a temporary file, syncs it, then renames it over the
///   slot file, so a crash never leaves a half-written slot
/// - `clear()` only removes `*.slot` files; other files in the directory
///   are left alone
///
/// # Thread Safety
///
/// Writers are serialized by an internal lock. Readers see either the old
/// or the new value of a slot, never a mix.
///
/// # Example
///
/// ```no_run
/// use sealsync_storage::{FileBackend, StateBackend};
/// use std::path::Path;
///
/// let backend = FileBackend::open(Path::new(".sealsync")).unwrap();
/// backend.put("signature", b"c2lnbmF0dXJl").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Opens a file backend rooted at `dir`, creating the directory (and its
    /// parents) if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the directory holding the slot files.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.{SLOT_EXTENSION}"))
    }
}

impl StateBackend for FileBackend {
    fn get(&self, slot: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_slot(slot)?;
        match fs::read(self.slot_path(slot)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, slot: &str, value: &[u8]) -> StorageResult<()> {
        validate_slot(slot)?;
        let _guard = self.write_lock.lock();

        let target = self.slot_path(slot);
        let staging = self.dir.join(format!("{slot}.{SLOT_EXTENSION}.tmp"));
        {
            let mut file: File = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&staging)?;
            file.write_all(value)?;
            file.sync_all()?;
        }
        fs::rename(&staging, &target)?;
        tracing::trace!(slot, len = value.len(), "slot written");
        Ok(())
    }

    fn remove(&self, slot: &str) -> StorageResult<()> {
        validate_slot(slot)?;
        let _guard = self.write_lock.lock();
        match fs::remove_file(self.slot_path(slot)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> StorageResult<()> {
        let _guard = self.write_lock.lock();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_slot = path
                .extension()
                .is_some_and(|ext| ext == SLOT_EXTENSION);
            if is_slot && path.is_file() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

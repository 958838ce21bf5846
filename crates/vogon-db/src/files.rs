//! File backend: one JSON document per object inside a directory.
//!
//! Layout:
//!
//! ```text
//! <directory>/
//!   _lock                 advisory lock sentinel
//!   <name>.json           one document per live object
//!   <a>/<b>.json          names with `/` map to nested files
//! ```
//!
//! Every engine operation holds an exclusive advisory lock on `_lock`, so any
//! number of processes may share the directory. Documents are written to a
//! temporary file in the target directory and renamed into place.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use vogon_types::{validate_name, Object};

use crate::engine::KvDatabase;
use crate::error::DbResult;
use crate::traits::{KeyValueStore, Lock};

/// Name of the lock sentinel inside the data directory.
pub const LOCK_FILE_NAME: &str = "_lock";

/// File extension of object documents.
const DOCUMENT_EXTENSION: &str = "json";

/// Engine over a lock file and a directory of JSON documents.
pub type FilesDatabase = KvDatabase<FileLock, DirectoryStore>;

impl FilesDatabase {
    /// Open the database stored in `directory`, creating the directory and
    /// its lock file if missing.
    pub fn open(directory: impl AsRef<Path>) -> DbResult<Self> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;
        let lock = FileLock::open(directory.join(LOCK_FILE_NAME))?;
        debug!(directory = %directory.display(), "opened files database");
        Ok(KvDatabase::new(lock, DirectoryStore::new(directory)))
    }
}

/// Exclusive advisory lock on a sentinel file.
///
/// Advisory locks belong to an open file description, so threads sharing one
/// `FileLock` would not exclude each other through the OS lock alone. An
/// in-process mutex is taken first for that case.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    file: File,
    threads: Mutex<()>,
}

impl FileLock {
    /// Open (or create) the lock file at `path`. Does not take the lock.
    pub fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        Ok(Self {
            path,
            file,
            threads: Mutex::new(()),
        })
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Lock for FileLock {
    type Guard<'a> = FileLockGuard<'a>;

    fn acquire(&self) -> DbResult<FileLockGuard<'_>> {
        let thread = self.threads.lock().unwrap_or_else(PoisonError::into_inner);
        FileExt::lock_exclusive(&self.file)?;
        Ok(FileLockGuard {
            file: &self.file,
            path: &self.path,
            _thread: thread,
        })
    }
}

/// Holds the lock file locked; unlocks on drop.
pub struct FileLockGuard<'a> {
    file: &'a File,
    path: &'a Path,
    _thread: MutexGuard<'a, ()>,
}

impl Drop for FileLockGuard<'_> {
    fn drop(&mut self) {
        // The OS lock is released before the in-process mutex (field drop
        // runs after this body).
        if let Err(e) = FileExt::unlock(self.file) {
            warn!(path = %self.path.display(), error = %e, "failed to release lock file");
        }
    }
}

/// Object store keeping one JSON document per object in a directory.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    directory: PathBuf,
}

impl DirectoryStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The data directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the document holding `name`.
    pub fn path_for(&self, name: &str) -> DbResult<PathBuf> {
        validate_name(name)?;
        Ok(self
            .directory
            .join(format!("{name}.{DOCUMENT_EXTENSION}")))
    }
}

impl KeyValueStore for DirectoryStore {
    fn read(&self, name: &str) -> DbResult<Option<Object>> {
        let path = self.path_for(name)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let object = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(object))
    }

    fn write(&self, name: &str, object: &Object) -> DbResult<()> {
        let path = self.path_for(name)?;
        let parent = path.parent().unwrap_or(&self.directory);
        fs::create_dir_all(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        serde_json::to_writer(&mut tmp, object)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!(path = %path.display(), "wrote object document");
        Ok(())
    }

    fn delete(&self, name: &str) -> DbResult<bool> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

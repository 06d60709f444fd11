//! spendbook-storage-json
//!
//! File-backed [`ExpenseStorage`]: one pretty-printed JSON array per data file,
//! replaced atomically on every save.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use spendbook_core::{
    storage::{decode_document, encode_document, location_lock, ExpenseStorage},
    CoreError,
};
use spendbook_domain::Expense;

const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_FILE_NAME: &str = "expenses.json";

/// Filesystem-backed JSON persistence for the expense collection.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFileStorage {
    /// Opens the data file at `path`, creating parent directories and an empty
    /// document when nothing exists there yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;
        let file_name = path
            .file_name()
            .ok_or_else(|| CoreError::Storage(format!("`{}` is not a file path", path.display())))?;
        // Existing files resolve through symlinks so every alias shares one lock.
        let canonical = if path.exists() {
            fs::canonicalize(&path)?
        } else {
            fs::canonicalize(&parent)?.join(file_name)
        };
        let lock = location_lock(&format!("file:{}", canonical.display()));

        let storage = Self {
            path: canonical,
            lock,
        };
        storage.initialize()?;
        Ok(storage)
    }

    /// Opens `expenses.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Result<Self, CoreError> {
        Self::open(dir.join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Staging file used while a save is in flight.
    pub fn tmp_path(&self) -> PathBuf {
        tmp_path(&self.path)
    }

    fn initialize(&self) -> Result<(), CoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.path.exists() {
            return Ok(());
        }
        tracing::info!(path = %self.path.display(), "creating empty expense document");
        save_expenses_to_path(&[], &self.path)
    }
}

impl ExpenseStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<Expense>, CoreError> {
        match load_expenses_from_path(&self.path) {
            Err(CoreError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "expense document missing, treating as empty");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn save(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        save_expenses_to_path(expenses, &self.path)?;
        tracing::debug!(path = %self.path.display(), count = expenses.len(), "saved expenses");
        Ok(())
    }

    fn write_lock(&self) -> Arc<Mutex<()>> {
        self.lock.clone()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Saves a collection to an arbitrary path, staging through a temporary sibling file.
pub fn save_expenses_to_path(expenses: &[Expense], path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    if let Err(err) = write_atomic(&tmp, &encode_document(expenses)?) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    fs::rename(&tmp, path)?;
    sync_parent_dir(path)?;
    Ok(())
}

/// Flushes the directory entry written by the rename.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<(), CoreError> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent,
        None => Path::new("."),
    };
    File::open(parent)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}

/// Loads a collection from the provided filesystem path.
pub fn load_expenses_from_path(path: &Path) -> Result<Vec<Expense>, CoreError> {
    let data = fs::read_to_string(path)?;
    decode_document(&data)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

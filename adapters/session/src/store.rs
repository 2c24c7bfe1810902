use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

/// Errors raised by persisted editor state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store file could not be read or written.
    #[error("failed to access submission store at {path}")]
    Io {
        /// Store file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The store file does not hold a submission map.
    #[error("submission store at {path} is corrupt")]
    Format {
        /// Store file.
        path: PathBuf,
        /// Underlying decoding failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Last saved submission text per level.
pub trait SubmissionStore {
    /// Saved submission for the level, if any.
    fn load(&self, level: u32) -> Result<Option<String>, StoreError>;

    /// Replaces the saved submission for the level.
    fn save(&mut self, level: u32, text: &str) -> Result<(), StoreError>;
}

/// Store that keeps submissions for the lifetime of the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<u32, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubmissionStore for MemoryStore {
    fn load(&self, level: u32) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(&level).cloned())
    }

    fn save(&mut self, level: u32, text: &str) -> Result<(), StoreError> {
        let _ = self.entries.insert(level, text.to_owned());
        Ok(())
    }
}

/// Store persisted as a JSON object keyed by level number.
///
/// The whole file is rewritten on every save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<u32, String>,
}

impl FileStore {
    /// Opens the store, starting empty when the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Format {
                path: path.clone(),
                source,
            })?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, entries })
    }

    /// File backing the store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&self.entries).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SubmissionStore for FileStore {
    fn load(&self, level: u32) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(&level).cloned())
    }

    fn save(&mut self, level: u32, text: &str) -> Result<(), StoreError> {
        let _ = self.entries.insert(level, text.to_owned());
        self.flush()
    }
}

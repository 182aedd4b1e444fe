//! Persistence for the state that must survive a restart: the item
//! watermark and the slot options.
//!
//! The watermark is saved after every applied item, so a process that
//! dies mid-delta resumes at the next item instead of replaying or
//! skipping one.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::{SessionOptions, StoreError};

/// Everything that is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Highest applied item index; `None` when nothing was applied yet.
    pub watermark: Option<u64>,
    pub options: Option<SessionOptions>,
}

/// Where persisted state lives.
///
/// Implementations should make each save durable before returning.
pub trait SessionStore: Send {
    fn load(&self) -> Result<PersistedState, StoreError>;

    fn save_watermark(&mut self, watermark: Option<u64>) -> Result<(), StoreError>;

    fn save_options(&mut self, options: SessionOptions) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// An in-process store. Clones share the same state, so a caller can keep
/// one clone to inspect what a session saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<PersistedState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `state`.
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Current contents.
    pub fn snapshot(&self) -> PersistedState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<PersistedState, StoreError> {
        Ok(self.snapshot())
    }

    fn save_watermark(&mut self, watermark: Option<u64>) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .watermark = watermark;
        Ok(())
    }

    fn save_options(&mut self, options: SessionOptions) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .options = Some(options);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// A store backed by one JSON file.
///
/// Every save rewrites the whole file through a sibling temporary file and
/// a rename, so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: PersistedState,
}

impl JsonFileStore {
    /// Opens `path`, reading it if it exists. A missing file is an empty
    /// state, not an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PersistedState::default(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), ?state, "session store opened");
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.state)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> Result<PersistedState, StoreError> {
        Ok(self.state)
    }

    fn save_watermark(&mut self, watermark: Option<u64>) -> Result<(), StoreError> {
        self.state.watermark = watermark;
        self.flush()
    }

    fn save_options(&mut self, options: SessionOptions) -> Result<(), StoreError> {
        self.state.options = Some(options);
        self.flush()
    }
}

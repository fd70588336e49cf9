//! Credential persistence.
//!
//! Exactly one credential string is persisted, key-addressed, in one of two
//! backing stores distinguished by lifetime: a durable file-backed store and
//! a session-scoped in-memory store. [`TokenStore`] layers the two; reads
//! consult the durable store first and the first non-empty result wins.
//!
//! No validation happens at this layer. It is a byte-string cache: the only
//! failure condition is storage-unavailable, which reads treat as empty and
//! writes log and swallow.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use marigold_core::Credential;

/// A single-slot credential store.
pub trait CredentialStore: Send + Sync {
    /// Read the stored credential, if any. Storage errors read as empty.
    fn get(&self) -> Option<Credential>;

    /// Replace the stored credential. Best-effort; failures are logged.
    fn set(&self, credential: &Credential);

    /// Delete the stored credential. Best-effort; failures are logged.
    fn clear(&self);
}

/// Durable credential store backed by a file on disk.
///
/// Survives process restarts, like browser `localStorage`.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// File name of the credential slot inside the store directory.
    const FILE_NAME: &'static str = "credential";

    /// Create a store rooted at `dir`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(Self::FILE_NAME),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<Credential> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Credential::from(trimmed))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("credential file unreadable, treating as empty: {e}");
                None
            }
        }
    }

    fn set(&self, credential: &Credential) {
        if let Some(parent) = self.path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            tracing::warn!("failed to create credential directory: {e}");
            return;
        }

        if let Err(e) = fs::write(&self.path, credential.as_str()) {
            tracing::warn!("failed to persist credential: {e}");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("failed to delete credential file: {e}"),
        }
    }
}

/// Session-scoped credential store.
///
/// Lives and dies with the process, like browser `sessionStorage`.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn set(&self, credential: &Credential) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(credential.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

/// Two-tier credential store: durable first, session-scoped fallback.
pub struct TokenStore {
    durable: Box<dyn CredentialStore>,
    session: Box<dyn CredentialStore>,
}

impl TokenStore {
    /// Layer a durable store over a session-scoped one.
    #[must_use]
    pub fn new(durable: Box<dyn CredentialStore>, session: Box<dyn CredentialStore>) -> Self {
        Self { durable, session }
    }

    /// The standard pairing: file-backed durable store plus in-memory
    /// session store.
    #[must_use]
    pub fn file_backed(dir: &Path) -> Self {
        Self::new(
            Box::new(FileCredentialStore::new(dir)),
            Box::new(MemoryCredentialStore::new()),
        )
    }

    /// Read the credential. The durable store is consulted before the
    /// session store; the first non-empty result wins.
    #[must_use]
    pub fn get(&self) -> Option<Credential> {
        self.durable.get().or_else(|| self.session.get())
    }

    /// Replace the credential in the durable store.
    pub fn set(&self, credential: &Credential) {
        self.durable.set(credential);
    }

    /// Delete the credential from both stores.
    pub fn clear(&self) {
        self.durable.clear();
        self.session.clear();
    }
}

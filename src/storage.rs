//!
//! civic-console slot storage
//! ---------------------------
//! Durable client-side storage for the console: a flat namespace of named
//! string slots, the moral equivalent of a browser's local storage. The session
//! layer keeps the bearer credential and the serialized identity in two slots.
//!
//! Two backends are provided:
//! - `FileSlots`: one file per slot under `<state_root>/slots`, written through a
//!   temp file and renamed into place so a slot is either fully written or absent.
//! - `MemorySlots`: process-local map, used by tests and ephemeral runs.
//!
//! Writes are synchronous; when a `put`/`remove` returns `Ok`, the change is on disk.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::error::AppError;
use crate::system_paths;

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("invalid slot name '{0}'")]
    InvalidName(String),
    #[error("slot '{slot}' io failure: {source}")]
    Io {
        slot: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        match err {
            SlotError::InvalidName(_) => AppError::internal("invalid_slot".to_string(), err.to_string()),
            SlotError::Io { .. } => AppError::io("slot_io".to_string(), err.to_string()),
        }
    }
}

pub type SlotResult<T> = Result<T, SlotError>;

/// Named durable string slots.
pub trait SlotStorage: Send + Sync {
    fn get(&self, slot: &str) -> SlotResult<Option<String>>;
    fn put(&self, slot: &str, value: &str) -> SlotResult<()>;
    /// Removing an absent slot is not an error.
    fn remove(&self, slot: &str) -> SlotResult<()>;
}

impl<T: SlotStorage + ?Sized> SlotStorage for Arc<T> {
    fn get(&self, slot: &str) -> SlotResult<Option<String>> { (**self).get(slot) }
    fn put(&self, slot: &str, value: &str) -> SlotResult<()> { (**self).put(slot, value) }
    fn remove(&self, slot: &str) -> SlotResult<()> { (**self).remove(slot) }
}

fn check_name(slot: &str) -> SlotResult<()> {
    let ok = !slot.is_empty() && slot.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok { Ok(()) } else { Err(SlotError::InvalidName(slot.to_string())) }
}

/// File-backed slots rooted at a state directory.
#[derive(Debug, Clone)]
pub struct FileSlots {
    root: PathBuf,
}

impl FileSlots {
    /// Open (and create if needed) the slot directory under `state_root`.
    pub fn open<P: AsRef<Path>>(state_root: P) -> SlotResult<Self> {
        let root = state_root.as_ref().to_path_buf();
        let dir = system_paths::slots_dir(&root);
        fs::create_dir_all(&dir).map_err(|source| SlotError::Io { slot: "<dir>".into(), source })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path { &self.root }
}

impl SlotStorage for FileSlots {
    fn get(&self, slot: &str) -> SlotResult<Option<String>> {
        check_name(slot)?;
        match fs::read_to_string(system_paths::slot_file(&self.root, slot)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SlotError::Io { slot: slot.to_string(), source }),
        }
    }

    fn put(&self, slot: &str, value: &str) -> SlotResult<()> {
        check_name(slot)?;
        let io = |source: std::io::Error| SlotError::Io { slot: slot.to_string(), source };
        let tmp = system_paths::slot_temp_file(&self.root, slot);
        let dst = system_paths::slot_file(&self.root, slot);
        {
            let mut f = fs::File::create(&tmp).map_err(io)?;
            f.write_all(value.as_bytes()).map_err(io)?;
            f.sync_all().map_err(io)?;
        }
        fs::rename(&tmp, &dst).map_err(io)?;
        debug!(target: "civic::storage", "slot.put slot={} bytes={}", slot, value.len());
        Ok(())
    }

    fn remove(&self, slot: &str) -> SlotResult<()> {
        check_name(slot)?;
        match fs::remove_file(system_paths::slot_file(&self.root, slot)) {
            Ok(()) => {
                debug!(target: "civic::storage", "slot.remove slot={}", slot);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SlotError::Io { slot: slot.to_string(), source }),
        }
    }
}

/// In-memory slots; cloning shares the same map.
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlots {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.inner.lock().len() }

    pub fn is_empty(&self) -> bool { self.inner.lock().is_empty() }
}

impl SlotStorage for MemorySlots {
    fn get(&self, slot: &str) -> SlotResult<Option<String>> {
        check_name(slot)?;
        Ok(self.inner.lock().get(slot).cloned())
    }

    fn put(&self, slot: &str, value: &str) -> SlotResult<()> {
        check_name(slot)?;
        self.inner.lock().insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> SlotResult<()> {
        check_name(slot)?;
        self.inner.lock().remove(slot);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_slots_put_get_remove() {
        let tmp = tempdir().unwrap();
        let slots = FileSlots::open(tmp.path()).unwrap();
        assert_eq!(slots.get("adminToken").unwrap(), None);
        slots.put("adminToken", "abc").unwrap();
        assert_eq!(slots.get("adminToken").unwrap().as_deref(), Some("abc"));
        slots.put("adminToken", "def").unwrap();
        assert_eq!(slots.get("adminToken").unwrap().as_deref(), Some("def"));
        slots.remove("adminToken").unwrap();
        assert_eq!(slots.get("adminToken").unwrap(), None);
        // second remove is a no-op
        slots.remove("adminToken").unwrap();
    }

    #[test]
    fn file_slots_survive_reopen() {
        let tmp = tempdir().unwrap();
        FileSlots::open(tmp.path()).unwrap().put("adminInfo", "{\"id\":1}").unwrap();
        let reopened = FileSlots::open(tmp.path()).unwrap();
        assert_eq!(reopened.get("adminInfo").unwrap().as_deref(), Some("{\"id\":1}"));
        assert!(!system_paths::slot_temp_file(tmp.path(), "adminInfo").exists());
    }

    #[test]
    fn rejects_path_like_names() {
        let slots = MemorySlots::new();
        assert!(matches!(slots.put("../etc", "x"), Err(SlotError::InvalidName(_))));
        assert!(matches!(slots.get(""), Err(SlotError::InvalidName(_))));
    }

    #[test]
    fn memory_slots_share_state_across_clones() {
        let a = MemorySlots::new();
        let b = a.clone();
        a.put("adminToken", "t").unwrap();
        assert_eq!(b.get("adminToken").unwrap().as_deref(), Some("t"));
        b.remove("adminToken").unwrap();
        assert!(a.is_empty());
    }
}

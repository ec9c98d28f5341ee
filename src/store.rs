//! Saved ad copies.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCopy {
    pub id: u64,
    pub name: String,
    pub copy: String,
    pub saved_at: DateTime<Utc>,
}

pub trait CopyStore {
    fn create(&mut self, name: &str, copy: &str) -> Result<SavedCopy, StoreError>;
    /// Newest first.
    fn list(&self) -> Vec<SavedCopy>;
    fn get(&self, id: u64) -> Option<SavedCopy>;
    fn delete(&mut self, id: u64) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    next_id: u64,
    copies: Vec<SavedCopy>,
}

/// A store backed by a single JSON document, rewritten on every change.
pub struct JsonFileStore {
    path: PathBuf,
    next_id: u64,
    copies: BTreeMap<u64, SavedCopy>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file: StoreFile = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreFile::default(),
            Err(e) => return Err(e.into()),
        };
        let copies: BTreeMap<u64, SavedCopy> =
            file.copies.into_iter().map(|c| (c.id, c)).collect();
        // Never hand out an id that is already on disk, even if next_id was edited.
        let next_id = copies
            .keys()
            .next_back()
            .map_or(file.next_id, |max| file.next_id.max(max + 1))
            .max(1);
        tracing::debug!(path = %path.display(), count = copies.len(), "opened copy store");
        Ok(Self {
            path,
            next_id,
            copies,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a full snapshot; callers update memory only after this succeeds.
    fn write_snapshot(&self, next_id: u64, copies: Vec<SavedCopy>) -> Result<(), StoreError> {
        let file = StoreFile { next_id, copies };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

impl CopyStore for JsonFileStore {
    fn create(&mut self, name: &str, copy: &str) -> Result<SavedCopy, StoreError> {
        let saved = SavedCopy {
            id: self.next_id,
            name: name.to_string(),
            copy: copy.to_string(),
            saved_at: Utc::now(),
        };
        let mut snapshot: Vec<SavedCopy> = self.copies.values().cloned().collect();
        snapshot.push(saved.clone());
        self.write_snapshot(self.next_id + 1, snapshot)?;

        self.next_id += 1;
        self.copies.insert(saved.id, saved.clone());
        tracing::info!(id = saved.id, "saved ad copy");
        Ok(saved)
    }

    fn list(&self) -> Vec<SavedCopy> {
        let mut copies: Vec<SavedCopy> = self.copies.values().cloned().collect();
        copies.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then(b.id.cmp(&a.id)));
        copies
    }

    fn get(&self, id: u64) -> Option<SavedCopy> {
        self.copies.get(&id).cloned()
    }

    fn delete(&mut self, id: u64) -> Result<(), StoreError> {
        if !self.copies.contains_key(&id) {
            return Err(StoreError::NotFound { id });
        }
        let snapshot: Vec<SavedCopy> = self
            .copies
            .values()
            .filter(|c| c.id != id)
            .cloned()
            .collect();
        self.write_snapshot(self.next_id, snapshot)?;

        self.copies.remove(&id);
        tracing::info!(id, "deleted ad copy");
        Ok(())
    }
}

//! # Persistence
//!
//! A [`ResourceActor`](crate::ResourceActor) keeps its entities in memory and mirrors every
//! accepted mutation into a [`Persistence`] backend. The backend receives the complete
//! post-mutation snapshot; the in-memory store is only changed once `save` returned `Ok`.
//!
//! Two backends ship with the framework:
//!
//! - [`InMemoryPersistence`] - nothing leaves the process. Can be seeded with records.
//! - [`JsonFilePersistence`] - the snapshot is rewritten as one JSON document per mutation,
//!   via a temp file and a rename so a crash never leaves a truncated file behind.

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything an actor needs to resume: the records in insertion order and the next ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<T> {
    pub next_id: u32,
    pub records: Vec<T>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a, T: Serialize> {
    next_id: u32,
    records: &'a [&'a T],
}

/// Backing store of a resource actor.
pub trait Persistence<T>: Send + 'static {
    /// Read the snapshot the actor starts from. Called once, before the actor runs.
    fn load(&mut self) -> Result<Snapshot<T>, StorageError>;

    /// Durably record the state the actor is about to commit.
    fn save(&mut self, next_id: u32, records: &[&T]) -> Result<(), StorageError>;
}

/// Process-local persistence. `save` always succeeds.
pub struct InMemoryPersistence<T> {
    seed: Option<Snapshot<T>>,
}

impl<T> Default for InMemoryPersistence<T> {
    fn default() -> Self {
        Self { seed: None }
    }
}

impl<T> InMemoryPersistence<T> {
    /// Start the actor with `records` already stored. IDs continue after `next_id`.
    pub fn seeded(next_id: u32, records: Vec<T>) -> Self {
        Self {
            seed: Some(Snapshot { next_id, records }),
        }
    }
}

impl<T: Send + 'static> Persistence<T> for InMemoryPersistence<T> {
    fn load(&mut self) -> Result<Snapshot<T>, StorageError> {
        Ok(self.seed.take().unwrap_or_default())
    }

    fn save(&mut self, _next_id: u32, _records: &[&T]) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Snapshot file persistence. A missing file is an empty store.
pub struct JsonFilePersistence<T> {
    path: PathBuf,
    _entity: PhantomData<fn() -> T>,
}

impl<T> JsonFilePersistence<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _entity: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl<T> Persistence<T> for JsonFilePersistence<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    fn load(&mut self) -> Result<Snapshot<T>, StorageError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot yet");
                return Ok(Snapshot::default());
            }
            Err(e) => return Err(e.into()),
        };
        let snapshot: Snapshot<T> =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        debug!(path = %self.path.display(), records = snapshot.records.len(), "Snapshot loaded");
        Ok(snapshot)
    }

    fn save(&mut self, next_id: u32, records: &[&T]) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(&SnapshotRef { next_id, records })
            .map_err(|e| StorageError::Io(e.to_string()))?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// List management service: guarded read-modify-write cycles over storage.
//
// Every operation loads the full document, mutates it in memory, and writes
// it back as one unit. The storage handle sits behind a mutex so concurrent
// callers cannot interleave their cycles and silently drop each other's
// updates.

use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use thiserror::Error;

use crate::store::{PickRecord, Storage, StorageDocument, StoreError};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ListError {
    #[error("player {player_id} is already in {list}")]
    Duplicate {
        list: &'static str,
        player_id: Value,
    },

    #[error("record has no `player_id` field")]
    MissingId,

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// List selection
// ---------------------------------------------------------------------------

/// The three curated lists in the storage document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    IdealPicks,
    DraftedPlayers,
    PriorityList,
}

impl ListKind {
    /// The list's key in the storage document (and its URL path segment).
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::IdealPicks => "ideal_picks",
            ListKind::DraftedPlayers => "drafted_players",
            ListKind::PriorityList => "priority_list",
        }
    }

    fn slot<'a>(&self, doc: &'a mut StorageDocument) -> &'a mut Vec<PickRecord> {
        match self {
            ListKind::IdealPicks => &mut doc.ideal_picks,
            ListKind::DraftedPlayers => &mut doc.drafted_players,
            ListKind::PriorityList => &mut doc.priority_list,
        }
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ListService
// ---------------------------------------------------------------------------

/// CRUD and cross-list operations over the three curated pick lists.
pub struct ListService<S> {
    store: Mutex<S>,
}

impl<S: Storage> ListService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Acquire the storage handle for one read-modify-write cycle.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn store(&self) -> MutexGuard<'_, S> {
        self.store.lock().expect("storage mutex poisoned")
    }

    /// Return the current contents of a list, in insertion order.
    pub fn list(&self, kind: ListKind) -> Result<Vec<PickRecord>, ListError> {
        let store = self.store();
        let mut doc = store.read()?;
        Ok(std::mem::take(kind.slot(&mut doc)))
    }

    /// Append a record to a list. Fails without writing if a record with the
    /// same identifier is already present.
    pub fn add(&self, kind: ListKind, record: PickRecord) -> Result<PickRecord, ListError> {
        let record = record.canonicalize();
        let id = record.player_id().ok_or(ListError::MissingId)?.clone();

        let store = self.store();
        let mut doc = store.read()?;
        let slot = kind.slot(&mut doc);
        if slot.iter().any(|r| r.player_id() == Some(&id)) {
            return Err(ListError::Duplicate {
                list: kind.as_str(),
                player_id: id,
            });
        }
        slot.push(record.clone());
        store.write(&doc)?;
        Ok(record)
    }

    /// Remove every record matching `id` from a list. Idempotent: removing
    /// an absent identifier succeeds and still persists the (unchanged)
    /// document.
    pub fn remove(&self, kind: ListKind, id: &Value) -> Result<(), ListError> {
        let store = self.store();
        let mut doc = store.read()?;
        kind.slot(&mut doc).retain(|r| r.player_id() != Some(id));
        store.write(&doc)?;
        Ok(())
    }

    /// Replace a list with an empty sequence.
    pub fn clear(&self, kind: ListKind) -> Result<(), ListError> {
        let store = self.store();
        let mut doc = store.read()?;
        kind.slot(&mut doc).clear();
        store.write(&doc)?;
        Ok(())
    }

    /// Overwrite the priority list wholesale with caller-supplied content.
    /// No uniqueness constraint and no identifier validation applies here.
    pub fn replace_priority(&self, records: Vec<PickRecord>) -> Result<(), ListError> {
        let store = self.store();
        let mut doc = store.read()?;
        doc.priority_list = records;
        store.write(&doc)?;
        Ok(())
    }

    /// Draft a player: remove any matching identifier from `ideal_picks` and
    /// append the record to `drafted_players`, persisted as a single write.
    /// Fails without writing if the identifier is already drafted.
    pub fn draft_player(&self, record: PickRecord) -> Result<PickRecord, ListError> {
        let record = record.canonicalize();
        let id = record.player_id().ok_or(ListError::MissingId)?.clone();

        let store = self.store();
        let mut doc = store.read()?;
        if doc
            .drafted_players
            .iter()
            .any(|r| r.player_id() == Some(&id))
        {
            return Err(ListError::Duplicate {
                list: ListKind::DraftedPlayers.as_str(),
                player_id: id,
            });
        }
        doc.ideal_picks.retain(|r| r.player_id() != Some(&id));
        doc.drafted_players.push(record.clone());
        store.write(&doc)?;
        Ok(record)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

//! Remembers which saved view is active on each table.
//!
//! [`ViewSelectionCache`] is an owned service object: create it at startup,
//! hand it (or a reference) to the tables that need it, and call
//! [`ViewSelectionCache::shutdown`] to get the backend back for persisting.
//!
//! Storage goes through [`SelectionBackend`], which only deals in strings.
//! All Items is stored under the key [`ALL_ITEMS_KEY`], so that id is
//! reserved and never names a saved view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Storage key meaning "no saved view".
///
/// Reserved: a saved view whose id is exactly this key cannot be selected
/// and always reads back as [`ViewSelection::AllItems`].
pub const ALL_ITEMS_KEY: &str = "__all__";

/// The active selection of one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ViewSelection {
    /// No saved view; the table's unfiltered default.
    #[default]
    AllItems,
    /// A saved view, by id. Never [`ALL_ITEMS_KEY`]; use
    /// [`ViewSelection::view`] to build one.
    View(String),
}

impl ViewSelection {
    /// Creates a view selection.
    ///
    /// The reserved id [`ALL_ITEMS_KEY`] yields [`ViewSelection::AllItems`],
    /// matching what the stored key decodes to.
    pub fn view(id: impl Into<String>) -> Self {
        let id = id.into();
        if id == ALL_ITEMS_KEY {
            ViewSelection::AllItems
        } else {
            ViewSelection::View(id)
        }
    }

    /// Decodes a stored key.
    pub fn from_key(key: &str) -> Self {
        if key == ALL_ITEMS_KEY {
            ViewSelection::AllItems
        } else {
            ViewSelection::View(key.to_string())
        }
    }

    /// Returns the stored key of this selection.
    pub fn as_key(&self) -> &str {
        match self {
            ViewSelection::AllItems => ALL_ITEMS_KEY,
            ViewSelection::View(id) => id,
        }
    }

    /// Returns `true` for All Items.
    pub fn is_all_items(&self) -> bool {
        matches!(self, ViewSelection::AllItems)
    }

    /// Returns the selected view id, if any.
    pub fn view_id(&self) -> Option<&str> {
        match self {
            ViewSelection::AllItems => None,
            ViewSelection::View(id) => Some(id),
        }
    }
}

impl From<String> for ViewSelection {
    fn from(key: String) -> Self {
        ViewSelection::from_key(&key)
    }
}

impl From<ViewSelection> for String {
    fn from(selection: ViewSelection) -> Self {
        selection.as_key().to_string()
    }
}

/// Raw storage for view selections.
///
/// Handles where selections live; [`ViewSelectionCache`] handles what they
/// mean.
pub trait SelectionBackend {
    /// Reads the stored key of a table.
    fn load(&self, table_id: &str) -> Option<String>;

    /// Stores a table's key, replacing any previous one.
    fn store(&mut self, table_id: &str, key: String);

    /// Removes a table's key.
    fn remove(&mut self, table_id: &str);
}

/// In-memory backend.
///
/// [`MemoryBackend::snapshot`] and [`MemoryBackend::restore`] let a host carry
/// the selections across reloads in whatever storage it has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding a previously taken snapshot.
    pub fn restore(entries: BTreeMap<String, String>) -> Self {
        MemoryBackend { entries }
    }

    /// Returns a copy of every stored `table_id -> key` entry.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SelectionBackend for MemoryBackend {
    fn load(&self, table_id: &str) -> Option<String> {
        self.entries.get(table_id).cloned()
    }

    fn store(&mut self, table_id: &str, key: String) {
        self.entries.insert(table_id.to_string(), key);
    }

    fn remove(&mut self, table_id: &str) {
        self.entries.remove(table_id);
    }
}

/// Per-table memory of the active saved view.
#[derive(Debug, Default)]
pub struct ViewSelectionCache<B: SelectionBackend = MemoryBackend> {
    backend: B,
}

impl<B: SelectionBackend> ViewSelectionCache<B> {
    /// Creates a cache over a backend.
    pub fn new(backend: B) -> Self {
        ViewSelectionCache { backend }
    }

    /// Consumes the cache, returning its backend.
    pub fn shutdown(self) -> B {
        self.backend
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Records the active selection of a table.
    pub fn select(&mut self, table_id: &str, selection: ViewSelection) {
        self.backend.store(table_id, selection.into());
    }

    /// Returns the remembered selection of a table, unvalidated.
    pub fn get(&self, table_id: &str) -> Option<ViewSelection> {
        self.backend.load(table_id).map(ViewSelection::from)
    }

    /// Returns the selection to use, given the views that currently exist.
    ///
    /// Nothing remembered resolves to All Items. A remembered view that is
    /// not in `known_view_ids` also resolves to All Items and is forgotten.
    pub fn resolve<I, S>(&mut self, table_id: &str, known_view_ids: I) -> ViewSelection
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.get(table_id) {
            Some(ViewSelection::View(id)) => {
                if known_view_ids.into_iter().any(|known| known.as_ref() == id) {
                    ViewSelection::View(id)
                } else {
                    debug!(table_id, view_id = %id, "Forgot selection of missing view");
                    self.forget(table_id);
                    ViewSelection::AllItems
                }
            }
            _ => ViewSelection::AllItems,
        }
    }

    /// Drops the remembered selection of a table.
    pub fn forget(&mut self, table_id: &str) {
        self.backend.remove(table_id);
    }
}

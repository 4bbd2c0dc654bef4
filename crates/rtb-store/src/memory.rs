use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use rtb_types::{Code, Entry};

use crate::codec::{decode_codes, decode_entries, encode_codes, encode_entries};
use crate::error::StoreResult;
use crate::observer::{DropObserver, NoOpObserver, Resource};
use crate::ranking::rank_entries;
use crate::traits::{EntryStore, ReservedRegistry};

/// In-memory store for tests and embedding.
///
/// Holds the encoded text of both resources, so it exercises the same codec
/// and ranking path as [`FileStore`](crate::FileStore) and lets tests inspect
/// the exact bytes that would have been written.
pub struct InMemoryStore {
    entries: RwLock<String>,
    reserved: RwLock<String>,
    writes: AtomicUsize,
    observer: Arc<dyn DropObserver>,
}

impl InMemoryStore {
    /// Create a store with both resources empty.
    pub fn new() -> Self {
        Self::from_texts("", "")
    }

    /// Create a store pre-loaded with raw resource text.
    pub fn from_texts(entries: &str, reserved: &str) -> Self {
        Self {
            entries: RwLock::new(entries.to_string()),
            reserved: RwLock::new(reserved.to_string()),
            writes: AtomicUsize::new(0),
            observer: Arc::new(NoOpObserver),
        }
    }

    /// Route dropped-record counts to the given observer.
    pub fn with_observer(mut self, observer: Arc<dyn DropObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Current encoded entries resource.
    pub fn entries_text(&self) -> String {
        self.entries.read().expect("lock poisoned").clone()
    }

    /// Current encoded reserved-code resource.
    pub fn reserved_text(&self) -> String {
        self.reserved.read().expect("lock poisoned").clone()
    }

    /// Number of resource replacements performed so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn replace(&self, slot: &RwLock<String>, contents: String) {
        *slot.write().expect("lock poisoned") = contents;
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for InMemoryStore {
    fn list_entries(&self) -> StoreResult<Vec<Entry>> {
        let decoded = decode_entries(self.entries.read().expect("lock poisoned").as_bytes());
        if decoded.dropped > 0 {
            self.observer.records_dropped(Resource::Entries, decoded.dropped);
        }
        let mut entries = decoded.items;
        rank_entries(&mut entries);
        Ok(entries)
    }

    fn persist_entries(&self, mut entries: Vec<Entry>) -> StoreResult<Vec<Entry>> {
        rank_entries(&mut entries);
        self.replace(&self.entries, encode_entries(&entries));
        Ok(entries)
    }
}

impl ReservedRegistry for InMemoryStore {
    fn list_reserved(&self) -> StoreResult<BTreeSet<Code>> {
        let decoded = decode_codes(self.reserved.read().expect("lock poisoned").as_bytes());
        if decoded.dropped > 0 {
            self.observer
                .records_dropped(Resource::ReservedCodes, decoded.dropped);
        }
        Ok(decoded.items)
    }

    fn persist_reserved(&self, codes: &BTreeSet<Code>) -> StoreResult<()> {
        self.replace(&self.reserved, encode_codes(codes));
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("writes", &self.write_count())
            .finish()
    }
}

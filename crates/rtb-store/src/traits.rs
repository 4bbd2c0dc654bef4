//! Storage interfaces for the two leaderboard resources.
//!
//! None of these operations are safe for concurrent read-modify-write. They
//! each read or replace a whole resource; composing them into a consistent
//! update is the caller's job.

use std::collections::BTreeSet;

use rtb_types::{Code, Entry};

use crate::error::StoreResult;

/// Durable, ordered collection of leaderboard entries.
pub trait EntryStore: Send + Sync {
    /// Load every well-formed entry, sorted into board order and ranked 1..N.
    fn list_entries(&self) -> StoreResult<Vec<Entry>>;

    /// Rank the given entries and replace the stored set with them.
    ///
    /// Returns the entries as written, in board order with final ranks.
    fn persist_entries(&self, entries: Vec<Entry>) -> StoreResult<Vec<Entry>>;
}

/// Durable set of codes handed out but not yet attached to an entry.
pub trait ReservedRegistry: Send + Sync {
    /// Load the current set of reserved codes.
    fn list_reserved(&self) -> StoreResult<BTreeSet<Code>>;

    /// Replace the stored set of reserved codes.
    fn persist_reserved(&self, codes: &BTreeSet<Code>) -> StoreResult<()>;

    /// Remove a code from the registry.
    ///
    /// Returns `Ok(true)` if the code was reserved and is now released,
    /// `Ok(false)` if it was not reserved (nothing is written in that case).
    fn release(&self, code: &Code) -> StoreResult<bool> {
        let mut reserved = self.list_reserved()?;
        if reserved.remove(code) {
            self.persist_reserved(&reserved)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// A backend that holds both resources.
pub trait BoardStore: EntryStore + ReservedRegistry {}

impl<T: EntryStore + ReservedRegistry> BoardStore for T {}

//! Durable storage for the reaction-time leaderboard.
//!
//! Two independent resources live here: the board itself (one line per
//! [`Entry`](rtb_types::Entry)) and the registry of reserved claim codes
//! (one code per line). Both are always read and written as whole sets.
//!
//! # Design Rules
//!
//! 1. Rank is never trusted from disk: every load and every persist re-sorts
//!    by `(reaction_time, timestamp)` and renumbers from 1.
//! 2. Malformed records are skipped, not fatal. The count of skipped records
//!    is reported through a [`DropObserver`].
//! 3. Writes replace the whole resource atomically (temp file + rename), so a
//!    crash leaves either the old or the new contents, never a torn file.
//! 4. Stores are not safe for concurrent read-modify-write; callers serialize
//!    mutations themselves.
//!
//! # Backends
//!
//! - [`FileStore`]: two text files in a data directory
//! - [`InMemoryStore`]: the same encoding held in memory, for tests

pub mod codec;
pub mod error;
pub mod file;
pub mod memory;
pub mod observer;
pub mod ranking;
pub mod traits;

pub use codec::{decode_codes, decode_entries, encode_codes, encode_entries, Decoded};
pub use error::{StoreError, StoreResult};
pub use file::{FileStore, ENTRIES_FILE, RESERVED_FILE};
pub use memory::InMemoryStore;
pub use observer::{DropObserver, NoOpObserver, Resource};
pub use ranking::rank_entries;
pub use traits::{BoardStore, EntryStore, ReservedRegistry};

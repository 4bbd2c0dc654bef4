use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rtb_types::{Code, Entry};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::codec::{decode_codes, decode_entries, encode_codes, encode_entries};
use crate::error::StoreResult;
use crate::observer::{DropObserver, NoOpObserver, Resource};
use crate::ranking::rank_entries;
use crate::traits::{EntryStore, ReservedRegistry};

/// File name of the entries resource inside the data directory.
pub const ENTRIES_FILE: &str = "leaderboard.txt";

/// File name of the reserved-code resource inside the data directory.
pub const RESERVED_FILE: &str = "reserved_codes.txt";

/// File-backed store keeping both resources as text files in one directory.
///
/// No file handle is held between operations. Each write goes to a temporary
/// file in the same directory, is synced, and is then renamed over the
/// target, so readers and crash recovery only ever see complete contents.
/// A resource file that does not exist yet reads as empty.
pub struct FileStore {
    dir: PathBuf,
    observer: Arc<dyn DropObserver>,
}

impl FileStore {
    /// Open (creating if needed) a data directory.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            observer: Arc::new(NoOpObserver),
        })
    }

    /// Route dropped-record counts to the given observer.
    pub fn with_observer(mut self, observer: Arc<dyn DropObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Path of the entries resource.
    pub fn entries_path(&self) -> PathBuf {
        self.dir.join(ENTRIES_FILE)
    }

    /// Path of the reserved-code resource.
    pub fn reserved_path(&self) -> PathBuf {
        self.dir.join(RESERVED_FILE)
    }

    fn read_resource(&self, path: &Path) -> StoreResult<Vec<u8>> {
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn replace_resource(&self, path: &Path, contents: &str) -> StoreResult<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;
        debug!(path = %path.display(), bytes = contents.len(), "resource replaced");
        Ok(())
    }

    fn report(&self, resource: Resource, dropped: usize) {
        if dropped > 0 {
            self.observer.records_dropped(resource, dropped);
        }
    }
}

impl EntryStore for FileStore {
    fn list_entries(&self) -> StoreResult<Vec<Entry>> {
        let bytes = self.read_resource(&self.entries_path())?;
        let decoded = decode_entries(&bytes);
        self.report(Resource::Entries, decoded.dropped);

        let mut entries = decoded.items;
        rank_entries(&mut entries);
        Ok(entries)
    }

    fn persist_entries(&self, mut entries: Vec<Entry>) -> StoreResult<Vec<Entry>> {
        rank_entries(&mut entries);
        self.replace_resource(&self.entries_path(), &encode_entries(&entries))?;
        Ok(entries)
    }
}

impl ReservedRegistry for FileStore {
    fn list_reserved(&self) -> StoreResult<BTreeSet<Code>> {
        let bytes = self.read_resource(&self.reserved_path())?;
        let decoded = decode_codes(&bytes);
        self.report(Resource::ReservedCodes, decoded.dropped);
        Ok(decoded.items)
    }

    fn persist_reserved(&self, codes: &BTreeSet<Code>) -> StoreResult<()> {
        self.replace_resource(&self.reserved_path(), &encode_codes(codes))
    }
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore").field("dir", &self.dir).finish()
    }
}

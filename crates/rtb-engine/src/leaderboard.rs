use std::sync::Arc;

use tracing::debug;

use rtb_store::BoardStore;
use rtb_types::{Code, Entry, Timestamp};

use crate::allocator::CodeAllocator;
use crate::error::{EngineError, EngineResult};
use crate::serializer::MutationSerializer;
use crate::submission::{insert_entry, Submission, SubmitOutcome};

/// The leaderboard as seen by the application: list, submit, reserve.
///
/// Cloning is cheap and every clone shares the same store, allocator, and
/// serializer, so clones can be handed to concurrent request handlers.
#[derive(Clone)]
pub struct Leaderboard {
    store: Arc<dyn BoardStore>,
    allocator: Arc<CodeAllocator>,
    serializer: Arc<MutationSerializer>,
}

impl Leaderboard {
    /// Board over `store` with a random allocator and its own serializer.
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self::with_parts(
            store,
            Arc::new(CodeAllocator::random()),
            Arc::new(MutationSerializer::new()),
        )
    }

    /// Board assembled from explicit parts.
    ///
    /// Two boards over the same store must share a serializer, or their
    /// mutations can interleave.
    pub fn with_parts(
        store: Arc<dyn BoardStore>,
        allocator: Arc<CodeAllocator>,
        serializer: Arc<MutationSerializer>,
    ) -> Self {
        Self {
            store,
            allocator,
            serializer,
        }
    }

    pub fn serializer(&self) -> &Arc<MutationSerializer> {
        &self.serializer
    }

    /// Current board in rank order.
    ///
    /// Not serialized: the result is a point-in-time snapshot that a queued
    /// mutation may supersede immediately.
    pub async fn list(&self) -> EngineResult<Vec<Entry>> {
        let store = Arc::clone(&self.store);
        let entries = tokio::task::spawn_blocking(move || store.list_entries())
            .await
            .map_err(|e| EngineError::Internal(format!("list task failed: {e}")))??;
        debug!(size = entries.len(), "board listed");
        Ok(entries)
    }

    /// Run the submission workflow.
    pub async fn submit(&self, submission: Submission) -> EngineResult<SubmitOutcome> {
        let store = Arc::clone(&self.store);
        let allocator = Arc::clone(&self.allocator);
        self.serializer
            .run_blocking(move |permit| {
                insert_entry(permit, store.as_ref(), &allocator, submission, Timestamp::now())
            })
            .await?
    }

    /// Reserve a fresh code for display before the participant submits.
    pub async fn reserve_code(&self) -> EngineResult<Code> {
        let store = Arc::clone(&self.store);
        let allocator = Arc::clone(&self.allocator);
        self.serializer
            .run_blocking(move |permit| allocator.reserve_unique_code(permit, store.as_ref()))
            .await?
    }

    /// Rank a result would get if submitted now: one past every entry that is
    /// at least as fast.
    pub async fn estimated_rank(&self, reaction_time: f64) -> EngineResult<u32> {
        let entries = self.list().await?;
        let ahead = entries
            .iter()
            .filter(|e| e.reaction_time <= reaction_time)
            .count();
        Ok(ahead as u32 + 1)
    }
}

impl std::fmt::Debug for Leaderboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Leaderboard")
            .field("allocator", &self.allocator)
            .field("serializer", &self.serializer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashSet};
    use std::io;

    use rtb_store::{
        EntryStore, FileStore, InMemoryStore, ReservedRegistry, StoreError, StoreResult,
    };

    use crate::allocator::{RandomCodeSource, SequenceCodeSource};

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    fn board_over(store: Arc<InMemoryStore>) -> Leaderboard {
        Leaderboard::new(store)
    }

    /// Store whose medium is gone.
    struct BrokenStore;

    fn gone() -> StoreError {
        StoreError::Io(io::Error::new(io::ErrorKind::NotFound, "medium unavailable"))
    }

    impl EntryStore for BrokenStore {
        fn list_entries(&self) -> StoreResult<Vec<Entry>> {
            Err(gone())
        }
        fn persist_entries(&self, _entries: Vec<Entry>) -> StoreResult<Vec<Entry>> {
            Err(gone())
        }
    }

    impl ReservedRegistry for BrokenStore {
        fn list_reserved(&self) -> StoreResult<BTreeSet<Code>> {
            Err(gone())
        }
        fn persist_reserved(&self, _codes: &BTreeSet<Code>) -> StoreResult<()> {
            Err(gone())
        }
    }

    #[tokio::test]
    async fn first_submission_on_empty_board() {
        let store = Arc::new(InMemoryStore::new());
        let board = board_over(Arc::clone(&store));

        let out = board.submit(Submission::new(250.0)).await.unwrap();

        assert_eq!(out.entry.rank, 1);
        assert_eq!(out.entry.code.as_str().len(), 6);
        assert!(out.entry.code.as_str().bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(out.entry.info, "");
        assert_eq!(out.leaderboard, vec![out.entry.clone()]);
        assert_eq!(store.entries_text().lines().count(), 1);
    }

    #[tokio::test]
    async fn faster_result_pushes_previous_leader_down() {
        let store = Arc::new(InMemoryStore::new());
        let board = board_over(Arc::clone(&store));

        let first = board.submit(Submission::new(250.0)).await.unwrap();
        let second = board.submit(Submission::new(200.0)).await.unwrap();

        assert_eq!(second.entry.rank, 1);
        let previous = second
            .leaderboard
            .iter()
            .find(|e| e.code == first.entry.code)
            .unwrap();
        assert_eq!(previous.rank, 2);

        let listed = board.list().await.unwrap();
        assert_eq!(listed, second.leaderboard);
    }

    #[tokio::test]
    async fn explicit_code_already_on_board_is_rejected() {
        let store = Arc::new(InMemoryStore::from_texts(
            "1,250,2025-09-14T08:30:00.000Z,123456,\n",
            "",
        ));
        let board = board_over(Arc::clone(&store));

        let err = board
            .submit(Submission::new(300.0).with_code("123456"))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::CodeAlreadyUsed(c) if c == code("123456")));
        assert_eq!(store.write_count(), 0);
        assert_eq!(board.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reserved_code_is_consumed_by_submission() {
        let store = Arc::new(InMemoryStore::new());
        let board = board_over(Arc::clone(&store));

        let reserved = board.reserve_code().await.unwrap();
        assert!(store.list_reserved().unwrap().contains(&reserved));

        let out = board
            .submit(Submission::new(300.0).with_code(reserved.as_str()))
            .await
            .unwrap();

        assert_eq!(out.entry.code, reserved);
        assert!(!store.list_reserved().unwrap().contains(&reserved));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submissions_are_all_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        let board = Leaderboard::new(store.clone());

        let mut handles = Vec::new();
        for i in 0..20 {
            let board = board.clone();
            handles.push(tokio::spawn(async move {
                board.submit(Submission::new(100.0 + i as f64)).await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let entries = board.list().await.unwrap();
        assert_eq!(entries.len(), 20);

        let codes: HashSet<&Code> = entries.iter().map(|e| &e.code).collect();
        assert_eq!(codes.len(), 20);

        let ranks: Vec<u32> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, (1..=20).collect::<Vec<u32>>());
        assert_eq!(board.serializer().started().await, 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reservations_never_collide() {
        let store = Arc::new(InMemoryStore::new());
        // A tiny code space makes a race visible if reservations interleave.
        let script: Vec<Code> = (0..12).map(Code::from_index).collect();
        let board = Leaderboard::with_parts(
            store.clone(),
            Arc::new(CodeAllocator::new(SequenceCodeSource::new(script))),
            Arc::new(MutationSerializer::new()),
        );

        let mut handles = Vec::new();
        for _ in 0..12 {
            let board = board.clone();
            handles.push(tokio::spawn(async move { board.reserve_code().await }));
        }
        let mut got = HashSet::new();
        for h in handles {
            assert!(got.insert(h.await.unwrap().unwrap()));
        }
        assert_eq!(store.list_reserved().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn codes_stay_unique_across_reservations_and_entries() {
        let store = Arc::new(InMemoryStore::new());
        let board = Leaderboard::with_parts(
            store.clone(),
            Arc::new(CodeAllocator::new(RandomCodeSource::seeded(3))),
            Arc::new(MutationSerializer::new()),
        );

        for i in 0..10 {
            board.reserve_code().await.unwrap();
            board.submit(Submission::new(150.0 + i as f64)).await.unwrap();
        }
        let reserved = board.reserve_code().await.unwrap();
        board
            .submit(Submission::new(120.0).with_code(reserved.as_str()))
            .await
            .unwrap();

        let entries = board.list().await.unwrap();
        let registry = store.list_reserved().unwrap();
        let mut all: Vec<Code> = entries.into_iter().map(|e| e.code).collect();
        all.extend(registry);
        let distinct: HashSet<&Code> = all.iter().collect();
        assert_eq!(distinct.len(), all.len());
        assert_eq!(all.len(), 21);
    }

    #[tokio::test]
    async fn exhausted_code_space_is_reported() {
        let store = Arc::new(InMemoryStore::from_texts("", "000001\n"));
        let board = Leaderboard::with_parts(
            store.clone(),
            Arc::new(CodeAllocator::new(SequenceCodeSource::new(vec![code("000001")]))),
            Arc::new(MutationSerializer::new()),
        );

        assert!(matches!(
            board.reserve_code().await,
            Err(EngineError::AllocationExhausted { attempts: 1000 })
        ));
        assert!(matches!(
            board.submit(Submission::new(200.0)).await,
            Err(EngineError::AllocationExhausted { .. })
        ));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn storage_failures_propagate() {
        let board = Leaderboard::new(Arc::new(BrokenStore));

        assert!(matches!(board.list().await, Err(EngineError::Storage(_))));
        assert!(matches!(board.reserve_code().await, Err(EngineError::Storage(_))));
        assert!(matches!(
            board.submit(Submission::new(250.0)).await,
            Err(EngineError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn invalid_reaction_time_is_checked_before_storage() {
        let board = Leaderboard::new(Arc::new(BrokenStore));
        assert!(matches!(
            board.submit(Submission::new(0.0)).await,
            Err(EngineError::InvalidReactionTime(_))
        ));
    }

    #[tokio::test]
    async fn estimated_rank_counts_equal_or_faster_entries() {
        let store = Arc::new(InMemoryStore::new());
        let board = board_over(store);
        assert_eq!(board.estimated_rank(300.0).await.unwrap(), 1);

        for ms in [200.0, 250.0, 300.0] {
            board.submit(Submission::new(ms)).await.unwrap();
        }
        assert_eq!(board.estimated_rank(100.0).await.unwrap(), 1);
        assert_eq!(board.estimated_rank(250.0).await.unwrap(), 3);
        assert_eq!(board.estimated_rank(999.0).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn submissions_survive_reopening_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let board = Leaderboard::new(Arc::new(FileStore::open(dir.path()).unwrap()));
        let out = board
            .submit(Submission::new(222.0).with_info("qq,12345"))
            .await
            .unwrap();
        drop(board);

        let reopened = Leaderboard::new(Arc::new(FileStore::open(dir.path()).unwrap()));
        let entries = reopened.list().await.unwrap();
        assert_eq!(entries, vec![out.entry]);
        assert_eq!(entries[0].info, "qq\u{FF0C}12345");
    }
}

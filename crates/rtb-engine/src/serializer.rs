//! The single logical lock behind every leaderboard mutation.
//!
//! Waiters are queued on a [`tokio::sync::Mutex`], which grants the lock in
//! FIFO order, so mutation `k + 1` always observes the completed write of
//! mutation `k`. Mutations run on the blocking pool and own their permit for
//! their whole lifetime: dropping the future that queued a mutation after it
//! started does not release the lock early, and nothing is abandoned
//! mid-write.

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// FIFO queue of read-modify-write tasks over shared storage.
#[derive(Debug, Default)]
pub struct MutationSerializer {
    /// Number of mutations that have been granted the lock so far.
    queue: Arc<Mutex<u64>>,
}

/// Proof that the holder is the only mutation currently running.
///
/// Functions that read-then-write shared storage take `&MutationPermit` so
/// they cannot be called outside the serializer.
#[derive(Debug)]
pub struct MutationPermit {
    guard: OwnedMutexGuard<u64>,
}

impl MutationPermit {
    /// 1-based sequence number of this mutation.
    pub fn seq(&self) -> u64 {
        *self.guard
    }
}

impl MutationSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for this caller's turn.
    pub async fn acquire(&self) -> MutationPermit {
        let mut guard = Arc::clone(&self.queue).lock_owned().await;
        *guard += 1;
        debug!(seq = *guard, "mutation started");
        MutationPermit { guard }
    }

    /// Queue a blocking task and run it to completion while holding the lock.
    pub async fn run_blocking<F, T>(&self, task: F) -> EngineResult<T>
    where
        F: FnOnce(&MutationPermit) -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = self.acquire().await;
        tokio::task::spawn_blocking(move || {
            let out = task(&permit);
            debug!(seq = permit.seq(), "mutation finished");
            drop(permit);
            out
        })
        .await
        .map_err(|e| EngineError::Internal(format!("mutation task failed: {e}")))
    }

    /// Number of mutations started so far.
    ///
    /// Waits for the mutation in flight, if any.
    pub async fn started(&self) -> u64 {
        *self.queue.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    #[tokio::test]
    async fn permits_are_numbered_in_order() {
        let serializer = MutationSerializer::new();
        let first = serializer.run_blocking(|p| p.seq()).await.unwrap();
        let second = serializer.run_blocking(|p| p.seq()).await.unwrap();
        assert_eq!((first, second), (1, 2));
        assert_eq!(serializer.started().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn tasks_never_overlap() {
        let serializer = Arc::new(MutationSerializer::new());
        let busy = Arc::new(AtomicBool::new(false));
        let mut handles = Vec::new();

        for _ in 0..16 {
            let serializer = Arc::clone(&serializer);
            let busy = Arc::clone(&busy);
            handles.push(tokio::spawn(async move {
                serializer
                    .run_blocking(move |_| {
                        assert!(!busy.swap(true, Ordering::SeqCst), "overlapping mutation");
                        std::thread::sleep(Duration::from_millis(2));
                        busy.store(false, Ordering::SeqCst);
                    })
                    .await
                    .unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(serializer.started().await, 16);
    }

    #[tokio::test]
    async fn waiters_are_served_in_arrival_order() {
        let serializer = Arc::new(MutationSerializer::new());
        let order = Arc::new(StdMutex::new(Vec::new()));

        // Hold the lock so every task below has to queue.
        let gate = serializer.acquire().await;
        let mut handles = Vec::new();
        for i in 0..8 {
            let serializer = Arc::clone(&serializer);
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                serializer
                    .run_blocking(move |_| order.lock().unwrap().push(i))
                    .await
                    .unwrap();
            }));
            // Let the task reach the lock before spawning the next one.
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        drop(gate);
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), (0..8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn dropped_caller_does_not_cut_a_running_mutation_short() {
        let serializer = Arc::new(MutationSerializer::new());
        let finished = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&finished);
        let fut = serializer.run_blocking(move |_| {
            std::thread::sleep(Duration::from_millis(50));
            flag.store(true, Ordering::SeqCst);
        });
        // Give the task time to start on the blocking pool, then abandon it.
        let _ = tokio::time::timeout(Duration::from_millis(10), fut).await;

        // The next mutation must wait for the abandoned one to finish.
        let saw_finished = serializer
            .run_blocking(move |_| finished.load(Ordering::SeqCst))
            .await
            .unwrap();
        assert!(saw_finished);
    }

    #[tokio::test]
    async fn panicking_task_surfaces_as_internal_error() {
        let serializer = MutationSerializer::new();
        let err = serializer
            .run_blocking(|_| -> u32 { panic!("boom") })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Internal(_)));

        // The lock is released after the panic.
        assert_eq!(serializer.run_blocking(|p| p.seq()).await.unwrap(), 2);
    }
}

//! Leaderboard engine: ranking, code allocation, and serialized mutation
//! on top of the raw stores.
//!
//! Guarantees:
//!
//! - **Uniqueness**: no two codes across board entries and reservations are
//!   ever equal at a quiescent point.
//! - **Ordering**: the board is always in `(reaction_time, timestamp)` order
//!   with contiguous ranks from 1.
//! - **Atomicity under concurrency**: every read-modify-write of either
//!   resource runs alone, in arrival order, through a [`MutationSerializer`].
//!
//! [`Leaderboard`] is the boundary used by the HTTP layer and the CLI:
//! [`list`](Leaderboard::list), [`submit`](Leaderboard::submit), and
//! [`reserve_code`](Leaderboard::reserve_code).

pub mod allocator;
pub mod error;
pub mod leaderboard;
pub mod serializer;
pub mod submission;

pub use allocator::{
    CodeAllocator, CodeSource, RandomCodeSource, SequenceCodeSource, MAX_ALLOCATION_ATTEMPTS,
};
pub use error::{EngineError, EngineResult};
pub use leaderboard::Leaderboard;
pub use serializer::{MutationPermit, MutationSerializer};
pub use submission::{Submission, SubmitOutcome};

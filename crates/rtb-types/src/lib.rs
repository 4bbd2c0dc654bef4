//! Foundation types for the reaction-time leaderboard.
//!
//! Every other `rtb-*` crate depends on `rtb-types`. The types here carry the
//! data-level invariants of the board: codes are always six ASCII digits,
//! reaction times always lie in `(0, 3000]` ms once validated, and `info`
//! text is always delimiter-safe once sanitized.
//!
//! # Key Types
//!
//! - [`Entry`]: One ranked result on the board
//! - [`Code`]: Six-digit claim code handed to a participant
//! - [`Timestamp`]: Millisecond-precision UTC insertion instant
//! - [`sanitize_info`]: Normalization of free-text annotations

pub mod code;
pub mod entry;
pub mod error;
pub mod info;
pub mod temporal;

pub use code::{Code, CODE_LEN, CODE_SPACE};
pub use entry::{validate_reaction_time, Entry, MAX_REACTION_MS};
pub use error::TypeError;
pub use info::{sanitize_info, INFO_MAX_CHARS};
pub use temporal::Timestamp;

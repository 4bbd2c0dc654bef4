use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::code::Code;
use crate::error::TypeError;
use crate::temporal::Timestamp;

/// Upper bound (inclusive) for an accepted reaction time, in milliseconds.
pub const MAX_REACTION_MS: f64 = 3000.0;

/// Check that a reaction time is finite and within `(0, 3000]` ms.
pub fn validate_reaction_time(ms: f64) -> Result<f64, TypeError> {
    if ms.is_finite() && ms > 0.0 && ms <= MAX_REACTION_MS {
        Ok(ms)
    } else {
        Err(TypeError::InvalidReactionTime(ms))
    }
}

/// One result on the leaderboard.
///
/// `rank` is derived from the board's sort order and is rewritten every time
/// the board is loaded or persisted; a freshly built entry carries `0` until
/// then. The other fields never change after insertion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// 1-based position in `(reaction_time, timestamp)` order.
    pub rank: u32,
    /// Averaged reaction time in milliseconds.
    pub reaction_time: f64,
    /// Insertion instant; tie-breaker between equal reaction times.
    pub timestamp: Timestamp,
    /// Claim code, unique across the board and all reservations.
    pub code: Code,
    /// Sanitized annotation, possibly empty.
    pub info: String,
}

impl Entry {
    /// Build an unranked entry.
    pub fn new(reaction_time: f64, timestamp: Timestamp, code: Code, info: String) -> Self {
        Self {
            rank: 0,
            reaction_time,
            timestamp,
            code,
            info,
        }
    }

    /// Board order: faster first, earlier first among equal times.
    pub fn board_cmp(&self, other: &Self) -> Ordering {
        self.reaction_time
            .total_cmp(&other.reaction_time)
            .then_with(|| self.timestamp.cmp(&other.timestamp))
    }
}

use std::collections::BTreeSet;

use tracing::{debug, info};

use rtb_store::BoardStore;
use rtb_types::{sanitize_info, validate_reaction_time, Code, Entry, Timestamp};

use crate::allocator::CodeAllocator;
use crate::error::{EngineError, EngineResult};
use crate::serializer::MutationPermit;

/// A result handed in by a participant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Submission {
    /// Averaged reaction time in milliseconds.
    pub reaction_time: f64,
    /// Raw annotation; sanitized before storage.
    pub info: Option<String>,
    /// Code shown to the participant earlier, if any. Anything that is not
    /// exactly six digits is ignored and a fresh code is allocated.
    pub code: Option<String>,
}

impl Submission {
    pub fn new(reaction_time: f64) -> Self {
        Self {
            reaction_time,
            ..Default::default()
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// What a successful submission returns.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitOutcome {
    /// The inserted entry with its final rank.
    pub entry: Entry,
    /// The whole board after insertion, in rank order.
    pub leaderboard: Vec<Entry>,
}

/// Validate, sanitize, resolve a code for, and insert one submission.
///
/// Runs as one logical transaction under the caller's permit. Every failure
/// aborts before the board is written. The only write that can precede a
/// failure is the release of a consumed reservation, which is harmless: a
/// lost reservation never weakens uniqueness.
pub(crate) fn insert_entry(
    _permit: &MutationPermit,
    store: &dyn BoardStore,
    allocator: &CodeAllocator,
    submission: Submission,
    now: Timestamp,
) -> EngineResult<SubmitOutcome> {
    let reaction_time = validate_reaction_time(submission.reaction_time)
        .map_err(|_| EngineError::InvalidReactionTime(submission.reaction_time))?;
    let info = submission
        .info
        .as_deref()
        .map(sanitize_info)
        .unwrap_or_default();

    let mut entries = store.list_entries()?;
    let mut reserved = store.list_reserved()?;
    let entry_codes: BTreeSet<Code> = entries.iter().map(|e| e.code.clone()).collect();

    let provided = submission.code.as_deref().and_then(|c| Code::parse(c).ok());
    let code = match provided {
        Some(code) => {
            if entry_codes.contains(&code) {
                return Err(EngineError::CodeAlreadyUsed(code));
            }
            if reserved.remove(&code) {
                store.persist_reserved(&reserved)?;
                debug!(code = %code, "reservation consumed");
            } else {
                debug!(code = %code, "accepting unreserved code");
            }
            code
        }
        None => {
            let mut used = entry_codes;
            used.extend(reserved.iter().cloned());
            allocator.allocate_unique(&used)?
        }
    };

    let timestamp = unused_timestamp(&entries, now)?;

    entries.push(Entry::new(reaction_time, timestamp, code, info));
    let leaderboard = store.persist_entries(entries)?;

    let entry = leaderboard
        .iter()
        .find(|e| e.timestamp == timestamp)
        .cloned()
        .ok_or_else(|| EngineError::Internal("inserted entry missing after persist".into()))?;

    info!(
        rank = entry.rank,
        code = %entry.code,
        reaction_time = entry.reaction_time,
        size = leaderboard.len(),
        "submission accepted"
    );
    Ok(SubmitOutcome { entry, leaderboard })
}

/// `now`, moved forward one millisecond at a time only while it collides
/// with a stored entry. Timestamps double as insertion keys.
fn unused_timestamp(entries: &[Entry], now: Timestamp) -> EngineResult<Timestamp> {
    let taken: BTreeSet<Timestamp> = entries.iter().map(|e| e.timestamp).collect();
    let mut timestamp = now;
    while taken.contains(&timestamp) {
        timestamp = timestamp.next_millisecond().ok_or_else(|| {
            EngineError::Internal("no representable timestamp left after collision".into())
        })?;
    }
    Ok(timestamp)
}

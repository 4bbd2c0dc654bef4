use rtb_store::StoreError;
use rtb_types::Code;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Reaction time is not a finite number in `(0, 3000]` ms.
    #[error("invalid reaction time {0}: expected a finite value in (0, 3000] ms")]
    InvalidReactionTime(f64),

    /// The explicitly requested code already belongs to a board entry.
    #[error("code {0} is already used")]
    CodeAlreadyUsed(Code),

    /// No free code was found within the attempt bound.
    #[error("failed to allocate a free code after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },

    /// The underlying medium could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// A worker task died before finishing (panic or runtime shutdown).
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Returns `true` if the error was caused by the caller's input rather
    /// than by the engine or its storage.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidReactionTime(_) | Self::CodeAlreadyUsed(_))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

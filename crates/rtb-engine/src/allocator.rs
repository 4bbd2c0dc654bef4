use std::collections::BTreeSet;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use rtb_store::BoardStore;
use rtb_types::{Code, CODE_SPACE};

use crate::error::{EngineError, EngineResult};
use crate::serializer::MutationPermit;

/// Candidates drawn before allocation gives up.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 1000;

/// Source of candidate codes.
pub trait CodeSource: Send {
    /// Produce the next candidate. Candidates need not be distinct.
    fn next_code(&mut self) -> Code;
}

/// Uniformly random six-digit codes.
#[derive(Debug)]
pub struct RandomCodeSource<R = StdRng> {
    rng: R,
}

impl RandomCodeSource<StdRng> {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> CodeSource for RandomCodeSource<R> {
    fn next_code(&mut self) -> Code {
        Code::from_index(self.rng.gen_range(0..CODE_SPACE))
    }
}

/// Replays a fixed list of codes, cycling back to the start when exhausted.
#[derive(Clone, Debug)]
pub struct SequenceCodeSource {
    codes: Vec<Code>,
    next: usize,
}

impl SequenceCodeSource {
    /// # Panics
    ///
    /// Panics if `codes` is empty.
    pub fn new(codes: Vec<Code>) -> Self {
        assert!(!codes.is_empty(), "sequence needs at least one code");
        Self { codes, next: 0 }
    }
}

impl CodeSource for SequenceCodeSource {
    fn next_code(&mut self) -> Code {
        let code = self.codes[self.next % self.codes.len()].clone();
        self.next += 1;
        code
    }
}

/// Produces codes absent from a given set of used codes, with a bounded
/// number of attempts.
pub struct CodeAllocator {
    source: Mutex<Box<dyn CodeSource>>,
    max_attempts: u32,
}

impl CodeAllocator {
    pub fn new(source: impl CodeSource + 'static) -> Self {
        Self {
            source: Mutex::new(Box::new(source)),
            max_attempts: MAX_ALLOCATION_ATTEMPTS,
        }
    }

    /// Allocator backed by an entropy-seeded [`RandomCodeSource`].
    pub fn random() -> Self {
        Self::new(RandomCodeSource::from_entropy())
    }

    /// Override the attempt bound.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Draw one candidate code, without any uniqueness check.
    pub fn generate_candidate(&self) -> Code {
        self.source.lock().expect("lock poisoned").next_code()
    }

    /// Draw candidates until one is absent from `used`.
    ///
    /// Fails with [`EngineError::AllocationExhausted`] once `max_attempts`
    /// candidates have all collided.
    pub fn allocate_unique(&self, used: &BTreeSet<Code>) -> EngineResult<Code> {
        let mut source = self.source.lock().expect("lock poisoned");
        for _ in 0..self.max_attempts {
            let candidate = source.next_code();
            if !used.contains(&candidate) {
                return Ok(candidate);
            }
        }
        warn!(
            attempts = self.max_attempts,
            used = used.len(),
            "code allocation exhausted"
        );
        Err(EngineError::AllocationExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Allocate a code unused by both the board and the registry, add it to
    /// the registry, and persist the registry.
    pub fn reserve_unique_code(
        &self,
        _permit: &MutationPermit,
        store: &dyn BoardStore,
    ) -> EngineResult<Code> {
        let entries = store.list_entries()?;
        let mut reserved = store.list_reserved()?;

        let mut used: BTreeSet<Code> = entries.into_iter().map(|e| e.code).collect();
        used.extend(reserved.iter().cloned());

        let code = self.allocate_unique(&used)?;
        reserved.insert(code.clone());
        store.persist_reserved(&reserved)?;

        info!(code = %code, reserved = reserved.len(), "code reserved");
        Ok(code)
    }
}

impl std::fmt::Debug for CodeAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeAllocator")
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

use tern_types::Trit;

use crate::sponge::{check_bounds, Sponge, SpongeError, SpongeResult};
use crate::{HASH_LENGTH, STATE_LENGTH};

const TRUTH_TABLE: [Trit; 11] = [1, 0, -1, 2, 1, -1, 0, 2, -1, 1, 0];

/// The native ternary sponge.
///
/// The state is 729 trits. Absorb and squeeze only touch the first 243
/// (the rate); the remaining 486 trits are the hidden capacity.
#[derive(Clone)]
pub struct Curl {
    rounds: usize,
    state: [Trit; STATE_LENGTH],
}

impl Curl {
    /// Number of rounds used for transaction hashing.
    pub const DEFAULT_ROUNDS: usize = 81;

    /// Create a Curl sponge with 27 or 81 rounds.
    pub fn new(rounds: usize) -> SpongeResult<Self> {
        if rounds != 27 && rounds != 81 {
            return Err(SpongeError::IllegalRounds(rounds));
        }
        Ok(Self::with_rounds(rounds))
    }

    pub(crate) fn with_rounds(rounds: usize) -> Self {
        debug_assert!(rounds == 27 || rounds == 81);
        Self {
            rounds,
            state: [0; STATE_LENGTH],
        }
    }

    /// Number of rounds per transform.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The rate portion of the state.
    pub fn rate(&self) -> &[Trit] {
        &self.state[..HASH_LENGTH]
    }

    fn transform(&mut self) {
        let mut index = 0;
        for _ in 0..self.rounds {
            let copy = self.state;
            for slot in self.state.iter_mut() {
                let last = copy[index];
                index = if index < 365 { index + 364 } else { index - 365 };
                let next = copy[index] << 2;
                *slot = TRUTH_TABLE[(last + next + 5) as usize];
            }
        }
    }
}

impl Default for Curl {
    fn default() -> Self {
        Self::with_rounds(Self::DEFAULT_ROUNDS)
    }
}

impl Sponge for Curl {
    fn reset(&mut self) {
        self.state = [0; STATE_LENGTH];
    }

    fn absorb(&mut self, trits: &[Trit], mut offset: usize, mut length: usize) -> SpongeResult<()> {
        check_bounds(trits.len(), offset, length)?;
        loop {
            let limit = length.min(HASH_LENGTH);
            self.state[..limit].copy_from_slice(&trits[offset..offset + limit]);
            self.transform();
            offset += limit;
            length -= limit;
            if length == 0 {
                return Ok(());
            }
        }
    }

    fn squeeze(&mut self, trits: &mut [Trit], mut offset: usize, mut length: usize) -> SpongeResult<()> {
        check_bounds(trits.len(), offset, length)?;
        loop {
            let limit = length.min(HASH_LENGTH);
            trits[offset..offset + limit].copy_from_slice(&self.state[..limit]);
            self.transform();
            offset += limit;
            length -= limit;
            if length == 0 {
                return Ok(());
            }
        }
    }
}

impl std::fmt::Debug for Curl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Curl(rounds={})", self.rounds)
    }
}

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::components::Guid;

/// Create a deterministic StdRng from a u64 seed.
/// Every scene owns one; all guids it hands out flow through it.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draw a fresh guid. Zero is reserved and never returned.
pub fn next_guid(rng: &mut StdRng) -> Guid {
    loop {
        let raw: u64 = rng.random();
        if raw != 0 {
            return Guid(raw);
        }
    }
}

//! Randomness seams for the reward cascade.
//!
//! The cascade itself is deterministic; all chance flows through an
//! injectable [`RandomSource`] so tests and replays can pin exact draws.
//! Production sessions use [`SessionRng`], a bundle of per-domain streams
//! derived from a single user-visible seed, so draws in one domain never
//! shift the sequence observed by another.

use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sha2::Sha256;
use std::collections::VecDeque;
use thiserror::Error;

/// Error raised when an injected random generator cannot produce a draw.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("random source unavailable: {reason}")]
pub struct RandomSourceError {
    pub reason: &'static str,
}

/// Uniform unit-interval generator injected into the cascade.
///
/// Implementations may fail; the cascade treats a failed draw as "no drop"
/// rather than failing the whole invocation.
pub trait RandomSource {
    /// Produce one uniform value in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`RandomSourceError`] when the underlying generator is
    /// exhausted or otherwise unavailable.
    fn next_unit(&mut self) -> Result<f64, RandomSourceError>;
}

impl<R: Rng> RandomSource for R {
    fn next_unit(&mut self) -> Result<f64, RandomSourceError> {
        Ok(self.gen::<f64>())
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// Deterministic bundle of RNG streams segregated by cascade domain.
///
/// The drop roll draws exactly once per correct answer regardless of
/// whether loot generation follows, keeping drop outcomes stable for a
/// given seed and answer sequence.
#[derive(Debug, Clone)]
pub struct SessionRng {
    drop_roll: CountingRng<SmallRng>,
    loot: CountingRng<SmallRng>,
}

impl SessionRng {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            drop_roll: CountingRng::new(derive_stream_seed(seed, b"drop_roll")),
            loot: CountingRng::new(derive_stream_seed(seed, b"loot")),
        }
    }

    /// Access the drop-roll RNG stream.
    pub fn drop_roll(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.drop_roll
    }

    /// Access the loot-generation RNG stream.
    pub fn loot(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.loot
    }

    /// Borrow both streams at once for a cascade invocation.
    pub fn streams(&mut self) -> (&mut dyn RandomSource, &mut dyn RandomSource) {
        (&mut self.drop_roll, &mut self.loot)
    }
}

pub(crate) fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes())
        .expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Replay source yielding a fixed sequence of unit draws.
///
/// Fails once the sequence is exhausted, which doubles as the degraded-RNG
/// path in tests.
#[derive(Debug, Clone, Default)]
pub struct UnitSequence {
    draws: VecDeque<f64>,
}

impl UnitSequence {
    #[must_use]
    pub fn new(draws: &[f64]) -> Self {
        Self {
            draws: draws.iter().copied().collect(),
        }
    }

    /// Number of draws remaining before the source reports exhaustion.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for UnitSequence {
    fn next_unit(&mut self) -> Result<f64, RandomSourceError> {
        self.draws.pop_front().ok_or(RandomSourceError {
            reason: "unit sequence exhausted",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn session_rng_uses_domain_hmac() {
        let seed = 0xFEED_CAFE_u64;
        let mut bundle = SessionRng::from_user_seed(seed);

        let mut expected = SmallRng::seed_from_u64(derive_stream_seed(seed, b"drop_roll"));
        assert_eq!(bundle.drop_roll().next_u32(), expected.next_u32());
        assert_eq!(bundle.drop_roll().draws(), 1);

        assert_ne!(
            derive_stream_seed(seed, b"drop_roll"),
            derive_stream_seed(seed, b"loot"),
            "domain tags must derive distinct seeds"
        );
    }

    #[test]
    fn rng_streams_produce_unit_interval_draws() {
        let mut bundle = SessionRng::from_user_seed(7);
        for _ in 0..64 {
            let value = bundle.drop_roll().next_unit().expect("rng draw");
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn any_rng_core_works_as_a_random_source() {
        use rand_chacha::ChaCha20Rng;

        let mut a = ChaCha20Rng::seed_from_u64(99);
        let mut b = ChaCha20Rng::seed_from_u64(99);
        for _ in 0..16 {
            let x = a.next_unit().expect("infallible rng");
            let y = b.next_unit().expect("infallible rng");
            assert!((x - y).abs() < f64::EPSILON);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn unit_sequence_replays_then_fails() {
        let mut source = UnitSequence::new(&[0.25, 0.75]);
        assert!((source.next_unit().unwrap() - 0.25).abs() < f64::EPSILON);
        assert!((source.next_unit().unwrap() - 0.75).abs() < f64::EPSILON);
        assert!(source.next_unit().is_err());
        assert_eq!(source.remaining(), 0);
    }
}

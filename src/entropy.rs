//! Randomness source for task synthesis.
//!
//! Everything that draws random numbers goes through the narrow `Entropy`
//! trait. Any `rand` RNG implements it; requests build a `ChaCha8Rng`, seeded
//! when the client asks for a reproducible round.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait Entropy {
  /// Uniform float in [0, 1).
  fn next_float(&mut self) -> f64;

  /// Uniform integer in [min, max]. `max <= min` yields `min`.
  fn next_int(&mut self, min: i64, max: i64) -> i64 {
    if max <= min {
      return min;
    }
    let span = (max - min) as f64 + 1.0;
    let offset = (self.next_float() * span).floor() as i64;
    min + offset.clamp(0, max - min)
  }

  /// Uniform index into a collection of `len` items (`len` > 0).
  fn next_index(&mut self, len: usize) -> usize {
    self.next_int(0, len.saturating_sub(1) as i64) as usize
  }

  /// True with probability `p`.
  fn chance(&mut self, p: f64) -> bool {
    self.next_float() < p
  }
}

impl<R: RngCore> Entropy for R {
  fn next_float(&mut self) -> f64 {
    self.gen::<f64>()
  }

  fn next_int(&mut self, min: i64, max: i64) -> i64 {
    if max <= min { min } else { self.gen_range(min..=max) }
  }
}

/// RNG for one round: deterministic for a given seed, OS entropy otherwise.
pub fn round_rng(seed: Option<u64>) -> ChaCha8Rng {
  match seed {
    Some(s) => ChaCha8Rng::seed_from_u64(s),
    None => ChaCha8Rng::from_entropy(),
  }
}

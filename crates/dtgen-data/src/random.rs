//! Seeded random source and typed random draws.
//!
//! A [`RandomSource`] is a ChaCha8 stream keyed by the SHA-256 of a seed
//! string. Same seed -> same values, always. Generators never own one; the
//! caller passes `&mut RandomSource` into every draw so a whole run shares a
//! single stream and stays reproducible.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use crate::error::GeneratorError;
use crate::raw::{MAX_SAFE_INTEGER, MAX_STRING_LENGTH, MIN_SAFE_INTEGER};

/// Printable ASCII range used for random string characters.
const FIRST_PRINTABLE: u8 = b' ';
const LAST_PRINTABLE: u8 = b'~';

/// Deterministic pseudo-random stream with an inspectable seed.
#[derive(Debug)]
pub struct RandomSource {
    seed: String,
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// Create a source from an optional seed.
    ///
    /// Without a seed the current UTC timestamp is used; [`Self::seed`] then
    /// reports it so the run can be reproduced later.
    pub fn new(seed: Option<&str>) -> Self {
        let seed = match seed {
            Some(s) => s.to_string(),
            None => chrono::Utc::now().to_rfc3339(),
        };
        let rng = ChaCha8Rng::from_seed(digest(&seed));
        Self { seed, rng }
    }

    /// Independent stream for one stage of a seeded run.
    pub fn stage(seed: &str, stage_id: u64) -> Self {
        Self::new(Some(&format!("{seed}/{stage_id}")))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Uniform draw in `[0, 1)`.
    pub fn generate(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform draw in `0..=upper`.
    pub fn below_or_equal(&mut self, upper: u64) -> u64 {
        self.rng.gen_range(0..=upper)
    }

    /// Fresh 32 bytes from the stream, for seeding derived generators.
    pub fn seed_bytes(&mut self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        self.rng.fill_bytes(&mut bytes);
        bytes
    }
}

fn digest(seed: &str) -> [u8; 32] {
    Sha256::digest(seed.as_bytes()).into()
}

// ── Typed draws ──────────────────────────────────────────────────────

/// Random integers inside an absolute domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomLong {
    absolute_min: i64,
    absolute_max: i64,
}

impl RandomLong {
    /// Integers every consumer represents exactly.
    pub const SAFE_INTEGERS: Self = Self {
        absolute_min: MIN_SAFE_INTEGER,
        absolute_max: MAX_SAFE_INTEGER,
    };

    /// Every length a generated string may have.
    pub const STRING_LENGTHS: Self = Self {
        absolute_min: 0,
        absolute_max: MAX_STRING_LENGTH,
    };

    pub fn new(absolute_min: i64, absolute_max: i64) -> Result<Self, GeneratorError> {
        if absolute_min > absolute_max {
            return Err(GeneratorError::InvertedRange {
                min: absolute_min.to_string(),
                max: absolute_max.to_string(),
            });
        }
        Ok(Self {
            absolute_min,
            absolute_max,
        })
    }

    pub fn absolute_min(&self) -> i64 {
        self.absolute_min
    }

    pub fn absolute_max(&self) -> i64 {
        self.absolute_max
    }

    /// Uniform integer in `[min, max]`. Swapped bounds are reordered.
    pub fn between(&self, rng: &mut RandomSource, min: i64, max: i64) -> i64 {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let span = (max as i128 - min as i128) as u64;
        (min as i128 + rng.below_or_equal(span) as i128) as i64
    }

    /// Uniform integer in `[absolute_min, value - delta]`.
    pub fn before(&self, rng: &mut RandomSource, value: i64, delta: i64) -> i64 {
        let upper = value.saturating_sub(delta).max(self.absolute_min);
        self.between(rng, self.absolute_min, upper)
    }

    /// Uniform integer in `[value + delta, absolute_max]`.
    pub fn after(&self, rng: &mut RandomSource, value: i64, delta: i64) -> i64 {
        let lower = value.saturating_add(delta).min(self.absolute_max);
        self.between(rng, lower, self.absolute_max)
    }
}

/// Random doubles inside an absolute domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomDouble {
    absolute_min: f64,
    absolute_max: f64,
}

impl RandomDouble {
    pub const SAFE_INTEGERS: Self = Self {
        absolute_min: MIN_SAFE_INTEGER as f64,
        absolute_max: MAX_SAFE_INTEGER as f64,
    };

    pub fn new(absolute_min: f64, absolute_max: f64) -> Result<Self, GeneratorError> {
        if absolute_min.is_nan() {
            return Err(GeneratorError::NotANumber("minimum"));
        }
        if absolute_max.is_nan() {
            return Err(GeneratorError::NotANumber("maximum"));
        }
        if absolute_min > absolute_max {
            return Err(GeneratorError::InvertedRange {
                min: absolute_min.to_string(),
                max: absolute_max.to_string(),
            });
        }
        Ok(Self {
            absolute_min,
            absolute_max,
        })
    }

    pub fn absolute_min(&self) -> f64 {
        self.absolute_min
    }

    pub fn absolute_max(&self) -> f64 {
        self.absolute_max
    }

    /// Uniform double in `[min, max)`; returns `min` when the range is empty.
    pub fn between(&self, rng: &mut RandomSource, min: f64, max: f64) -> f64 {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        min + rng.generate() * (max - min)
    }

    pub fn before(&self, rng: &mut RandomSource, value: f64, delta: f64) -> f64 {
        let upper = (value - delta).max(self.absolute_min);
        self.between(rng, self.absolute_min, upper)
    }

    pub fn after(&self, rng: &mut RandomSource, value: f64, delta: f64) -> f64 {
        let lower = (value + delta).min(self.absolute_max);
        self.between(rng, lower, self.absolute_max)
    }
}

/// Random printable-ASCII strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomString;

impl RandomString {
    /// String of exactly `length` characters.
    pub fn exactly(&self, rng: &mut RandomSource, length: usize) -> String {
        let span = u64::from(LAST_PRINTABLE - FIRST_PRINTABLE);
        (0..length)
            .map(|_| char::from(FIRST_PRINTABLE + rng.below_or_equal(span) as u8))
            .collect()
    }

    /// String whose length is uniform in `[min_len, max_len]`.
    pub fn between(&self, rng: &mut RandomSource, min_len: usize, max_len: usize) -> String {
        let (min_len, max_len) = if min_len <= max_len {
            (min_len, max_len)
        } else {
            (max_len, min_len)
        };
        let length = min_len + rng.below_or_equal((max_len - min_len) as u64) as usize;
        self.exactly(rng, length)
    }
}

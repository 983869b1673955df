use crate::error::GeneratorError;
use crate::random::{RandomDouble, RandomLong, RandomSource};

use super::RangeDomain;

/// Largest integer every consumer (JSON, JavaScript UIs) represents exactly.
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;
pub const MIN_SAFE_INTEGER: i64 = -MAX_SAFE_INTEGER;

pub const DEFAULT_DOUBLE_DELTA: f64 = 0.01;

/// Integers in `[MIN_SAFE_INTEGER, MAX_SAFE_INTEGER]`, stepping by 1.
#[derive(Debug, Clone, Copy)]
pub struct LongDomain {
    random: RandomLong,
}

impl Default for LongDomain {
    fn default() -> Self {
        Self {
            random: RandomLong::SAFE_INTEGERS,
        }
    }
}

impl RangeDomain for LongDomain {
    type Value = i64;

    fn absolute_min(&self) -> i64 {
        self.random.absolute_min()
    }

    fn absolute_max(&self) -> i64 {
        self.random.absolute_max()
    }

    fn zero(&self) -> i64 {
        0
    }

    fn step_up(&self, value: i64) -> i64 {
        value.saturating_add(1).min(self.absolute_max())
    }

    fn step_down(&self, value: i64) -> i64 {
        value.saturating_sub(1).max(self.absolute_min())
    }

    fn has_value_between(&self, min: i64, max: i64) -> bool {
        max - min > 1
    }

    fn median(&self, min: i64, max: i64) -> i64 {
        min + (max - min) / 2
    }

    fn random_in(&self, rng: &mut RandomSource, min: i64, max: i64) -> i64 {
        self.random.between(rng, min, max)
    }
}

/// Doubles in the safe-integer range, stepping by a positive delta.
#[derive(Debug, Clone, Copy)]
pub struct DoubleDomain {
    random: RandomDouble,
    delta: f64,
}

impl DoubleDomain {
    pub fn with_delta(delta: f64) -> Result<Self, GeneratorError> {
        if !(delta > 0.0) {
            return Err(GeneratorError::NonPositiveDelta(delta));
        }
        Ok(Self {
            random: RandomDouble::SAFE_INTEGERS,
            delta,
        })
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }
}

impl Default for DoubleDomain {
    fn default() -> Self {
        Self {
            random: RandomDouble::SAFE_INTEGERS,
            delta: DEFAULT_DOUBLE_DELTA,
        }
    }
}

impl RangeDomain for DoubleDomain {
    type Value = f64;

    fn absolute_min(&self) -> f64 {
        self.random.absolute_min()
    }

    fn absolute_max(&self) -> f64 {
        self.random.absolute_max()
    }

    fn zero(&self) -> f64 {
        0.0
    }

    fn step_up(&self, value: f64) -> f64 {
        (value + self.delta).min(self.absolute_max())
    }

    fn step_down(&self, value: f64) -> f64 {
        (value - self.delta).max(self.absolute_min())
    }

    fn has_value_between(&self, min: f64, max: f64) -> bool {
        max - min > self.delta
    }

    fn median(&self, min: f64, max: f64) -> f64 {
        min + (max - min) / 2.0
    }

    fn random_in(&self, rng: &mut RandomSource, min: f64, max: f64) -> f64 {
        self.random.between(rng, min, max)
    }
}

use dtgen_ir::DataValue;

use crate::error::GeneratorError;
use crate::random::{RandomLong, RandomSource, RandomString};

use super::{RangeDomain, RangeGenerator, RawDataGenerator};

/// Longest string the generators ever build.
pub const MAX_STRING_LENGTH: i64 = 32_767;
/// Ceiling for `random_above_max` when the maximum is a typical field length.
pub const USUAL_MAX_STRING_LENGTH: i64 = 255;

/// String lengths in `[0, MAX_STRING_LENGTH]`.
#[derive(Debug, Clone, Copy)]
pub struct LengthDomain {
    random: RandomLong,
}

impl Default for LengthDomain {
    fn default() -> Self {
        Self {
            random: RandomLong::STRING_LENGTHS,
        }
    }
}

impl RangeDomain for LengthDomain {
    type Value = i64;

    fn absolute_min(&self) -> i64 {
        0
    }

    fn absolute_max(&self) -> i64 {
        MAX_STRING_LENGTH
    }

    fn zero(&self) -> i64 {
        0
    }

    fn step_up(&self, value: i64) -> i64 {
        (value + 1).min(MAX_STRING_LENGTH)
    }

    fn step_down(&self, value: i64) -> i64 {
        (value - 1).max(0)
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

/// Boundary generator for strings: the walk runs over lengths and every
/// position is filled with random printable characters.
#[derive(Debug, Clone)]
pub struct StringGenerator {
    lengths: RangeGenerator<LengthDomain>,
    chars: RandomString,
}

impl StringGenerator {
    pub fn new(min_length: Option<usize>, max_length: Option<usize>) -> Result<Self, GeneratorError> {
        let lengths = RangeGenerator::with_bounds(
            min_length.map(length_value),
            max_length.map(length_value),
        )?;
        Ok(Self {
            lengths,
            chars: RandomString,
        })
    }

    pub fn min_length(&self) -> usize {
        self.lengths.lower() as usize
    }

    pub fn max_length(&self) -> usize {
        self.lengths.upper() as usize
    }

    fn fill(&self, rng: &mut RandomSource, length: i64) -> DataValue {
        DataValue::String(self.chars.exactly(rng, length.max(0) as usize))
    }
}

fn length_value(length: usize) -> i64 {
    i64::try_from(length).unwrap_or(i64::MAX)
}

impl RawDataGenerator for StringGenerator {
    fn lowest(&self, rng: &mut RandomSource) -> DataValue {
        self.fill(rng, self.lengths.lowest_value())
    }

    fn random_below_min(&self, rng: &mut RandomSource) -> DataValue {
        let length = self.lengths.random_below_min_value(rng);
        self.fill(rng, length)
    }

    fn just_below_min(&self, rng: &mut RandomSource) -> DataValue {
        self.fill(rng, self.lengths.just_below_min_value())
    }

    fn min(&self, rng: &mut RandomSource) -> DataValue {
        self.fill(rng, self.lengths.min_value())
    }

    fn just_above_min(&self, rng: &mut RandomSource) -> DataValue {
        self.fill(rng, self.lengths.just_above_min_value())
    }

    fn zero(&self, rng: &mut RandomSource) -> DataValue {
        self.fill(rng, self.lengths.zero_value())
    }

    fn median(&self, rng: &mut RandomSource) -> DataValue {
        self.fill(rng, self.lengths.median_value())
    }

    fn random_between_min_and_max(&self, rng: &mut RandomSource) -> DataValue {
        let length = self.lengths.random_between_value(rng);
        self.fill(rng, length)
    }

    fn just_below_max(&self, rng: &mut RandomSource) -> DataValue {
        self.fill(rng, self.lengths.just_below_max_value())
    }

    fn max(&self, rng: &mut RandomSource) -> DataValue {
        self.fill(rng, self.lengths.max_value())
    }

    fn just_above_max(&self, rng: &mut RandomSource) -> DataValue {
        self.fill(rng, self.lengths.just_above_max_value())
    }

    /// Stays under [`USUAL_MAX_STRING_LENGTH`] unless the maximum already reaches it.
    fn random_above_max(&self, rng: &mut RandomSource) -> DataValue {
        if !self.lengths.space_above_max() {
            return self.fill(rng, self.lengths.max_value());
        }
        let lower = self.lengths.just_above_max_value();
        let upper = if lower < USUAL_MAX_STRING_LENGTH {
            USUAL_MAX_STRING_LENGTH
        } else {
            MAX_STRING_LENGTH
        };
        let length = self.lengths.domain().random_in(rng, lower, upper);
        self.fill(rng, length)
    }

    fn greatest(&self, rng: &mut RandomSource) -> DataValue {
        self.fill(rng, self.lengths.greatest_value())
    }

    fn has_space_below_min(&self) -> bool {
        self.lengths.space_below_min()
    }

    fn has_space_above_max(&self) -> bool {
        self.lengths.space_above_max()
    }

    fn has_space_between(&self) -> bool {
        self.lengths.space_between()
    }

    fn zero_in_range(&self) -> bool {
        self.lengths.lower() == 0
    }
}

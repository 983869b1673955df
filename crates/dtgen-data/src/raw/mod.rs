//! Raw boundary generators.
//!
//! Every ordered type answers the same 13 positions along its domain:
//!
//! ```text
//! lowest .. random_below_min .. just_below_min | min .. just_above_min .. median
//!   .. random_between .. just_below_max .. max | just_above_max .. random_above_max .. greatest
//! ```
//!
//! The walk is written once in [`RangeGenerator`]; a [`RangeDomain`] supplies
//! the type-specific pieces (absolute bounds, the delta step, medians and
//! uniform draws).

mod numeric;
mod string;
mod temporal;

pub use numeric::{DoubleDomain, LongDomain, DEFAULT_DOUBLE_DELTA, MAX_SAFE_INTEGER, MIN_SAFE_INTEGER};
pub use string::{LengthDomain, StringGenerator, MAX_STRING_LENGTH, USUAL_MAX_STRING_LENGTH};
pub use temporal::{DateDomain, DateTimeDomain, TimeDomain};

use std::fmt;

use dtgen_ir::{Boundary, DataValue};

use crate::error::GeneratorError;
use crate::random::RandomSource;

pub type LongGenerator = RangeGenerator<LongDomain>;
pub type DoubleGenerator = RangeGenerator<DoubleDomain>;
pub type DateGenerator = RangeGenerator<DateDomain>;
pub type TimeGenerator = RangeGenerator<TimeDomain>;
pub type DateTimeGenerator = RangeGenerator<DateTimeDomain>;

/// Type-specific arithmetic over an ordered, bounded domain.
pub trait RangeDomain {
    type Value: Copy + PartialOrd + fmt::Debug + fmt::Display + Into<DataValue>;

    fn absolute_min(&self) -> Self::Value;
    fn absolute_max(&self) -> Self::Value;
    fn zero(&self) -> Self::Value;

    /// `value + delta`, saturating at the absolute maximum.
    fn step_up(&self, value: Self::Value) -> Self::Value;
    /// `value - delta`, saturating at the absolute minimum.
    fn step_down(&self, value: Self::Value) -> Self::Value;

    /// Whether `max - min > delta`, i.e. a value strictly inside exists.
    fn has_value_between(&self, min: Self::Value, max: Self::Value) -> bool;

    fn median(&self, min: Self::Value, max: Self::Value) -> Self::Value;

    /// Uniform draw in `[min, max]`.
    fn random_in(&self, rng: &mut RandomSource, min: Self::Value, max: Self::Value)
        -> Self::Value;
}

/// Object-safe view of a boundary generator, producing [`DataValue`]s.
///
/// Every position takes the random source, even the deterministic ones, so
/// string generators can fill characters for any length.
pub trait RawDataGenerator: Send + Sync {
    fn lowest(&self, rng: &mut RandomSource) -> DataValue;
    fn random_below_min(&self, rng: &mut RandomSource) -> DataValue;
    fn just_below_min(&self, rng: &mut RandomSource) -> DataValue;
    fn min(&self, rng: &mut RandomSource) -> DataValue;
    fn just_above_min(&self, rng: &mut RandomSource) -> DataValue;
    fn zero(&self, rng: &mut RandomSource) -> DataValue;
    fn median(&self, rng: &mut RandomSource) -> DataValue;
    fn random_between_min_and_max(&self, rng: &mut RandomSource) -> DataValue;
    fn just_below_max(&self, rng: &mut RandomSource) -> DataValue;
    fn max(&self, rng: &mut RandomSource) -> DataValue;
    fn just_above_max(&self, rng: &mut RandomSource) -> DataValue;
    fn random_above_max(&self, rng: &mut RandomSource) -> DataValue;
    fn greatest(&self, rng: &mut RandomSource) -> DataValue;

    fn has_space_below_min(&self) -> bool;
    fn has_space_above_max(&self) -> bool;
    fn has_space_between(&self) -> bool;
    /// Whether the type's zero lies inside `[min, max]`.
    fn zero_in_range(&self) -> bool;

    fn generate(&self, boundary: Boundary, rng: &mut RandomSource) -> DataValue {
        match boundary {
            Boundary::Lowest => self.lowest(rng),
            Boundary::RandomBelowMin => self.random_below_min(rng),
            Boundary::JustBelowMin => self.just_below_min(rng),
            Boundary::Min => self.min(rng),
            Boundary::JustAboveMin => self.just_above_min(rng),
            Boundary::Zero => self.zero(rng),
            Boundary::Median => self.median(rng),
            Boundary::RandomBetweenMinAndMax => self.random_between_min_and_max(rng),
            Boundary::JustBelowMax => self.just_below_max(rng),
            Boundary::Max => self.max(rng),
            Boundary::JustAboveMax => self.just_above_max(rng),
            Boundary::RandomAboveMax => self.random_above_max(rng),
            Boundary::Greatest => self.greatest(rng),
        }
    }
}

/// The 13-position walk over `[min, max]` inside a domain.
///
/// Positions that need room that does not exist fall back to the nearest
/// bound: below-min positions to `min`, above-max positions to `max`, and
/// in-between positions to `min` (or `max` for `just_below_max`).
#[derive(Debug, Clone)]
pub struct RangeGenerator<D: RangeDomain> {
    domain: D,
    min: D::Value,
    max: D::Value,
}

impl<D: RangeDomain + Default> RangeGenerator<D> {
    /// Generator over the default domain; absent bounds take the absolute ones.
    pub fn with_bounds(min: Option<D::Value>, max: Option<D::Value>) -> Result<Self, GeneratorError> {
        Self::new(D::default(), min, max)
    }
}

impl<D: RangeDomain> RangeGenerator<D> {
    pub fn new(domain: D, min: Option<D::Value>, max: Option<D::Value>) -> Result<Self, GeneratorError> {
        let min = min.unwrap_or_else(|| domain.absolute_min());
        let max = max.unwrap_or_else(|| domain.absolute_max());
        check_in_domain(&domain, "minimum", min)?;
        check_in_domain(&domain, "maximum", max)?;
        if min > max {
            return Err(GeneratorError::InvertedRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self { domain, min, max })
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn lower(&self) -> D::Value {
        self.min
    }

    pub fn upper(&self) -> D::Value {
        self.max
    }

    pub fn space_below_min(&self) -> bool {
        self.min > self.domain.absolute_min()
    }

    pub fn space_above_max(&self) -> bool {
        self.max < self.domain.absolute_max()
    }

    pub fn space_between(&self) -> bool {
        self.domain.has_value_between(self.min, self.max)
    }

    pub fn lowest_value(&self) -> D::Value {
        self.domain.absolute_min()
    }

    pub fn random_below_min_value(&self, rng: &mut RandomSource) -> D::Value {
        if !self.space_below_min() {
            return self.min;
        }
        let upper = self.domain.step_down(self.min);
        self.domain.random_in(rng, self.domain.absolute_min(), upper)
    }

    pub fn just_below_min_value(&self) -> D::Value {
        if self.space_below_min() {
            self.domain.step_down(self.min)
        } else {
            self.min
        }
    }

    pub fn min_value(&self) -> D::Value {
        self.min
    }

    pub fn just_above_min_value(&self) -> D::Value {
        if self.space_between() {
            self.domain.step_up(self.min)
        } else {
            self.min
        }
    }

    pub fn zero_value(&self) -> D::Value {
        if self.zero_within() {
            self.domain.zero()
        } else {
            self.min
        }
    }

    pub fn median_value(&self) -> D::Value {
        self.domain.median(self.min, self.max)
    }

    pub fn random_between_value(&self, rng: &mut RandomSource) -> D::Value {
        if !self.space_between() {
            return self.min;
        }
        let lower = self.domain.step_up(self.min);
        let upper = self.domain.step_down(self.max);
        self.domain.random_in(rng, lower, upper)
    }

    pub fn just_below_max_value(&self) -> D::Value {
        if self.space_between() {
            self.domain.step_down(self.max)
        } else {
            self.max
        }
    }

    pub fn max_value(&self) -> D::Value {
        self.max
    }

    pub fn just_above_max_value(&self) -> D::Value {
        if self.space_above_max() {
            self.domain.step_up(self.max)
        } else {
            self.max
        }
    }

    pub fn random_above_max_value(&self, rng: &mut RandomSource) -> D::Value {
        if !self.space_above_max() {
            return self.max;
        }
        let lower = self.domain.step_up(self.max);
        self.domain.random_in(rng, lower, self.domain.absolute_max())
    }

    pub fn greatest_value(&self) -> D::Value {
        self.domain.absolute_max()
    }

    fn zero_within(&self) -> bool {
        let zero = self.domain.zero();
        self.min <= zero && zero <= self.max
    }
}

fn check_in_domain<D: RangeDomain>(domain: &D, bound: &'static str, value: D::Value) -> Result<(), GeneratorError> {
    // Written as a negated conjunction so NaN is rejected too.
    if !(value >= domain.absolute_min() && value <= domain.absolute_max()) {
        return Err(GeneratorError::OutOfDomain {
            bound,
            value: value.to_string(),
            absolute_min: domain.absolute_min().to_string(),
            absolute_max: domain.absolute_max().to_string(),
        });
    }
    Ok(())
}

impl<D> RawDataGenerator for RangeGenerator<D>
where
    D: RangeDomain + Send + Sync,
    D::Value: Send + Sync,
{
    fn lowest(&self, _rng: &mut RandomSource) -> DataValue {
        self.lowest_value().into()
    }

    fn random_below_min(&self, rng: &mut RandomSource) -> DataValue {
        self.random_below_min_value(rng).into()
    }

    fn just_below_min(&self, _rng: &mut RandomSource) -> DataValue {
        self.just_below_min_value().into()
    }

    fn min(&self, _rng: &mut RandomSource) -> DataValue {
        self.min_value().into()
    }

    fn just_above_min(&self, _rng: &mut RandomSource) -> DataValue {
        self.just_above_min_value().into()
    }

    fn zero(&self, _rng: &mut RandomSource) -> DataValue {
        self.zero_value().into()
    }

    fn median(&self, _rng: &mut RandomSource) -> DataValue {
        self.median_value().into()
    }

    fn random_between_min_and_max(&self, rng: &mut RandomSource) -> DataValue {
        self.random_between_value(rng).into()
    }

    fn just_below_max(&self, _rng: &mut RandomSource) -> DataValue {
        self.just_below_max_value().into()
    }

    fn max(&self, _rng: &mut RandomSource) -> DataValue {
        self.max_value().into()
    }

    fn just_above_max(&self, _rng: &mut RandomSource) -> DataValue {
        self.just_above_max_value().into()
    }

    fn random_above_max(&self, rng: &mut RandomSource) -> DataValue {
        self.random_above_max_value(rng).into()
    }

    fn greatest(&self, _rng: &mut RandomSource) -> DataValue {
        self.greatest_value().into()
    }

    fn has_space_below_min(&self) -> bool {
        self.space_below_min()
    }

    fn has_space_above_max(&self) -> bool {
        self.space_above_max()
    }

    fn has_space_between(&self) -> bool {
        self.space_between()
    }

    fn zero_in_range(&self) -> bool {
        self.zero_within()
    }
}

/// Booleans have no ordered range, only a random pick and a negation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanGenerator;

impl BooleanGenerator {
    pub fn random(&self, rng: &mut RandomSource) -> bool {
        rng.generate() < 0.5
    }

    pub fn wrong(&self, expected: bool) -> bool {
        !expected
    }
}

//! Data generator dispatch: turns an (element, data test case) pair into a
//! [`DataOutcome`] by routing to the raw, format, set or computation generator.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use dtgen_ir::{
    is_compatible, CandidateSource, ComputationCase, DataOutcome, DataTestCase, DataValue, FormatCase,
    GapReason, RequiredCase, SetCase, UiElementSpec, ValueType,
};
use tracing::warn;

use crate::cache::{QueryCache, Queryable};
use crate::error::{GeneratorError, QueryError};
use crate::pattern::{RegexGenerator, DEFAULT_INVALID_TRIES};
use crate::random::{RandomSource, RandomString};
use crate::raw::{
    BooleanGenerator, DateDomain, DateGenerator, DateTimeDomain, DateTimeGenerator, DoubleDomain, LongGenerator,
    RangeDomain, RangeGenerator, RawDataGenerator, StringGenerator, TimeDomain, TimeGenerator, DEFAULT_DOUBLE_DELTA,
    MAX_SAFE_INTEGER,
};
use crate::set::{ListBasedGenerator, QueryBasedGenerator, DEFAULT_NOT_IN_SET_TRIES};

/// Tuning knobs shared by every generator of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    /// Length bounds for strings of elements that declare no length range.
    pub random_min_string_size: usize,
    pub random_max_string_size: usize,
    /// Random strings tried before the format generator negates the expression.
    pub random_tries_to_invalid_value: usize,
    pub max_not_in_set_tries: usize,
    pub double_delta: f64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            random_min_string_size: 0,
            random_max_string_size: 500,
            random_tries_to_invalid_value: DEFAULT_INVALID_TRIES,
            max_not_in_set_tries: DEFAULT_NOT_IN_SET_TRIES,
            double_delta: DEFAULT_DOUBLE_DELTA,
        }
    }
}

/// Candidate set of an element.
#[derive(Debug, Clone)]
pub enum SetSource {
    List(ListBasedGenerator),
    Query(QueryBasedGenerator),
}

/// Every generator an element needs, built once per run.
pub struct ElementProfile {
    spec: UiElementSpec,
    raw: Option<Box<dyn RawDataGenerator>>,
    format: Option<RegexGenerator>,
    set: Option<SetSource>,
    problems: Vec<String>,
}

impl ElementProfile {
    pub fn spec(&self) -> &UiElementSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn raw(&self) -> Option<&dyn RawDataGenerator> {
        self.raw.as_deref()
    }

    pub fn format(&self) -> Option<&RegexGenerator> {
        self.format.as_ref()
    }

    pub fn set(&self) -> Option<&SetSource> {
        self.set.as_ref()
    }

    /// Configuration problems found while building the generators.
    pub fn problems(&self) -> &[String] {
        &self.problems
    }
}

impl std::fmt::Debug for ElementProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementProfile")
            .field("element", &self.spec.name)
            .field("raw", &self.raw.is_some())
            .field("format", &self.format)
            .field("set", &self.set)
            .field("problems", &self.problems)
            .finish()
    }
}

/// Routes data test cases to generators.
pub struct DataGenerator {
    options: GeneratorOptions,
    cache: Arc<QueryCache>,
    source: Option<Arc<dyn Queryable>>,
}

impl DataGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            cache: Arc::new(QueryCache::new()),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn Queryable>) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<QueryCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Build the generators for one element.
    ///
    /// A constraint that cannot be turned into a generator is recorded as a
    /// problem and leaves that generator out; the element still takes part.
    pub fn profile(&self, spec: &UiElementSpec) -> ElementProfile {
        let mut problems = Vec::new();

        let raw = match build_raw(spec, &self.options) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(element = %spec.name, error = %e, "range generator disabled");
                problems.push(format!("element '{}': {e}", spec.name));
                None
            }
        };

        let format = spec.format.as_deref().and_then(|pattern| {
            match RegexGenerator::new(pattern) {
                Ok(gen) => Some(
                    gen.with_random_lengths(self.options.random_min_string_size, self.options.random_max_string_size)
                        .with_invalid_tries(self.options.random_tries_to_invalid_value),
                ),
                Err(e) => {
                    warn!(element = %spec.name, error = %e, "format generator disabled");
                    problems.push(format!("element '{}': {e}", spec.name));
                    None
                }
            }
        });

        let set = match &spec.set {
            None => None,
            Some(CandidateSource::List(values)) => Some(SetSource::List(
                ListBasedGenerator::new(values.clone()).with_max_tries(self.options.max_not_in_set_tries),
            )),
            Some(CandidateSource::Query(query)) => match &self.source {
                Some(source) => Some(SetSource::Query(
                    QueryBasedGenerator::new(query, Arc::clone(&self.cache), Arc::clone(source))
                        .with_max_tries(self.options.max_not_in_set_tries),
                )),
                None => {
                    let e = QueryError::NoSource(query.clone());
                    warn!(element = %spec.name, error = %e, "set generator disabled");
                    problems.push(format!("element '{}': {e}", spec.name));
                    None
                }
            },
        };

        ElementProfile {
            spec: spec.clone(),
            raw,
            format,
            set,
            problems,
        }
    }

    /// Produce the outcome of one data test case for one element.
    ///
    /// Only a failing candidate query is an error; everything else is an
    /// outcome, including gaps.
    pub async fn generate(
        &self,
        profile: &ElementProfile,
        dtc: DataTestCase,
        rng: &mut RandomSource,
    ) -> Result<DataOutcome, QueryError> {
        let spec = profile.spec();
        if !is_compatible(spec.value_type, dtc) {
            return Ok(DataOutcome::NotApplicable);
        }
        let missing = DataOutcome::NoValue(GapReason::MissingConstraint);

        let outcome = match dtc {
            DataTestCase::Value(boundary) | DataTestCase::Length(boundary) => match profile.raw() {
                Some(raw) => DataOutcome::Value(raw.generate(boundary, rng)),
                None => missing,
            },
            DataTestCase::Format(case) => match profile.format() {
                None => missing,
                Some(gen) => match case {
                    FormatCase::Valid => gen
                        .valid(rng)
                        .map_or(DataOutcome::NoValue(GapReason::UnsupportedPattern), |s| {
                            DataOutcome::Value(s.into())
                        }),
                    FormatCase::Invalid => gen
                        .invalid(rng)
                        .map_or(DataOutcome::NoValue(GapReason::RegexNegationFailed), |s| {
                            DataOutcome::Value(s.into())
                        }),
                },
            },
            // Only values outside the set are drawn from the element's range.
            DataTestCase::Set(SetCase::NotInSet) => match (profile.set(), profile.raw()) {
                (Some(set), Some(raw)) => {
                    let value = match set {
                        SetSource::List(list) => list.not_in_set(raw, rng),
                        SetSource::Query(query) => query.not_in_set(raw, rng).await?,
                    };
                    value.map_or(
                        DataOutcome::NoValue(GapReason::RejectionSamplingExhausted),
                        DataOutcome::Value,
                    )
                }
                _ => missing,
            },
            DataTestCase::Set(case) => match profile.set() {
                Some(set) => {
                    let value = match set {
                        SetSource::List(list) => list.element(case, rng),
                        SetSource::Query(query) => query.element(case, rng).await?,
                    };
                    value.map_or(DataOutcome::NoValue(GapReason::SetTooSmall), DataOutcome::Value)
                }
                None => missing,
            },
            DataTestCase::Required(RequiredCase::Filled) => self.filled(profile, rng).await?,
            DataTestCase::Required(RequiredCase::NotFilled) => DataOutcome::Blank,
            DataTestCase::Computation(case) => match &spec.computed {
                None => missing,
                Some(expected) => match case {
                    ComputationCase::Right => DataOutcome::Value(expected.clone()),
                    ComputationCase::Wrong => DataOutcome::Value(wrong_value(expected, rng)),
                },
            },
        };
        Ok(outcome)
    }

    /// A value an element would accept, following constraint precedence.
    async fn filled(&self, profile: &ElementProfile, rng: &mut RandomSource) -> Result<DataOutcome, QueryError> {
        let spec = profile.spec();
        if let Some(expected) = &spec.computed {
            return Ok(DataOutcome::Value(expected.clone()));
        }
        if let Some(set) = profile.set() {
            let value = match set {
                SetSource::List(list) => list.random_element(rng),
                SetSource::Query(query) => query.random_element(rng).await?,
            };
            return Ok(value.map_or(DataOutcome::NoValue(GapReason::SetTooSmall), DataOutcome::Value));
        }
        if let Some(gen) = profile.format() {
            return Ok(gen
                .valid(rng)
                .map_or(DataOutcome::NoValue(GapReason::UnsupportedPattern), |s| {
                    DataOutcome::Value(s.into())
                }));
        }
        let outcome = match (profile.raw(), spec.value_type) {
            (Some(raw), ValueType::String) => non_empty_string(raw, rng),
            (Some(raw), _) => DataOutcome::Value(raw.random_between_min_and_max(rng)),
            (None, ValueType::Boolean) => DataOutcome::Value(BooleanGenerator.random(rng).into()),
            (None, _) => DataOutcome::NoValue(GapReason::MissingConstraint),
        };
        Ok(outcome)
    }
}

/// A filled string field holds at least one character; the longest allowed
/// length is used when the random draw came out empty.
fn non_empty_string(raw: &dyn RawDataGenerator, rng: &mut RandomSource) -> DataOutcome {
    let is_filled = |value: &DataValue| value.as_str().is_some_and(|s| !s.is_empty());
    let value = raw.random_between_min_and_max(rng);
    if is_filled(&value) {
        return DataOutcome::Value(value);
    }
    let longest = raw.max(rng);
    if is_filled(&longest) {
        DataOutcome::Value(longest)
    } else {
        DataOutcome::NoValue(GapReason::EmptyLengthRange)
    }
}

fn build_raw(
    spec: &UiElementSpec,
    options: &GeneratorOptions,
) -> Result<Option<Box<dyn RawDataGenerator>>, GeneratorError> {
    let vt = spec.value_type;
    let raw: Box<dyn RawDataGenerator> = match vt {
        ValueType::String => {
            let (min, max) = if spec.has_length_range() {
                (spec.min_length, spec.max_length)
            } else {
                (
                    Some(options.random_min_string_size),
                    Some(options.random_max_string_size),
                )
            };
            Box::new(StringGenerator::new(min, max)?)
        }
        ValueType::Integer => Box::new(LongGenerator::with_bounds(
            bound(&spec.min_value, "min_value", vt, DataValue::as_i64)?,
            bound(&spec.max_value, "max_value", vt, DataValue::as_i64)?,
        )?),
        ValueType::Double => Box::new(RangeGenerator::new(
            DoubleDomain::with_delta(options.double_delta)?,
            bound(&spec.min_value, "min_value", vt, DataValue::as_f64)?,
            bound(&spec.max_value, "max_value", vt, DataValue::as_f64)?,
        )?),
        ValueType::Date => Box::new(DateGenerator::with_bounds(
            bound(&spec.min_value, "min_value", vt, as_date)?,
            bound(&spec.max_value, "max_value", vt, as_date)?,
        )?),
        ValueType::Time => Box::new(TimeGenerator::with_bounds(
            bound(&spec.min_value, "min_value", vt, as_time)?,
            bound(&spec.max_value, "max_value", vt, as_time)?,
        )?),
        ValueType::DateTime => Box::new(DateTimeGenerator::with_bounds(
            bound(&spec.min_value, "min_value", vt, as_date_time)?,
            bound(&spec.max_value, "max_value", vt, as_date_time)?,
        )?),
        ValueType::Boolean => return Ok(None),
    };
    Ok(Some(raw))
}

fn bound<T>(
    value: &Option<DataValue>,
    field: &'static str,
    expected: ValueType,
    extract: impl Fn(&DataValue) -> Option<T>,
) -> Result<Option<T>, GeneratorError> {
    match value {
        None => Ok(None),
        Some(v) => extract(v)
            .map(Some)
            .ok_or(GeneratorError::TypeMismatch { field, expected }),
    }
}

fn as_date(value: &DataValue) -> Option<NaiveDate> {
    match value {
        DataValue::Date(d) => Some(*d),
        _ => None,
    }
}

fn as_time(value: &DataValue) -> Option<NaiveTime> {
    match value {
        DataValue::Time(t) => Some(*t),
        _ => None,
    }
}

fn as_date_time(value: &DataValue) -> Option<NaiveDateTime> {
    match value {
        DataValue::DateTime(dt) => Some(*dt),
        _ => None,
    }
}

/// A value of the same type that differs from `expected`.
fn wrong_value(expected: &DataValue, rng: &mut RandomSource) -> DataValue {
    fn shifted<D: RangeDomain>(domain: D, value: D::Value) -> D::Value {
        let up = domain.step_up(value);
        if up != value {
            up
        } else {
            domain.step_down(value)
        }
    }

    match expected {
        DataValue::Boolean(b) => DataValue::Boolean(BooleanGenerator.wrong(*b)),
        DataValue::Integer(i) if *i < MAX_SAFE_INTEGER => DataValue::Integer(i + 1),
        DataValue::Integer(i) => DataValue::Integer(i - 1),
        DataValue::Double(d) => DataValue::Double(wrong_double(*d)),
        DataValue::Date(d) => DataValue::Date(shifted(DateDomain::default(), *d)),
        DataValue::Time(t) => DataValue::Time(shifted(TimeDomain, *t)),
        DataValue::DateTime(dt) => DataValue::DateTime(shifted(DateTimeDomain::default(), *dt)),
        DataValue::String(s) => DataValue::String(format!("{s}{}", RandomString.exactly(rng, 1))),
    }
}

/// `d + 1.0`, or the neighbouring representable value once adding one is
/// lost to rounding.
fn wrong_double(d: f64) -> f64 {
    let shifted = d + 1.0;
    if shifted != d {
        return shifted;
    }
    let bits = d.to_bits();
    let away = f64::from_bits(bits + 1);
    if away.is_finite() {
        away
    } else {
        f64::from_bits(bits - 1)
    }
}

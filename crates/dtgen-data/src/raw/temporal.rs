use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::random::RandomSource;

use super::RangeDomain;

const SECONDS_PER_DAY: i64 = 86_400;

fn first_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn last_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

fn epoch_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

fn last_second() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Offset in `0..=span` drawn uniformly.
fn random_offset(rng: &mut RandomSource, span: i64) -> i64 {
    rng.below_or_equal(span.max(0) as u64) as i64
}

/// Calendar dates from 0001-01-01 to 9999-12-31, stepping by one day.
#[derive(Debug, Clone, Copy)]
pub struct DateDomain {
    first: NaiveDate,
    last: NaiveDate,
}

impl Default for DateDomain {
    fn default() -> Self {
        Self {
            first: first_day(),
            last: last_day(),
        }
    }
}

impl RangeDomain for DateDomain {
    type Value = NaiveDate;

    fn absolute_min(&self) -> NaiveDate {
        self.first
    }

    fn absolute_max(&self) -> NaiveDate {
        self.last
    }

    fn zero(&self) -> NaiveDate {
        epoch_day()
    }

    fn step_up(&self, value: NaiveDate) -> NaiveDate {
        value.succ_opt().unwrap_or(value).min(self.last)
    }

    fn step_down(&self, value: NaiveDate) -> NaiveDate {
        value.pred_opt().unwrap_or(value).max(self.first)
    }

    fn has_value_between(&self, min: NaiveDate, max: NaiveDate) -> bool {
        (max - min).num_days() > 1
    }

    fn median(&self, min: NaiveDate, max: NaiveDate) -> NaiveDate {
        let half = (max - min).num_days() / 2;
        min.checked_add_signed(Duration::days(half)).unwrap_or(min)
    }

    fn random_in(&self, rng: &mut RandomSource, min: NaiveDate, max: NaiveDate) -> NaiveDate {
        let offset = random_offset(rng, (max - min).num_days());
        min.checked_add_signed(Duration::days(offset)).unwrap_or(min)
    }
}

/// Times of day from 00:00:00 to 23:59:59, stepping by one second.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeDomain;

impl TimeDomain {
    fn at(seconds: i64) -> NaiveTime {
        let seconds = seconds.clamp(0, SECONDS_PER_DAY - 1) as u32;
        NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or(NaiveTime::MIN)
    }

    fn seconds(value: NaiveTime) -> i64 {
        i64::from(value.num_seconds_from_midnight())
    }
}

impl RangeDomain for TimeDomain {
    type Value = NaiveTime;

    fn absolute_min(&self) -> NaiveTime {
        NaiveTime::MIN
    }

    fn absolute_max(&self) -> NaiveTime {
        last_second()
    }

    fn zero(&self) -> NaiveTime {
        NaiveTime::MIN
    }

    fn step_up(&self, value: NaiveTime) -> NaiveTime {
        Self::at(Self::seconds(value) + 1)
    }

    fn step_down(&self, value: NaiveTime) -> NaiveTime {
        Self::at(Self::seconds(value) - 1)
    }

    fn has_value_between(&self, min: NaiveTime, max: NaiveTime) -> bool {
        Self::seconds(max) - Self::seconds(min) > 1
    }

    fn median(&self, min: NaiveTime, max: NaiveTime) -> NaiveTime {
        let lo = Self::seconds(min);
        Self::at(lo + (Self::seconds(max) - lo) / 2)
    }

    fn random_in(&self, rng: &mut RandomSource, min: NaiveTime, max: NaiveTime) -> NaiveTime {
        let lo = Self::seconds(min);
        Self::at(lo + random_offset(rng, Self::seconds(max) - lo))
    }
}

/// Date-times from 0001-01-01T00:00:00 to 9999-12-31T23:59:59, one second apart.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeDomain {
    first: NaiveDateTime,
    last: NaiveDateTime,
}

impl Default for DateTimeDomain {
    fn default() -> Self {
        Self {
            first: first_day().and_time(NaiveTime::MIN),
            last: last_day().and_time(last_second()),
        }
    }
}

impl RangeDomain for DateTimeDomain {
    type Value = NaiveDateTime;

    fn absolute_min(&self) -> NaiveDateTime {
        self.first
    }

    fn absolute_max(&self) -> NaiveDateTime {
        self.last
    }

    fn zero(&self) -> NaiveDateTime {
        epoch_day().and_time(NaiveTime::MIN)
    }

    fn step_up(&self, value: NaiveDateTime) -> NaiveDateTime {
        value
            .checked_add_signed(Duration::seconds(1))
            .unwrap_or(value)
            .min(self.last)
    }

    fn step_down(&self, value: NaiveDateTime) -> NaiveDateTime {
        value
            .checked_sub_signed(Duration::seconds(1))
            .unwrap_or(value)
            .max(self.first)
    }

    fn has_value_between(&self, min: NaiveDateTime, max: NaiveDateTime) -> bool {
        (max - min).num_seconds() > 1
    }

    fn median(&self, min: NaiveDateTime, max: NaiveDateTime) -> NaiveDateTime {
        let half = (max - min).num_seconds() / 2;
        min.checked_add_signed(Duration::seconds(half)).unwrap_or(min)
    }

    fn random_in(&self, rng: &mut RandomSource, min: NaiveDateTime, max: NaiveDateTime) -> NaiveDateTime {
        let offset = random_offset(rng, (max - min).num_seconds());
        min.checked_add_signed(Duration::seconds(offset)).unwrap_or(min)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{DateGenerator, DateTimeGenerator, RawDataGenerator, TimeGenerator};
    use super::*;
    use dtgen_ir::{Boundary, DataValue};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_positions() {
        let gen = DateGenerator::with_bounds(Some(date(2024, 1, 1)), Some(date(2024, 1, 31))).unwrap();
        let mut rng = RandomSource::new(Some("dates"));
        assert_eq!(gen.lowest(&mut rng), DataValue::Date(date(1, 1, 1)));
        assert_eq!(gen.just_below_min(&mut rng), DataValue::Date(date(2023, 12, 31)));
        assert_eq!(gen.median(&mut rng), DataValue::Date(date(2024, 1, 16)));
        assert_eq!(gen.just_above_max(&mut rng), DataValue::Date(date(2024, 2, 1)));
        assert_eq!(gen.greatest(&mut rng), DataValue::Date(date(9999, 12, 31)));
        // The epoch lies before the range.
        assert!(!gen.zero_in_range());
        assert_eq!(gen.zero(&mut rng), DataValue::Date(date(2024, 1, 1)));
    }

    #[test]
    fn test_date_random_between_inside() {
        let gen = DateGenerator::with_bounds(Some(date(2020, 2, 27)), Some(date(2020, 3, 2))).unwrap();
        let mut rng = RandomSource::new(Some("leap"));
        for _ in 0..100 {
            let v = gen.random_between_value(&mut rng);
            assert!(v > date(2020, 2, 27) && v < date(2020, 3, 2));
        }
    }

    #[test]
    fn test_time_steps_by_second() {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let gen = TimeGenerator::with_bounds(Some(noon), None).unwrap();
        assert_eq!(
            gen.just_below_min_value(),
            NaiveTime::from_hms_opt(11, 59, 59).unwrap()
        );
        assert!(!gen.has_space_above_max());
        assert_eq!(gen.just_above_max_value(), last_second());
    }

    #[test]
    fn test_datetime_random_above_max() {
        let max = date(9999, 12, 31).and_hms_opt(23, 0, 0).unwrap();
        let gen = DateTimeGenerator::with_bounds(None, Some(max)).unwrap();
        let mut rng = RandomSource::new(Some("late"));
        match gen.generate(Boundary::RandomAboveMax, &mut rng) {
            DataValue::DateTime(v) => assert!(v > max),
            other => panic!("unexpected {other:?}"),
        }
    }
}

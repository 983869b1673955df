use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ── Value types ──────────────────────────────────────────────────────

/// The declared data type of a UI element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    String,
    Integer,
    Double,
    Date,
    Time,
    #[serde(alias = "date_time")]
    DateTime,
    Boolean,
}

impl ValueType {
    pub const COUNT: usize = 7;

    pub const ALL: [ValueType; Self::COUNT] = [
        ValueType::String,
        ValueType::Integer,
        ValueType::Double,
        ValueType::Date,
        ValueType::Time,
        ValueType::DateTime,
        ValueType::Boolean,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Double => "double",
            ValueType::Date => "date",
            ValueType::Time => "time",
            ValueType::DateTime => "datetime",
            ValueType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Values ───────────────────────────────────────────────────────────

/// A concrete value produced for (or declared on) a UI element.
///
/// Deserialization is untagged and every JSON string lands in `String`
/// verbatim; [`DataValue::coerce`] turns it into a temporal variant when the
/// element's declared [`ValueType`] asks for one.
#[derive(Debug, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl DataValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            DataValue::Boolean(_) => ValueType::Boolean,
            DataValue::Integer(_) => ValueType::Integer,
            DataValue::Double(_) => ValueType::Double,
            DataValue::DateTime(_) => ValueType::DateTime,
            DataValue::Date(_) => ValueType::Date,
            DataValue::Time(_) => ValueType::Time,
            DataValue::String(_) => ValueType::String,
        }
    }

    /// Convert this value into the variant matching `target`.
    ///
    /// Returns `None` when the value cannot represent the target type
    /// (e.g. `"abc"` as an integer).
    pub fn coerce(self, target: ValueType) -> Option<DataValue> {
        if self.value_type() == target {
            return Some(self);
        }
        match (target, self) {
            (ValueType::String, other) => Some(DataValue::String(other.to_string())),
            (ValueType::Double, DataValue::Integer(i)) => Some(DataValue::Double(i as f64)),
            (ValueType::Integer, DataValue::Double(d)) if d.fract() == 0.0 => {
                Some(DataValue::Integer(d as i64))
            }
            (ValueType::Date, DataValue::DateTime(dt)) => Some(DataValue::Date(dt.date())),
            (ValueType::DateTime, DataValue::Date(d)) => {
                Some(DataValue::DateTime(d.and_time(NaiveTime::MIN)))
            }
            (target, DataValue::String(s)) => parse_as(target, &s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Double(d) => Some(*d),
            DataValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }
}

fn parse_as(target: ValueType, text: &str) -> Option<DataValue> {
    let text = text.trim();
    match target {
        ValueType::String => Some(DataValue::String(text.to_string())),
        ValueType::Integer => text.parse().ok().map(DataValue::Integer),
        ValueType::Double => text.parse().ok().map(DataValue::Double),
        ValueType::Boolean => match text.to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(DataValue::Boolean(true)),
            "false" | "no" => Some(DataValue::Boolean(false)),
            _ => None,
        },
        ValueType::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .ok()
            .map(DataValue::Date),
        // chrono's own syntax also takes `10:30` and fractional seconds.
        ValueType::Time => NaiveTime::parse_from_str(text, TIME_FORMAT)
            .ok()
            .or_else(|| text.parse().ok())
            .map(DataValue::Time),
        ValueType::DateTime => NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
            .ok()
            .or_else(|| text.parse().ok())
            .map(DataValue::DateTime),
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Boolean(b) => write!(f, "{b}"),
            DataValue::Integer(i) => write!(f, "{i}"),
            DataValue::Double(d) => write!(f, "{d}"),
            DataValue::DateTime(dt) => write!(f, "{}", dt.format(DATE_TIME_FORMAT)),
            DataValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            DataValue::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
            DataValue::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Integer(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Double(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Boolean(value)
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<NaiveDate> for DataValue {
    fn from(value: NaiveDate) -> Self {
        DataValue::Date(value)
    }
}

impl From<NaiveTime> for DataValue {
    fn from(value: NaiveTime) -> Self {
        DataValue::Time(value)
    }
}

impl From<NaiveDateTime> for DataValue {
    fn from(value: NaiveDateTime) -> Self {
        DataValue::DateTime(value)
    }
}

// ── UI element constraints ───────────────────────────────────────────

/// Where the accepted values of a set-constrained element come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// A static, ordered list of accepted values.
    List(Vec<DataValue>),
    /// A query whose rows' first column holds the accepted values.
    Query(String),
}

/// The constraint set of one UI element, as extracted by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiElementSpec {
    pub name: String,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub min_value: Option<DataValue>,
    #[serde(default)]
    pub max_value: Option<DataValue>,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Regular expression the value must match.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub set: Option<CandidateSource>,
    #[serde(default)]
    pub required: bool,
    /// Expected value of a computed element, already resolved by the caller.
    #[serde(default)]
    pub computed: Option<DataValue>,
    /// Whether this element may receive invalid values at all.
    #[serde(default = "default_invalid_eligible")]
    pub invalid_eligible: bool,
}

fn default_invalid_eligible() -> bool {
    true
}

impl UiElementSpec {
    pub fn new(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            min_value: None,
            max_value: None,
            min_length: None,
            max_length: None,
            format: None,
            set: None,
            required: false,
            computed: None,
            invalid_eligible: true,
        }
    }

    #[must_use]
    pub fn with_min_value(mut self, min: impl Into<DataValue>) -> Self {
        self.min_value = Some(min.into());
        self
    }

    #[must_use]
    pub fn with_max_value(mut self, max: impl Into<DataValue>) -> Self {
        self.max_value = Some(max.into());
        self
    }

    #[must_use]
    pub fn with_length_range(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    #[must_use]
    pub fn with_format(mut self, pattern: &str) -> Self {
        self.format = Some(pattern.to_string());
        self
    }

    #[must_use]
    pub fn with_set_list(mut self, values: Vec<DataValue>) -> Self {
        self.set = Some(CandidateSource::List(values));
        self
    }

    #[must_use]
    pub fn with_set_query(mut self, query: &str) -> Self {
        self.set = Some(CandidateSource::Query(query.to_string()));
        self
    }

    #[must_use]
    pub fn with_computed(mut self, value: impl Into<DataValue>) -> Self {
        self.computed = Some(value.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn never_invalid(mut self) -> Self {
        self.invalid_eligible = false;
        self
    }

    pub fn has_value_range(&self) -> bool {
        self.min_value.is_some() || self.max_value.is_some()
    }

    pub fn has_length_range(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_string_to_date() {
        let v = DataValue::String("2024-02-29".into());
        let date = v.coerce(ValueType::Date).unwrap();
        assert_eq!(
            date,
            DataValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
    }

    #[test]
    fn test_coerce_date_back_to_string() {
        let v = DataValue::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(
            v.coerce(ValueType::String),
            Some(DataValue::String("2024-01-05".into()))
        );
    }

    #[test]
    fn test_coerce_integer_to_double() {
        assert_eq!(
            DataValue::Integer(3).coerce(ValueType::Double),
            Some(DataValue::Double(3.0))
        );
        assert_eq!(DataValue::Double(3.5).coerce(ValueType::Integer), None);
    }

    #[test]
    fn test_coerce_rejects_garbage() {
        assert!(DataValue::String("abc".into())
            .coerce(ValueType::Integer)
            .is_none());
    }

    #[test]
    fn test_display_temporal() {
        let dt = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 58)
            .unwrap();
        assert_eq!(DataValue::DateTime(dt).to_string(), "1999-12-31T23:59:58");
    }

    #[test]
    fn test_time_strings_parse_like_chrono() {
        assert_eq!(
            DataValue::String("10:30".into()).coerce(ValueType::Time),
            Some(DataValue::Time(NaiveTime::from_hms_opt(10, 30, 0).unwrap()))
        );
        assert_eq!(
            DataValue::String("12:00:00.25".into()).coerce(ValueType::Time),
            Some(DataValue::Time(NaiveTime::from_hms_milli_opt(12, 0, 0, 250).unwrap()))
        );
    }

    #[test]
    fn test_value_type_default_is_string() {
        assert_eq!(ValueType::default(), ValueType::String);
    }
}

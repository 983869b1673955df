//! Data test-case taxonomy.
//!
//! A `DataTestCase` names one equivalence class or boundary position that a
//! generated value is meant to exercise. The enum discriminant is the group,
//! so group membership is fixed by the type system rather than by data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The concern a data test case belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataTestCaseGroup {
    Value,
    Length,
    Format,
    Set,
    Required,
    Computation,
}

impl DataTestCaseGroup {
    pub const COUNT: usize = 6;

    pub const ALL: [DataTestCaseGroup; Self::COUNT] = [
        DataTestCaseGroup::Value,
        DataTestCaseGroup::Length,
        DataTestCaseGroup::Format,
        DataTestCaseGroup::Set,
        DataTestCaseGroup::Required,
        DataTestCaseGroup::Computation,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            DataTestCaseGroup::Value => "VALUE",
            DataTestCaseGroup::Length => "LENGTH",
            DataTestCaseGroup::Format => "FORMAT",
            DataTestCaseGroup::Set => "SET",
            DataTestCaseGroup::Required => "REQUIRED",
            DataTestCaseGroup::Computation => "COMPUTATION",
        }
    }
}

impl fmt::Display for DataTestCaseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The 13 boundary positions shared by the VALUE and LENGTH groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Boundary {
    Lowest,
    RandomBelowMin,
    JustBelowMin,
    Min,
    JustAboveMin,
    Zero,
    Median,
    RandomBetweenMinAndMax,
    JustBelowMax,
    Max,
    JustAboveMax,
    RandomAboveMax,
    Greatest,
}

impl Boundary {
    pub const COUNT: usize = 13;

    pub const ALL: [Boundary; Self::COUNT] = [
        Boundary::Lowest,
        Boundary::RandomBelowMin,
        Boundary::JustBelowMin,
        Boundary::Min,
        Boundary::JustAboveMin,
        Boundary::Zero,
        Boundary::Median,
        Boundary::RandomBetweenMinAndMax,
        Boundary::JustBelowMax,
        Boundary::Max,
        Boundary::JustAboveMax,
        Boundary::RandomAboveMax,
        Boundary::Greatest,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Boundary::Lowest => "LOWEST",
            Boundary::RandomBelowMin => "RANDOM_BELOW_MIN",
            Boundary::JustBelowMin => "JUST_BELOW_MIN",
            Boundary::Min => "MIN",
            Boundary::JustAboveMin => "JUST_ABOVE_MIN",
            Boundary::Zero => "ZERO",
            Boundary::Median => "MEDIAN",
            Boundary::RandomBetweenMinAndMax => "RANDOM_BETWEEN_MIN_MAX",
            Boundary::JustBelowMax => "JUST_BELOW_MAX",
            Boundary::Max => "MAX",
            Boundary::JustAboveMax => "JUST_ABOVE_MAX",
            Boundary::RandomAboveMax => "RANDOM_ABOVE_MAX",
            Boundary::Greatest => "GREATEST",
        }
    }

    /// Positions that lie below the declared minimum.
    pub const fn is_below_min(self) -> bool {
        matches!(
            self,
            Boundary::Lowest | Boundary::RandomBelowMin | Boundary::JustBelowMin
        )
    }

    /// Positions that lie above the declared maximum.
    pub const fn is_above_max(self) -> bool {
        matches!(
            self,
            Boundary::JustAboveMax | Boundary::RandomAboveMax | Boundary::Greatest
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormatCase {
    Valid,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SetCase {
    FirstElement,
    RandomElement,
    LastElement,
    NotInSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequiredCase {
    Filled,
    NotFilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComputationCase {
    Right,
    Wrong,
}

/// One equivalence class or boundary position.
///
/// Serialized by name, e.g. `"VALUE_JUST_BELOW_MIN"` or `"SET_NOT_IN_SET"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DataTestCase {
    Value(Boundary),
    Length(Boundary),
    Format(FormatCase),
    Set(SetCase),
    Required(RequiredCase),
    Computation(ComputationCase),
}

const VALUE_BASE: usize = 0;
const LENGTH_BASE: usize = VALUE_BASE + Boundary::COUNT;
const FORMAT_BASE: usize = LENGTH_BASE + Boundary::COUNT;
const SET_BASE: usize = FORMAT_BASE + 2;
const REQUIRED_BASE: usize = SET_BASE + 4;
const COMPUTATION_BASE: usize = REQUIRED_BASE + 2;

impl DataTestCase {
    pub const COUNT: usize = COMPUTATION_BASE + 2;

    /// Every data test case, in declaration order. `ALL[dtc.index()] == dtc`.
    pub const ALL: [DataTestCase; Self::COUNT] = [
        DataTestCase::Value(Boundary::Lowest),
        DataTestCase::Value(Boundary::RandomBelowMin),
        DataTestCase::Value(Boundary::JustBelowMin),
        DataTestCase::Value(Boundary::Min),
        DataTestCase::Value(Boundary::JustAboveMin),
        DataTestCase::Value(Boundary::Zero),
        DataTestCase::Value(Boundary::Median),
        DataTestCase::Value(Boundary::RandomBetweenMinAndMax),
        DataTestCase::Value(Boundary::JustBelowMax),
        DataTestCase::Value(Boundary::Max),
        DataTestCase::Value(Boundary::JustAboveMax),
        DataTestCase::Value(Boundary::RandomAboveMax),
        DataTestCase::Value(Boundary::Greatest),
        DataTestCase::Length(Boundary::Lowest),
        DataTestCase::Length(Boundary::RandomBelowMin),
        DataTestCase::Length(Boundary::JustBelowMin),
        DataTestCase::Length(Boundary::Min),
        DataTestCase::Length(Boundary::JustAboveMin),
        DataTestCase::Length(Boundary::Zero),
        DataTestCase::Length(Boundary::Median),
        DataTestCase::Length(Boundary::RandomBetweenMinAndMax),
        DataTestCase::Length(Boundary::JustBelowMax),
        DataTestCase::Length(Boundary::Max),
        DataTestCase::Length(Boundary::JustAboveMax),
        DataTestCase::Length(Boundary::RandomAboveMax),
        DataTestCase::Length(Boundary::Greatest),
        DataTestCase::Format(FormatCase::Valid),
        DataTestCase::Format(FormatCase::Invalid),
        DataTestCase::Set(SetCase::FirstElement),
        DataTestCase::Set(SetCase::RandomElement),
        DataTestCase::Set(SetCase::LastElement),
        DataTestCase::Set(SetCase::NotInSet),
        DataTestCase::Required(RequiredCase::Filled),
        DataTestCase::Required(RequiredCase::NotFilled),
        DataTestCase::Computation(ComputationCase::Right),
        DataTestCase::Computation(ComputationCase::Wrong),
    ];

    pub const fn group(self) -> DataTestCaseGroup {
        match self {
            DataTestCase::Value(_) => DataTestCaseGroup::Value,
            DataTestCase::Length(_) => DataTestCaseGroup::Length,
            DataTestCase::Format(_) => DataTestCaseGroup::Format,
            DataTestCase::Set(_) => DataTestCaseGroup::Set,
            DataTestCase::Required(_) => DataTestCaseGroup::Required,
            DataTestCase::Computation(_) => DataTestCaseGroup::Computation,
        }
    }

    /// Dense index in `0..COUNT`, used to address lookup tables.
    pub const fn index(self) -> usize {
        match self {
            DataTestCase::Value(b) => VALUE_BASE + b.index(),
            DataTestCase::Length(b) => LENGTH_BASE + b.index(),
            DataTestCase::Format(c) => FORMAT_BASE + c as usize,
            DataTestCase::Set(c) => SET_BASE + c as usize,
            DataTestCase::Required(c) => REQUIRED_BASE + c as usize,
            DataTestCase::Computation(c) => COMPUTATION_BASE + c as usize,
        }
    }

    /// All members of one group, in declaration order.
    pub fn of_group(group: DataTestCaseGroup) -> impl Iterator<Item = DataTestCase> {
        Self::ALL.into_iter().filter(move |dtc| dtc.group() == group)
    }

    fn member_name(self) -> &'static str {
        match self {
            DataTestCase::Value(b) | DataTestCase::Length(b) => b.name(),
            DataTestCase::Format(FormatCase::Valid) => "VALID",
            DataTestCase::Format(FormatCase::Invalid) => "INVALID",
            DataTestCase::Set(SetCase::FirstElement) => "FIRST_ELEMENT",
            DataTestCase::Set(SetCase::RandomElement) => "RANDOM_ELEMENT",
            DataTestCase::Set(SetCase::LastElement) => "LAST_ELEMENT",
            DataTestCase::Set(SetCase::NotInSet) => "NOT_IN_SET",
            DataTestCase::Required(RequiredCase::Filled) => "FILLED",
            DataTestCase::Required(RequiredCase::NotFilled) => "NOT_FILLED",
            DataTestCase::Computation(ComputationCase::Right) => "RIGHT",
            DataTestCase::Computation(ComputationCase::Wrong) => "WRONG",
        }
    }
}

impl fmt::Display for DataTestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.group().name(), self.member_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown data test case: {0}")]
pub struct UnknownDataTestCase(pub String);

impl FromStr for DataTestCase {
    type Err = UnknownDataTestCase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|dtc| dtc.to_string() == wanted)
            .ok_or_else(|| UnknownDataTestCase(s.to_string()))
    }
}

impl From<DataTestCase> for String {
    fn from(dtc: DataTestCase) -> Self {
        dtc.to_string()
    }
}

impl TryFrom<String> for DataTestCase {
    type Error = UnknownDataTestCase;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

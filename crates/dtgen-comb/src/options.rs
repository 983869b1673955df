//! Combination option enums and their textual forms.
//!
//! Accepted spellings are case-insensitive. Serialization always uses the
//! canonical long form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("unknown {kind} option '{value}'")]
    Unknown { kind: &'static str, value: String },
}

/// How per-element candidate lists are combined into mixes
/// (`combData`, `combState`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CombinationOption {
    /// Cartesian product.
    All,
    /// Round-robin: mix `i` takes entry `i mod len` of every list.
    OneWise,
    /// One-wise after shuffling every list independently.
    ShuffledOneWise,
    /// A single mix with one random entry per list.
    #[default]
    SingleRandomOfEach,
}

impl CombinationOption {
    pub const fn name(self) -> &'static str {
        match self {
            CombinationOption::All => "all",
            CombinationOption::OneWise => "one-wise",
            CombinationOption::ShuffledOneWise => "shuffled-one-wise",
            CombinationOption::SingleRandomOfEach => "single-random-of-each",
        }
    }
}

impl FromStr for CombinationOption {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(CombinationOption::All),
            "one-wise" | "onewise" | "ow" => Ok(CombinationOption::OneWise),
            "shuffled-one-wise" | "shuffledonewise" | "sow" => Ok(CombinationOption::ShuffledOneWise),
            "single-random-of-each" | "singlerandomofeach" | "sre" => {
                Ok(CombinationOption::SingleRandomOfEach)
            }
            _ => Err(OptionError::Unknown {
                kind: "combination",
                value: s.to_string(),
            }),
        }
    }
}

/// Which variants of a required state are used (`combVariant`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum VariantSelectionOption {
    /// The first in declaration order.
    First,
    /// The first after ordering by importance, most important first.
    FirstMostImportant,
    #[default]
    Random,
    All,
}

impl VariantSelectionOption {
    pub const fn name(self) -> &'static str {
        match self {
            VariantSelectionOption::First => "first",
            VariantSelectionOption::FirstMostImportant => "fmi",
            VariantSelectionOption::Random => "random",
            VariantSelectionOption::All => "all",
        }
    }
}

impl FromStr for VariantSelectionOption {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(VariantSelectionOption::First),
            "fmi" | "first-most-important" | "firstmostimportant" => {
                Ok(VariantSelectionOption::FirstMostImportant)
            }
            "random" => Ok(VariantSelectionOption::Random),
            "all" => Ok(VariantSelectionOption::All),
            _ => Err(OptionError::Unknown {
                kind: "variant selection",
                value: s.to_string(),
            }),
        }
    }
}

/// How many elements receive an invalid value per mix (`combInvalid`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "InvalidOptionRepr")]
pub enum InvalidOption {
    /// Valid values only.
    None,
    /// Exactly `k` invalid-capable elements get an invalid value; `k >= 1`.
    Exactly(usize),
    /// Every invalid-capable element gets an invalid value.
    All,
    /// No filtering, and the group is combined shuffled-one-wise whatever
    /// `combData` says.
    Random,
    /// No filtering; `combData` applies unmodified.
    #[default]
    Smart,
}

impl FromStr for InvalidOption {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "none" | "0" => Ok(InvalidOption::None),
            "all" => Ok(InvalidOption::All),
            "random" => Ok(InvalidOption::Random),
            "smart" | "default" => Ok(InvalidOption::Smart),
            other => match other.parse::<usize>() {
                Ok(k) => Ok(InvalidOption::Exactly(k)),
                Err(_) => Err(OptionError::Unknown {
                    kind: "invalid",
                    value: s.to_string(),
                }),
            },
        }
    }
}

impl fmt::Display for InvalidOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidOption::None => f.write_str("none"),
            InvalidOption::Exactly(k) => write!(f, "{k}"),
            InvalidOption::All => f.write_str("all"),
            InvalidOption::Random => f.write_str("random"),
            InvalidOption::Smart => f.write_str("smart"),
        }
    }
}

/// `combInvalid` may be written as a JSON number or a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum InvalidOptionRepr {
    Count(usize),
    Name(String),
}

impl TryFrom<InvalidOptionRepr> for InvalidOption {
    type Error = OptionError;

    fn try_from(repr: InvalidOptionRepr) -> Result<Self, Self::Error> {
        match repr {
            InvalidOptionRepr::Count(0) => Ok(InvalidOption::None),
            InvalidOptionRepr::Count(k) => Ok(InvalidOption::Exactly(k)),
            InvalidOptionRepr::Name(name) => name.parse(),
        }
    }
}

macro_rules! string_conversions {
    ($($ty:ty),*) => {$(
        impl From<$ty> for String {
            fn from(option: $ty) -> String {
                option.to_string()
            }
        }
    )*};
}

string_conversions!(CombinationOption, VariantSelectionOption, InvalidOption);

impl fmt::Display for CombinationOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for VariantSelectionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for CombinationOption {
    type Error = OptionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for VariantSelectionOption {
    type Error = OptionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_aliases() {
        assert_eq!("ow".parse(), Ok(CombinationOption::OneWise));
        assert_eq!("SOW".parse(), Ok(CombinationOption::ShuffledOneWise));
        assert_eq!("sre".parse(), Ok(CombinationOption::SingleRandomOfEach));
        assert_eq!("all".parse(), Ok(CombinationOption::All));
        assert!("pairwise".parse::<CombinationOption>().is_err());
    }

    #[test]
    fn test_invalid_option_forms() {
        assert_eq!("0".parse(), Ok(InvalidOption::None));
        assert_eq!("none".parse(), Ok(InvalidOption::None));
        assert_eq!("2".parse(), Ok(InvalidOption::Exactly(2)));
        assert_eq!("Random".parse(), Ok(InvalidOption::Random));
        assert_eq!("smart".parse(), Ok(InvalidOption::Smart));
        assert!("-1".parse::<InvalidOption>().is_err());
    }

    #[test]
    fn test_invalid_option_json_number_or_string() {
        let n: InvalidOption = serde_json::from_str("3").unwrap();
        assert_eq!(n, InvalidOption::Exactly(3));
        let s: InvalidOption = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(s, InvalidOption::All);
        assert_eq!(serde_json::to_string(&InvalidOption::Exactly(3)).unwrap(), "\"3\"");
    }

    #[test]
    fn test_variant_option_round_trip_names() {
        for option in [
            VariantSelectionOption::First,
            VariantSelectionOption::FirstMostImportant,
            VariantSelectionOption::Random,
            VariantSelectionOption::All,
        ] {
            assert_eq!(option.name().parse(), Ok(option));
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(CombinationOption::default(), CombinationOption::SingleRandomOfEach);
        assert_eq!(VariantSelectionOption::default(), VariantSelectionOption::Random);
        assert_eq!(InvalidOption::default(), InvalidOption::Smart);
    }
}

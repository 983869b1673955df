//! Generated outcomes and data mixes.

use serde::{Deserialize, Serialize};

use crate::case::DataTestCase;
use crate::types::DataValue;

/// Why a generator produced no value for a requested data test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapReason {
    /// The element lacks the constraint the data test case needs.
    MissingConstraint,
    /// The candidate set has too few elements for the requested position.
    SetTooSmall,
    /// No value outside the candidate set was found within the allowed tries.
    RejectionSamplingExhausted,
    /// Neither random rejection nor the negated expression gave a non-matching value.
    RegexNegationFailed,
    /// The format expression uses a construct values cannot be generated from.
    UnsupportedPattern,
    /// A filled string was asked for but the length range only admits `""`.
    EmptyLengthRange,
}

impl std::fmt::Display for GapReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            GapReason::MissingConstraint => "missing constraint",
            GapReason::SetTooSmall => "candidate set too small",
            GapReason::RejectionSamplingExhausted => "no value outside the set within the allowed tries",
            GapReason::RegexNegationFailed => "could not produce a value violating the format",
            GapReason::UnsupportedPattern => "format expression not supported for generation",
            GapReason::EmptyLengthRange => "length range admits only the empty string",
        };
        f.write_str(text)
    }
}

/// Result of asking for one data test case of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DataOutcome {
    Value(DataValue),
    /// The element must be left empty (`REQUIRED_NOT_FILLED`).
    Blank,
    /// The data test case does not apply to the element's value type.
    NotApplicable,
    /// Coverage gap: applicable, but no value could be produced.
    NoValue(GapReason),
}

impl DataOutcome {
    pub fn value(&self) -> Option<&DataValue> {
        match self {
            DataOutcome::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, DataOutcome::NotApplicable | DataOutcome::NoValue(_))
    }
}

/// The value chosen for one element inside one mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixEntry {
    pub element: String,
    pub data_test_case: DataTestCase,
    /// Whether the data test case is an invalid one for this element.
    pub invalid: bool,
    pub outcome: DataOutcome,
}

/// One concrete assignment of values to the UI elements of a test case.
///
/// Entries keep the elements' declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataMix {
    pub entries: Vec<MixEntry>,
}

impl DataMix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: MixEntry) {
        self.entries.push(entry);
    }

    /// Entry for an element; `None` means the element is not part of the mix.
    pub fn get(&self, element: &str) -> Option<&MixEntry> {
        self.entries.iter().find(|e| e.element == element)
    }

    pub fn value(&self, element: &str) -> Option<&DataValue> {
        self.get(element).and_then(|e| e.outcome.value())
    }

    /// Entries planned with an invalid data test case, whether or not a value
    /// could be produced for them.
    pub fn invalid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.invalid).count()
    }

    /// Invalid entries that actually carry invalid data: a value, or a blank
    /// for a required element. Coverage gaps are left out.
    pub fn effective_invalid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.invalid && !e.outcome.is_gap()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MixEntry> {
        self.entries.iter()
    }
}

//! Constraint analyzer: classifies every data test case of an element as
//! valid, invalid or incompatible.
//!
//! Precedence when constraints overlap (highest first): computed value, set,
//! format, range. In-range positions of a lower-precedence constraint are
//! incompatible because a random value cannot be guaranteed to satisfy the
//! higher one; out-of-range positions stay invalid either way.

use dtgen_ir::{
    is_compatible, Boundary, ComputationCase, DataTestCase, FormatCase, RequiredCase, SetCase, ValueType,
};
use serde::Serialize;

use crate::dispatch::ElementProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    Valid,
    Invalid,
    Incompatible,
}

/// Verdicts for all data test cases of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    element: String,
    invalid_eligible: bool,
    verdicts: [Validity; DataTestCase::COUNT],
}

impl Analysis {
    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn verdict(&self, dtc: DataTestCase) -> Validity {
        self.verdicts[dtc.index()]
    }

    pub fn valid_cases(&self) -> Vec<DataTestCase> {
        self.cases_with(Validity::Valid)
    }

    pub fn invalid_cases(&self) -> Vec<DataTestCase> {
        self.cases_with(Validity::Invalid)
    }

    /// Invalid cases the element may actually receive; empty when the
    /// element is not eligible for invalid values.
    pub fn eligible_invalid_cases(&self) -> Vec<DataTestCase> {
        if self.invalid_eligible {
            self.invalid_cases()
        } else {
            Vec::new()
        }
    }

    pub fn is_invalid_capable(&self) -> bool {
        self.invalid_eligible && self.verdicts.contains(&Validity::Invalid)
    }

    fn cases_with(&self, validity: Validity) -> Vec<DataTestCase> {
        DataTestCase::ALL
            .into_iter()
            .filter(|dtc| self.verdict(*dtc) == validity)
            .collect()
    }
}

pub fn analyze(profile: &ElementProfile) -> Analysis {
    let spec = profile.spec();
    let mut verdicts = [Validity::Incompatible; DataTestCase::COUNT];
    for dtc in DataTestCase::ALL {
        if is_compatible(spec.value_type, dtc) {
            verdicts[dtc.index()] = classify(profile, dtc);
        }
    }
    Analysis {
        element: spec.name.clone(),
        invalid_eligible: spec.invalid_eligible,
        verdicts,
    }
}

fn classify(profile: &ElementProfile, dtc: DataTestCase) -> Validity {
    let spec = profile.spec();
    let computed = spec.computed.is_some();
    let has_set = profile.set().is_some();
    let has_format = profile.format().is_some();

    match dtc {
        DataTestCase::Required(RequiredCase::Filled) => Validity::Valid,
        DataTestCase::Required(RequiredCase::NotFilled) if spec.required => Validity::Invalid,
        DataTestCase::Required(RequiredCase::NotFilled) => Validity::Valid,
        DataTestCase::Computation(_) if !computed => Validity::Incompatible,
        DataTestCase::Computation(ComputationCase::Right) => Validity::Valid,
        DataTestCase::Computation(ComputationCase::Wrong) => Validity::Invalid,
        _ if computed => Validity::Incompatible,
        DataTestCase::Set(_) if !has_set => Validity::Incompatible,
        DataTestCase::Set(SetCase::NotInSet) if profile.raw().is_none() => Validity::Incompatible,
        DataTestCase::Set(SetCase::NotInSet) => Validity::Invalid,
        DataTestCase::Set(_) => Validity::Valid,
        DataTestCase::Format(_) if !has_format => Validity::Incompatible,
        DataTestCase::Format(FormatCase::Valid) if has_set => Validity::Incompatible,
        DataTestCase::Format(FormatCase::Valid) => Validity::Valid,
        DataTestCase::Format(FormatCase::Invalid) => Validity::Invalid,
        DataTestCase::Value(boundary) | DataTestCase::Length(boundary) => {
            range_verdict(profile, boundary, has_set || has_format)
        }
    }
}

fn range_verdict(profile: &ElementProfile, boundary: Boundary, overridden: bool) -> Validity {
    let spec = profile.spec();
    let (min_declared, max_declared) = if spec.value_type == ValueType::String {
        (spec.min_length.is_some(), spec.max_length.is_some())
    } else {
        (spec.min_value.is_some(), spec.max_value.is_some())
    };
    let Some(raw) = profile.raw() else {
        return Validity::Incompatible;
    };
    if !min_declared && !max_declared {
        return Validity::Incompatible;
    }

    if boundary.is_below_min() {
        return if min_declared && raw.has_space_below_min() {
            Validity::Invalid
        } else {
            Validity::Incompatible
        };
    }
    if boundary.is_above_max() {
        return if max_declared && raw.has_space_above_max() {
            Validity::Invalid
        } else {
            Validity::Incompatible
        };
    }
    if overridden {
        return Validity::Incompatible;
    }

    match boundary {
        Boundary::JustAboveMin | Boundary::RandomBetweenMinAndMax | Boundary::JustBelowMax
            if !raw.has_space_between() =>
        {
            Validity::Incompatible
        }
        Boundary::Zero if !raw.zero_in_range() => Validity::Incompatible,
        _ => Validity::Valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{DataGenerator, GeneratorOptions};
    use dtgen_ir::{DataValue, UiElementSpec};

    fn analysis_of(spec: UiElementSpec) -> Analysis {
        analyze(&DataGenerator::new(GeneratorOptions::default()).profile(&spec))
    }

    #[test]
    fn test_integer_range_verdicts() {
        let a = analysis_of(
            UiElementSpec::new("age", ValueType::Integer)
                .with_min_value(18)
                .with_max_value(120),
        );
        assert_eq!(a.verdict(DataTestCase::Value(Boundary::JustBelowMin)), Validity::Invalid);
        assert_eq!(a.verdict(DataTestCase::Value(Boundary::Min)), Validity::Valid);
        assert_eq!(a.verdict(DataTestCase::Value(Boundary::Median)), Validity::Valid);
        assert_eq!(a.verdict(DataTestCase::Value(Boundary::Zero)), Validity::Incompatible);
        assert_eq!(a.verdict(DataTestCase::Value(Boundary::Greatest)), Validity::Invalid);
        assert_eq!(a.verdict(DataTestCase::Length(Boundary::Min)), Validity::Incompatible);
        assert!(a.is_invalid_capable());
    }

    #[test]
    fn test_only_max_declared() {
        let a = analysis_of(UiElementSpec::new("qty", ValueType::Integer).with_max_value(10));
        assert_eq!(a.verdict(DataTestCase::Value(Boundary::Lowest)), Validity::Incompatible);
        assert_eq!(a.verdict(DataTestCase::Value(Boundary::JustAboveMax)), Validity::Invalid);
        assert_eq!(a.verdict(DataTestCase::Value(Boundary::Zero)), Validity::Valid);
    }

    #[test]
    fn test_unconstrained_string_only_required() {
        let a = analysis_of(UiElementSpec::new("note", ValueType::String));
        assert_eq!(
            a.valid_cases(),
            DataTestCase::of_group(dtgen_ir::DataTestCaseGroup::Required).collect::<Vec<_>>()
        );
        assert!(!a.is_invalid_capable());
    }

    #[test]
    fn test_required_not_filled_is_invalid() {
        let a = analysis_of(UiElementSpec::new("name", ValueType::String).required());
        assert_eq!(
            a.invalid_cases(),
            vec![DataTestCase::Required(RequiredCase::NotFilled)]
        );
    }

    #[test]
    fn test_not_eligible_never_invalid_capable() {
        let a = analysis_of(UiElementSpec::new("name", ValueType::String).required().never_invalid());
        assert!(!a.invalid_cases().is_empty());
        assert!(a.eligible_invalid_cases().is_empty());
        assert!(!a.is_invalid_capable());
    }

    #[test]
    fn test_set_overrides_range() {
        let a = analysis_of(
            UiElementSpec::new("size", ValueType::Integer)
                .with_min_value(1)
                .with_max_value(3)
                .with_set_list(vec![DataValue::Integer(1), DataValue::Integer(3)]),
        );
        assert_eq!(a.verdict(DataTestCase::Value(Boundary::Median)), Validity::Incompatible);
        assert_eq!(a.verdict(DataTestCase::Value(Boundary::JustAboveMax)), Validity::Invalid);
        assert_eq!(a.verdict(DataTestCase::Set(SetCase::FirstElement)), Validity::Valid);
        assert_eq!(a.verdict(DataTestCase::Set(SetCase::NotInSet)), Validity::Invalid);
    }

    #[test]
    fn test_set_positions_survive_broken_range() {
        let a = analysis_of(
            UiElementSpec::new("size", ValueType::Integer)
                .with_min_value(5)
                .with_max_value(1)
                .with_set_list(vec![DataValue::Integer(1), DataValue::Integer(2)]),
        );
        assert_eq!(a.verdict(DataTestCase::Set(SetCase::FirstElement)), Validity::Valid);
        assert_eq!(a.verdict(DataTestCase::Set(SetCase::LastElement)), Validity::Valid);
        assert_eq!(a.verdict(DataTestCase::Set(SetCase::NotInSet)), Validity::Incompatible);
    }

    #[test]
    fn test_computed_overrides_everything_else() {
        let a = analysis_of(
            UiElementSpec::new("total", ValueType::Double)
                .with_min_value(0.0)
                .with_computed(42.0),
        );
        assert_eq!(a.verdict(DataTestCase::Value(Boundary::JustBelowMin)), Validity::Incompatible);
        assert_eq!(a.verdict(DataTestCase::Computation(ComputationCase::Right)), Validity::Valid);
        assert_eq!(a.verdict(DataTestCase::Computation(ComputationCase::Wrong)), Validity::Invalid);
    }

    #[test]
    fn test_string_zero_to_one_length() {
        let a = analysis_of(UiElementSpec::new("flag", ValueType::String).with_length_range(Some(0), Some(1)));
        assert_eq!(a.verdict(DataTestCase::Length(Boundary::JustBelowMin)), Validity::Incompatible);
        assert_eq!(a.verdict(DataTestCase::Length(Boundary::JustAboveMin)), Validity::Incompatible);
        assert_eq!(a.verdict(DataTestCase::Length(Boundary::Zero)), Validity::Valid);
        assert_eq!(a.verdict(DataTestCase::Length(Boundary::JustAboveMax)), Validity::Invalid);
    }
}

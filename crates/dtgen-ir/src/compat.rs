//! Value type / data test case compatibility matrix.
//!
//! The table is built by a `const fn` from the group rules below, so it is
//! fixed at compile time and only ever read.

use crate::case::{DataTestCase, DataTestCaseGroup};
use crate::types::ValueType;

static COMPATIBILITY: [[bool; DataTestCase::COUNT]; ValueType::COUNT] = build_table();

/// Whether a value type can be exercised by a data test case at all.
pub fn is_compatible(value_type: ValueType, dtc: DataTestCase) -> bool {
    COMPATIBILITY[value_type.index()][dtc.index()]
}

/// All data test cases compatible with a value type, in declaration order.
pub fn compatible_cases(value_type: ValueType) -> impl Iterator<Item = DataTestCase> {
    DataTestCase::ALL
        .into_iter()
        .filter(move |dtc| is_compatible(value_type, *dtc))
}

const fn group_accepts(value_type: ValueType, group: DataTestCaseGroup) -> bool {
    match group {
        DataTestCaseGroup::Required | DataTestCaseGroup::Computation => true,
        DataTestCaseGroup::Length => matches!(value_type, ValueType::String),
        DataTestCaseGroup::Value => matches!(
            value_type,
            ValueType::Integer
                | ValueType::Double
                | ValueType::Date
                | ValueType::Time
                | ValueType::DateTime
        ),
        DataTestCaseGroup::Format | DataTestCaseGroup::Set => {
            !matches!(value_type, ValueType::Boolean)
        }
    }
}

const fn build_table() -> [[bool; DataTestCase::COUNT]; ValueType::COUNT] {
    let mut table = [[false; DataTestCase::COUNT]; ValueType::COUNT];
    let mut t = 0;
    while t < ValueType::COUNT {
        let value_type = ValueType::ALL[t];
        let mut c = 0;
        while c < DataTestCase::COUNT {
            table[t][c] = group_accepts(value_type, DataTestCase::ALL[c].group());
            c += 1;
        }
        t += 1;
    }
    table
}

//! Invalid-count policy: decides which elements draw from invalid
//! candidates, and which strategy combines each resulting group.

use dtgen_ir::DataTestCase;
use tracing::debug;

use crate::options::{CombinationOption, InvalidOption};

/// Candidate data test cases of one element, split by validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementCandidates {
    pub element: String,
    pub valid: Vec<DataTestCase>,
    /// Empty when the element must never receive an invalid value.
    pub invalid: Vec<DataTestCase>,
}

impl ElementCandidates {
    pub fn new(element: &str, valid: Vec<DataTestCase>, invalid: Vec<DataTestCase>) -> Self {
        Self {
            element: element.to_string(),
            valid,
            invalid,
        }
    }

    pub fn is_invalid_capable(&self) -> bool {
        !self.invalid.is_empty()
    }
}

/// One entry of a candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub data_test_case: DataTestCase,
    pub invalid: bool,
}

impl Candidate {
    pub fn valid(data_test_case: DataTestCase) -> Self {
        Self {
            data_test_case,
            invalid: false,
        }
    }

    pub fn invalid(data_test_case: DataTestCase) -> Self {
        Self {
            data_test_case,
            invalid: true,
        }
    }
}

/// Candidate lists to be combined together with one strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedGroup {
    pub lists: Vec<(String, Vec<Candidate>)>,
    pub strategy: CombinationOption,
}

/// Apply the invalid-count policy.
///
/// With `Exactly(k)` every group forces invalid-only lists on one size-`k`
/// subset of the invalid-capable elements (valid-only lists elsewhere), so
/// each mix it yields holds exactly `k` invalid values. Subsets are
/// enumerated lexicographically in declaration order and capped by
/// `max_subsets`. Fewer than `k` capable elements collapse to a single group
/// where all of them are invalid.
pub fn plan_groups(
    elements: &[ElementCandidates],
    policy: InvalidOption,
    data: CombinationOption,
    max_subsets: Option<usize>,
) -> Vec<PlannedGroup> {
    let capable: Vec<usize> = elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_invalid_capable())
        .map(|(i, _)| i)
        .collect();

    match policy {
        InvalidOption::None | InvalidOption::Exactly(0) => vec![forced_group(elements, &[], data)],
        InvalidOption::Exactly(k) => {
            if capable.len() <= k {
                return vec![forced_group(elements, &capable, data)];
            }
            let groups: Vec<PlannedGroup> = subsets(capable.len(), k, max_subsets)
                .into_iter()
                .map(|subset| {
                    let chosen: Vec<usize> = subset.into_iter().map(|i| capable[i]).collect();
                    forced_group(elements, &chosen, data)
                })
                .collect();
            debug!(k, groups = groups.len(), "planned invalid subsets");
            groups
        }
        InvalidOption::All => vec![forced_group(elements, &capable, data)],
        InvalidOption::Random => {
            if data != CombinationOption::ShuffledOneWise {
                debug!(configured = %data, "random invalid policy forces shuffled-one-wise");
            }
            vec![untouched_group(elements, CombinationOption::ShuffledOneWise)]
        }
        InvalidOption::Smart => vec![untouched_group(elements, data)],
    }
}

/// Invalid-only lists for `chosen`, valid-only lists for everyone else.
fn forced_group(elements: &[ElementCandidates], chosen: &[usize], strategy: CombinationOption) -> PlannedGroup {
    let lists = elements
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let list = if chosen.contains(&i) {
                e.invalid.iter().copied().map(Candidate::invalid).collect()
            } else {
                e.valid.iter().copied().map(Candidate::valid).collect()
            };
            (e.element.clone(), list)
        })
        .collect();
    PlannedGroup { lists, strategy }
}

/// Every element keeps its full list, valid candidates first.
fn untouched_group(elements: &[ElementCandidates], strategy: CombinationOption) -> PlannedGroup {
    let lists = elements
        .iter()
        .map(|e| {
            let list = e
                .valid
                .iter()
                .copied()
                .map(Candidate::valid)
                .chain(e.invalid.iter().copied().map(Candidate::invalid))
                .collect();
            (e.element.clone(), list)
        })
        .collect();
    PlannedGroup { lists, strategy }
}

/// Size-`k` subsets of `0..n` in lexicographic order, at most `cap` of them.
pub fn subsets(n: usize, k: usize, cap: Option<usize>) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k == 0 || k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        if cap.is_some_and(|c| out.len() >= c) {
            break;
        }
        out.push(idx.clone());

        // Rightmost position that can still move right.
        let mut i = k;
        while i > 0 && idx[i - 1] == i - 1 + n - k {
            i -= 1;
        }
        if i == 0 {
            break;
        }
        idx[i - 1] += 1;
        for j in i..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtgen_ir::{Boundary, RequiredCase};

    fn filled() -> DataTestCase {
        DataTestCase::Required(RequiredCase::Filled)
    }

    fn element(name: &str, capable: bool) -> ElementCandidates {
        let invalid = if capable {
            vec![DataTestCase::Value(Boundary::JustBelowMin)]
        } else {
            vec![]
        };
        ElementCandidates::new(name, vec![filled()], invalid)
    }

    fn invalid_keys(group: &PlannedGroup) -> Vec<&str> {
        group
            .lists
            .iter()
            .filter(|(_, list)| list.iter().all(|c| c.invalid))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    #[test]
    fn test_subsets_lexicographic() {
        assert_eq!(
            subsets(4, 2, None),
            vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]
        );
        assert_eq!(subsets(4, 2, Some(2)), vec![vec![0, 1], vec![0, 2]]);
        assert!(subsets(2, 3, None).is_empty());
    }

    #[test]
    fn test_exactly_k_groups() {
        let elements = vec![
            element("a", true),
            element("b", false),
            element("c", true),
            element("d", true),
        ];
        let groups = plan_groups(&elements, InvalidOption::Exactly(2), CombinationOption::All, None);
        let chosen: Vec<Vec<&str>> = groups.iter().map(invalid_keys).collect();
        assert_eq!(chosen, vec![vec!["a", "c"], vec!["a", "d"], vec!["c", "d"]]);
    }

    #[test]
    fn test_exactly_k_with_too_few_capable() {
        let elements = vec![element("a", true), element("b", false)];
        let groups = plan_groups(&elements, InvalidOption::Exactly(3), CombinationOption::All, None);
        assert_eq!(groups.len(), 1);
        assert_eq!(invalid_keys(&groups[0]), vec!["a"]);
    }

    #[test]
    fn test_none_uses_valid_only() {
        let elements = vec![element("a", true)];
        let groups = plan_groups(&elements, InvalidOption::None, CombinationOption::OneWise, None);
        assert!(groups[0].lists[0].1.iter().all(|c| !c.invalid));
    }

    #[test]
    fn test_random_forces_shuffled_one_wise() {
        let elements = vec![element("a", true)];
        let groups = plan_groups(&elements, InvalidOption::Random, CombinationOption::All, None);
        assert_eq!(groups[0].strategy, CombinationOption::ShuffledOneWise);
        assert_eq!(groups[0].lists[0].1.len(), 2);
    }

    #[test]
    fn test_smart_keeps_configured_strategy() {
        let elements = vec![element("a", true)];
        let groups = plan_groups(&elements, InvalidOption::Smart, CombinationOption::All, None);
        assert_eq!(groups[0].strategy, CombinationOption::All);
        assert_eq!(groups[0].lists[0].1.len(), 2);
    }
}

use dtgen_data::RandomSource;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::invalid::{plan_groups, Candidate, ElementCandidates};
use crate::options::{CombinationOption, InvalidOption, VariantSelectionOption};
use crate::strategy;
use crate::variant::{self, Ranked};

/// The four combination options of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationOptions {
    pub variant: VariantSelectionOption,
    pub state: CombinationOption,
    pub invalid: InvalidOption,
    pub data: CombinationOption,
}

/// Which data test case each element gets in one mix, before any value exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMix {
    pub entries: Vec<(String, Candidate)>,
}

impl PlannedMix {
    pub fn invalid_count(&self) -> usize {
        self.entries.iter().filter(|(_, c)| c.invalid).count()
    }
}

/// Holds the options of a run and turns candidates into planned mixes.
#[derive(Debug, Clone, Default)]
pub struct CombinationEngine {
    options: CombinationOptions,
    max_invalid_subsets: Option<usize>,
}

impl CombinationEngine {
    pub fn new(options: CombinationOptions) -> Self {
        Self {
            options,
            max_invalid_subsets: None,
        }
    }

    #[must_use]
    pub fn with_max_invalid_subsets(mut self, cap: Option<usize>) -> Self {
        self.max_invalid_subsets = cap;
        self
    }

    pub fn options(&self) -> &CombinationOptions {
        &self.options
    }

    /// Plan the mixes of one test case.
    ///
    /// Groups come from the invalid-count policy; each group is combined
    /// with its own strategy and the mixes are concatenated in group order.
    pub fn plan(&self, elements: &[ElementCandidates], rng: &mut RandomSource) -> Vec<PlannedMix> {
        let groups = plan_groups(
            elements,
            self.options.invalid,
            self.options.data,
            self.max_invalid_subsets,
        );
        let mut mixes = Vec::new();
        for group in groups {
            let combined = strategy::combine(group.strategy, &group.lists, rng);
            debug!(
                strategy = group.strategy.name(),
                mixes = combined.len(),
                "combined group"
            );
            mixes.extend(combined.into_iter().map(|entries| PlannedMix { entries }));
        }
        mixes
    }

    pub fn select_variants<'a, V: Ranked>(&self, variants: &'a [V], rng: &mut RandomSource) -> Vec<&'a V> {
        variant::select_variants(variants, self.options.variant, rng)
    }

    pub fn combine_states<K: Clone, T: Clone>(
        &self,
        states: &[(K, Vec<T>)],
        rng: &mut RandomSource,
    ) -> Vec<Vec<(K, T)>> {
        variant::combine_states(states, self.options.state, rng)
    }
}

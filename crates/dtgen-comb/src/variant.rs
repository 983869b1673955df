//! Variant selection (`combVariant`) and state combination (`combState`).

use dtgen_data::RandomSource;

use crate::options::{CombinationOption, VariantSelectionOption};
use crate::strategy;

/// Anything that carries a declared importance weight.
pub trait Ranked {
    fn importance(&self) -> u32;
}

/// Pick the variants that will produce prerequisite scenarios.
///
/// `FirstMostImportant` takes the most important variant, breaking ties by
/// declaration order.
pub fn select_variants<'a, V: Ranked>(
    variants: &'a [V],
    option: VariantSelectionOption,
    rng: &mut RandomSource,
) -> Vec<&'a V> {
    if variants.is_empty() {
        return Vec::new();
    }
    match option {
        VariantSelectionOption::First => vec![&variants[0]],
        VariantSelectionOption::FirstMostImportant => {
            let mut ranked: Vec<&V> = variants.iter().collect();
            ranked.sort_by(|a, b| b.importance().cmp(&a.importance()));
            ranked.truncate(1);
            ranked
        }
        VariantSelectionOption::Random => {
            let index = rng.below_or_equal(variants.len() as u64 - 1) as usize;
            vec![&variants[index]]
        }
        VariantSelectionOption::All => variants.iter().collect(),
    }
}

/// Combine the candidate lists of several states required at once.
pub fn combine_states<K: Clone, T: Clone>(
    states: &[(K, Vec<T>)],
    option: CombinationOption,
    rng: &mut RandomSource,
) -> Vec<Vec<(K, T)>> {
    strategy::combine(option, states, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Variant {
        name: &'static str,
        importance: u32,
    }

    impl Ranked for Variant {
        fn importance(&self) -> u32 {
            self.importance
        }
    }

    fn variants() -> Vec<Variant> {
        vec![
            Variant { name: "guest", importance: 1 },
            Variant { name: "member", importance: 7 },
            Variant { name: "admin", importance: 7 },
        ]
    }

    fn names(selected: Vec<&Variant>) -> Vec<&'static str> {
        selected.into_iter().map(|v| v.name).collect()
    }

    #[test]
    fn test_first_and_all() {
        let vs = variants();
        let mut rng = RandomSource::new(Some("variants"));
        assert_eq!(names(select_variants(&vs, VariantSelectionOption::First, &mut rng)), vec!["guest"]);
        assert_eq!(select_variants(&vs, VariantSelectionOption::All, &mut rng).len(), 3);
    }

    #[test]
    fn test_fmi_is_stable_on_ties() {
        let vs = variants();
        let mut rng = RandomSource::new(Some("fmi"));
        assert_eq!(
            names(select_variants(&vs, VariantSelectionOption::FirstMostImportant, &mut rng)),
            vec!["member"]
        );
    }

    #[test]
    fn test_random_picks_one() {
        let vs = variants();
        let mut rng = RandomSource::new(Some("pick"));
        let picked = select_variants(&vs, VariantSelectionOption::Random, &mut rng);
        assert_eq!(picked.len(), 1);
        assert!(vs.contains(picked[0]));
    }

    #[test]
    fn test_empty_variants() {
        let vs: Vec<Variant> = Vec::new();
        let mut rng = RandomSource::new(Some("none"));
        assert!(select_variants(&vs, VariantSelectionOption::All, &mut rng).is_empty());
    }

    #[test]
    fn test_states_combined_like_data() {
        let states = vec![("logged_in", vec!["alice", "bob"]), ("cart", vec!["empty", "full"])];
        let mut rng = RandomSource::new(Some("states"));
        assert_eq!(combine_states(&states, CombinationOption::All, &mut rng).len(), 4);
        assert_eq!(combine_states(&states, CombinationOption::OneWise, &mut rng).len(), 2);
    }
}

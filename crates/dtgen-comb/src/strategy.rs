//! Combination strategies.
//!
//! A strategy receives one keyed candidate list per element (in declaration
//! order) and returns mixes: each mix holds one `(key, candidate)` pair per
//! non-empty list, in the same order. Elements with empty lists are skipped.

use dtgen_data::RandomSource;
use tracing::debug;

use crate::options::CombinationOption;

/// A way of turning per-element candidate lists into mixes.
pub trait CombinationStrategy {
    fn combine<K: Clone, T: Clone>(&self, lists: &[(K, Vec<T>)], rng: &mut RandomSource) -> Vec<Vec<(K, T)>>;

    /// Name of this strategy (for tracing).
    fn name(&self) -> &'static str;
}

/// Cartesian product of all lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cartesian;

impl CombinationStrategy for Cartesian {
    fn combine<K: Clone, T: Clone>(&self, lists: &[(K, Vec<T>)], _rng: &mut RandomSource) -> Vec<Vec<(K, T)>> {
        let lists = non_empty(lists);
        if lists.is_empty() {
            return Vec::new();
        }
        let mut mixes: Vec<Vec<(K, T)>> = vec![Vec::with_capacity(lists.len())];
        for (key, list) in lists {
            let mut next = Vec::with_capacity(mixes.len() * list.len());
            for mix in &mixes {
                for item in list {
                    let mut extended = mix.clone();
                    extended.push((key.clone(), item.clone()));
                    next.push(extended);
                }
            }
            mixes = next;
        }
        mixes
    }

    fn name(&self) -> &'static str {
        CombinationOption::All.name()
    }
}

/// Round-robin: `max(len)` mixes, mix `i` takes entry `i mod len` of every list.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneWise;

impl CombinationStrategy for OneWise {
    fn combine<K: Clone, T: Clone>(&self, lists: &[(K, Vec<T>)], _rng: &mut RandomSource) -> Vec<Vec<(K, T)>> {
        round_robin(&non_empty(lists))
    }

    fn name(&self) -> &'static str {
        CombinationOption::OneWise.name()
    }
}

/// One-wise after an independent Fisher-Yates shuffle of every list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShuffledOneWise;

impl CombinationStrategy for ShuffledOneWise {
    fn combine<K: Clone, T: Clone>(&self, lists: &[(K, Vec<T>)], rng: &mut RandomSource) -> Vec<Vec<(K, T)>> {
        let shuffled: Vec<(K, Vec<T>)> = non_empty(lists)
            .into_iter()
            .map(|(key, list)| {
                let mut list = list.clone();
                shuffle(&mut list, rng);
                (key.clone(), list)
            })
            .collect();
        let refs: Vec<(&K, &Vec<T>)> = shuffled.iter().map(|(k, l)| (k, l)).collect();
        round_robin(&refs)
    }

    fn name(&self) -> &'static str {
        CombinationOption::ShuffledOneWise.name()
    }
}

/// Exactly one mix with one uniformly random entry per list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleRandomOfEach;

impl CombinationStrategy for SingleRandomOfEach {
    fn combine<K: Clone, T: Clone>(&self, lists: &[(K, Vec<T>)], rng: &mut RandomSource) -> Vec<Vec<(K, T)>> {
        let lists = non_empty(lists);
        if lists.is_empty() {
            return Vec::new();
        }
        let mix = lists
            .into_iter()
            .map(|(key, list)| {
                let index = rng.below_or_equal(list.len() as u64 - 1) as usize;
                (key.clone(), list[index].clone())
            })
            .collect();
        vec![mix]
    }

    fn name(&self) -> &'static str {
        CombinationOption::SingleRandomOfEach.name()
    }
}

/// Combine `lists` with the strategy an option names.
pub fn combine<K: Clone, T: Clone>(
    option: CombinationOption,
    lists: &[(K, Vec<T>)],
    rng: &mut RandomSource,
) -> Vec<Vec<(K, T)>> {
    match option {
        CombinationOption::All => Cartesian.combine(lists, rng),
        CombinationOption::OneWise => OneWise.combine(lists, rng),
        CombinationOption::ShuffledOneWise => ShuffledOneWise.combine(lists, rng),
        CombinationOption::SingleRandomOfEach => SingleRandomOfEach.combine(lists, rng),
    }
}

fn non_empty<K, T>(lists: &[(K, Vec<T>)]) -> Vec<(&K, &Vec<T>)> {
    let kept: Vec<_> = lists
        .iter()
        .filter(|(_, list)| !list.is_empty())
        .map(|(key, list)| (key, list))
        .collect();
    if kept.len() < lists.len() {
        debug!(skipped = lists.len() - kept.len(), "elements without candidates left out of the mix");
    }
    kept
}

fn round_robin<K: Clone, T: Clone>(lists: &[(&K, &Vec<T>)]) -> Vec<Vec<(K, T)>> {
    let rounds = lists.iter().map(|(_, list)| list.len()).max().unwrap_or(0);
    (0..rounds)
        .map(|i| {
            lists
                .iter()
                .map(|(key, list)| ((*key).clone(), list[i % list.len()].clone()))
                .collect()
        })
        .collect()
}

fn shuffle<T>(items: &mut [T], rng: &mut RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.below_or_equal(i as u64) as usize;
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn lists() -> Vec<(&'static str, Vec<u32>)> {
        vec![("a", vec![1, 2, 3]), ("b", vec![10, 20]), ("c", vec![])]
    }

    #[test]
    fn test_cartesian_product() {
        let mut rng = RandomSource::new(Some("all"));
        let mixes = Cartesian.combine(&lists(), &mut rng);
        assert_eq!(mixes.len(), 6);
        assert_eq!(mixes[0], vec![("a", 1), ("b", 10)]);
        assert_eq!(mixes[5], vec![("a", 3), ("b", 20)]);
    }

    #[test]
    fn test_one_wise_round_robin() {
        let mut rng = RandomSource::new(Some("ow"));
        let mixes = OneWise.combine(&lists(), &mut rng);
        assert_eq!(
            mixes,
            vec![
                vec![("a", 1), ("b", 10)],
                vec![("a", 2), ("b", 20)],
                vec![("a", 3), ("b", 10)],
            ]
        );
    }

    #[test]
    fn test_shuffled_one_wise_covers_every_value() {
        let mut rng = RandomSource::new(Some("sow"));
        let mixes = ShuffledOneWise.combine(&lists(), &mut rng);
        assert_eq!(mixes.len(), 3);
        let a: HashSet<u32> = mixes.iter().map(|m| m[0].1).collect();
        let b: HashSet<u32> = mixes.iter().map(|m| m[1].1).collect();
        assert_eq!(a, HashSet::from([1, 2, 3]));
        assert_eq!(b, HashSet::from([10, 20]));
    }

    #[test]
    fn test_single_random_of_each() {
        let mut rng = RandomSource::new(Some("sre"));
        let mixes = SingleRandomOfEach.combine(&lists(), &mut rng);
        assert_eq!(mixes.len(), 1);
        assert_eq!(mixes[0].len(), 2);
        assert!([1, 2, 3].contains(&mixes[0][0].1));
    }

    #[test]
    fn test_empty_input_yields_no_mixes() {
        let mut rng = RandomSource::new(Some("empty"));
        let empty: Vec<(&str, Vec<u32>)> = Vec::new();
        for option in [
            CombinationOption::All,
            CombinationOption::OneWise,
            CombinationOption::ShuffledOneWise,
            CombinationOption::SingleRandomOfEach,
        ] {
            assert!(combine(option, &empty, &mut rng).is_empty(), "{option}");
        }
    }

    #[test]
    fn test_same_seed_same_shuffle() {
        let run = || {
            let mut rng = RandomSource::new(Some("repeat"));
            ShuffledOneWise.combine(&lists(), &mut rng)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_strategy_names_follow_options() {
        assert_eq!(Cartesian.name(), CombinationOption::All.name());
        assert_eq!(OneWise.name(), "one-wise");
        assert_eq!(ShuffledOneWise.name(), CombinationOption::ShuffledOneWise.name());
        assert_eq!(SingleRandomOfEach.name(), "single-random-of-each");
    }
}

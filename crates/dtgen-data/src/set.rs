//! Set-based generators: positions inside an ordered candidate list, plus
//! values guaranteed to lie outside it.

use std::sync::Arc;

use dtgen_ir::{DataValue, SetCase};
use tracing::trace;

use crate::cache::{QueryCache, Queryable};
use crate::error::QueryError;
use crate::random::RandomSource;
use crate::raw::RawDataGenerator;

/// Default number of draws before `not_in_set` gives up.
pub const DEFAULT_NOT_IN_SET_TRIES: usize = 10;

/// Generator over a static, ordered candidate list.
#[derive(Debug, Clone)]
pub struct ListBasedGenerator {
    values: Vec<DataValue>,
    max_tries: usize,
}

impl ListBasedGenerator {
    pub fn new(values: Vec<DataValue>) -> Self {
        Self {
            values,
            max_tries: DEFAULT_NOT_IN_SET_TRIES,
        }
    }

    #[must_use]
    pub fn with_max_tries(mut self, max_tries: usize) -> Self {
        self.max_tries = max_tries;
        self
    }

    pub fn values(&self) -> &[DataValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: &DataValue) -> bool {
        self.values.contains(value)
    }

    pub fn first_element(&self) -> Option<DataValue> {
        self.values.first().cloned()
    }

    /// Requires at least two elements.
    pub fn second_element(&self) -> Option<DataValue> {
        if self.values.len() < 2 {
            return None;
        }
        self.values.get(1).cloned()
    }

    pub fn random_element(&self, rng: &mut RandomSource) -> Option<DataValue> {
        if self.values.is_empty() {
            return None;
        }
        let index = rng.below_or_equal(self.values.len() as u64 - 1) as usize;
        self.values.get(index).cloned()
    }

    /// Requires at least two elements.
    pub fn penultimate_element(&self) -> Option<DataValue> {
        if self.values.len() < 2 {
            return None;
        }
        self.values.get(self.values.len() - 2).cloned()
    }

    pub fn last_element(&self) -> Option<DataValue> {
        self.values.last().cloned()
    }

    /// A value of the element's type that is not in the list.
    ///
    /// Draws `random_between_min_and_max` from `raw` up to the configured
    /// number of tries; `None` when every draw landed inside the list.
    pub fn not_in_set(&self, raw: &dyn RawDataGenerator, rng: &mut RandomSource) -> Option<DataValue> {
        for attempt in 0..self.max_tries {
            let candidate = raw.random_between_min_and_max(rng);
            if !self.contains(&candidate) {
                return Some(candidate);
            }
            trace!(attempt, %candidate, "draw landed inside the set");
        }
        None
    }

    /// The list position a set case names. `NotInSet` names no position and
    /// always yields `None`.
    pub fn element(&self, case: SetCase, rng: &mut RandomSource) -> Option<DataValue> {
        match case {
            SetCase::FirstElement => self.first_element(),
            SetCase::RandomElement => self.random_element(rng),
            SetCase::LastElement => self.last_element(),
            SetCase::NotInSet => None,
        }
    }

    pub fn generate(&self, case: SetCase, raw: &dyn RawDataGenerator, rng: &mut RandomSource) -> Option<DataValue> {
        match case {
            SetCase::NotInSet => self.not_in_set(raw, rng),
            position => self.element(position, rng),
        }
    }
}

/// Generator whose candidate list is the first column of a query result.
///
/// Results are resolved through the run's [`QueryCache`]; every operation
/// mirrors [`ListBasedGenerator`] once the rows are in.
#[derive(Clone)]
pub struct QueryBasedGenerator {
    query: String,
    cache: Arc<QueryCache>,
    source: Arc<dyn Queryable>,
    max_tries: usize,
}

impl QueryBasedGenerator {
    pub fn new(query: &str, cache: Arc<QueryCache>, source: Arc<dyn Queryable>) -> Self {
        Self {
            query: query.to_string(),
            cache,
            source,
            max_tries: DEFAULT_NOT_IN_SET_TRIES,
        }
    }

    #[must_use]
    pub fn with_max_tries(mut self, max_tries: usize) -> Self {
        self.max_tries = max_tries;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Fetch (or reuse) the rows and expose them as a list generator.
    pub async fn resolve(&self) -> Result<ListBasedGenerator, QueryError> {
        let rows = self.cache.get_or_fetch(&self.query, self.source.as_ref()).await?;
        let values = rows.iter().filter_map(|row| row.first().cloned()).collect();
        Ok(ListBasedGenerator::new(values).with_max_tries(self.max_tries))
    }

    pub async fn first_element(&self) -> Result<Option<DataValue>, QueryError> {
        Ok(self.resolve().await?.first_element())
    }

    pub async fn second_element(&self) -> Result<Option<DataValue>, QueryError> {
        Ok(self.resolve().await?.second_element())
    }

    pub async fn random_element(&self, rng: &mut RandomSource) -> Result<Option<DataValue>, QueryError> {
        Ok(self.resolve().await?.random_element(rng))
    }

    pub async fn penultimate_element(&self) -> Result<Option<DataValue>, QueryError> {
        Ok(self.resolve().await?.penultimate_element())
    }

    pub async fn last_element(&self) -> Result<Option<DataValue>, QueryError> {
        Ok(self.resolve().await?.last_element())
    }

    pub async fn not_in_set(
        &self,
        raw: &dyn RawDataGenerator,
        rng: &mut RandomSource,
    ) -> Result<Option<DataValue>, QueryError> {
        Ok(self.resolve().await?.not_in_set(raw, rng))
    }

    pub async fn element(&self, case: SetCase, rng: &mut RandomSource) -> Result<Option<DataValue>, QueryError> {
        Ok(self.resolve().await?.element(case, rng))
    }

    pub async fn generate(
        &self,
        case: SetCase,
        raw: &dyn RawDataGenerator,
        rng: &mut RandomSource,
    ) -> Result<Option<DataValue>, QueryError> {
        Ok(self.resolve().await?.generate(case, raw, rng))
    }
}

impl std::fmt::Debug for QueryBasedGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBasedGenerator")
            .field("query", &self.query)
            .field("max_tries", &self.max_tries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Row;
    use crate::raw::{LongGenerator, StringGenerator};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn countries() -> ListBasedGenerator {
        ListBasedGenerator::new(
            ["Brazil", "Canada", "Japan"]
                .into_iter()
                .map(DataValue::from)
                .collect(),
        )
    }

    #[test]
    fn test_positions() {
        let set = countries();
        let mut rng = RandomSource::new(Some("set"));
        assert_eq!(set.first_element(), Some("Brazil".into()));
        assert_eq!(set.second_element(), Some("Canada".into()));
        assert_eq!(set.penultimate_element(), Some("Canada".into()));
        assert_eq!(set.last_element(), Some("Japan".into()));
        let picked = set.random_element(&mut rng).unwrap();
        assert!(set.contains(&picked));
    }

    #[test]
    fn test_single_element_set() {
        let set = ListBasedGenerator::new(vec![DataValue::Integer(7)]);
        assert_eq!(set.first_element(), set.last_element());
        assert_eq!(set.second_element(), None);
        assert_eq!(set.penultimate_element(), None);
    }

    #[test]
    fn test_empty_set_yields_nothing() {
        let set = ListBasedGenerator::new(vec![]);
        let mut rng = RandomSource::new(Some("empty"));
        assert_eq!(set.first_element(), None);
        assert_eq!(set.random_element(&mut rng), None);
        assert_eq!(set.last_element(), None);
    }

    #[test]
    fn test_not_in_set_is_outside() {
        let set = countries();
        let raw = StringGenerator::new(Some(1), Some(12)).unwrap();
        let mut rng = RandomSource::new(Some("outside"));
        for _ in 0..20 {
            let v = set.not_in_set(&raw, &mut rng).unwrap();
            assert!(!set.contains(&v));
        }
    }

    #[test]
    fn test_not_in_set_gives_up_when_range_is_covered() {
        let set = ListBasedGenerator::new((1..=3).map(DataValue::Integer).collect()).with_max_tries(5);
        let raw = LongGenerator::with_bounds(Some(0), Some(4)).unwrap();
        let mut rng = RandomSource::new(Some("covered"));
        assert_eq!(set.not_in_set(&raw, &mut rng), None);
    }

    struct Professions {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Queryable for Professions {
        async fn query(&self, _command: &str, _params: Option<&[DataValue]>) -> Result<Vec<Row>, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                vec!["Engineer".into(), DataValue::Integer(1)],
                vec!["Nurse".into(), DataValue::Integer(2)],
                vec![],
                vec!["Teacher".into(), DataValue::Integer(3)],
            ])
        }
    }

    #[tokio::test]
    async fn test_query_uses_first_column_and_cache() {
        let cache = Arc::new(QueryCache::new());
        let source = Arc::new(Professions {
            calls: AtomicUsize::new(0),
        });
        let gen = QueryBasedGenerator::new("SELECT name, id FROM profession", cache.clone(), source.clone());

        assert_eq!(gen.first_element().await.unwrap(), Some("Engineer".into()));
        assert_eq!(gen.last_element().await.unwrap(), Some("Teacher".into()));
        assert_eq!(gen.penultimate_element().await.unwrap(), Some("Nurse".into()));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(cache.has("SELECT name, id FROM profession"));
    }
}

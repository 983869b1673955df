//! Query result cache shared by every query-based set generator of a run.
//!
//! Each query string owns a [`OnceCell`]: concurrent requests for the same
//! query wait on one in-flight fetch instead of issuing duplicates. A failed
//! fetch leaves the cell empty, so failures are never cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dtgen_ir::DataValue;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::QueryError;

/// One result row; the first column carries the candidate value.
pub type Row = Vec<DataValue>;
pub type Rows = Arc<Vec<Row>>;

/// A data source that can answer candidate queries.
#[async_trait]
pub trait Queryable: Send + Sync {
    async fn query(&self, command: &str, params: Option<&[DataValue]>) -> Result<Vec<Row>, QueryError>;
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<Rows>>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a completed result is stored. In-flight queries report `false`.
    pub fn has(&self, query: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .get(query)
            .is_some_and(|cell| cell.initialized())
    }

    pub fn put(&self, query: &str, rows: Vec<Row>) {
        let cell = OnceCell::new_with(Some(Arc::new(rows)));
        self.entries
            .lock()
            .unwrap()
            .insert(query.to_string(), Arc::new(cell));
    }

    pub fn get(&self, query: &str) -> Option<Rows> {
        self.entries
            .lock()
            .unwrap()
            .get(query)
            .and_then(|cell| cell.get().cloned())
    }

    pub fn remove(&self, query: &str) -> Option<Rows> {
        self.entries
            .lock()
            .unwrap()
            .remove(query)
            .and_then(|cell| cell.get().cloned())
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Number of completed results.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached rows for `query`, running it against `source` on a miss.
    pub async fn get_or_fetch(&self, query: &str, source: &dyn Queryable) -> Result<Rows, QueryError> {
        let cell = {
            let mut entries = self.entries.lock().unwrap();
            Arc::clone(entries.entry(query.to_string()).or_default())
        };
        let rows = cell
            .get_or_try_init(|| async {
                debug!(query, "cache miss, running query");
                source.query(query, None).await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingSource {
        calls: AtomicUsize,
        fail_first: bool,
    }

    #[async_trait]
    impl Queryable for CountingSource {
        async fn query(&self, command: &str, _params: Option<&[DataValue]>) -> Result<Vec<Row>, QueryError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            if self.fail_first && n == 0 {
                return Err(QueryError::Failed {
                    query: command.to_string(),
                    message: "connection reset".into(),
                });
            }
            Ok(vec![vec![DataValue::from("a")], vec![DataValue::from("b")]])
        }
    }

    #[test]
    fn test_put_get_remove() {
        let cache = QueryCache::new();
        assert!(!cache.has("q"));
        cache.put("q", vec![vec![DataValue::Integer(1)]]);
        assert!(cache.has("q"));
        assert_eq!(cache.get("q").unwrap().len(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.remove("q").is_some());
        assert!(cache.get("q").is_none());
        cache.put("x", vec![]);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_one_fetch() {
        let cache = Arc::new(QueryCache::new());
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail_first: false,
        });

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let source = Arc::clone(&source);
            handles.push(tokio::spawn(async move {
                cache.get_or_fetch("SELECT x", source.as_ref()).await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().len(), 2);
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_not_cached() {
        let cache = QueryCache::new();
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            fail_first: true,
        };
        assert!(cache.get_or_fetch("q", &source).await.is_err());
        assert!(!cache.has("q"));
        assert!(cache.get_or_fetch("q", &source).await.is_ok());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}

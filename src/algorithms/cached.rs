use std::time::Duration;

use tracing::debug;

use crate::algorithms::RankingEngine;
use crate::error::RankingError;
use crate::models::{CostRecord, RankingRow, WeightConfig};
use crate::utils::cache::TtlCache;
use crate::utils::fingerprint::fingerprint;

/// Memoizes another ranking engine by a fingerprint of its inputs
pub struct CachedRanker<E> {
    inner: E,
    cache: TtlCache<String, Vec<RankingRow>>,
}

impl<E: RankingEngine> CachedRanker<E> {
    /// Wraps `inner`, keeping results for `ttl`
    pub fn new(inner: E, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Number of cached rankings, expired ones included until the next miss
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Forgets every cached ranking, e.g. after cost data was saved
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

impl<E: RankingEngine> RankingEngine for CachedRanker<E> {
    fn rank(
        &self,
        records: &[CostRecord],
        weights: &WeightConfig,
    ) -> Result<Vec<RankingRow>, RankingError> {
        let key = fingerprint(records, weights);
        self.cache.get_or_try_insert_with(key.clone(), || {
            debug!(key = %key, "ranking cache miss");
            self.inner.rank(records, weights)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::kpi_ranking::KpiRanker;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how often the wrapped engine actually runs
    struct CountingEngine {
        calls: AtomicUsize,
    }

    impl RankingEngine for CountingEngine {
        fn rank(
            &self,
            records: &[CostRecord],
            weights: &WeightConfig,
        ) -> Result<Vec<RankingRow>, RankingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            KpiRanker::new().rank(records, weights)
        }
    }

    fn counting() -> CountingEngine {
        CountingEngine {
            calls: AtomicUsize::new(0),
        }
    }

    fn records() -> Vec<CostRecord> {
        vec![
            CostRecord::from_total_cost("A", 100.0, 50.0),
            CostRecord::from_total_cost("B", 200.0, 50.0),
        ]
    }

    #[test]
    fn test_repeated_rank_hits_cache() {
        let ranker = CachedRanker::new(counting(), Duration::from_secs(60));
        let first = ranker.rank(&records(), &WeightConfig::default()).unwrap();
        let second = ranker.rank(&records(), &WeightConfig::default()).unwrap();

        assert_eq!(first, second);
        assert_eq!(ranker.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_new_weights_miss_cache() {
        let ranker = CachedRanker::new(counting(), Duration::from_secs(60));
        ranker.rank(&records(), &WeightConfig::new(50.0, 50.0)).unwrap();
        ranker.rank(&records(), &WeightConfig::new(25.0, 75.0)).unwrap();

        assert_eq!(ranker.inner().calls.load(Ordering::SeqCst), 2);
        assert_eq!(ranker.cached_entries(), 2);
    }

    #[test]
    fn test_errors_not_cached() {
        let ranker = CachedRanker::new(counting(), Duration::from_secs(60));
        assert!(ranker.rank(&[], &WeightConfig::default()).is_err());
        assert!(ranker.rank(&[], &WeightConfig::default()).is_err());

        assert_eq!(ranker.inner().calls.load(Ordering::SeqCst), 2);
        assert_eq!(ranker.cached_entries(), 0);
    }

    #[test]
    fn test_expired_rankings_do_not_accumulate() {
        let ranker = CachedRanker::new(counting(), Duration::ZERO);
        for weights in WeightConfig::slider_presets() {
            ranker.rank(&records(), &weights).unwrap();
        }
        assert_eq!(ranker.inner().calls.load(Ordering::SeqCst), 5);
        assert_eq!(ranker.cached_entries(), 1);
    }

    #[test]
    fn test_invalidate() {
        let ranker = CachedRanker::new(counting(), Duration::from_secs(60));
        ranker.rank(&records(), &WeightConfig::default()).unwrap();
        ranker.invalidate();
        ranker.rank(&records(), &WeightConfig::default()).unwrap();

        assert_eq!(ranker.inner().calls.load(Ordering::SeqCst), 2);
    }
}

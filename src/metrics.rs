use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Performance counters for the search
///
/// Compiled only with the `metrics` feature.
/// Counters are relaxed atomics so parallel descents can record without locks.
#[derive(Debug, Default)]
pub struct SearchMetrics {
    // Node table
    pub table_hits: AtomicU64,
    pub table_misses: AtomicU64,

    // Expansion
    pub expansions: AtomicU64,
    pub terminal_hits: AtomicU64,
    pub evaluator_calls: AtomicU64,
    pub uniform_fallbacks: AtomicU64,

    // Depth
    pub simulations: AtomicU64,
    pub total_depth: AtomicU64,
    pub max_depth: AtomicUsize,

    pub search_duration_ns: AtomicU64,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        for counter in [
            &self.table_hits,
            &self.table_misses,
            &self.expansions,
            &self.terminal_hits,
            &self.evaluator_calls,
            &self.uniform_fallbacks,
            &self.simulations,
            &self.total_depth,
            &self.search_duration_ns,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        self.max_depth.store(0, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn record_table_lookup(&self, hit: bool) {
        if hit {
            self.table_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.table_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline(always)]
    pub fn record_expansion(&self, uniform_fallback: bool) {
        self.expansions.fetch_add(1, Ordering::Relaxed);
        self.evaluator_calls.fetch_add(1, Ordering::Relaxed);
        if uniform_fallback {
            self.uniform_fallbacks.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline(always)]
    pub fn record_terminal(&self) {
        self.terminal_hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn record_simulation(&self, depth: usize) {
        self.simulations.fetch_add(1, Ordering::Relaxed);
        self.total_depth.fetch_add(depth as u64, Ordering::Relaxed);
        self.max_depth.fetch_max(depth, Ordering::Relaxed);
    }

    pub fn record_duration(&self, elapsed: Duration) {
        self.search_duration_ns
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.table_hits.load(Ordering::Relaxed);
        let misses = self.table_misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn average_depth(&self) -> f64 {
        let sims = self.simulations.load(Ordering::Relaxed);
        if sims == 0 {
            0.0
        } else {
            self.total_depth.load(Ordering::Relaxed) as f64 / sims as f64
        }
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        let secs = self.search_duration_ns.load(Ordering::Relaxed) as f64 / 1e9;
        let sims = self.simulations.load(Ordering::Relaxed);
        format!(
            "{} sims in {:.3}s, {} expansions ({} uniform fallbacks), {} terminal, \
             hit rate {:.1}%, depth avg {:.1} max {}",
            sims,
            secs,
            self.expansions.load(Ordering::Relaxed),
            self.uniform_fallbacks.load(Ordering::Relaxed),
            self.terminal_hits.load(Ordering::Relaxed),
            self.cache_hit_rate() * 100.0,
            self.average_depth(),
            self.max_depth.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_summary() {
        let metrics = SearchMetrics::new();
        metrics.record_table_lookup(true);
        metrics.record_table_lookup(false);
        metrics.record_expansion(true);
        metrics.record_simulation(3);
        metrics.record_simulation(5);

        assert!((metrics.cache_hit_rate() - 0.5).abs() < 1e-9);
        assert!((metrics.average_depth() - 4.0).abs() < 1e-9);
        assert_eq!(metrics.max_depth.load(Ordering::Relaxed), 5);
        assert!(metrics.summary().contains("2 sims"));

        metrics.reset();
        assert_eq!(metrics.simulations.load(Ordering::Relaxed), 0);
    }
}

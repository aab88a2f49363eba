use std::time::Duration;

/// A 'snapshot' of what the collector has done so far.
///
/// Obtained by calling [`crate::Collector::metrics`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GcMetrics {
    /// Number of collections that have run, of either algorithm.
    pub collections: u64,

    /// Collections that swept the whole space. Every mark-and-sweep run
    /// counts, as does a generational run whose major pass fired.
    pub major_collections: u64,

    /// Generational runs that only swept the young generation.
    pub minor_collections: u64,

    pub reclaimed_blocks: u64,

    /// Total address units returned to the space.
    pub reclaimed_memory: u64,

    pub promoted_blocks: u64,

    pub last_collect_time: Duration,

    pub avg_collect_time: Duration,
}

impl GcMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(
        &mut self,
        major: bool,
        reclaimed_blocks: usize,
        reclaimed_memory: usize,
        promoted_blocks: usize,
        elapsed: Duration,
    ) {
        self.collections += 1;
        if major {
            self.major_collections += 1;
        } else {
            self.minor_collections += 1;
        }

        self.reclaimed_blocks += reclaimed_blocks as u64;
        self.reclaimed_memory += reclaimed_memory as u64;
        self.promoted_blocks += promoted_blocks as u64;
        self.last_collect_time = elapsed;
        self.avg_collect_time = update_avg(self.avg_collect_time, elapsed, self.collections);
    }
}

// Incremental mean, where `sample_size` already includes `new_value`.
pub fn update_avg(running_avg: Duration, new_value: Duration, sample_size: u64) -> Duration {
    if sample_size == 0 {
        return running_avg;
    }

    let avg = running_avg.as_secs_f64();
    let new_avg = avg + (new_value.as_secs_f64() - avg) / sample_size as f64;

    Duration::from_secs_f64(new_avg.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_metrics() {
        let metrics = GcMetrics::new();

        assert_eq!(metrics.collections, 0);
        assert_eq!(metrics.reclaimed_memory, 0);
        assert_eq!(metrics.avg_collect_time, Duration::ZERO);
    }

    #[test]
    fn average_tracks_the_mean() {
        let mut avg = Duration::ZERO;
        avg = update_avg(avg, Duration::from_millis(10), 1);
        avg = update_avg(avg, Duration::from_millis(20), 2);
        avg = update_avg(avg, Duration::from_millis(30), 3);

        assert!((avg.as_secs_f64() - 0.020).abs() < 1e-9);
    }

    #[test]
    fn record_splits_major_and_minor() {
        let mut metrics = GcMetrics::new();
        metrics.record(true, 2, 7, 0, Duration::from_millis(1));
        metrics.record(false, 1, 3, 4, Duration::from_millis(3));

        assert_eq!(metrics.collections, 2);
        assert_eq!(metrics.major_collections, 1);
        assert_eq!(metrics.minor_collections, 1);
        assert_eq!(metrics.reclaimed_blocks, 3);
        assert_eq!(metrics.reclaimed_memory, 10);
        assert_eq!(metrics.promoted_blocks, 4);
        assert_eq!(metrics.last_collect_time, Duration::from_millis(3));
    }
}

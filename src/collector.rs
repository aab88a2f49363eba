use super::algorithm::{generational, mark_and_sweep, Sweep};
use super::block::{Block, BlockId};
use super::config::{clamp_threshold, Algorithm, GcConfig};
use super::metrics::GcMetrics;
use super::space::AddressSpace;
use super::trigger::{MajorTrigger, RandomTrigger};
use log::debug;
use std::time::{Duration, Instant};

/// The outcome of one collection.
#[derive(Clone, Debug)]
pub struct CollectionResult {
    pub algorithm: Algorithm,
    /// Freed blocks as they were just before being freed.
    pub reclaimed: Vec<Block>,
    pub reclaimed_memory: usize,
    /// Blocks moved to the old generation by this run.
    pub promoted: Vec<BlockId>,
    pub major: bool,
    pub duration: Duration,
}

impl CollectionResult {
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Holds collection policy and runs the configured algorithm against an
/// [`AddressSpace`].
///
/// The collector owns no blocks. Every call borrows the space for its whole
/// duration, so partially marked or swept states are never visible to
/// callers.
pub struct Collector {
    algorithm: Algorithm,
    threshold: u32,
    auto_collect: bool,
    young_gen_max_age: Duration,
    major_trigger: Box<dyn MajorTrigger>,
    metrics: GcMetrics,
}

impl Collector {
    pub fn new(config: &GcConfig) -> Self {
        let config = config.normalized();
        let trigger = match config.seed {
            Some(seed) => RandomTrigger::seeded(seed, config.major_collection_probability),
            None => RandomTrigger::new(config.major_collection_probability),
        };

        Self::with_trigger(&config, Box::new(trigger))
    }

    /// Builds a collector whose major collection gate is `trigger` instead of
    /// a random draw.
    pub fn with_trigger(config: &GcConfig, trigger: Box<dyn MajorTrigger>) -> Self {
        let config = config.normalized();

        Self {
            algorithm: config.algorithm,
            threshold: config.auto_collect_threshold,
            auto_collect: config.auto_collect,
            young_gen_max_age: config.young_gen_max_age,
            major_trigger: trigger,
            metrics: GcMetrics::new(),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, percent: u32) {
        self.threshold = clamp_threshold(percent);
    }

    pub fn auto_collect_enabled(&self) -> bool {
        self.auto_collect
    }

    pub fn set_auto_collect(&mut self, enabled: bool) {
        self.auto_collect = enabled;
    }

    pub fn young_gen_max_age(&self) -> Duration {
        self.young_gen_max_age
    }

    pub fn set_young_gen_max_age(&mut self, max_age: Duration) {
        self.young_gen_max_age = max_age;
    }

    pub fn set_major_trigger(&mut self, trigger: Box<dyn MajorTrigger>) {
        self.major_trigger = trigger;
    }

    pub fn metrics(&self) -> GcMetrics {
        self.metrics
    }

    /// Runs the current algorithm once.
    pub fn run_collection(&mut self, space: &mut AddressSpace) -> CollectionResult {
        debug!("starting {:?} collection", self.algorithm);

        let start_time = Instant::now();
        let sweep = match self.algorithm {
            Algorithm::MarkSweep => mark_and_sweep(space),
            Algorithm::Generational => generational(
                space,
                start_time,
                self.young_gen_max_age,
                self.major_trigger.as_mut(),
            ),
        };
        let duration = start_time.elapsed();

        self.finish(sweep, duration)
    }

    fn finish(&mut self, sweep: Sweep, duration: Duration) -> CollectionResult {
        let Sweep {
            reclaimed,
            promoted,
            major,
        } = sweep;
        let reclaimed_memory = reclaimed.iter().map(Block::size).sum();

        self.metrics.record(
            major,
            reclaimed.len(),
            reclaimed_memory,
            promoted.len(),
            duration,
        );

        debug!(
            "{:?} collection finished in {:?}: {} blocks ({} units) reclaimed",
            self.algorithm,
            duration,
            reclaimed.len(),
            reclaimed_memory
        );

        CollectionResult {
            algorithm: self.algorithm,
            reclaimed,
            reclaimed_memory,
            promoted,
            major,
            duration,
        }
    }

    /// Collects if auto collection is on and usage has reached the
    /// threshold. Does nothing on its own schedule: callers poll this.
    pub fn check_auto_collect(&mut self, space: &mut AddressSpace) -> Option<CollectionResult> {
        if !self.auto_collect {
            return None;
        }

        let used_percent = space.stats().used_percent();
        if used_percent >= f64::from(self.threshold) {
            debug!(
                "memory usage {:.1}% reached threshold {}%",
                used_percent, self.threshold
            );
            Some(self.run_collection(space))
        } else {
            None
        }
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("algorithm", &self.algorithm)
            .field("threshold", &self.threshold)
            .field("auto_collect", &self.auto_collect)
            .field("young_gen_max_age", &self.young_gen_max_age)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

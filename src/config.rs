use std::time::Duration;

/// Which reclamation strategy a collection runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    MarkSweep,
    Generational,
}

/// This structure contains the configuration settings for a simulation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GcConfig {
    /// Capacity of the address space, in address units.
    pub total_size: usize,
    /// The algorithm used by `run_collection`.
    pub algorithm: Algorithm,
    /// Percentage of the space that must be in use before an auto collection
    /// fires. Clamped to [1, 100].
    pub auto_collect_threshold: u32,
    pub auto_collect: bool,
    /// A young block older than this is promoted by the next generational
    /// collection.
    pub young_gen_max_age: Duration,
    /// Chance that a generational collection also sweeps the old generation.
    pub major_collection_probability: f64,
    /// Seed for the major collection draw. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// The amount of milliseconds the monitor waits between auto collect checks.
    pub monitor_wait_time: u64,
}

pub const GC_CONFIG_DEFAULT_TOTAL_SIZE: usize = 100;
pub const GC_CONFIG_DEFAULT_THRESHOLD: u32 = 70;
pub const GC_CONFIG_DEFAULT_YOUNG_GEN_MAX_AGE: Duration = Duration::from_secs(5);
pub const GC_CONFIG_DEFAULT_MAJOR_PROBABILITY: f64 = 0.25;
pub const GC_CONFIG_DEFAULT_MONITOR_WAIT_TIME: u64 = 10;

pub const MIN_THRESHOLD: u32 = 1;
pub const MAX_THRESHOLD: u32 = 100;

impl Default for GcConfig {
    fn default() -> Self {
        GcConfig {
            total_size: GC_CONFIG_DEFAULT_TOTAL_SIZE,
            algorithm: Algorithm::MarkSweep,
            auto_collect_threshold: GC_CONFIG_DEFAULT_THRESHOLD,
            auto_collect: false,
            young_gen_max_age: GC_CONFIG_DEFAULT_YOUNG_GEN_MAX_AGE,
            major_collection_probability: GC_CONFIG_DEFAULT_MAJOR_PROBABILITY,
            seed: None,
            monitor_wait_time: GC_CONFIG_DEFAULT_MONITOR_WAIT_TIME,
        }
    }
}

impl GcConfig {
    /// Returns a copy with every value pulled into its legal range.
    pub fn normalized(mut self) -> Self {
        self.auto_collect_threshold = clamp_threshold(self.auto_collect_threshold);
        self.major_collection_probability = if self.major_collection_probability.is_nan() {
            0.0
        } else {
            self.major_collection_probability.clamp(0.0, 1.0)
        };
        self
    }
}

pub fn clamp_threshold(percent: u32) -> u32 {
    percent.clamp(MIN_THRESHOLD, MAX_THRESHOLD)
}

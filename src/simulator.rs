use super::block::{Block, BlockId};
use super::collector::{CollectionResult, Collector};
use super::config::{Algorithm, GcConfig};
use super::error::AllocError;
use super::metrics::GcMetrics;
use super::space::{AddressSpace, SpaceStats};
use super::trigger::MajorTrigger;

/// An address space paired with the collector that reclaims it.
///
/// This is the whole command and query surface a front end needs.
///
/// # Examples
///
/// ```
/// use heapsim::{Algorithm, BlockStatus, GcConfig, Simulator};
///
/// let mut sim = Simulator::new(GcConfig::default());
/// let a = sim.allocate(10).unwrap();
/// let b = sim.allocate(20).unwrap();
///
/// sim.mark_as_garbage(a.id());
/// let result = sim.run_collection();
///
/// assert_eq!(result.reclaimed_memory, 10);
/// assert_eq!(sim.list_blocks().len(), 1);
/// assert_eq!(sim.block(b.id()).unwrap().status(), BlockStatus::Allocated);
/// assert_eq!(sim.current_algorithm(), Algorithm::MarkSweep);
/// ```
#[derive(Debug)]
pub struct Simulator {
    space: AddressSpace,
    collector: Collector,
    // Collection policy lives in `collector` only.
    monitor_wait_time: u64,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(GcConfig::default())
    }
}

impl Simulator {
    pub fn new(config: GcConfig) -> Self {
        let config = config.normalized();

        Self {
            space: AddressSpace::new(config.total_size),
            collector: Collector::new(&config),
            monitor_wait_time: config.monitor_wait_time,
        }
    }

    /// Creates a simulator whose generational collector consults `trigger`
    /// for major collections.
    pub fn with_trigger(config: GcConfig, trigger: Box<dyn MajorTrigger>) -> Self {
        let config = config.normalized();

        Self {
            space: AddressSpace::new(config.total_size),
            collector: Collector::with_trigger(&config, trigger),
            monitor_wait_time: config.monitor_wait_time,
        }
    }

    /// Milliseconds a background monitor waits between auto collect checks.
    pub fn monitor_wait_time(&self) -> u64 {
        self.monitor_wait_time
    }

    pub fn space(&self) -> &AddressSpace {
        &self.space
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    pub fn list_blocks(&self) -> &[Block] {
        self.space.blocks()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.space.block(id)
    }

    pub fn stats(&self) -> SpaceStats {
        self.space.stats()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.space.selected_block()
    }

    pub fn current_algorithm(&self) -> Algorithm {
        self.collector.algorithm()
    }

    pub fn threshold(&self) -> u32 {
        self.collector.threshold()
    }

    pub fn auto_collect_enabled(&self) -> bool {
        self.collector.auto_collect_enabled()
    }

    pub fn metrics(&self) -> GcMetrics {
        self.collector.metrics()
    }

    pub fn allocate(&mut self, size: i64) -> Result<Block, AllocError> {
        self.space.allocate(size)
    }

    pub fn mark_as_garbage(&mut self, id: BlockId) -> bool {
        self.space.mark_as_garbage(id)
    }

    pub fn select(&mut self, id: BlockId) -> bool {
        self.space.select(id)
    }

    pub fn deselect_all(&mut self) {
        self.space.deselect_all()
    }

    pub fn compact(&mut self) {
        self.space.compact()
    }

    /// Empties the address space. Collector policy and metrics are kept.
    pub fn reset(&mut self) {
        self.space.reset()
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.collector.set_algorithm(algorithm)
    }

    pub fn set_threshold(&mut self, percent: u32) {
        self.collector.set_threshold(percent)
    }

    pub fn set_auto_collect(&mut self, enabled: bool) {
        self.collector.set_auto_collect(enabled)
    }

    pub fn run_collection(&mut self) -> CollectionResult {
        self.collector.run_collection(&mut self.space)
    }

    pub fn check_auto_collect(&mut self) -> Option<CollectionResult> {
        self.collector.check_auto_collect(&mut self.space)
    }
}

//! A simulated heap for watching garbage collectors work.
//!
//! An [`AddressSpace`] is a fixed size run of address units into which
//! variable sized blocks are placed first-fit. Blocks are flagged as garbage
//! by the caller, and a [`Collector`] reclaims them with either a
//! mark-and-sweep pass or a generational pass that only occasionally sweeps
//! the old generation.
//!
//! Marking here does not trace a reference graph. Every allocated block is
//! treated as reachable, and only blocks explicitly flagged as garbage are
//! ever reclaimed.
//!
//! ```rust
//! use heapsim::{Algorithm, AlwaysMajor, GcConfig, Generation, Simulator};
//! use std::time::Duration;
//!
//! let config = GcConfig {
//!     algorithm: Algorithm::Generational,
//!     young_gen_max_age: Duration::ZERO,
//!     ..GcConfig::default()
//! };
//! let mut sim = Simulator::with_trigger(config, Box::new(AlwaysMajor));
//!
//! let kept = sim.allocate(8).unwrap();
//! let dropped = sim.allocate(4).unwrap();
//! sim.mark_as_garbage(dropped.id());
//!
//! std::thread::sleep(Duration::from_millis(2));
//! let result = sim.run_collection();
//!
//! assert_eq!(result.reclaimed_memory, 4);
//! assert_eq!(sim.block(kept.id()).unwrap().generation(), Generation::Old);
//! ```
//!
//! Allocation failures are reported as values, never panics:
//! ```
//! use heapsim::{AllocError, GcConfig, Simulator};
//!
//! let mut sim = Simulator::new(GcConfig { total_size: 10, ..GcConfig::default() });
//!
//! assert_eq!(sim.allocate(0), Err(AllocError::InvalidSize { requested: 0 }));
//! assert_eq!(
//!     sim.allocate(11),
//!     Err(AllocError::ExceedsCapacity { requested: 11, capacity: 10 })
//! );
//! ```
mod algorithm;
mod block;
mod collector;
mod config;
mod error;
mod metrics;
#[cfg(feature = "multi_threaded")]
mod monitor;
mod simulator;
mod space;
mod trigger;

pub use block::{Block, BlockId, BlockStatus, Generation};
pub use collector::{CollectionResult, Collector};
pub use config::{Algorithm, GcConfig};
pub use error::AllocError;
pub use metrics::GcMetrics;
#[cfg(feature = "multi_threaded")]
pub use monitor::{Monitor, SharedSimulator};
pub use simulator::Simulator;
pub use space::{AddressSpace, Gap, SpaceStats};
pub use trigger::{AlwaysMajor, MajorTrigger, NeverMajor, RandomTrigger};

#[cfg(test)]
mod test;

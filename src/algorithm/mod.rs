mod generational;
mod mark_sweep;

pub use generational::generational;
pub use mark_sweep::mark_and_sweep;

use crate::block::{Block, BlockId};

/// What a single algorithm run did to the space.
#[derive(Debug, Default)]
pub struct Sweep {
    /// Freed blocks, in the order they were freed.
    pub reclaimed: Vec<Block>,
    pub promoted: Vec<BlockId>,
    /// Whether the whole space was swept rather than just the young
    /// generation.
    pub major: bool,
}

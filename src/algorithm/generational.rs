use super::Sweep;
use crate::block::{Block, BlockId, BlockStatus, Generation};
use crate::space::AddressSpace;
use crate::trigger::MajorTrigger;
use log::trace;
use std::time::{Duration, Instant};

/// Runs one generational collection as of `now`.
///
/// Allocated young blocks older than `max_age` are promoted first. Then young
/// garbage is always swept, and old garbage is swept only when `trigger` fires.
pub fn generational(
    space: &mut AddressSpace,
    now: Instant,
    max_age: Duration,
    trigger: &mut dyn MajorTrigger,
) -> Sweep {
    let promoted: Vec<BlockId> = select(space, |block| {
        block.generation() == Generation::Young
            && block.status() == BlockStatus::Allocated
            && block.age(now) > max_age
    })
    .into_iter()
    .filter(|id| space.promote(*id))
    .collect();

    let mut reclaimed = free_garbage(space, Generation::Young);

    let major = trigger.should_collect_major();
    if major {
        reclaimed.extend(free_garbage(space, Generation::Old));
    }

    trace!(
        "generational: {} promoted, {} reclaimed, major: {}",
        promoted.len(),
        reclaimed.len(),
        major
    );

    Sweep {
        reclaimed,
        promoted,
        major,
    }
}

fn free_garbage(space: &mut AddressSpace, generation: Generation) -> Vec<Block> {
    select(space, |block| {
        block.generation() == generation && block.status() == BlockStatus::Garbage
    })
    .into_iter()
    .filter_map(|id| space.free(id))
    .collect()
}

fn select<F: Fn(&Block) -> bool>(space: &AddressSpace, predicate: F) -> Vec<BlockId> {
    space
        .blocks()
        .iter()
        .filter(|&block| predicate(block))
        .map(Block::id)
        .collect()
}

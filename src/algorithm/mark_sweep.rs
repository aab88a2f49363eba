use super::Sweep;
use crate::block::{Block, BlockId, BlockStatus};
use crate::space::AddressSpace;
use log::trace;

/// Runs one mark-and-sweep cycle.
///
/// There is no reference graph, so every allocated block counts as reachable.
/// Only blocks already flagged as garbage are reclaimed. They are swept in
/// address order.
pub fn mark_and_sweep(space: &mut AddressSpace) -> Sweep {
    let marked = mark(space);
    let reclaimed = sweep(space);

    for id in ids_with_status(space, BlockStatus::Marked) {
        space.unmark(id);
    }

    trace!(
        "mark and sweep: {} marked, {} reclaimed",
        marked,
        reclaimed.len()
    );

    Sweep {
        reclaimed,
        promoted: vec![],
        major: true,
    }
}

fn mark(space: &mut AddressSpace) -> usize {
    ids_with_status(space, BlockStatus::Allocated)
        .into_iter()
        .filter(|id| space.mark(*id))
        .count()
}

fn sweep(space: &mut AddressSpace) -> Vec<Block> {
    ids_with_status(space, BlockStatus::Garbage)
        .into_iter()
        .filter_map(|id| space.free(id))
        .collect()
}

fn ids_with_status(space: &AddressSpace, status: BlockStatus) -> Vec<BlockId> {
    space
        .blocks()
        .iter()
        .filter(|block| block.status() == status)
        .map(Block::id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweeps_only_garbage() {
        let mut space = AddressSpace::new(20);
        let a = space.allocate(3).unwrap().id();
        let b = space.allocate(4).unwrap().id();
        let c = space.allocate(5).unwrap().id();
        space.mark_as_garbage(b);

        let sweep = mark_and_sweep(&mut space);

        assert!(sweep.major);
        assert_eq!(sweep.reclaimed.len(), 1);
        assert_eq!(sweep.reclaimed[0].id(), b);
        assert!(space.block(b).is_none());
        assert_eq!(space.block(a).unwrap().status(), BlockStatus::Allocated);
        assert_eq!(space.block(c).unwrap().status(), BlockStatus::Allocated);
    }

    #[test]
    fn reclaims_in_address_order() {
        let mut space = AddressSpace::new(20);
        let a = space.allocate(3).unwrap().id();
        let b = space.allocate(3).unwrap().id();
        space.free(a);
        // lands in the leading gap, ahead of b
        let c = space.allocate(2).unwrap().id();
        space.mark_as_garbage(b);
        space.mark_as_garbage(c);

        let ids: Vec<BlockId> = mark_and_sweep(&mut space)
            .reclaimed
            .iter()
            .map(Block::id)
            .collect();

        assert_eq!(ids, vec![c, b]);
        assert!(space.blocks().is_empty());
    }

    #[test]
    fn empty_space() {
        let mut space = AddressSpace::new(10);
        let sweep = mark_and_sweep(&mut space);

        assert!(sweep.reclaimed.is_empty());
    }
}

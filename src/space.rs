use super::block::{Block, BlockId, BlockStatus};
use super::error::AllocError;
use log::{debug, trace};
use std::time::Instant;

/// A maximal run of unallocated addresses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Gap {
    pub start: usize,
    pub size: usize,
}

/// A snapshot of how the space is being used.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpaceStats {
    pub total: usize,
    pub used: usize,
    pub free: usize,
    /// Percentage of free memory that is split across more than one gap.
    pub fragmentation: u32,
}

impl SpaceStats {
    pub fn used_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        (self.used as f64 / self.total as f64) * 100.0
    }
}

/// A fixed size linear address space.
///
/// Blocks are kept in a single vector ordered by ascending `start`. There is no
/// free list: gaps are recomputed from the block layout whenever they are
/// needed.
#[derive(Debug)]
pub struct AddressSpace {
    total_size: usize,
    blocks: Vec<Block>,
    next_id: BlockId,
}

const FIRST_BLOCK_ID: BlockId = 1;

impl AddressSpace {
    pub fn new(total_size: usize) -> Self {
        Self {
            total_size,
            blocks: vec![],
            next_id: FIRST_BLOCK_ID,
        }
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// All blocks in ascending address order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id() == id)
    }

    fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.id() == id)
    }

    pub fn used(&self) -> usize {
        self.blocks.iter().map(Block::size).sum()
    }

    pub fn free_memory(&self) -> usize {
        self.total_size - self.used()
    }

    /// Places a new block of `size` units using first-fit.
    pub fn allocate(&mut self, size: i64) -> Result<Block, AllocError> {
        if size <= 0 {
            return Err(AllocError::InvalidSize { requested: size });
        }

        let requested = usize::try_from(size).unwrap_or(usize::MAX);
        if requested > self.total_size {
            return Err(AllocError::ExceedsCapacity {
                requested,
                capacity: self.total_size,
            });
        }

        let available = self.free_memory();
        if requested > available {
            return Err(AllocError::InsufficientFreeMemory {
                requested,
                available,
            });
        }

        let gap = match self.first_fit(requested) {
            Some(gap) => gap,
            None => {
                return Err(AllocError::Fragmented {
                    requested,
                    largest_gap: self.largest_gap(),
                })
            }
        };

        let block = Block::new(self.next_id, requested, gap.start, Instant::now());
        self.next_id += 1;

        let index = self.blocks.partition_point(|b| b.start() < gap.start);
        self.blocks.insert(index, block.clone());

        trace!(
            "allocated block {} at [{}, {}] (gap of {} at {})",
            block.id(),
            block.start(),
            block.end(),
            gap.size,
            gap.start
        );
        debug_assert!(self.is_consistent());

        Ok(block)
    }

    fn first_fit(&self, size: usize) -> Option<Gap> {
        self.gaps().into_iter().find(|gap| gap.size >= size)
    }

    /// The unallocated ranges: the leading gap, then the gaps between
    /// consecutive blocks, then the trailing gap. Empty ranges are skipped.
    pub fn gaps(&self) -> Vec<Gap> {
        let mut gaps = vec![];
        let mut cursor = 0;

        for block in self.blocks.iter() {
            if block.start() > cursor {
                gaps.push(Gap {
                    start: cursor,
                    size: block.start() - cursor,
                });
            }

            cursor = block.end() + 1;
        }

        if self.total_size > cursor {
            gaps.push(Gap {
                start: cursor,
                size: self.total_size - cursor,
            });
        }

        gaps
    }

    pub fn largest_gap(&self) -> usize {
        self.gaps().iter().map(|gap| gap.size).max().unwrap_or(0)
    }

    /// Flags an allocated block as no longer referenced. The block stays in
    /// place until a collection frees it.
    pub fn mark_as_garbage(&mut self, id: BlockId) -> bool {
        match self.block_mut(id) {
            Some(block) if block.status() == BlockStatus::Allocated => {
                block.set_status(BlockStatus::Garbage);
                true
            }
            _ => false,
        }
    }

    /// Removes a block whatever its status.
    pub fn free(&mut self, id: BlockId) -> Option<Block> {
        let index = self.blocks.iter().position(|block| block.id() == id)?;
        let block = self.blocks.remove(index);

        trace!("freed block {} ({} units)", block.id(), block.size());
        debug_assert!(self.is_consistent());

        Some(block)
    }

    pub fn mark(&mut self, id: BlockId) -> bool {
        match self.block_mut(id) {
            Some(block)
                if matches!(
                    block.status(),
                    BlockStatus::Allocated | BlockStatus::Garbage
                ) =>
            {
                block.set_status(BlockStatus::Marked);
                true
            }
            _ => false,
        }
    }

    pub fn unmark(&mut self, id: BlockId) -> bool {
        match self.block_mut(id) {
            Some(block) if block.status() == BlockStatus::Marked => {
                block.set_status(BlockStatus::Allocated);
                true
            }
            _ => false,
        }
    }

    pub fn promote(&mut self, id: BlockId) -> bool {
        let promoted = self.block_mut(id).is_some_and(Block::promote);

        if promoted {
            trace!("promoted block {} to the old generation", id);
        }

        promoted
    }

    /// Slides every block down to close all gaps, keeping their relative
    /// order. All free memory ends up as one trailing gap.
    pub fn compact(&mut self) {
        self.blocks.sort_by_key(Block::start);

        let mut cursor = 0;
        for block in self.blocks.iter_mut() {
            block.relocate(cursor);
            cursor += block.size();
        }

        debug!("compacted {} blocks, {} units in use", self.blocks.len(), cursor);
        debug_assert!(self.is_consistent());
    }

    /// Selects `id`, clearing any previous selection. Selecting an id that
    /// does not exist leaves nothing selected.
    pub fn select(&mut self, id: BlockId) -> bool {
        self.deselect_all();

        match self.block_mut(id) {
            Some(block) => {
                block.set_selected(true);
                true
            }
            None => false,
        }
    }

    pub fn deselect_all(&mut self) {
        for block in self.blocks.iter_mut() {
            block.set_selected(false);
        }
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.blocks.iter().find(|block| block.is_selected())
    }

    pub fn stats(&self) -> SpaceStats {
        let used = self.used();
        let free = self.total_size - used;

        SpaceStats {
            total: self.total_size,
            used,
            free,
            fragmentation: self.fragmentation(free),
        }
    }

    // Free memory that forms a single gap is not fragmented. Otherwise the
    // share of free memory lying in gaps is reported, which is all of it.
    fn fragmentation(&self, free: usize) -> u32 {
        let gaps = self.gaps();

        if free == 0 || gaps.len() <= 1 {
            return 0;
        }

        let gap_total: usize = gaps.iter().map(|gap| gap.size).sum();

        ((gap_total as f64 / free as f64) * 100.0).round() as u32
    }

    /// Drops every block and restarts id numbering.
    pub fn reset(&mut self) {
        debug!("resetting address space ({} blocks dropped)", self.blocks.len());

        self.blocks.clear();
        self.next_id = FIRST_BLOCK_ID;
    }

    /// Checks ordering, overlap, bounds, capacity, id uniqueness and the
    /// single selection rule.
    pub fn is_consistent(&self) -> bool {
        let ordered = self
            .blocks
            .windows(2)
            .all(|pair| pair[0].end() < pair[1].start());
        let in_bounds = self.blocks.iter().all(|b| {
            b.start() <= b.end()
                && b.end() < self.total_size
                && b.end() - b.start() + 1 == b.size()
        });
        let mut ids: Vec<BlockId> = self.blocks.iter().map(Block::id).collect();
        ids.sort_unstable();
        ids.dedup();
        let unique = ids.len() == self.blocks.len();
        let selected = self.blocks.iter().filter(|b| b.is_selected()).count();

        ordered && in_bounds && unique && self.used() <= self.total_size && selected <= 1
    }
}

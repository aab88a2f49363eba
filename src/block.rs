use std::time::Instant;

pub type BlockId = u64;

/// The collection state of a block.
///
/// Free space is never represented by a block, it is whatever lies between
/// blocks.
#[repr(u8)]
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum BlockStatus {
    Allocated,
    // transient tag, only ever observed inside a mark-and-sweep run
    Marked,
    Garbage,
}

#[repr(u8)]
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Generation {
    Young,
    Old,
}

/// A single allocation within an [`crate::AddressSpace`].
///
/// `start` and `end` are inclusive offsets, so a block always covers
/// `end - start + 1 == size` units.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    id: BlockId,
    size: usize,
    status: BlockStatus,
    start: usize,
    end: usize,
    generation: Generation,
    created_at: Instant,
    selected: bool,
}

impl Block {
    pub(crate) fn new(id: BlockId, size: usize, start: usize, created_at: Instant) -> Self {
        debug_assert!(size > 0);

        Self {
            id,
            size,
            status: BlockStatus::Allocated,
            start,
            end: start + size - 1,
            generation: Generation::Young,
            created_at,
            selected: false,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn status(&self) -> BlockStatus {
        self.status
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// How long the block has existed as of `now`.
    pub fn age(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// Whether the two blocks share at least one address.
    pub fn overlaps(&self, other: &Block) -> bool {
        !(self.end < other.start || other.end < self.start)
    }

    pub(crate) fn set_status(&mut self, status: BlockStatus) {
        self.status = status;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn promote(&mut self) -> bool {
        if self.generation == Generation::Young {
            self.generation = Generation::Old;
            true
        } else {
            false
        }
    }

    pub(crate) fn relocate(&mut self, start: usize) {
        self.start = start;
        self.end = start + self.size - 1;
    }
}

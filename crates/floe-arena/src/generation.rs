//! Generations: ordered block lists treated atomically for reclamation.
//!
//! The arena holds two of these: the writable *current* generation and the
//! read-only *frozen* one. New allocations always target the newest block;
//! older blocks are retained (they still answer containment queries) but
//! receive no further allocations.

use smallvec::SmallVec;

use crate::block::Block;

/// An ordered list of blocks, newest last.
///
/// Most arenas never grow past a couple of blocks per generation, so the
/// first two live inline.
#[derive(Default)]
pub(crate) struct Generation {
    blocks: SmallVec<[Block; 2]>,
}

impl Generation {
    pub(crate) fn new() -> Self {
        Self {
            blocks: SmallVec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub(crate) fn newest(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub(crate) fn newest_mut(&mut self) -> Option<&mut Block> {
        self.blocks.last_mut()
    }

    pub(crate) fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Bytes allocated across all blocks.
    pub(crate) fn allocated(&self) -> usize {
        self.blocks.iter().map(Block::allocated).sum()
    }

    /// Sum of block capacities.
    pub(crate) fn reserved(&self) -> usize {
        self.blocks.iter().map(Block::capacity).sum()
    }

    /// Free bytes in the newest block, which serves the next allocation.
    pub(crate) fn remaining(&self) -> usize {
        self.newest().map_or(0, Block::remaining)
    }

    /// Whether `p` lies within any block of the generation.
    pub(crate) fn contains(&self, p: *const u8) -> bool {
        self.blocks.iter().any(|block| block.contains(p))
    }

    /// Drop the newest block if it holds no allocations.
    ///
    /// Called before appending a replacement block, so that repeated
    /// reserve-without-carve cycles do not strand capacity. Blocks with a
    /// non-zero cursor are always retained.
    pub(crate) fn discard_empty_newest(&mut self) {
        if self.newest().map_or(false, |block| block.allocated() == 0) {
            self.blocks.pop();
        }
    }

    /// Drop every block.
    pub(crate) fn clear(&mut self) {
        self.blocks.clear();
    }
}

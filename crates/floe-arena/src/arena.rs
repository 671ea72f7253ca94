//! The region allocator.
//!
//! [`Arena`] carves contiguous spans out of heap blocks that grow
//! geometrically, and reclaims memory only in bulk. It holds exactly two
//! generations of blocks: the writable *current* generation that serves new
//! allocations, and at most one *frozen* generation retained between
//! [`Arena::freeze`] and the matching [`Arena::thaw`].
//!
//! The lifecycle of a hibernating cache looks like:
//! 1. fill the arena with one wave of data
//! 2. `freeze()`: the wave becomes read-only but stays resident
//! 3. rebuild into the new current generation, copying anything worth keeping
//! 4. `thaw()`: the frozen wave is dropped in one step

use std::cmp;
use std::mem;
use std::ptr::NonNull;

use crate::block::{round_up, Block};
use crate::generation::Generation;
use crate::span::Span;
use crate::MAX_ALIGN;

/// A region allocator with two-generation freeze/thaw.
///
/// All operations are infallible given precondition compliance; the only
/// failure mode is system-allocator exhaustion, which aborts via
/// [`std::alloc::handle_alloc_error`]. The arena is a sequential structure:
/// it is deliberately `!Send` and `!Sync`, and callers that share one across
/// threads must serialize every call.
///
/// ```
/// use floe_arena::Arena;
///
/// let mut arena = Arena::with_capacity(64);
/// let first = arena.alloc(32);
/// let second = arena.alloc(32);
/// assert_ne!(first.as_ptr(), second.as_ptr());
/// assert_eq!(arena.size(), 64);
/// assert!(arena.contains(first.as_ptr()));
/// ```
pub struct Arena {
    /// Writable generation serving new allocations.
    current: Generation,
    /// Read-only generation held between a freeze and its thaw.
    frozen: Generation,
    /// Capacity target for the next block, advanced geometrically.
    next_block_size: usize,
    /// Configured first-block capacity; re-seeds the target on `clear()`.
    initial_size: usize,
}

impl Arena {
    /// Usable capacity of the first block when none was configured.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 128;

    /// Create an empty arena.
    ///
    /// No block is reserved until the first allocation needs one.
    pub fn new() -> Self {
        let initial = round_up(Self::DEFAULT_INITIAL_CAPACITY);
        Self {
            current: Generation::new(),
            frozen: Generation::new(),
            next_block_size: initial,
            initial_size: initial,
        }
    }

    /// Create an arena with a first block of at least `initial` bytes,
    /// reserved immediately.
    pub fn with_capacity(initial: usize) -> Self {
        let initial = round_up(cmp::max(initial, MAX_ALIGN));
        let mut arena = Self {
            current: Generation::new(),
            frozen: Generation::new(),
            next_block_size: initial,
            initial_size: initial,
        };
        arena.grow(initial);
        arena
    }

    /// Build an arena whose current generation already owns `first`.
    ///
    /// Used by self-contained construction, where the first block also hosts
    /// the arena's own storage.
    pub(crate) fn hosted(first: Block, initial_size: usize) -> Self {
        let capacity = first.capacity();
        let mut current = Generation::new();
        current.push(first);
        Self {
            current,
            frozen: Generation::new(),
            next_block_size: capacity.saturating_mul(2),
            initial_size: round_up(cmp::max(initial_size, MAX_ALIGN)),
        }
    }

    /// Append a block able to hold `needed` bytes (a `MAX_ALIGN` multiple).
    ///
    /// A never-carved newest block is discarded first: it holds no live
    /// allocation, and retaining it would strand capacity across repeated
    /// reserve cycles. The new capacity is the larger of the request and the
    /// geometric target, so oversized requests are exact-fit rather than
    /// doubled.
    fn grow(&mut self, needed: usize) {
        self.current.discard_empty_newest();
        let capacity = cmp::max(needed, self.next_block_size);
        self.current.push(Block::new(capacity));
        self.next_block_size = capacity.saturating_mul(2);
    }

    /// Allocate `n` contiguous bytes.
    ///
    /// The span is aligned to [`MAX_ALIGN`], lies within a single block, and
    /// is disjoint from every other live allocation. A zero-length request
    /// returns an empty span without reserving a block.
    pub fn alloc(&mut self, n: usize) -> Span {
        if n == 0 {
            return Span::empty();
        }
        self.require(n);
        let block = self
            .current
            .newest_mut()
            .expect("require() installs a current block");
        Span::new(block.alloc(round_up(n)), n)
    }

    /// Ensure the current block has at least `n` bytes of remaining space,
    /// without carving any of it.
    ///
    /// Pre-sizes the [`Arena::remnant`] for temporary use.
    pub fn require(&mut self, n: usize) {
        let needed = round_up(n);
        if needed > 0 && self.current.remaining() < needed {
            self.grow(needed);
        }
    }

    /// The free tail of the current block.
    ///
    /// The caller may write into the span; none of it counts as allocated
    /// until a later [`Arena::alloc`] carves a prefix of it. Empty when no
    /// block exists.
    pub fn remnant(&self) -> Span {
        match self.current.newest() {
            Some(block) => Span::new(block.tail(), block.remaining()),
            None => Span::empty(),
        }
    }

    /// Whether `p` lies within any block of either generation.
    pub fn contains(&self, p: *const u8) -> bool {
        self.current.contains(p) || self.frozen.contains(p)
    }

    /// Move `value` into the arena and return its address.
    ///
    /// The arena stores no type information and never runs `T`'s destructor:
    /// the storage simply vanishes when the containing block is reclaimed.
    /// Callers placing payloads that own resources must drop them in place
    /// externally before that happens. Zero-sized types consume no storage.
    ///
    /// # Panics
    ///
    /// Panics if `align_of::<T>()` exceeds [`MAX_ALIGN`].
    pub fn make<T>(&mut self, value: T) -> NonNull<T> {
        assert!(
            mem::align_of::<T>() <= MAX_ALIGN,
            "type alignment {} exceeds the arena alignment {}",
            mem::align_of::<T>(),
            MAX_ALIGN,
        );
        if mem::size_of::<T>() == 0 {
            mem::forget(value);
            return NonNull::dangling();
        }
        let span = self.alloc(mem::size_of::<T>());
        let cell = span.data().cast::<T>();
        // SAFETY: the span covers size_of::<T>() freshly reserved bytes and
        // is MAX_ALIGN-aligned, which satisfies T's alignment.
        unsafe { cell.as_ptr().write(value) };
        cell
    }

    /// Copy `bytes` into the arena, pinning a transient byte string to the
    /// arena's lifetime.
    pub fn localize(&mut self, bytes: &[u8]) -> Span {
        let span = self.alloc(bytes.len());
        if !bytes.is_empty() {
            // SAFETY: the span covers bytes.len() freshly reserved bytes,
            // which cannot overlap the caller's borrowed source.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), span.as_mut_ptr(), bytes.len())
            };
        }
        span
    }

    /// Detach the current generation into the frozen slot and start the
    /// current generation empty.
    ///
    /// The frozen blocks stay resident (still answering [`Arena::contains`])
    /// until [`Arena::thaw`]. The next block to be created will have capacity
    /// at least `max(hint, total capacity of the frozen generation)`, letting
    /// the rebuild absorb the next wave in a single block; pass `0` for no
    /// hint.
    ///
    /// The arena holds at most one frozen generation. Freezing while one
    /// exists is a caller error: debug builds assert, release builds drop the
    /// previously frozen blocks as if `thaw` had been called first.
    pub fn freeze(&mut self, hint: usize) {
        debug_assert!(
            self.frozen.is_empty(),
            "freeze() called while a frozen generation exists"
        );
        self.frozen = mem::take(&mut self.current);
        let target = cmp::max(round_up(hint), self.frozen.reserved());
        self.next_block_size = if target == 0 { self.initial_size } else { target };
    }

    /// Drop every block of the frozen generation.
    ///
    /// Spans handed out of those blocks become dangling; callers must have
    /// copied anything worth keeping (for example via [`Arena::localize`])
    /// into the current generation first. No-op when nothing is frozen. The
    /// current generation is untouched.
    pub fn thaw(&mut self) {
        self.frozen.clear();
    }

    /// Drop every block of both generations and reset the growth target to
    /// the configured initial capacity.
    pub fn clear(&mut self) {
        self.current.clear();
        self.frozen.clear();
        self.next_block_size = self.initial_size;
    }

    /// Bytes allocated from the current generation.
    pub fn size(&self) -> usize {
        self.current.allocated()
    }

    /// Bytes allocated across both generations.
    pub fn allocated_size(&self) -> usize {
        self.current.allocated() + self.frozen.allocated()
    }

    /// Sum of block capacities across both generations.
    pub fn reserved_size(&self) -> usize {
        self.current.reserved() + self.frozen.reserved()
    }

    /// Free bytes in the block that serves the next allocation.
    pub fn remaining(&self) -> usize {
        self.current.remaining()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

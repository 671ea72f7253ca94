//! Self-contained arenas hosted inside their own first block.
//!
//! A [`SelfContainedArena`] allocates one block up front and places the
//! [`Arena`] instance itself in the first bytes of that block, so the arena's
//! storage outlives nothing but itself. Teardown moves the instance out of
//! the hosted storage before dropping it, which frees every block (the
//! hosting one included) without reading any hosted byte after its region
//! is gone.

use std::cmp;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use crate::arena::Arena;
use crate::block::{round_up, Block};
use crate::MAX_ALIGN;

/// Owning handle to an arena that lives inside its own first block.
///
/// Dereferences to [`Arena`]. The handle is freely movable while the hosted
/// instance itself never moves, and the inner arena is never exposed by
/// value, so the hosting invariant cannot be broken.
///
/// Do not call [`Arena::clear`] (or [`Arena::freeze`] followed by
/// [`Arena::thaw`]) through the handle: either would free the hosting block
/// out from under the instance.
pub struct SelfContainedArena {
    arena: NonNull<Arena>,
}

impl SelfContainedArena {
    /// Host an arena with the default usable capacity.
    pub fn new() -> Self {
        Self::with_capacity(Arena::DEFAULT_INITIAL_CAPACITY)
    }

    /// Host an arena whose first block has at least `initial` usable bytes
    /// past the arena's own storage.
    pub fn with_capacity(initial: usize) -> Self {
        debug_assert!(mem::align_of::<Arena>() <= MAX_ALIGN);
        let header = round_up(mem::size_of::<Arena>());
        let usable = round_up(cmp::max(initial, MAX_ALIGN));

        let mut block = Block::new(header + usable);
        let cell = block.alloc(header).cast::<Arena>();
        let arena = Arena::hosted(block, usable);
        // SAFETY: `cell` is the first `header` bytes of the hosting block:
        // aligned to MAX_ALIGN >= align_of::<Arena>(), sized for an Arena,
        // and already carved, so the hosted arena never hands it out again.
        unsafe { cell.as_ptr().write(arena) };
        Self { arena: cell }
    }
}

impl Default for SelfContainedArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SelfContainedArena {
    type Target = Arena;

    fn deref(&self) -> &Arena {
        // SAFETY: `arena` points at the instance written in `with_capacity`;
        // it stays valid until the handle is dropped.
        unsafe { self.arena.as_ref() }
    }
}

impl DerefMut for SelfContainedArena {
    fn deref_mut(&mut self) -> &mut Arena {
        // SAFETY: as in `deref`, and the handle is uniquely borrowed.
        unsafe { self.arena.as_mut() }
    }
}

impl Drop for SelfContainedArena {
    fn drop(&mut self) {
        // SAFETY: `arena` is valid and about to become inaccessible. Reading
        // the instance out relocates it (block list included) onto the
        // stack, so dropping it frees every block, the hosting block among
        // them, without touching the hosted storage again.
        let arena = unsafe { ptr::read(self.arena.as_ptr()) };
        drop(arena);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosts_its_own_storage() {
        let arena = SelfContainedArena::new();
        let this = (&*arena as *const Arena).cast::<u8>();
        assert!(arena.contains(this));
        assert!(arena.remaining() >= Arena::DEFAULT_INITIAL_CAPACITY);
    }

    #[test]
    fn allocations_land_beside_the_host() {
        let mut arena = SelfContainedArena::with_capacity(512);
        let span = arena.alloc(64);
        assert!(arena.contains(span.as_ptr()));
        assert!(span.as_ptr() as usize > (&*arena as *const Arena) as usize);
    }

    #[test]
    fn grows_past_the_hosting_block() {
        let mut arena = SelfContainedArena::with_capacity(64);
        let far = arena.alloc(4096);
        assert!(arena.contains(far.as_ptr()));
        let this = (&*arena as *const Arena).cast::<u8>();
        assert!(arena.contains(this));
    }

    #[test]
    fn handle_is_movable() {
        let mut arena = SelfContainedArena::with_capacity(256);
        let span = arena.localize(b"stays put");
        let moved = arena;
        assert!(moved.contains(span.as_ptr()));
        // SAFETY: the block is live and the span not otherwise accessed.
        assert_eq!(unsafe { span.as_slice() }, b"stays put");
    }

    #[test]
    fn drop_after_heavy_use_is_clean() {
        let mut arena = SelfContainedArena::new();
        for i in 0..200 {
            let payload = vec![i as u8; 8 + (i % 64)];
            let span = arena.localize(&payload);
            // SAFETY: block live, span not otherwise accessed.
            assert_eq!(unsafe { span.as_slice() }, &payload[..]);
        }
        drop(arena);
    }
}

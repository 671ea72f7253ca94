//! Floe: generational region allocation for systems utilities.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the floe sub-crates. For most users, adding `floe` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use floe::prelude::*;
//!
//! let mut arena = Arena::with_capacity(256);
//!
//! // Pin a transient byte string to the arena.
//! let greeting = arena.localize(b"sixteen  bytes!!");
//! assert!(arena.contains(greeting.as_ptr()));
//! assert_eq!(arena.size(), 16);
//!
//! // Detach the generation, rebuild, then drop the old blocks in one step.
//! arena.freeze(0);
//! assert_eq!(arena.size(), 0);
//! assert!(arena.contains(greeting.as_ptr()));
//!
//! arena.thaw();
//! assert!(!arena.contains(greeting.as_ptr()));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `floe-arena` | `Arena`, `Span`, `FixedArena`, `SelfContainedArena` |

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Region allocation: arenas, spans, and free-lists (`floe-arena`).
pub use floe_arena as arena;

/// The most commonly used floe types, importable in one line.
pub mod prelude {
    pub use floe_arena::{Arena, FixedArena, SelfContainedArena, Span};
}

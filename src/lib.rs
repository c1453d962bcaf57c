//! packed-strings: space-efficient, serializable string containers that
//! pack tens of millions of short strings into byte arenas instead of
//! boxing each one.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: hold huge string sets/maps with per-entry overhead measured in
//!   a couple of machine words, and serialize the whole structure as one
//!   compact blob that rebuilds deterministically.
//! - Layers:
//!   - ByteArena: append-only storage; zero-terminated UTF-8 entries at
//!     stable offsets; removal tombstones in place (zero-fill), never
//!     compacts.
//!   - PrimaryIndex: content hash → packed arena location, one slot per
//!     distinct hash, built on `hashbrown::HashTable` with externally
//!     computed hashes.
//!   - Spill: exact fallback map for the rare strings whose content hash
//!     collides with a different resident string; membership here is
//!     checked before the index so collisions never cause false
//!     negatives.
//!   - StringMap / StringSet: public containers orchestrating the layers
//!     and owning the wire format (codec module).
//!
//! Constraints
//! - Single-threaded value semantics: no interior mutability, no internal
//!   locking; `&mut self` is the mutation contract.
//! - Keys/values/members are non-empty NUL-free strings; violations
//!   panic at the arena boundary.
//! - Arenas hold at most 2^32 bytes each (offsets are `u32`).
//! - Content hashing is deterministic across processes: serialized data
//!   is portable, and deserialization re-hashes raw arena bytes to
//!   rebuild the index it never persists.
//!
//! Why this split?
//! - Localize invariants: each layer has a small, precise contract (the
//!   arena owns byte layout, the index owns one-slot-per-hash, the spill
//!   owns exactness).
//! - The hash table stores no strings at all, so resizing it never
//!   touches string bytes, and the serialized form is just arenas plus
//!   the tiny spill; the index is always derived state.
//!
//! Non-goals
//! - Iteration, bulk operations, and values views are not part of the
//!   contract.
//! - The content hash is not cryptographic; collision handling is about
//!   correctness, not adversarial inputs.
//! - No concurrent mutation; wrap the container in external
//!   synchronization if you must share it.

mod arena;
mod codec;
mod error;
mod hash;
mod index;
mod spill;
mod string_map;
mod string_set;

// Public surface
pub use error::Error;
pub use hash::HashSpace;
pub use string_map::StringMap;
pub use string_set::StringSet;

// Internal benchmarking hook; not part of the public API.
#[cfg(feature = "bench_internal")]
pub use arena::ByteArena;

//! ByteArena: append-only string storage with stable offsets.
//!
//! Strings are stored as runs of non-zero bytes, each terminated by a
//! single zero byte, packed back to back in one growable buffer. An
//! entry's offset is stable for the container's lifetime: growth copies
//! the buffer but never shifts entries, and removal zero-fills the entry
//! in place instead of compacting. Offset space freed by removal is never
//! reclaimed; the target workload removes rarely relative to insertion.
//!
//! Entries must be non-empty and must not contain an embedded NUL byte.
//! UTF-8 of ordinary text never does; both constraints are asserted here
//! because the rebuild scan in the codec treats zero bytes as dead space.

use crate::error::Error;

/// Default allocation block. `clear` shrinks arenas that grew past this
/// back to one block.
pub(crate) const BLOCK: usize = 64 * 1024;

/// Arenas are addressed by `u32` offsets, so each holds at most 2^32 bytes.
const MAX_ARENA_BYTES: usize = 1 << 32;

#[derive(Debug)]
pub struct ByteArena {
    buf: Vec<u8>,
}

impl ByteArena {
    pub fn new() -> Self {
        Self::with_capacity(BLOCK)
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buf: Vec::with_capacity(bytes.max(BLOCK)),
        }
    }

    /// Wrap raw bytes read back from serialized form. The codec validates
    /// entry structure before the arena is used for lookups.
    pub(crate) fn from_raw(buf: Vec<u8>) -> Self {
        Self { buf }
    }

    /// Append one entry and return its starting offset. Amortized O(1);
    /// reserves the entry plus one block when the buffer is full.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is empty or contains a NUL byte, or if the arena
    /// would exceed 2^32 bytes.
    pub fn append(&mut self, bytes: &[u8]) -> u32 {
        assert!(!bytes.is_empty(), "arena entries must be non-empty");
        assert!(
            !bytes.contains(&0),
            "arena entries must not contain NUL bytes"
        );
        let start = self.buf.len();
        let end = start + bytes.len() + 1;
        assert!(end <= MAX_ARENA_BYTES, "arena capacity overflow");
        if self.buf.capacity() < end {
            self.buf.reserve(bytes.len() + 1 + BLOCK);
        }
        self.buf.extend_from_slice(bytes);
        self.buf.push(0);
        start as u32
    }

    /// Length of the entry at `offset`, scanning forward to its zero
    /// terminator. Returns `None` when no terminator exists in range.
    /// A removed entry reads as length 0 (its first byte is zero).
    pub fn len_at(&self, offset: u32) -> Option<usize> {
        let tail = self.buf.get(offset as usize..)?;
        tail.iter().position(|&b| b == 0)
    }

    /// Exact comparison of `bytes` against the entry at `offset`,
    /// including the terminator position. A zero-filled entry never
    /// matches because `bytes` is non-empty and NUL-free.
    pub fn entry_eq(&self, offset: u32, bytes: &[u8]) -> bool {
        let start = offset as usize;
        let end = start + bytes.len();
        self.buf.get(start..end) == Some(bytes) && self.buf.get(end) == Some(&0)
    }

    /// Decode the entry at `offset` as UTF-8.
    pub(crate) fn str_at(&self, offset: u32) -> Result<&str, Error> {
        let len = self.len_at(offset).ok_or_else(|| {
            Error::Corrupt(format!("unterminated arena entry at offset {offset}"))
        })?;
        let start = offset as usize;
        std::str::from_utf8(&self.buf[start..start + len]).map_err(|source| Error::Decode {
            offset: u64::from(offset),
            source,
        })
    }

    /// Overwrite the `len` content bytes at `offset` with zero. Together
    /// with the entry's own terminator this leaves a run of `len + 1`
    /// zeros, which rebuild scans skip one byte at a time, so scanning
    /// always advances.
    pub(crate) fn zero_fill(&mut self, offset: u32, len: usize) {
        let start = offset as usize;
        self.buf[start..start + len].fill(0);
    }

    /// Current write cursor: the number of bytes that serialization
    /// persists. Allocated tail capacity is never written out.
    pub fn cursor(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Reset the cursor. An arena that grew past the default block gives
    /// its allocation back and restarts at one block; a small arena keeps
    /// its allocation.
    pub fn clear(&mut self) {
        if self.buf.capacity() > BLOCK {
            self.buf = Vec::with_capacity(BLOCK);
        } else {
            self.buf.clear();
        }
    }
}

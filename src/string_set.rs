//! StringSet: a string set packed into one byte arena.

use std::io::{Read, Write};

use tracing::debug;

use crate::arena::ByteArena;
use crate::codec;
use crate::error::Error;
use crate::hash::HashSpace;
use crate::index::PrimaryIndex;
use crate::spill::Spill;

/// A space-efficient string set.
///
/// Member bytes live packed in one arena; the index maps each member's
/// content hash to its arena offset. Colliding members fall back to an
/// exact spill store, so membership tests never produce false positives.
///
/// Members must be non-empty and must not contain NUL bytes; violations
/// panic. Removal tombstones the member's arena span without compacting.
///
/// Like [`crate::StringMap`], the set is a plain single-threaded value
/// with no internal synchronization.
#[derive(Debug)]
pub struct StringSet {
    space: HashSpace,
    index: PrimaryIndex<u32>,
    spill: Spill<()>,
    arena: ByteArena,
}

impl StringSet {
    /// An empty set using the full 64-bit hash space.
    pub fn new() -> Self {
        Self::with_hash_space(HashSpace::Full)
    }

    /// An empty set in the given hash space. `HashSpace::Narrow` forces
    /// frequent collisions and exists to exercise the spill paths.
    pub fn with_hash_space(space: HashSpace) -> Self {
        Self {
            space,
            index: PrimaryIndex::new(),
            spill: Spill::new(),
            arena: ByteArena::new(),
        }
    }

    /// An empty set pre-sized for `entries` index slots and
    /// `arena_bytes` of member storage.
    pub fn with_capacity(entries: usize, arena_bytes: usize) -> Self {
        Self {
            space: HashSpace::Full,
            index: PrimaryIndex::with_capacity(entries),
            spill: Spill::new(),
            arena: ByteArena::with_capacity(arena_bytes),
        }
    }

    /// Number of members, resident and spilled.
    pub fn len(&self) -> usize {
        self.index.len() + self.spill.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Membership test. The spill store is consulted first: a member
    /// that collided at insertion is only resolvable there.
    pub fn contains(&self, value: &str) -> bool {
        if self.spill.contains(value) {
            return true;
        }
        match self.index.get(self.space.digest(value.as_bytes())) {
            Some(off) => self.arena.entry_eq(off, value.as_bytes()),
            None => false,
        }
    }

    /// Add `value`; true when it was newly added.
    pub fn insert(&mut self, value: &str) -> bool {
        let hash = self.space.digest(value.as_bytes());
        match self.index.get(hash) {
            None => {
                debug_assert!(
                    !self.spill.contains(value),
                    "spilled members are always shadowed by a resident hash"
                );
                let off = self.arena.append(value.as_bytes());
                self.index.insert(hash, off);
                true
            }
            Some(off) if self.arena.entry_eq(off, value.as_bytes()) => false,
            // A different string owns this hash: exact fallback.
            Some(_) => self.spill.insert(value.to_owned(), ()).is_none(),
        }
    }

    /// Remove `value`; true when it was present.
    pub fn remove(&mut self, value: &str) -> bool {
        if self.spill.remove(value).is_some() {
            return true;
        }
        let hash = self.space.digest(value.as_bytes());
        let Some(off) = self.index.get(hash) else {
            return false;
        };
        if !self.arena.entry_eq(off, value.as_bytes()) {
            // The hash is resident for a different string; `value` itself
            // was never stored.
            return false;
        }
        self.index.remove(hash);
        self.arena.zero_fill(off, value.len());
        self.promote_spilled(hash);
        true
    }

    /// Drop every member. An arena that grew past the default block
    /// gives its allocation back.
    pub fn clear(&mut self) {
        self.index.clear();
        self.spill.clear();
        self.arena.clear();
    }

    /// A slot vacated by `remove` is refilled from the spill store; see
    /// the map's promotion rule.
    fn promote_spilled(&mut self, hash: u64) {
        let Some(member) = self
            .spill
            .find_key(|k| self.space.digest(k.as_bytes()) == hash)
            .map(str::to_owned)
        else {
            return;
        };
        self.spill
            .remove(&member)
            .expect("member was just found in the spill store");
        let off = self.arena.append(member.as_bytes());
        self.index.insert(hash, off);
    }

    /// Write the set to `w` in its binary wire format.
    pub fn serialize<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        codec::write_hash_space(w, self.space)?;
        codec::write_count(w, self.index.len())?;
        codec::write_count(w, self.spill.len())?;
        codec::write_cursor(w, &self.arena)?;
        codec::write_arena_bytes(w, &self.arena)?;
        for (member, _) in self.spill.iter() {
            codec::write_str(w, member)?;
        }
        debug!(
            resident = self.index.len(),
            spilled = self.spill.len(),
            member_bytes = self.arena.cursor(),
            "serialized string set"
        );
        Ok(())
    }

    /// Rebuild a set from `r` by one linear scan over the arena,
    /// re-hashing each live entry. Every consistency violation aborts
    /// the load with `Error::Corrupt`.
    pub fn deserialize<R: Read>(r: &mut R) -> Result<Self, Error> {
        let space = codec::read_hash_space(r)?;
        let resident = codec::read_count(r, "resident member")?;
        let spilled = codec::read_count(r, "spilled member")?;
        let cursor = codec::read_cursor(r)?;
        let arena = codec::read_arena_bytes(r, cursor)?;

        let mut index = PrimaryIndex::with_capacity(resident);
        let bytes = arena.bytes();
        let mut pos = 0;
        while let Some((off, len)) = codec::next_live_entry(bytes, &mut pos)? {
            let slice = &bytes[off as usize..off as usize + len];
            std::str::from_utf8(slice).map_err(|source| Error::Decode {
                offset: u64::from(off),
                source,
            })?;
            let hash = space.digest(slice);
            if index.insert(hash, off).is_some() {
                return Err(Error::Corrupt(format!(
                    "duplicate content hash {hash:#x} while rebuilding the index"
                )));
            }
        }
        if index.len() != resident {
            return Err(Error::Corrupt(format!(
                "header declares {resident} resident members but the scan rebuilt {}",
                index.len()
            )));
        }

        let mut spill = Spill::with_capacity(spilled);
        for _ in 0..spilled {
            let member = codec::read_str(r)?;
            if !index.contains_hash(space.digest(member.as_bytes())) {
                return Err(Error::Corrupt(format!(
                    "spilled member {member:?} has no resident entry sharing its hash"
                )));
            }
            if spill.contains(&member) {
                return Err(Error::Corrupt(format!("duplicate spilled member {member:?}")));
            }
            spill.insert(member, ());
        }

        debug!(
            resident = index.len(),
            spilled = spill.len(),
            member_bytes = arena.cursor(),
            "deserialized string set"
        );
        Ok(Self {
            space,
            index,
            spill,
            arena,
        })
    }
}

impl Default for StringSet {
    fn default() -> Self {
        Self::new()
    }
}

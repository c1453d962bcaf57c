//! PrimaryIndex: content hash → packed arena location.
//!
//! Thin wrapper over `hashbrown::HashTable` holding `(hash, location)`
//! pairs. The content hash doubles as the table hash, and the rehash
//! closure returns the stored hash, so strings are never re-hashed after
//! insertion. At most one entry exists per distinct hash value; the
//! containers divert colliding strings to the spill store instead of
//! overwriting a resident slot.

use hashbrown::hash_table::Entry;
use hashbrown::HashTable;

/// Dual arena offsets for one map entry: where the key starts in the key
/// arena and where its value starts in the value arena. One index slot
/// yields both, which is what limits arenas to 2^32 bytes each.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct PairLoc {
    pub key: u32,
    pub value: u32,
}

#[derive(Debug)]
pub(crate) struct PrimaryIndex<L> {
    table: HashTable<(u64, L)>,
}

impl<L: Copy> PrimaryIndex<L> {
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    pub fn with_capacity(entries: usize) -> Self {
        Self {
            table: HashTable::with_capacity(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn get(&self, hash: u64) -> Option<L> {
        self.table
            .find(hash, |&(h, _)| h == hash)
            .map(|&(_, loc)| loc)
    }

    #[inline]
    pub fn contains_hash(&self, hash: u64) -> bool {
        self.table.find(hash, |&(h, _)| h == hash).is_some()
    }

    /// Record `hash → loc`, replacing and returning any previous location
    /// for the same hash.
    pub fn insert(&mut self, hash: u64, loc: L) -> Option<L> {
        match self
            .table
            .entry(hash, |&(h, _)| h == hash, |&(h, _)| h)
        {
            Entry::Occupied(mut o) => {
                let prev = o.get().1;
                o.get_mut().1 = loc;
                Some(prev)
            }
            Entry::Vacant(v) => {
                let _ = v.insert((hash, loc));
                None
            }
        }
    }

    pub fn remove(&mut self, hash: u64) -> Option<L> {
        match self.table.find_entry(hash, |&(h, _)| h == hash) {
            Ok(o) => {
                let ((_, loc), _) = o.remove();
                Some(loc)
            }
            Err(_) => None,
        }
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

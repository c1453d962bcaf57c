//! StringMap: a string → string map packed into byte arenas.

use std::io::{Read, Write};

use tracing::debug;

use crate::arena::ByteArena;
use crate::codec;
use crate::error::Error;
use crate::hash::HashSpace;
use crate::index::{PairLoc, PrimaryIndex};
use crate::spill::Spill;

/// A space-efficient string → string map.
///
/// Key and value bytes live packed in two arenas; the index maps each
/// key's content hash to the pair of arena offsets, so per-entry overhead
/// is one `(u64, PairLoc)` index slot instead of two boxed strings. The
/// rare keys whose hash collides with a different resident key fall back
/// to an exact spill store, so lookups never produce false positives.
///
/// Keys and values must be non-empty and must not contain NUL bytes;
/// violations panic. Removing or updating an entry tombstones its arena
/// spans without compacting, so heavy churn leaks arena space; the
/// intended workload is insert-mostly.
///
/// The map is a plain single-threaded value: no interior mutability, no
/// internal locking. Share it across threads behind external
/// synchronization or not at all.
#[derive(Debug)]
pub struct StringMap {
    space: HashSpace,
    index: PrimaryIndex<PairLoc>,
    spill: Spill<String>,
    keys: ByteArena,
    values: ByteArena,
}

impl StringMap {
    /// An empty map using the full 64-bit hash space.
    pub fn new() -> Self {
        Self::with_hash_space(HashSpace::Full)
    }

    /// An empty map in the given hash space. `HashSpace::Narrow` forces
    /// frequent collisions and exists to exercise the spill paths.
    pub fn with_hash_space(space: HashSpace) -> Self {
        Self {
            space,
            index: PrimaryIndex::new(),
            spill: Spill::new(),
            keys: ByteArena::new(),
            values: ByteArena::new(),
        }
    }

    /// An empty map pre-sized for `entries` index slots and
    /// `arena_bytes` of storage per arena.
    pub fn with_capacity(entries: usize, arena_bytes: usize) -> Self {
        Self {
            space: HashSpace::Full,
            index: PrimaryIndex::with_capacity(entries),
            spill: Spill::new(),
            keys: ByteArena::with_capacity(arena_bytes),
            values: ByteArena::with_capacity(arena_bytes),
        }
    }

    /// Number of live entries, resident and spilled.
    pub fn len(&self) -> usize {
        self.index.len() + self.spill.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Look up `key`. The spill store is consulted first: a key that
    /// collided at insertion is only resolvable there, and probing the
    /// index first would byte-compare against the other resident string
    /// and report a false negative.
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.spill.get(key) {
            return Some(value.as_str());
        }
        let loc = self.index.get(self.space.digest(key.as_bytes()))?;
        if self.keys.entry_eq(loc.key, key.as_bytes()) {
            Some(self.resident_value(loc))
        } else {
            None
        }
    }

    /// Insert or update, returning the previous value for `key` if any.
    pub fn insert(&mut self, key: &str, value: &str) -> Option<String> {
        let hash = self.space.digest(key.as_bytes());
        match self.index.get(hash) {
            None => {
                debug_assert!(
                    !self.spill.contains(key),
                    "spilled entries are always shadowed by a resident hash"
                );
                let loc = self.append_pair(key, value);
                self.index.insert(hash, loc);
                None
            }
            Some(loc) if self.keys.entry_eq(loc.key, key.as_bytes()) => {
                // Same key resident: tombstone the old spans and append
                // fresh ones rather than mutate in place. Leaks the old
                // spans; the single append path is the tradeoff.
                let prev = self.resident_value(loc).to_owned();
                self.keys.zero_fill(loc.key, key.len());
                self.values.zero_fill(loc.value, prev.len());
                let fresh = self.append_pair(key, value);
                self.index.insert(hash, fresh);
                Some(prev)
            }
            // A different string owns this hash: exact fallback.
            Some(_) => self.spill.insert(key.to_owned(), value.to_owned()),
        }
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        if let Some(prev) = self.spill.remove(key) {
            return Some(prev);
        }
        let hash = self.space.digest(key.as_bytes());
        let loc = self.index.get(hash)?;
        if !self.keys.entry_eq(loc.key, key.as_bytes()) {
            // The hash is resident for a different string; `key` itself
            // was never stored.
            return None;
        }
        let prev = self.resident_value(loc).to_owned();
        self.index.remove(hash);
        self.keys.zero_fill(loc.key, key.len());
        self.values.zero_fill(loc.value, prev.len());
        self.promote_spilled(hash);
        Some(prev)
    }

    /// Drop every entry. Arenas that grew past the default block give
    /// their allocations back; small ones keep theirs.
    pub fn clear(&mut self) {
        self.index.clear();
        self.spill.clear();
        self.keys.clear();
        self.values.clear();
    }

    fn append_pair(&mut self, key: &str, value: &str) -> PairLoc {
        PairLoc {
            key: self.keys.append(key.as_bytes()),
            value: self.values.append(value.as_bytes()),
        }
    }

    fn resident_value(&self, loc: PairLoc) -> &str {
        self.values
            .str_at(loc.value)
            .expect("value arena entries are valid UTF-8 once stored")
    }

    /// A slot vacated by `remove` is refilled from the spill store: one
    /// spilled entry sharing the removed hash (if any) moves into the
    /// arenas and index. Keeps every spilled entry shadowed by a resident
    /// hash, which lookup ordering and the rebuild checks rely on.
    fn promote_spilled(&mut self, hash: u64) {
        let Some(key) = self
            .spill
            .find_key(|k| self.space.digest(k.as_bytes()) == hash)
            .map(str::to_owned)
        else {
            return;
        };
        let value = self
            .spill
            .remove(&key)
            .expect("key was just found in the spill store");
        let loc = self.append_pair(&key, &value);
        self.index.insert(hash, loc);
    }

    /// Write the map to `w` in its binary wire format.
    pub fn serialize<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        codec::write_hash_space(w, self.space)?;
        codec::write_count(w, self.index.len())?;
        codec::write_count(w, self.spill.len())?;
        codec::write_cursor(w, &self.keys)?;
        codec::write_cursor(w, &self.values)?;
        codec::write_arena_bytes(w, &self.keys)?;
        codec::write_arena_bytes(w, &self.values)?;
        for (key, value) in self.spill.iter() {
            codec::write_str(w, key)?;
            codec::write_str(w, value)?;
        }
        debug!(
            resident = self.index.len(),
            spilled = self.spill.len(),
            key_bytes = self.keys.cursor(),
            value_bytes = self.values.cursor(),
            "serialized string map"
        );
        Ok(())
    }

    /// Rebuild a map from `r`. The index is not persisted; it is
    /// reconstructed by one linear scan over the key arena, re-hashing
    /// each live entry and pairing it with the next live value span.
    /// Every consistency violation aborts the load with `Error::Corrupt`.
    pub fn deserialize<R: Read>(r: &mut R) -> Result<Self, Error> {
        let space = codec::read_hash_space(r)?;
        let resident = codec::read_count(r, "resident entry")?;
        let spilled = codec::read_count(r, "spilled entry")?;
        let key_cursor = codec::read_cursor(r)?;
        let value_cursor = codec::read_cursor(r)?;
        let keys = codec::read_arena_bytes(r, key_cursor)?;
        let values = codec::read_arena_bytes(r, value_cursor)?;

        let mut index = PrimaryIndex::with_capacity(resident);
        let kbytes = keys.bytes();
        let vbytes = values.bytes();
        let mut kpos = 0;
        let mut vpos = 0;
        while let Some((koff, klen)) = codec::next_live_entry(kbytes, &mut kpos)? {
            let kslice = &kbytes[koff as usize..koff as usize + klen];
            std::str::from_utf8(kslice).map_err(|source| Error::Decode {
                offset: u64::from(koff),
                source,
            })?;
            let (voff, vlen) = codec::next_live_entry(vbytes, &mut vpos)?.ok_or_else(|| {
                Error::Corrupt(format!("resident key at offset {koff} has no value entry"))
            })?;
            let vslice = &vbytes[voff as usize..voff as usize + vlen];
            std::str::from_utf8(vslice).map_err(|source| Error::Decode {
                offset: u64::from(voff),
                source,
            })?;
            let hash = space.digest(kslice);
            let loc = PairLoc {
                key: koff,
                value: voff,
            };
            if index.insert(hash, loc).is_some() {
                // Colliding strings were spilled at write time, never
                // written into the hash-indexed arena region.
                return Err(Error::Corrupt(format!(
                    "duplicate content hash {hash:#x} while rebuilding the index"
                )));
            }
        }
        if codec::next_live_entry(vbytes, &mut vpos)?.is_some() {
            return Err(Error::Corrupt(
                "value arena has live entries past the last key".to_string(),
            ));
        }
        if index.len() != resident {
            return Err(Error::Corrupt(format!(
                "header declares {resident} resident entries but the scan rebuilt {}",
                index.len()
            )));
        }

        let mut spill = Spill::with_capacity(spilled);
        for _ in 0..spilled {
            let key = codec::read_str(r)?;
            let value = codec::read_str(r)?;
            if !index.contains_hash(space.digest(key.as_bytes())) {
                return Err(Error::Corrupt(format!(
                    "spilled key {key:?} has no resident entry sharing its hash"
                )));
            }
            if spill.contains(&key) {
                return Err(Error::Corrupt(format!("duplicate spilled key {key:?}")));
            }
            spill.insert(key, value);
        }

        debug!(
            resident = index.len(),
            spilled = spill.len(),
            key_bytes = keys.cursor(),
            value_bytes = values.cursor(),
            "deserialized string map"
        );
        Ok(Self {
            space,
            index,
            spill,
            keys,
            values,
        })
    }
}

impl Default for StringMap {
    fn default() -> Self {
        Self::new()
    }
}

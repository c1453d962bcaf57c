//! Content digest: deterministic, order-sensitive, non-cryptographic.
//!
//! The digest is computed from a string's UTF-8 bytes and used as the key
//! of the primary index, so it must be identical across process runs: no
//! per-process seeding, no address-dependent state. Deserialization
//! re-hashes raw arena bytes and must reproduce the digests used at
//! insertion time.

/// Digest width selector, fixed at container construction and persisted
/// in the serialized header.
///
/// `Narrow` truncates digests to 8 bits, forcing frequent collisions so
/// the spill-store paths can be exercised deterministically. Because the
/// selector travels with the serialized data, a deserialized container
/// always rebuilds in the hash space it was written with.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HashSpace {
    /// Full 64-bit digests; collisions are rare.
    Full,
    /// Digests truncated to 8 bits; collisions are the common case.
    Narrow,
}

impl HashSpace {
    /// Digest `bytes` into this hash space.
    #[inline]
    pub(crate) fn digest(self, bytes: &[u8]) -> u64 {
        let h = mix(bytes);
        match self {
            HashSpace::Full => h,
            HashSpace::Narrow => h & 0xff,
        }
    }
}

/// One-at-a-time avalanche mix over the byte range, followed by a fixed
/// finishing mix of shifts and adds.
#[inline]
fn mix(bytes: &[u8]) -> u64 {
    let mut h: u64 = 0;
    for &b in bytes {
        h = h.wrapping_add(u64::from(b));
        h = h.wrapping_add(h << 10);
        h ^= h >> 6;
    }
    h = h.wrapping_add(h << 3);
    h ^= h >> 11;
    h = h.wrapping_add(h << 15);
    h
}
